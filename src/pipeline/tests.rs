use std::sync::Mutex;

use indexmap::IndexMap;

use super::*;
use crate::core::ImageFormat;
use crate::image::render::{RenderResult, Variant};

/// Square variants named `/images/shapes-<w>w.<ext>`, nothing written.
#[derive(Default)]
struct FakeRenderer {
    calls: Mutex<Vec<(ImageSource, Vec<u32>)>>,
}

impl FakeRenderer {
    fn calls(&self) -> Vec<(ImageSource, Vec<u32>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ImageRenderer for FakeRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<RenderResult, RenderError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.source.clone(), request.widths.to_vec()));

        let name = match &request.source {
            ImageSource::Local(path) => path.to_string_lossy().into_owned(),
            ImageSource::Remote(url) => url.clone(),
        };
        if name.contains("broken") {
            return Err(RenderError::Unsupported(name));
        }

        let variant = |format: ImageFormat, width: u32| Variant {
            url: format!("{}/shapes-{width}w.{}", request.url_path, format.extension()),
            width,
            height: width,
            source_type: format.mime().to_string(),
        };

        if name.ends_with(".svg") {
            return Ok(RenderResult::ShortCircuit(variant(ImageFormat::Svg, 300)));
        }

        let formats: IndexMap<_, _> = request
            .formats
            .iter()
            .filter(|format| !format.is_vector())
            .map(|&format| {
                let variants = request.widths.iter().map(|&w| variant(format, w)).collect();
                (format, variants)
            })
            .collect();
        Ok(RenderResult::Formats(formats))
    }
}

fn options() -> TransformOptions {
    TransformOptions {
        input_dir: "tests/fixtures".into(),
        url_path: "/images".to_string(),
        formats: vec![ImageFormat::Avif, ImageFormat::Webp, ImageFormat::Jpeg],
        dry_run: true,
        ..Default::default()
    }
}

fn transformer(options: TransformOptions) -> Img2Picture<FakeRenderer> {
    Img2Picture::with_renderer(options, FakeRenderer::default()).unwrap()
}

const LADDER: &[u32] = &[150, 300, 450, 600, 750, 900, 1050, 1200, 1350];

fn srcset(ext: &str, widths: &[u32]) -> String {
    widths
        .iter()
        .map(|w| format!("/images/shapes-{w}w.{ext} {w}w"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn sources(exts: &[(&str, &str)], widths: &[u32], sizes: &str) -> String {
    exts.iter()
        .map(|(mime, ext)| {
            format!(
                r#"<source type="{mime}" srcset="{}" sizes="{sizes}">"#,
                srcset(ext, widths)
            )
        })
        .collect()
}

const AWJ: &[(&str, &str)] = &[
    ("image/avif", "avif"),
    ("image/webp", "webp"),
    ("image/jpeg", "jpeg"),
];

#[test]
fn test_hoist_class_onto_picture() {
    let input = r#"<img class="w-full" src="/assets/shapes.png" alt="Shapes">"#;
    let expected = format!(
        r#"<picture class="w-full">{}<img src="/images/shapes-750w.jpeg" width="1350" height="1350" alt="Shapes" sizes="100vw" loading="lazy" decoding="async"></picture>"#,
        sources(AWJ, LADDER, "100vw")
    );

    let result = transformer(options()).transform(input, "file.html").unwrap();
    assert_eq!(result, expected);
}

#[test]
fn test_element_sizes_on_sources_and_img() {
    let input =
        r#"<img src="/assets/shapes.png" sizes="(min-width: 60em) 75vw, 100vw" alt="Shapes">"#;
    let sizes = "(min-width: 60em) 75vw, 100vw";
    let expected = format!(
        r#"<picture>{}<img src="/images/shapes-750w.jpeg" width="1350" height="1350" sizes="{sizes}" alt="Shapes" loading="lazy" decoding="async"></picture>"#,
        sources(AWJ, LADDER, sizes)
    );

    let result = transformer(options()).transform(input, "file.html").unwrap();
    assert_eq!(result, expected);
}

#[test]
fn test_retain_loading_and_decoding() {
    let input = r#"<img src="/assets/shapes.png" loading="eager" decoding="auto" alt="Shapes">"#;
    let result = transformer(options()).transform(input, "file.html").unwrap();
    assert!(result.ends_with(
        r#"<img src="/images/shapes-750w.jpeg" width="1350" height="1350" loading="eager" decoding="auto" alt="Shapes" sizes="100vw"></picture>"#
    ));
}

#[test]
fn test_retain_data_and_aria_attributes() {
    let input =
        r#"<img src="/assets/shapes.png" alt="Shapes" data-size="full" aria-label="An icon">"#;
    let result = transformer(options()).transform(input, "file.html").unwrap();
    assert!(result.ends_with(
        r#"<img src="/images/shapes-750w.jpeg" width="1350" height="1350" alt="Shapes" data-size="full" aria-label="An icon" sizes="100vw" loading="lazy" decoding="async"></picture>"#
    ));
}

#[test]
fn test_width_override() {
    let input = r#"<img src="/assets/shapes.png" alt="Shapes" data-img2picture-widths="100,150,200,250,300">"#;
    let widths = [100, 150, 200, 250, 300];
    let expected = format!(
        r#"<picture>{}<img src="/images/shapes-200w.jpeg" width="300" height="300" alt="Shapes" sizes="100vw" loading="lazy" decoding="async"></picture>"#,
        sources(AWJ, &widths, "100vw")
    );

    let t = transformer(options());
    assert_eq!(t.transform(input, "file.html").unwrap(), expected);
    assert_eq!(t.renderer.calls()[0].1, widths);
}

#[test]
fn test_invalid_width_override_fails() {
    let input = r#"<img src="/assets/shapes.png" data-img2picture-widths="100,wide">"#;
    let err = transformer(options())
        .transform(input, "file.html")
        .unwrap_err();
    assert!(matches!(
        err,
        TransformError::Widths { ref src, .. } if src == "/assets/shapes.png"
    ));
}

#[test]
fn test_picture_class_marker() {
    let mut opts = options();
    opts.picture_class = Some("responsive".to_string());
    let t = transformer(opts);

    let result = t
        .transform(r#"<img src="/a.png" alt="" class="rounded">"#, "file.html")
        .unwrap();
    assert!(result.starts_with(r#"<picture class="responsive rounded"><source"#));

    let result = t
        .transform(
            r#"<img src="/a.png" alt="" data-img2picture-picture-class="hero">"#,
            "file.html",
        )
        .unwrap();
    assert!(result.starts_with(r#"<picture class="hero"><source"#));
    assert!(!result.contains("data-img2picture"));
}

#[test]
fn test_ignore_marker_leaves_element_untouched() {
    let input = r#"<img src="/assets/shapes.png" alt="Shapes" data-img2picture-ignore>"#;
    let t = transformer(options());
    assert_eq!(t.transform(input, "file.html").unwrap(), input);

    let input = r#"<img src="/assets/shapes.png" data-img2picture-ignore="false">"#;
    assert_eq!(t.transform(input, "file.html").unwrap(), input);
    assert!(t.renderer.calls().is_empty());
}

#[test]
fn test_images_inside_picture_untouched() {
    let input = r#"<picture><source srcset="/a.webp" type="image/webp"><img src="/assets/shapes.png" alt=""></picture>"#;
    let t = transformer(options());
    assert_eq!(t.transform(input, "file.html").unwrap(), input);
    assert!(t.renderer.calls().is_empty());
}

#[test]
fn test_non_html_output_unchanged() {
    let input = r#"<img src="/assets/shapes.png" alt="Shapes">"#;
    let t = transformer(options());
    assert_eq!(t.transform(input, "feed.xml").unwrap(), input);
    assert_eq!(t.transform(input, "styles.css").unwrap(), input);
    assert!(t.renderer.calls().is_empty());

    assert!(t.transform(input, "OLD/PAGE.HTM").unwrap().starts_with("<picture>"));
}

#[test]
fn test_disallowed_extensions_untouched() {
    let input = r#"<img src="/anim.gif" alt=""><img src="//cdn.example.com/a.png" alt="">"#;
    let t = transformer(options());
    assert_eq!(t.transform(input, "file.html").unwrap(), input);
    assert!(t.renderer.calls().is_empty());
}

#[test]
fn test_remote_images() {
    let input = r#"<img src="https://example.com/images/shapes.png?v=1" alt="Shapes">"#;

    let t = transformer(options());
    assert_eq!(t.transform(input, "file.html").unwrap(), input);
    assert!(t.renderer.calls().is_empty());

    let mut opts = options();
    opts.fetch_remote = true;
    let t = transformer(opts);
    let result = t.transform(input, "file.html").unwrap();
    assert!(result.starts_with("<picture><source"));
    assert_eq!(
        t.renderer.calls()[0].0,
        ImageSource::Remote("https://example.com/images/shapes.png?v=1".to_string())
    );
}

#[test]
fn test_local_source_resolved_against_input_dir() {
    let t = transformer(options());
    t.transform(r#"<img src="/assets/shapes.png" alt="">"#, "index.html")
        .unwrap();
    assert_eq!(
        t.renderer.calls(),
        vec![(
            ImageSource::Local("tests/fixtures/assets/shapes.png".into()),
            LADDER.to_vec()
        )]
    );
}

#[test]
fn test_alt_missing_and_empty() {
    let t = transformer(options());
    let missing = t
        .transform(r#"<img src="/assets/shapes.png">"#, "file.html")
        .unwrap();
    assert!(missing.contains(r#"height="1350" alt="" sizes="100vw""#));

    let empty = t
        .transform(r#"<img src="/assets/shapes.png" alt="">"#, "file.html")
        .unwrap();
    assert_eq!(missing, empty);
}

#[test]
fn test_svg_short_circuit() {
    let input = r#"<img class="logo" src="/assets/logo.svg" alt="Logo">"#;
    let result = transformer(options()).transform(input, "file.html").unwrap();
    assert_eq!(
        result,
        r#"<img src="/images/shapes-300w.svg" width="300" height="300" class="logo" alt="Logo" loading="lazy" decoding="async">"#
    );
}

#[test]
fn test_fallback_to_last_available_format() {
    let mut opts = options();
    opts.formats = vec![ImageFormat::Avif, ImageFormat::Webp, ImageFormat::Svg];
    let input = r#"<img src="/assets/shapes.png" alt="Shapes">"#;
    let expected = format!(
        r#"<picture>{}<img src="/images/shapes-750w.webp" width="1350" height="1350" alt="Shapes" sizes="100vw" loading="lazy" decoding="async"></picture>"#,
        sources(&AWJ[..2], LADDER, "100vw")
    );

    let result = transformer(opts).transform(input, "file.html").unwrap();
    assert_eq!(result, expected);
}

#[test]
fn test_surrounding_markup_preserved() {
    let input = "<!DOCTYPE html>\n<html><head><title>T</title></head>\n<body>\n  <p>Before</p>\n  <img src=\"/assets/shapes.png\" alt=\"\">\n  <p>After &amp; more</p>\n</body></html>\n";
    let result = transformer(options()).transform(input, "index.html").unwrap();

    assert!(result.starts_with(
        "<!DOCTYPE html>\n<html><head><title>T</title></head>\n<body>\n  <p>Before</p>\n  <picture><source"
    ));
    assert!(result.ends_with("</picture>\n  <p>After &amp; more</p>\n</body></html>\n"));
}

#[test]
fn test_fragment_is_not_wrapped() {
    let input = r#"<p>Text</p><img src="/assets/shapes.png" alt="">"#;
    let result = transformer(options()).transform(input, "file.html").unwrap();
    assert!(result.starts_with("<p>Text</p><picture>"));
    assert!(!result.contains("<body>"));
}

#[test]
fn test_multiple_images_keep_document_order() {
    let input: String = (1..=8)
        .map(|i| format!(r#"<p>{i}</p><img src="/assets/shapes.png" alt="img {i}">"#))
        .collect();
    let result = transformer(options()).transform(&input, "file.html").unwrap();

    assert_eq!(result.matches("<picture>").count(), 8);
    let positions: Vec<usize> = (1..=8)
        .map(|i| result.find(&format!(r#"alt="img {i}""#)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(result.starts_with("<p>1</p><picture>"));
}

#[test]
fn test_second_run_is_a_no_op() {
    let t = transformer(options());
    let input = r#"<div><img class="a" src="/assets/shapes.png" alt="x"><img src="/assets/logo.svg" alt="y"></div>"#;
    let once = t.transform(input, "file.html").unwrap();
    assert!(once.contains(r#"<img src="/images/shapes-300w.svg""#));
    assert_eq!(t.renderer.calls().len(), 2);

    let twice = t.transform(&once, "file.html").unwrap();
    assert_eq!(once, twice);
    assert_eq!(t.renderer.calls().len(), 2);
}

#[test]
fn test_img_in_script_and_comment_untouched() {
    let input = r#"<script>var s = '<img src="/assets/shapes.png" alt="">';</script><!-- <img src="/assets/shapes.png"> --><noscript>x</noscript>"#;
    let t = transformer(options());
    assert_eq!(t.transform(input, "file.html").unwrap(), input);
    assert!(t.renderer.calls().is_empty());
}

#[test]
fn test_empty_sizes_and_loading_use_defaults() {
    let input = r#"<img src="/assets/shapes.png" alt="" sizes="" loading="">"#;
    let result = transformer(options()).transform(input, "file.html").unwrap();
    assert!(!result.contains(r#"sizes="""#));
    assert!(!result.contains(r#"loading="""#));
    assert!(result.ends_with(
        r#"height="1350" alt="" sizes="100vw" loading="lazy" decoding="async"></picture>"#
    ));
}

#[test]
fn test_render_failure_fails_document() {
    let input = r#"<img src="/assets/shapes.png" alt=""><img src="/assets/broken.png" alt="">"#;
    let err = transformer(options())
        .transform(input, "file.html")
        .unwrap_err();
    assert!(matches!(
        err,
        TransformError::Render { ref src, .. } if src == "/assets/broken.png"
    ));
}

#[test]
fn test_invalid_options_fail_at_construction() {
    let mut opts = options();
    opts.formats.clear();
    assert!(matches!(
        Img2Picture::with_renderer(opts, FakeRenderer::default()),
        Err(TransformError::Config(ConfigError::Invalid(_)))
    ));

    let mut opts = options();
    opts.width_step = 0;
    assert!(Img2Picture::with_renderer(opts, FakeRenderer::default()).is_err());
}

#[test]
fn test_default_ladder() {
    let t = transformer(options());
    assert_eq!(t.widths(), LADDER);
    assert!(Img2Picture::new(TransformOptions::default()).is_ok());
}

#[test]
fn test_splice() {
    let html = "aXbYc";
    let out = splice(html, &[(1..2, "11".to_string()), (3..4, "22".to_string())]);
    assert_eq!(out, "a11b22c");
    assert_eq!(splice(html, &[]), html);
}
