use super::*;

fn checker(w: u32, h: u32) -> Bitmap {
    let mut rgba = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let v = if (x / 4 + y / 4) % 2 == 0 { 230 } else { 40 };
            rgba.extend_from_slice(&[v, v / 2, 255 - v, 255]);
        }
    }
    Bitmap::from_straight_rgba8(w, h, rgba).unwrap()
}

#[test]
fn zero_area_source_is_render_error() {
    let mut c = Compositor::new(None);
    for (w, h) in [(0, 0), (0, 10), (10, 0)] {
        let src = Bitmap::from_premul_rgba8(w, h, Vec::new()).unwrap();
        let err = c.composite(&src, &WatermarkSpec::default()).unwrap_err();
        assert!(matches!(err, IdmarkError::Render(_)), "{w}x{h}");
    }
}

#[test]
fn oversized_source_is_render_error() {
    let mut c = Compositor::new(None);
    let src = Bitmap::solid(MAX_SURFACE_DIM + 1, 1, [0, 0, 0, 255]);
    let err = c.composite(&src, &WatermarkSpec::default()).unwrap_err();
    assert!(err.to_string().contains("too large"));
}

#[test]
fn without_font_output_matches_source() {
    let mut c = Compositor::new(None);
    let src = checker(33, 17);
    let out = c.composite(&src, &WatermarkSpec::new("VOID")).unwrap();

    assert_eq!((out.width(), out.height()), (33, 17));
    assert_eq!(out.measurement().text_width, 0.0);
    assert_eq!(out.bitmap(), &src);
    assert_eq!(&out.png()[..4], b"\x89PNG");
}

#[test]
fn measurement_resolves_text_and_font_size() {
    let mut c = Compositor::new(None);
    let m = c.measure(1000, 1000, &WatermarkSpec::new("  ")).unwrap();
    assert_eq!(m.text, "CONFIDENTIAL");
    assert_eq!(m.font_size_px, 40.0);
    assert_eq!(m.font_family, None);
    assert!(m.plan.row_step.is_finite());

    let m = c.measure(250, 250, &WatermarkSpec::new("ID")).unwrap();
    assert_eq!(m.text, "ID");
    assert_eq!(m.font_size_px, 12.0);
}

#[test]
fn missing_font_file_fails_construction() {
    let settings = Settings {
        font_file: Some(std::path::PathBuf::from("target/nope/missing.ttf")),
        font_dirs: Vec::new(),
    };
    assert!(matches!(
        Compositor::from_settings(&settings),
        Err(IdmarkError::Render(_))
    ));
}
