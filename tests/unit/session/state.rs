use std::io::Cursor;

use super::*;
use crate::intake::{decode::NoPdfRasterizer, upload::MAX_UPLOAD_BYTES};

fn png_upload(name: &str, w: u32, h: u32) -> Upload {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([240, 240, 240, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    Upload {
        name: name.to_string(),
        mime: "image/png".to_string(),
        bytes,
    }
}

#[test]
fn starts_idle() {
    let s = Session::new();
    assert_eq!(s.state().name(), "idle");
    assert!(s.state().document().is_none());
}

#[test]
fn rejected_selection_fails_without_document() {
    let mut s = Session::new();
    s.load(&png_upload("a.png", 2, 2), &NoPdfRasterizer).unwrap();
    assert_eq!(s.state().name(), "ready");

    let err = s.select("notes.txt", "text/plain", 10).unwrap_err();
    assert!(matches!(err, IdmarkError::UnsupportedFileType(_)));
    assert_eq!(s.state().name(), "failed");
    assert!(s.state().document().is_none());

    let err = s
        .select("big.png", "image/png", MAX_UPLOAD_BYTES + 1)
        .unwrap_err();
    assert!(matches!(err, IdmarkError::FileTooLarge { .. }));
}

#[test]
fn progress_is_clamped_and_monotone() {
    let mut s = Session::new();
    let t = s.select("a.png", "image/png", 10).unwrap();
    s.report_progress(t, 40).unwrap();
    s.report_progress(t, 20).unwrap();
    assert!(matches!(s.state(), SessionState::Loading { progress: 40 }));
    s.report_progress(t, 250).unwrap();
    assert!(matches!(s.state(), SessionState::Loading { progress: 100 }));
}

#[test]
fn stale_ticket_is_rejected() {
    let mut s = Session::new();
    let first = s.select("a.png", "image/png", 10).unwrap();
    let second = s.select("b.png", "image/png", 10).unwrap();
    assert_ne!(first, second);

    let err = s
        .finish_load(first, Ok(Bitmap::solid(1, 1, [0, 0, 0, 255])))
        .unwrap_err();
    assert!(matches!(err, IdmarkError::Session(_)));
    assert_eq!(s.state().name(), "loading");

    s.finish_load(second, Ok(Bitmap::solid(2, 3, [0, 0, 0, 255])))
        .unwrap();
    let doc = s.state().document().unwrap();
    assert_eq!(doc.name, "b.png");
    assert_eq!(doc.source.height(), 3);
}

#[test]
fn reset_invalidates_pending_load() {
    let mut s = Session::new();
    let t = s.select("a.png", "image/png", 10).unwrap();
    s.reset();
    assert!(s.finish_load(t, Ok(Bitmap::solid(1, 1, [0; 4]))).is_err());
    assert_eq!(s.state().name(), "idle");
}

#[test]
fn decode_failure_moves_to_failed() {
    let mut s = Session::new();
    let t = s.select("a.png", "image/png", 10).unwrap();
    let err = s
        .finish_load(t, Err(IdmarkError::decode("corrupt")))
        .unwrap_err();
    assert!(matches!(err, IdmarkError::Decode(_)));
    match s.state() {
        SessionState::Failed { reason, document } => {
            assert!(reason.contains("corrupt"));
            assert!(document.is_none());
        }
        other => panic!("unexpected state {}", other.name()),
    }
}

#[test]
fn apply_and_download() {
    let mut s = Session::new();
    let mut c = Compositor::new(None);

    assert!(matches!(
        s.apply(&mut c, &WatermarkSpec::default()).unwrap_err(),
        IdmarkError::Session(_)
    ));
    assert!(s.download().is_err());

    s.load(&png_upload("scan", 8, 5), &NoPdfRasterizer).unwrap();
    let out = s.apply(&mut c, &WatermarkSpec::new("VOID")).unwrap();
    assert_eq!((out.width(), out.height()), (8, 5));
    assert_eq!(s.state().name(), "watermarked");

    let dl = s.download().unwrap();
    assert_eq!(dl.file_name, "scan_watermarked.png");
    assert_eq!(&dl.bytes[..4], b"\x89PNG");

    // Re-applying starts again from the original source.
    s.apply(&mut c, &WatermarkSpec::new("OTHER")).unwrap();
    assert_eq!(s.state().name(), "watermarked");
}

#[test]
fn render_failure_keeps_document_for_retry() {
    let mut s = Session::new();
    let t = s.select("empty.png", "image/png", 10).unwrap();
    s.finish_load(t, Ok(Bitmap::from_premul_rgba8(0, 0, Vec::new()).unwrap()))
        .unwrap();

    let mut c = Compositor::new(None);
    let err = s.apply(&mut c, &WatermarkSpec::default()).unwrap_err();
    assert!(matches!(err, IdmarkError::Render(_)));
    assert_eq!(s.state().name(), "failed");
    assert!(s.state().document().is_some());
    assert!(s.download().is_err());

    // The action can be re-invoked; it fails the same way but stays recoverable.
    assert!(s.apply(&mut c, &WatermarkSpec::default()).is_err());
    assert!(s.state().document().is_some());
}

#[test]
fn pdf_without_rasterizer_fails_as_decode() {
    let mut s = Session::new();
    let upload = Upload {
        name: "passport.pdf".to_string(),
        mime: "application/pdf".to_string(),
        bytes: b"%PDF-1.4".to_vec(),
    };
    let err = s.load(&upload, &NoPdfRasterizer).unwrap_err();
    assert!(matches!(err, IdmarkError::Decode(_)));
    assert_eq!(s.state().name(), "failed");
}
