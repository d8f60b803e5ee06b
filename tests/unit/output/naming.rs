use super::*;

#[test]
fn pdf_always_becomes_png() {
    assert_eq!(
        download_file_name("passport.pdf", DocumentKind::Pdf),
        "passport_watermarked.png"
    );
    assert_eq!(
        download_file_name("scan.PDF", DocumentKind::Pdf),
        "scan_watermarked.png"
    );
}

#[test]
fn pdf_without_extension_uses_fallback_base() {
    assert_eq!(
        download_file_name("upload", DocumentKind::Pdf),
        "document_watermarked.png"
    );
}

#[test]
fn images_keep_their_extension() {
    assert_eq!(
        download_file_name("id-card.jpeg", DocumentKind::Image),
        "id-card_watermarked.jpeg"
    );
    assert_eq!(
        download_file_name("my.license.webp", DocumentKind::Image),
        "my.license_watermarked.webp"
    );
}

#[test]
fn image_without_extension_falls_back_to_png() {
    assert_eq!(
        download_file_name("scan", DocumentKind::Image),
        "scan_watermarked.png"
    );
    assert_eq!(
        download_file_name("scan.", DocumentKind::Image),
        "scan_watermarked.png"
    );
}

#[test]
fn empty_base_name_uses_fallback() {
    assert_eq!(
        download_file_name(".png", DocumentKind::Image),
        "document_watermarked.png"
    );
    assert_eq!(download_file_name("", DocumentKind::Image), "document_watermarked.png");
}

#[test]
fn directories_are_stripped() {
    assert_eq!(
        download_file_name("/home/u/scans/id.png", DocumentKind::Image),
        "id_watermarked.png"
    );
    assert_eq!(
        download_file_name(r"C:\scans\id.png", DocumentKind::Image),
        "id_watermarked.png"
    );
}

#[test]
fn write_download_creates_directory() {
    let dir = std::path::PathBuf::from("target")
        .join("output_unit")
        .join("nested");
    let _ = std::fs::remove_dir_all(&dir);
    let dl = Download {
        file_name: "a_watermarked.png".to_string(),
        bytes: vec![1, 2, 3],
    };
    let path = write_download(&dir, &dl).unwrap();
    assert_eq!(path, dir.join("a_watermarked.png"));
    assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
}
