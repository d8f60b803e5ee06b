use super::*;

#[test]
fn png_has_signature_and_dimensions() {
    let bmp = Bitmap::solid(7, 3, [255, 0, 0, 255]);
    let png = encode_png(&bmp).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

    let back = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (7, 3));
    assert_eq!(back.get_pixel(6, 2).0, [255, 0, 0, 255]);
}

#[test]
fn translucent_pixels_are_written_straight() {
    let bmp = Bitmap::solid(1, 1, [200, 100, 0, 128]);
    let png = encode_png(&bmp).unwrap();
    let px = image::load_from_memory(&png).unwrap().to_rgba8().get_pixel(0, 0).0;
    assert_eq!(px[3], 128);
    assert!((i16::from(px[0]) - 200).abs() <= 2);
    assert!((i16::from(px[1]) - 100).abs() <= 2);
}
