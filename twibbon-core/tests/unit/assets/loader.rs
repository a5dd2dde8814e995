use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn user_photo_failure_is_classified() {
    let err = decode_user_photo(b"nope").unwrap_err();
    assert!(matches!(err, TwibbonError::UserImageDecode(_)));
    assert!(err.to_string().contains("decode image from memory"));
}

#[test]
fn frame_failure_is_classified() {
    let frame = FrameAsset::Bytes(Arc::from(&b"nope"[..]));
    let err = decode_frame(&frame).unwrap_err();
    assert!(matches!(err, TwibbonError::FrameAssetDecode(_)));
}

#[test]
fn missing_frame_file_is_a_frame_error() {
    let frame = FrameAsset::Path(PathBuf::from("target/missing-dir/twibbon.png"));
    let err = decode_frame(&frame).unwrap_err();
    assert!(matches!(err, TwibbonError::FrameAssetDecode(_)));
    assert!(err.to_string().contains("missing-dir"));
}

#[test]
fn frame_path_is_reread() {
    let dir = PathBuf::from("target").join("loader_reread");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("frame.png");

    std::fs::write(&path, png_bytes(2, 2, [255, 0, 0, 255])).unwrap();
    let frame = FrameAsset::from(path.clone());
    assert_eq!(decode_frame(&frame).unwrap().width, 2);

    std::fs::write(&path, png_bytes(3, 1, [255, 0, 0, 255])).unwrap();
    let again = decode_frame(&frame).unwrap();
    assert_eq!((again.width, again.height), (3, 1));
}

#[test]
fn pair_reports_each_side_independently() {
    let good = png_bytes(4, 3, [0, 255, 0, 255]);
    let frame = FrameAsset::Bytes(Arc::from(png_bytes(8, 8, [0, 0, 0, 0]).as_slice()));

    let (user, frame_res) = decode_pair(&good, &frame);
    assert_eq!(user.unwrap().width, 4);
    assert_eq!(frame_res.unwrap().width, 8);

    let (user, frame_res) = decode_pair(b"bad", &frame);
    assert!(matches!(user, Err(TwibbonError::UserImageDecode(_))));
    assert!(frame_res.is_ok());
}
