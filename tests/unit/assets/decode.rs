use super::*;
use std::path::PathBuf;

fn temp_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("driftshow-decode-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn extension_filter_matches_the_native_set() {
    for ok in [
        "a.jpg", "b.JPEG", "c.png", "d.bmp", "e.gif", "f.webp", "g.tiff", "h.svg",
    ] {
        assert!(supported_extension(Path::new(ok)), "{ok} should be listed");
    }
    for bad in ["a.txt", "b.mp4", "c.xcf", "noext", "d.heic", "e.jp2"] {
        assert!(!supported_extension(Path::new(bad)), "{bad} should be skipped");
    }
}

#[test]
fn avif_requires_the_extended_decoder() {
    assert_eq!(
        supported_extension(Path::new("x.avif")),
        cfg!(feature = "extended-formats")
    );
}

#[test]
fn unknown_extension_reports_unsupported_format() {
    let err = decode_raster(Path::new("shot.xcf")).unwrap_err();
    assert!(matches!(err, DriftError::UnsupportedFormat(_)), "{err}");

    let err = decode_raster(Path::new("no-extension")).unwrap_err();
    assert!(matches!(err, DriftError::UnsupportedFormat(_)), "{err}");
}

#[test]
fn corrupt_file_reports_decode_error() {
    let path = temp_file("corrupt.png");
    std::fs::write(&path, b"definitely not a png").unwrap();
    let err = decode_raster(&path).unwrap_err();
    assert!(matches!(err, DriftError::Decode(_)), "{err}");
}

#[test]
fn png_decodes_to_premultiplied_rgba8() {
    let path = temp_file("solid.png");
    let mut img = image::RgbaImage::new(4, 3);
    for px in img.pixels_mut() {
        *px = image::Rgba([200, 100, 50, 128]);
    }
    img.save(&path).unwrap();

    let raster = decode_raster(&path).unwrap();
    assert_eq!((raster.width, raster.height), (4, 3));
    assert_eq!(raster.rgba8_premul.len(), 4 * 3 * 4);

    // Channels are scaled by alpha/255 with round-half-up.
    let px = &raster.rgba8_premul[0..4];
    assert_eq!(px[3], 128);
    assert_eq!(px[0], ((200u16 * 128 + 127) / 255) as u8);
    assert_eq!(px[1], ((100u16 * 128 + 127) / 255) as u8);
    assert_eq!(px[2], ((50u16 * 128 + 127) / 255) as u8);
}

#[test]
fn svg_rasterizes_into_the_bounding_box() {
    let path = temp_file("box.svg");
    std::fs::write(
        &path,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100">
             <rect width="200" height="100" fill="#ff0000"/>
           </svg>"##,
    )
    .unwrap();

    let raster = decode_raster(&path).unwrap();
    assert_eq!(raster.width, SVG_RASTER_BOX);
    assert_eq!(raster.height, SVG_RASTER_BOX / 2);

    // Center pixel of an opaque red fill.
    let mid = ((raster.height / 2) as usize * raster.width as usize
        + (raster.width / 2) as usize)
        * 4;
    assert_eq!(&raster.rgba8_premul[mid..mid + 4], &[255, 0, 0, 255]);
}

#[test]
fn premultiply_handles_the_alpha_extremes() {
    let mut px = [10, 20, 30, 255, 10, 20, 30, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [10, 20, 30, 255, 0, 0, 0, 0]);
}

#[test]
fn fs_decoder_routes_through_decode_raster() {
    let err = FsDecoder.decode(Path::new("missing.tga")).unwrap_err();
    assert!(matches!(err, DriftError::Decode(_)), "{err}");
}
