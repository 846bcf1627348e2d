use image::ImageFormat;
use std::io::Cursor;

use crate::error::AppError;

pub const THUMBNAIL_MAX_DIM: u32 = 512;

/// Turns an uploaded image into a bounded JPEG preview. Payloads the image
/// crate cannot decode are a validation error, not a server fault.
pub fn make_thumbnail(data: &[u8]) -> Result<(Vec<u8>, &'static str), AppError> {
    let mut img = image::load_from_memory(data)
        .map_err(|e| AppError::BadRequest(format!("Failed to load image: {}", e)))?;

    let filter = image::imageops::FilterType::Lanczos3;
    if img.width() > THUMBNAIL_MAX_DIM || img.height() > THUMBNAIL_MAX_DIM {
        img = img.resize(THUMBNAIL_MAX_DIM, THUMBNAIL_MAX_DIM, filter);
    }

    // JPEG has no alpha channel.
    let img = image::DynamicImage::ImageRgb8(img.to_rgb8());

    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| AppError::InternalServerError(format!("Failed to encode thumbnail: {}", e)))?;

    Ok((buffer.into_inner(), "jpg"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([180, 40, 40, 255]),
        ));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn oversized_images_are_scaled_down() {
        let (thumb, ext) = make_thumbnail(&png_bytes(1024, 768)).unwrap();
        assert_eq!(ext, "jpg");

        let decoded = image::load_from_memory(&thumb).unwrap();
        assert!(decoded.width() <= THUMBNAIL_MAX_DIM);
        assert!(decoded.height() <= THUMBNAIL_MAX_DIM);
    }

    #[test]
    fn small_images_keep_their_dimensions() {
        let (thumb, _) = make_thumbnail(&png_bytes(64, 48)).unwrap();
        let decoded = image::load_from_memory(&thumb).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn non_image_payloads_are_rejected() {
        assert!(make_thumbnail(b"definitely not an image").is_err());
    }
}
