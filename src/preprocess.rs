use crate::error::PredictError;
use image::imageops::FilterType;
use ndarray::Array4;

/// Side length the classifier was trained on. Changing this without
/// retraining the model artifact makes predictions meaningless.
pub const IMG_SIZE: u32 = 150;

/// Decodes raw image bytes and produces the model input tensor:
/// RGB, resized to 150x150, pixel values scaled to [0, 1], with a
/// leading batch dimension of 1 (NHWC).
pub fn image_to_tensor(bytes: &[u8]) -> Result<Array4<f32>, PredictError> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = decoded
        .resize_exact(IMG_SIZE, IMG_SIZE, FilterType::Triangle)
        .to_rgb8();

    let tensor = Array4::from_shape_fn(
        (1, IMG_SIZE as usize, IMG_SIZE as usize, 3),
        |(_, y, x, c)| f32::from(rgb.get_pixel(x as u32, y as u32)[c]) / 255.0,
    );
    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn tensor_shape_is_fixed_regardless_of_input_size() {
        for (w, h) in [(1, 1), (64, 48), (150, 150), (1024, 300)] {
            let tensor = image_to_tensor(&png_bytes(w, h)).unwrap();
            assert_eq!(tensor.shape(), &[1, 150, 150, 3]);
        }
    }

    #[test]
    fn tensor_values_are_normalized() {
        let tensor = image_to_tensor(&png_bytes(200, 200)).unwrap();
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn junk_bytes_fail_with_decode_error() {
        let err = image_to_tensor(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PredictError::Decode(_)));
    }
}
