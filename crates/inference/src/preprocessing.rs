use image::imageops::FilterType;
use ndarray::{Array, IxDyn};
use std::path::Path;

/// Load the image at `path` and produce the model input tensors.
///
/// Returns the NCHW float tensor ([1, 3, H, W], values scaled to 0..1) and
/// the [1, 2] original-size tensor ([width, height]) the model uses to emit
/// boxes in the original image's coordinate frame.
pub fn prepare_image(
    path: &Path,
    input_size: (u32, u32),
) -> Result<(Array<f32, IxDyn>, Array<i64, IxDyn>), image::ImageError> {
    let img = image::open(path)?.to_rgb8();
    let (orig_width, orig_height) = img.dimensions();

    let (input_width, input_height) = input_size;
    let resized = image::imageops::resize(&img, input_width, input_height, FilterType::Triangle);

    let mut input = Array::zeros(IxDyn(&[1, 3, input_height as usize, input_width as usize]));
    for y in 0..input_height {
        for x in 0..input_width {
            let pixel = resized.get_pixel(x, y);
            input[[0, 0, y as usize, x as usize]] = pixel[0] as f32 / 255.0;
            input[[0, 1, y as usize, x as usize]] = pixel[1] as f32 / 255.0;
            input[[0, 2, y as usize, x as usize]] = pixel[2] as f32 / 255.0;
        }
    }

    let orig_sizes = ndarray::arr2(&[[orig_width as i64, orig_height as i64]]).into_dyn();

    Ok((input, orig_sizes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_tensor_shapes_and_original_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.png");
        RgbImage::from_pixel(8, 6, Rgb([255, 0, 0])).save(&path).unwrap();

        let (input, orig_sizes) = prepare_image(&path, (32, 32)).unwrap();

        assert_eq!(
            input.shape(),
            &[1, 3, 32, 32],
            "Input tensor should be NCHW at the requested size"
        );
        assert_eq!(
            orig_sizes.shape(),
            &[1, 2],
            "Original-size tensor should be [1, 2]"
        );
        assert_eq!(orig_sizes[[0, 0]], 8, "Width comes first");
        assert_eq!(orig_sizes[[0, 1]], 6, "Height comes second");
    }

    #[test]
    fn test_pixel_values_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("white.png");
        RgbImage::from_pixel(4, 4, Rgb([255, 255, 255])).save(&path).unwrap();

        let (input, _) = prepare_image(&path, (4, 4)).unwrap();

        assert!(
            (input[[0, 0, 0, 0]] - 1.0).abs() < 1e-6,
            "White pixels should normalize to 1.0, got {}",
            input[[0, 0, 0, 0]]
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does_not_exist.png");

        assert!(
            prepare_image(&path, (32, 32)).is_err(),
            "A missing image file should surface as an error"
        );
    }
}
