use std::path::Path;

use image::RgbImage;
use tract_core::internal::*;

use crate::config::{InputSpec, Layout};
use crate::errors::ClassifyError;

/// Decodes the image at `path` and turns it into a model input tensor.
///
/// Fails with `ClassifyError::Decode` if the file is missing or can not be
/// decoded.
pub fn load_image(path: impl AsRef<Path>, spec: &InputSpec) -> TractResult<Tensor> {
    let path = path.as_ref();
    let image = image::open(path)
        .with_context(|| format!("Opening image {path:?}"))
        .map_err(ClassifyError::Decode)?;
    debug!("Decoded {:?}: {}x{} {:?}", path, image.width(), image.height(), image.color());
    Ok(image_to_tensor(&image.to_rgb8(), spec))
}

/// Resizes to the input resolution, ignoring aspect ratio, and scales
/// intensities to [0, 1]. The result holds a batch of one.
pub fn image_to_tensor(image: &RgbImage, spec: &InputSpec) -> Tensor {
    let resized = image::imageops::resize(
        image,
        spec.width as u32,
        spec.height as u32,
        spec.filter.filter_type(),
    );
    let value = |x: usize, y: usize, c: usize| resized[(x as _, y as _)][c] as f32 / 255.0;
    let shape = spec.shape();
    match spec.layout {
        Layout::Nhwc => tract_ndarray::Array4::from_shape_fn(
            (shape[0], shape[1], shape[2], shape[3]),
            |(_, y, x, c)| value(x, y, c),
        )
        .into_tensor(),
        Layout::Nchw => tract_ndarray::Array4::from_shape_fn(
            (shape[0], shape[1], shape[2], shape[3]),
            |(_, c, y, x)| value(x, y, c),
        )
        .into_tensor(),
    }
}
