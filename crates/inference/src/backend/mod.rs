use ndarray::{Array, IxDyn};

pub mod ort;

/// Raw model output for a single submitted image: three parallel sequences,
/// index-aligned by the model.
///
/// Boxes are [x1, y1, x2, y2] in absolute pixel coordinates of the original
/// image's frame.
#[derive(Debug, Clone, Default)]
pub struct InferenceOutput {
    pub labels: Vec<i64>,
    pub boxes: Vec<[f32; 4]>,
    pub scores: Vec<f32>,
}

pub trait InferenceBackend: Send {
    /// Run inference, returning one output per submitted image.
    fn infer(
        &mut self,
        images: &Array<f32, IxDyn>,
        orig_sizes: &Array<i64, IxDyn>,
    ) -> anyhow::Result<Vec<InferenceOutput>>;
}
