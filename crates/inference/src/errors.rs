use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("failed to read image: {0}")]
    Image(#[from] image::ImageError),

    #[error("inference failed: {0}")]
    Inference(#[source] anyhow::Error),

    #[error("model output length mismatch: {labels} labels, {boxes} boxes, {scores} scores")]
    LengthMismatch {
        labels: usize,
        boxes: usize,
        scores: usize,
    },

    #[error("inference backend poisoned by an earlier panic")]
    Poisoned,
}
