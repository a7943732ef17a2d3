use crate::backend::{InferenceBackend, InferenceOutput};
use crate::errors::DetectError;
use crate::{labels, preprocessing};
use std::path::Path;
use std::sync::Mutex;

/// One predicted object instance, in the original image's coordinate frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub class: String,
    pub confidence: f32,
    pub bbox: [f32; 4],
}

/// Object-safe detection seam consumed by the serving layer.
///
/// The handle is constructed once at startup and shared for the process
/// lifetime; tests substitute their own implementation.
pub trait Detect: Send + Sync {
    fn detect(&self, image_path: &Path) -> Result<Vec<Detection>, DetectError>;
}

pub struct Detector<B> {
    backend: Mutex<B>,
    input_size: (u32, u32),
}

impl<B: InferenceBackend> Detector<B> {
    pub fn new(backend: B, input_size: (u32, u32)) -> Self {
        Self {
            backend: Mutex::new(backend),
            input_size,
        }
    }
}

impl<B: InferenceBackend> Detect for Detector<B> {
    fn detect(&self, image_path: &Path) -> Result<Vec<Detection>, DetectError> {
        let (images, orig_sizes) = preprocessing::prepare_image(image_path, self.input_size)?;

        let outputs = {
            let mut backend = self.backend.lock().map_err(|_| DetectError::Poisoned)?;
            backend
                .infer(&images, &orig_sizes)
                .map_err(DetectError::Inference)?
        };

        let mut detections = Vec::new();
        for output in &outputs {
            normalize_output(output, &mut detections)?;
        }

        tracing::debug!(detections = detections.len(), "Inference complete");
        Ok(detections)
    }
}

/// Zip one image's parallel output sequences into detection records.
///
/// The three sequences are index-aligned by the model; a length mismatch
/// means the output cannot be trusted and is rejected outright rather than
/// truncated to the shortest sequence.
fn normalize_output(
    output: &InferenceOutput,
    detections: &mut Vec<Detection>,
) -> Result<(), DetectError> {
    if output.labels.len() != output.boxes.len() || output.labels.len() != output.scores.len() {
        return Err(DetectError::LengthMismatch {
            labels: output.labels.len(),
            boxes: output.boxes.len(),
            scores: output.scores.len(),
        });
    }

    for ((label, bbox), score) in output.labels.iter().zip(&output.boxes).zip(&output.scores) {
        detections.push(Detection {
            class: labels::class_name(*label),
            confidence: *score,
            bbox: *bbox,
        });
    }

    Ok(())
}
