use super::{InferenceBackend, InferenceOutput};
use ndarray::{Array, IxDyn};
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};

pub struct OrtBackend {
    session: Session,
    confidence_threshold: f32,
}

impl OrtBackend {
    /// Build an ONNX Runtime session for the detection model at `path`.
    ///
    /// Queries scoring below `confidence_threshold` are dropped from the
    /// output, so callers only see what the model considers detected.
    pub fn load_model(path: &str, confidence_threshold: f32) -> anyhow::Result<Self> {
        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(path)?;

        tracing::info!("Model loaded from {}", path);
        Ok(Self {
            session,
            confidence_threshold,
        })
    }
}

impl InferenceBackend for OrtBackend {
    fn infer(
        &mut self,
        images: &Array<f32, IxDyn>,
        orig_sizes: &Array<i64, IxDyn>,
    ) -> anyhow::Result<Vec<InferenceOutput>> {
        let outputs = self.session.run(ort::inputs![
            "images" => TensorRef::from_array_view(images.view())?,
            "orig_target_sizes" => TensorRef::from_array_view(orig_sizes.view())?
        ])?;

        let labels = outputs["labels"].try_extract_array::<i64>()?;
        let boxes = outputs["boxes"].try_extract_array::<f32>()?;
        let scores = outputs["scores"].try_extract_array::<f32>()?;

        // Expected shapes: labels [batch, n], boxes [batch, n, 4], scores [batch, n]
        if labels.ndim() != 2 || scores.shape() != labels.shape() {
            anyhow::bail!(
                "unexpected output shapes: labels {:?}, scores {:?}",
                labels.shape(),
                scores.shape()
            );
        }
        if boxes.ndim() != 3 || boxes.shape()[..2] != labels.shape()[..] || boxes.shape()[2] != 4 {
            anyhow::bail!("unexpected boxes shape: {:?}", boxes.shape());
        }

        let batch = labels.shape()[0];
        let num_queries = labels.shape()[1];

        let mut results = Vec::with_capacity(batch);
        for b in 0..batch {
            let mut output = InferenceOutput::default();

            for i in 0..num_queries {
                let confidence = scores[[b, i]];
                if confidence < self.confidence_threshold {
                    continue;
                }

                output.labels.push(labels[[b, i]]);
                output.scores.push(confidence);
                output.boxes.push([
                    boxes[[b, i, 0]],
                    boxes[[b, i, 1]],
                    boxes[[b, i, 2]],
                    boxes[[b, i, 3]],
                ]);
            }

            results.push(output);
        }

        Ok(results)
    }
}
