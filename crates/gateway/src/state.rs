use inference::Detect;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared per-process state handed to every request handler.
///
/// `detector` is `None` when the model failed to load at startup; requests
/// then degrade to the model-unavailable message instead of failing.
#[derive(Clone)]
pub struct AppState {
    pub detector: Option<Arc<dyn Detect>>,
    pub upload_dir: PathBuf,
}
