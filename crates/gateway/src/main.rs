use gateway::{
    config::GatewayConfig, logging::setup_logging, routes::run_server, state::AppState,
};
use inference::{Detect, Detector, backend::ort::OrtBackend};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env()?;
    setup_logging(&config);

    tracing::info!(
        config = ?config,
        "Loaded configuration"
    );

    std::fs::create_dir_all(&config.upload_dir)?;

    tracing::info!("Loading detection model");
    let detector = match OrtBackend::load_model(&config.model_path, config.confidence_threshold) {
        Ok(backend) => {
            tracing::info!("Model loaded successfully");
            Some(Arc::new(Detector::new(backend, config.input_size)) as Arc<dyn Detect>)
        }
        Err(error) => {
            tracing::error!(
                error = %error,
                model_path = %config.model_path,
                "Failed to load model; serving without detection"
            );
            None
        }
    };

    let state = AppState {
        detector,
        upload_dir: PathBuf::from(&config.upload_dir),
    };

    run_server(&config.http_addr, state).await
}
