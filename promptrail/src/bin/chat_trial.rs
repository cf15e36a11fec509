//! One traced chat call.

use promptrail::{chat, ModelConfig, Settings, TracedModel, DEFAULT_MODEL_ID};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load();
    settings.init_logging();

    let tracer = settings.tracer();
    let model = TracedModel::new(settings.bedrock_model().await?, tracer.clone());
    let config = ModelConfig::new(DEFAULT_MODEL_ID, 1.0)?;

    let reply = chat(&model, &config, "こんにちは").await;
    tracer.flush(Duration::from_secs(5)).await;

    println!("{}", reply?.pretty());
    Ok(())
}
