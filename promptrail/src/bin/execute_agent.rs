//! Run a search agent configured by the `ai-agent` prompt.

use promptrail::{bindings, PromptAgentPipeline, Settings};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load();
    settings.init_logging();

    let tracer = settings.tracer();
    let pipeline = PromptAgentPipeline::new(
        settings.prompt_store()?,
        settings.bedrock_model().await?,
        settings.search_backend()?,
    )
    .with_tracer(tracer.clone());

    let result = pipeline.run("ai-agent", &bindings([("city", "横浜")])).await;
    tracer.flush(Duration::from_secs(5)).await;

    let result = result?;
    if let Some(message) = result.transcript.last() {
        println!("{}", message.pretty());
    }
    Ok(())
}
