//! Write a Markdown research report, tracing every step.

use promptrail::{ModelConfig, ResearchWorkflow, Settings, DEFAULT_MODEL_ID};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load();
    settings.init_logging();

    let tracer = settings.tracer();
    let workflow = ResearchWorkflow::new(
        settings.bedrock_model().await?,
        settings.search_backend()?,
        ModelConfig::new(DEFAULT_MODEL_ID, 1.0)?,
    )
    .with_tracer(tracer.clone());

    let user_query = "LangChainとLangGraphのユースケースの違いについて教えてください。";
    let report = workflow.execute(user_query).await;
    tracer.flush(Duration::from_secs(5)).await;

    println!("{}", report?);
    Ok(())
}
