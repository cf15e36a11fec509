//! A traced web search agent printing its whole transcript.

use promptrail::tools::Topic;
use promptrail::{agent, Message, ModelConfig, Settings, WebSearchTool, DEFAULT_MODEL_ID};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load();
    settings.init_logging();

    let tracer = settings.tracer();
    let search = WebSearchTool::new(settings.search_backend()?)
        .with_max_results(2)
        .with_topic(Topic::General);
    let agent = agent(settings.bedrock_model().await?)
        .config(ModelConfig::new(DEFAULT_MODEL_ID, 1.0)?)
        .tool(search)
        .tracer(tracer.clone())
        .build()?;

    let query = "AIエージェントの最新動向を教えてください。検索は1度だけ実施してください。";
    let result = agent.run(vec![Message::user(query)]).await;
    tracer.flush(Duration::from_secs(5)).await;

    for message in &result?.transcript {
        println!("{}", message.pretty());
    }
    Ok(())
}
