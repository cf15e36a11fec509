//! Register the `ai-agent` chat prompt.

use promptrail::{create_prompt, ModelConfig, Settings, DEFAULT_MODEL_ID};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load();
    settings.init_logging();

    let store = settings.prompt_store()?;
    let config = ModelConfig::new(DEFAULT_MODEL_ID, 1.0)?;
    let template = create_prompt(&store, "ai-agent", "{{city}}の人口は？", config).await?;

    println!("プロンプトテンプレート '{}' を正常に作成しました。", template.name);
    Ok(())
}
