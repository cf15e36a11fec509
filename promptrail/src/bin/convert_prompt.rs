//! Fetch the `ai-agent` prompt and print it rendered.

use promptrail::{bindings, convert_prompt, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load();
    settings.init_logging();

    let store = settings.prompt_store()?;
    let messages = convert_prompt(&store, "ai-agent", &bindings([("city", "東京都")])).await?;

    for message in &messages {
        println!("{}", message.pretty());
    }
    Ok(())
}
