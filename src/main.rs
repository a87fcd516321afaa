use std::sync::Arc;

use log::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>>
{   env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).init();

    let config = wisdom::WisdomConfig::load()?;
    if config.completion.api_key.is_empty()
    {   warn!("ANTHROPIC_API_KEY not set, every question will fail");
    }
    if config.image.api_key.is_empty()
    {   warn!("GIPHY_API_KEY not set, replies will carry no gif");
    }

    let orchestrator = Arc::new(wisdom::live_orchestrator(&config)?);
    let app = wisdom::build_app(orchestrator, &config.server.path)?;

    info!("Starting wisdom");
    wisdom::serve(app, &config.server).await?;
    Ok(())
}
