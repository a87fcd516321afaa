pub mod error;
pub mod config;
pub mod persona;
pub mod providers;
pub mod request;
pub mod orchestrator;
pub mod server;

/*

wisdom answers one short question with a short, calm reply and a
random themed GIF. The reply is required; the GIF is best effort.

wisdom/
├── Cargo.toml
├── src/
│   ├── lib.rs            # Re-exports
│   ├── main.rs           # Binary: logging, config, serve
│   ├── error.rs          # Error type shared by the adapters
│   ├── config.rs         # Credentials, endpoints, binding
│   ├── persona.rs        # Fixed system prompt
│   ├── request.rs        # Request-scoped types and validation
│   ├── orchestrator.rs   # Validate, fan out, join, respond
│   ├── server.rs         # axum binding
│   └── providers/
│       ├── mod.rs        # Service traits
│       ├── anthropic.rs  # Completion adapter
│       └── giphy.rs      # Image adapter
└── tests/

*/

pub use config::WisdomConfig;
pub use error::Error;
pub use orchestrator::Orchestrator;
pub use providers::{
  AnthropicClient, CompletionService, GiphyClient, ImageService
};
pub use request::{
  IncomingRequest, MediaResult, OutgoingResponse, WisdomResponse
};
pub use server::{build_app, serve};

/// Orchestrator wired to the real upstream services
pub type LiveOrchestrator = Orchestrator<AnthropicClient, GiphyClient>;

/// Build the live orchestrator from configuration
pub fn live_orchestrator(config: &WisdomConfig)
  -> Result<LiveOrchestrator, Error>
{   let completion = AnthropicClient::new(
      config.completion.clone(),
      persona::SYSTEM_PROMPT
    )?;
    let image = GiphyClient::new(config.image.clone())?;
    Ok(Orchestrator::new(completion, image))
}
