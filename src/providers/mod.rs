//! Upstream service adapters

pub mod anthropic;
pub mod giphy;

use std::future::Future;
use std::time::Duration;

use log::{debug, error, warn};

// Re-export for convenience
pub use anthropic::AnthropicClient;
pub use giphy::GiphyClient;

/// Text generation, the dependency a reply cannot do without
pub trait CompletionService: Send + Sync
{   /// Generate a short reply to the question
    fn complete(&self, question: &str)
      -> impl Future<Output = Result<String, crate::error::Error>> + Send;
}

/// Themed image lookup, best effort only
pub trait ImageService: Send + Sync
{   /// Fetch one image descriptor
    fn fetch_image(&self)
      -> impl Future<
          Output = Result<crate::MediaResult, crate::error::Error>
        > + Send;
}

/// Build the HTTP client an adapter owns
pub(crate) fn build_http_client(timeout_secs: Option<u64>)
  -> Result<reqwest::Client, crate::error::Error>
{   let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs
    {   debug!("HTTP client timeout: {}s", secs);
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().map_err(|e| {
      error!("Failed to build HTTP client: {}", e);
      crate::error::Error::InvalidConfiguration(e.to_string())
    })
}

/// Fail early when a credential was never configured
pub(crate) fn require_key<'a>(key: &'a str, service: &str)
  -> Result<&'a str, crate::error::Error>
{   if key.trim().is_empty()
    {   warn!("No API key for: {}", service);
        return Err(crate::error::Error::MissingApiKey(
          service.to_string()
        ));
    }
    Ok(key)
}
