//! Configuration for the upstream services and the HTTP binding

use std::env;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

pub const ANTHROPIC_API_BASE: &str
  = "https://api.anthropic.com/v1";
pub const GIPHY_API_BASE: &str
  = "https://api.giphy.com/v1";

/// Completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig
{   /// API key, empty when not configured
    pub api_key: String
  , /// API base URL
    pub api_base: String
  , /// Model identifier
    pub model: String
  , /// Upper bound on generated tokens
    pub max_tokens: usize
  , /// Request timeout in seconds
    pub timeout_secs: Option<u64>
}

impl Default for CompletionConfig
{   fn default() -> Self
    {   CompletionConfig
        {   api_key: String::new()
          , api_base: ANTHROPIC_API_BASE.to_string()
          , model: "claude-sonnet-4-6".to_string()
          , max_tokens: 256
          , timeout_secs: Some(20)
        }
    }
}

/// Image service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig
{   /// API key, empty when not configured
    pub api_key: String
  , /// API base URL
    pub api_base: String
  , /// Search tag for the random GIF
    pub tag: String
  , /// Content rating
    pub rating: String
  , /// Request timeout in seconds
    pub timeout_secs: Option<u64>
}

impl Default for ImageConfig
{   fn default() -> Self
    {   ImageConfig
        {   api_key: String::new()
          , api_base: GIPHY_API_BASE.to_string()
          , tag: "keanu reeves".to_string()
          , rating: "g".to_string()
          , timeout_secs: Some(20)
        }
    }
}

/// HTTP binding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig
{   pub host: String
  , pub port: u16
  , /// Route the handler is mounted on
    pub path: String
}

impl Default for ServerConfig
{   fn default() -> Self
    {   ServerConfig
        {   host: "0.0.0.0".to_string()
          , port: 8888
          , path: "/ask".to_string()
        }
    }
}

/// Top level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WisdomConfig
{   pub completion: CompletionConfig
  , pub image: ImageConfig
  , pub server: ServerConfig
}

impl WisdomConfig
{   /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>)
      -> Result<Self, crate::error::Error>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let raw = fs::read_to_string(path).map_err(|e| {
          crate::error::Error::InvalidConfiguration(
            format!("{}: {}", path.display(), e)
          )
        })?;
        serde_json::from_str(&raw).map_err(|e| {
          crate::error::Error::InvalidConfiguration(
            format!("{}: {}", path.display(), e)
          )
        })
    }

    /// Overlay values from the environment
    pub fn apply_env(self) -> Result<Self, crate::error::Error>
    {   self.apply_vars(|name| env::var(name).ok())
    }

    /// Config file named by WISDOM_CONFIG (or defaults), then env
    pub fn load() -> Result<Self, crate::error::Error>
    {   let base = match env::var("WISDOM_CONFIG")
        {   Ok(path) => WisdomConfig::from_file(path)?
          , Err(_) => {
              info!("WISDOM_CONFIG not set, using defaults");
              WisdomConfig::default()
            }
        };
        base.apply_env()
    }

    fn apply_vars<F>(mut self, lookup: F)
      -> Result<Self, crate::error::Error>
    where F: Fn(&str) -> Option<String>
    {   if let Some(key) = lookup("ANTHROPIC_API_KEY")
        {   self.completion.api_key = key;
        }
        if let Some(base) = lookup("ANTHROPIC_API_BASE")
        {   self.completion.api_base = base;
        }
        if let Some(model) = lookup("ANTHROPIC_MODEL")
        {   self.completion.model = model;
        }
        if let Some(key) = lookup("GIPHY_API_KEY")
        {   self.image.api_key = key;
        }
        if let Some(base) = lookup("GIPHY_API_BASE")
        {   self.image.api_base = base;
        }
        if let Some(port) = lookup("PORT")
        {   self.server.port = port.parse().map_err(|_| {
              crate::error::Error::InvalidConfiguration(
                format!("PORT is not a valid port: {}", port)
              )
            })?;
        }
        Ok(self)
    }
}
