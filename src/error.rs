use std::fmt;

/// Custom error type for upstream calls
/// Implements Clone so outcomes can be compared in tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// API key is missing for a service
    MissingApiKey(String)
  , /// HTTP transport error
    HttpError(String)
  , /// API returned a non-success response
    ApiError(String)
  , /// Failed to parse API response
    ParseError(String)
  , /// Success response carried nothing usable
    NoResult(String)
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Timeout error
    Timeout
  , /// Generic error
    Other(String)
}

impl Error
{   /// Bare failure message, without the variant prefix.
    /// Returns None when there is nothing meaningful to show.
    pub fn reason(&self) -> Option<String>
    {   let msg = match self
        {   Error::MissingApiKey(service) => {
              format!("Missing API key for: {}", service)
            }
          , Error::HttpError(msg)
          | Error::ApiError(msg)
          | Error::ParseError(msg)
          | Error::NoResult(msg)
          | Error::InvalidConfiguration(msg)
          | Error::Other(msg) => msg.clone()
          , Error::Timeout => self.to_string()
        };

        if msg.trim().is_empty()
        {   None
        } else
        {   Some(msg)
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingApiKey(service) => {
              write!(f, "Missing API key for: {}", service)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError(msg) => {
              write!(f, "API error: {}", msg)
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::NoResult(msg) => {
              write!(f, "No result: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}

impl From<reqwest::Error> for Error
{   fn from(e: reqwest::Error) -> Self
    {   if e.is_timeout()
        {   Error::Timeout
        } else if e.is_decode()
        {   Error::ParseError(e.to_string())
        } else
        {   Error::HttpError(e.to_string())
        }
    }
}
