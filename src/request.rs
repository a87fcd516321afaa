//! Request-scoped types for the ask handler

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MAX_QUESTION_CHARS: usize = 500;

pub const INVALID_BODY: &str = "Invalid request body";
pub const QUESTION_REQUIRED: &str
  = "Question required (max 500 chars)";

/// Inbound request as handed over by the hosting platform
#[derive(Debug, Clone)]
pub struct IncomingRequest
{   pub method: String
  , pub body: Option<String>
}

impl IncomingRequest
{   pub fn new(
      method: impl Into<String>
    , body: Option<String>
    ) -> Self
    {   IncomingRequest
        {   method: method.into()
          , body
        }
    }

    /// Shorthand for a POST with a body
    pub fn post(body: impl Into<String>) -> Self
    {   IncomingRequest::new("POST", Some(body.into()))
    }
}

/// Why a request was turned away before any upstream call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection
{   InvalidBody
  , QuestionRequired
}

impl Rejection
{   pub fn message(self) -> &'static str
    {   match self
        {   Rejection::InvalidBody => INVALID_BODY
          , Rejection::QuestionRequired => QUESTION_REQUIRED
        }
    }
}

/// A trimmed, non-empty question of at most 500 chars
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question
{   /// Validate a raw candidate
    pub fn new(raw: &str) -> Result<Self, Rejection>
    {   let trimmed = raw.trim();
        if trimmed.is_empty()
          || trimmed.chars().count() > MAX_QUESTION_CHARS
        {   return Err(Rejection::QuestionRequired);
        }
        Ok(Question(trimmed.to_string()))
    }

    /// Extract the question from a raw request body
    pub fn from_body(body: Option<&str>) -> Result<Self, Rejection>
    {   let body = body.ok_or(Rejection::InvalidBody)?;
        let value: Value = serde_json::from_str(body)
          .map_err(|_| Rejection::InvalidBody)?;

        match value
        {   Value::Null => Err(Rejection::InvalidBody)
          , other => match other.get("question")
            {   None | Some(Value::Null) => {
                  Err(Rejection::QuestionRequired)
                }
              , Some(Value::String(raw)) => Question::new(raw)
              , Some(_) => Err(Rejection::InvalidBody)
            }
        }
    }

    pub fn as_str(&self) -> &str
    {   &self.0
    }
}

/// Descriptor of the GIF attached to a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaResult
{   pub url: String
  , pub title: String
  , #[serde(
      rename = "giphyPage"
    , default
    , skip_serializing_if = "Option::is_none"
    )]
    pub page_url: Option<String>
}

/// Success payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WisdomResponse
{   pub wisdom: String
  , pub gif: Option<MediaResult>
}

/// Error payload for every non-2xx JSON response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse
{   pub error: String
}

/// Outbound response, independent of the serving platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingResponse
{   pub status: u16
  , pub content_type: &'static str
  , pub body: String
}

impl OutgoingResponse
{   pub fn text(status: u16, body: impl Into<String>) -> Self
    {   OutgoingResponse
        {   status
          , content_type: "text/plain; charset=utf-8"
          , body: body.into()
        }
    }

    pub fn json<T: Serialize>(status: u16, payload: &T) -> Self
    {   // Plain structs of strings always serialize
        let body = serde_json::to_string(payload)
          .unwrap_or_else(|_| "{}".to_string());
        OutgoingResponse
        {   status
          , content_type: "application/json"
          , body
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self
    {   OutgoingResponse::json(
          status,
          &ErrorResponse { error: message.into() }
        )
    }
}
