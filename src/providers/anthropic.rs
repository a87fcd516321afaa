use std::future::Future;

use serde::{Deserialize, Serialize};
use log::{debug, trace, error};

use crate::config::CompletionConfig;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

// ===== Message Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest
{   pub model: String
  , pub max_tokens: usize
  , pub system: String
  , pub messages: Vec<ChatMessage>
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse
{   #[serde(default)]
    pub content: Option<Vec<ContentBlock>>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock
{   #[serde(default)]
    pub text: Option<String>
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ApiErrorBody
{   #[serde(default)]
    error: Option<ApiErrorDetail>
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ApiErrorDetail
{   #[serde(default)]
    message: Option<String>
}

impl MessagesResponse
{   /// Text of the first content block, empty when there is none
    pub fn first_text(self) -> String
    {   self.content
          .and_then(|blocks| blocks.into_iter().next())
          .and_then(|block| block.text)
          .unwrap_or_default()
    }
}

/// Message to surface for a non-success response
fn api_error_message(status: u16, body: &str) -> String
{   serde_json::from_str::<ApiErrorBody>(body)
      .ok()
      .and_then(|b| b.error)
      .and_then(|e| e.message)
      .filter(|m| !m.trim().is_empty())
      .unwrap_or_else(|| format!("Completion API error {}", status))
}

// ===== Anthropic Client =====

/// Messages API client with a fixed system prompt
pub struct AnthropicClient
{   config: CompletionConfig
  , system_prompt: &'static str
  , http_client: reqwest::Client
}

impl AnthropicClient
{   pub fn new(
      config: CompletionConfig
    , system_prompt: &'static str
    ) -> Result<Self, crate::error::Error>
    {   debug!("Creating AnthropicClient for model: {}", config.model);
        let http_client
          = super::build_http_client(config.timeout_secs)?;
        Ok(AnthropicClient
        {   config
          , system_prompt
          , http_client
        })
    }

    fn build_request(&self, question: &str) -> MessagesRequest
    {   MessagesRequest
        {   model: self.config.model.clone()
          , max_tokens: self.config.max_tokens
          , system: self.system_prompt.to_string()
          , messages: vec![
              ChatMessage
              {   role: "user".to_string()
                , content: question.to_string()
              }
            ]
        }
    }

    /// Send one question and return the generated text
    pub async fn send_question(&self, question: &str)
      -> Result<String, crate::error::Error>
    {   debug!("Handling send_question for: {}", self.config.model);

        let api_key = super::require_key(
          &self.config.api_key,
          "anthropic"
        )?;
        let request = self.build_request(question);

        trace!("Anthropic request: {:?}", request);

        let response = self.http_client
          .post(format!("{}/messages", self.config.api_base))
          .header("x-api-key", api_key)
          .header("anthropic-version", ANTHROPIC_VERSION)
          .header("Content-Type", "application/json")
          .json(&request)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            crate::error::Error::from(e)
          })?;

        let status = response.status();
        trace!("Anthropic response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_default();
            let message
              = api_error_message(status.as_u16(), &error_text);
            error!("Anthropic API error: {}", message);
            return Err(crate::error::Error::ApiError(message));
        }

        let messages_response: MessagesResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            crate::error::Error::ParseError(e.to_string())
          })?;

        let text = messages_response.first_text();
        debug!("Received {} chars of completion", text.len());
        Ok(text)
    }
}

impl super::CompletionService for AnthropicClient
{   fn complete(&self, question: &str)
      -> impl Future<Output = Result<String, crate::error::Error>> + Send
    {   self.send_question(question)
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    fn client() -> AnthropicClient
    {   let config = CompletionConfig
        {   api_key: "test-key".to_string()
          , ..CompletionConfig::default()
        };
        AnthropicClient::new(config, "be calm").unwrap()
    }

    #[test]
    fn request_carries_persona_and_single_turn()
    {   let request = client().build_request("why?");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["system"], "be calm");
        assert_eq!(json["max_tokens"], 256);
        assert_eq!(json["model"], "claude-sonnet-4-6");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "why?");
    }

    #[test]
    fn first_text_takes_first_block()
    {   let response: MessagesResponse = serde_json::from_str(
          r#"{"content":[{"type":"text","text":"one"},
                         {"type":"text","text":"two"}]}"#
        ).unwrap();
        assert_eq!(response.first_text(), "one");
    }

    #[test]
    fn first_text_is_empty_without_content()
    {   for raw in [r#"{}"#, r#"{"content":null}"#, r#"{"content":[]}"#]
        {   let response: MessagesResponse
              = serde_json::from_str(raw).unwrap();
            assert_eq!(response.first_text(), "");
        }
    }

    #[test]
    fn api_error_prefers_upstream_message()
    {   assert_eq!(
          api_error_message(
            529,
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#
          ),
          "Overloaded"
        );
        assert_eq!(
          api_error_message(500, "<html>oops</html>"),
          "Completion API error 500"
        );
        assert_eq!(
          api_error_message(401, r#"{"error":{"message":""}}"#),
          "Completion API error 401"
        );
    }

    #[tokio::test]
    async fn missing_key_fails_without_request()
    {   let client = AnthropicClient::new(
          CompletionConfig::default(),
          "be calm"
        ).unwrap();
        assert_eq!(
          client.send_question("hi").await,
          Err(crate::error::Error::MissingApiKey(
            "anthropic".to_string()
          ))
        );
    }
}
