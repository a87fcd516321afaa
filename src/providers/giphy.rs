use std::future::Future;

use serde::Deserialize;
use serde_json::Value;
use log::{debug, trace, warn};

use crate::config::ImageConfig;
use crate::request::MediaResult;

pub const DEFAULT_TITLE: &str = "keanu reeves";
pub const NO_GIF: &str = "No GIF returned";

// ===== Response Types =====

#[derive(Debug, Clone, Deserialize)]
pub struct RandomResponse
{   /// Object on a hit, empty array when nothing matched
    #[serde(default)]
    pub data: Value
}

#[derive(Debug, Clone, Deserialize)]
pub struct Gif
{   #[serde(default)]
    pub title: Option<String>
  , #[serde(default)]
    pub url: Option<String>
  , #[serde(default)]
    pub images: Option<Images>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Images
{   #[serde(default)]
    pub fixed_width: Option<Rendition>
  , #[serde(default)]
    pub original: Option<Rendition>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rendition
{   #[serde(default)]
    pub url: Option<String>
}

impl RandomResponse
{   /// Map the payload onto a media descriptor
    pub fn into_media(self) -> Result<MediaResult, crate::error::Error>
    {   let no_gif = || crate::error::Error::NoResult(NO_GIF.to_string());

        let gif: Gif = match self.data
        {   Value::Object(_) => serde_json::from_value(self.data)
              .map_err(|e| {
                warn!("Unexpected GIF shape: {}", e);
                crate::error::Error::ParseError(e.to_string())
              })?
          , _ => return Err(no_gif())
        };

        let images = gif.images.ok_or_else(no_gif)?;
        let url = images.fixed_width
          .and_then(|r| r.url)
          .or_else(|| images.original.and_then(|r| r.url))
          .ok_or_else(no_gif)?;

        let title = gif.title
          .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        Ok(MediaResult
        {   url
          , title
          , page_url: gif.url
        })
    }
}

// ===== Giphy Client =====

/// Random-GIF client with a fixed tag and rating
pub struct GiphyClient
{   config: ImageConfig
  , http_client: reqwest::Client
}

impl GiphyClient
{   pub fn new(config: ImageConfig)
      -> Result<Self, crate::error::Error>
    {   debug!(
          "Creating GiphyClient for tag {:?} rating {:?}",
          config.tag, config.rating
        );
        let http_client
          = super::build_http_client(config.timeout_secs)?;
        Ok(GiphyClient
        {   config
          , http_client
        })
    }

    /// Fetch one random GIF for the configured tag
    pub async fn random_gif(&self)
      -> Result<MediaResult, crate::error::Error>
    {   debug!("Handling random_gif");

        let api_key = super::require_key(
          &self.config.api_key,
          "giphy"
        )?;

        let response = self.http_client
          .get(format!("{}/gifs/random", self.config.api_base))
          .query(&[
            ("api_key", api_key)
          , ("tag", self.config.tag.as_str())
          , ("rating", self.config.rating.as_str())
          ])
          .send()
          .await
          .map_err(|e| {
            warn!("HTTP error: {}", e);
            crate::error::Error::from(e)
          })?;

        let status = response.status();
        trace!("Giphy response status: {}", status);

        if !status.is_success()
        {   warn!("Giphy API error: {}", status);
            return Err(crate::error::Error::ApiError(
              format!("Giphy error {}", status.as_u16())
            ));
        }

        let random: RandomResponse
          = response.json().await.map_err(|e| {
            warn!("Parse error: {}", e);
            crate::error::Error::ParseError(e.to_string())
          })?;

        random.into_media()
    }
}

impl super::ImageService for GiphyClient
{   fn fetch_image(&self)
      -> impl Future<Output = Result<MediaResult, crate::error::Error>>
        + Send
    {   self.random_gif()
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use std::sync::{Mutex, OnceLock};

    use log::{Level, LevelFilter, Log, Metadata, Record};

    /// Keeps (level, target, message) of every record
    struct Capture(Mutex<Vec<(Level, String, String)>>);

    impl Log for Capture
    {   fn enabled(&self, _: &Metadata) -> bool
        {   true
        }

        fn log(&self, record: &Record)
        {   self.0.lock().unwrap().push((
              record.level(),
              record.target().to_string(),
              record.args().to_string()
            ));
        }

        fn flush(&self) {}
    }

    fn capture() -> &'static Capture
    {   static CAPTURE: OnceLock<&'static Capture> = OnceLock::new();
        CAPTURE.get_or_init(|| {
          let logger: &'static Capture
            = Box::leak(Box::new(Capture(Mutex::new(vec![]))));
          let _ = log::set_logger(logger);
          log::set_max_level(LevelFilter::Trace);
          logger
        })
    }

    fn parse(raw: &str) -> Result<MediaResult, crate::error::Error>
    {   serde_json::from_str::<RandomResponse>(raw)
          .unwrap()
          .into_media()
    }

    #[test]
    fn prefers_fixed_width()
    {   let gif = parse(r#"{"data":{
          "title":"whoa",
          "url":"https://giphy.com/gifs/whoa",
          "images":{
            "fixed_width":{"url":"https://media/fw.gif"},
            "original":{"url":"https://media/orig.gif"}
          }}}"#).unwrap();
        assert_eq!(gif.url, "https://media/fw.gif");
        assert_eq!(gif.title, "whoa");
        assert_eq!(gif.page_url.as_deref(), Some("https://giphy.com/gifs/whoa"));
    }

    #[test]
    fn falls_back_to_original_and_default_title()
    {   let gif = parse(r#"{"data":{
          "images":{"original":{"url":"https://media/orig.gif"}}
          }}"#).unwrap();
        assert_eq!(gif.url, "https://media/orig.gif");
        assert_eq!(gif.title, DEFAULT_TITLE);
        assert_eq!(gif.page_url, None);
    }

    #[test]
    fn empty_title_is_kept()
    {   let gif = parse(r#"{"data":{
          "title":"",
          "url":"https://giphy.com/gifs/p",
          "images":{"fixed_width":{"url":"https://media/u.gif"}}
          }}"#).unwrap();
        assert_eq!(gif.title, "");
        assert_eq!(gif.url, "https://media/u.gif");

        let gif = parse(r#"{"data":{
          "title":null,
          "images":{"fixed_width":{"url":"https://media/u.gif"}}
          }}"#).unwrap();
        assert_eq!(gif.title, DEFAULT_TITLE);
    }

    #[test]
    fn empty_result_is_no_gif()
    {   let expected
          = Err(crate::error::Error::NoResult(NO_GIF.to_string()));
        assert_eq!(parse(r#"{"data":[]}"#), expected);
        assert_eq!(parse(r#"{}"#), expected);
        assert_eq!(parse(r#"{"data":{"title":"x"}}"#), expected);
        assert_eq!(parse(r#"{"data":{"images":{}}}"#), expected);
    }

    #[test]
    fn image_failures_are_not_logged_as_errors()
    {   let logs = capture();

        let client = GiphyClient::new(ImageConfig::default()).unwrap();
        assert!(tokio_test::block_on(client.random_gif()).is_err());
        assert!(matches!(
          parse(r#"{"data":{"images":5}}"#),
          Err(crate::error::Error::ParseError(_))
        ));

        let records = logs.0.lock().unwrap();
        let ours: Vec<_> = records.iter()
          .filter(|(_, target, _)| {
            target == "wisdom::providers::giphy"
              || target == "wisdom::providers"
          })
          .collect();
        assert!(ours.iter().any(|(level, _, msg)| {
          *level == Level::Warn && msg.contains("Unexpected GIF shape")
        }));
        assert!(ours.iter().any(|(level, _, msg)| {
          *level == Level::Warn && msg.contains("No API key for: giphy")
        }));
        assert!(ours.iter().all(|(level, _, _)| *level != Level::Error));
    }

    #[test]
    fn missing_key_fails_without_request()
    {   let client = GiphyClient::new(ImageConfig::default()).unwrap();
        let result = tokio_test::block_on(client.random_gif());
        assert_eq!(
          result,
          Err(crate::error::Error::MissingApiKey("giphy".to_string()))
        );
    }
}
