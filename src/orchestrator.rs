//! Request orchestration: validate, fan out, join, respond

use log::{debug, error, info, warn};

use crate::providers::{CompletionService, ImageService};
use crate::request::{
  IncomingRequest, OutgoingResponse, Question, WisdomResponse
};

pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const FALLBACK_ERROR: &str = "Something went sideways.";

/// Owns both upstream adapters for the lifetime of the process
pub struct Orchestrator<C, I>
{   completion: C
  , image: I
}

impl<C, I> Orchestrator<C, I>
where C: CompletionService
    , I: ImageService
{   pub fn new(completion: C, image: I) -> Self
    {   debug!("Creating Orchestrator");
        Orchestrator
        {   completion
          , image
        }
    }

    /// Handle one request, producing exactly one response
    pub async fn handle(&self, request: IncomingRequest)
      -> OutgoingResponse
    {   if request.method != "POST"
        {   debug!("Rejecting method: {}", request.method);
            return OutgoingResponse::text(405, METHOD_NOT_ALLOWED);
        }

        let question = match Question::from_body(
          request.body.as_deref()
        ) {
          Ok(q) => q,
          Err(rejection) => {
            debug!("Rejecting request: {:?}", rejection);
            return OutgoingResponse::error(400, rejection.message());
          }
        };

        debug!(
          "Dispatching question of {} chars",
          question.as_str().chars().count()
        );

        // Settle both; neither failure cancels the other
        let (wisdom, gif) = tokio::join!(
          self.completion.complete(question.as_str()),
          self.image.fetch_image()
        );

        let wisdom = match wisdom
        {   Ok(text) => text
          , Err(e) => {
              error!("Completion failed: {}", e);
              let message = e.reason()
                .unwrap_or_else(|| FALLBACK_ERROR.to_string());
              return OutgoingResponse::error(502, message);
            }
        };

        let gif = match gif
        {   Ok(media) => Some(media)
          , Err(e) => {
              warn!("Image lookup failed, replying without gif: {}", e);
              None
            }
        };

        info!("Answered question (gif attached: {})", gif.is_some());
        OutgoingResponse::json(200, &WisdomResponse { wisdom, gif })
    }
}
