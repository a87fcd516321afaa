//! HTTP binding for the orchestrator

use std::sync::Arc;

use axum::{
  body::Bytes,
  extract::{rejection::BytesRejection, State},
  http::{header, Method, StatusCode},
  response::{IntoResponse, Response},
  routing::any,
  Json, Router,
};
use log::{debug, error, info};

use crate::config::ServerConfig;
use crate::orchestrator::Orchestrator;
use crate::providers::{CompletionService, ImageService};
use crate::request::{ErrorResponse, IncomingRequest, OutgoingResponse};

/// Mount the handler on `path` for every method so the
/// orchestrator itself answers non-POST requests
pub fn build_app<C, I>(
  orchestrator: Arc<Orchestrator<C, I>>
, path: &str
) -> Result<Router, crate::error::Error>
where C: CompletionService + 'static
    , I: ImageService + 'static
{   if !path.starts_with('/')
    {   return Err(crate::error::Error::InvalidConfiguration(
          format!("route must start with '/': {}", path)
        ));
    }
    debug!("Mounting ask handler on {}", path);
    Ok(Router::new()
      .route(path, any(ask::<C, I>))
      .fallback(not_found)
      .with_state(orchestrator))
}

/// Bind and serve until the listener fails
pub async fn serve(app: Router, config: &ServerConfig)
  -> Result<(), crate::error::Error>
{   let listener = tokio::net::TcpListener::bind(
      (config.host.as_str(), config.port)
    )
    .await
    .map_err(|e| {
      error!("Bind failed on {}:{}: {}", config.host, config.port, e);
      crate::error::Error::InvalidConfiguration(e.to_string())
    })?;

    info!("Listening on {}:{}{}", config.host, config.port, config.path);

    axum::serve(listener, app).await.map_err(|e| {
      error!("Server failed: {}", e);
      crate::error::Error::Other(e.to_string())
    })
}

async fn ask<C, I>(
  State(orchestrator): State<Arc<Orchestrator<C, I>>>
, method: Method
, body: Result<Bytes, BytesRejection>
) -> Response
where C: CompletionService + 'static
    , I: ImageService + 'static
{   // Oversized, undecodable or empty bodies surface as
    // "Invalid request body"
    let body = match body
    {   Ok(bytes) if !bytes.is_empty() => {
          String::from_utf8(bytes.to_vec()).ok()
        }
      , Ok(_) => None
      , Err(rejection) => {
          debug!("Body rejected: {}", rejection);
          None
        }
    };

    orchestrator
      .handle(IncomingRequest::new(method.as_str(), body))
      .await
      .into_response()
}

async fn not_found() -> Response
{   (
      StatusCode::NOT_FOUND,
      Json(ErrorResponse
      {   error: "Not found".to_string()
      }),
    )
      .into_response()
}

impl IntoResponse for OutgoingResponse
{   fn into_response(self) -> Response
    {   let status = StatusCode::from_u16(self.status)
          .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
          status,
          [(header::CONTENT_TYPE, self.content_type)],
          self.body,
        )
          .into_response()
    }
}
