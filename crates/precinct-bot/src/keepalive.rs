//! HTTP keep-alive stub.
//!
//! Hosting platforms that sleep idle processes ping this endpoint to keep
//! the bot awake. One route, one line of body.

use anyhow::Context as _;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

pub fn router() -> Router {
  Router::new()
    .route("/", get(status))
    .layer(TraceLayer::new_for_http())
}

async fn status() -> &'static str {
  "Precinct bot is online."
}

/// Bind and serve the keep-alive router until the process exits.
pub async fn serve(host: String, port: u16) -> anyhow::Result<()> {
  let address = format!("{host}:{port}");
  let listener = tokio::net::TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  tracing::info!("keep-alive listening on http://{address}");
  axum::serve(listener, router())
    .await
    .context("keep-alive server error")
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tower::ServiceExt as _;

  use super::router;

  #[tokio::test]
  async fn status_route_answers() {
    let resp = router()
      .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    assert_eq!(&bytes[..], b"Precinct bot is online.");
  }
}
