mod handlers;
mod state;
mod static_files;

use axum::Router;
use axum::routing::get;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::weather::WeatherOrchestrator;

pub fn build_router(orchestrator: WeatherOrchestrator) -> Router {
    let state = Arc::new(AppState { orchestrator });

    Router::new()
        .route("/", get(handlers::index))
        .route("/style.css", get(handlers::style))
        .route("/app.js", get(handlers::script))
        .route("/api/weather", get(handlers::weather))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, orchestrator: WeatherOrchestrator) -> std::io::Result<()> {
    let app = build_router(orchestrator);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    eprintln!("  SkyCast server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::{
        ApiKeySource, Completion, CompletionClient, CompletionRequest, LookupError,
        PrimaryFailure, WeatherSource,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct DownSource;

    impl WeatherSource for DownSource {
        fn url_for(&self, location: &str) -> String {
            format!("http://wx.invalid/?city={}", location)
        }

        fn fetch_raw(&self, _location: &str) -> Result<String, PrimaryFailure> {
            Err(PrimaryFailure::Status { code: 503, reason: "Service Unavailable".into() })
        }
    }

    struct CannedCompletion(Result<&'static str, &'static str>);

    impl CompletionClient for CannedCompletion {
        fn generate(&self, _key: &str, _req: &CompletionRequest) -> Result<Completion, LookupError> {
            match self.0 {
                Ok(text) => Ok(Completion { text: text.to_string(), citations: vec![] }),
                Err(msg) => Err(LookupError::Completion(msg.to_string())),
            }
        }
    }

    fn router(reply: Result<&'static str, &'static str>) -> Router {
        build_router(WeatherOrchestrator::new(
            DownSource,
            CannedCompletion(reply),
            ApiKeySource::Static("k".into()),
        ))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_index_served() {
        let resp = router(Ok("{}"))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_location_is_bad_request() {
        let (status, body) = get_json(router(Ok("{}")), "/api/weather?location=%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_fallback_outcome_json() {
        let (status, body) =
            get_json(router(Ok("no json today")), "/api/weather?location=Paris").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dataSource"], "Google Search");
        assert_eq!(body["rawText"], "no json today");
        assert_eq!(body["fallbackReason"], "API Status: 503 Service Unavailable");
    }

    #[tokio::test]
    async fn test_completion_failure_is_bad_gateway() {
        let (status, body) = get_json(router(Err("quota")), "/api/weather?location=Paris").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("Unable to fetch weather data"));
    }
}
