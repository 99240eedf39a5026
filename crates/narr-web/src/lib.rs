//! Narrative Structure Analyzer web server
//!
//! Axum server for the upload page and the `/analyze` JSON endpoint.

pub mod error;
pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use narr_core::Settings;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.settings.limits.max_upload_bytes;

    let api_routes = Router::new()
        .route("/structures", get(routes::structures::list_structures))
        .route("/structures/{slug}/prompt", get(routes::structures::get_prompt))
        .with_state(state.clone());

    Router::new()
        .route("/", get(routes::page::index))
        .route("/analyze", post(routes::analyze::analyze))
        .route("/health", get(routes::health::health))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server until Ctrl+C.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let address = settings.bind_address();
    let state = AppState::new(settings);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Web server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use narr_core::config::LimitSettings;
    use narr_core::structure::harmon::HarmonStoryCircle;
    use narr_core::StructureRegistry;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "narr-test-boundary";

    fn app() -> Router {
        create_router(AppState::new(Settings::default()))
    }

    /// Build a multipart body from `(name, filename, content)` parts.
    fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
        let mut body = String::new();
        for (name, filename, content) in parts {
            body.push_str(&format!("--{}\r\n", BOUNDARY));
            match filename {
                Some(filename) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/plain\r\n\r\n",
                    name, filename
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    name
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));
        body
    }

    async fn post_analyze(app: Router, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_page_contract() {
        let (status, html) = get(app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("preventDefault()"));
        assert!(html.contains("id=\"structure\""));
        assert!(html.contains("id=\"analysis\""));
        assert!(html.contains("id=\"visualization\""));
        assert!(html.contains("id=\"error\""));
        assert!(html.contains("Auto-detected"));
        assert!(html.contains("No visualization available for this structure."));
        assert!(html.contains("accept=\".txt,.pdf,.doc,.docx\""));
        assert!(html.contains("<option value=\"\">Auto-detect</option>"));
        assert!(html.contains("<option value=\"harmon_circle\">Dan Harmon&#x27;s Story Circle</option>")
            || html.contains("<option value=\"harmon_circle\">Dan Harmon&#39;s Story Circle</option>"));

        // Errors render inside the result container, ahead of the panels
        // they hide, so the panel targets survive a failed submission.
        let result = html.find("id=\"result\"").unwrap();
        let error = html.find("id=\"error\"").unwrap();
        let panels = html.find("id=\"panels\"").unwrap();
        let structure = html.find("id=\"structure\"").unwrap();
        assert!(result < error && error < panels && panels < structure);
        assert!(html.contains("panels.style.display = 'none';"));
        assert!(html.contains("panels.style.display = 'block';"));
    }

    #[tokio::test]
    async fn test_index_lists_registered_structures() {
        let mut registry = StructureRegistry::new();
        registry.register(Arc::new(HarmonStoryCircle));
        let app = create_router(AppState::with_registry(Settings::default(), registry));

        let (status, html) = get(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<option value=\"harmon_circle\">"));
        assert!(!html.contains("<option value=\"three_act\">"));
        assert!(!html.contains("<option value=\"vogler_hero_journey\">"));

        let body = multipart_body(&[("text", None, "Once upon a time there was a girl.")]);
        let (status, json) = post_analyze(app.clone(), body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["structure"], "Dan Harmon's Story Circle");

        let body = multipart_body(&[
            ("text", None, "Once upon a time."),
            ("structure", None, "three_act"),
        ]);
        let (status, json) = post_analyze(app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Unknown structure: three_act");
    }

    #[tokio::test]
    async fn test_analyze_text_with_structure() {
        let body = multipart_body(&[
            ("text", None, "One day news arrived. She decided to go. The final battle brought peace."),
            ("structure", None, "three_act"),
        ]);
        let (status, json) = post_analyze(app(), body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["structure"], "Three-Act");
        assert!(json["analysis"].as_str().unwrap().contains('\n'));
        assert!(json["visualization"].as_str().unwrap().contains("three-act"));
        assert_eq!(json["metadata"]["auto_detected"], false);
    }

    #[tokio::test]
    async fn test_analyze_auto_detect() {
        let body = multipart_body(&[
            ("text", None, "Every morning the routine of home. She longed to leave."),
            ("structure", None, ""),
        ]);
        let (status, json) = post_analyze(app(), body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["metadata"]["auto_detected"], true);
        assert!(json["structure"].is_string());
    }

    #[tokio::test]
    async fn test_analyze_uploaded_file() {
        let body = multipart_body(&[
            ("text", None, ""),
            ("file", Some("story.txt"), "A normal life until the call came."),
            ("structure", None, "vogler_hero_journey"),
        ]);
        let (status, json) = post_analyze(app(), body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["structure"], "Chris Vogler's Hero's Journey");
    }

    #[tokio::test]
    async fn test_analyze_errors() {
        let (status, json) = post_analyze(app(), multipart_body(&[("text", None, "  ")])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().starts_with("No text provided"));

        let body = multipart_body(&[("file", Some("story.pdf"), "%PDF-1.4")]);
        let (status, json) = post_analyze(app(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("story.pdf"));

        let body = multipart_body(&[("text", None, "story"), ("structure", None, "freytag")]);
        let (status, json) = post_analyze(app(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Unknown structure: freytag");
    }

    #[tokio::test]
    async fn test_analyze_input_too_large() {
        let settings = Settings {
            limits: LimitSettings { max_input_bytes: 10, max_upload_bytes: 4096 },
            ..Settings::default()
        };
        let app = create_router(AppState::new(settings));
        let body = multipart_body(&[("text", None, "this text is longer than ten bytes")]);
        let (status, json) = post_analyze(app, body).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(json["error"].as_str().unwrap().starts_with("Input too large"));
    }

    #[tokio::test]
    async fn test_analyze_body_over_upload_limit() {
        let settings = Settings {
            limits: LimitSettings { max_input_bytes: 100, max_upload_bytes: 200 },
            ..Settings::default()
        };
        let app = create_router(AppState::new(settings));
        let text = "a".repeat(5000);
        let body = multipart_body(&[("text", None, text.as_str())]);
        let (status, json) = post_analyze(app, body).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_list_structures() {
        let (status, body) = get(app(), "/api/structures").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        let slugs: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["slug"].as_str().unwrap())
            .collect();
        assert_eq!(slugs, vec!["three_act", "harmon_circle", "vogler_hero_journey"]);
    }

    #[tokio::test]
    async fn test_prompt_endpoint() {
        let (status, body) = get(app(), "/api/structures/harmon_circle/prompt").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["structure"], "harmon_circle");
        assert!(json["prompt"].as_str().unwrap().contains("Story Circle"));

        let (status, body) = get(app(), "/api/structures/freytag/prompt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Unknown structure: freytag");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
