//! HTTP surface for the guest lookup.
//!
//! - `GET /api/guest/:last_name` → `GuestData` JSON, or an `{"error": ...}` body
//!   with 400/404/500.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::{error, info};

use crate::content::sections::Markers;
use crate::guest::{lookup_guest, GuestData};
use crate::store::ContentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub markers: Arc<Markers>,
}

/// Outcomes that are not a guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    MissingLastName,
    NotFound,
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingLastName => (StatusCode::BAD_REQUEST, "Last name is required"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Guest not found"),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/guest", get(missing_last_name))
        .route("/api/guest/", get(missing_last_name))
        .route("/api/guest/:last_name", get(get_guest))
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn missing_last_name() -> ApiError {
    ApiError::MissingLastName
}

async fn get_guest(
    State(state): State<AppState>,
    Path(last_name): Path<String>,
) -> Result<Json<GuestData>, ApiError> {
    let last_name = last_name.trim();
    if last_name.is_empty() {
        return Err(ApiError::MissingLastName);
    }

    match lookup_guest(state.store.as_ref(), last_name, &state.markers).await {
        Ok(Some(guest)) => Ok(Json(guest)),
        Ok(None) => Err(ApiError::NotFound),
        Err(e) => {
            error!("Lookup for {:?} failed: {:#}", last_name, anyhow::Error::new(e));
            Err(ApiError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::settings::test_settings;
    use crate::store::memory::{node, numbered, MemoryStore};
    use crate::store::{NodeKind, NotionClient};

    /// Serve `store` on an ephemeral port and return its base URL.
    async fn spawn(store: Arc<dyn ContentStore>) -> String {
        let state = AppState {
            store,
            markers: Arc::new(Markers::default()),
        };
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn get_json(url: String) -> (u16, Value) {
        let response = reqwest::get(url).await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    fn fixture(name: &str) -> Value {
        let raw = std::fs::read_to_string(format!("tests/fixtures/{name}")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn smiths() -> MemoryStore {
        MemoryStore::default()
            .with_candidate("anna", Some("Anna Smithson"), None)
            .with_candidate("jane", Some("Jane Smith"), None)
            .with_children(
                "jane",
                vec![
                    node("h", NodeKind::Heading(2), "Topics"),
                    numbered("1", "Research"),
                ],
            )
    }

    #[tokio::test]
    async fn found_guest() {
        let base = spawn(Arc::new(smiths())).await;
        let (status, body) = get_json(format!("{base}/api/guest/smith")).await;
        assert_eq!(status, 200);
        assert_eq!(
            body,
            json!({ "id": "jane", "name": "Jane Smith", "pageContent": "1. Research" })
        );
    }

    #[tokio::test]
    async fn unknown_guest() {
        let base = spawn(Arc::new(smiths())).await;
        let (status, body) = get_json(format!("{base}/api/guest/smithson-jones")).await;
        assert_eq!(status, 404);
        assert_eq!(body, json!({ "error": "Guest not found" }));
    }

    #[tokio::test]
    async fn missing_or_blank_last_name() {
        let base = spawn(Arc::new(smiths())).await;
        for url in [
            format!("{base}/api/guest"),
            format!("{base}/api/guest/"),
            format!("{base}/api/guest/%20%20"),
        ] {
            let (status, body) = get_json(url).await;
            assert_eq!(status, 400);
            assert_eq!(body, json!({ "error": "Last name is required" }));
        }
    }

    #[tokio::test]
    async fn encoded_last_name_is_decoded() {
        let store = MemoryStore::default()
            .with_candidate("d", Some("Ana de la Cruz"), None)
            .with_children("d", vec![node("p", NodeKind::Paragraph, "Hi")]);
        let base = spawn(Arc::new(store)).await;
        let (status, body) = get_json(format!("{base}/api/guest/Cruz%20")).await;
        assert_eq!(status, 200);
        assert_eq!(body["name"], "Ana de la Cruz");
    }

    #[tokio::test]
    async fn store_failure_is_internal_error() {
        let store = smiths().broken("jane");
        let base = spawn(Arc::new(store)).await;
        let (status, body) = get_json(format!("{base}/api/guest/smith")).await;
        assert_eq!(status, 500);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn notion_backed_lookup() {
        let notion = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/databases/db123/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture("query_smith.json")))
            .mount(&notion)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/blocks/page-jane/children"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture("page_children.json")))
            .mount(&notion)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/blocks/b-origin/children"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture("origin_children.json")))
            .mount(&notion)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/blocks/b-garage/children"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture("garage_children.json")))
            .mount(&notion)
            .await;

        let client = NotionClient::new(&test_settings(&notion.uri())).unwrap();
        let base = spawn(Arc::new(client)).await;
        let (status, body) = get_json(format!("{base}/api/guest/Smith")).await;

        assert_eq!(status, 200);
        assert_eq!(body["id"], "page-jane");
        assert_eq!(body["name"], "Dr. Jane Smith");
        assert_eq!(body["recordingDate"], "2024-06-12");
        assert_eq!(
            body["pageContent"],
            "Intro call notes\n\n1. Origin story\n  a. The garage years\n    1. Soldering boards\n    2. First sale\n  b. First funding\n2. Scaling the team\n  ☑ Send mic"
        );
    }

    #[tokio::test]
    async fn notion_grandchild_outage_keeps_the_rest() {
        let notion = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/databases/db123/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture("query_smith.json")))
            .mount(&notion)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/blocks/page-jane/children"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture("page_children.json")))
            .mount(&notion)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/blocks/b-origin/children"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture("origin_children.json")))
            .mount(&notion)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/blocks/b-garage/children"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&notion)
            .await;

        let client = NotionClient::new(&test_settings(&notion.uri())).unwrap();
        let base = spawn(Arc::new(client)).await;
        let (status, body) = get_json(format!("{base}/api/guest/smith")).await;

        assert_eq!(status, 200);
        assert_eq!(
            body["pageContent"],
            "Intro call notes\n\n1. Origin story\n  a. The garage years\n  b. First funding\n2. Scaling the team\n  ☑ Send mic"
        );
    }
}
