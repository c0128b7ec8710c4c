//! Test doubles shared by unit tests.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;

use crate::config::Config;

/// A request captured by [`MockGraphApi`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub phone_number_id: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Local stand-in for the Graph API messages endpoint.
pub struct MockGraphApi {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockGraphApi {
    /// Start a mock that answers every send with `status`.
    pub async fn start(status: StatusCode) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/v18.0/:phone_number_id/messages", post(record))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    /// Configuration pointing the relay at this mock.
    pub fn config(&self, app_secret: Option<&str>) -> Config {
        test_config(&self.base_url, app_secret)
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Configuration with fixed credentials and the given Graph API base URL.
pub fn test_config(graph_api_url: &str, app_secret: Option<&str>) -> Config {
    let graph_api_url = graph_api_url.to_string();
    let app_secret = app_secret.map(str::to_string);

    Config::from_lookup(move |name| match name {
        "VERIFY_TOKEN" => Some("verify-me".to_string()),
        "WHATSAPP_TOKEN" => Some("bearer-abc".to_string()),
        "PHONE_NUMBER_ID" => Some("1234567890".to_string()),
        "GRAPH_API_URL" => Some(graph_api_url.clone()),
        "WHATSAPP_APP_SECRET" => app_secret.clone(),
        "REQUEST_TIMEOUT_MS" => Some("2000".to_string()),
        _ => None,
    })
    .unwrap()
}

async fn record(
    State(state): State<MockState>,
    Path(phone_number_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.requests.lock().unwrap().push(RecordedRequest {
        phone_number_id,
        authorization,
        body,
    });

    (
        state.status,
        Json(serde_json::json!({ "messages": [{ "id": "wamid.reply" }] })),
    )
}
