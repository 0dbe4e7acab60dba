use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use luna_core::{LunaError, SentimentCategory};
use luna_orchestrator::{ConversationOrchestrator, MISSING_FIELDS};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Body returned for any upstream failure; collaborator detail stays in the logs.
const INTERNAL_ERROR: &str = "Internal server error";

/// Shared application state.
pub struct AppState {
    pub orchestrator: Arc<ConversationOrchestrator>,
}

/// `POST /chat` request body. Both fields are required; they are optional
/// here so a missing one is reported as a 400 instead of a 422.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: Option<String>,
}

/// `POST /chat` success body.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub reply: String,
    pub sentiment: SentimentCategory,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

/// The main gateway server.
pub struct GatewayServer;

impl GatewayServer {
    /// Build the gateway allowing requests from any origin.
    pub fn build(orchestrator: Arc<ConversationOrchestrator>) -> Router {
        Self::build_with_origins(orchestrator, &[])
    }

    /// Build the gateway with a CORS origin allow-list. An empty list or a
    /// `"*"` entry allows any origin.
    pub fn build_with_origins(
        orchestrator: Arc<ConversationOrchestrator>,
        allowed_origins: &[String],
    ) -> Router {
        let state = Arc::new(AppState { orchestrator });

        Router::new()
            .route("/chat", post(chat_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors_layer(allowed_origins)),
            )
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// The reason carried by a client error, without the display prefix.
fn client_message(error: LunaError) -> String {
    match error {
        LunaError::Validation(reason) => reason,
        other => other.to_string(),
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok", "service": "luna"}))
}

async fn chat_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4();

    let (session_id, message) = match payload {
        Ok(Json(ChatRequest {
            session_id: Some(session_id),
            message: Some(message),
        })) if !session_id.is_empty() && !message.is_empty() => (session_id, message),
        Ok(_) => return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS),
        Err(rejection) => {
            debug!(request_id = %request_id, error = %rejection, "Unreadable chat body");
            return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS);
        }
    };

    // The turn runs detached so it still persists if the caller goes away.
    let orchestrator = state.orchestrator.clone();
    let turn = tokio::spawn(async move { orchestrator.handle(&session_id, &message).await });

    match turn.await {
        Ok(Ok(outcome)) => Json(ChatResponse {
            reply: outcome.reply,
            sentiment: outcome.sentiment,
        })
        .into_response(),
        Ok(Err(e)) if e.is_client_error() => {
            debug!(request_id = %request_id, error = %e, "Chat turn refused");
            error_response(StatusCode::BAD_REQUEST, &client_message(e))
        }
        Ok(Err(e)) => {
            error!(request_id = %request_id, error = %e, "Chat turn failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Chat turn task aborted");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
        }
    }
}
