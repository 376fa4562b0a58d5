//! Route handlers and translation of gateway outcomes into responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docgate::{
    AssociationStore, DecisionEngine, Document, DocumentId, DocumentInput, DocumentStore,
    GatewayError, HealthResponse, ParseRoleError, RequestContext,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::extract::{Caller, ClientTransport};
use crate::router::AppState;

/// Message returned for every policy denial.
pub const FORBIDDEN_MESSAGE: &str =
    "Access denied: Geographic restriction or insufficient permissions";

// ============================================================================
// Errors
// ============================================================================

/// A request that ends in an error response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing user headers")]
    MissingIdentity,

    #[error("{0}")]
    InvalidRole(#[from] ParseRoleError),

    #[error("Invalid request body")]
    InvalidBody,

    #[error("Request body too large")]
    BodyTooLarge,

    #[error("Route not found")]
    RouteNotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The blocking gateway task did not complete.
    #[error("Internal server error")]
    TaskFailed,
}

/// Error body: `{"error": "<status text>", "message": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingIdentity | Self::InvalidRole(_) | Self::InvalidBody => {
                StatusCode::BAD_REQUEST
            }
            Self::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Gateway(GatewayError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Gateway(GatewayError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Gateway(GatewayError::Forbidden { .. }) => StatusCode::FORBIDDEN,
            Self::Gateway(GatewayError::Store(_)) | Self::TaskFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The client-facing message. Denial reasons and store details stay in the logs.
    pub fn message(&self) -> String {
        match self {
            Self::Gateway(GatewayError::InvalidInput(message)) => message.clone(),
            Self::Gateway(GatewayError::NotFound(_)) => "Document not found".to_string(),
            Self::Gateway(GatewayError::Forbidden { .. }) => FORBIDDEN_MESSAGE.to_string(),
            Self::Gateway(GatewayError::Store(_)) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Gateway(GatewayError::Store(e)) = &self {
            error!(error = %e, "Store failure while serving request");
        }

        let status = self.status();
        let body = ErrorBody {
            error: status.canonical_reason().unwrap_or("Unknown"),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

fn decode_body(body: Result<Json<DocumentInput>, JsonRejection>) -> Result<DocumentInput, ApiError> {
    match body {
        Ok(Json(input)) => Ok(input),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ApiError::BodyTooLarge)
        }
        Err(rejection) => {
            debug!(error = %rejection, "Rejecting undecodable document body");
            Err(ApiError::InvalidBody)
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Body of the list endpoint.
#[derive(Debug, Serialize)]
pub struct DocumentsResponse {
    pub documents: Vec<Document>,
}

/// GET /health, GET /api/v1/health
pub async fn health<S, E>(State(state): State<AppState<S, E>>) -> impl IntoResponse
where
    S: DocumentStore + AssociationStore + 'static,
    E: DecisionEngine + 'static,
{
    let status = state.readiness().status();
    let code = if status.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(HealthResponse::from(status)))
}

/// GET /api/v1/documents
pub async fn list_documents<S, E>(
    State(state): State<AppState<S, E>>,
    ClientTransport(transport): ClientTransport,
    Caller(principal): Caller,
) -> Result<Json<DocumentsResponse>, ApiError>
where
    S: DocumentStore + AssociationStore + 'static,
    E: DecisionEngine + 'static,
{
    let ctx = RequestContext::new(principal, transport);
    let documents = state.run(move |gateway| gateway.list_documents(&ctx)).await?;
    Ok(Json(DocumentsResponse { documents }))
}

/// POST /api/v1/documents
pub async fn create_document<S, E>(
    State(state): State<AppState<S, E>>,
    ClientTransport(transport): ClientTransport,
    Caller(principal): Caller,
    body: Result<Json<DocumentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Document>), ApiError>
where
    S: DocumentStore + AssociationStore + 'static,
    E: DecisionEngine + 'static,
{
    let input = decode_body(body)?;
    let ctx = RequestContext::new(principal, transport);
    let document = state
        .run(move |gateway| gateway.create_document(&ctx, input))
        .await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /api/v1/documents/{id}
pub async fn get_document<S, E>(
    State(state): State<AppState<S, E>>,
    Path(id): Path<String>,
    ClientTransport(transport): ClientTransport,
    Caller(principal): Caller,
) -> Result<Json<Document>, ApiError>
where
    S: DocumentStore + AssociationStore + 'static,
    E: DecisionEngine + 'static,
{
    let ctx = RequestContext::new(principal, transport);
    let id = DocumentId::new(id);
    let document = state
        .run(move |gateway| gateway.get_document(&ctx, &id))
        .await?;
    Ok(Json(document))
}

/// PUT /api/v1/documents/{id}
pub async fn update_document<S, E>(
    State(state): State<AppState<S, E>>,
    Path(id): Path<String>,
    ClientTransport(transport): ClientTransport,
    Caller(principal): Caller,
    body: Result<Json<DocumentInput>, JsonRejection>,
) -> Result<Json<Document>, ApiError>
where
    S: DocumentStore + AssociationStore + 'static,
    E: DecisionEngine + 'static,
{
    let input = decode_body(body)?;
    let ctx = RequestContext::new(principal, transport);
    let id = DocumentId::new(id);
    let document = state
        .run(move |gateway| gateway.update_document(&ctx, &id, input))
        .await?;
    Ok(Json(document))
}

/// DELETE /api/v1/documents/{id}
pub async fn delete_document<S, E>(
    State(state): State<AppState<S, E>>,
    Path(id): Path<String>,
    ClientTransport(transport): ClientTransport,
    Caller(principal): Caller,
) -> Result<StatusCode, ApiError>
where
    S: DocumentStore + AssociationStore + 'static,
    E: DecisionEngine + 'static,
{
    let ctx = RequestContext::new(principal, transport);
    let id = DocumentId::new(id);
    state
        .run(move |gateway| gateway.delete_document(&ctx, &id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
