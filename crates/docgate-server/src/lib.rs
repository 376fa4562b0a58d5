//! # docgate-server: HTTP front end for `docgate`
//!
//! An axum router that maps the document routes onto
//! [`docgate::Gateway`] operations:
//!
//! | Route                              | Methods            |
//! |------------------------------------|--------------------|
//! | `/health`, `/api/v1/health`        | `GET`              |
//! | `/api/v1/documents`                | `GET`, `POST`      |
//! | `/api/v1/documents/{id}`           | `GET`, `PUT`, `DELETE` |
//!
//! Callers identify themselves with `X-User-ID`, `X-User-Role` and an
//! optional `X-User-Group-ID`, set by an authenticating proxy.

pub mod bootstrap;
mod error;
pub mod extract;
pub mod handler;
pub mod router;

pub use error::{ServerError, ServerResult};
pub use router::{AppState, Server, router, shutdown_signal};
