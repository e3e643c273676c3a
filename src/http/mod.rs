//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, middleware stack)
//!     → middleware/ (request metrics)
//!     → request.rs (request ID, JSON body and query parsing)
//!     → handlers/ (one module per resource)
//!     → store / chain client
//!     → response.rs (envelopes, pages) or error.rs ({ "error": ... })
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use request::X_REQUEST_ID;
pub use server::{build_router, AppState, HttpServer};
