// Request boundary: routes, payload coercion and response envelopes.
// The HTTP server itself lives outside this crate.

pub mod requests;
pub mod response;
pub mod routes;
pub mod service;

pub use response::ApiResponse;
pub use routes::{Method, ResponseShape, Route};
pub use service::GradeService;
