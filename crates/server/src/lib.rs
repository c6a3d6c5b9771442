pub mod context;
pub mod error;
pub mod gate;
pub mod http;
pub mod operations;
pub mod rate_limit;

pub use context::RequestContext;
pub use error::{GateError, ServerError};
pub use http::{router, AppState};
pub use rate_limit::RateLimiter;
