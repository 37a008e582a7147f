//! Session authentication and request throttling

pub mod rate_limit;
pub mod session;

pub use rate_limit::RateLimiter;
pub use session::AuthContext;
