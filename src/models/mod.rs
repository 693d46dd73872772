//! Request and Response models for the cache server API
//!
//! These DTOs are shared by the server handlers and by
//! [`crate::cache::HttpBackend`], so both ends agree on the wire format.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{MemberRequest, SetRequest};
pub use responses::{
    DeleteResponse, ErrorResponse, GetResponse, HealthResponse, MemberResponse, SetResponse,
    StatsResponse,
};
