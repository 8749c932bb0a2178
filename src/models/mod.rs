//! Request and Response models for the cache gateway API
//!
//! DTOs for HTTP request and response bodies.

pub mod requests;
pub mod responses;

pub use requests::{KeysRequest, PatternRequest, SetManyRequest, SetRequest, VersionQuery};
pub use responses::{
    DeleteResponse, GetManyResponse, GetResponse, HealthResponse, SetManyResponse, SetResponse,
    StatsResponse,
};
