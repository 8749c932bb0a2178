//! Cache Module
//!
//! The versioned, namespaced cache façade over a [`Repository`].
//!
//! [`Repository`]: crate::repository::Repository

mod config;
mod service;

#[cfg(test)]
mod property_tests;

pub use config::CacheConfig;
pub use service::Cache;
