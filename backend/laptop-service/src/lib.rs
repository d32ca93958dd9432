//! PCBook laptop service
//!
//! Login, role-gated laptop catalog RPCs, and the client that drives them.

pub mod config;
pub mod db;
pub mod error;
pub mod grpc;
pub mod models;
pub mod policy;
pub mod services;

pub use error::{Result, ServiceError};
