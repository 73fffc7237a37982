//! Coordinate Transformation API Service Library
//!
//! This crate provides the HTTP server implementation for the versioned
//! coordinate transformation REST API.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
