//! HTTP request handlers for the transformation API.

pub mod crs;
pub mod health;
pub mod info;
pub mod trans;
