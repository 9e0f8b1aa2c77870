//! Shared modules for the street API service.

pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod utils;
