//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod health;
pub mod scans;

pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use scans::{
    handle_ping, receive_scan, ScanRequest, ScanResponse, PING_MESSAGE, RECEIVED_MESSAGE,
};
