//! Read-only HTTP API over a cleaned table.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
