//! unitconv library
//!
//! Conversion engine, currency rate cache, per-session history, and the
//! terminal UI built on them. Exposed as a library for integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod convert;
pub mod data;
pub mod logging;
pub mod session;
pub mod ui;
