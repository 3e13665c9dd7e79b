// The binary in main.rs owns the terminal; everything it drives lives here so
// integration tests can exercise the state machine without a terminal.

pub mod app;
pub mod config;
pub mod content;
pub mod engine;
pub mod event;
pub mod runtime;
pub mod session;
pub mod store;
pub mod ui;
