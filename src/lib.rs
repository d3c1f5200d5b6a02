// The binary in main.rs drives the terminal; everything it renders lives here
// so integration tests and benchmarks can reach the practice core.

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod keyboard;
pub mod session;
pub mod store;
pub mod ui;
