#![forbid(unsafe_code)]

//! Terminal showcase for the scramble text effects.
//!
//! The binary wires [`app::App`] to a crossterm [`session::Session`]; the
//! modules are public so the model can be driven headless in tests.

pub mod app;
pub mod cli;
pub mod logging;
pub mod session;
pub mod settings;
