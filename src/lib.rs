//! Wicket - Minimal one-shot HTTP listener
//!
//! Core library for the readiness-driven accept loop and response helpers.

pub mod config;
pub mod error;
pub mod http;
pub mod server;
