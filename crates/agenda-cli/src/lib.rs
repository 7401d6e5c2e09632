//! Agenda CLI library.
//!
//! This crate provides the fixture replay interface for the agenda engine.

mod cli;
pub mod commands;
mod config;
pub mod fixture;

pub use cli::{Cli, Commands};
pub use config::{Config, parse_zone};
pub use fixture::Fixture;
