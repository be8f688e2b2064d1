// src/lib.rs

#[macro_use]
pub mod macros;

pub mod affe;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod csv;
pub mod data;
pub mod error;
pub mod fetch;
pub mod file;
pub mod log;
pub mod museum;
pub mod outcome;
pub mod pipeline;
pub mod progress;
pub mod sink;
pub mod store;

pub use error::{Error, Result};
