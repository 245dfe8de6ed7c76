// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod mail;
pub mod progress;
pub mod report;
pub mod runner;
pub mod specs;
pub mod store;

pub use error::{Error, Result};
