//! Library crate for booktable.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state, table page controller and update loop (`app`)
//! - Command-line flags (`cli`) and config files (`config`)
//! - Error and result types (`error`)
//! - Local sorting and selection totals (`grid`)
//! - Wire types for book records (`model`)
//! - Request wrappers for the book API (`service`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `booktable` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod grid;
pub mod model;
pub mod service;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
