//! template-sync - keep a collection's note types in step with a template repository
//!
//! This crate provides the core functionality for the `template-sync` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Note type definitions (NoteType, Field, Template)
//! - [`storage`] - Collection store contract and its SQLite implementation
//! - [`sync`] - Fetch, diff and reconcile operations
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod sync;

pub use error::{Error, Result};
