//! notecraft: handwritten study-memo image generator.
//!
//! Turns free-text study notes into stylized memo images through an external
//! image model and keeps every result in a folder-organized catalog.
//!
//! - [`catalog`] - Image and folder records, persistence backends, queries
//! - [`assets`] - Image files on disk
//! - [`generation`] - Prompt building and the image model gateway
//! - [`http`] - axum API
//! - [`config`] / [`paths`] - `notecraft.toml` and data directory layout

pub mod assets;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod generation;
pub mod http;
pub mod paths;
pub mod presets;
pub mod security;
pub mod ui;

pub use error::{Error, Result};
