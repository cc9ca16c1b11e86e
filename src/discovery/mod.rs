//! Discovery layer: tree walking, classification, and override rules.
//!
//! This module handles:
//! - Two-sweep directory traversal
//! - Built-in exclusions and binary/text detection
//! - `.blobify` override application

mod builtin;
mod pipeline;
mod text_detection;
mod types;

pub use pipeline::Scanner;
pub use types::{DiscoveredFile, DiscoverySnapshot, FileState};
