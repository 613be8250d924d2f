//! Placeholder expansion
//!
//! This module provides:
//! - The bindings exposed to bundle templates (`RenderContext`)
//! - The casing helpers
//! - `TemplateEngine`, which renders an extracted tree in place

pub mod context;
pub mod engine;
pub mod helpers;

pub use context::RenderContext;
pub use engine::TemplateEngine;
