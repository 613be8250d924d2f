//! Scaffolding orchestration
//!
//! This module provides:
//! - The ordered stages of a run
//! - Progress events and the observer that receives them
//! - The orchestrator driving catalog, archive, render and runtime steps
//! - The success report

pub mod event;
pub mod orchestrator;
pub mod report;
pub mod stage;

pub use event::{PipelineEvent, PipelineObserver};
pub use orchestrator::{
    resolve_root, Orchestrator, ScaffoldOptions, ScaffoldOutcome, ScaffoldRequest,
    DEFAULT_GITIGNORE,
};
pub use report::{CommandHint, PackageHints, Report};
pub use stage::Stage;
