//! Core renaming engine for lualift.
//!
//! This crate provides the pure, synchronous identifier-renaming
//! pipeline, with no I/O and no state shared across invocations:
//! - Literal masking (strings, long-bracket strings, comments)
//! - Line-oriented declaration, function, and property-usage scanning
//! - Ordered-rule semantic classification
//! - Unique-name allocation with keyword and protected-name avoidance
//! - Word-boundary-safe whole-token rewriting

pub mod classify;
pub mod engine;
pub mod mask;
pub mod name_pool;
pub mod rewrite;
pub mod scan;

pub use engine::{analyze, detect, rename, rename_with_report, AnalysisReport};
pub use name_pool::{RenameMap, RenamePair};
