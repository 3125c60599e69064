//! CLI front doors: input reading, boundary validation, JSON rendering.
//!
//! Input validation (non-empty source) happens here, not in the core
//! engine; the engine itself never rejects input.

use std::fs;
use std::io::Read;
use std::path::Path;

use lualift_core::engine;
use tracing::debug;

use crate::error::LiftError;
use crate::output::{DetectResponse, RenameResponse};

/// Read source from a file path, or from stdin when the path is `-`.
///
/// Rejects empty (or whitespace-only) input at the boundary.
fn read_source(input: &str) -> Result<String, LiftError> {
    let source = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        let path = Path::new(input);
        if !path.exists() {
            return Err(LiftError::file_not_found(input));
        }
        fs::read_to_string(path)?
    };
    if source.trim().is_empty() {
        return Err(LiftError::invalid_args("input source is empty"));
    }
    Ok(source)
}

/// Run the rename operation.
///
/// Returns the rewritten source, or a JSON envelope with the mapping
/// and summary when `json` is set.
pub fn run_rename(input: &str, json: bool) -> Result<String, LiftError> {
    let source = read_source(input)?;
    debug!(bytes = source.len(), json, "rename request");
    let (renamed, report) = engine::rename_with_report(&source);
    if json {
        let response = RenameResponse::from_report(renamed, &report);
        Ok(serde_json::to_string_pretty(&response)?)
    } else {
        Ok(renamed)
    }
}

/// Run the detect operation: the proposed rename map as JSON, without
/// applying it.
pub fn run_detect(input: &str) -> Result<String, LiftError> {
    let source = read_source(input)?;
    debug!(bytes = source.len(), "detect request");
    let report = engine::analyze(&source);
    let response = DetectResponse::from_report(&report);
    Ok(serde_json::to_string_pretty(&response)?)
}

// ============================================================================
// Tests
// ============================================================================
