//! JSON output types for the lualift CLI.
//!
//! These types are the contract between lualift and whichever thin
//! HTTP or tool boundary hosts it. All responses carry a
//! `schema_version` so consumers can detect incompatible changes.

use serde::{Deserialize, Serialize};

use lualift_core::{AnalysisReport, RenamePair};

/// Current output schema version.
pub const SCHEMA_VERSION: &str = "1.0";

// ============================================================================
// Response Types
// ============================================================================

/// Summary of one analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameSummary {
    /// Local declarations found.
    pub locals: usize,
    /// Global assignments found.
    pub globals: usize,
    /// Named functions found.
    pub functions: usize,
    /// Identifiers that received a new name.
    pub identifiers_renamed: usize,
}

/// Response for the rename operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameResponse {
    /// Status (`"ok"` on success).
    pub status: String,
    /// Schema version.
    pub schema_version: String,
    /// Summary counts.
    pub summary: RenameSummary,
    /// Applied mappings, in source order.
    pub mappings: Vec<RenamePair>,
    /// The rewritten source.
    pub renamed: String,
}

/// Response for the detect operation: the map without applying it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    /// Status (`"ok"` on success).
    pub status: String,
    /// Schema version.
    pub schema_version: String,
    /// Summary counts.
    pub summary: RenameSummary,
    /// Proposed mappings, in source order.
    pub mappings: Vec<RenamePair>,
}

// ============================================================================
// Constructors
// ============================================================================

fn summary_of(report: &AnalysisReport) -> RenameSummary {
    RenameSummary {
        locals: report.locals,
        globals: report.globals,
        functions: report.functions,
        identifiers_renamed: report.map.len(),
    }
}

impl RenameResponse {
    pub fn from_report(renamed: String, report: &AnalysisReport) -> Self {
        RenameResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            summary: summary_of(report),
            mappings: report.map.entries().to_vec(),
            renamed,
        }
    }
}

impl DetectResponse {
    pub fn from_report(report: &AnalysisReport) -> Self {
        DetectResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            summary: summary_of(report),
            mappings: report.map.entries().to_vec(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
