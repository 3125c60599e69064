//! Pipeline orchestration: mask → scan → classify → build map →
//! rewrite.
//!
//! Every invocation constructs fresh state; nothing is shared between
//! calls, so the output depends solely on the input text. The engine
//! never fails on malformed Lua: degenerate input degrades to fewer
//! (or zero) renames, not to an error.

use tracing::debug;

use crate::classify::{classify_declaration, classify_function, Candidate};
use crate::mask::mask;
use crate::name_pool::{build_rename_map, RenameMap, RenamePair};
use crate::rewrite::rewrite;
use crate::scan::{scan, Origin, ScanResult};

/// Outcome of analyzing one source text.
#[derive(Debug, Default)]
pub struct AnalysisReport {
    /// Local declarations found.
    pub locals: usize,
    /// Global assignments found.
    pub globals: usize,
    /// Named functions found.
    pub functions: usize,
    /// The resolved rename map.
    pub map: RenameMap,
}

/// Rename every classified identifier in `source`, best effort.
///
/// Empty input comes back unchanged; string literals, long-bracket
/// strings, and comments come back byte-identical.
pub fn rename(source: &str) -> String {
    rename_with_report(source).0
}

/// Like [`rename`], also returning the analysis that produced the
/// rewrite.
pub fn rename_with_report(source: &str) -> (String, AnalysisReport) {
    let (masked, table) = mask(source);
    debug!(spans = table.len(), "masked literals and comments");
    let scanned = scan(&masked, &table);
    let report = build_report(&scanned);
    let renamed = rewrite(&masked, &report.map, &table);
    (renamed, report)
}

/// Analyze `source` without rewriting it.
pub fn analyze(source: &str) -> AnalysisReport {
    let (masked, table) = mask(source);
    let scanned = scan(&masked, &table);
    build_report(&scanned)
}

/// The rename map for `source`, without applying it. Lets callers
/// preview or edit mappings before application.
pub fn detect(source: &str) -> Vec<RenamePair> {
    analyze(source).map.into_entries()
}

fn build_report(scanned: &ScanResult) -> AnalysisReport {
    let candidates = collect_candidates(scanned);
    let map = build_rename_map(&candidates, &scanned.identifiers);
    let report = AnalysisReport {
        locals: count_origin(scanned, Origin::Local),
        globals: count_origin(scanned, Origin::Global),
        functions: scanned.functions.len(),
        map,
    };
    debug!(
        locals = report.locals,
        globals = report.globals,
        functions = report.functions,
        renames = report.map.len(),
        "analysis complete"
    );
    report
}

/// Candidates in resolution order: locals, then globals, then
/// functions, each in source order. The order decides which
/// declaration wins a bare category label.
fn collect_candidates(scanned: &ScanResult) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for decl in scanned
        .declarations
        .iter()
        .filter(|d| d.origin == Origin::Local)
    {
        candidates.push(classify_declaration(decl, &scanned.properties));
    }
    for decl in scanned
        .declarations
        .iter()
        .filter(|d| d.origin == Origin::Global)
    {
        candidates.push(classify_declaration(decl, &scanned.properties));
    }
    for func in &scanned.functions {
        // A dotted or colon name is a table field, not a bare token;
        // renaming it would detach the method from its table.
        if func.name.contains(['.', ':']) {
            continue;
        }
        candidates.push(classify_function(func));
    }
    candidates
}

fn count_origin(scanned: &ScanResult, origin: Origin) -> usize {
    scanned
        .declarations
        .iter()
        .filter(|d| d.origin == origin)
        .count()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_unchanged() {
        assert_eq!(rename(""), "");
        assert!(detect("").is_empty());
    }

    #[test]
    fn service_lookup_end_to_end() {
        let out = rename("local v = game:GetService(\"Players\")\nprint(v.LocalPlayer)\n");
        assert_eq!(
            out,
            "local Players = game:GetService(\"Players\")\nprint(Players.LocalPlayer)\n"
        );
    }

    #[test]
    fn report_counts_by_origin() {
        let src = "local a = 1\nscore = 0\nfunction tick()\nend\n";
        let report = analyze(src);
        assert_eq!(report.locals, 1);
        assert_eq!(report.globals, 1);
        assert_eq!(report.functions, 1);
    }

    #[test]
    fn detect_does_not_modify_anything() {
        let src = "local x = 5\n";
        let pairs = detect(src);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].old, "x");
        assert_eq!(pairs[0].new, "Number");
        assert_eq!(pairs[0].category, "number");
    }

    #[test]
    fn determinism_across_calls() {
        let src = "local a = 1\nlocal b = 2\nlocal c = \"s\"\n";
        assert_eq!(rename(src), rename(src));
        assert_eq!(detect(src), detect(src));
    }

    #[test]
    fn table_method_names_are_never_mapped() {
        let src = "function M.util:run(a) return self.total + a end\n";
        assert!(detect(src).is_empty());
        assert_eq!(rename(src), src);
    }

    #[test]
    fn referenced_but_undeclared_names_are_reserved() {
        let src = "local h = game.Players.LocalPlayer.Character.Humanoid\nprint(Humanoid.Health)\n";
        let pairs = detect(src);
        assert_eq!(pairs[0].old, "h");
        assert_eq!(pairs[0].new, "Humanoid2");
    }

    #[test]
    fn locals_resolve_before_globals_and_functions() {
        // All three classify to different labels, but two locals with
        // the same label show source-order counter assignment.
        let src = "local x = 5\nlocal y = 10\n";
        let pairs = detect(src);
        assert_eq!(pairs[0].new, "Number");
        assert_eq!(pairs[1].new, "Number2");
    }
}
