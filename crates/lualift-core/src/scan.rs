//! Declaration and usage scanning over the masked buffer.
//!
//! Four independent line-oriented passes:
//!
//! 1. Function spans, via an explicit `Idle`/`InFunction` stack machine
//!    (push on `function name(args)` / `local function name(args)`,
//!    pop when the frame's block depth returns to zero)
//! 2. Local declarations and bare global assignments
//! 3. Property usage: every `ident.prop` / `ident:prop` occurrence
//! 4. Every identifier token, declared or not, so generated names can
//!    avoid capturing references to names this engine never renames
//!
//! Function-body boundaries must be known before usage attribution is
//! meaningful, so the passes stay separate. Malformed nesting is
//! tolerated: an `end` with no open frame is ignored, and a frame still
//! open at end of input is dropped rather than emitted half-built.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::mask::MaskTable;
use crate::name_pool::is_keyword;

// ============================================================================
// Types
// ============================================================================

/// How a name was introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Local,
    Global,
    FunctionLocal,
    FunctionGlobal,
}

/// A recorded name-introducing statement.
///
/// A multi-name `local a, b = …` yields one `Declaration` per name,
/// all sharing the same right-hand-side text.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    pub origin: Origin,
    /// Right-hand side with masked literals restored and comments
    /// dropped; empty when the declaration has no initializer.
    pub rhs: String,
    /// 1-indexed source line.
    pub line: u32,
}

/// A named function definition with its captured body.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub params: String,
    /// Body lines between the header and the closing `end`, with
    /// masked literals restored and comments dropped.
    pub body: String,
    pub origin: Origin,
    pub start_line: u32,
    pub end_line: u32,
}

/// Properties and methods observed on each identifier, in first-seen
/// order. Used as a fallback naming cue when a declaration's own
/// right-hand side is uninformative.
#[derive(Debug, Default)]
pub struct PropertyUsageIndex {
    map: HashMap<String, Vec<String>>,
}

impl PropertyUsageIndex {
    fn record(&mut self, base: &str, prop: &str) {
        let props = self.map.entry(base.to_string()).or_default();
        if !props.iter().any(|p| p == prop) {
            props.push(prop.to_string());
        }
    }

    pub fn properties_of(&self, name: &str) -> &[String] {
        self.map.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Everything the scanner collects from one masked buffer.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub declarations: Vec<Declaration>,
    pub functions: Vec<FunctionDef>,
    pub properties: PropertyUsageIndex,
    /// Every identifier token in the masked buffer, declared or not.
    /// Generated names must not collide with any of them.
    pub identifiers: HashSet<String>,
}

// ============================================================================
// Patterns
// ============================================================================

static FUNC_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(local\s+)?function\s+([A-Za-z_][A-Za-z0-9_.:]*)\s*\(([^)]*)\)")
        .expect("function pattern is valid")
});

static LOCAL_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*local\s+([A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)*)\s*(?:=\s*(.*))?$")
        .expect("local pattern is valid")
});

static GLOBAL_ASSIGN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z_]\w*)\s*=\s*([^=].*)$").expect("global pattern is valid"));

static PROPERTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z_]\w*)\s*[.:]\s*([A-Za-z_]\w*)").expect("property pattern is valid")
});

static BLOCK_OPENER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:function|if|for|while)\b").expect("opener pattern is valid"));

static END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bend\b").expect("end pattern is valid"));

static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z_]\w*").expect("identifier pattern is valid"));

// ============================================================================
// Scanning
// ============================================================================

/// Scan the masked buffer for declarations, functions, and property
/// usage. Fresh state per call; never fails.
pub fn scan(masked: &str, table: &MaskTable) -> ScanResult {
    let lines: Vec<&str> = masked.lines().collect();
    let mut result = ScanResult::default();
    scan_functions(&lines, table, &mut result);
    scan_declarations(&lines, table, &mut result);
    scan_properties(&lines, &mut result);
    scan_identifiers(&lines, &mut result);
    result
}

/// An open function frame on the scan stack.
struct OpenFunction {
    name: String,
    params: String,
    origin: Origin,
    start_line: u32,
    /// Unclosed block openers attributed to this frame; the frame
    /// completes when this returns to zero.
    depth: i32,
    body: Vec<String>,
}

fn scan_functions(lines: &[&str], table: &MaskTable, result: &mut ScanResult) {
    let mut stack: Vec<OpenFunction> = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx as u32 + 1;

        if let Some(caps) = FUNC_DECL_RE.captures(line) {
            // The header line is body text for every enclosing frame.
            for frame in &mut stack {
                frame.body.push((*line).to_string());
            }
            let origin = if caps.get(1).is_some() {
                Origin::FunctionLocal
            } else {
                Origin::FunctionGlobal
            };
            let name = caps[2].to_string();
            let params = caps[3].trim().to_string();
            let depth = block_delta(line);
            if depth <= 0 {
                // One-line definition: the body is what sits between the
                // parameter list and the trailing `end`.
                result.functions.push(FunctionDef {
                    name,
                    params,
                    body: table.restore_expr(&inline_body(line)),
                    origin,
                    start_line: line_no,
                    end_line: line_no,
                });
            } else {
                stack.push(OpenFunction {
                    name,
                    params,
                    origin,
                    start_line: line_no,
                    depth,
                    body: Vec::new(),
                });
            }
            continue;
        }

        if stack.is_empty() {
            // An `end` with nothing open is ignored.
            continue;
        }

        // How many frames does this line close?
        let mut delta = block_delta(line);
        let mut closing = 0usize;
        for frame in stack.iter().rev() {
            let after = frame.depth + delta;
            if after > 0 {
                break;
            }
            closing += 1;
            delta = after;
        }

        let keep = stack.len() - closing;
        // The line is body text only for frames that stay open; a
        // frame's own closing line is not part of its body.
        for frame in &mut stack[..keep] {
            frame.body.push((*line).to_string());
        }
        if keep > 0 {
            stack[keep - 1].depth += delta;
        }
        for done in stack.drain(keep..) {
            result.functions.push(finish(done, line_no, table));
        }
    }

    // Frames still open at end of input are incomplete and dropped.
    result.functions.sort_by_key(|f| f.start_line);
}

fn finish(frame: OpenFunction, end_line: u32, table: &MaskTable) -> FunctionDef {
    FunctionDef {
        name: frame.name,
        params: frame.params,
        body: table.restore_expr(&frame.body.join("\n")),
        origin: frame.origin,
        start_line: frame.start_line,
        end_line,
    }
}

/// Net block nesting contributed by one line: `function`/`if`/`for`/
/// `while` (and a leading `do`) open, `end` closes.
fn block_delta(line: &str) -> i32 {
    let mut opens = BLOCK_OPENER_RE.find_iter(line).count() as i32;
    let trimmed = line.trim();
    if trimmed == "do" || trimmed.starts_with("do ") {
        opens += 1;
    }
    opens - END_RE.find_iter(line).count() as i32
}

/// Body text of a one-line function definition.
fn inline_body(line: &str) -> String {
    let rest = line.split_once(')').map(|(_, rest)| rest).unwrap_or("");
    let rest = rest.trim();
    rest.strip_suffix("end").unwrap_or(rest).trim().to_string()
}

fn scan_declarations(lines: &[&str], table: &MaskTable, result: &mut ScanResult) {
    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx as u32 + 1;
        if FUNC_DECL_RE.is_match(line) {
            continue;
        }
        // Trailing comments would defeat the end-anchored patterns.
        let line = table.strip_comments(line);
        let line = line.trim_end();
        if let Some(caps) = LOCAL_DECL_RE.captures(line) {
            let rhs = caps
                .get(2)
                .map(|m| table.restore_expr(m.as_str()).trim().to_string())
                .unwrap_or_default();
            for name in caps[1].split(',') {
                let name = name.trim();
                if !name.is_empty() && !is_keyword(name) {
                    result.declarations.push(Declaration {
                        name: name.to_string(),
                        origin: Origin::Local,
                        rhs: rhs.clone(),
                        line: line_no,
                    });
                }
            }
            continue;
        }
        if let Some(caps) = GLOBAL_ASSIGN_RE.captures(line) {
            let name = caps[1].to_string();
            if !is_keyword(&name) {
                result.declarations.push(Declaration {
                    name,
                    origin: Origin::Global,
                    rhs: table.restore_expr(&caps[2]).trim().to_string(),
                    line: line_no,
                });
            }
        }
    }
}

fn scan_properties(lines: &[&str], result: &mut ScanResult) {
    for line in lines {
        for caps in PROPERTY_RE.captures_iter(line) {
            let base = &caps[1];
            if !is_keyword(base) {
                result.properties.record(base, &caps[2]);
            }
        }
    }
}

fn scan_identifiers(lines: &[&str], result: &mut ScanResult) {
    for line in lines {
        for m in IDENT_RE.find_iter(line) {
            result.identifiers.insert(m.as_str().to_string());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
