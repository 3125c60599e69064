//! Literal masking: lifts string literals, long-bracket strings, and
//! comments out of the source before any pattern heuristic runs.
//!
//! Every recognized span is appended to a [`MaskTable`] and replaced in
//! the working buffer by a placeholder token. Placeholders are delimited
//! by the control characters `\u{1}` and `\u{2}` and carry the span's
//! table index, so they cannot occur in real source text, contain no
//! identifier characters, and restoration is an exact table lookup.
//!
//! Masking is strictly single-pass and left-to-right. Recognition
//! priority at each position:
//!
//! 1. Long-bracket strings `[[ … ]]` (any `[=*[` level)
//! 2. Quoted strings `"…"` / `'…'` (backslash escapes respected)
//! 3. Block comments `--[[ … ]]` (any level)
//! 4. Line comments `--` to end of line
//!
//! An unterminated string or comment is masked up to end of input;
//! masking never fails.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches one placeholder token and captures its table index.
pub(crate) static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x01(\d+)\x02").expect("placeholder pattern is valid"));

// ============================================================================
// Types
// ============================================================================

/// Kind of source span lifted into the mask table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKind {
    /// Quoted string literal, including its quotes.
    Str,
    /// Long-bracket string, including its brackets.
    LongStr,
    /// Line or block comment, including the `--` introducer.
    Comment,
}

/// One masked span: its kind, verbatim text, and table index.
#[derive(Debug, Clone)]
pub struct MaskedSpan {
    pub kind: MaskKind,
    pub text: String,
    pub id: usize,
}

/// Ordered side-table of masked spans, in source order.
#[derive(Debug, Default)]
pub struct MaskTable {
    spans: Vec<MaskedSpan>,
}

impl MaskTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: MaskKind, text: String) -> usize {
        let id = self.spans.len();
        self.spans.push(MaskedSpan { kind, text, id });
        id
    }

    pub fn get(&self, id: usize) -> Option<&MaskedSpan> {
        self.spans.get(id)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The placeholder token embedding a table index.
    pub fn placeholder(id: usize) -> String {
        format!("\u{1}{id}\u{2}")
    }

    /// Replace every placeholder in `text` with its original span text.
    ///
    /// Unknown indices are left in place rather than dropped.
    pub fn restore(&self, text: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(text, |caps: &regex::Captures<'_>| {
                self.lookup(caps)
                    .map(|span| span.text.clone())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Like [`restore`](Self::restore), but comment spans are dropped.
    ///
    /// Used when reconstructing expression and body text for
    /// classification, where a trailing comment is not part of the
    /// expression.
    pub fn restore_expr(&self, text: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(text, |caps: &regex::Captures<'_>| {
                match self.lookup(caps) {
                    Some(span) if span.kind == MaskKind::Comment => String::new(),
                    Some(span) => span.text.clone(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Remove comment placeholders from `text`, leaving other
    /// placeholders untouched.
    pub fn strip_comments(&self, text: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(text, |caps: &regex::Captures<'_>| {
                match self.lookup(caps) {
                    Some(span) if span.kind == MaskKind::Comment => String::new(),
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    fn lookup(&self, caps: &regex::Captures<'_>) -> Option<&MaskedSpan> {
        caps[1].parse::<usize>().ok().and_then(|id| self.get(id))
    }
}

// ============================================================================
// Masking
// ============================================================================

/// Scan `source` once and lift every literal/comment span into a table.
///
/// Returns the masked working buffer and the table needed to restore it.
/// Pure function of the input text.
pub fn mask(source: &str) -> (String, MaskTable) {
    let bytes = source.as_bytes();
    let mut table = MaskTable::new();
    let mut out = String::with_capacity(source.len());
    let mut run_start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        let span = match bytes[i] {
            b'[' => long_bracket_end(bytes, i).map(|end| (MaskKind::LongStr, end)),
            b'"' | b'\'' => Some((MaskKind::Str, quoted_end(bytes, i))),
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                let end = match long_bracket_end(bytes, i + 2) {
                    Some(end) => end,
                    None => line_end(bytes, i),
                };
                Some((MaskKind::Comment, end))
            }
            _ => None,
        };
        match span {
            Some((kind, end)) => {
                out.push_str(&source[run_start..i]);
                let id = table.push(kind, source[i..end].to_string());
                out.push_str(&MaskTable::placeholder(id));
                i = end;
                run_start = end;
            }
            None => i += 1,
        }
    }
    out.push_str(&source[run_start..]);
    (out, table)
}

/// End offset (exclusive) of a long-bracket span opening at `start`,
/// or `None` if `start` is not a long-bracket opener.
///
/// Unterminated spans run to end of input.
fn long_bracket_end(bytes: &[u8], start: usize) -> Option<usize> {
    if bytes.get(start) != Some(&b'[') {
        return None;
    }
    let mut level = 0usize;
    let mut j = start + 1;
    while bytes.get(j) == Some(&b'=') {
        level += 1;
        j += 1;
    }
    if bytes.get(j) != Some(&b'[') {
        return None;
    }
    j += 1;
    while j < bytes.len() {
        if bytes[j] == b']' {
            let mut k = j + 1;
            let mut eq = 0usize;
            while bytes.get(k) == Some(&b'=') {
                eq += 1;
                k += 1;
            }
            if eq == level && bytes.get(k) == Some(&b']') {
                return Some(k + 1);
            }
        }
        j += 1;
    }
    Some(bytes.len())
}

/// End offset (exclusive) of a quoted string opening at `start`.
///
/// An escaped quote does not terminate the literal. Unterminated
/// strings run to end of input.
fn quoted_end(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut j = start + 1;
    while j < bytes.len() {
        if bytes[j] == b'\\' {
            j += 2;
        } else if bytes[j] == quote {
            return j + 1;
        } else {
            j += 1;
        }
    }
    bytes.len()
}

/// Offset of the newline terminating the line containing `start`,
/// or end of input. The newline itself stays in the buffer.
fn line_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|p| start + p)
        .unwrap_or(bytes.len())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod masking {
        use super::*;

        #[test]
        fn quoted_string_is_masked() {
            let (masked, table) = mask(r#"local s = "hello""#);
            assert_eq!(table.len(), 1);
            assert_eq!(table.get(0).map(|s| s.text.as_str()), Some("\"hello\""));
            assert!(!masked.contains("hello"));
            assert!(masked.starts_with("local s = "));
        }

        #[test]
        fn escaped_quote_does_not_terminate() {
            let (_, table) = mask(r#"local s = "say \"hi\" now" .. x"#);
            assert_eq!(table.len(), 1);
            assert_eq!(
                table.get(0).map(|s| s.text.as_str()),
                Some(r#""say \"hi\" now""#)
            );
        }

        #[test]
        fn single_quoted_string() {
            let (_, table) = mask("local s = 'abc'");
            assert_eq!(table.get(0).map(|s| s.kind), Some(MaskKind::Str));
        }

        #[test]
        fn long_bracket_string() {
            let (masked, table) = mask("local s = [[multi\nline]] + 1");
            assert_eq!(table.len(), 1);
            assert_eq!(table.get(0).map(|s| s.kind), Some(MaskKind::LongStr));
            assert_eq!(
                table.get(0).map(|s| s.text.as_str()),
                Some("[[multi\nline]]")
            );
            assert!(masked.ends_with(" + 1"));
        }

        #[test]
        fn leveled_long_bracket_string() {
            let (_, table) = mask("local s = [==[has ]] inside]==]");
            assert_eq!(table.len(), 1);
            assert_eq!(
                table.get(0).map(|s| s.text.as_str()),
                Some("[==[has ]] inside]==]")
            );
        }

        #[test]
        fn line_comment_keeps_newline() {
            let (masked, table) = mask("local a = 1 -- note\nlocal b = 2");
            assert_eq!(table.len(), 1);
            assert_eq!(table.get(0).map(|s| s.kind), Some(MaskKind::Comment));
            assert!(masked.contains('\n'));
            assert!(!masked.contains("note"));
        }

        #[test]
        fn block_comment_spans_lines() {
            let (masked, table) = mask("a = 1 --[[ first\nsecond ]] b = 2");
            assert_eq!(table.len(), 1);
            assert_eq!(table.get(0).map(|s| s.kind), Some(MaskKind::Comment));
            assert!(masked.contains("b = 2"));
        }

        #[test]
        fn unterminated_string_masks_to_end() {
            let (masked, table) = mask("local a = \"oops\nlocal b = 2");
            assert_eq!(table.len(), 1);
            assert_eq!(
                table.get(0).map(|s| s.text.as_str()),
                Some("\"oops\nlocal b = 2")
            );
            assert_eq!(masked, format!("local a = {}", MaskTable::placeholder(0)));
        }

        #[test]
        fn unterminated_block_comment_masks_to_end() {
            let (_, table) = mask("a = 1 --[[ never closed");
            assert_eq!(table.len(), 1);
            assert_eq!(table.get(0).map(|s| s.kind), Some(MaskKind::Comment));
        }

        #[test]
        fn empty_input() {
            let (masked, table) = mask("");
            assert_eq!(masked, "");
            assert!(table.is_empty());
        }

        #[test]
        fn bracket_without_second_bracket_passes_through() {
            let (masked, table) = mask("local t = x[1] + y[i]");
            assert!(table.is_empty());
            assert_eq!(masked, "local t = x[1] + y[i]");
        }
    }

    mod restoring {
        use super::*;

        #[test]
        fn mask_then_restore_is_identity() {
            let source = "local a = \"x\" -- c\nlocal s = [[long]]\nb = 'y'\n";
            let (masked, table) = mask(source);
            assert_eq!(table.restore(&masked), source);
        }

        #[test]
        fn restore_expr_drops_comments() {
            let (masked, table) = mask("local a = 5 -- the answer");
            let restored = table.restore_expr(&masked);
            assert_eq!(restored.trim_end(), "local a = 5");
        }

        #[test]
        fn unknown_placeholder_left_in_place() {
            let table = MaskTable::new();
            let bogus = MaskTable::placeholder(7);
            assert_eq!(table.restore(&bogus), bogus);
        }
    }
}
