//! Safe rewriting: whole-token application of a rename map to the
//! masked buffer, followed by placeholder restoration.
//!
//! A single alternation pattern covers every map key, longest key
//! first so a shorter key never matches inside a longer one, anchored
//! on both sides by word boundaries. Only the text between
//! placeholders is scanned; placeholder tokens themselves are restored
//! verbatim from the mask table in the same left-to-right pass, so
//! string literals and comments come out byte-identical.

use regex::Regex;

use crate::mask::{MaskTable, PLACEHOLDER_RE};
use crate::name_pool::RenameMap;

/// Apply `map` to the masked buffer and restore every masked span.
pub fn rewrite(masked: &str, map: &RenameMap, table: &MaskTable) -> String {
    if map.is_empty() {
        return table.restore(masked);
    }

    let mut keys: Vec<&str> = map.entries().iter().map(|e| e.old.as_str()).collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let pattern = format!(
        r"\b(?:{})\b",
        keys.iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|")
    );
    let ident_re = match Regex::new(&pattern) {
        Ok(re) => re,
        // An unbuildable pattern means no rename can be applied safely;
        // the source still round-trips through the mask table.
        Err(_) => return table.restore(masked),
    };

    let mut out = String::with_capacity(masked.len());
    let mut last = 0usize;
    for m in PLACEHOLDER_RE.find_iter(masked) {
        out.push_str(&apply_renames(&ident_re, map, &masked[last..m.start()]));
        out.push_str(&table.restore(m.as_str()));
        last = m.end();
    }
    out.push_str(&apply_renames(&ident_re, map, &masked[last..]));
    out
}

fn apply_renames(re: &Regex, map: &RenameMap, segment: &str) -> String {
    re.replace_all(segment, |caps: &regex::Captures<'_>| {
        map.get(&caps[0]).unwrap_or(&caps[0]).to_string()
    })
    .into_owned()
}

// ============================================================================
// Tests
// ============================================================================
