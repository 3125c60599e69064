//! Rename-map construction: turning classifier candidates into a final
//! old-name→new-name mapping with global uniqueness.
//!
//! The pool is seeded with Lua reserved keywords, protected globals,
//! and every identifier token observed in the source (declared or
//! merely referenced), so a generated name can never collide with or
//! capture any of them. Each base label carries a running counter: the
//! first claim takes the bare label, later claims append 2, 3, and so
//! on.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::classify::Candidate;

// ============================================================================
// Reserved Names
// ============================================================================

/// Lua reserved keywords; never produced as new names and never
/// renamed as old names.
pub const LUA_KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

/// Well-known globals that must keep their spelling.
pub const PROTECTED_GLOBALS: &[&str] = &["game", "workspace", "script", "require", "print", "warn"];

pub fn is_keyword(name: &str) -> bool {
    LUA_KEYWORDS.contains(&name)
}

pub fn is_protected(name: &str) -> bool {
    is_keyword(name) || PROTECTED_GLOBALS.contains(&name)
}

// ============================================================================
// Rename Map
// ============================================================================

/// One resolved mapping, with the classifier category that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePair {
    pub old: String,
    pub new: String,
    pub category: String,
}

/// Final old-name→new-name mapping, injective on output, in source
/// order.
#[derive(Debug, Default)]
pub struct RenameMap {
    entries: Vec<RenamePair>,
}

impl RenameMap {
    pub fn get(&self, old: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.old == old)
            .map(|e| e.new.as_str())
    }

    pub fn contains_old(&self, old: &str) -> bool {
        self.entries.iter().any(|e| e.old == old)
    }

    pub fn entries(&self) -> &[RenamePair] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<RenamePair> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Name Pool
// ============================================================================

/// Per-invocation allocator of unique new names.
#[derive(Debug)]
pub struct NamePool {
    used: HashSet<String>,
    counters: HashMap<String, u32>,
}

impl Default for NamePool {
    fn default() -> Self {
        Self::new()
    }
}

impl NamePool {
    /// A pool seeded with keywords and protected globals.
    pub fn new() -> Self {
        let used = LUA_KEYWORDS
            .iter()
            .chain(PROTECTED_GLOBALS.iter())
            .map(|s| (*s).to_string())
            .collect();
        NamePool {
            used,
            counters: HashMap::new(),
        }
    }

    /// Mark a name as taken without allocating it.
    pub fn reserve(&mut self, name: &str) {
        self.used.insert(name.to_string());
    }

    /// Allocate a unique name from a base label: the bare label first,
    /// then `label2`, `label3`, … A keyword collision takes a `_`
    /// prefix instead.
    pub fn claim(&mut self, base: &str) -> String {
        let counter = self.counters.entry(base.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let mut candidate = if *counter == 1 {
                base.to_string()
            } else {
                format!("{}{}", base, *counter)
            };
            if LUA_KEYWORDS.contains(&candidate.as_str()) {
                candidate = format!("_{candidate}");
            }
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

// ============================================================================
// Map Building
// ============================================================================

/// Resolve classifier candidates into the final rename map.
///
/// Candidates must already be in source order (locals, then globals,
/// then functions); that order decides which declaration wins a bare
/// category label. `observed` holds every identifier token in the
/// source; seeding the pool with it keeps a generated name from
/// capturing a reference to a name that is never renamed. Protected
/// old names are never mapped; an identity suggestion keeps its name
/// but still reserves it.
pub fn build_rename_map(candidates: &[Candidate], observed: &HashSet<String>) -> RenameMap {
    let mut pool = NamePool::new();
    for name in observed {
        pool.reserve(name);
    }
    for candidate in candidates {
        pool.reserve(&candidate.old_name);
    }

    let mut map = RenameMap::default();
    for candidate in candidates {
        if is_protected(&candidate.old_name) || map.contains_old(&candidate.old_name) {
            continue;
        }
        if candidate.suggestion == candidate.old_name {
            continue;
        }
        let new = pool.claim(&candidate.suggestion);
        map.entries.push(RenamePair {
            old: candidate.old_name.clone(),
            new,
            category: candidate.category.to_string(),
        });
    }
    map
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(old: &str, suggestion: &str) -> Candidate {
        Candidate {
            old_name: old.to_string(),
            category: "test",
            suggestion: suggestion.to_string(),
        }
    }

    mod pool {
        use super::*;

        #[test]
        fn first_claim_is_bare_label() {
            let mut pool = NamePool::new();
            assert_eq!(pool.claim("Number"), "Number");
            assert_eq!(pool.claim("Number"), "Number2");
            assert_eq!(pool.claim("Number"), "Number3");
        }

        #[test]
        fn reserved_name_skipped() {
            let mut pool = NamePool::new();
            pool.reserve("Player");
            assert_eq!(pool.claim("Player"), "Player2");
        }

        #[test]
        fn protected_globals_never_allocated() {
            let mut pool = NamePool::new();
            assert_eq!(pool.claim("game"), "game2");
        }

        #[test]
        fn keyword_takes_underscore_prefix() {
            let mut pool = NamePool::new();
            assert_eq!(pool.claim("end"), "_end");
        }
    }

    mod map_building {
        use super::*;

        fn build(cands: &[Candidate]) -> RenameMap {
            build_rename_map(cands, &HashSet::new())
        }

        #[test]
        fn unique_new_names_with_counters() {
            let cands = vec![candidate("x", "Number"), candidate("y", "Number")];
            let map = build(&cands);
            assert_eq!(map.get("x"), Some("Number"));
            assert_eq!(map.get("y"), Some("Number2"));
        }

        #[test]
        fn map_is_injective() {
            let cands = vec![
                candidate("a", "Result"),
                candidate("b", "Result"),
                candidate("c", "Result"),
            ];
            let map = build(&cands);
            let mut seen = HashSet::new();
            for entry in map.entries() {
                assert!(seen.insert(entry.new.clone()), "duplicate {}", entry.new);
            }
        }

        #[test]
        fn existing_identifier_blocks_bare_label() {
            // A variable already named Players forces the suffix.
            let cands = vec![candidate("Players", "Players"), candidate("v", "Players")];
            let map = build(&cands);
            assert_eq!(map.get("Players"), None);
            assert_eq!(map.get("v"), Some("Players2"));
        }

        #[test]
        fn protected_old_names_are_skipped() {
            let cands = vec![candidate("game", "Service")];
            let map = build(&cands);
            assert!(map.is_empty());
        }

        #[test]
        fn duplicate_old_name_keeps_first_mapping() {
            let cands = vec![candidate("x", "Number"), candidate("x", "Text")];
            let map = build(&cands);
            assert_eq!(map.len(), 1);
            assert_eq!(map.get("x"), Some("Number"));
        }

        #[test]
        fn no_new_name_is_a_keyword() {
            let cands = vec![candidate("a", "end"), candidate("b", "while")];
            let map = build(&cands);
            for entry in map.entries() {
                assert!(!is_keyword(&entry.new), "keyword leaked: {}", entry.new);
            }
        }

        #[test]
        fn observed_identifier_blocks_bare_label() {
            // A name that is referenced but never declared must not be
            // captured by a generated name.
            let observed: HashSet<String> = ["Humanoid".to_string()].into_iter().collect();
            let map = build_rename_map(&[candidate("h", "Humanoid")], &observed);
            assert_eq!(map.get("h"), Some("Humanoid2"));
        }
    }
}
