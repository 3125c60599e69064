//! Interface seam for the external minify/beautify formatter.
//!
//! The formatter itself is an external service consumed as a black
//! box; this module only fixes the contract the renaming engine's
//! output feeds into. Callers invoke the formatter after optional
//! renaming: `rename(source)` then `minify`/`beautify`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Options
// ============================================================================

/// Indentation style for beautified output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentStyle {
    Spaces,
    Tabs,
}

/// Options forwarded to the external formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Let the formatter rename local variables (distinct from the
    /// semantic renaming this crate performs).
    pub rename_variables: bool,
    /// Let the formatter rename globals.
    pub rename_globals: bool,
    /// Fold math constants during minification.
    pub fold_math_constants: bool,
    /// Indentation style for beautified output.
    pub indent: IndentStyle,
    /// Indent width when `indent` is `Spaces`.
    pub indent_width: u8,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            rename_variables: false,
            rename_globals: false,
            fold_math_constants: false,
            indent: IndentStyle::Spaces,
            indent_width: 4,
        }
    }
}

// ============================================================================
// Trait
// ============================================================================

/// Errors surfaced by a formatter implementation.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The formatter service could not be reached.
    #[error("formatter unavailable: {reason}")]
    Unavailable { reason: String },

    /// The formatter rejected the input.
    #[error("formatter rejected input: {message}")]
    Rejected { message: String },
}

/// External formatting service consumed as a black box.
///
/// Implementations receive valid Lua text (the renaming engine's
/// output) and return formatted Lua text.
pub trait Formatter {
    fn minify(&self, source: &str, options: &FormatOptions) -> Result<String, FormatError>;
    fn beautify(&self, source: &str, options: &FormatOptions) -> Result<String, FormatError>;
}

/// No-op formatter for tests and for callers that only want renaming.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Formatter for Passthrough {
    fn minify(&self, source: &str, _options: &FormatOptions) -> Result<String, FormatError> {
        Ok(source.to_string())
    }

    fn beautify(&self, source: &str, _options: &FormatOptions) -> Result<String, FormatError> {
        Ok(source.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = FormatOptions::default();
        assert!(!opts.rename_variables);
        assert_eq!(opts.indent, IndentStyle::Spaces);
        assert_eq!(opts.indent_width, 4);
    }

    #[test]
    fn options_serde_round_trip() {
        let opts = FormatOptions {
            rename_variables: true,
            rename_globals: false,
            fold_math_constants: true,
            indent: IndentStyle::Tabs,
            indent_width: 2,
        };
        let json = serde_json::to_string(&opts).expect("serializes");
        assert!(json.contains("\"tabs\""));
        let back: FormatOptions = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, opts);
    }

    #[test]
    fn passthrough_is_identity() {
        let opts = FormatOptions::default();
        let src = "local a = 1";
        assert_eq!(Passthrough.minify(src, &opts).expect("ok"), src);
        assert_eq!(Passthrough.beautify(src, &opts).expect("ok"), src);
    }
}
