//! lualift: semantic identifier renaming for obfuscated Lua source.
//!
//! A heuristic analyzer that infers a human-meaningful name for every
//! obfuscated local, global, and function in a Lua script, and rewrites
//! the source with those names while leaving string literals and
//! comments byte-for-byte untouched.

// Core engine - re-exported from lualift-core
pub use lualift_core::classify;
pub use lualift_core::engine;
pub use lualift_core::mask;
pub use lualift_core::name_pool;
pub use lualift_core::rewrite;
pub use lualift_core::scan;

// Front doors for callers
pub mod cli;
pub mod error;
pub mod formatter;
pub mod output;
