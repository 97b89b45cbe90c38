//! Language descriptor for ghostlang.
//!
//! The crate owns one immutable, process-lifetime record describing the
//! ghostlang grammar (symbol table, field table, packed SLR(1) action/goto
//! tables, lexer DFA, and production metadata) and publishes a stable
//! pointer to it through the exported C symbol `tree_sitter_ghostlang`.
//!
//! ```no_run
//! let lang = tree_sitter_ghostlang::language();
//! let parser = tree_sitter_ghostlang::Parser::new(lang).unwrap();
//! let tree = parser.parse("var x = 1;").unwrap();
//! assert_eq!(lang.symbol_name(tree.root.symbol), "source_file");
//! ```

pub mod grammar;
pub mod language;
pub mod lexer;
pub mod parser;

mod ffi;

pub use ffi::{language, tree_sitter_ghostlang};
pub use language::{ABI_VERSION, Language, MIN_COMPATIBLE_ABI_VERSION};
pub use parser::{Node, Parser, Tree};
