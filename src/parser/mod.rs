// src/parser/mod.rs
pub mod build;
pub mod driver;
pub mod tables;

pub use build::build_tables;
pub use driver::{Node, Parser, Tree};
pub use tables::{Action, ParseTables};
