//! The actual passes that compile / transform from one data structure
//! to the next.
//!
//! The compilation process goes in this order:
//!
//! 1. [tokenize]
//! 2. [parse]
//! 3. [analyze] (a report only, nothing later reads it)
//! 4. [generate]
//! 5. [optimize]
//! 6. [emit]
//!
//! Also bundled here are the error types for parse + optimize. tokenize
//! drops what it can't read, and analyze, generate, and emit never fail

mod codegen;
mod lexer;
mod lower;
mod optimizer;
mod parser;
mod semantic;

pub use codegen::emit;
pub use lexer::tokenize;
pub use lower::generate;
pub use optimizer::{eliminate_dead_temps, fold_constants, optimize, OptimizeError};
pub use parser::{parse, ParseError};
pub use semantic::{analyze, infer, Scope, Symbol, SymbolTable};
