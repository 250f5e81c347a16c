// all roads lead to lib.rs

#[macro_use]
extern crate log;

pub mod intermediates;
mod passes;
mod span;

pub use intermediates::token::{Token, TokenSummary, TokenType};
pub use intermediates::{asm, ast, tac};
pub use passes::*;
pub use span::Span;

/// The approximate types the symbol pass infers. Nothing is ever rejected
/// for having the wrong one
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Type {
    Int,
    Float,
    Str,
    Char,
    Func,
}
impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Str => "string",
            Type::Char => "char",
            Type::Func => "func",
        };
        write!(f, "{}", s)
    }
}

/// Anything that stops a compile. Lexing, analysis, lowering and codegen
/// never fail, so it's the parser or the optimizer
#[derive(PartialEq, Debug)]
pub enum CompileError {
    Parse(ParseError),
    Optimize(OptimizeError),
}
impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CompileError::Parse(e) => write!(f, "{}", e),
            CompileError::Optimize(e) => write!(f, "{}", e),
        }
    }
}
impl std::error::Error for CompileError {}
impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}
impl From<OptimizeError> for CompileError {
    fn from(e: OptimizeError) -> Self {
        CompileError::Optimize(e)
    }
}

/// What every pass produced for one source file
#[derive(Debug)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub program: ast::Program,
    pub symbols: SymbolTable,
    pub tac: Vec<tac::Instruction>,
    pub optimized: Vec<tac::Instruction>,
    pub asm: Vec<asm::Asm>,
}

/// Runs the whole pipeline. Each pass gets its own fresh state, so separate
/// compiles never share counters or scopes
pub fn compile(text: &str) -> Result<Compilation, CompileError> {
    let tokens = tokenize(text);
    let program = parse(tokens.clone())?;
    let symbols = analyze(&program);
    let tac = generate(&program);
    let optimized = optimize(&tac)?;
    let asm = emit(&optimized);
    info!(
        "compiled {} tokens into {} TAC lines, {} after optimizing, {} assembly lines",
        tokens.len(),
        tac.len(),
        optimized.len(),
        asm.len()
    );
    Ok(Compilation { tokens, program, symbols, tac, optimized, asm })
}

pub fn fmt_vec<T: std::fmt::Display>(vec: &[T]) -> String {
    fmt_vec_with(vec, "", "\n")
}
pub fn fmt_vec_with<T: std::fmt::Display>(vec: &[T], prefix: &str, sep: &str) -> String {
    vec.iter().map(|e| format!("{}{}", prefix, e)).collect::<Vec<String>>().join(sep)
}
