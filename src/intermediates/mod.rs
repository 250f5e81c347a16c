//! The data structures handed from one pass to the next, in pipeline order:
//! [token] -> [ast] -> [tac] -> [asm]

pub mod asm;
pub mod ast;
pub mod tac;
pub mod token;
