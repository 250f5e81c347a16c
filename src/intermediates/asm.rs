//! The pseudo-assembly listing, the last thing the pipeline produces.
//! Nothing here is machine code: there are no addresses or registers, just
//! label definitions and one- or two-operand mnemonics for a reader.

use crate::tac::{Label, Operand, Place, Rvalue};

#[derive(PartialEq, Clone, Debug)]
pub enum Asm {
    /// `main:` or `L1:`
    Label(String),
    Mov(Place, Rvalue),
    Out(Operand),
    Cmp(Operand),
    Cmpz(Operand),
    Jnz(Label),
    Jz(Label),
    Jmp(Label),
    Ret(Operand),
}
impl std::fmt::Display for Asm {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Asm::Label(name) => write!(f, "{}:", name),
            // MOV keeps the whole TAC assignment as its operand
            Asm::Mov(place, value) => write!(f, "MOV {} = {}", place, value),
            Asm::Out(o) => write!(f, "OUT {}", o),
            Asm::Cmp(o) => write!(f, "CMP {}", o),
            Asm::Cmpz(o) => write!(f, "CMPZ {}", o),
            Asm::Jnz(l) => write!(f, "JNZ {}", l),
            Asm::Jz(l) => write!(f, "JZ {}", l),
            Asm::Jmp(l) => write!(f, "JMP {}", l),
            Asm::Ret(o) => write!(f, "RET {}", o),
        }
    }
}
