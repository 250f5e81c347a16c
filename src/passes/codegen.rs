use crate::asm::Asm;
use crate::tac::Instruction;

/// One TAC instruction becomes one assembly line, except the conditional
/// jumps which become a compare and a jump
fn gen_instruction(inst: &Instruction, out: &mut Vec<Asm>) {
    use Instruction::*;
    match inst {
        FnLabel(name) => out.push(Asm::Label(name.clone())),
        Print(value) => out.push(Asm::Out(value.clone())),
        IfZ(cond, target) => {
            out.push(Asm::Cmpz(cond.clone()));
            out.push(Asm::Jz(*target));
        }
        If(cond, target) => {
            out.push(Asm::Cmp(cond.clone()));
            out.push(Asm::Jnz(*target));
        }
        Goto(target) => out.push(Asm::Jmp(*target)),
        Return(value) => out.push(Asm::Ret(value.clone())),
        Label(label) => out.push(Asm::Label(label.to_string())),
        Assign(place, value) => out.push(Asm::Mov(place.clone(), value.clone())),
    }
}

/// Never fails, every instruction has a translation
pub fn emit(tac: &[Instruction]) -> Vec<Asm> {
    let mut asm = Vec::with_capacity(tac.len());
    for inst in tac {
        gen_instruction(inst, &mut asm);
    }
    asm
}

#[cfg(test)]
mod test {
    use super::emit;
    use crate::tac::parse_listing;

    fn asm_of(listing: &str) -> Vec<String> {
        emit(&parse_listing(listing)).iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn every_form() {
        assert_eq!(
            asm_of(
                "label main
                x = 3
                T1 = x < 3
                PRINT x
                IFZ T1 GOTO L2
                IF T1 GOTO L1
                GOTO L1
                L1:
                RETURN 0"
            ),
            vec![
                "main:", "MOV x = 3", "MOV T1 = x < 3", "OUT x", "CMPZ T1", "JZ L2", "CMP T1", "JNZ L1", "JMP L1",
                "L1:", "RET 0"
            ]
        );
    }
    #[test]
    fn literals_pass_through() {
        assert_eq!(asm_of("T1 = \"a b\"\nPRINT 'c'"), vec!["MOV T1 = \"a b\"", "OUT 'c'"]);
    }
    #[test]
    fn empty() {
        assert!(emit(&[]).is_empty());
    }
}
