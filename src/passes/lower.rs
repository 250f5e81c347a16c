// Lower the AST which matches syntax into TAC which matches the target.
// Every expression ends up in a temporary (or is a bare variable), and
// control flow becomes labels and jumps.

use crate::ast::*;
use crate::tac::{Instruction, Label, Operand, Place, Rvalue, Temp};

/// Per-run state. Temporaries and labels count up from 1 across the whole
/// program and are never reset per function, so every name is unique
struct Generator {
    code: Vec<Instruction>,
    temps: usize,
    labels: usize,
}

impl Generator {
    fn new() -> Self {
        Self { code: vec![], temps: 0, labels: 0 }
    }
    fn new_temp(&mut self) -> Temp {
        self.temps += 1;
        Temp(self.temps)
    }
    fn new_label(&mut self) -> Label {
        self.labels += 1;
        Label(self.labels)
    }
    fn emit(&mut self, inst: Instruction) {
        self.code.push(inst);
    }
    /// A fresh temporary holding `operand`
    fn materialize(&mut self, operand: Operand) -> Operand {
        let temp = self.new_temp();
        self.emit(Instruction::Assign(Place::Temp(temp), Rvalue::Operand(operand)));
        Operand::Temp(temp)
    }

    fn expression(&mut self, expr: &Expression) -> Operand {
        match expr {
            Expression::Number(n) => self.materialize(Operand::Number(*n)),
            Expression::String(s) => self.materialize(Operand::Str(s.clone())),
            Expression::Char(c) => self.materialize(Operand::Char(c.clone())),
            // No temporary needed for a plain reference
            Expression::VarRef(id) => Operand::Var(id.name.clone()),
            Expression::BinOp(bin) => {
                let left = self.expression(&bin.left);
                let right = self.expression(&bin.right);
                let temp = self.new_temp();
                self.emit(Instruction::Assign(Place::Temp(temp), Rvalue::Binary(bin.op, left, right)));
                Operand::Temp(temp)
            }
            // Calls aren't lowered: no arguments are evaluated and the value is 0
            Expression::FuncCall(call) => {
                warn!("call to {} at {} is not lowered, using 0", call.name.name, call.span);
                Operand::Number(Number::Int(0))
            }
        }
    }

    fn block(&mut self, block: &Block) {
        for stmt in &block.stmts {
            self.statement(stmt);
        }
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::VarAssign(assign) => {
                let value = self.expression(&assign.expr);
                self.emit(Instruction::Assign(Place::Var(assign.name.name.clone()), Rvalue::Operand(value)));
            }
            Statement::Print(expr) => {
                let value = self.expression(expr);
                self.emit(Instruction::Print(value));
            }
            // IF cond GOTO L1, then, GOTO L2, L1:, else, L2:
            Statement::If(if_stmt) => {
                let cond = self.expression(&if_stmt.condition);
                let (l1, l2) = (self.new_label(), self.new_label());
                self.emit(Instruction::If(cond, l1));
                self.block(&if_stmt.then_block);
                self.emit(Instruction::Goto(l2));
                self.emit(Instruction::Label(l1));
                if let Some(else_block) = &if_stmt.else_block {
                    self.block(else_block);
                }
                self.emit(Instruction::Label(l2));
            }
            // L1:, cond, IFZ cond GOTO L2, body, GOTO L1, L2:
            Statement::While(while_stmt) => {
                let (l1, l2) = (self.new_label(), self.new_label());
                self.emit(Instruction::Label(l1));
                let cond = self.expression(&while_stmt.condition);
                self.emit(Instruction::IfZ(cond, l2));
                self.block(&while_stmt.body);
                self.emit(Instruction::Goto(l1));
                self.emit(Instruction::Label(l2));
            }
            Statement::Return(expr) => {
                let value = self.expression(expr);
                self.emit(Instruction::Return(value));
            }
            // Evaluated for nothing, the optimizer drops what's left unused
            Statement::Expr(expr) => {
                self.expression(expr);
            }
            Statement::Block(block) => self.block(block),
        }
    }
}

/// Never fails. Functions are just a label followed by their body, there's
/// no prologue or epilogue
pub fn generate(program: &Program) -> Vec<Instruction> {
    let mut gen = Generator::new();
    for func in &program.funcs {
        gen.emit(Instruction::FnLabel(func.name.name.clone()));
        gen.block(&func.body);
    }
    debug!("generated {} TAC lines, {} temporaries, {} labels", gen.code.len(), gen.temps, gen.labels);
    gen.code
}
