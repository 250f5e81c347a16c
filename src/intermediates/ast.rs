//! the Abstract Syntax Tree ([Program]) is the result of parsing, and
//! contains all the data in your program in actual logical chunks, most
//! closely resembling the frontend conceptual syntax.
//!
//! the root is [Program], which is just a list of functions. the node set is
//! closed: every pass after the parser matches on these enums exhaustively,
//! so a new node kind won't build until every pass knows about it.

use crate::span::Span;

/// An Abstract Syntax Tree
#[derive(PartialEq, Clone, Debug, Default)]
pub struct Program {
    pub funcs: Vec<FuncDecl>,
}
#[derive(PartialEq, Clone, Debug)]
pub struct FuncDecl {
    pub name: NameSpan,
    pub params: Vec<NameSpan>,
    pub body: Block,
}
#[derive(PartialEq, Clone, Debug, Default)]
pub struct Block {
    pub stmts: Vec<Statement>,
}
/// Because we need spans for names for reporting, and we need
/// Strings a lot for names, we just plop them together
#[derive(PartialEq, Clone, Debug, Default)]
pub struct NameSpan {
    pub name: String,
    pub span: Span,
}
impl NameSpan {
    #[cfg(test)]
    pub(crate) fn fake(name: &str) -> Self {
        Self { name: name.to_string(), ..Default::default() }
    }
}
#[derive(PartialEq, Clone, Debug)]
pub enum Statement {
    VarAssign(VarAssign),
    Print(Expression),
    If(If),
    While(While),
    Return(Expression),
    Expr(Expression),
    Block(Block),
}
#[derive(PartialEq, Clone, Debug)]
pub struct VarAssign {
    pub name: NameSpan,
    pub expr: Expression,
}
#[derive(PartialEq, Clone, Debug)]
pub struct If {
    pub condition: Expression,
    pub then_block: Block,
    pub else_block: Option<Block>,
}
#[derive(PartialEq, Clone, Debug)]
pub struct While {
    pub condition: Expression,
    pub body: Block,
}
#[derive(PartialEq, Clone, Debug)]
pub enum Expression {
    Number(Number),
    String(String),
    Char(String),
    VarRef(NameSpan),
    BinOp(Box<BinaryExpr>),
    // Parsed but never lowered, see lower::Generator::expression
    FuncCall(FuncCall),
}
/// Booleans ride along as numbers, same as the literal tokens they come from
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Number {
    Int(i64),
    Float(f64),
    Bool(bool),
}
#[derive(PartialEq, Clone, Debug)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Expression,
    pub right: Expression,
}
/// This is the actual call like add(5, 6.0), there are no fn values
#[derive(PartialEq, Clone, Debug)]
pub struct FuncCall {
    pub name: NameSpan,
    pub args: Vec<Expression>,
    pub span: Span,
}
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum BinaryOp {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Plus,
    Minus,
    Times,
    Divide,
}
impl BinaryOp {
    /// The canonical operator text, shared by source and TAC
    pub fn symbol(self) -> &'static str {
        use BinaryOp::*;
        match self {
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Plus => "+",
            Minus => "-",
            Times => "*",
            Divide => "/",
        }
    }
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        use BinaryOp::*;
        Some(match symbol {
            "==" => Equal,
            "!=" => NotEqual,
            "<" => Less,
            ">" => Greater,
            "<=" => LessEqual,
            ">=" => GreaterEqual,
            "+" => Plus,
            "-" => Minus,
            "*" => Times,
            "/" => Divide,
            _ => return None,
        })
    }
    /// Only these fold, relational operators are left for the target
    pub fn is_arithmetic(self) -> bool {
        match self {
            BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Times | BinaryOp::Divide => true,
            _ => false,
        }
    }
}

/// Plain decimal, never exponent form, and always with a `.` so a float
/// never reads back as an int
pub fn fmt_float(x: f64) -> String {
    let text = x.to_string();
    if x.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => write!(f, "{}", fmt_float(*x)),
            Number::Bool(b) => write!(f, "{}", b),
        }
    }
}
impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Expression::Number(n) => write!(f, "{}", n),
            Expression::String(s) => write!(f, "\"{}\"", s),
            Expression::Char(c) => write!(f, "'{}'", c),
            Expression::VarRef(id) => write!(f, "{}", id.name),
            Expression::BinOp(bin) => write!(f, "({} {} {})", bin.left, bin.op.symbol(), bin.right),
            Expression::FuncCall(call) => {
                let args: Vec<String> = call.args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", call.name.name, args.join(", "))
            }
        }
    }
}

// Tree printing. Each node writes its own line at `depth` and its children
// one deeper; the last child of a block gets the closing branch
fn write_line(f: &mut std::fmt::Formatter, depth: usize, branch: &str, text: &str) -> std::fmt::Result {
    writeln!(f, "{}{}{}", "  ".repeat(depth), branch, text)
}
impl Block {
    fn write_tree(&self, f: &mut std::fmt::Formatter, depth: usize, branch: &str) -> std::fmt::Result {
        write_line(f, depth, branch, "Block")?;
        for (i, stmt) in self.stmts.iter().enumerate() {
            let mark = if i + 1 < self.stmts.len() { "├── " } else { "└── " };
            stmt.write_tree(f, depth + 1, mark)?;
        }
        Ok(())
    }
}
impl Statement {
    fn write_tree(&self, f: &mut std::fmt::Formatter, depth: usize, branch: &str) -> std::fmt::Result {
        match self {
            Statement::VarAssign(assign) => {
                write_line(f, depth, branch, &format!("Assignment: {} = {}", assign.name.name, assign.expr))
            }
            Statement::Print(expr) => write_line(f, depth, branch, &format!("Print: {}", expr)),
            Statement::If(if_stmt) => {
                write_line(f, depth, branch, &format!("If {}", if_stmt.condition))?;
                match &if_stmt.else_block {
                    Some(else_block) => {
                        if_stmt.then_block.write_tree(f, depth + 1, "├── ")?;
                        else_block.write_tree(f, depth + 1, "└── ")
                    }
                    None => if_stmt.then_block.write_tree(f, depth + 1, "└── "),
                }
            }
            Statement::While(while_stmt) => {
                write_line(f, depth, branch, &format!("While {}", while_stmt.condition))?;
                while_stmt.body.write_tree(f, depth + 1, "└── ")
            }
            Statement::Return(expr) => write_line(f, depth, branch, &format!("Return: {}", expr)),
            Statement::Expr(expr) => write_line(f, depth, branch, &format!("Expr: {}", expr)),
            Statement::Block(block) => block.write_tree(f, depth, branch),
        }
    }
}
impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Program")?;
        for func in &self.funcs {
            let params: Vec<&str> = func.params.iter().map(|p| p.name.as_str()).collect();
            write_line(f, 1, "└── ", &format!("Function: {}({})", func.name.name, params.join(", ")))?;
            func.body.write_tree(f, 2, "")?;
        }
        Ok(())
    }
}
