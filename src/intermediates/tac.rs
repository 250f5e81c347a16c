//! Three-address code, the [Instruction] list that lowering produces, the
//! optimizer rewrites and codegen translates.
//!
//! Each instruction prints as exactly one line of the textual TAC format
//! (`T3 = T1 + T2`, `IFZ T3 GOTO L2`, ...), and [parse_line] reads that
//! text back, so a listing on disk is as good as the in-memory program.
//! Operands are always a single token of that text: a temporary, a
//! variable name, or a literal.

use crate::ast::{BinaryOp, Number};

/// A generated holder of an intermediate value, printed `T<n>`. Numbers come
/// from one counter per generation run and are never reused
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct Temp(pub usize);
/// A jump target, printed `L<n>`. Same counter rules as [Temp]
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Label(pub usize);

#[derive(PartialEq, Clone, Debug)]
pub enum Operand {
    Temp(Temp),
    Var(String),
    Number(Number),
    Str(String),
    Char(String),
}
impl Operand {
    pub fn temp(&self) -> Option<Temp> {
        match self {
            Operand::Temp(t) => Some(*t),
            _ => None,
        }
    }
}

/// Where an assignment stores its value
#[derive(PartialEq, Clone, Debug)]
pub enum Place {
    Temp(Temp),
    Var(String),
}

/// The right-hand side of an assignment
#[derive(PartialEq, Clone, Debug)]
pub enum Rvalue {
    Operand(Operand),
    Binary(BinaryOp, Operand, Operand),
}

#[derive(PartialEq, Clone, Debug)]
pub enum Instruction {
    /// `label main`, the start of a function
    FnLabel(String),
    /// `L1:`
    Label(Label),
    Assign(Place, Rvalue),
    Print(Operand),
    /// Jump when the condition is nonzero
    If(Operand, Label),
    /// Jump when the condition is zero
    IfZ(Operand, Label),
    Goto(Label),
    Return(Operand),
}
impl Instruction {
    /// The temporary this instruction defines, if any
    pub fn defines(&self) -> Option<Temp> {
        match self {
            Instruction::Assign(Place::Temp(t), _) => Some(*t),
            _ => None,
        }
    }
    /// Every operand read by this instruction, in order
    pub fn operands(&self) -> Vec<&Operand> {
        match self {
            Instruction::Assign(_, Rvalue::Operand(o)) => vec![o],
            Instruction::Assign(_, Rvalue::Binary(_, left, right)) => vec![left, right],
            Instruction::Print(o) | Instruction::If(o, _) | Instruction::IfZ(o, _) | Instruction::Return(o) => vec![o],
            Instruction::FnLabel(_) | Instruction::Label(_) | Instruction::Goto(_) => vec![],
        }
    }
    pub fn operands_mut(&mut self) -> Vec<&mut Operand> {
        match self {
            Instruction::Assign(_, Rvalue::Operand(o)) => vec![o],
            Instruction::Assign(_, Rvalue::Binary(_, left, right)) => vec![left, right],
            Instruction::Print(o) | Instruction::If(o, _) | Instruction::IfZ(o, _) | Instruction::Return(o) => vec![o],
            Instruction::FnLabel(_) | Instruction::Label(_) | Instruction::Goto(_) => vec![],
        }
    }
}

impl std::fmt::Display for Temp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "T{}", self.0)
    }
}
impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}
impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Operand::Temp(t) => write!(f, "{}", t),
            Operand::Var(name) => write!(f, "{}", name),
            Operand::Number(n) => write!(f, "{}", n),
            Operand::Str(s) => write!(f, "\"{}\"", s),
            Operand::Char(c) => write!(f, "'{}'", c),
        }
    }
}
impl std::fmt::Display for Place {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Place::Temp(t) => write!(f, "{}", t),
            Place::Var(name) => write!(f, "{}", name),
        }
    }
}
impl std::fmt::Display for Rvalue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Rvalue::Operand(o) => write!(f, "{}", o),
            Rvalue::Binary(op, left, right) => write!(f, "{} {} {}", left, op.symbol(), right),
        }
    }
}
impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Instruction::FnLabel(name) => write!(f, "label {}", name),
            Instruction::Label(label) => write!(f, "{}:", label),
            Instruction::Assign(place, value) => write!(f, "{} = {}", place, value),
            Instruction::Print(o) => write!(f, "PRINT {}", o),
            Instruction::If(cond, target) => write!(f, "IF {} GOTO {}", cond, target),
            Instruction::IfZ(cond, target) => write!(f, "IFZ {} GOTO {}", cond, target),
            Instruction::Goto(target) => write!(f, "GOTO {}", target),
            Instruction::Return(o) => write!(f, "RETURN {}", o),
        }
    }
}

/// A line of TAC text that matches none of the instruction forms
#[derive(PartialEq, Debug)]
pub struct TacParseError(pub String);
impl std::fmt::Display for TacParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[ERROR] unrecognized TAC line `{}`", self.0)
    }
}
impl std::error::Error for TacParseError {}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => (),
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `prefix` followed by a number, like T12 or L3
fn numbered(s: &str, prefix: char) -> Option<usize> {
    if !s.starts_with(prefix) || s.len() == 1 {
        return None;
    }
    let digits = &s[1..];
    if digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

fn parse_label(s: &str) -> Option<Label> {
    numbered(s, 'L').map(Label)
}

fn parse_temp(s: &str) -> Option<Temp> {
    numbered(s, 'T').map(Temp)
}

fn unquote(s: &str, quote: char) -> Option<&str> {
    if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
        Some(&s[1..s.len() - 1])
    } else {
        None
    }
}

pub fn parse_operand(s: &str) -> Option<Operand> {
    if let Some(inner) = unquote(s, '"') {
        return Some(Operand::Str(inner.to_string()));
    }
    if let Some(inner) = unquote(s, '\'') {
        return Some(Operand::Char(inner.to_string()));
    }
    match s {
        "true" => return Some(Operand::Number(Number::Bool(true))),
        "false" => return Some(Operand::Number(Number::Bool(false))),
        _ => (),
    }
    if let Some(t) = parse_temp(s) {
        return Some(Operand::Temp(t));
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(Operand::Number(Number::Int(i)));
    }
    if s.contains('.') {
        if let Ok(x) = s.parse::<f64>() {
            return Some(Operand::Number(Number::Float(x)));
        }
    }
    if is_name(s) {
        return Some(Operand::Var(s.to_string()));
    }
    None
}

/// Whitespace splitting that keeps quoted literals in one piece
fn split_words(text: &str) -> Option<Vec<String>> {
    let mut words = vec![];
    let mut word = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in text.chars() {
        match quote {
            Some(q) => {
                word.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None if c.is_whitespace() => {
                if !word.is_empty() {
                    words.push(std::mem::replace(&mut word, String::new()));
                }
            }
            None => {
                if c == '"' || c == '\'' {
                    quote = Some(c);
                }
                word.push(c);
            }
        }
    }
    if quote.is_some() {
        return None;
    }
    if !word.is_empty() {
        words.push(word);
    }
    Some(words)
}

fn parse_rvalue(words: &[String]) -> Option<Rvalue> {
    match words {
        [single] => parse_operand(single).map(Rvalue::Operand),
        [left, op, right] => Some(Rvalue::Binary(
            BinaryOp::from_symbol(op)?,
            parse_operand(left)?,
            parse_operand(right)?,
        )),
        _ => None,
    }
}

/// Reads one line of TAC text
pub fn parse_line(line: &str) -> Result<Instruction, TacParseError> {
    let fail = || TacParseError(line.to_string());
    let words = split_words(line.trim()).ok_or_else(fail)?;
    let words: Vec<&str> = words.iter().map(|w| w.as_str()).collect();
    let inst = match words.as_slice() {
        ["label", name] if is_name(name) => Some(Instruction::FnLabel(name.to_string())),
        ["PRINT", value] => parse_operand(value).map(Instruction::Print),
        ["IFZ", cond, "GOTO", target] => match (parse_operand(cond), parse_label(target)) {
            (Some(cond), Some(target)) => Some(Instruction::IfZ(cond, target)),
            _ => None,
        },
        ["IF", cond, "GOTO", target] => match (parse_operand(cond), parse_label(target)) {
            (Some(cond), Some(target)) => Some(Instruction::If(cond, target)),
            _ => None,
        },
        ["GOTO", target] => parse_label(target).map(Instruction::Goto),
        ["RETURN", value] => parse_operand(value).map(Instruction::Return),
        [label] if label.ends_with(':') => parse_label(&label[..label.len() - 1]).map(Instruction::Label),
        [dest, "=", rest @ ..] => {
            let place = match parse_temp(dest) {
                Some(t) => Some(Place::Temp(t)),
                None if is_name(dest) => Some(Place::Var(dest.to_string())),
                None => None,
            };
            let rest: Vec<String> = rest.iter().map(|w| w.to_string()).collect();
            match (place, parse_rvalue(&rest)) {
                (Some(place), Some(value)) => Some(Instruction::Assign(place, value)),
                _ => None,
            }
        }
        _ => None,
    };
    inst.ok_or_else(fail)
}

/// Strips a leading `(n)` listing number, if there is one
fn strip_number(line: &str) -> &str {
    let trimmed = line.trim_start();
    if trimmed.starts_with('(') {
        if let Some(close) = trimmed.find(')') {
            if trimmed[1..close].chars().all(|c| c.is_ascii_digit()) && close > 1 {
                return &trimmed[close + 1..];
            }
        }
    }
    trimmed
}

/// Reads a whole listing, one instruction per line. Blank lines are skipped
/// and lines that aren't TAC are dropped (with a warning), never an error
pub fn parse_listing(text: &str) -> Vec<Instruction> {
    let mut out = vec![];
    for (n, line) in text.lines().enumerate() {
        let line = strip_number(line);
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(inst) => out.push(inst),
            Err(e) => warn!("line {}: dropping {}", n + 1, e),
        }
    }
    out
}

/// `(1) label main` style listing, one instruction per line
pub fn fmt_numbered(tac: &[Instruction]) -> String {
    tac.iter()
        .enumerate()
        .map(|(i, inst)| format!("({}) {}", i + 1, inst))
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
mod test {
    use super::*;
    fn parse(line: &str) -> Instruction {
        parse_line(line).expect("test line should parse")
    }
    #[test]
    fn reads_every_form() {
        let lines = [
            "label main",
            "T1 = 2",
            "T3 = T1 + T2",
            "x = T3",
            "PRINT x",
            "IF T3 GOTO L1",
            "IFZ T3 GOTO L2",
            "GOTO L1",
            "L1:",
            "RETURN 0",
            "T4 = 2.5",
            "T5 = \"hello world\"",
            "T6 = 'c'",
            "T7 = true",
            "T8 = -3 <= y",
        ];
        for line in lines.iter() {
            assert_eq!(parse(line).to_string(), *line);
        }
    }
    #[test]
    fn structure() {
        assert_eq!(
            parse("T3 = T1 / 4"),
            Instruction::Assign(
                Place::Temp(Temp(3)),
                Rvalue::Binary(BinaryOp::Divide, Operand::Temp(Temp(1)), Operand::Number(Number::Int(4)))
            )
        );
        assert_eq!(parse("x = y"), Instruction::Assign(Place::Var("x".to_string()), Rvalue::Operand(Operand::Var("y".to_string()))));
        assert_eq!(parse("  GOTO L7  "), Instruction::Goto(Label(7)));
    }
    #[test]
    fn rejects_garbage() {
        assert!(parse_line("MOV x").is_err());
        assert!(parse_line("GOTO main").is_err());
        assert!(parse_line("T1 = 1 % 2").is_err());
        assert!(parse_line("T1 = \"open").is_err());
        assert!(parse_line("label").is_err());
    }
    #[test]
    fn listing_drops_unknown_lines() {
        let tac = parse_listing("(1) label main\n(2) x = 3\n\n(3) NOP\nPRINT x\n");
        assert_eq!(
            tac,
            vec![
                Instruction::FnLabel("main".to_string()),
                Instruction::Assign(Place::Var("x".to_string()), Rvalue::Operand(Operand::Number(Number::Int(3)))),
                Instruction::Print(Operand::Var("x".to_string())),
            ]
        );
    }
    #[test]
    fn large_floats_read_back() {
        for &x in [1e16, 1e20, -2.5e30, 1e-7, 3.0].iter() {
            let inst = Instruction::Assign(Place::Temp(Temp(1)), Rvalue::Operand(Operand::Number(Number::Float(x))));
            let text = inst.to_string();
            assert!(!text.contains('e'), "exponent in {}", text);
            assert_eq!(parse(&text), inst);
        }
        assert_eq!(Number::Float(1e16).to_string(), "10000000000000000.0");
    }
    #[test]
    fn numbered_listing() {
        let tac = vec![Instruction::FnLabel("main".to_string()), Instruction::Goto(Label(1))];
        assert_eq!(fmt_numbered(&tac), "(1) label main\n(2) GOTO L1");
    }
    #[test]
    fn uses_and_defs() {
        let inst = parse("T3 = T1 < x");
        assert_eq!(inst.defines(), Some(Temp(3)));
        let temps: Vec<Temp> = inst.operands().iter().filter_map(|o| o.temp()).collect();
        assert_eq!(temps, vec![Temp(1)]);
        assert_eq!(parse("x = T2").defines(), None);
    }
}
