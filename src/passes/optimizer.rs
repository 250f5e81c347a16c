/// optimization passes over TAC
use crate::ast::{BinaryOp, Number};
use crate::tac::{Instruction, Operand, Place, Rvalue, Temp};
use std::collections::{HashMap, HashSet};

/// general principles:
/// folding is one forward pass with no idea of control flow. that's fine
/// because lowering assigns every temporary exactly once, before any use
/// the only thing that can go wrong is dividing a constant by zero

#[derive(PartialEq, Debug)]
pub enum OptimizeError {
    /// The offending line, after earlier constants were substituted into it
    DivisionByZero(Instruction),
}
impl std::fmt::Display for OptimizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            OptimizeError::DivisionByZero(inst) => write!(f, "[ERROR] division by zero folding `{}`", inst),
        }
    }
}
impl std::error::Error for OptimizeError {}

pub fn optimize(tac: &[Instruction]) -> Result<Vec<Instruction>, OptimizeError> {
    let folded = fold_constants(tac)?;
    Ok(eliminate_dead_temps(folded))
}

enum Folded {
    Value(Number),
    /// Left unfolded, the result doesn't fit the operand type
    Overflow,
    DivisionByZero,
}

/// Booleans are never folded
fn numeric(operand: &Operand) -> Option<Number> {
    match operand {
        Operand::Number(n @ Number::Int(_)) | Operand::Number(n @ Number::Float(_)) => Some(*n),
        _ => None,
    }
}

fn as_float(n: Number) -> f64 {
    match n {
        Number::Int(i) => i as f64,
        Number::Float(x) => x,
        Number::Bool(b) => b as i64 as f64,
    }
}

/// inf and NaN have no TAC text, so those stay unfolded too
fn finite(x: f64) -> Folded {
    if x.is_finite() {
        Folded::Value(Number::Float(x))
    } else {
        Folded::Overflow
    }
}

/// Ints stay ints, except that division always gives a float
fn fold(op: BinaryOp, left: Number, right: Number) -> Folded {
    if op == BinaryOp::Divide {
        let divisor = as_float(right);
        if divisor == 0.0 {
            return Folded::DivisionByZero;
        }
        return finite(as_float(left) / divisor);
    }
    match (left, right) {
        (Number::Int(a), Number::Int(b)) => {
            let result = match op {
                BinaryOp::Plus => a.checked_add(b),
                BinaryOp::Minus => a.checked_sub(b),
                BinaryOp::Times => a.checked_mul(b),
                _ => unreachable!("only arithmetic operators are folded"),
            };
            match result {
                Some(i) => Folded::Value(Number::Int(i)),
                None => Folded::Overflow,
            }
        }
        (a, b) => {
            let (a, b) = (as_float(a), as_float(b));
            finite(match op {
                BinaryOp::Plus => a + b,
                BinaryOp::Minus => a - b,
                BinaryOp::Times => a * b,
                _ => unreachable!("only arithmetic operators are folded"),
            })
        }
    }
}

/// Folds one line whose operands have already been substituted, recording
/// any temporary that ends up holding a constant
fn fold_line(inst: Instruction, consts: &mut HashMap<Temp, Number>) -> Result<Instruction, OptimizeError> {
    let (temp, op, left, right) = match inst {
        Instruction::Assign(Place::Temp(temp), Rvalue::Operand(ref value)) => {
            if let Some(n) = numeric(value) {
                consts.insert(temp, n);
            }
            return Ok(inst);
        }
        Instruction::Assign(Place::Temp(temp), Rvalue::Binary(op, left, right)) => (temp, op, left, right),
        other => return Ok(other),
    };
    let unfolded = |left, right| Instruction::Assign(Place::Temp(temp), Rvalue::Binary(op, left, right));
    if !op.is_arithmetic() {
        return Ok(unfolded(left, right));
    }
    let (a, b) = match (numeric(&left), numeric(&right)) {
        (Some(a), Some(b)) => (a, b),
        _ => return Ok(unfolded(left, right)),
    };
    match fold(op, a, b) {
        Folded::Value(value) => {
            debug!("folded {} = {} {} {} to {}", temp, left, op.symbol(), right, value);
            consts.insert(temp, value);
            Ok(Instruction::Assign(Place::Temp(temp), Rvalue::Operand(Operand::Number(value))))
        }
        Folded::Overflow => {
            debug!("not folding {} {} {}, it overflows", left, op.symbol(), right);
            Ok(unfolded(left, right))
        }
        Folded::DivisionByZero => Err(OptimizeError::DivisionByZero(unfolded(left, right))),
    }
}

/// One forward pass. Once a temporary is known to hold a constant, every
/// later use of it is replaced by that constant, wherever it appears
pub fn fold_constants(tac: &[Instruction]) -> Result<Vec<Instruction>, OptimizeError> {
    let mut consts = HashMap::new();
    let mut out = Vec::with_capacity(tac.len());
    for inst in tac {
        let mut inst = inst.clone();
        for operand in inst.operands_mut() {
            if let Some(value) = operand.temp().and_then(|t| consts.get(&t)) {
                *operand = Operand::Number(*value);
            }
        }
        out.push(fold_line(inst, &mut consts)?);
    }
    Ok(out)
}

/// Drops definitions of temporaries nothing reads. Dropping one can leave
/// the temporaries it read unused too, so this repeats until nothing changes.
/// Assignments to named variables always stay
pub fn eliminate_dead_temps(mut tac: Vec<Instruction>) -> Vec<Instruction> {
    loop {
        let used: HashSet<Temp> = tac.iter().flat_map(|inst| inst.operands()).filter_map(|o| o.temp()).collect();
        let before = tac.len();
        tac.retain(|inst| match inst.defines() {
            Some(temp) if !used.contains(&temp) => {
                debug!("eliminated dead `{}`", inst);
                false
            }
            _ => true,
        });
        if tac.len() == before {
            return tac;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tac::{parse_line, Label};

    fn tac(lines: &[&str]) -> Vec<Instruction> {
        lines.iter().map(|l| parse_line(l).expect("test line should parse")).collect()
    }
    fn text(tac: &[Instruction]) -> Vec<String> {
        tac.iter().map(|i| i.to_string()).collect()
    }
    fn optimized(lines: &[&str]) -> Vec<String> {
        text(&optimize(&tac(lines)).expect("test program should optimize"))
    }

    #[test]
    fn folds_and_substitutes() {
        let folded = fold_constants(&tac(&["T1 = 2 + 3", "x = T1", "T2 = T1 * x", "PRINT T1"])).unwrap();
        assert_eq!(text(&folded), vec!["T1 = 5", "x = 5", "T2 = 5 * x", "PRINT 5"]);
    }
    #[test]
    fn constant_temps_propagate() {
        assert_eq!(optimized(&["label main", "T1 = 1", "T2 = 2", "T3 = T1 + T2", "x = T3", "PRINT x"]), vec![
            "label main",
            "x = 3",
            "PRINT x"
        ]);
    }
    #[test]
    fn integer_and_float_arithmetic() {
        let folded = fold_constants(&tac(&[
            "T1 = 7 - 10",
            "T2 = 6 * -2",
            "T3 = 1.5 + 1",
            "T4 = 6 / 2",
            "T5 = 7 / 2",
            "T6 = 2.5 * 2.0",
        ]))
        .unwrap();
        assert_eq!(text(&folded), vec!["T1 = -3", "T2 = -12", "T3 = 2.5", "T4 = 3.0", "T5 = 3.5", "T6 = 5.0"]);
    }
    #[test]
    fn relational_and_non_numeric_are_left_alone() {
        let lines = ["T1 = 1 == 1", "T2 = \"a\" + 1", "T3 = true + 1", "T4 = x + 1"];
        assert_eq!(text(&fold_constants(&tac(&lines)).unwrap()), lines.to_vec());
    }
    #[test]
    fn overflow_is_left_unfolded() {
        let line = format!("T1 = {} + 1", std::i64::MAX);
        assert_eq!(text(&fold_constants(&tac(&[line.as_str()])).unwrap()), vec![line.clone()]);
    }
    #[test]
    fn float_overflow_is_left_unfolded() {
        let huge = Operand::Number(Number::Float(1e308));
        let times = Instruction::Assign(
            Place::Temp(Temp(1)),
            Rvalue::Binary(BinaryOp::Times, huge.clone(), Operand::Number(Number::Float(10.0))),
        );
        let divide =
            Instruction::Assign(Place::Temp(Temp(2)), Rvalue::Binary(BinaryOp::Divide, huge, Operand::Number(Number::Float(1e-10))));
        let folded = fold_constants(&[times.clone(), divide.clone()]).unwrap();
        assert_eq!(folded, vec![times.clone(), divide]);
        // and the unfolded line still reads back as itself
        assert_eq!(parse_line(&times.to_string()), Ok(times));
    }
    #[test]
    fn division_by_zero() {
        assert_eq!(
            optimize(&tac(&["T1 = 4 / 0"])),
            Err(OptimizeError::DivisionByZero(parse_line("T1 = 4 / 0").unwrap()))
        );
        // the zero can come from an earlier constant
        let err = optimize(&tac(&["T1 = 0.0", "T2 = 4 / T1", "x = T2"])).unwrap_err();
        assert_eq!(err.to_string(), "[ERROR] division by zero folding `T2 = 4 / 0.0`");
    }
    #[test]
    fn substitution_ignores_control_flow() {
        assert_eq!(
            optimized(&["L1:", "T1 = 3", "IFZ T1 GOTO L2", "PRINT T1", "GOTO L1", "L2:"]),
            vec!["L1:", "IFZ 3 GOTO L2", "PRINT 3", "GOTO L1", "L2:"]
        );
    }
    #[test]
    fn dead_temps() {
        // T2 is read, T1 and T3 are not; named variables always stay
        assert_eq!(
            optimized(&["T1 = x + y", "T2 = x * y", "T3 = \"unused\"", "z = T2", "w = 1"]),
            vec!["T2 = x * y", "z = T2", "w = 1"]
        );
    }
    #[test]
    fn dead_chains_go_away_together() {
        assert_eq!(optimized(&["T1 = b * c", "T2 = a + T1", "x = y"]), vec!["x = y"]);
    }
    #[test]
    fn idempotent() {
        let once = optimize(&tac(&[
            "label main",
            "T1 = 2",
            "T2 = x * T1",
            "T3 = T2 + 1",
            "IF T3 GOTO L1",
            "T4 = a - b",
            "GOTO L2",
            "L1:",
            "L2:",
            "RETURN T2",
        ]))
        .unwrap();
        assert_eq!(optimize(&once).unwrap(), once);
        assert!(once.contains(&Instruction::Goto(Label(2))));
    }
}
