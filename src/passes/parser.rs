// This is the parser. yay.
//
// Recursive descent for statements, precedence climbing for binary
// expressions. There's no recovery: the first thing that doesn't fit ends
// the parse with a ParseError.

use crate::{ast::*, span::Span, Token, TokenType};

#[derive(PartialEq, Debug)]
pub enum ParseError {
    // Expected, got
    Expected(Vec<TokenType>, Token),
    // Expected, while parsing
    EOF(Vec<TokenType>, String),
}
fn fmt_expected(expected: &[TokenType]) -> String {
    expected.iter().map(|e| e.name()).collect::<Vec<&str>>().join(", ")
}
impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ParseError::*;
        match self {
            Expected(expected, got) => {
                write!(f, "[ERROR] expected {}, got {} at {}", fmt_expected(expected), got.kind, got.span)
            }
            EOF(expected, parsing) => write!(
                f,
                "[ERROR] expected {}, got end of input parsing {}",
                fmt_expected(expected),
                parsing
            ),
        }
    }
}
// All relevant details in Display and Debug
impl std::error::Error for ParseError {}

type Result<T> = std::result::Result<T, ParseError>;

/// Matches the next token against a list of kinds, evaluating to Ok of the
/// matching arm or the Expected/EOF error listing every kind it accepts.
/// Kinds with data name a placeholder value for the error list, like
/// `Identifier(name, String::new())`
macro_rules! expect_any {
    ( $during:literal, $to_match:expr => { $($token_type:ident$(($subordinate:pat,$literal:expr))? => $expr:expr $(,)?)* } ) => {
        match $to_match {
            $(Some(Token { kind: TokenType::$token_type$(($subordinate))?, .. }) => Ok($expr),)*
            Some(got) => Err(ParseError::Expected(vec![
                $(TokenType::$token_type$(($literal))?),*
            ], got.clone())),
            None => Err(ParseError::EOF(vec![
                $(TokenType::$token_type$(($literal))?),*
            ], $during.to_string())),
        }
    }
}

/// Only pops if the next token is expected, then returns that token
fn expect_token(rtokens: &mut Tokens, what: TokenType, during: &str) -> Result<Token> {
    match rtokens.last() {
        Some(token) => {
            if token.kind == what {
                rtokens.pop();
                Ok(token.clone())
            } else {
                Err(ParseError::Expected(vec![what], token.clone()))
            }
        }
        None => Err(ParseError::EOF(vec![what], during.to_string())),
    }
}

fn parse_name(rtokens: &mut Tokens, during: &str) -> Result<NameSpan> {
    let token = rtokens.last();
    let name = expect_any!("name", token => {
        Identifier(name, String::new()) => NameSpan { name: name.clone(), span: token.map_or(Span::new(), |t| t.span) },
    })
    .map_err(|e| match e {
        ParseError::EOF(expected, _) => ParseError::EOF(expected, during.to_string()),
        e => e,
    })?;
    rtokens.pop();
    Ok(name)
}

/// Binding power of each binary operator, higher binds tighter
fn binary_op(kind: &TokenType) -> Option<(BinaryOp, u8)> {
    use TokenType::*;
    Some(match kind {
        Equal => (BinaryOp::Equal, 3),
        NotEqual => (BinaryOp::NotEqual, 3),
        Less => (BinaryOp::Less, 4),
        Greater => (BinaryOp::Greater, 4),
        LessEqual => (BinaryOp::LessEqual, 4),
        GreaterEqual => (BinaryOp::GreaterEqual, 4),
        Plus => (BinaryOp::Plus, 5),
        Minus => (BinaryOp::Minus, 5),
        Times => (BinaryOp::Times, 6),
        Divide => (BinaryOp::Divide, 6),
        _ => return None,
    })
}

/// Precedence climbing. The right operand only takes operators binding
/// tighter than this one, so equal-power chains group to the left
fn parse_expression(rtokens: &mut Tokens, min_power: u8) -> Result<Expression> {
    let mut left = parse_primary(rtokens)?;
    loop {
        let (op, power) = match rtokens.last().and_then(|t| binary_op(&t.kind)) {
            Some(found) => found,
            None => break,
        };
        if power < min_power {
            break;
        }
        rtokens.pop();
        let right = parse_expression(rtokens, power + 1)?;
        left = Expression::BinOp(Box::new(BinaryExpr { op, left, right }));
    }
    Ok(left)
}

fn parse_primary(rtokens: &mut Tokens) -> Result<Expression> {
    let token = rtokens.last();
    let span = token.map_or(Span::new(), |t| t.span);
    let primary = expect_any!("expression", token => {
        Int(n, 0) => Some(Expression::Number(Number::Int(*n))),
        Float(x, 0.0) => Some(Expression::Number(Number::Float(*x))),
        Bool(b, false) => Some(Expression::Number(Number::Bool(*b))),
        Str(s, String::new()) => Some(Expression::String(s.clone())),
        Char(c, String::new()) => Some(Expression::Char(c.clone())),
        Identifier(name, String::new()) => Some(Expression::VarRef(NameSpan { name: name.clone(), span })),
        // parenthesized, handled below
        LParen => None,
    })?;
    rtokens.pop();
    match primary {
        None => {
            let inner = parse_expression(rtokens, 0)?;
            expect_token(rtokens, TokenType::RParen, "parenthesized expression")?;
            Ok(inner)
        }
        // An identifier can start a call or just be a variable
        Some(Expression::VarRef(name)) => match rtokens.last() {
            Some(Token { kind: TokenType::LParen, .. }) => parse_call(rtokens, name).map(Expression::FuncCall),
            _ => Ok(Expression::VarRef(name)),
        },
        Some(other) => Ok(other),
    }
}

fn parse_call(rtokens: &mut Tokens, name: NameSpan) -> Result<FuncCall> {
    expect_token(rtokens, TokenType::LParen, "call")?;
    let mut args = vec![];
    match rtokens.last() {
        Some(Token { kind: TokenType::RParen, .. }) | None => (),
        Some(_) => {
            args.push(parse_expression(rtokens, 0)?);
            while let Some(Token { kind: TokenType::Comma, .. }) = rtokens.last() {
                rtokens.pop();
                args.push(parse_expression(rtokens, 0)?);
            }
        }
    }
    let close = expect_token(rtokens, TokenType::RParen, "call")?;
    let span = Span::set(vec![name.span, close.span]);
    Ok(FuncCall { name, args, span })
}

fn parse_block(rtokens: &mut Tokens) -> Result<Block> {
    expect_token(rtokens, TokenType::LBrace, "block")?;
    let mut stmts = vec![];
    loop {
        match rtokens.last() {
            Some(Token { kind: TokenType::RBrace, .. }) => {
                rtokens.pop();
                break;
            }
            Some(_) => stmts.push(parse_statement(rtokens)?),
            None => return Err(ParseError::EOF(vec![TokenType::RBrace], "block".to_string())),
        }
    }
    Ok(Block { stmts })
}

/// `( expr )` as used by print, if, and while
fn parse_condition(rtokens: &mut Tokens, during: &str) -> Result<Expression> {
    expect_token(rtokens, TokenType::LParen, during)?;
    let expr = parse_expression(rtokens, 0)?;
    expect_token(rtokens, TokenType::RParen, during)?;
    Ok(expr)
}

fn parse_expr_statement(rtokens: &mut Tokens) -> Result<Statement> {
    let expr = parse_expression(rtokens, 0)?;
    expect_token(rtokens, TokenType::Semicolon, "expression statement")?;
    Ok(Statement::Expr(expr))
}

fn parse_statement(rtokens: &mut Tokens) -> Result<Statement> {
    let first = match rtokens.last() {
        Some(first) => first,
        None => return Err(ParseError::EOF(vec![TokenType::RBrace], "statement".to_string())),
    };
    match first.kind {
        // only disambiguating is assignment vs expression. we can use LR(2) for that
        TokenType::Identifier(_) => match rtokens.n(2) {
            Some(Token { kind: TokenType::Assignment, .. }) => {
                let name = parse_name(rtokens, "assignment")?;
                rtokens.pop();
                let expr = parse_expression(rtokens, 0)?;
                expect_token(rtokens, TokenType::Semicolon, "assignment")?;
                Ok(Statement::VarAssign(VarAssign { name, expr }))
            }
            _ => parse_expr_statement(rtokens),
        },
        TokenType::Print => {
            rtokens.pop();
            let expr = parse_condition(rtokens, "print")?;
            expect_token(rtokens, TokenType::Semicolon, "print")?;
            Ok(Statement::Print(expr))
        }
        TokenType::If => {
            rtokens.pop();
            let condition = parse_condition(rtokens, "if condition")?;
            let then_block = parse_block(rtokens)?;
            let else_block = match rtokens.last() {
                Some(Token { kind: TokenType::Else, .. }) => {
                    rtokens.pop();
                    Some(parse_block(rtokens)?)
                }
                _ => None,
            };
            Ok(Statement::If(If { condition, then_block, else_block }))
        }
        TokenType::While => {
            rtokens.pop();
            let condition = parse_condition(rtokens, "while condition")?;
            let body = parse_block(rtokens)?;
            Ok(Statement::While(While { condition, body }))
        }
        TokenType::Return => {
            rtokens.pop();
            let expr = parse_expression(rtokens, 0)?;
            expect_token(rtokens, TokenType::Semicolon, "return statement")?;
            Ok(Statement::Return(expr))
        }
        TokenType::LBrace => Ok(Statement::Block(parse_block(rtokens)?)),
        _ => parse_expr_statement(rtokens),
    }
}

fn parse_params(rtokens: &mut Tokens) -> Result<Vec<NameSpan>> {
    expect_token(rtokens, TokenType::LParen, "parameters")?;
    let mut params = vec![];
    if let Some(Token { kind: TokenType::Identifier(_), .. }) = rtokens.last() {
        params.push(parse_name(rtokens, "parameters")?);
        while let Some(Token { kind: TokenType::Comma, .. }) = rtokens.last() {
            rtokens.pop();
            params.push(parse_name(rtokens, "parameters")?);
        }
    }
    expect_token(rtokens, TokenType::RParen, "parameters")?;
    Ok(params)
}

fn parse_fn(rtokens: &mut Tokens) -> Result<FuncDecl> {
    expect_token(rtokens, TokenType::Func, "func")?;
    let name = parse_name(rtokens, "func")?;
    let params = parse_params(rtokens)?;
    let body = parse_block(rtokens)?;
    debug!("parsed func {} with {} statements", name.name, body.stmts.len());
    Ok(FuncDecl { name, params, body })
}

pub fn parse(mut tokens: Vec<Token>) -> Result<Program> {
    tokens.reverse();
    let mut rtokens = NoPop::new(&tokens);
    let mut funcs = vec![];
    // Only functions live at the top level
    while rtokens.last().is_some() {
        funcs.push(parse_fn(&mut rtokens)?);
    }
    Ok(Program { funcs })
}

/// A stack view over a reversed slice: pop moves a cursor instead of
/// removing, and references handed out live as long as the slice
#[derive(Clone, Copy)]
struct NoPop<'a, T: Clone> {
    vec: &'a [T],
    sp: usize,
}
impl<'a, T: Clone> NoPop<'a, T> {
    fn new(vec: &'a [T]) -> Self {
        Self { vec, sp: vec.len() }
    }
    fn pop(&mut self) -> Option<T> {
        if self.sp > 0 {
            self.sp -= 1;
            Some(self.vec[self.sp].clone())
        } else {
            None
        }
    }
    fn last(&self) -> Option<&'a T> {
        self.n(1)
    }
    /// n tokens ahead, n = 1 being the next one
    fn n(&self, n: usize) -> Option<&'a T> {
        self.sp.checked_sub(n).and_then(|i| self.vec.get(i))
    }
}
type Tokens<'a> = NoPop<'a, Token>;
