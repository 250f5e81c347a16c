// Hello, welcome to my lexer. Please like and subscribe

use crate::{span::Span, Token, TokenType};

static SPACE: &str = " \t\r";

fn is_id_1st(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_id(c: char) -> bool {
    is_id_1st(c) || c.is_ascii_digit()
}

enum NextSymbolType {
    None,
    Newline,
    Space,
    SymbolOrId(char),
    Digit(char),
    Minus,
    Slash,
    Quote,
    Apostrophe,
    Punct(char),
    Unknown(char),
}

#[derive(Debug)]
struct Lexer {
    tokens: Vec<Token>,
    rchars: Vec<char>,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer {
            tokens: Vec::new(),
            rchars: source.chars().rev().collect(),
            line: 1,
            col: 1,
        }
    }

    /// n chars ahead without consuming, peek(0) is the next char
    fn peek(&self, n: usize) -> Option<char> {
        if n < self.rchars.len() {
            Some(self.rchars[self.rchars.len() - 1 - n])
        } else {
            None
        }
    }

    /// Consumes one char, keeping line/col in step
    fn bump(&mut self) -> Option<char> {
        let c = self.rchars.pop()?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn take_while<F: Fn(char) -> bool>(&mut self, text: &mut String, pred: F) {
        while let Some(c) = self.peek(0) {
            if !pred(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
    }

    /// Whether the previous token could be the left side of a subtraction
    fn ends_operand(&self) -> bool {
        use TokenType::*;
        match self.tokens.last() {
            Some(Token { kind: Identifier(_), .. })
            | Some(Token { kind: Int(_), .. })
            | Some(Token { kind: Float(_), .. })
            | Some(Token { kind: Bool(_), .. })
            | Some(Token { kind: Str(_), .. })
            | Some(Token { kind: Char(_), .. })
            | Some(Token { kind: RParen, .. }) => true,
            _ => false,
        }
    }

    fn next_symbol_type(&mut self) -> NextSymbolType {
        use NextSymbolType::*;

        let c = match self.bump() {
            Some(c) => c,
            Option::None => return None,
        };

        if c == '\n' {
            Newline
        } else if SPACE.contains(c) {
            Space
        } else if is_id_1st(c) {
            SymbolOrId(c)
        } else if c.is_ascii_digit() {
            Digit(c)
        } else if c == '-' {
            Minus
        } else if c == '/' {
            Slash
        } else if c == '"' {
            Quote
        } else if c == '\'' {
            Apostrophe
        } else if "=!<>+*(){};,".contains(c) {
            Punct(c)
        } else {
            Unknown(c)
        }
    }

    /// Digits after the first, then an optional fraction. A lone trailing
    /// dot is not part of the number
    fn number(&mut self, mut text: String) -> TokenType {
        self.take_while(&mut text, |c| c.is_ascii_digit());
        let fraction = self.peek(0) == Some('.') && self.peek(1).map_or(false, |c| c.is_ascii_digit());
        if fraction {
            text.push('.');
            self.bump();
            self.take_while(&mut text, |c| c.is_ascii_digit());
            return match text.parse() {
                Ok(x) => TokenType::Float(x),
                Err(_) => unreachable!("digits with one dot always parse as f64"),
            };
        }
        match text.parse() {
            Ok(n) => TokenType::Int(n),
            Err(_) => {
                warn!("{} doesn't fit in an int at {}:{}, reading it as a float", text, self.line, self.col);
                TokenType::Float(text.parse().unwrap_or(std::f64::INFINITY))
            }
        }
    }

    /// The rest of a "string" after its opening quote, or None when it's
    /// never closed (in which case nothing is consumed)
    fn string(&mut self) -> Option<String> {
        let mut i = 0;
        loop {
            match self.peek(i)? {
                '"' => break,
                '\\' => match self.peek(i + 1)? {
                    '\n' => return Option::None,
                    _ => i += 2,
                },
                _ => i += 1,
            }
        }
        let mut text = String::new();
        for _ in 0..i {
            text.extend(self.bump());
        }
        // closing quote
        self.bump();
        Some(text)
    }

    /// A single char (or one escape) and the closing apostrophe
    fn character(&mut self) -> Option<String> {
        let len = match (self.peek(0)?, self.peek(1)?) {
            ('\\', '\n') => return Option::None,
            ('\\', _) if self.peek(2) == Some('\'') => 2,
            ('\'', _) | ('\\', _) => return Option::None,
            (_, '\'') => 1,
            _ => return Option::None,
        };
        let mut text = String::new();
        for _ in 0..len {
            text.extend(self.bump());
        }
        self.bump();
        Some(text)
    }

    /// Two-char operators win over their one-char prefix
    fn punct(&mut self, c: char) -> Option<TokenType> {
        use TokenType::*;
        let followed_by_eq = self.peek(0) == Some('=');
        let kind = match c {
            '=' if followed_by_eq => Equal,
            '=' => Assignment,
            '!' if followed_by_eq => NotEqual,
            '!' => return Option::None,
            '<' if followed_by_eq => LessEqual,
            '<' => Less,
            '>' if followed_by_eq => GreaterEqual,
            '>' => Greater,
            '+' => Plus,
            '*' => Times,
            '(' => LParen,
            ')' => RParen,
            '{' => LBrace,
            '}' => RBrace,
            ';' => Semicolon,
            ',' => Comma,
            _ => return Option::None,
        };
        if let Equal | NotEqual | LessEqual | GreaterEqual = kind {
            self.bump();
        }
        Some(kind)
    }
}

/// Never fails: whatever isn't a token is skipped (and logged)
pub fn tokenize(text: &str) -> Vec<Token> {
    use NextSymbolType::*;
    let mut lexer = Lexer::new(text);
    loop {
        let lo = (lexer.line, lexer.col);
        let kind = match lexer.next_symbol_type() {
            // This is the end of the file, which is OK, as we are never in the
            // middle of a token here
            None => break,
            Newline | Space => continue,
            SymbolOrId(c) => {
                let mut text = c.to_string();
                lexer.take_while(&mut text, is_id);
                match text.as_ref() {
                    "func" => TokenType::Func,
                    "if" => TokenType::If,
                    "else" => TokenType::Else,
                    "while" => TokenType::While,
                    "return" => TokenType::Return,
                    "print" => TokenType::Print,
                    "true" => TokenType::Bool(true),
                    "false" => TokenType::Bool(false),
                    _ => TokenType::Identifier(text),
                }
            }
            Digit(c) => lexer.number(c.to_string()),
            Minus => {
                let starts_number = lexer.peek(0).map_or(false, |c| c.is_ascii_digit());
                if starts_number && !lexer.ends_operand() {
                    lexer.number("-".to_string())
                } else {
                    TokenType::Minus
                }
            }
            Slash => {
                if lexer.peek(0) == Some('/') {
                    // Comment, the newline itself is left for the next round
                    while lexer.peek(0).map_or(false, |c| c != '\n') {
                        lexer.bump();
                    }
                    continue;
                }
                TokenType::Divide
            }
            Quote => match lexer.string() {
                Some(text) => TokenType::Str(text),
                Option::None => {
                    warn!("dropping unterminated string quote at {}:{}", lo.0, lo.1);
                    continue;
                }
            },
            Apostrophe => match lexer.character() {
                Some(text) => TokenType::Char(text),
                Option::None => {
                    warn!("dropping stray ' at {}:{}", lo.0, lo.1);
                    continue;
                }
            },
            Punct(c) => match lexer.punct(c) {
                Some(kind) => kind,
                Option::None => {
                    warn!("dropping unrecognized character {:?} at {}:{}", c, lo.0, lo.1);
                    continue;
                }
            },
            Unknown(c) => {
                warn!("dropping unrecognized character {:?} at {}:{}", c, lo.0, lo.1);
                continue;
            }
        };
        let span = Span { lo, hi: (lexer.line, lexer.col) };
        lexer.tokens.push(Token { kind, span });
    }
    debug!("lexed {} tokens", lexer.tokens.len());
    lexer.tokens
}

#[cfg(test)]
mod test {
    use super::tokenize;
    use crate::TokenType::{self, *};

    fn kinds(text: &str) -> Vec<TokenType> {
        tokenize(text).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn hello_world() {
        let lexed = kinds(
            r#"func main() // hello world
	print("hi");"#,
        );
        assert_eq!(
            lexed,
            vec![
                Func,
                Identifier("main".to_string()),
                LParen,
                RParen,
                Print,
                LParen,
                Str("hi".to_string()),
                RParen,
                Semicolon,
            ]
        );
    }
    #[test]
    fn digit() {
        assert_eq!(kinds("578 9 2.25 3."), vec![Int(578), Int(9), Float(2.25), Int(3)]);
    }
    #[test]
    fn keywords_need_whole_words() {
        assert_eq!(
            kinds("iffy if while_ true"),
            vec![Identifier("iffy".to_string()), If, Identifier("while_".to_string()), Bool(true)]
        );
    }
    #[test]
    fn longest_operator_first() {
        assert_eq!(
            kinds("== != <= >= < > = + * /"),
            vec![Equal, NotEqual, LessEqual, GreaterEqual, Less, Greater, Assignment, Plus, Times, Divide]
        );
    }
    #[test]
    fn minus_after_operand_is_subtraction() {
        assert_eq!(
            kinds("a - 5 a-5 (1)-2"),
            vec![
                Identifier("a".to_string()),
                Minus,
                Int(5),
                Identifier("a".to_string()),
                Minus,
                Int(5),
                LParen,
                Int(1),
                RParen,
                Minus,
                Int(2),
            ]
        );
    }
    #[test]
    fn minus_elsewhere_is_negative_literal() {
        assert_eq!(
            kinds("x = -5; y = 2 * -1.5; - z"),
            vec![
                Identifier("x".to_string()),
                Assignment,
                Int(-5),
                Semicolon,
                Identifier("y".to_string()),
                Assignment,
                Int(2),
                Times,
                Float(-1.5),
                Semicolon,
                Minus,
                Identifier("z".to_string()),
            ]
        );
    }
    #[test]
    fn quotes_keep_escapes() {
        assert_eq!(
            kinds(r#""a \"b\" c" 'x' '\n'"#),
            vec![Str(r#"a \"b\" c"#.to_string()), Char("x".to_string()), Char("\\n".to_string())]
        );
    }
    #[test]
    fn unmatched_text_is_dropped() {
        assert_eq!(kinds("x @ # ! $ y"), vec![Identifier("x".to_string()), Identifier("y".to_string())]);
        assert_eq!(kinds("\"never closed"), vec![Identifier("never".to_string()), Identifier("closed".to_string())]);
        assert_eq!(kinds("'ab'"), vec![Identifier("ab".to_string())]);
    }
    #[test]
    fn positions() {
        let tokens = tokenize("func f() {\n  // note\n  x = 10;\n}");
        let x = &tokens[5];
        assert_eq!(x.kind, Identifier("x".to_string()));
        assert_eq!((x.line(), x.col()), (3, 3));
        let ten = &tokens[7];
        assert_eq!(ten.span.lo, (3, 7));
        assert_eq!(ten.span.hi, (3, 9));
        assert_eq!((tokens[9].line(), tokens[9].col()), (4, 1));
    }
    #[test]
    fn empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  // only a comment").is_empty());
    }
}
