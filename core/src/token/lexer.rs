use std::fmt;

use crate::token::{ParseError, Position};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LParen,      // (
    RParen,      // )
    LBrace,      // {
    RBrace,      // }
    LBracket,    // [
    RBracket,    // ]
    Comma,       // ,
    Assign,      // =
    Str(String), // "abc"
    Int(i64),    // 1
    Float(f64),  // 1.1
    Id(String),  // method, variable or keyword name
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::LBrace => f.write_str("'{'"),
            Token::RBrace => f.write_str("'}'"),
            Token::LBracket => f.write_str("'['"),
            Token::RBracket => f.write_str("']'"),
            Token::Comma => f.write_str("','"),
            Token::Assign => f.write_str("'='"),
            Token::Str(s) => write!(f, "string \"{}\"", s),
            Token::Int(i) => write!(f, "integer {}", i),
            Token::Float(x) => write!(f, "number {}", x),
            Token::Id(name) => write!(f, "name '{}'", name),
        }
    }
}

#[inline]
fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Turns control-file text into tokens, tracking line and column for every token.
pub struct Tokenizer<'a> {
    chars: Vec<char>,
    idx: usize,
    len: usize,
    pub tokens: Vec<Token>,
    pub token_positions: Vec<Position>,
    line: u32,
    column: u32,
    input: &'a str,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        Self {
            len: chars.len(),
            chars,
            idx: 0,
            tokens: Vec::with_capacity(input.len() / 4),
            token_positions: Vec::with_capacity(input.len() / 4),
            line: 1,
            column: 1,
            input,
        }
    }

    pub fn tokenize(s: &str) -> Result<Vec<Token>, ParseError> {
        Self::tokenize_with_positions(s).map(|(tokens, _)| tokens)
    }

    /// Tokens and their start positions, aligned by index
    pub fn tokenize_with_positions(s: &str) -> Result<(Vec<Token>, Vec<Position>), ParseError> {
        let mut t = Tokenizer::new(s);
        t.parse()?;
        Ok((t.tokens, t.token_positions))
    }

    pub fn current_position(&self) -> Position {
        Position::new(self.line, self.column, self.idx)
    }

    fn eof(&self) -> bool {
        self.idx >= self.len
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn err<T: AsRef<str>>(&self, msg: T) -> ParseError {
        let line_context = self.get_line_context();
        let message = if line_context.is_empty() {
            msg.as_ref().to_string()
        } else {
            format!("{} (line {}: {})", msg.as_ref(), self.line, line_context.trim())
        };
        ParseError::at(message, self.current_position())
    }

    fn get_line_context(&self) -> String {
        let target = (self.line as usize).saturating_sub(1);
        self.input
            .lines()
            .nth(target)
            .map(|line| line.to_string())
            .unwrap_or_default()
    }

    fn advance_char(&mut self) {
        if !self.eof() && self.chars[self.idx] == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.idx += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance_char();
            } else if c == '#' {
                self.skip_line_comment();
            } else {
                break;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            self.advance_char();
            if c == '\n' {
                break;
            }
        }
    }

    fn parse_str(&mut self) -> Result<(), ParseError> {
        let start_pos = self.current_position();
        self.advance_char(); // opening quote
        let mut content = String::new();
        loop {
            match self.peek() {
                None => return Err(self.err("Unterminated string")),
                Some('\n') => return Err(self.err("Line break before end of string")),
                Some('"') => {
                    self.advance_char();
                    break;
                }
                Some(c) => {
                    content.push(c);
                    self.advance_char();
                }
            }
        }
        self.push_at(Token::Str(content), start_pos);
        Ok(())
    }

    fn take_digits(&mut self, into: &mut String) -> usize {
        let mut n = 0;
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            into.push(c);
            self.advance_char();
            n += 1;
        }
        n
    }

    /// Numbers: optional sign, digits with an optional decimal point on either
    /// side (`23.`, `.5`), optional exponent. At least one mantissa digit.
    fn parse_num(&mut self) -> Result<(), ParseError> {
        let start_pos = self.current_position();
        let mut num = String::new();
        let mut is_float = false;

        if let Some(sign @ ('+' | '-')) = self.peek() {
            num.push(sign);
            self.advance_char();
        }

        let mut digits = self.take_digits(&mut num);
        if self.peek() == Some('.') {
            is_float = true;
            num.push('.');
            self.advance_char();
            digits += self.take_digits(&mut num);
        }
        if digits == 0 {
            return Err(self.err("Expected at least one digit"));
        }

        if let Some(e @ ('e' | 'E')) = self.peek() {
            is_float = true;
            num.push(e);
            self.advance_char();
            if let Some(sign @ ('+' | '-')) = self.peek() {
                num.push(sign);
                self.advance_char();
            }
            if self.take_digits(&mut num) == 0 {
                return Err(self.err("Invalid number, incomplete exponent"));
            }
        }

        let token = if is_float {
            match num.parse::<f64>() {
                Ok(f) if f.is_finite() => Token::Float(f),
                Ok(_) => return Err(self.err(format!("Float out of range: {}", num))),
                Err(_) => return Err(self.err(format!("Invalid float: {}", num))),
            }
        } else {
            match num.parse() {
                Ok(i) => Token::Int(i),
                Err(_) => return Err(self.err(format!("Invalid integer: {}", num))),
            }
        };
        self.push_at(token, start_pos);
        Ok(())
    }

    fn parse_id(&mut self) -> Result<(), ParseError> {
        let start_pos = self.current_position();
        let mut id = String::new();
        while let Some(c) = self.peek() {
            if !is_name_continue(c) {
                break;
            }
            id.push(c);
            self.advance_char();
        }
        self.push_at(Token::Id(id), start_pos);
        Ok(())
    }

    fn parse_punctuation(&mut self, c: char) -> Result<(), ParseError> {
        let token = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            '=' => Token::Assign,
            other => return Err(self.err(format!("Unexpected character '{}'", other))),
        };
        let start_pos = self.current_position();
        self.advance_char();
        self.push_at(token, start_pos);
        Ok(())
    }

    fn parse(&mut self) -> Result<(), ParseError> {
        loop {
            self.skip_whitespace();
            let Some(c) = self.peek() else {
                break;
            };
            match c {
                '"' => self.parse_str()?,
                '0'..='9' | '+' | '-' | '.' => self.parse_num()?,
                c if is_name_start(c) => self.parse_id()?,
                c => self.parse_punctuation(c)?,
            }
        }
        Ok(())
    }

    fn push_at(&mut self, token: Token, start: Position) {
        self.tokens.push(token);
        self.token_positions.push(start);
    }
}
