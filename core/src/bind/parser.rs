use crate::pipeline::{Pipeline, TaskRecord};
use crate::registry::{MethodDef, Registry, VarId};
use crate::token::{Position, Token};
use crate::val::{Group, Matrix, Value};

use super::error::{BindError, BindErrorKind};

/// Literal as written, before it is matched to a keyword's group.
#[derive(Debug, Clone)]
enum Lit {
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Lit>),
}

impl Lit {
    fn describe(&self) -> &'static str {
        match self {
            Lit::Int(_) => "an integer",
            Lit::Float(_) => "a number",
            Lit::Str(_) => "a string",
            Lit::List(_) => "a list",
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Lit::Int(i) => Some(*i as f64),
            Lit::Float(x) => Some(*x),
            _ => None,
        }
    }

    fn numbers(items: &[Lit]) -> Option<Vec<f64>> {
        items.iter().map(Lit::as_f64).collect()
    }

    /// Convert to a value of `group`; `None` if the literal cannot be one.
    fn coerce(&self, group: Group) -> Option<Value> {
        match (group, self) {
            (Group::Index, Lit::Int(i)) => Some(Value::Index(*i)),
            (Group::Numeric, lit) => lit.as_f64().map(Value::Numeric),
            (Group::String, Lit::Str(s)) => Some(Value::String(s.clone())),
            (Group::Vector, Lit::List(items)) => Self::numbers(items).map(Value::Vector),
            (Group::ArrayOfIndex, Lit::List(items)) => items
                .iter()
                .map(|l| match l {
                    Lit::Int(i) => Some(*i),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(Value::ArrayOfIndex),
            (Group::ArrayOfString, Lit::List(items)) => items
                .iter()
                .map(|l| match l {
                    Lit::Str(s) => Some(s.clone()),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(Value::ArrayOfString),
            (Group::Matrix, Lit::List(rows)) => {
                let rows = rows
                    .iter()
                    .map(|r| match r {
                        Lit::List(items) => Self::numbers(items),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()?;
                Matrix::from_rows(&rows).ok().map(Value::Matrix)
            }
            (Group::Any, lit) => lit.coerce(lit.natural_group()),
            _ => None,
        }
    }

    /// Group a literal binds to when the slot accepts anything.
    fn natural_group(&self) -> Group {
        match self {
            Lit::Int(_) => Group::Index,
            Lit::Float(_) => Group::Numeric,
            Lit::Str(_) => Group::String,
            Lit::List(items) => match items.first() {
                Some(Lit::List(_)) => Group::Matrix,
                Some(Lit::Str(_)) => Group::ArrayOfString,
                Some(_) if items.iter().all(|l| matches!(l, Lit::Int(_))) => Group::ArrayOfIndex,
                _ => Group::Vector,
            },
        }
    }
}

pub(super) struct Parser<'a> {
    registry: &'a Registry,
    tokens: Vec<Token>,
    positions: Vec<Position>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub(super) fn new(registry: &'a Registry, tokens: Vec<Token>, positions: Vec<Position>) -> Self {
        Self {
            registry,
            tokens,
            positions,
            pos: 0,
        }
    }

    pub(super) fn parse_program(&mut self, name: &str) -> Result<Pipeline, BindError> {
        let mut pipeline = Pipeline::new(name);
        while self.pos < self.tokens.len() {
            pipeline.append(self.parse_task()?);
        }
        Ok(pipeline)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.pos + ahead)
    }

    fn position(&self) -> Option<Position> {
        self.positions
            .get(self.pos)
            .or_else(|| self.positions.last())
            .copied()
    }

    fn err(&self, kind: BindErrorKind, message: impl Into<String>) -> BindError {
        BindError::new(kind, message, self.position())
    }

    fn next(&mut self, expected: &str) -> Result<Token, BindError> {
        match self.tokens.get(self.pos) {
            Some(tok) => {
                let tok = tok.clone();
                self.pos += 1;
                Ok(tok)
            }
            None => Err(self.err(
                BindErrorKind::UnexpectedEnd,
                format!("Unexpected end of input, expected {}", expected),
            )),
        }
    }

    fn expect(&mut self, want: Token) -> Result<(), BindError> {
        let expected = want.to_string();
        let at = self.position();
        let tok = self.next(&expected)?;
        if tok != want {
            return Err(BindError::new(
                BindErrorKind::Syntax,
                format!("Expected {}, found {}", expected, tok),
                at,
            ));
        }
        Ok(())
    }

    fn expect_name(&mut self, what: &str) -> Result<(String, Option<Position>), BindError> {
        let at = self.position();
        match self.next(what)? {
            Token::Id(name) => Ok((name, at)),
            other => Err(BindError::new(
                BindErrorKind::Syntax,
                format!("Expected {}, found {}", what, other),
                at,
            )),
        }
    }

    fn parse_task(&mut self) -> Result<TaskRecord, BindError> {
        let (name, at) = self.expect_name("a method name")?;
        let Some(id) = self.registry.method_id(&name) else {
            return Err(BindError::new(
                BindErrorKind::UnknownMethod,
                format!("Unknown method '{}'", name),
                at,
            ));
        };
        let def = self.registry.method(id);

        let generics = self.parse_generics(def)?;
        let (gouts, gins) = generics.split_at(def.generic_output_groups.len());

        self.expect(Token::LBrace)?;
        let keywords = self.parse_keywords(def)?;

        let mut nested = Vec::new();
        while let Some(Token::Id(_)) = self.peek() {
            if !def.takes_pipeline {
                let message = match self.peek_at(1) {
                    Some(Token::Assign) => format!("Unexpected keyword for method {}", def.name),
                    _ => format!("Method {} does not take an embedded pipeline", def.name),
                };
                let kind = match self.peek_at(1) {
                    Some(Token::Assign) => BindErrorKind::UnexpectedKeyword,
                    _ => BindErrorKind::Syntax,
                };
                return Err(self.err(kind, message));
            }
            nested.push(self.parse_task()?);
        }
        self.expect(Token::RBrace)?;

        let embedded = def
            .takes_pipeline
            .then(|| Pipeline::with_tasks(&def.name, nested));
        Ok(TaskRecord::new(id, keywords, gouts.to_vec(), gins.to_vec(), embedded))
    }

    fn parse_generics(&mut self, def: &MethodDef) -> Result<Vec<VarId>, BindError> {
        let start = self.position();
        let mut names: Vec<(String, Option<Position>)> = Vec::new();
        if self.peek() == Some(&Token::LParen) {
            self.pos += 1;
            loop {
                names.push(self.expect_name("a variable name")?);
                match self.next("')'")? {
                    Token::Comma => continue,
                    Token::RParen => break,
                    other => {
                        return Err(BindError::new(
                            BindErrorKind::Syntax,
                            format!("Expected ',' or ')', found {}", other),
                            self.positions.get(self.pos - 1).copied(),
                        ));
                    }
                }
            }
        }

        if names.len() != def.generic_count() {
            return Err(BindError::new(
                BindErrorKind::WrongArity,
                format!(
                    "Method {} takes {} generic variable(s), {} given",
                    def.name,
                    def.generic_count(),
                    names.len()
                ),
                start,
            ));
        }

        let groups = def.generic_output_groups.iter().chain(&def.generic_input_groups);
        let mut ids = Vec::with_capacity(names.len());
        for ((name, at), want) in names.into_iter().zip(groups) {
            let Some(id) = self.registry.variable_id(&name) else {
                return Err(BindError::new(
                    BindErrorKind::UnknownVariable,
                    format!("Unknown workspace variable '{}'", name),
                    at,
                ));
            };
            let have = self.registry.variable(id).group;
            if !want.accepts(have) {
                return Err(BindError::new(
                    BindErrorKind::WrongGroup,
                    format!(
                        "Variable {} is of group {}, but method {} expects {} here",
                        name, have, def.name, want
                    ),
                    at,
                ));
            }
            ids.push(id);
        }
        Ok(ids)
    }

    fn parse_keywords(&mut self, def: &MethodDef) -> Result<Vec<Value>, BindError> {
        let mut values = Vec::with_capacity(def.keyword_names.len());
        let single = def.keyword_names.len() == 1;

        for (kw, group) in def.keyword_names.iter().zip(&def.keyword_groups) {
            match (self.peek(), self.peek_at(1)) {
                (Some(Token::Id(given)), Some(Token::Assign)) => {
                    if given != kw {
                        let message = match def.keyword_index(given) {
                            Some(_) => format!("Keyword {} of method {} is out of order, expected {}", given, def.name, kw),
                            None => format!("Method {} has no keyword {}", def.name, given),
                        };
                        return Err(self.err(BindErrorKind::UnexpectedKeyword, message));
                    }
                    self.pos += 2;
                }
                (Some(Token::Str(_) | Token::Int(_) | Token::Float(_) | Token::LBracket), _) if single => {}
                (Some(Token::RBrace) | Some(Token::Id(_)), _) => {
                    return Err(self.err(
                        BindErrorKind::WrongArity,
                        format!("Method {} is missing keyword {}", def.name, kw),
                    ));
                }
                (None, _) => {
                    return Err(self.err(
                        BindErrorKind::UnexpectedEnd,
                        format!("Unexpected end of input, expected keyword {}", kw),
                    ));
                }
                (Some(other), _) => {
                    return Err(self.err(
                        BindErrorKind::Syntax,
                        format!("Expected keyword {}, found {}", kw, other),
                    ));
                }
            }

            let at = self.position();
            let lit = self.parse_literal()?;
            let Some(value) = lit.coerce(*group) else {
                return Err(BindError::new(
                    BindErrorKind::WrongGroup,
                    format!(
                        "Keyword {} of method {} expects {}, found {}",
                        kw,
                        def.name,
                        group,
                        lit.describe()
                    ),
                    at,
                ));
            };
            values.push(value);
        }
        Ok(values)
    }

    fn parse_literal(&mut self) -> Result<Lit, BindError> {
        let at = self.position();
        match self.next("a value")? {
            Token::Int(i) => Ok(Lit::Int(i)),
            Token::Float(x) => Ok(Lit::Float(x)),
            Token::Str(s) => Ok(Lit::Str(s)),
            Token::LBracket => {
                let mut items = Vec::new();
                if self.peek() == Some(&Token::RBracket) {
                    self.pos += 1;
                    return Ok(Lit::List(items));
                }
                loop {
                    items.push(self.parse_literal()?);
                    match self.next("']'")? {
                        Token::Comma => continue,
                        Token::RBracket => break,
                        other => {
                            return Err(BindError::new(
                                BindErrorKind::Syntax,
                                format!("Expected ',' or ']', found {}", other),
                                self.positions.get(self.pos - 1).copied(),
                            ));
                        }
                    }
                }
                Ok(Lit::List(items))
            }
            other => Err(BindError::new(
                BindErrorKind::Syntax,
                format!("Expected a value, found {}", other),
                at,
            )),
        }
    }
}
