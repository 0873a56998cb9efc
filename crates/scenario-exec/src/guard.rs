// crates/scenario-exec/src/guard.rs
// ============================================================================
// Module: Guard Evaluation
// Description: Evaluates `DependencyEdge` guards, including a hand-rolled
//              evaluator for the restricted `custom(expr)` boolean grammar.
// Purpose: `spec.md` §4.6 dependency guards.
// Dependencies: scenario-core, regex, crate::driver
// ============================================================================

//! ## Overview
//! Five of the six [`GuardKind`] variants delegate to the [`PageDriver`]
//! boundary or to the caller-supplied variable map. The sixth, `Custom`, is
//! a small boolean expression language — literals, `==`/`!=`/`contains`,
//! `&&`/`||`/`!`, and dotted field access into `url`/`title`/`variables` —
//! evaluated by the recursive-descent parser below. A malformed or
//! out-of-bounds expression never fails the guard outright; it evaluates to
//! `false`, per the same fail-closed posture the rest of this crate uses for
//! untrusted scenario content.

use std::collections::BTreeMap;

use regex::Regex;
use scenario_core::Guard;
use scenario_core::GuardKind;

use crate::driver::DriverError;
use crate::driver::PageDriver;

/// Read-only context a guard evaluates against.
pub struct GuardContext<'a> {
    /// The page's current URL.
    pub url: &'a str,
    /// The page's current document title.
    pub title: &'a str,
    /// Named values accumulated from parameters and prior outputs.
    pub variables: &'a BTreeMap<String, String>,
}

/// Errors raised while evaluating a guard against the [`PageDriver`] boundary.
/// The `custom(expr)` grammar never raises this — its failures collapse to
/// `false` instead (see module docs).
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// The driver failed while answering a guard query.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Evaluates `guard` and returns whether its dependency should run (`true`)
/// or be skipped (`false`), applying `skip_if` inversion.
///
/// # Errors
///
/// Returns [`GuardError::Driver`] if the underlying condition requires a
/// page query that fails.
pub async fn should_run(
    guard: &Guard,
    ctx: &GuardContext<'_>,
    driver: &dyn PageDriver,
) -> Result<bool, GuardError> {
    let condition = evaluate_kind(&guard.kind, ctx, driver).await?;
    Ok(if guard.skip_if { !condition } else { condition })
}

async fn evaluate_kind(
    kind: &GuardKind,
    ctx: &GuardContext<'_>,
    driver: &dyn PageDriver,
) -> Result<bool, GuardError> {
    match kind {
        GuardKind::IsAuthenticated => Ok(driver.looks_authenticated().await?),
        GuardKind::HasData { key } => Ok(ctx.variables.contains_key(key)),
        GuardKind::VariableExists { name } => Ok(ctx.variables.contains_key(name)),
        GuardKind::ElementExists { selector } => Ok(driver.element_exists(selector).await?),
        GuardKind::UrlMatches { pattern } => Ok(url_matches(ctx.url, pattern)),
        GuardKind::Custom { expr } => Ok(evaluate_custom(expr, ctx)),
    }
}

fn url_matches(url: &str, pattern: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(url),
        Err(_) => url.contains(pattern),
    }
}

// ============================================================================
// SECTION: `custom(expr)` boolean grammar
// ============================================================================

const MAX_EXPR_BYTES: usize = 2048;
const MAX_EXPR_NESTING: usize = 32;

#[derive(Debug, thiserror::Error)]
enum ExprError {
    #[error("expression exceeds {max} bytes (got {actual})")]
    TooLarge { max: usize, actual: usize },
    #[error("expression nesting exceeds {max} levels at byte {position}")]
    NestingTooDeep { max: usize, position: usize },
    #[error("unexpected `{found}` at byte {position}, expected {expected}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: usize,
    },
    #[error("unterminated string literal starting at byte {position}")]
    UnterminatedString { position: usize },
    #[error("trailing input at byte {position}")]
    TrailingInput { position: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    AndAnd,
    OrOr,
    Bang,
    EqEq,
    NotEq,
    Contains,
    LParen,
    RParen,
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(s) => format!("identifier `{s}`"),
            Token::Str(s) => format!("string \"{s}\""),
            Token::AndAnd => "`&&`".to_string(),
            Token::OrOr => "`||`".to_string(),
            Token::Bang => "`!`".to_string(),
            Token::EqEq => "`==`".to_string(),
            Token::NotEq => "`!=`".to_string(),
            Token::Contains => "`contains`".to_string(),
            Token::LParen => "`(`".to_string(),
            Token::RParen => "`)`".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct SpannedToken {
    token: Token,
    position: usize,
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn next_token(&mut self) -> Result<SpannedToken, ExprError> {
        self.skip_whitespace();
        let position = self.pos;
        let Some(c) = self.peek_char() else {
            return Ok(SpannedToken {
                token: Token::Eof,
                position,
            });
        };

        let token = match c {
            '(' => {
                self.bump();
                Token::LParen
            }
            ')' => {
                self.bump();
                Token::RParen
            }
            '&' => {
                self.bump();
                if self.bump() != Some('&') {
                    return Err(ExprError::UnexpectedToken {
                        expected: "`&&`",
                        found: "`&`".to_string(),
                        position,
                    });
                }
                Token::AndAnd
            }
            '|' => {
                self.bump();
                if self.bump() != Some('|') {
                    return Err(ExprError::UnexpectedToken {
                        expected: "`||`",
                        found: "`|`".to_string(),
                        position,
                    });
                }
                Token::OrOr
            }
            '!' => {
                self.bump();
                if self.peek_char() == Some('=') {
                    self.bump();
                    Token::NotEq
                } else {
                    Token::Bang
                }
            }
            '=' => {
                self.bump();
                if self.bump() != Some('=') {
                    return Err(ExprError::UnexpectedToken {
                        expected: "`==`",
                        found: "`=`".to_string(),
                        position,
                    });
                }
                Token::EqEq
            }
            '"' | '\'' => self.lex_string(c, position)?,
            c if c.is_alphabetic() || c == '_' => self.lex_ident(),
            other => {
                return Err(ExprError::UnexpectedToken {
                    expected: "an operator, identifier, or string literal",
                    found: format!("`{other}`"),
                    position,
                });
            }
        };

        Ok(SpannedToken { token, position })
    }

    fn lex_string(&mut self, quote: char, position: usize) -> Result<Token, ExprError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(ExprError::UnterminatedString { position }),
                Some(c) if c == quote => break,
                Some('\\') => match self.bump() {
                    Some(escaped) => out.push(escaped),
                    None => return Err(ExprError::UnterminatedString { position }),
                },
                Some(c) => out.push(c),
            }
        }
        Ok(Token::Str(out))
    }

    fn lex_ident(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek_char(), Some(c) if c.is_alphanumeric() || c == '_' || c == '.') {
            self.bump();
        }
        let text = &self.input[start..self.pos];
        if text == "contains" {
            Token::Contains
        } else {
            Token::Ident(text.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Str(String),
    Bool(bool),
}

impl Value {
    fn truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Bool(b) => *b,
        }
    }

    fn as_str(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
        }
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: SpannedToken,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, ExprError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<(), ExprError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn enter(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_EXPR_NESTING {
            return Err(ExprError::NestingTooDeep {
                max: MAX_EXPR_NESTING,
                position: self.current.position,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_expr(&mut self, ctx: &GuardContext<'_>) -> Result<Value, ExprError> {
        self.parse_or(ctx)
    }

    fn parse_or(&mut self, ctx: &GuardContext<'_>) -> Result<Value, ExprError> {
        self.enter()?;
        let mut left = self.parse_and(ctx)?;
        while self.current.token == Token::OrOr {
            self.advance()?;
            let right = self.parse_and(ctx)?;
            left = Value::Bool(left.truthy() || right.truthy());
        }
        self.leave();
        Ok(left)
    }

    fn parse_and(&mut self, ctx: &GuardContext<'_>) -> Result<Value, ExprError> {
        self.enter()?;
        let mut left = self.parse_unary(ctx)?;
        while self.current.token == Token::AndAnd {
            self.advance()?;
            let right = self.parse_unary(ctx)?;
            left = Value::Bool(left.truthy() && right.truthy());
        }
        self.leave();
        Ok(left)
    }

    fn parse_unary(&mut self, ctx: &GuardContext<'_>) -> Result<Value, ExprError> {
        self.enter()?;
        let value = if self.current.token == Token::Bang {
            self.advance()?;
            let inner = self.parse_unary(ctx)?;
            Value::Bool(!inner.truthy())
        } else {
            self.parse_comparison(ctx)?
        };
        self.leave();
        Ok(value)
    }

    fn parse_comparison(&mut self, ctx: &GuardContext<'_>) -> Result<Value, ExprError> {
        self.enter()?;
        let left = self.parse_primary(ctx)?;
        let value = match self.current.token {
            Token::EqEq => {
                self.advance()?;
                let right = self.parse_primary(ctx)?;
                Value::Bool(left.as_str() == right.as_str())
            }
            Token::NotEq => {
                self.advance()?;
                let right = self.parse_primary(ctx)?;
                Value::Bool(left.as_str() != right.as_str())
            }
            Token::Contains => {
                self.advance()?;
                let right = self.parse_primary(ctx)?;
                Value::Bool(left.as_str().contains(&right.as_str()))
            }
            _ => left,
        };
        self.leave();
        Ok(value)
    }

    fn parse_primary(&mut self, ctx: &GuardContext<'_>) -> Result<Value, ExprError> {
        self.enter()?;
        let value = match self.current.token.clone() {
            Token::Str(s) => {
                self.advance()?;
                Value::Str(s)
            }
            Token::Ident(name) => {
                self.advance()?;
                Value::Str(resolve_field(&name, ctx))
            }
            Token::LParen => {
                self.advance()?;
                let inner = self.parse_expr(ctx)?;
                self.expect(Token::RParen)?;
                inner
            }
            other => {
                return Err(ExprError::UnexpectedToken {
                    expected: "a string literal, field reference, or `(`",
                    found: other.describe(),
                    position: self.current.position,
                });
            }
        };
        self.leave();
        Ok(value)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ExprError> {
        if self.current.token == expected {
            self.advance()
        } else {
            Err(ExprError::UnexpectedToken {
                expected: "`)`",
                found: self.current.token.describe(),
                position: self.current.position,
            })
        }
    }
}

fn resolve_field(name: &str, ctx: &GuardContext<'_>) -> String {
    if name == "url" {
        return ctx.url.to_string();
    }
    if name == "title" {
        return ctx.title.to_string();
    }
    if let Some(key) = name.strip_prefix("variables.") {
        return ctx.variables.get(key).cloned().unwrap_or_default();
    }
    String::new()
}

fn parse_and_eval(expr: &str, ctx: &GuardContext<'_>) -> Result<Value, ExprError> {
    if expr.len() > MAX_EXPR_BYTES {
        return Err(ExprError::TooLarge {
            max: MAX_EXPR_BYTES,
            actual: expr.len(),
        });
    }
    let mut parser = Parser::new(expr)?;
    let value = parser.parse_expr(ctx)?;
    if parser.current.token != Token::Eof {
        return Err(ExprError::TrailingInput {
            position: parser.current.position,
        });
    }
    Ok(value)
}

fn evaluate_custom(expr: &str, ctx: &GuardContext<'_>) -> bool {
    match parse_and_eval(expr, ctx) {
        Ok(value) => value.truthy(),
        Err(error) => {
            tracing::debug!(%error, expr, "custom guard expression failed, treating as false");
            false
        }
    }
}
