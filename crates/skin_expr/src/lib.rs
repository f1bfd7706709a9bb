//! Coordinate expression evaluation for skin geometry attributes.
//!
//! Skin documents express positions and sizes symbolically and the values are
//! only resolvable once the parent extent, the object size, and the display
//! scale are known. Expressions therefore stay strings until a resolution
//! pass calls [`evaluate`].
//!
//! Grammar, in one dimension:
//! - `center` centers the object inside the parent extent,
//! - `e` is the parent extent, `c` the parent midpoint,
//! - `%` multiplies by one hundredth of the parent extent,
//! - `w`/`h` multiply by the current font advance width / line height,
//! - `f` is the global skin factor,
//! - `+ - * / ( )` combine subexpressions, e.g. `10+center-10w+4%`.

#![forbid(unsafe_code)]

use log::{error, warn};
use thiserror::Error;

/// Ratio of actual to design resolution along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scale {
    pub num: i32,
    pub den: i32,
}

impl Scale {
    /// The identity scale (design resolution equals actual resolution).
    pub const ONE: Scale = Scale { num: 1, den: 1 };

    pub fn new(num: i32, den: i32) -> Self {
        if den == 0 {
            warn!("scale denominator is zero, using identity scale");
            return Self::ONE;
        }
        Self { num, den }
    }

    /// Scale an integer, truncating toward zero.
    pub fn apply(self, value: i64) -> i64 {
        value * i64::from(self.num) / i64::from(self.den)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::ONE
    }
}

/// Metrics of the font in effect for `w` and `h` units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontMetrics {
    /// Advance width of one character cell, multiplied in by `w`.
    pub advance: i32,
    /// Line height, multiplied in by `h`.
    pub line_height: i32,
}

/// Metrics of the built-in `Body` alias, assumed when an expression uses
/// font units but no font is in effect for the element.
pub const BODY_METRICS: FontMetrics = FontMetrics { advance: 16, line_height: 22 };

/// Why an expression could not be evaluated.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("malformed expression")]
    Malformed,

    #[error("division by zero")]
    DivisionByZero,
}

/// Evaluate a one-dimensional coordinate expression to a pixel value.
///
/// `parent` is the extent of the containing region, `object_size` the extent
/// of the object being placed (used by `center`), `font` the metrics backing
/// `w`/`h`, `scale` the actual/design ratio for this axis, and `factor` the
/// global skin factor substituted for `f`.
///
/// Returns `None` only for the literal `"*"`, which means "unspecified"; the
/// caller picks the default. A malformed expression logs an error and
/// evaluates to 0. Results never go below 0.
///
/// Integer literals are rescaled individually before the expression is
/// combined, not after: `3*(e-c/2)` at scale 2/1 evaluates with the digit
/// runs `3` and `2` already doubled. This matches how loaded documents have
/// always been interpreted and is relied upon by existing skins.
pub fn evaluate(
    expr: &str,
    parent: i32,
    object_size: i32,
    font: Option<FontMetrics>,
    scale: Scale,
    factor: f64,
) -> Option<i32> {
    let value = expr.trim();
    // Fast path, plain integers are by far the most common case.
    if let Ok(number) = value.parse::<i64>() {
        return Some(clamp(scale.apply(number)));
    }
    match value {
        "center" => {
            let centered = if object_size != 0 { (parent - object_size) / 2 } else { 0 };
            return Some(centered.max(0));
        }
        "*" => return None,
        _ => {}
    }
    let metrics = font.unwrap_or_else(|| {
        if value.contains('w') || value.contains('h') {
            warn!(
                "coordinate '{value}' uses font units without a font in effect, \
                 assuming Body (width={}, height={})",
                BODY_METRICS.advance, BODY_METRICS.line_height
            );
        }
        BODY_METRICS
    });
    let result = tokenize(value, parent, object_size, metrics, scale, factor)
        .and_then(|tokens| Cursor::new(&tokens).run());
    match result {
        Ok(result) => Some(clamp(result as i64)),
        Err(err) => {
            error!("coordinate '{value}' cannot be evaluated: {err}");
            Some(0)
        }
    }
}

fn clamp(value: i64) -> i32 {
    value.clamp(0, i64::from(i32::MAX)) as i32
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

/// Turn an expression into tokens, substituting symbols with their current
/// values. `%`, `w` and `h` expand to a multiplication, mirroring their
/// placement after the quantity they scale.
fn tokenize(
    value: &str,
    parent: i32,
    object_size: i32,
    metrics: FontMetrics,
    scale: Scale,
    factor: f64,
) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let bytes = value.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        let ch = bytes[index] as char;
        match ch {
            '0'..='9' => {
                let start = index;
                while index < bytes.len() && bytes[index].is_ascii_digit() {
                    index += 1;
                }
                // An overlong digit run fails the parse and degrades to 0.
                let run: i64 = value[start..index].parse().map_err(|_| EvalError::Malformed)?;
                tokens.push(Token::Number(scale.apply(run) as f64));
                continue;
            }
            ' ' | '\t' => {}
            '+' => tokens.push(Token::Plus),
            '-' => tokens.push(Token::Minus),
            '*' => tokens.push(Token::Star),
            '/' => tokens.push(Token::Slash),
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            '%' => {
                tokens.push(Token::Star);
                tokens.push(Token::Number(f64::from(parent) / 100.0));
            }
            'w' => {
                tokens.push(Token::Star);
                tokens.push(Token::Number(f64::from(metrics.advance)));
            }
            'h' => {
                tokens.push(Token::Star);
                tokens.push(Token::Number(f64::from(metrics.line_height)));
            }
            'e' => tokens.push(Token::Number(f64::from(parent))),
            'c' => {
                // "center" must win over the bare `c` shorthand.
                if value[index..].starts_with("center") {
                    tokens.push(Token::Number(f64::from(parent - object_size) / 2.0));
                    index += "center".len();
                    continue;
                }
                tokens.push(Token::Number(f64::from(parent) / 2.0));
            }
            'f' => tokens.push(Token::Number(factor)),
            other => return Err(EvalError::UnexpectedCharacter(other)),
        }
        index += 1;
    }
    Ok(tokens)
}

/// Recursive-descent evaluation over the token stream.
struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn run(mut self) -> Result<f64, EvalError> {
        let result = self.expression()?;
        if self.pos != self.tokens.len() {
            return Err(EvalError::Malformed);
        }
        Ok(result)
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Result<Token, EvalError> {
        let token = self.peek().ok_or(EvalError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn expression(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        while let Some(token) = self.peek() {
            match token {
                Token::Plus => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Token::Minus => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        while let Some(token) = self.peek() {
            match token {
                Token::Star => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Token::Slash => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, EvalError> {
        match self.advance()? {
            Token::Number(number) => Ok(number),
            Token::Open => {
                let value = self.expression()?;
                match self.advance()? {
                    Token::Close => Ok(value),
                    _ => Err(EvalError::Malformed),
                }
            }
            _ => Err(EvalError::Malformed),
        }
    }
}
