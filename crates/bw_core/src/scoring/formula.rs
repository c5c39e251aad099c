//! Custom rank equation evaluation.
//!
//! User-supplied equations reference the 14 normalized variable names and
//! plain arithmetic, e.g. `0.5 * fkdr + 0.5 * ws`. Evaluation never
//! touches a general-purpose interpreter:
//!
//! 1. identifier tokens are substituted with their normalized values;
//! 2. the substituted text is rejected unless every character is a digit,
//!    `.`, `(`, `)`, `+`, `-`, `*`, `/`, or whitespace;
//! 3. the result is computed by the recursive-descent parser below, over
//!    exactly that grammar.
//!
//! Injection is impossible by construction rather than by filtering.

use serde::{Deserialize, Serialize};

use crate::error::FormulaError;

use super::stats::NormalizedStats;

/// A free-text rank equation over the normalized variable names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEquation {
    text: String,
}

impl RankEquation {
    /// Wrap an equation string. Returns `None` for blank input, which
    /// callers treat as "use the default formula".
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self { text })
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Substitute variable names with normalized values, producing a pure
    /// arithmetic expression.
    fn substitute(&self, stats: &NormalizedStats) -> Result<String, FormulaError> {
        let mut out = String::with_capacity(self.text.len());
        let mut chars = self.text.char_indices().peekable();

        while let Some(&(start, c)) = chars.peek() {
            if c.is_ascii_alphabetic() || c == '_' {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let ident = &self.text[start..end];
                match stats.get_by_name(ident) {
                    Some(value) => out.push_str(&format!("({value})")),
                    None => return Err(FormulaError::UnknownVariable(ident.to_string())),
                }
            } else {
                out.push(c);
                chars.next();
            }
        }

        Ok(out)
    }

    /// Evaluate the equation against normalized stats.
    ///
    /// Any invalid input or non-finite result is a typed error, never a
    /// panic; the scorer maps errors to the default formula.
    pub fn evaluate(&self, stats: &NormalizedStats) -> Result<f64, FormulaError> {
        let substituted = self.substitute(stats)?;

        if let Some(bad) = substituted.chars().find(|c| !is_whitelisted(*c)) {
            return Err(FormulaError::ForbiddenCharacter(bad));
        }

        let value = Parser::new(&substituted).parse()?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FormulaError::NonFinite)
        }
    }
}

fn is_whitelisted(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || matches!(c, '.' | '(' | ')' | '+' | '-' | '*' | '/')
}

/// Recursive-descent evaluator over the fixed arithmetic grammar:
///
/// ```text
/// expr   := term (('+' | '-') term)*
/// term   := factor (('*' | '/') factor)*
/// factor := '-' factor | '(' expr ')' | number
/// ```
struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        // Whitelisted input is effectively ASCII; a stray multi-byte
        // character surfaces as a typed parse error, never a panic.
        Self {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<f64, FormulaError> {
        let value = self.expr()?;
        self.skip_ws();
        if self.pos < self.bytes.len() {
            return Err(FormulaError::TrailingInput { at: self.pos });
        }
        Ok(value)
    }

    fn expr(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.term()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'+') => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(b'-') => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.factor()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Some(b'/') => {
                    self.pos += 1;
                    value /= self.factor()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<f64, FormulaError> {
        self.skip_ws();
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                Ok(-self.factor()?)
            }
            Some(b'(') => {
                self.pos += 1;
                let value = self.expr()?;
                self.skip_ws();
                match self.peek() {
                    Some(b')') => {
                        self.pos += 1;
                        Ok(value)
                    }
                    Some(c) => Err(FormulaError::UnexpectedChar {
                        found: c as char,
                        at: self.pos,
                    }),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            Some(c) if c.is_ascii_digit() || c == b'.' => self.number(),
            Some(c) => Err(FormulaError::UnexpectedChar {
                found: c as char,
                at: self.pos,
            }),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }

    fn number(&mut self) -> Result<f64, FormulaError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == b'.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| FormulaError::BadNumber { at: start })?;
        text.parse::<f64>()
            .map_err(|_| FormulaError::BadNumber { at: start })
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if (c as char).is_whitespace()) {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::sigmoid::StatKey;

    fn eval(expr: &str, stats: &NormalizedStats) -> Result<f64, FormulaError> {
        RankEquation::new(expr).expect("non-empty").evaluate(stats)
    }

    #[test]
    fn test_blank_equation_is_none() {
        assert!(RankEquation::new("").is_none());
        assert!(RankEquation::new("   ").is_none());
    }

    #[test]
    fn test_plain_arithmetic() {
        let stats = NormalizedStats::uniform(0.0);
        assert_eq!(eval("1 + 2 * 3", &stats).unwrap(), 7.0);
        assert_eq!(eval("(1 + 2) * 3", &stats).unwrap(), 9.0);
        assert_eq!(eval("-2 * -3", &stats).unwrap(), 6.0);
        assert_eq!(eval("10 / 4", &stats).unwrap(), 2.5);
    }

    #[test]
    fn test_variable_substitution() {
        let stats = NormalizedStats::uniform(0.5);
        assert_eq!(eval("fkdr + ws", &stats).unwrap(), 1.0);
        assert_eq!(eval("0.7 * fkdr + 0.3 * stars", &stats).unwrap(), 0.5);
    }

    #[test]
    fn test_unknown_variable_rejected() {
        let stats = NormalizedStats::uniform(0.5);
        assert_eq!(
            eval("fkdr + hacks", &stats),
            Err(FormulaError::UnknownVariable("hacks".to_string()))
        );
    }

    #[test]
    fn test_forbidden_character_rejected() {
        let stats = NormalizedStats::uniform(0.5);
        assert_eq!(
            eval("fkdr; 1", &stats),
            Err(FormulaError::ForbiddenCharacter(';'))
        );
        assert_eq!(
            eval("fkdr = 2", &stats),
            Err(FormulaError::ForbiddenCharacter('='))
        );
    }

    #[test]
    fn test_syntax_errors_are_typed() {
        let stats = NormalizedStats::uniform(0.5);
        assert!(matches!(
            eval("1 +", &stats),
            Err(FormulaError::UnexpectedEnd)
        ));
        assert!(matches!(
            eval("(1 + 2", &stats),
            Err(FormulaError::UnexpectedEnd)
        ));
        assert!(matches!(
            eval("1 2", &stats),
            Err(FormulaError::TrailingInput { .. })
        ));
        assert!(matches!(
            eval("1..2", &stats),
            Err(FormulaError::BadNumber { .. })
        ));
    }

    #[test]
    fn test_division_by_zero_is_non_finite() {
        let stats = NormalizedStats::uniform(0.5);
        assert_eq!(eval("1 / 0", &stats), Err(FormulaError::NonFinite));
        assert_eq!(eval("0 / 0", &stats), Err(FormulaError::NonFinite));
    }

    #[test]
    fn test_negative_substituted_values_stay_parenthesized() {
        // Substitution wraps values in parentheses, so `2 * x` with a
        // negative x cannot turn into `2 * -0.5 - ...` style ambiguity.
        let mut values = [0.5; StatKey::ALL.len()];
        values[StatKey::Fkdr.index()] = 0.25;
        let stats = NormalizedStats::new(values);
        assert_eq!(eval("2*fkdr", &stats).unwrap(), 0.5);
    }
}
