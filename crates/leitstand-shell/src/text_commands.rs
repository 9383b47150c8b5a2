//! Text commands: analysis and arithmetic.

use leitstand_types::{Config, Outcome, Result};

use crate::command::Command;

// ---------------------------------------------------------------------------
// Analyse
// ---------------------------------------------------------------------------

/// Counts words and characters in the given text.
pub struct AnalyseCommand;

impl AnalyseCommand {
    pub fn build(_config: &Config) -> Result<Box<dyn Command>> {
        Ok(Box::new(Self))
    }
}

impl Command for AnalyseCommand {
    fn name(&self) -> &str {
        "Analyse"
    }

    fn description(&self) -> &str {
        "analyzes text (word and character count). Usage: Analyse:text"
    }

    fn execute(&self, value: &str) -> Result<Outcome> {
        if value.trim().is_empty() {
            return Ok(Outcome::error("no text to analyze"));
        }
        let words = value.split_whitespace().count();
        let chars = value.chars().count();
        Ok(Outcome::success(format!(
            "analysis: {words} words, {chars} characters",
        )))
    }
}

// ---------------------------------------------------------------------------
// Rechner
// ---------------------------------------------------------------------------

/// Evaluates an arithmetic expression.
///
/// Supports `+ - * / %`, unary minus, parentheses, and decimal numbers.
/// A deliberately small recursive-descent evaluator; no variables, no
/// functions, and definitely no `eval`.
pub struct RechnerCommand;

impl RechnerCommand {
    pub fn build(_config: &Config) -> Result<Box<dyn Command>> {
        Ok(Box::new(Self))
    }
}

impl Command for RechnerCommand {
    fn name(&self) -> &str {
        "Rechner"
    }

    fn description(&self) -> &str {
        "evaluates an arithmetic expression. Usage: Rechner:1+2*3"
    }

    fn execute(&self, value: &str) -> Result<Outcome> {
        let expr = value.trim();
        if expr.is_empty() {
            return Ok(Outcome::error("no expression given"));
        }
        match evaluate(expr) {
            Ok(result) => Ok(Outcome::success(format!("{expr} = {}", format_number(result)))),
            Err(msg) => Ok(Outcome::error(format!("evaluation failed: {msg}"))),
        }
    }
}

/// Render integral results without a trailing `.0`.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn evaluate(expr: &str) -> std::result::Result<f64, String> {
    let mut parser = Parser {
        chars: expr.chars().collect(),
        pos: 0,
    };
    let value = parser.expression()?;
    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(value),
        Some(c) => Err(format!("unexpected character '{c}'")),
    }
}

/// Grammar: expression = term (('+'|'-') term)*
///          term       = factor (('*'|'/'|'%') factor)*
///          factor     = '-' factor | '(' expression ')' | number
struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn expression(&mut self) -> std::result::Result<f64, String> {
        let mut value = self.term()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('+') => {
                    self.advance();
                    value += self.term()?;
                },
                Some('-') => {
                    self.advance();
                    value -= self.term()?;
                },
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> std::result::Result<f64, String> {
        let mut value = self.factor()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('*') => {
                    self.advance();
                    value *= self.factor()?;
                },
                Some('/') => {
                    self.advance();
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err("division by zero".to_string());
                    }
                    value /= divisor;
                },
                Some('%') => {
                    self.advance();
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err("division by zero".to_string());
                    }
                    value %= divisor;
                },
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> std::result::Result<f64, String> {
        self.skip_whitespace();
        match self.peek() {
            Some('-') => {
                self.advance();
                Ok(-self.factor()?)
            },
            Some('(') => {
                self.advance();
                let value = self.expression()?;
                self.skip_whitespace();
                if self.peek() == Some(')') {
                    self.advance();
                    Ok(value)
                } else {
                    Err("missing closing parenthesis".to_string())
                }
            },
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(format!("unexpected character '{c}'")),
            None => Err("unexpected end of expression".to_string()),
        }
    }

    fn number(&mut self) -> std::result::Result<f64, String> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.advance();
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>().map_err(|_| format!("invalid number '{text}'"))
    }
}
