//! Token rules for monitor expressions.
//!
//! The rules are regular expressions tried in order at each position; the
//! first one that matches wins, so `==` has to come before any rule that
//! could match a lone `=`. Hex literals come before decimal ones for the
//! same reason. Only tokenization lives here.

use regex::Regex;
use thiserror::Error;

/// A token of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Eq,
    Neq,
    And,
    /// Hex or decimal literal.
    Num(u32),
    /// `$name`, without the dollar sign.
    Reg(String),
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    Space,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Eq,
    Neq,
    And,
    Hex,
    Dec,
    Reg,
}

const RULES: &[(&str, Rule)] = &[
    (r"\s+", Rule::Space),
    (r"\+", Rule::Plus),
    (r"-", Rule::Minus),
    (r"\*", Rule::Star),
    (r"/", Rule::Slash),
    (r"\(", Rule::LParen),
    (r"\)", Rule::RParen),
    (r"==", Rule::Eq),
    (r"!=", Rule::Neq),
    (r"&&", Rule::And),
    (r"0[xX][0-9a-fA-F]+", Rule::Hex),
    (r"[0-9]+", Rule::Dec),
    (r"\$[A-Za-z0-9$]+", Rule::Reg),
];

/// Compiled token rules.
#[derive(Debug, Clone)]
pub struct ExprLexer {
    rules: Vec<(Regex, Rule)>,
}

impl ExprLexer {
    /// Compile every rule.
    pub fn new() -> Result<Self, ExprError> {
        let rules = RULES
            .iter()
            .map(|&(pattern, rule)| {
                Regex::new(&format!("^(?:{})", pattern))
                    .map(|re| (re, rule))
                    .map_err(|e| ExprError::BadRule {
                        pattern: pattern.to_string(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { rules })
    }

    /// Split `input` into tokens, dropping whitespace.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, ExprError> {
        let mut tokens = Vec::new();
        let mut position = 0;

        while position < input.len() {
            let rest = &input[position..];
            let Some((len, rule)) = self
                .rules
                .iter()
                .find_map(|(re, rule)| re.find(rest).map(|m| (m.end(), *rule)))
            else {
                return Err(ExprError::NoMatch {
                    position,
                    rest: rest.to_string(),
                });
            };

            let text = &rest[..len];
            let token = match rule {
                Rule::Space => None,
                Rule::Plus => Some(Token::Plus),
                Rule::Minus => Some(Token::Minus),
                Rule::Star => Some(Token::Star),
                Rule::Slash => Some(Token::Slash),
                Rule::LParen => Some(Token::LParen),
                Rule::RParen => Some(Token::RParen),
                Rule::Eq => Some(Token::Eq),
                Rule::Neq => Some(Token::Neq),
                Rule::And => Some(Token::And),
                Rule::Hex => Some(Token::Num(parse_num(&text[2..], 16, text)?)),
                Rule::Dec => Some(Token::Num(parse_num(text, 10, text)?)),
                Rule::Reg => Some(Token::Reg(text[1..].to_string())),
            };
            tokens.extend(token);
            position += len;
        }
        Ok(tokens)
    }
}

fn parse_num(digits: &str, radix: u32, text: &str) -> Result<u32, ExprError> {
    u32::from_str_radix(digits, radix).map_err(|_| ExprError::NumberTooLarge(text.to_string()))
}

/// Errors from compiling rules or tokenizing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("regex compilation failed for {pattern:?}: {message}")]
    BadRule { pattern: String, message: String },

    #[error("no match at position {position}: {rest:?}")]
    NoMatch { position: usize, rest: String },

    #[error("number {0} does not fit in 32 bits")]
    NumberTooLarge(String),
}
