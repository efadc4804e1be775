//! This lexer tokenizes LMSM assembly.
use std::collections::VecDeque;
use std::num::IntErrorKind;
use std::str::FromStr;

use regex::Regex;

use super::ast::Mnemonic;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Kind {
    Op(Mnemonic),
    Num(i64),
    /// Anything else: a label definition or a label reference,
    /// depending on where it appears.
    Ident,
}

/// Tokens keep their source text because labels are not distinguishable
/// from other words until the parser sees where they appear.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: Kind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(text: &str, line: usize, literal: &Regex) -> Self {
        let kind = if let Ok(op) = Mnemonic::from_str(text) {
            Kind::Op(op)
        } else if literal.is_match(text) {
            Kind::Num(literal_value(text))
        } else {
            Kind::Ident
        };
        Token{kind, text: text.to_owned(), line}
    }

    #[inline]
    pub fn mnemonic(&self) -> Option<Mnemonic> {
        match self.kind {
            Kind::Op(op) => Some(op),
            _ => None,
        }
    }
}

/// Pattern for decimal literals: an optional minus sign followed by digits.
pub fn literal_pattern() -> Regex {
    Regex::new(r"^-?[0-9]*$").expect("literal pattern is a valid regex")
}

/// Splits the source on whitespace. Line numbers start at 1.
pub fn tokenize(source: &str) -> VecDeque<Token> {
    let literal = literal_pattern();
    let mut tokens: VecDeque<Token> = VecDeque::with_capacity(256);

    for (index, line) in source.lines().enumerate() {
        for word in line.split_whitespace() {
            tokens.push_back(Token::new(word, index + 1, &literal));
        }
    }

    debug!("Tokenized {} word(s).", tokens.len());
    tokens
}

/// Converts a token already matched as a literal into its value.
/// Values too wide for 64 bits saturate; a lone `-` reads as zero.
fn literal_value(text: &str) -> i64 {
    match text.parse::<i64>() {
        Ok(val) => val,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => 0,
        },
    }
}
