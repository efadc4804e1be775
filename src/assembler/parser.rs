//! The Parser module takes a token stream from the lexer and builds the
//! ordered instruction list, assigning every instruction its memory offset.
//!
//! Labels carry no sigil, so a word is only a label when it is not a
//! mnemonic. The failure that stops parsing is the one it reports; a clamped
//! literal is only reported when parsing otherwise succeeds.
use std::collections::VecDeque;
use super::ast::*;
use super::error::{AsmError, ErrorSlot};
use super::lexer::{self, Kind, Token};

/// Largest magnitude an immediate operand may have.
pub const MAX_IMMEDIATE: i64 = 999;

pub struct Parser {
    tokens: VecDeque<Token>,
    instructions: Vec<Instruction>,
    error: Option<AsmError>,
}

/// Tokenizes and parses `source` in one go.
pub fn build(source: &str) -> (Vec<Instruction>, Option<AsmError>) {
    Parser::new(lexer::tokenize(source)).run()
}

impl Parser {
    pub fn new(tokens: VecDeque<Token>) -> Self {
        let capacity = tokens.len();
        Parser{tokens, instructions: Vec::with_capacity(capacity), error: None}
    }

    /// Run the parser, consuming itself and returning the instructions built
    /// so far together with the first error encountered, if any.
    /// Parsing stops at the first unknown instruction or missing operand;
    /// instructions appended before that point are kept. That failure is
    /// reported even when a literal was clamped earlier on.
    pub fn run(mut self) -> (Vec<Instruction>, Option<AsmError>) {
        'mainloop: loop {
            match self.instruction() {
                Ok(Some(ins)) => {
                    debug!("0x{:04X}: {}", ins.offset, ins);
                    self.instructions.push(ins);
                },
                Ok(None) => break 'mainloop,
                Err(e) => {
                    // A clamped literal does not hide the failure that stopped parsing.
                    if self.error == Some(AsmError::OutOfRange) {
                        self.error.set_unconditional(e);
                    } else {
                        self.error.set_if_absent(e);
                    }
                    break 'mainloop;
                },
            };
        }

        info!("Parsed {} instruction(s).", self.instructions.len());
        (self.instructions, self.error)
    }

    /// Consumes the tokens of one `[label] MNEMONIC [operand]` statement.
    fn instruction(&mut self) -> Result<Option<Instruction>, AsmError> {
        let mut cur_tok = match self.consume() {
            Some(tok) => tok,
            // No tokens left to parse means we're out of instructions.
            None => return Ok(None),
        };

        let mut label = None;
        if cur_tok.mnemonic().is_none() {
            let line = cur_tok.line;
            label = Some(cur_tok.text);
            cur_tok = match self.consume() {
                Some(tok) => tok,
                None => {
                    error!("expected an instruction after label on line {}, got EOF.", line);
                    return Err(AsmError::UnknownInstruction);
                },
            };
        }

        let mnemonic = match cur_tok.mnemonic() {
            Some(op) => op,
            None => {
                error!("unknown instruction `{}` on line {}", cur_tok.text, cur_tok.line);
                return Err(AsmError::UnknownInstruction);
            },
        };

        let operand = if mnemonic.requires_operand() {
            Some(self.operand(mnemonic, cur_tok.line)?)
        } else {
            None
        };

        Ok(Some(Instruction::new(mnemonic, label, operand, self.instructions.last())))
    }

    /// Reads the operand of `op`. Numbers become immediates (clamped into
    /// range, which is recorded but does not stop parsing); any other word
    /// is taken verbatim as a label reference.
    fn operand(&mut self, op: Mnemonic, line: usize) -> Result<Operand, AsmError> {
        let cur_tok = match self.consume() {
            Some(tok) => tok,
            None => {
                error!("{} on line {} expects an operand, got EOF.", op, line);
                return Err(AsmError::ArgumentRequired);
            },
        };

        match cur_tok.kind {
            Kind::Num(val) => Ok(Operand::Immediate(self.clamp(val, cur_tok.line))),
            Kind::Op(_) | Kind::Ident => Ok(Operand::Label(cur_tok.text)),
        }
    }

    fn clamp(&mut self, val: i64, line: usize) -> i32 {
        if (-MAX_IMMEDIATE..=MAX_IMMEDIATE).contains(&val) {
            return val as i32;
        }

        let clamped = val.max(-MAX_IMMEDIATE).min(MAX_IMMEDIATE);
        warn!("number {} on line {} is out of range, using {}", val, line, clamped);
        self.error.set_if_absent(AsmError::OutOfRange);
        clamped as i32
    }

    /// Pops a token off the input stream and returns it.
    /// Returns None if no tokens are left.
    #[inline]
    fn consume(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }
}
