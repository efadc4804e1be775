//! The Assembler module is in charge of taking an
//! LMSM source file and producing the machine words
//! for it.
//!
//! It does this in two passes: the parser builds the
//! ordered instruction list with every offset known,
//! then the code generator resolves labels against
//! that list and writes each instruction into memory.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;

use ast::Instruction;
use error::AsmError;

/// Number of words in LMSM memory.
pub const DEFAULT_CAPACITY: usize = 200;

/// Everything produced by one assembly run.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CompilationResult {
    pub instructions: Vec<Instruction>,
    /// Memory image, one word per address. Unwritten words are zero.
    pub code: Vec<i32>,
    /// The parsing error (a terminal one outranks a clamped literal),
    /// unless code generation recorded one since.
    pub error: Option<AsmError>,
}

impl CompilationResult {
    /// Number of words the program occupies, limited to memory capacity.
    pub fn len(&self) -> usize {
        self.instructions.last()
            .map_or(0, Instruction::end)
            .min(self.code.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The words belonging to `ins`, as far as they fit in memory.
    pub fn words(&self, ins: &Instruction) -> &[i32] {
        let start = ins.offset.min(self.code.len());
        let end = ins.end().min(self.code.len());
        &self.code[start..end]
    }
}

/// Assembles `source` into a memory image of `DEFAULT_CAPACITY` words.
pub fn assemble(source: &str) -> CompilationResult {
    assemble_with_capacity(source, DEFAULT_CAPACITY)
}

/// Assembles `source` into a memory image of `capacity` words.
/// Code generation still runs when parsing stopped early, over the
/// instructions parsed up to that point.
pub fn assemble_with_capacity(source: &str, capacity: usize) -> CompilationResult {
    let (instructions, mut error) = parser::build(source);
    let mut code = vec![0; capacity];
    codegen::generate(&instructions, &mut code, &mut error);

    if let Some(e) = error {
        info!("Assembly finished with error: {}", e);
    }
    CompilationResult{instructions, code, error}
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::ast::{Mnemonic, Operand};

    #[test]
    fn test_assemble_program() {
        let result = assemble("
                   INP
                   STA  count
            loop   LDA  count
                   OUT
                   SUB  one
                   STA  count
                   BRP  loop
                   HLT
            one    DAT  1
            count  DAT  0
        ");
        assert_eq!(result.error, None);
        assert_eq!(result.code.len(), DEFAULT_CAPACITY);
        assert_eq!(result.len(), 10);
        assert_eq!(&result.code[..11], &[901, 309, 509, 902, 208, 309, 802, 0, 1, 0, 0][..]);
    }

    #[test]
    fn test_assemble_stack_program() {
        let result = assemble("
                   SPUSHI 3
                   CALL   square
                   SPOP
                   OUT
                   HLT
            square SDUP
                   SMUL
                   RET
        ");
        assert_eq!(result.error, None);
        assert_eq!(&result.code[..11], &[920, 403, 920, 408, 910, 921, 902, 0, 922, 927, 911][..]);

        let call = &result.instructions[1];
        assert_eq!(call.mnemonic, Mnemonic::CALL);
        assert_eq!(result.words(call), &[920, 408, 910][..]);
    }

    #[test]
    fn test_assemble_unknown() {
        let result = assemble("FOO");
        assert_eq!(result.error, Some(AsmError::UnknownInstruction));
        assert!(result.instructions.is_empty());
        assert!(result.is_empty());
        assert!(result.code.iter().all(|w| *w == 0));
    }

    #[test]
    fn test_assemble_argument_required() {
        let result = assemble("ADD");
        assert_eq!(result.error, Some(AsmError::ArgumentRequired));
        assert!(result.instructions.is_empty());
    }

    #[test]
    fn test_assemble_partial_list_is_generated() {
        let result = assemble("INP OUT BOGUS JUNK HLT");
        assert_eq!(result.error, Some(AsmError::UnknownInstruction));
        assert_eq!(&result.code[..3], &[901, 902, 0][..]);
    }

    #[test]
    fn test_assemble_clamping() {
        let result = assemble("DAT 1000");
        assert_eq!(result.error, Some(AsmError::OutOfRange));
        assert_eq!(result.code[0], 999);

        let result = assemble("DAT -1500");
        assert_eq!(result.error, Some(AsmError::OutOfRange));
        assert_eq!(result.code[0], -999);
        assert_eq!(result.instructions[0].operand, Some(Operand::Immediate(-999)));
    }

    #[test]
    fn test_assemble_missing_operand_after_clamp() {
        let result = assemble("DAT 5000 ADD");
        assert_eq!(result.error, Some(AsmError::ArgumentRequired));
        assert_eq!(result.instructions.len(), 1);
        assert_eq!(result.code[0], 999);
    }

    #[test]
    fn test_assemble_bad_label_replaces_parse_error() {
        let result = assemble("DAT 1000 BRA nowhere");
        assert_eq!(result.error, Some(AsmError::BadLabel));
        assert_eq!(&result.code[..2], &[999, 599][..]);
    }

    #[test]
    fn test_assemble_duplicate_labels() {
        let result = assemble("x DAT 1 x DAT 2 LDA x");
        assert_eq!(result.error, None);
        assert_eq!(result.code[2], 500);
    }

    #[test]
    fn test_assemble_with_capacity() {
        let result = assemble_with_capacity("INP OUT SPUSHI 5", 3);
        assert_eq!(result.error, Some(AsmError::CapacityExceeded));
        assert_eq!(result.code, vec![901, 902, 920]);
        assert_eq!(result.len(), 3);
        assert_eq!(result.words(&result.instructions[2]), &[920][..]);

        let result = assemble_with_capacity("", 0);
        assert_eq!(result.error, None);
        assert!(result.code.is_empty());
    }

    #[test]
    fn test_assemble_idempotent() {
        let source = "a LDA b BRA a b DAT 1000 CALL nowhere";
        assert_eq!(assemble(source), assemble(source));
    }
}
