//! Code generation: walks a finished instruction list and writes each
//! instruction's words into memory at its offset.
//!
//! Errors here never stop generation. Each one replaces whatever error was
//! recorded before it, so the caller sees the most recent problem.
use std::convert::TryFrom;

use super::ast::*;
use super::error::{AsmError, ErrorSlot};

/// Operand value used when a label reference cannot be resolved.
pub const LABEL_NOT_FOUND: i32 = -1;

/// Returns the offset of the first instruction defining `label`.
/// References may point forwards or backwards, so the whole list is scanned.
pub fn find_label(instructions: &[Instruction], label: &str) -> Option<usize> {
    instructions.iter()
        .find(|ins| ins.label.as_deref() == Some(label))
        .map(|ins| ins.offset)
}

/// Fills `code` with the machine words for `instructions`.
/// Words that would land past the end of `code` are dropped.
pub fn generate(instructions: &[Instruction], code: &mut [i32], error: &mut Option<AsmError>) {
    for ins in instructions.iter() {
        let operand = resolve(instructions, ins, error);

        for (idx, word) in ins.assemble(operand).into_iter().enumerate() {
            let address = ins.offset + idx;
            match code.get_mut(address) {
                Some(slot) => *slot = word,
                None => {
                    warn!("`{}` does not fit in memory: address {} is past the last word ({})",
                        ins, address, code.len().saturating_sub(1));
                    error.set_unconditional(AsmError::CapacityExceeded);
                },
            }
        }
    }
}

/// The numeric operand of `ins`: its label's offset, its immediate, or 0.
fn resolve(instructions: &[Instruction], ins: &Instruction, error: &mut Option<AsmError>) -> i32 {
    match &ins.operand {
        Some(Operand::Immediate(val)) => *val,
        Some(Operand::Label(name)) => match find_label(instructions, name) {
            Some(offset) => match i32::try_from(offset) {
                Ok(operand) => operand,
                Err(_) => {
                    warn!("`{}` at 0x{:04X} references label `{}` at an unaddressable offset {}",
                        ins, ins.offset, name, offset);
                    error.set_unconditional(AsmError::CapacityExceeded);
                    LABEL_NOT_FOUND
                },
            },
            None => {
                warn!("`{}` at 0x{:04X} references undefined label `{}`", ins, ins.offset, name);
                error.set_unconditional(AsmError::BadLabel);
                LABEL_NOT_FOUND
            },
        },
        None => 0,
    }
}
