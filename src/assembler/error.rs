//! Errors recorded while assembling an LMSM program.
//!
//! Assembly never aborts with an error. Instead, the first (parsing) or the
//! most recent (code generation) problem is kept in a single slot that the
//! caller inspects once assembly has finished.
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AsmError {
    /// A token was expected to be a mnemonic and was not.
    UnknownInstruction,
    /// An operand-taking mnemonic was the last token of the source.
    ArgumentRequired,
    /// A label reference names no instruction in the program.
    BadLabel,
    /// A numeric literal fell outside -999..=999 and was clamped.
    OutOfRange,
    /// An instruction would be placed past the end of memory.
    CapacityExceeded,
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use AsmError::*;
        let msg = match self {
            UnknownInstruction => "Unknown instruction",
            ArgumentRequired   => "Argument Required",
            BadLabel           => "Bad Label",
            OutOfRange         => "Number is out of range",
            CapacityExceeded   => "Program exceeds memory capacity",
        };
        write!(f, "{}", msg)
    }
}

impl std::error::Error for AsmError {}

/// Update policies for the error slot shared by both assembly phases.
pub trait ErrorSlot {
    /// Records `err` only if nothing has been recorded yet. Used while parsing.
    fn set_if_absent(&mut self, err: AsmError);

    /// Records `err`, replacing whatever was there. Used during code generation.
    fn set_unconditional(&mut self, err: AsmError);
}

impl ErrorSlot for Option<AsmError> {
    fn set_if_absent(&mut self, err: AsmError) {
        if self.is_none() {
            *self = Some(err);
        }
    }

    fn set_unconditional(&mut self, err: AsmError) {
        *self = Some(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(AsmError::UnknownInstruction.to_string(), "Unknown instruction");
        assert_eq!(AsmError::ArgumentRequired.to_string(), "Argument Required");
        assert_eq!(AsmError::BadLabel.to_string(), "Bad Label");
        assert_eq!(AsmError::OutOfRange.to_string(), "Number is out of range");
        assert_eq!(AsmError::CapacityExceeded.to_string(), "Program exceeds memory capacity");
    }

    #[test]
    fn test_set_if_absent() {
        let mut slot: Option<AsmError> = None;
        slot.set_if_absent(AsmError::OutOfRange);
        slot.set_if_absent(AsmError::UnknownInstruction);
        assert_eq!(slot, Some(AsmError::OutOfRange));
    }

    #[test]
    fn test_set_unconditional() {
        let mut slot: Option<AsmError> = Some(AsmError::ArgumentRequired);
        slot.set_unconditional(AsmError::BadLabel);
        assert_eq!(slot, Some(AsmError::BadLabel));
        slot.set_unconditional(AsmError::CapacityExceeded);
        assert_eq!(slot, Some(AsmError::CapacityExceeded));
    }
}
