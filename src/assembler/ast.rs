//! This AST describes a parsed LMSM program.
//!
//! Execution begins with the first instruction in the file.
//! Tokens are separated by whitespace; line breaks carry no meaning, so a
//! statement is simply `[label] MNEMONIC [operand]`.
//!
//! Supported Instructions:
//!
//! ```nasm
//! ADD  x    ; ACC <= ACC + MEM[x]
//! SUB  x    ; ACC <= ACC - MEM[x]
//! STA  x    ; MEM[x] <= ACC
//! LDI  n    ; ACC <= n
//! LDA  x    ; ACC <= MEM[x]
//! BRA  x    ; PC <= x
//! BRZ  x    ; PC <= x if ACC is zero
//! BRP  x    ; PC <= x if ACC is zero or positive
//! INP       ; ACC <= input
//! OUT       ; output <= ACC
//! HLT       ; halt (COB is an alias)
//! DAT  n    ; raw data word
//! CALL fn   ; push the address of fn and jump to it (three words)
//! RET       ; return from a call
//! SPUSH     ; push ACC onto the stack
//! SPUSHI n  ; push n onto the stack (two words)
//! SPOP      ; pop the stack into ACC
//! SDUP      ; duplicate the top of the stack
//! SADD SSUB SMAX SMIN SMUL SDIV ; binary stack operations
//! ```
//!
//! Example source file:
//!
//! ```nasm
//!        INP
//!        STA  count
//! loop   LDA  count
//!        OUT
//!        SUB  one
//!        STA  count
//!        BRP  loop
//!        HLT
//! one    DAT  1
//! count  DAT  0
//! ```

use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Mnemonic {
    ADD,
    SUB,
    LDA,
    STA,
    BRA,
    BRZ,
    BRP,
    INP,
    OUT,
    HLT,
    COB,
    DAT,
    LDI,
    CALL,
    RET,
    SPUSH,
    SPUSHI,
    SPOP,
    SDUP,
    SADD,
    SSUB,
    SMAX,
    SMIN,
    SMUL,
    SDIV,
}

/// Every recognized mnemonic, in table order.
pub const MNEMONICS: [Mnemonic; 25] = {
    use Mnemonic::*;
    [
        ADD, SUB, LDA, STA, BRA, BRZ, BRP, INP, OUT, HLT, COB, DAT,
        LDI,
        CALL, RET,
        SPUSH, SPUSHI, SPOP, SDUP, SADD, SSUB, SMAX, SMIN, SMUL, SDIV,
    ]
};

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for Mnemonic {
    type Err = String;

    /// Mnemonics are case-sensitive: `add` is not `ADD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MNEMONICS.iter()
            .find(|m| m.to_string() == s)
            .copied()
            .ok_or_else(|| format!("`{}` is not an LMSM instruction", s))
    }
}

impl Mnemonic {
    /// Whether the mnemonic must be followed by an operand token.
    pub fn requires_operand(&self) -> bool {
        use Mnemonic::*;
        match self {
            ADD | SUB | LDA | STA |
            BRA | BRZ | BRP | DAT |
            LDI | CALL | SPUSHI     => true,

            INP | OUT | HLT | COB |
            RET | SPUSH | SPOP | SDUP |
            SADD | SSUB | SMAX | SMIN |
            SMUL | SDIV             => false,
        }
    }

    /// Number of memory words the instruction occupies.
    pub fn width(&self) -> usize {
        match self {
            Mnemonic::SPUSHI => 2,
            Mnemonic::CALL   => 3,
            _                => 1,
        }
    }

    /// Encodes the instruction into machine words, given its resolved operand.
    /// Operand-less mnemonics ignore `operand`.
    pub fn encode(&self, operand: i32) -> Vec<i32> {
        use Mnemonic::*;
        match self {
            ADD  => vec![100 + operand],
            SUB  => vec![200 + operand],
            STA  => vec![300 + operand],
            LDI  => vec![400 + operand],
            LDA  => vec![500 + operand],
            BRA  => vec![600 + operand],
            BRZ  => vec![700 + operand],
            BRP  => vec![800 + operand],
            INP  => vec![901],
            OUT  => vec![902],
            HLT |
            COB  => vec![0],
            DAT  => vec![operand],
            // Push the return address, load the target, then jump to it.
            CALL => vec![920, 400 + operand, 910],
            RET  => vec![911],
            SPUSH  => vec![920],
            SPUSHI => vec![920, 400 + operand],
            SPOP => vec![921],
            SDUP => vec![922],
            SADD => vec![923],
            SSUB => vec![924],
            SMAX => vec![925],
            SMIN => vec![926],
            SMUL => vec![927],
            SDIV => vec![928],
        }
    }
}

/// The argument of an operand-taking instruction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Operand {
    /// A numeric literal, already clamped to -999..=999.
    Immediate(i32),
    /// The name of a label defined somewhere in the program.
    Label(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Immediate(v) => write!(f, "{}", v),
            Operand::Label(name)  => write!(f, "{}", name),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    /// The label this instruction defines, if any.
    pub label: Option<String>,
    pub operand: Option<Operand>,
    /// Address of the first word this instruction emits.
    pub offset: usize,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "{} ", label)?;
        }
        write!(f, "{}", self.mnemonic)?;
        if let Some(operand) = &self.operand {
            write!(f, " {}", operand)?;
        }
        Ok(())
    }
}

impl Instruction {
    /// Creates an instruction placed directly after `predecessor`,
    /// or at address 0 when it is the first of the program.
    pub fn new(mnemonic: Mnemonic, label: Option<String>, operand: Option<Operand>,
               predecessor: Option<&Instruction>) -> Self {
        let offset = predecessor.map_or(0, Instruction::end);
        Instruction{mnemonic, label, operand, offset}
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.mnemonic.width()
    }

    /// The address just past the last word of this instruction.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.width()
    }

    /// Assembles the instruction with an already resolved operand value.
    pub fn assemble(&self, operand: i32) -> Vec<i32> {
        self.mnemonic.encode(operand)
    }
}
