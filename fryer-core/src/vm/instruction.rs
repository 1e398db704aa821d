//! Instruções decodificadas
//!
//! Cada variante de [`Operation`] corresponde a um grupo de [`Opcode`] e já
//! carrega os operandos tipados, validados pelo assembler.

use std::fmt;

use super::opcode::{BinaryOp, BranchOp, NullaryOp, Opcode, UnaryOp};
use super::state::Register;

/// Operação com operandos tipados
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Nullary(NullaryOp),
    Unary(UnaryOp, Register),
    Set(Register, i64),
    Binary(BinaryOp, Register, Register),
    Branch(BranchOp, Register, String),
    Goto(String),
    SetMode(i64),
    Sprint(i64),
}

impl Operation {
    /// Opcode correspondente
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Nullary(op) => Opcode::Nullary(*op),
            Self::Unary(op, _) => Opcode::Unary(*op),
            Self::Set(..) => Opcode::Set,
            Self::Binary(op, ..) => Opcode::Binary(*op),
            Self::Branch(op, ..) => Opcode::Branch(*op),
            Self::Goto(_) => Opcode::Goto,
            Self::SetMode(_) => Opcode::SetMode,
            Self::Sprint(_) => Opcode::Sprint,
        }
    }

    /// Label referenciado, se houver
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Branch(_, _, label) | Self::Goto(label) => Some(label),
            _ => None,
        }
    }
}

/// Instrução com a linha de origem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub operation: Operation,
    /// Linha no código fonte (1-based)
    pub line: usize,
}

impl Instruction {
    pub fn new(operation: Operation, line: usize) -> Self {
        Self { operation, line }
    }

    #[inline]
    pub fn opcode(&self) -> Opcode {
        self.operation.opcode()
    }

    #[inline]
    pub fn mnemonic(&self) -> &'static str {
        self.opcode().mnemonic()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.mnemonic();
        match &self.operation {
            Operation::Nullary(_) => write!(f, "{}", mnemonic),
            Operation::Unary(_, r) => write!(f, "{} {}", mnemonic, r),
            Operation::Set(r, n) => write!(f, "{} {}, {}", mnemonic, r, n),
            Operation::Binary(_, a, b) => write!(f, "{} {}, {}", mnemonic, a, b),
            Operation::Branch(_, r, label) => write!(f, "{} {}, {}", mnemonic, r, label),
            Operation::Goto(label) => write!(f, "{} {}", mnemonic, label),
            Operation::SetMode(n) | Operation::Sprint(n) => write!(f, "{} {}", mnemonic, n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let instr = Instruction::new(Operation::Binary(BinaryOp::Add, Register::R0, Register::R1), 1);
        assert_eq!(instr.to_string(), "ADD R0, R1");

        let instr = Instruction::new(Operation::Branch(BranchOp::DecJz, Register::Time, "end".into()), 2);
        assert_eq!(instr.to_string(), "DECJZ TIME, end");

        let instr = Instruction::new(Operation::Nullary(NullaryOp::Halt), 3);
        assert_eq!(instr.to_string(), "HALT");
    }

    #[test]
    fn test_opcode_and_label() {
        let goto = Operation::Goto("loop".into());
        assert_eq!(goto.opcode(), Opcode::Goto);
        assert_eq!(goto.label(), Some("loop"));
        assert_eq!(Operation::SetMode(2).label(), None);
    }
}
