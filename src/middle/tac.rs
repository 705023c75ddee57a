//! Three-address code and its quadruple form. Each instruction computes at
//! most one operation with at most two source operands and one destination.

use crate::frontend::ast::BinaryOperatorKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Numeric literal, kept in its textual form
    Literal(String),
    /// User-declared variable
    Variable(String),
    /// Compiler-generated temporary (`t1`, `t2`, ...), never written by user
    /// code and assigned at exactly one point
    Temporary(u32),
}

impl core::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(text) => f.pad(text),
            Self::Variable(name) => f.pad(name),
            Self::Temporary(id) => f.pad(&format!("t{id}")),
        }
    }
}

/// `dest = src` or `dest = lhs op rhs`. The destination is always a variable
/// or a temporary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub destination: Operand,
    pub kind: InstructionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionKind {
    Copy {
        source: Operand,
    },
    Binary {
        lhs: Operand,
        operator: BinaryOperatorKind,
        rhs: Operand,
    },
}

impl core::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            InstructionKind::Copy { source } => {
                write!(f, "{} = {}", self.destination, source)
            }
            InstructionKind::Binary { lhs, operator, rhs } => {
                write!(f, "{} = {} {} {}", self.destination, lhs, operator, rhs)
            }
        }
    }
}

/// Structured counterpart to one TAC instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quadruple {
    pub operator: QuadrupleOp,
    pub first: Operand,
    /// Empty for plain assignment
    pub second: Option<Operand>,
    pub result: Operand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadrupleOp {
    Binary(BinaryOperatorKind),
    Assign,
}

impl core::fmt::Display for QuadrupleOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Binary(operator) => operator.fmt(f),
            Self::Assign => f.pad("="),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_render_as_three_address_lines() {
        let binary = Instruction {
            destination: Operand::Temporary(1),
            kind: InstructionKind::Binary {
                lhs: Operand::Literal("3".to_owned()),
                operator: BinaryOperatorKind::Multiply,
                rhs: Operand::Literal("4".to_owned()),
            },
        };
        let copy = Instruction {
            destination: Operand::Variable("x".to_owned()),
            kind: InstructionKind::Copy {
                source: Operand::Temporary(2),
            },
        };

        assert_eq!(binary.to_string(), "t1 = 3 * 4");
        assert_eq!(copy.to_string(), "x = t2");
    }
}
