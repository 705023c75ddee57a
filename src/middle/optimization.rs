//! TAC optimization passes: constant folding followed by dead temporary
//! elimination over the already-folded instructions.

use hashbrown::HashSet;

use super::tac::{Instruction, InstructionKind, Operand};

#[derive(Debug)]
pub struct Optimization {
    /// After constant folding
    pub folded: Vec<Instruction>,
    /// After dead temporary elimination, applied to the folded instructions
    pub cleaned: Vec<Instruction>,
}

pub fn optimize(instructions: &[Instruction]) -> Optimization {
    let folded = fold_constants(instructions);
    let cleaned = eliminate_dead_temporaries(&folded);

    Optimization { folded, cleaned }
}

/// Replaces `temporary = literal op literal` with the precomputed result.
/// Folding never propagates through a variable or another temporary's value,
/// so anything other than that exact shape passes through unchanged. Division
/// by a zero literal has an undefined result and the instruction is left
/// unfolded rather than faulted.
fn fold_constants(instructions: &[Instruction]) -> Vec<Instruction> {
    instructions
        .iter()
        .map(|instruction| fold_instruction(instruction).unwrap_or_else(|| instruction.clone()))
        .collect()
}

fn fold_instruction(instruction: &Instruction) -> Option<Instruction> {
    let Instruction {
        destination: destination @ Operand::Temporary(_),
        kind:
            InstructionKind::Binary {
                lhs: Operand::Literal(lhs),
                operator,
                rhs: Operand::Literal(rhs),
            },
    } = instruction
    else {
        return None;
    };

    let lhs: f64 = lhs.parse().ok()?;
    let rhs: f64 = rhs.parse().ok()?;

    let value = operator.apply(lhs, rhs)?;

    if !value.is_finite() {
        return None;
    }

    Some(Instruction {
        destination: destination.clone(),
        kind: InstructionKind::Copy {
            source: Operand::Literal(render_constant(value)),
        },
    })
}

/// A result within floating-point rounding distance of an integer is
/// rendered as an integer literal; everything else keeps its natural decimal
/// representation.
fn render_constant(value: f64) -> String {
    let rounded = value.round();

    // The `as i64` cast saturates, so results beyond the i64 range take the
    // decimal path (which renders whole numbers without a fraction anyway)
    if (value - rounded).abs() < 1e-10 && rounded.abs() < 2f64.powi(63) {
        format!("{}", rounded as i64)
    } else {
        value.to_string()
    }
}

/// Drops instructions whose destination is a temporary that no instruction
/// reads. The live set comes from a single global scan over all right-hand
/// sides: deliberately non-iterative, so a temporary made dead by another's
/// removal is not detected.
fn eliminate_dead_temporaries(instructions: &[Instruction]) -> Vec<Instruction> {
    let mut live = HashSet::new();

    for instruction in instructions {
        match &instruction.kind {
            InstructionKind::Copy { source } => {
                mark_live(&mut live, source);
            }
            InstructionKind::Binary { lhs, rhs, .. } => {
                mark_live(&mut live, lhs);
                mark_live(&mut live, rhs);
            }
        }
    }

    instructions
        .iter()
        .filter(|instruction| match instruction.destination {
            // variable assignments are always kept
            Operand::Temporary(id) => live.contains(&id),
            _ => true,
        })
        .cloned()
        .collect()
}

fn mark_live(live: &mut HashSet<u32>, operand: &Operand) {
    if let Operand::Temporary(id) = operand {
        live.insert(*id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::BinaryOperatorKind;

    fn temp(id: u32) -> Operand {
        Operand::Temporary(id)
    }

    fn lit(text: &str) -> Operand {
        Operand::Literal(text.to_owned())
    }

    fn var(name: &str) -> Operand {
        Operand::Variable(name.to_owned())
    }

    fn binary(destination: Operand, lhs: Operand, op: BinaryOperatorKind, rhs: Operand) -> Instruction {
        Instruction {
            destination,
            kind: InstructionKind::Binary {
                lhs,
                operator: op,
                rhs,
            },
        }
    }

    fn copy(destination: Operand, source: Operand) -> Instruction {
        Instruction {
            destination,
            kind: InstructionKind::Copy { source },
        }
    }

    fn render(instructions: &[Instruction]) -> Vec<String> {
        instructions.iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn folds_literal_operations_only() {
        let instructions = vec![
            binary(temp(1), lit("3"), BinaryOperatorKind::Multiply, lit("4")),
            binary(temp(2), lit("2"), BinaryOperatorKind::Add, temp(1)),
            copy(var("x"), temp(2)),
        ];

        let result = optimize(&instructions);

        // t2 keeps its operation: one operand is a temporary, not a literal
        assert_eq!(
            render(&result.folded),
            vec!["t1 = 12", "t2 = 2 + t1", "x = t2"]
        );
        // both temporaries are referenced downstream, so nothing is dropped
        assert_eq!(render(&result.cleaned), render(&result.folded));
    }

    #[test]
    fn never_folds_variable_operands() {
        let instructions = vec![binary(
            temp(1),
            var("a"),
            BinaryOperatorKind::Add,
            lit("1"),
        )];

        let folded = fold_constants(&instructions);

        assert_eq!(folded, instructions);
    }

    #[test]
    fn division_by_zero_literal_is_left_unfolded() {
        let instructions = vec![
            binary(temp(1), lit("5"), BinaryOperatorKind::Divide, lit("0")),
            copy(var("a"), temp(1)),
        ];

        let result = optimize(&instructions);

        assert_eq!(render(&result.folded), vec!["t1 = 5 / 0", "a = t1"]);
        assert_eq!(render(&result.cleaned), vec!["t1 = 5 / 0", "a = t1"]);
    }

    #[test]
    fn near_integer_results_render_as_integers() {
        let instructions = vec![
            binary(temp(1), lit("0.5"), BinaryOperatorKind::Add, lit("0.5")),
            binary(temp(2), lit("5"), BinaryOperatorKind::Divide, lit("2")),
        ];

        let folded = fold_constants(&instructions);

        assert_eq!(folded[0].to_string(), "t1 = 1");
        assert_eq!(folded[1].to_string(), "t2 = 2.5");
    }

    #[test]
    fn results_beyond_the_i64_range_render_exactly() {
        let instructions = vec![binary(
            temp(1),
            lit("99999999999999999999"),
            BinaryOperatorKind::Multiply,
            lit("1"),
        )];

        let folded = fold_constants(&instructions);

        assert_eq!(folded[0].to_string(), "t1 = 100000000000000000000");
    }

    #[test]
    fn folding_is_idempotent() {
        let instructions = vec![
            binary(temp(1), lit("3"), BinaryOperatorKind::Multiply, lit("4")),
            copy(var("x"), temp(1)),
        ];

        let once = fold_constants(&instructions);
        let twice = fold_constants(&once);

        // `t1 = 12` has no operator left, so re-folding leaves it unchanged
        assert_eq!(once, twice);
    }

    #[test]
    fn unreferenced_temporaries_are_dropped() {
        let instructions = vec![
            binary(temp(1), lit("1"), BinaryOperatorKind::Add, lit("2")),
            copy(var("x"), lit("5")),
        ];

        let result = optimize(&instructions);

        // t1 folded to `t1 = 3` but nothing reads it
        assert_eq!(render(&result.cleaned), vec!["x = 5"]);
    }

    #[test]
    fn variable_destinations_are_never_removed() {
        let instructions = vec![copy(var("x"), lit("1")), copy(var("y"), lit("2"))];

        let result = optimize(&instructions);

        assert_eq!(result.cleaned, instructions);
    }

    #[test]
    fn elimination_is_not_transitive() {
        // t2 is dead; removing it makes t1 unreferenced, but second-order
        // deadness is not detected by the single scan
        let instructions = vec![
            binary(temp(1), var("a"), BinaryOperatorKind::Add, lit("1")),
            binary(temp(2), temp(1), BinaryOperatorKind::Multiply, lit("2")),
            copy(var("x"), lit("0")),
        ];

        let result = optimize(&instructions);

        assert_eq!(render(&result.cleaned), vec!["t1 = a + 1", "x = 0"]);
    }

    #[test]
    fn empty_input_stays_empty() {
        let result = optimize(&[]);

        assert_eq!(result.folded, vec![]);
        assert_eq!(result.cleaned, vec![]);
    }
}
