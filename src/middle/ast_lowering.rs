//! Lowers the AST into three-address code plus the equivalent quadruples.

use super::tac::{Instruction, InstructionKind, Operand, Quadruple, QuadrupleOp};
use crate::frontend::{
    ast::{Expression, Program, StatementKind},
    resolve::SymbolTable,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    /// Nothing to lower (upstream parse failure)
    NoAst,
    /// Assignment to a variable missing from the symbol table. Semantic
    /// analysis already reports this; it is re-checked here after generation
    /// and the code is still emitted.
    UndeclaredTarget { name: String },
}

impl core::fmt::Display for IrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAst => write!(f, "No AST for IR generation."),
            Self::UndeclaredTarget { name } => {
                write!(f, "IR: cannot assign to undeclared variable '{name}'")
            }
        }
    }
}

#[derive(Debug)]
pub struct IrOutput {
    pub instructions: Vec<Instruction>,
    pub quadruples: Vec<Quadruple>,
    pub errors: Vec<IrError>,
}

#[derive(Debug)]
pub struct TacGenerator {
    instructions: Vec<Instruction>,
    quadruples: Vec<Quadruple>,
    next_temporary: u32,
}

impl TacGenerator {
    /// Emits TAC and quadruples for every assignment in the program.
    /// Declarations produce no code. Temporary numbering starts at `t1` and
    /// is strictly increasing within one call; every temporary is defined
    /// before any instruction that reads it.
    pub fn generate(program: Option<&Program>, symbol_table: &SymbolTable) -> IrOutput {
        let Some(program) = program else {
            return IrOutput {
                instructions: Vec::new(),
                quadruples: Vec::new(),
                errors: vec![IrError::NoAst],
            };
        };

        let mut generator = Self {
            instructions: Vec::new(),
            quadruples: Vec::new(),
            next_temporary: 1,
        };

        for statement in &program.statements {
            let StatementKind::Assignment { target, value } = &statement.kind else {
                continue;
            };

            let source = generator.lower_expression(value);
            let destination = Operand::Variable(target.clone());

            generator.instructions.push(Instruction {
                destination: destination.clone(),
                kind: InstructionKind::Copy {
                    source: source.clone(),
                },
            });
            generator.quadruples.push(Quadruple {
                operator: QuadrupleOp::Assign,
                first: source,
                second: None,
                result: destination,
            });
        }

        // Re-check assignment targets against the (read-only) symbol table.
        // The code above was still emitted for any offender.
        let errors = program
            .statements
            .iter()
            .filter_map(|statement| match &statement.kind {
                StatementKind::Assignment { target, .. } if !symbol_table.contains(target) => {
                    Some(IrError::UndeclaredTarget {
                        name: target.clone(),
                    })
                }
                _ => None,
            })
            .collect();

        IrOutput {
            instructions: generator.instructions,
            quadruples: generator.quadruples,
            errors,
        }
    }

    /// Post-order walk: literals and variables evaluate to their own
    /// operand without emitting code; each binary node gets a fresh
    /// temporary.
    fn lower_expression(&mut self, expression: &Expression) -> Operand {
        match expression {
            Expression::NumberLiteral { text, .. } => Operand::Literal(text.clone()),
            Expression::Variable { name, .. } => Operand::Variable(name.clone()),
            Expression::Binary { lhs, operator, rhs } => {
                let lhs = self.lower_expression(lhs);
                let rhs = self.lower_expression(rhs);
                let destination = self.new_temporary();

                self.instructions.push(Instruction {
                    destination: destination.clone(),
                    kind: InstructionKind::Binary {
                        lhs: lhs.clone(),
                        operator: *operator,
                        rhs: rhs.clone(),
                    },
                });
                self.quadruples.push(Quadruple {
                    operator: QuadrupleOp::Binary(*operator),
                    first: lhs,
                    second: Some(rhs),
                    result: destination.clone(),
                });

                destination
            }
        }
    }

    fn new_temporary(&mut self) -> Operand {
        let id = self.next_temporary;
        self.next_temporary += 1;

        Operand::Temporary(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{
        lexer::Lexer,
        parser::Parser,
        resolve::{self, SymbolTable},
    };

    fn lower(source: &str) -> IrOutput {
        let tokens = Lexer::tokenize(source).unwrap();
        let (program, errors) = Parser::parse_program(&tokens);
        assert_eq!(errors, vec![]);

        let analysis = resolve::analyze(program.as_ref());
        TacGenerator::generate(program.as_ref(), &analysis.symbol_table)
    }

    fn lines(output: &IrOutput) -> Vec<String> {
        output.instructions.iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn lowers_nested_expression_with_fresh_temporaries() {
        let output = lower("int x; x = 2 + 3 * 4;");

        assert_eq!(output.errors, vec![]);
        assert_eq!(lines(&output), vec!["t1 = 3 * 4", "t2 = 2 + t1", "x = t2"]);
    }

    #[test]
    fn emits_matching_quadruples() {
        let output = lower("int x; x = 2 + 3 * 4;");

        assert_eq!(output.quadruples.len(), 3);

        let assignment = &output.quadruples[2];
        assert_eq!(assignment.operator, QuadrupleOp::Assign);
        assert_eq!(assignment.first, Operand::Temporary(2));
        assert_eq!(assignment.second, None);
        assert_eq!(assignment.result, Operand::Variable("x".to_owned()));
    }

    #[test]
    fn declarations_produce_no_code() {
        let output = lower("int x; float y;");

        assert_eq!(output.instructions, vec![]);
        assert_eq!(output.quadruples, vec![]);
        assert_eq!(output.errors, vec![]);
    }

    #[test]
    fn temporary_numbering_is_strictly_increasing_across_statements() {
        let output = lower("int a; int b; a = 1 + 2; b = a * 3 + 4;");

        assert_eq!(
            lines(&output),
            vec![
                "t1 = 1 + 2",
                "a = t1",
                "t2 = a * 3",
                "t3 = t2 + 4",
                "b = t3",
            ]
        );
    }

    #[test]
    fn undeclared_target_still_emits_code_but_records_an_error() {
        let output = lower("y = 1;");

        assert_eq!(lines(&output), vec!["y = 1"]);
        assert_eq!(
            output.errors,
            vec![IrError::UndeclaredTarget {
                name: "y".to_owned(),
            }]
        );
    }

    #[test]
    fn missing_ast_short_circuits() {
        let output = TacGenerator::generate(None, &SymbolTable::new());

        assert_eq!(output.instructions, vec![]);
        assert_eq!(output.quadruples, vec![]);
        assert_eq!(output.errors, vec![IrError::NoAst]);
    }
}
