use hashbrown::HashMap;

use super::ast::{Expression, PrimitiveType, Program, Statement, StatementKind};

/// Maps variable names to their declaration. Insertion order is preserved
/// for display purposes only.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub ty: PrimitiveType,
    pub declared_line: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|i| &self.symbols[*i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Explicit check-before-insert: duplicates are rejected, not
    /// overwritten, so the first declaration's line survives for error
    /// messages. Returns the previously recorded symbol on conflict.
    pub fn declare(&mut self, symbol: Symbol) -> Result<(), &Symbol> {
        if let Some(existing) = self.index.get(&symbol.name) {
            return Err(&self.symbols[*existing]);
        }

        self.index.insert(symbol.name.clone(), self.symbols.len());
        self.symbols.push(symbol);

        Ok(())
    }

    /// Symbols in insertion (declaration) order
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// Nothing to analyze (upstream parse failure)
    NoAst,
    MultipleDeclaration {
        name: String,
        line: usize,
        previous_line: usize,
    },
    UndeclaredAssignmentTarget { name: String, line: usize },
    UndeclaredInExpression { name: String, line: usize },
}

impl core::fmt::Display for SemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAst => write!(f, "No AST (parsing failed)."),
            Self::MultipleDeclaration {
                name,
                line,
                previous_line,
            } => write!(
                f,
                "Multiple declaration of '{name}' at line {line} (previous at line {previous_line})."
            ),
            Self::UndeclaredAssignmentTarget { name, line } => {
                write!(f, "Undeclared variable '{name}' used on left side at line {line}.")
            }
            Self::UndeclaredInExpression { name, line } => {
                write!(f, "Undeclared variable '{name}' used in expression at line {line}.")
            }
        }
    }
}

#[derive(Debug)]
pub struct SemanticAnalysis {
    pub symbol_table: SymbolTable,
    pub errors: Vec<SemanticError>,
    pub notes: Vec<String>,
}

#[derive(Debug)]
struct Analyzer {
    symbol_table: SymbolTable,
    errors: Vec<SemanticError>,
}

/// Walks the AST in program order, building the symbol table and reporting
/// declaration/usage errors. No type-compatibility checking is performed
/// beyond declaration/use existence.
pub fn analyze(program: Option<&Program>) -> SemanticAnalysis {
    let mut analyzer = Analyzer {
        symbol_table: SymbolTable::new(),
        errors: Vec::new(),
    };

    let Some(program) = program else {
        return SemanticAnalysis {
            symbol_table: analyzer.symbol_table,
            errors: vec![SemanticError::NoAst],
            notes: Vec::new(),
        };
    };

    for statement in &program.statements {
        analyzer.check_statement(statement);
    }

    let mut notes = Vec::new();

    if analyzer.errors.is_empty() {
        notes.push("All identifiers are declared before use.".to_owned());
    }

    SemanticAnalysis {
        symbol_table: analyzer.symbol_table,
        errors: analyzer.errors,
        notes,
    }
}

impl Analyzer {
    fn check_statement(&mut self, statement: &Statement) {
        match &statement.kind {
            StatementKind::Declaration { ty, name } => {
                let symbol = Symbol {
                    name: name.clone(),
                    ty: *ty,
                    declared_line: statement.line,
                };

                if let Err(previous) = self.symbol_table.declare(symbol) {
                    let previous_line = previous.declared_line;

                    self.errors.push(SemanticError::MultipleDeclaration {
                        name: name.clone(),
                        line: statement.line,
                        previous_line,
                    });
                }
            }
            StatementKind::Assignment { target, value } => {
                if !self.symbol_table.contains(target) {
                    self.errors.push(SemanticError::UndeclaredAssignmentTarget {
                        name: target.clone(),
                        line: statement.line,
                    });
                }

                self.check_expression(value);
            }
        }
    }

    /// Pre-order traversal; number literals contribute nothing
    fn check_expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Variable { name, line } => {
                if !self.symbol_table.contains(name) {
                    self.errors.push(SemanticError::UndeclaredInExpression {
                        name: name.clone(),
                        line: *line,
                    });
                }
            }
            Expression::Binary { lhs, rhs, .. } => {
                self.check_expression(lhs);
                self.check_expression(rhs);
            }
            Expression::NumberLiteral { .. } => {}
        }
    }
}
