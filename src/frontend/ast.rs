//! Abstract syntax tree for the mini language. Nodes are owned exclusively
//! by their parent; the tree is built bottom-up during parsing.

#[derive(Debug, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    /// 1-based source line of the statement's first token
    pub line: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum StatementKind {
    /// `int x;` or `float y;`
    Declaration { ty: PrimitiveType, name: String },
    /// `x = expression;`
    Assignment { target: String, value: Expression },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Int,
    Float,
}

impl core::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Int => "int",
            Self::Float => "float",
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Expression {
    NumberLiteral {
        /// Literal text as written; the presence of `.` distinguishes
        /// float-looking from int-looking literals
        text: String,
        line: usize,
    },
    Variable {
        name: String,
        line: usize,
    },
    Binary {
        lhs: Box<Expression>,
        operator: BinaryOperatorKind,
        rhs: Box<Expression>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperatorKind {
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
}

impl BinaryOperatorKind {
    /// Applies the operator to two constant operands. Division by zero has
    /// no defined result.
    pub fn apply(self, lhs: f64, rhs: f64) -> Option<f64> {
        match self {
            Self::Add => Some(lhs + rhs),
            Self::Subtract => Some(lhs - rhs),
            Self::Multiply => Some(lhs * rhs),
            Self::Divide => (rhs != 0.0).then(|| lhs / rhs),
        }
    }
}

impl core::fmt::Display for BinaryOperatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        })
    }
}

impl Expression {
    /// Fully parenthesized rendering, e.g. `(2 + (3 * 4))`. Makes operator
    /// precedence visible in the AST summary report.
    pub fn render(&self) -> String {
        match self {
            Self::NumberLiteral { text, .. } => text.clone(),
            Self::Variable { name, .. } => name.clone(),
            Self::Binary { lhs, operator, rhs } => {
                format!("({} {} {})", lhs.render(), operator, rhs.render())
            }
        }
    }
}

impl Statement {
    /// One-line summary used by the parse report, e.g. `Decl int x` or
    /// `Assign x = (2 + (3 * 4))`
    pub fn render(&self) -> String {
        match &self.kind {
            StatementKind::Declaration { ty, name } => format!("Decl {ty} {name}"),
            StatementKind::Assignment { target, value } => {
                format!("Assign {target} = {}", value.render())
            }
        }
    }
}
