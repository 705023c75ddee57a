use super::{
    ast::{BinaryOperatorKind, Expression, PrimitiveType, Program, Statement, StatementKind},
    lexer::{Keyword, Token, TokenKind},
};

/// Recursive descent parser with one token of lookahead.
///
/// Grammar:
///
/// ```text
/// program     -> statement* EOF
/// statement   -> declaration | assignment
/// declaration -> ('int'|'float') ID ';'
/// assignment  -> ID '=' expression ';'
/// expression  -> term (('+'|'-') term)*
/// term        -> factor (('*'|'/') factor)*
/// factor      -> NUM | ID | '(' expression ')'
/// ```
///
/// Recovery is a single-token skip: an expected-token mismatch records a
/// diagnostic and advances the cursor by one token, which can produce
/// cascading diagnostics on deeply malformed input but always terminates.
#[derive(Debug)]
pub struct Parser<'tokens> {
    tokens: &'tokens [Token],
    position: usize,
    errors: Vec<SyntaxError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// Nothing to parse (upstream lexical failure)
    NoTokens,
    ExpectedToken {
        expected: TokenKind,
        found: TokenKind,
        line: usize,
    },
    /// Token that cannot begin a statement
    UnexpectedToken { found: TokenKind, line: usize },
    /// Token that cannot appear in factor position
    InvalidFactor { found: TokenKind, line: usize },
}

impl core::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTokens => write!(f, "No tokens to parse (lexical analysis failed)"),
            Self::ExpectedToken {
                expected,
                found,
                line,
            } => write!(f, "Expected {expected} but found {found} at line {line}"),
            Self::UnexpectedToken { found, line } => {
                write!(f, "Unexpected token {found} at line {line}")
            }
            Self::InvalidFactor { found, line } => {
                write!(f, "Invalid factor at line {line} (found {found})")
            }
        }
    }
}

impl<'tokens> Parser<'tokens> {
    /// Parses a whole token sequence. If the error list is empty the tree is
    /// fully formed; otherwise it may be partially present and must not be
    /// trusted by later stages. An empty token sequence yields no tree at
    /// all, with a single diagnostic.
    pub fn parse_program(tokens: &'tokens [Token]) -> (Option<Program>, Vec<SyntaxError>) {
        if tokens.is_empty() {
            return (None, vec![SyntaxError::NoTokens]);
        }

        let mut parser = Self {
            tokens,
            position: 0,
            errors: Vec::new(),
        };

        let mut statements = Vec::new();

        while parser.current().kind != TokenKind::EndOfInput {
            if let Some(statement) = parser.parse_statement() {
                statements.push(statement);
            }
        }

        (Some(Program { statements }), parser.errors)
    }

    fn current(&self) -> &Token {
        // The cursor is clamped to the final end-of-input token so recovery
        // can never run past the stream
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        self.position = (self.position + 1).min(self.tokens.len() - 1);
    }

    /// Consumes the current token if it matches, otherwise records a
    /// diagnostic and skips it. The (possibly wrong) token is returned either
    /// way so construction can proceed structurally.
    fn eat(&mut self, expected: TokenKind) -> Token {
        let token = self.current().clone();

        if token.kind != expected {
            self.errors.push(SyntaxError::ExpectedToken {
                expected,
                found: token.kind,
                line: token.line,
            });
        }

        self.advance();
        token
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        let token = self.current().clone();

        match token.kind {
            TokenKind::Keyword(keyword) => Some(self.parse_declaration(keyword)),
            TokenKind::Identifier => Some(self.parse_assignment()),
            found => {
                self.errors.push(SyntaxError::UnexpectedToken {
                    found,
                    line: token.line,
                });
                self.advance();
                None
            }
        }
    }

    /// ('int'|'float') ID ';'
    fn parse_declaration(&mut self, keyword: Keyword) -> Statement {
        let line = self.current().line;
        self.advance();

        let name = self.eat(TokenKind::Identifier).text;
        self.eat(TokenKind::Semicolon);

        let ty = match keyword {
            Keyword::Int => PrimitiveType::Int,
            Keyword::Float => PrimitiveType::Float,
        };

        Statement {
            kind: StatementKind::Declaration { ty, name },
            line,
        }
    }

    /// ID '=' expression ';'
    fn parse_assignment(&mut self) -> Statement {
        let target = self.eat(TokenKind::Identifier);
        self.eat(TokenKind::Assign);

        let value = self.parse_expression();
        self.eat(TokenKind::Semicolon);

        Statement {
            line: target.line,
            kind: StatementKind::Assignment {
                target: target.text,
                value,
            },
        }
    }

    /// term (('+'|'-') term)*
    fn parse_expression(&mut self) -> Expression {
        let mut expression = self.parse_term();

        loop {
            let operator = match self.current().kind {
                TokenKind::Plus => BinaryOperatorKind::Add,
                TokenKind::Minus => BinaryOperatorKind::Subtract,
                _ => break,
            };
            self.advance();

            let rhs = self.parse_term();

            expression = Expression::Binary {
                lhs: Box::new(expression),
                operator,
                rhs: Box::new(rhs),
            };
        }

        expression
    }

    /// factor (('*'|'/') factor)*
    fn parse_term(&mut self) -> Expression {
        let mut expression = self.parse_factor();

        loop {
            let operator = match self.current().kind {
                TokenKind::Star => BinaryOperatorKind::Multiply,
                TokenKind::Slash => BinaryOperatorKind::Divide,
                _ => break,
            };
            self.advance();

            let rhs = self.parse_factor();

            expression = Expression::Binary {
                lhs: Box::new(expression),
                operator,
                rhs: Box::new(rhs),
            };
        }

        expression
    }

    /// NUM | ID | '(' expression ')'
    ///
    /// An invalid factor position is reported and a literal zero node is
    /// synthesized in its place so expression construction can proceed.
    fn parse_factor(&mut self) -> Expression {
        let token = self.current().clone();

        match token.kind {
            TokenKind::NumberLiteral => {
                self.advance();
                Expression::NumberLiteral {
                    text: token.text,
                    line: token.line,
                }
            }
            TokenKind::Identifier => {
                self.advance();
                Expression::Variable {
                    name: token.text,
                    line: token.line,
                }
            }
            TokenKind::OpenParen => {
                self.advance();
                let expression = self.parse_expression();
                self.eat(TokenKind::CloseParen);
                expression
            }
            found => {
                self.errors.push(SyntaxError::InvalidFactor {
                    found,
                    line: token.line,
                });
                self.advance();
                Expression::NumberLiteral {
                    text: "0".to_owned(),
                    line: token.line,
                }
            }
        }
    }
}
