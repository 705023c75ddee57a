//! Front-end-to-IR compiler for a minimal imperative expression language:
//! `int`/`float` declarations and assignments over arithmetic expressions.
//!
//! The pipeline is lexing, recursive-descent parsing, semantic analysis,
//! three-address code generation, and two optimization passes. Every stage
//! accumulates its own diagnostics and returns a best-effort result, so the
//! caller always receives all six stage reports even for malformed input.

pub mod frontend;
pub mod middle;
pub mod reports;

use frontend::{
    ast::Program,
    lexer::{Lexer, LexicalError, Token},
    parser::{Parser, SyntaxError},
    resolve::{self, SemanticAnalysis},
};
use middle::{
    ast_lowering::{IrOutput, TacGenerator},
    optimization::{self, Optimization},
};

/// Structured result of one compile request, plus the rendered reports. All
/// state is local to one invocation; nothing is shared across calls.
#[derive(Debug)]
pub struct CompileOutput {
    pub tokens: Result<Vec<Token>, LexicalError>,
    pub program: Option<Program>,
    pub syntax_errors: Vec<SyntaxError>,
    pub analysis: SemanticAnalysis,
    pub ir: IrOutput,
    pub optimization: Optimization,
    pub reports: Reports,
}

/// One formatted text block per pipeline stage, intended for direct display
#[derive(Debug)]
pub struct Reports {
    pub tokens: String,
    pub symbols: String,
    pub parse: String,
    pub semantic: String,
    pub ir: String,
    pub optimized: String,
}

/// Runs the whole pipeline once. Only a lexical error aborts its own stage
/// (yielding an empty token sequence); every later stage then reports its
/// own "nothing to process" diagnostic instead of crashing.
pub fn compile(source: &str) -> CompileOutput {
    let tokens = Lexer::tokenize(source);

    let (program, syntax_errors) = match &tokens {
        Ok(tokens) => Parser::parse_program(tokens),
        Err(_) => Parser::parse_program(&[]),
    };

    // The reference behavior still attempts semantic analysis and IR
    // generation on whatever tree was produced, even after syntax errors
    let analysis = resolve::analyze(program.as_ref());
    let ir = TacGenerator::generate(program.as_ref(), &analysis.symbol_table);
    let optimization = optimization::optimize(&ir.instructions);

    let reports = Reports {
        tokens: reports::tokens_report(&tokens),
        symbols: reports::symbols_report(&analysis.symbol_table),
        parse: reports::parse_report(program.as_ref(), &syntax_errors),
        semantic: reports::semantic_report(&analysis),
        ir: reports::ir_report(&ir),
        optimized: reports::optimized_report(&ir.instructions, &optimization),
    };

    CompileOutput {
        tokens,
        program,
        syntax_errors,
        analysis,
        ir,
        optimization,
        reports,
    }
}
