//! Deterministic textual rendering of each pipeline stage, one block per
//! stage, intended for direct display by the presentation layer.

use itertools::Itertools;

use crate::{
    frontend::{
        ast::Program,
        lexer::{LexicalError, Token},
        parser::SyntaxError,
        resolve::{SemanticAnalysis, SymbolTable},
    },
    middle::{
        ast_lowering::IrOutput,
        optimization::Optimization,
        tac::Instruction,
    },
};

fn bullets(items: impl IntoIterator<Item = String>) -> String {
    items.into_iter().map(|item| format!("- {item}")).join("\n")
}

fn numbered(lines: &[Instruction]) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| format!("{:<4} {line}", format!("{}.", index + 1)))
        .join("\n")
}

fn numbered_or_empty(lines: &[Instruction]) -> String {
    if lines.is_empty() {
        "(empty)".to_owned()
    } else {
        numbered(lines)
    }
}

pub fn tokens_report(tokens: &Result<Vec<Token>, LexicalError>) -> String {
    match tokens {
        Err(error) => format!("LEXICAL ERROR(S):\n{}", bullets([error.to_string()])),
        Ok(tokens) => tokens
            .iter()
            .map(|token| {
                format!(
                    "{:<10}  {:?}  (line {})",
                    token.kind.to_string(),
                    token.text,
                    token.line
                )
            })
            .join("\n"),
    }
}

pub fn symbols_report(symbol_table: &SymbolTable) -> String {
    if symbol_table.is_empty() {
        return "Symbol Table is empty.".to_owned();
    }

    let mut rows = vec![
        format!("{:<18}{:<10}DECL_LINE", "NAME", "TYPE"),
        "-".repeat(44),
    ];

    rows.extend(symbol_table.iter().map(|symbol| {
        format!(
            "{:<18}{:<10}{}",
            symbol.name, symbol.ty, symbol.declared_line
        )
    }));

    rows.join("\n")
}

pub fn parse_report(program: Option<&Program>, errors: &[SyntaxError]) -> String {
    if !errors.is_empty() {
        return format!(
            "SYNTAX ERROR(S):\n{}",
            bullets(errors.iter().map(|e| e.to_string()))
        );
    }

    let summary = match program {
        None => "No AST produced.".to_owned(),
        Some(program) => program
            .statements
            .iter()
            .enumerate()
            .map(|(index, statement)| format!("{}. {}", index + 1, statement.render()))
            .join("\n"),
    };

    format!("Parsing Successful ✅\n\nAST Summary:\n{summary}")
}

pub fn semantic_report(analysis: &SemanticAnalysis) -> String {
    if !analysis.errors.is_empty() {
        return format!(
            "SEMANTIC ERROR(S):\n{}",
            bullets(analysis.errors.iter().map(|e| e.to_string()))
        );
    }

    let notes = if analysis.notes.is_empty() {
        "- No issues detected.".to_owned()
    } else {
        bullets(analysis.notes.iter().cloned())
    };

    format!("Semantic Analysis Passed ✅\n\nNotes:\n{notes}")
}

pub fn ir_report(ir: &IrOutput) -> String {
    if !ir.errors.is_empty() {
        return format!(
            "IR GENERATION ERROR(S):\n{}",
            bullets(ir.errors.iter().map(|e| e.to_string()))
        );
    }

    let mut out = vec![
        "Three Address Code (TAC):".to_owned(),
        "-".repeat(26),
        numbered_or_empty(&ir.instructions),
        String::new(),
        "Quadruples:".to_owned(),
        "-".repeat(26),
        format!("{:<6}{:<12}{:<12}res", "op", "arg1", "arg2"),
        "-".repeat(44),
    ];

    out.extend(ir.quadruples.iter().map(|quad| {
        let second = quad
            .second
            .as_ref()
            .map(|operand| operand.to_string())
            .unwrap_or_default();

        format!(
            "{:<6}{:<12}{:<12}{}",
            quad.operator.to_string(),
            quad.first.to_string(),
            second,
            quad.result
        )
    }));

    out.join("\n")
}

pub fn optimized_report(original: &[Instruction], optimization: &Optimization) -> String {
    [
        "Original TAC:".to_owned(),
        "-".repeat(20),
        numbered_or_empty(original),
        String::new(),
        "After Constant Folding:".to_owned(),
        "-".repeat(26),
        numbered_or_empty(&optimization.folded),
        String::new(),
        "After Dead Temp Elimination:".to_owned(),
        "-".repeat(30),
        numbered_or_empty(&optimization.cleaned),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::frontend::{lexer::Lexer, resolve};

    #[test]
    fn tokens_report_lists_one_row_per_token() {
        let tokens = Lexer::tokenize("int x;");

        assert_eq!(
            tokens_report(&tokens),
            indoc! {r#"
                KW          "int"  (line 1)
                ID          "x"  (line 1)
                SEMI        ";"  (line 1)
                EOF         ""  (line 1)"#},
        );
    }

    #[test]
    fn tokens_report_renders_lexical_errors() {
        let tokens = Lexer::tokenize("int x; ?");

        assert_eq!(
            tokens_report(&tokens),
            indoc! {"
                LEXICAL ERROR(S):
                - Unexpected character '?' at line 1"},
        );
    }

    #[test]
    fn symbols_report_is_a_padded_table() {
        let mut table = SymbolTable::new();
        table
            .declare(resolve::Symbol {
                name: "x".to_owned(),
                ty: crate::frontend::ast::PrimitiveType::Int,
                declared_line: 1,
            })
            .unwrap();

        assert_eq!(
            symbols_report(&table),
            indoc! {"
                NAME              TYPE      DECL_LINE
                --------------------------------------------
                x                 int       1"},
        );
    }

    #[test]
    fn empty_symbol_table_has_a_placeholder() {
        assert_eq!(symbols_report(&SymbolTable::new()), "Symbol Table is empty.");
    }
}
