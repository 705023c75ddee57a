pub mod ast_lowering;
pub mod optimization;
pub mod tac;
