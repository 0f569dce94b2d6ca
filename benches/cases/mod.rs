pub mod parsing;
pub mod rewriting;
