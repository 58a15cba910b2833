//! examples of usage of RustedEqTeX
/// equation string -> LaTeX examples
pub mod latex_examples;
