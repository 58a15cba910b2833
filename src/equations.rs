//! turning batches of equation strings produced by symbolic regression into LaTeX
/// settings of a conversion run (function table, variable prefixes, normalization rules, output)
pub mod batch_config;
/// catalog -> normalize -> parse -> render over a whole batch, with per-equation failure isolation
pub mod latex_batch;
#[cfg(test)]
mod latex_batch_tests;
