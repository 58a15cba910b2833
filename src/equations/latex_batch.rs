//! # Batch conversion of equation strings to LaTeX
//!
//! ```
//! use RustedEqTeX::equations::batch_config::BatchConfig;
//! use RustedEqTeX::equations::latex_batch::LatexBatch;
//! let mut batch = LatexBatch::new(BatchConfig::default());
//! let records = batch.convert(&["x0+1", "bad(((", "x0*x1"]);
//! assert_eq!(records.len(), 3);
//! assert!(records[0].is_success() && !records[1].is_success() && records[2].is_success());
//! ```
//! The variable catalog is built from the whole batch first and then shared read-only by
//! every equation. Each equation goes through normalizer -> parser -> renderer on its own;
//! a failure (or a panic) in one of them ends up in that equation's record and nowhere else.
use crate::equations::batch_config::BatchConfig;
use crate::symbolic::parse_expr::{ParseError, parse_expression};
use crate::symbolic::variable_catalog::VariableCatalog;
use log::{debug, error, info, warn};
use rayon::prelude::*;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tabled::{builder::Builder, settings::Style};

#[derive(Debug, Clone, PartialEq)]
pub enum EquationError {
    Parse(ParseError),
    /// the pipeline panicked on this equation
    Internal(String),
}

impl fmt::Display for EquationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EquationError::Parse(e) => write!(f, "{}", e),
            EquationError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for EquationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EquationError::Parse(e) => Some(e),
            EquationError::Internal(_) => None,
        }
    }
}

impl From<ParseError> for EquationError {
    fn from(e: ParseError) -> Self {
        EquationError::Parse(e)
    }
}

/// Result for one input equation; `index` is its position in the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct EquationRecord {
    pub index: usize,
    pub equation: String,
    pub outcome: Result<String, EquationError>,
}

impl EquationRecord {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn latex(&self) -> Option<&str> {
        self.outcome.as_ref().ok().map(String::as_str)
    }

    pub fn error(&self) -> Option<&EquationError> {
        self.outcome.as_ref().err()
    }

    /// the LaTeX string, or `Error parsing equation: <equation>. Error: <cause>`
    pub fn to_output_line(&self) -> String {
        match &self.outcome {
            Ok(latex) => latex.clone(),
            Err(e) => format!("Error parsing equation: {}. Error: {}", self.equation, e),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub struct LatexBatch {
    config: BatchConfig,
    statistics: HashMap<String, usize>,
}

impl LatexBatch {
    pub fn new(config: BatchConfig) -> Self {
        LatexBatch {
            config,
            statistics: HashMap::new(),
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// counters of the last `convert` call
    pub fn statistics(&self) -> &HashMap<String, usize> {
        &self.statistics
    }

    /// Converts the batch. The output has one record per input, in input order.
    pub fn convert<S: AsRef<str> + Sync>(&mut self, equations: &[S]) -> Vec<EquationRecord> {
        let catalog = VariableCatalog::with_prefixes(equations, &self.config.prefixes);
        info!(
            "converting {} equations, {} variables found",
            equations.len(),
            catalog.len()
        );
        debug!("variables: {:?}", catalog.names());

        let records: Vec<EquationRecord> = if self.config.parallel {
            equations
                .par_iter()
                .enumerate()
                .map(|(i, equation)| self.convert_one(i, equation.as_ref(), &catalog))
                .collect()
        } else {
            equations
                .iter()
                .enumerate()
                .map(|(i, equation)| self.convert_one(i, equation.as_ref(), &catalog))
                .collect()
        };
        self.calc_statistics(&records, &catalog);
        records
    }

    /// `convert` reduced to the output lines
    pub fn convert_to_lines<S: AsRef<str> + Sync>(&mut self, equations: &[S]) -> Vec<String> {
        self.convert(equations)
            .iter()
            .map(EquationRecord::to_output_line)
            .collect()
    }

    /// normalize -> parse -> render for one equation against an existing catalog
    pub fn equation_to_latex(
        &self,
        equation: &str,
        catalog: &VariableCatalog,
    ) -> Result<String, ParseError> {
        let normalized = self.config.normalizer.normalize(equation);
        let expr = parse_expression(&normalized, catalog, &self.config.functions)?;
        debug!("parsed '{}' as {}", equation, expr);
        Ok(expr.to_latex())
    }

    fn convert_one(&self, index: usize, equation: &str, catalog: &VariableCatalog) -> EquationRecord {
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
            self.equation_to_latex(equation, catalog)
        }));
        let outcome = match attempt {
            Ok(result) => result.map_err(EquationError::from),
            Err(payload) => {
                let msg = panic_message(payload);
                error!("defect while converting equation {} '{}': {}", index, equation, msg);
                Err(EquationError::Internal(msg))
            }
        };
        if let Err(EquationError::Parse(e)) = &outcome {
            warn!("equation {} '{}' not converted: {}", index, equation, e);
        }
        EquationRecord {
            index,
            equation: equation.to_string(),
            outcome,
        }
    }

    fn calc_statistics(&mut self, records: &[EquationRecord], catalog: &VariableCatalog) {
        let converted = records.iter().filter(|r| r.is_success()).count();
        let mut stats = HashMap::new();
        stats.insert("equations".to_string(), records.len());
        stats.insert("converted".to_string(), converted);
        stats.insert("failed".to_string(), records.len() - converted);
        stats.insert("variables".to_string(), catalog.len());
        stats.insert("functions".to_string(), self.config.functions.len());
        let mut table = Builder::from(stats.clone()).build();
        table.with(Style::modern_rounded());
        info!("\n \n CONVERSION STATISTICS \n \n {}", table.to_string());
        self.statistics = stats;
    }
}

/// Records for `equations` with the default settings.
pub fn equation_records<S: AsRef<str> + Sync>(equations: &[S]) -> Vec<EquationRecord> {
    LatexBatch::new(BatchConfig::default()).convert(equations)
}

/// One output line per equation with the default settings: LaTeX or an error line.
pub fn equations_to_latex<S: AsRef<str> + Sync>(equations: &[S]) -> Vec<String> {
    LatexBatch::new(BatchConfig::default()).convert_to_lines(equations)
}
