//! Variable discovery for a batch of equations.
//!
//! Symbolic regression names its features `x0, x1, ..., xN`. The catalog scans every
//! equation of a batch for tokens of that shape (a letter prefix followed by a
//! non-negative integer, `y0` and `feat3` included) and binds each distinct name to one
//! symbolic handle. Names followed by `(` are calls, not variables. A list of prefixes
//! narrows the catalog to those prefixes only. The catalog is built once, before any
//! equation is parsed, and is only read afterwards.
use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// word made of a letter prefix and a decimal index, e.g. x0, x12, feat3
static VARIABLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z]+)(\d+)\b").expect("variable pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq)]
pub struct VariableCatalog {
    variables: HashMap<String, Expr>,
    prefixes: Vec<String>,
}

impl VariableCatalog {
    /// Catalog of `<letters><N>` variables found in `equations`, whatever the prefix.
    pub fn from_equations<S: AsRef<str>>(equations: &[S]) -> Self {
        Self::with_prefixes::<S, &str>(equations, &[])
    }

    /// Catalog of `<prefix><N>` variables for any of the given prefixes; an empty list
    /// allows every prefix. Tokens with the right shape but another prefix are skipped,
    /// as are calls like `log10(3)` and indices too large to be a feature number.
    pub fn with_prefixes<S: AsRef<str>, P: AsRef<str>>(equations: &[S], prefixes: &[P]) -> Self {
        let prefixes: Vec<String> = prefixes.iter().map(|p| p.as_ref().to_string()).collect();
        let mut variables = HashMap::new();
        for equation in equations {
            let equation = equation.as_ref();
            for captures in VARIABLE_PATTERN.captures_iter(equation) {
                let name = &captures[0];
                if variables.contains_key(name) {
                    continue;
                }
                let end = captures.get(0).map_or(equation.len(), |m| m.end());
                if equation[end..].trim_start().starts_with('(') {
                    debug!("'{}' is called like a function, not catalogued", name);
                    continue;
                }
                let prefix = &captures[1];
                if !prefixes.is_empty() && !prefixes.iter().any(|p| p == prefix) {
                    debug!("'{}' looks like a variable but its prefix is not catalogued", name);
                    continue;
                }
                if captures[2].parse::<usize>().is_err() {
                    debug!("'{}' has an index out of range, skipped", name);
                    continue;
                }
                variables.insert(name.to_string(), Expr::Var(name.to_string()));
            }
        }
        debug!("variable catalog: {} variables", variables.len());
        VariableCatalog {
            variables,
            prefixes,
        }
    }

    /// symbolic handle of a catalogued variable
    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// prefixes the catalog was narrowed to, empty when every prefix is accepted
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Names ordered by prefix, then by numeric index (x2 before x10).
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variables.keys().map(String::as_str).collect();
        names.sort_by_key(|name| {
            let digits_at = name.find(|c: char| c.is_ascii_digit()).unwrap_or(name.len());
            let (prefix, index) = name.split_at(digits_at);
            (prefix.to_string(), index.parse::<usize>().unwrap_or(usize::MAX), name.len())
        });
        names
    }
}
