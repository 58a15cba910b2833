//! Registry of function names an equation may call.
//!
//! The table is closed: a call to a name that is not registered is a parse failure.
//! `Pow`, `sqrt` and `exp` are always present; everything else is opt-in, either
//! through [`FunctionTable::default`] (the extended set used by the batch pipeline)
//! or through configuration.
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Unary functions with a symbolic meaning. `Display` gives the canonical spelling
/// used by `Expr`'s textual form, `FromStr` also accepts the common alternates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
pub enum Function {
    #[strum(serialize = "sqrt")]
    Sqrt,
    #[strum(serialize = "exp")]
    Exp,
    #[strum(to_string = "log", serialize = "ln")]
    Log,
    #[strum(serialize = "sin")]
    Sin,
    #[strum(serialize = "cos")]
    Cos,
    #[strum(to_string = "tan", serialize = "tg")]
    Tan,
    #[strum(serialize = "abs")]
    Abs,
}

/// What a registered name does when it is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// `Pow(base, exponent)`
    Pow,
    /// `neg(x)`, same node as a unary minus
    Neg,
    Unary(Function),
}

impl FunctionKind {
    pub fn arity(&self) -> usize {
        match self {
            FunctionKind::Pow => 2,
            FunctionKind::Neg | FunctionKind::Unary(_) => 1,
        }
    }
}

impl FromStr for FunctionKind {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "Pow" | "pow" => Ok(FunctionKind::Pow),
            "neg" => Ok(FunctionKind::Neg),
            _ => Function::from_str(name)
                .map(FunctionKind::Unary)
                .map_err(|_| {
                    let known: Vec<String> = Function::iter().map(|f| f.to_string()).collect();
                    format!(
                        "'{}' is not a known function, expected Pow, neg or one of {}",
                        name,
                        known.join(", ")
                    )
                }),
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FunctionKind::Pow => write!(f, "Pow"),
            FunctionKind::Neg => write!(f, "neg"),
            FunctionKind::Unary(func) => write!(f, "{}", func),
        }
    }
}

/// Minimum guaranteed set
pub const MINIMAL_FUNCTIONS: [&str; 3] = ["Pow", "sqrt", "exp"];
/// Names added on top of the minimal set by `FunctionTable::default()`
pub const EXTENDED_FUNCTIONS: [&str; 7] = ["log", "ln", "sin", "cos", "tan", "abs", "neg"];

/// Name -> meaning lookup shared read-only by every equation of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTable {
    entries: HashMap<String, FunctionKind>,
}

impl FunctionTable {
    /// Only `Pow`, `sqrt` and `exp`.
    pub fn minimal() -> Self {
        let mut entries = HashMap::new();
        entries.insert("Pow".to_string(), FunctionKind::Pow);
        entries.insert("sqrt".to_string(), FunctionKind::Unary(Function::Sqrt));
        entries.insert("exp".to_string(), FunctionKind::Unary(Function::Exp));
        FunctionTable { entries }
    }

    /// Minimal set plus the given names. Every name must be a spelling `FunctionKind`
    /// understands, otherwise the whole table is rejected.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        let mut table = Self::minimal();
        for name in names {
            let name = name.as_ref().trim();
            let kind = FunctionKind::from_str(name)?;
            table.entries.insert(name.to_string(), kind);
        }
        Ok(table)
    }

    /// Registers an extra spelling for an already known function, e.g. `tg` for `tan`.
    pub fn register_alias(&mut self, alias: &str, target: &str) -> Result<(), String> {
        let kind = FunctionKind::from_str(target)?;
        if alias.is_empty() || !alias.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(format!("'{}' is not a valid function name", alias));
        }
        self.entries.insert(alias.to_string(), kind);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<FunctionKind> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FunctionTable {
    fn default() -> Self {
        let mut table = Self::minimal();
        for name in EXTENDED_FUNCTIONS {
            if let Ok(kind) = FunctionKind::from_str(name) {
                table.entries.insert(name.to_string(), kind);
            }
        }
        table
    }
}
