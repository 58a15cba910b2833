//! # Symbolic Engine Module
//!
//! This module holds the symbolic expression tree every equation is turned into
//! before it is typeset. A tree is built once by the parser, is never mutated
//! afterwards and is dropped as soon as it has been rendered.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - catalogued variables like "x0", "x12"
//! - **Constants**: `Const(f64)` - numeric literals (always finite)
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - arithmetic and powers
//! - **Negation**: `Neg` - unary minus / the `neg` pseudo-function
//! - **Functions**: `Func(Function, arg)` - unary entries of the function table
//!
//! ### Key Methods
//! - `Display` - canonical, fully parenthesised textual form accepted back by the parser
//! - `IndexedVar(index, var_name)` - build `x0`, `x1`, ... handles
//! - `extract_variables()` - names used by a tree
//! - `to_latex()` - see `symbolic_latex`
//!
//! Operator overloading (`+ - * /` and unary `-`) builds trees directly, which keeps
//! test fixtures readable: `x.clone().pow(Expr::Const(2.0)) - y / z`.

#![allow(non_camel_case_types)]

use crate::symbolic::function_table::Function;
use std::collections::BTreeSet;
use std::fmt;

/// Core symbolic expression enum: an immutable abstract syntax tree of one equation.
///
/// # Examples
/// ```rust, ignore
/// use RustedEqTeX::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x0".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable, always a name found by the variable catalog
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ** exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Unary minus: -expr
    Neg(Box<Expr>),
    /// Unary function application: sqrt(x), exp(x), sin(x) ...
    Func(Function, Box<Expr>),
}

/// Canonical textual form. Every compound node is wrapped in parentheses and negative
/// constants are parenthesised too, so the output re-parses to the very same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) if val.is_sign_negative() && *val != 0.0 => write!(f, "({})", val),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ** {})", base, exp),
            Expr::Neg(expr) => write!(f, "(-{})", expr),
            Expr::Func(func, expr) => write!(f, "{}({})", func, expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Neg(self.boxed())
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates power expression self ** rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Func(Function::Exp, self.boxed())
    }

    /// Creates square root sqrt(self).
    pub fn sqrt(self) -> Expr {
        Expr::Func(Function::Sqrt, self.boxed())
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Func(Function::Log, self.boxed())
    }

    /// Creates a single indexed variable with format "name + index" (e.g., "x5").
    pub fn IndexedVar(index: usize, var_name: &str) -> Expr {
        let indexed_var_name = format!("{}{}", var_name, index);
        Expr::Var(indexed_var_name)
    }

    /// Collects the names of all variables used in the expression, sorted and without repeats.
    pub fn extract_variables(&self) -> Vec<String> {
        let mut found = BTreeSet::new();
        self.collect_variables(&mut found);
        found.into_iter().collect()
    }

    fn collect_variables(&self, found: &mut BTreeSet<String>) {
        match self {
            Expr::Var(name) => {
                found.insert(name.clone());
            }
            Expr::Const(_) => {}
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.collect_variables(found);
                right.collect_variables(found);
            }
            Expr::Neg(expr) | Expr::Func(_, expr) => expr.collect_variables(found),
        }
    }
}

//___________________________________MACROS____________________________________

/// Macro to create a single indexed variable
/// Usage: indexed_var!(5, "x") -> creates x5
#[macro_export]
macro_rules! indexed_var {
    ($index:expr, $name:expr) => {
        $crate::symbolic::symbolic_engine::Expr::IndexedVar($index, $name)
    };
}
