//! # LaTeX rendering of symbolic expressions
//!
//! Turns an `Expr` tree into a LaTeX math string (without `$` delimiters). The output is
//! a pure function of the tree, so the same equation always typesets the same way.
//!
//! ## Notation
//!
//! | node                 | LaTeX                                   |
//! |----------------------|-----------------------------------------|
//! | `x12`                | `x_{12}`                                |
//! | `2.5e-7`             | `2.5 \cdot 10^{-7}`                     |
//! | `a / b`              | `\frac{a}{b}`                           |
//! | `a ** b`             | `a^{b}`                                 |
//! | `a * b`              | `a b`, or `a \cdot b` if b starts with a digit |
//! | `sqrt(a)`            | `\sqrt{a}`                              |
//! | `exp(a)`             | `e^{a}`                                 |
//! | `abs(a)`             | `\left|a\right|`                        |
//! | `log(a)`, `sin(a)`.. | `\log{\left(a \right)}`                 |
//! | `sin(a) ** 2`        | `\sin^{2}{\left(a \right)}`             |
//!
//! Parentheses are emitted as `\left( ... \right)` and only where precedence requires
//! them; adding a negative term is written as a subtraction and repeated signs cancel.
//! Numbers in scientific form are bracketed when raised to a power.
use crate::symbolic::function_table::Function;
use crate::symbolic::symbolic_engine::Expr;

/// binding strength of the rendered form, loosest first
const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_POWER: u8 = 3;
const PREC_ATOM: u8 = 4;

fn wrap(body: String) -> String {
    format!("\\left({}\\right)", body)
}

/// `x0` -> `x_{0}`, `feat12` -> `feat_{12}`, anything else unchanged
pub fn latex_variable(name: &str) -> String {
    let prefix = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if prefix.is_empty() || prefix.len() == name.len() {
        return name.to_string();
    }
    format!("{}_{{{}}}", prefix, &name[prefix.len()..])
}

/// Integers without a decimal point, tiny and huge magnitudes in scientific form,
/// everything else in the shortest decimal form that reads back to the same value.
pub fn latex_number(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && magnitude < 1e15 {
        return format!("{}", value as i64);
    }
    if magnitude < 1e-4 || magnitude >= 1e15 {
        let scientific = format!("{:e}", value);
        if let Some((mantissa, exponent)) = scientific.split_once('e') {
            return if mantissa == "1" || mantissa == "-1" {
                let sign = if mantissa == "-1" { "-" } else { "" };
                format!("{}10^{{{}}}", sign, exponent)
            } else {
                format!("{} \\cdot 10^{{{}}}", mantissa, exponent)
            };
        }
    }
    format!("{}", value)
}

fn named_function(func: Function) -> Option<&'static str> {
    match func {
        Function::Log => Some("\\log"),
        Function::Sin => Some("\\sin"),
        Function::Cos => Some("\\cos"),
        Function::Tan => Some("\\tan"),
        Function::Sqrt | Function::Exp | Function::Abs => None,
    }
}

impl Expr {
    /// LaTeX form of the expression
    pub fn to_latex(&self) -> String {
        match self {
            Expr::Var(name) => latex_variable(name),
            Expr::Const(value) => latex_number(*value),
            Expr::Add(lhs, rhs) => match rhs.split_sign() {
                (true, magnitude) => {
                    format!("{} - {}", lhs.to_latex(), magnitude.latex_at(PREC_PRODUCT))
                }
                (false, magnitude) => format!("{} + {}", lhs.to_latex(), magnitude.to_latex()),
            },
            Expr::Sub(lhs, rhs) => match rhs.split_sign() {
                (true, magnitude) => format!("{} + {}", lhs.to_latex(), magnitude.to_latex()),
                (false, magnitude) => {
                    format!("{} - {}", lhs.to_latex(), magnitude.latex_at(PREC_PRODUCT))
                }
            },
            Expr::Mul(lhs, rhs) => {
                let left = lhs.latex_at(PREC_PRODUCT);
                let right = match rhs.split_sign() {
                    (true, magnitude) => wrap(format!("-{}", magnitude.latex_at(PREC_PRODUCT))),
                    (false, magnitude) => magnitude.latex_at(PREC_PRODUCT),
                };
                let separator = if right.starts_with(|c: char| c.is_ascii_digit()) {
                    " \\cdot "
                } else {
                    " "
                };
                format!("{}{}{}", left, separator, right)
            }
            Expr::Div(lhs, rhs) => format!("\\frac{{{}}}{{{}}}", lhs.to_latex(), rhs.to_latex()),
            Expr::Pow(base, exponent) => base.power_latex(exponent),
            Expr::Neg(_) => match self.split_sign() {
                (true, magnitude) => format!("-{}", magnitude.latex_at(PREC_PRODUCT)),
                (false, magnitude) => magnitude.to_latex(),
            },
            Expr::Func(func, arg) => match (func, named_function(*func)) {
                (_, Some(command)) => format!("{}{{\\left({} \\right)}}", command, arg.to_latex()),
                (Function::Sqrt, None) => format!("\\sqrt{{{}}}", arg.to_latex()),
                (Function::Exp, None) => format!("e^{{{}}}", arg.to_latex()),
                (_, None) => format!("\\left|{}\\right|", arg.to_latex()),
            },
        }
    }

    /// how tightly the rendered form of this node binds
    fn latex_precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => PREC_SUM,
            Expr::Mul(..) => PREC_PRODUCT,
            Expr::Neg(_) => match self.split_sign() {
                (true, _) => PREC_PRODUCT,
                (false, magnitude) => magnitude.latex_precedence(),
            },
            // -2, 2.5 \cdot 10^{-7} and 10^{20} are not atoms
            Expr::Const(value) => {
                let text = latex_number(*value);
                if *value < 0.0 || text.contains("\\cdot") {
                    PREC_PRODUCT
                } else if text.contains('^') {
                    PREC_POWER
                } else {
                    PREC_ATOM
                }
            }
            Expr::Pow(..) | Expr::Func(Function::Exp, _) => PREC_POWER,
            Expr::Var(_) | Expr::Div(..) | Expr::Func(..) => PREC_ATOM,
        }
    }

    /// rendered form, parenthesised if it binds looser than `context`
    fn latex_at(&self, context: u8) -> String {
        if self.latex_precedence() < context {
            wrap(self.to_latex())
        } else {
            self.to_latex()
        }
    }

    /// -self, if self renders with a leading minus: -c, -a, (-c) b
    fn without_leading_minus(&self) -> Option<Expr> {
        match self {
            Expr::Const(value) if *value < 0.0 => Some(Expr::Const(-value)),
            Expr::Neg(inner) => Some((**inner).clone()),
            Expr::Mul(lhs, rhs) => lhs
                .without_leading_minus()
                .map(|positive| Expr::Mul(positive.boxed(), rhs.clone())),
            _ => None,
        }
    }

    /// (negative, magnitude) with every leading minus folded: --a is (false, a)
    fn split_sign(&self) -> (bool, Expr) {
        let mut negative = false;
        let mut magnitude = self.clone();
        while let Some(positive) = magnitude.without_leading_minus() {
            negative = !negative;
            magnitude = positive;
        }
        (negative, magnitude)
    }

    fn power_latex(&self, exponent: &Expr) -> String {
        let exponent = exponent.to_latex();
        match self {
            // \sin^{2}{\left(x \right)}
            Expr::Func(func, arg) if named_function(*func).is_some() => format!(
                "{}^{{{}}}{{\\left({} \\right)}}",
                named_function(*func).unwrap_or_default(),
                exponent,
                arg.to_latex()
            ),
            Expr::Var(_) | Expr::Func(Function::Abs, _) => {
                format!("{}^{{{}}}", self.to_latex(), exponent)
            }
            Expr::Const(_) if self.latex_precedence() == PREC_ATOM => {
                format!("{}^{{{}}}", self.to_latex(), exponent)
            }
            _ => format!("{}^{{{}}}", wrap(self.to_latex()), exponent),
        }
    }
}
