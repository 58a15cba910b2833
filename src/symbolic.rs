#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a normalized equation string into a symbolic expression
///
///# Example
/// ```
/// use RustedEqTeX::symbolic::symbolic_engine::Expr;
/// let input = "Pow(x0, 2) + sqrt(x1)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// assert_eq!(parsed_expression.to_latex(), "x_{0}^{2} + \\sqrt{x_{1}}");
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds the expression tree produced by the parser
/// 2) turns a symbolic expression into a canonical string expression for printing and control results
/// 3) turns a symbolic expression into LaTeX (see `symbolic_latex`)
///# Example#
/// ```
/// use RustedEqTeX::symbolic::symbolic_engine::Expr;
/// let x0 = Expr::Var("x0".to_string());
/// let x1 = Expr::Var("x1".to_string());
/// let expr = x0.pow(Expr::Const(2.0)) - x1.exp();
/// println!("{}", expr);
/// assert_eq!(expr.extract_variables(), vec!["x0", "x1"]);
/// assert_eq!(expr.to_latex(), "x_{0}^{2} - e^{x_{1}}");
/// ```
pub mod symbolic_engine;
/// table of functions the parser accepts (Pow, sqrt, exp always present)
pub mod function_table;
/// lossless tokenizer shared by the normalizer and the parser
pub mod lexer;
/// rewrites dialect variants (square(..), ^N) into the canonical grammar
///# Example
/// ```
/// use RustedEqTeX::symbolic::normalize_expr::Normalizer;
/// let normalizer = Normalizer::default();
/// assert_eq!(normalizer.normalize("square(x0) + x1^2"), "Pow(x0, 2) + x1**2");
/// ```
pub mod normalize_expr;
/// LaTeX rendering of `Expr`
pub mod symbolic_latex;
pub mod utils;
/// discovers x0, x1, ... across a batch of equations
pub mod variable_catalog;
