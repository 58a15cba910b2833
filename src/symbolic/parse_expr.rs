//! a module turns a normalized equation string into a symbolic expression
//!# Example
//! ```
//! use RustedEqTeX::symbolic::function_table::FunctionTable;
//! use RustedEqTeX::symbolic::parse_expr::parse_expression;
//! use RustedEqTeX::symbolic::variable_catalog::VariableCatalog;
//! let input = "Pow(x0, 2) + sqrt(x1)";
//! let catalog = VariableCatalog::from_equations(&[input]);
//! let parsed_expression = parse_expression(input, &catalog, &FunctionTable::default()).unwrap();
//! println!(" parsed_expression {}", parsed_expression);
//! ```
use crate::symbolic::function_table::{FunctionKind, FunctionTable};
use crate::symbolic::lexer::{Token, TokenKind, tokenize};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::brackets_balanced;
use crate::symbolic::variable_catalog::VariableCatalog;
use std::fmt;
//
//                  grammar, loosest binding first
//      expression := term (('+' | '-') term)*
//      term       := unary (('*' | '/') unary)*
//      unary      := ('-' | '+') unary | power
//      power      := primary ('**' unary)?          right associative
//      primary    := NUMBER
//                  | IDENT '(' expression (',' expression)* ')'
//                  | IDENT
//                  | '(' expression ')'

/// Why an equation could not be parsed
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// call of a name that is not in the function table
    UnknownFunction(String),
    /// bare identifier that is not in the variable catalog
    UnknownVariable(String),
    /// known function called with the wrong number of arguments
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    /// malformed grouping, trailing tokens, bad literals or operator sequences
    Syntax(String),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseErrorKind::UnknownFunction(name) => write!(f, "unknown function '{}'", name),
            ParseErrorKind::UnknownVariable(name) => write!(f, "unknown symbol '{}'", name),
            ParseErrorKind::ArityMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "function '{}' takes {} argument(s), {} given",
                name, expected, found
            ),
            ParseErrorKind::Syntax(msg) => write!(f, "syntax error: {}", msg),
        }
    }
}

/// Parse failure: the string that was parsed plus the cause.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub equation: String,
    pub kind: ParseErrorKind,
}

impl ParseError {
    fn new(equation: &str, kind: ParseErrorKind) -> Self {
        ParseError {
            equation: equation.to_string(),
            kind,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for ParseError {}

type ParseResult<T> = Result<T, ParseErrorKind>;

/// Limit on nesting (groups, signs, exponents, calls) and on the height of the parsed tree.
/// Deeper input is a syntax error instead of a stack overflow further down the pipeline.
pub const MAX_DEPTH: usize = 200;
const TOO_DEEP: &str = "expression nested too deeply";

fn describe(token: Option<&Token>) -> String {
    match token {
        Some(token) => format!("'{}' at position {}", token.text, token.offset),
        None => "end of input".to_string(),
    }
}

/// Recursive descent over the significant (non-whitespace) tokens of one equation
struct ExpressionParser<'a, 'c> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    catalog: &'c VariableCatalog,
    functions: &'c FunctionTable,
    /// open groups, signs, exponents and calls around the current position
    nesting: usize,
    /// height of the subtree returned last
    height: usize,
}

impl<'a, 'c> ExpressionParser<'a, 'c> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> ParseResult<Token<'a>> {
        if self.peek_kind() == Some(kind) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(ParseErrorKind::Syntax(format!(
            "expected {}, found {}",
            what,
            describe(self.peek())
        )))
    }

    fn too_deep() -> ParseErrorKind {
        ParseErrorKind::Syntax(TOO_DEEP.to_string())
    }

    /// one more level of recursion: a group, a sign, an exponent or a call
    fn enter(&mut self) -> ParseResult<()> {
        self.nesting += 1;
        if self.nesting > MAX_DEPTH {
            return Err(Self::too_deep());
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    /// `expr` sits on top of a subtree of height `below`
    fn built(&mut self, expr: Expr, below: usize) -> ParseResult<Expr> {
        self.height = below + 1;
        if self.height > MAX_DEPTH {
            return Err(Self::too_deep());
        }
        Ok(expr)
    }

    fn binary(
        &mut self,
        op: fn(Box<Expr>, Box<Expr>) -> Expr,
        left: Expr,
        left_height: usize,
        right: Expr,
    ) -> ParseResult<Expr> {
        let below = left_height.max(self.height);
        self.built(op(left.boxed(), right.boxed()), below)
    }

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_term()?;
        loop {
            let op: fn(Box<Expr>, Box<Expr>) -> Expr = match self.peek_kind() {
                Some(TokenKind::Plus) => Expr::Add,
                Some(TokenKind::Minus) => Expr::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let left_height = self.height;
            let right = self.parse_term()?;
            left = self.binary(op, left, left_height, right)?;
        }
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op: fn(Box<Expr>, Box<Expr>) -> Expr = match self.peek_kind() {
                Some(TokenKind::Star) => Expr::Mul,
                Some(TokenKind::Slash) => Expr::Div,
                _ => return Ok(left),
            };
            self.advance();
            let left_height = self.height;
            let right = self.parse_unary()?;
            left = self.binary(op, left, left_height, right)?;
        }
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        match self.peek_kind() {
            Some(TokenKind::Minus) => {
                self.advance();
                self.enter()?;
                let operand = self.parse_unary()?;
                self.leave();
                // -2.5 is a negative constant, not a negation node
                match operand {
                    Expr::Const(value) => Ok(Expr::Const(-value)),
                    other => {
                        let below = self.height;
                        self.built(Expr::Neg(other.boxed()), below)
                    }
                }
            }
            Some(TokenKind::Plus) => {
                self.advance();
                self.enter()?;
                let operand = self.parse_unary()?;
                self.leave();
                Ok(operand)
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> ParseResult<Expr> {
        let base = self.parse_primary()?;
        if self.peek_kind() == Some(TokenKind::DoubleStar) {
            self.advance();
            let base_height = self.height;
            self.enter()?;
            let exponent = self.parse_unary()?;
            self.leave();
            return self.binary(Expr::Pow, base, base_height, exponent);
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let Some(token) = self.advance() else {
            return Err(ParseErrorKind::Syntax("unexpected end of input".to_string()));
        };
        match token.kind {
            TokenKind::Number => {
                let value = token.text.parse::<f64>().map_err(|_| {
                    ParseErrorKind::Syntax(format!("invalid number '{}'", token.text))
                })?;
                if !value.is_finite() {
                    return Err(ParseErrorKind::Syntax(format!(
                        "number '{}' is out of range",
                        token.text
                    )));
                }
                self.height = 1;
                Ok(Expr::Const(value))
            }
            TokenKind::Ident if self.peek_kind() == Some(TokenKind::LParen) => {
                self.parse_call(token.text)
            }
            TokenKind::Ident => match self.catalog.get(token.text) {
                Some(handle) => {
                    self.height = 1;
                    Ok(handle.clone())
                }
                None => Err(ParseErrorKind::UnknownVariable(token.text.to_string())),
            },
            TokenKind::LParen => {
                self.enter()?;
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                self.leave();
                Ok(inner)
            }
            TokenKind::Caret => Err(ParseErrorKind::Syntax(format!(
                "'^' at position {} is not a power operator, use '**'",
                token.offset
            ))),
            _ => Err(ParseErrorKind::Syntax(format!(
                "unexpected {}",
                describe(Some(&token))
            ))),
        }
    }

    /// `name(` has been seen (name consumed, `(` not yet)
    fn parse_call(&mut self, name: &str) -> ParseResult<Expr> {
        // an unknown name fails before its arguments are even looked at
        let kind = self
            .functions
            .lookup(name)
            .ok_or_else(|| ParseErrorKind::UnknownFunction(name.to_string()))?;
        self.expect(TokenKind::LParen, "'('")?;
        self.enter()?;
        let mut args = vec![self.parse_expression()?];
        let mut below = self.height;
        while self.peek_kind() == Some(TokenKind::Comma) {
            self.advance();
            args.push(self.parse_expression()?);
            below = below.max(self.height);
        }
        self.expect(TokenKind::RParen, "')'")?;
        self.leave();
        let found = args.len();
        let mut args = args.into_iter();
        let expr = match (kind, args.next(), args.next(), args.next()) {
            (FunctionKind::Pow, Some(base), Some(exponent), None) => {
                Expr::Pow(base.boxed(), exponent.boxed())
            }
            (FunctionKind::Neg, Some(arg), None, None) => Expr::Neg(arg.boxed()),
            (FunctionKind::Unary(func), Some(arg), None, None) => Expr::Func(func, arg.boxed()),
            _ => {
                return Err(ParseErrorKind::ArityMismatch {
                    name: name.to_string(),
                    expected: kind.arity(),
                    found,
                });
            }
        };
        self.built(expr, below)
    }
}

/// Parses a normalized equation. Fails on anything outside the canonical grammar:
/// unknown functions or variables, wrong arities, malformed grouping and any input
/// left over after a complete expression.
pub fn parse_expression(
    input: &str,
    catalog: &VariableCatalog,
    functions: &FunctionTable,
) -> Result<Expr, ParseError> {
    let all_tokens = tokenize(input);
    let tokens: Vec<Token> = all_tokens.into_iter().filter(|t| !t.is_whitespace()).collect();
    if tokens.is_empty() {
        return Err(ParseError::new(
            input,
            ParseErrorKind::Syntax("empty expression".to_string()),
        ));
    }
    let balanced = brackets_balanced(&tokens);
    let mut parser = ExpressionParser {
        tokens,
        pos: 0,
        catalog,
        functions,
        nesting: 0,
        height: 0,
    };
    let parsed = parser.parse_expression().and_then(|expr| match parser.peek() {
        None => Ok(expr),
        Some(token) if token.kind == TokenKind::Caret => Err(ParseErrorKind::Syntax(format!(
            "'^' at position {} is not a power operator, use '**'",
            token.offset
        ))),
        Some(token) => Err(ParseErrorKind::Syntax(format!(
            "unexpected trailing input starting at {}",
            describe(Some(token))
        ))),
    });
    parsed.map_err(|kind| {
        // grouping problems get a clearer message than the token the parser tripped on,
        // but name-resolution failures are more useful as they are
        let kind = match kind {
            ParseErrorKind::Syntax(msg) if !balanced && msg != TOO_DEEP => {
                ParseErrorKind::Syntax("unbalanced parentheses".to_string())
            }
            other => other,
        };
        ParseError::new(input, kind)
    })
}

impl Expr {
    /// Parses `input` with a catalog built from `input` itself and the default function table.
    pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
        let catalog = VariableCatalog::from_equations(&[input]);
        parse_expression(input, &catalog, &FunctionTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::function_table::Function;

    fn x(i: usize) -> Expr {
        Expr::IndexedVar(i, "x")
    }

    fn parse(input: &str) -> Result<Expr, ParseError> {
        Expr::parse_expression(input)
    }

    #[test]
    fn test_parse_constant() {
        assert_eq!(parse("42").unwrap(), Expr::Const(42.0));
        assert_eq!(parse("2.5e-3").unwrap(), Expr::Const(0.0025));
        assert_eq!(parse("-0.5").unwrap(), Expr::Const(-0.5));
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(parse("x0").unwrap(), x(0));
    }

    #[test]
    fn test_parse_precedence() {
        let expr = parse("x0 + x1 * x2").unwrap();
        assert_eq!(expr, x(0) + x(1) * x(2));
        let expr = parse("x0 - x1 - x2").unwrap();
        assert_eq!(expr, (x(0) - x(1)) - x(2));
        let expr = parse("x0 / x1 * x2").unwrap();
        assert_eq!(expr, (x(0) / x(1)) * x(2));
    }

    #[test]
    fn test_parse_power() {
        let expr = parse("x0**2 - x2/x1").unwrap();
        assert_eq!(expr, x(0).pow(Expr::Const(2.0)) - x(2) / x(1));
        // right associative
        let expr = parse("x0**x1**2").unwrap();
        assert_eq!(expr, x(0).pow(x(1).pow(Expr::Const(2.0))));
        // unary minus binds looser than **
        let expr = parse("-x0**2").unwrap();
        assert_eq!(expr, -(x(0).pow(Expr::Const(2.0))));
        let expr = parse("x0**-1").unwrap();
        assert_eq!(expr, x(0).pow(Expr::Const(-1.0)));
    }

    #[test]
    fn test_parse_functions() {
        let expr = parse("Pow(x0, 2) + sqrt(x1)").unwrap();
        assert_eq!(expr, x(0).pow(Expr::Const(2.0)) + x(1).sqrt());
        let expr = parse("exp(-x0) * neg(x1)").unwrap();
        assert_eq!(expr, (-x(0)).exp() * -x(1));
        let expr = parse("ln(x0)").unwrap();
        assert_eq!(expr, Expr::Func(Function::Log, x(0).boxed()));
    }

    #[test]
    fn test_parse_brackets() {
        let expr = parse("(x0 + x1) * (x2 - 2)").unwrap();
        assert_eq!(expr, (x(0) + x(1)) * (x(2) - Expr::Const(2.0)));
        let expr = parse("((x0))").unwrap();
        assert_eq!(expr, x(0));
    }

    #[test]
    fn test_unknown_function() {
        let err = parse("unknownfn(x0)").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnknownFunction("unknownfn".to_string())
        );
        assert!(err.to_string().contains("unknownfn"));
        // minimal table does not know sin
        let catalog = VariableCatalog::from_equations(&["sin(x0)"]);
        let err = parse_expression("sin(x0)", &catalog, &FunctionTable::minimal()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownFunction("sin".to_string()));
    }

    #[test]
    fn test_unknown_variable() {
        let err = parse("x0 + y").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownVariable("y".to_string()));
        // a function name without a call is not a variable either
        let err = parse("sqrt + 1").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownVariable("sqrt".to_string()));
    }

    #[test]
    fn test_arity() {
        let err = parse("Pow(x0)").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::ArityMismatch {
                name: "Pow".to_string(),
                expected: 2,
                found: 1
            }
        );
        assert!(parse("sqrt(x0, 2)").is_err());
    }

    #[test]
    fn test_syntax_errors() {
        for input in [
            "", "   ", "(x0 +", "(x0 + x1", "x0 x1", "x0 +", "x0 ** ", "x0 $ 1", "x0)", "()",
            "x0^2", "1e999", "Pow(x0,)",
        ] {
            match parse(input) {
                Err(ParseError {
                    kind: ParseErrorKind::Syntax(_),
                    equation,
                }) => assert_eq!(equation, input),
                other => panic!("input {:?} gave {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_unbalanced_message() {
        let err = parse("(x0 + x1").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::Syntax("unbalanced parentheses".to_string())
        );
    }

    #[test]
    fn test_bad_call_names_function() {
        let err = parse("bad(((").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownFunction("bad".to_string()));
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let too_deep = ParseErrorKind::Syntax("expression nested too deeply".to_string());
        let n = 10_000;
        let inputs = [
            format!("{}x0{}", "(".repeat(n), ")".repeat(n)),
            format!("{}x0", "-".repeat(n)),
            format!("{}x0", "x0**".repeat(n)),
            format!("{}x0{}", "sqrt(".repeat(n), ")".repeat(n)),
            format!("{}x0", "x0 + ".repeat(n)),
            format!("{}x0", "x0 * ".repeat(n)),
            // unbalanced as well, the depth is still what gets reported
            format!("{}x0", "(".repeat(n)),
        ];
        for input in inputs.iter() {
            assert_eq!(parse(input).unwrap_err().kind, too_deep);
        }
    }

    #[test]
    fn test_reasonable_depth_is_accepted() {
        let grouped = format!("{}x0{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(parse(&grouped).unwrap(), x(0));
        let long_sum = format!("{}x0", "x0 + ".repeat(150));
        assert!(parse(&long_sum).is_ok());
        let signs = format!("{}x0", "-".repeat(100));
        assert!(parse(&signs).is_ok());
    }
}
