//! # Syntax normalization
//!
//! Symbolic regression engines print equations in a dialect that is close to, but not
//! quite, the grammar `parse_expr` accepts. This module rewrites that dialect:
//!
//! | rule            | before            | after              |
//! |-----------------|-------------------|--------------------|
//! | `PowerAlias`    | `square(x0 + 1)`  | `Pow(x0 + 1, 2)`   |
//! | `Rename`        | `pow(x0, 3)`      | `Pow(x0, 3)`       |
//! | `CaretPower`    | `x0^2`            | `x0**2`            |
//!
//! Rules run in order over a lossless token stream (see `lexer`), so text no rule
//! touches comes out exactly as it went in. Rule sets are validated on construction so
//! that nothing a rule writes can trigger a rule again, which makes `normalize`
//! idempotent.
use crate::symbolic::lexer::{Token, TokenKind, tokenize};
use crate::symbolic::parse_expr::MAX_DEPTH;
use crate::symbolic::utils::{find_pair_to_this_bracket, next_significant};
use log::debug;

/// name of the canonical power function every power alias is rewritten to
pub const CANONICAL_POWER: &str = "Pow";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationRule {
    /// `name(E)` becomes `Pow(E, exponent)`; nested calls are rewritten too
    PowerAlias { name: String, exponent: u32 },
    /// `from(` becomes `to(`
    Rename { from: String, to: String },
    /// `^N` with N an unsigned integer literal becomes `**N`
    CaretPower,
}

impl NormalizationRule {
    pub fn power_alias(name: &str, exponent: u32) -> Self {
        NormalizationRule::PowerAlias {
            name: name.to_string(),
            exponent,
        }
    }

    pub fn rename(from: &str, to: &str) -> Self {
        NormalizationRule::Rename {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// the function name that makes this rule fire, if any
    fn trigger(&self) -> Option<&str> {
        match self {
            NormalizationRule::PowerAlias { name, .. } => Some(name),
            NormalizationRule::Rename { from, .. } => Some(from),
            NormalizationRule::CaretPower => None,
        }
    }

    /// Applies the rule to the whole string; returns the new text and the number of rewrites.
    fn apply(&self, input: &str) -> (String, usize) {
        let tokens = tokenize(input);
        let mut out = String::with_capacity(input.len() + 8);
        let count = match self {
            NormalizationRule::PowerAlias { name, exponent } => {
                rewrite_power_alias(&tokens, name, *exponent, 0, &mut out)
            }
            NormalizationRule::Rename { from, to } => rewrite_rename(&tokens, from, to, &mut out),
            NormalizationRule::CaretPower => rewrite_caret(&tokens, &mut out),
        };
        (out, count)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// position of the `(` directly following the token at `i` (whitespace allowed in between)
fn call_bracket(tokens: &[Token], i: usize) -> Option<usize> {
    next_significant(tokens, i + 1).filter(|&j| tokens[j].kind == TokenKind::LParen)
}

/// `level` is the number of brackets enclosing `tokens`. Calls at or past `MAX_DEPTH` are
/// copied untouched; the parser rejects that depth anyway.
fn rewrite_power_alias(
    tokens: &[Token],
    name: &str,
    exponent: u32,
    level: usize,
    out: &mut String,
) -> usize {
    let mut count = 0;
    let mut level = level;
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token.kind == TokenKind::Ident && token.text == name && level < MAX_DEPTH {
            let close = call_bracket(tokens, i)
                .and_then(|open| find_pair_to_this_bracket(tokens, open).map(|close| (open, close)));
            // an unclosed call is left alone, the parser reports it
            if let Some((open, close)) = close {
                out.push_str(CANONICAL_POWER);
                out.push('(');
                count += 1
                    + rewrite_power_alias(&tokens[open + 1..close], name, exponent, level + 1, out);
                out.push_str(&format!(", {})", exponent));
                i = close + 1;
                continue;
            }
        }
        match token.kind {
            TokenKind::LParen => level += 1,
            TokenKind::RParen => level = level.saturating_sub(1),
            _ => {}
        }
        out.push_str(token.text);
        i += 1;
    }
    count
}

fn rewrite_rename(tokens: &[Token], from: &str, to: &str, out: &mut String) -> usize {
    let mut count = 0;
    for (i, token) in tokens.iter().enumerate() {
        if token.kind == TokenKind::Ident && token.text == from && call_bracket(tokens, i).is_some()
        {
            out.push_str(to);
            count += 1;
        } else {
            out.push_str(token.text);
        }
    }
    count
}

fn rewrite_caret(tokens: &[Token], out: &mut String) -> usize {
    let mut count = 0;
    for (i, token) in tokens.iter().enumerate() {
        let integer_follows = next_significant(tokens, i + 1)
            .map(|j| &tokens[j])
            .is_some_and(|next| {
                next.kind == TokenKind::Number && next.text.chars().all(|c| c.is_ascii_digit())
            });
        if token.kind == TokenKind::Caret && integer_follows {
            out.push_str("**");
            count += 1;
        } else {
            out.push_str(token.text);
        }
    }
    count
}

/// Ordered list of rewrite rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
    rules: Vec<NormalizationRule>,
}

impl Normalizer {
    /// Validates the rule set. Rejected:
    /// - trigger names that are not identifiers, or that equal `Pow`
    /// - rename targets that are themselves a trigger of some rule
    pub fn new(rules: Vec<NormalizationRule>) -> Result<Self, String> {
        let triggers: Vec<&str> = rules.iter().filter_map(|r| r.trigger()).collect();
        for rule in &rules {
            if let Some(trigger) = rule.trigger() {
                if !is_identifier(trigger) {
                    return Err(format!("'{}' is not a valid function name", trigger));
                }
                if trigger == CANONICAL_POWER {
                    return Err(format!("'{}' cannot be rewritten", CANONICAL_POWER));
                }
            }
            if let NormalizationRule::Rename { to, .. } = rule {
                if !is_identifier(to) {
                    return Err(format!("'{}' is not a valid function name", to));
                }
                if triggers.contains(&to.as_str()) {
                    return Err(format!(
                        "rename target '{}' is rewritten by another rule",
                        to
                    ));
                }
            }
        }
        Ok(Normalizer { rules })
    }

    pub fn rules(&self) -> &[NormalizationRule] {
        &self.rules
    }

    /// Rewrites one raw equation into the canonical grammar.
    pub fn normalize(&self, input: &str) -> String {
        let mut current = input.to_string();
        let mut rewrites = 0;
        for rule in &self.rules {
            let (next, count) = rule.apply(&current);
            if count > 0 {
                current = next;
                rewrites += count;
            }
        }
        if rewrites == 0 {
            debug!("nothing to normalize in '{}'", input);
        } else {
            debug!("normalized '{}' -> '{}' ({} rewrites)", input, current, rewrites);
        }
        current
    }
}

impl Default for Normalizer {
    /// `square` and `cube` aliases plus caret powers
    fn default() -> Self {
        Normalizer {
            rules: vec![
                NormalizationRule::power_alias("square", 2),
                NormalizationRule::power_alias("cube", 3),
                NormalizationRule::CaretPower,
            ],
        }
    }
}
