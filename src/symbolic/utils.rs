// the collection of utility functions mainly for bracket matching over token streams
use crate::symbolic::lexer::{Token, TokenKind};

/// Index of the `)` closing the `(` at `bracket_start`, or None if the bracket is never closed.
/// `bracket_start` must point at an opening bracket.
pub fn find_pair_to_this_bracket(tokens: &[Token], bracket_start: usize) -> Option<usize> {
    if tokens.get(bracket_start).map(|t| t.kind) != Some(TokenKind::LParen) {
        return None;
    }
    let mut stack = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(bracket_start) {
        match token.kind {
            TokenKind::LParen => stack += 1,
            TokenKind::RParen => {
                stack -= 1;
                if stack == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Index of the next token after `from` that is not whitespace
pub fn next_significant(tokens: &[Token], from: usize) -> Option<usize> {
    (from..tokens.len()).find(|&i| !tokens[i].is_whitespace())
}

/// true if every `(` has a matching `)` and no `)` comes before its `(`
pub fn brackets_balanced(tokens: &[Token]) -> bool {
    let mut depth: i64 = 0;
    for token in tokens {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::lexer::tokenize;

    #[test]
    fn test_find_pair_to_this_bracket() {
        let tokens = tokenize("f((a)+(b))+c");
        assert_eq!(find_pair_to_this_bracket(&tokens, 1), Some(9));
        assert_eq!(find_pair_to_this_bracket(&tokens, 2), Some(4));
        // not a bracket
        assert_eq!(find_pair_to_this_bracket(&tokens, 0), None);
    }

    #[test]
    fn test_find_pair_unclosed() {
        let tokens = tokenize("bad(((");
        assert_eq!(find_pair_to_this_bracket(&tokens, 1), None);
    }

    #[test]
    fn test_next_significant() {
        let tokens = tokenize("square  (x0)");
        assert_eq!(next_significant(&tokens, 1), Some(2));
        assert_eq!(tokens[2].kind, TokenKind::LParen);
        assert_eq!(next_significant(&tokens, tokens.len()), None);
    }

    #[test]
    fn test_brackets_balanced() {
        assert!(brackets_balanced(&tokenize("(x0 + (x1))")));
        assert!(!brackets_balanced(&tokenize("(x0 + x1")));
        assert!(!brackets_balanced(&tokenize(")x0(")));
    }
}
