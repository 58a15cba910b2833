/// Lossless tokenizer for equation strings.
///
/// Every character of the input ends up in exactly one token, whitespace included, so
/// concatenating the token texts gives the input back. The normalizer relies on that to
/// pass untouched text through byte for byte; the parser simply skips whitespace.
/// Characters that belong to no token class become `Unknown` tokens instead of making
/// the tokenizer fail - rejecting them is the parser's job.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, anychar, char, digit0, digit1, multispace1, one_of},
    combinator::{map, opt, recognize},
    multi::many0,
    sequence::pair,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    Number,
    Ident,
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// byte offset in the tokenized string
    pub offset: usize,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, text: &'a str) -> Self {
        Token {
            kind,
            text,
            offset: 0,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }
}

fn whitespace(input: &str) -> IResult<&str, Token<'_>> {
    map(multispace1, |s| Token::new(TokenKind::Whitespace, s)).parse(input)
}

/// exponent part of a float literal: e-5, E+10, e3
fn exponent(input: &str) -> IResult<&str, &str> {
    recognize((one_of("eE"), opt(one_of("+-")), digit1)).parse(input)
}

/// unsigned numeric literal: 2, 2.5, 2., .5, 1e-5, 2.5E+3
fn number(input: &str) -> IResult<&str, Token<'_>> {
    let leading_digits = recognize((digit1, opt(pair(char('.'), digit0)), opt(exponent)));
    let leading_dot = recognize((char('.'), digit1, opt(exponent)));
    map(alt((leading_digits, leading_dot)), |s| {
        Token::new(TokenKind::Number, s)
    })
    .parse(input)
}

/// identifier: letter or underscore followed by letters, digits and underscores
fn identifier(input: &str) -> IResult<&str, Token<'_>> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, |s| Token::new(TokenKind::Ident, s)).parse(input)
}

fn single_char_token(s: &str) -> Token<'_> {
    let kind = match s {
        "+" => TokenKind::Plus,
        "-" => TokenKind::Minus,
        "*" => TokenKind::Star,
        "/" => TokenKind::Slash,
        "^" => TokenKind::Caret,
        "(" => TokenKind::LParen,
        ")" => TokenKind::RParen,
        _ => TokenKind::Comma,
    };
    Token::new(kind, s)
}

fn operator(input: &str) -> IResult<&str, Token<'_>> {
    let double_star = map(tag("**"), |s| Token::new(TokenKind::DoubleStar, s));
    let single = map(recognize(one_of("+-*/^(),")), single_char_token);
    alt((double_star, single)).parse(input)
}

fn unknown(input: &str) -> IResult<&str, Token<'_>> {
    map(recognize(anychar), |s| Token::new(TokenKind::Unknown, s)).parse(input)
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((whitespace, number, identifier, operator, unknown)).parse(input)
}

/// Splits the whole input into tokens. Never fails: `token` accepts any character.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        let offset = input.len() - rest.len();
        match token(rest) {
            Ok((remaining, mut tok)) => {
                tok.offset = offset;
                tokens.push(tok);
                rest = remaining;
            }
            Err(_) => {
                tokens.push(Token {
                    kind: TokenKind::Unknown,
                    text: rest,
                    offset,
                });
                break;
            }
        }
    }
    tokens
}
