use std::fmt;
use log::debug;

/// The reserved end-of-input marker. It may not appear in user expressions.
pub const END_MARKER: char = '#';

/// An atomic alphabet element.
#[derive(Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub enum Symbol {
    /// An ordinary input character.
    Char(char),
    /// The end marker appended to every expression. Never part of the alphabet.
    End,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Symbol::Char(c) => write!(f, "{}", c),
            Symbol::End => write!(f, "{}", END_MARKER),
        }
    }
}

/// A classified piece of an expression.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Token {
    Symbol(Symbol),
    /// Concatenation, `.`.
    Concat,
    /// Union, `|`.
    Union,
    /// Kleene closure, `*`.
    Star,
    Open,
    Close,
}

impl Token {
    fn classify(c: char) -> Token {
        match c {
            '.' => Token::Concat,
            '|' => Token::Union,
            '*' => Token::Star,
            '(' => Token::Open,
            ')' => Token::Close,
            c => Token::Symbol(Symbol::Char(c)),
        }
    }
    /// Whether a subexpression can end with this token.
    fn ends_operand(self) -> bool {
        matches!(self, Token::Symbol(_) | Token::Close | Token::Star)
    }
    /// Whether a subexpression can start with this token.
    fn starts_operand(self) -> bool {
        matches!(self, Token::Symbol(_) | Token::Open)
    }
    fn precedence(self) -> u8 {
        match self {
            Token::Star => 3,
            Token::Concat => 2,
            Token::Union => 1,
            _ => 0,
        }
    }
    pub fn as_char(self) -> char {
        match self {
            Token::Symbol(Symbol::Char(c)) => c,
            Token::Symbol(Symbol::End) => END_MARKER,
            Token::Concat => '.',
            Token::Union => '|',
            Token::Star => '*',
            Token::Open => '(',
            Token::Close => ')',
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A token together with where it came from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Lexeme {
    pub token: Token,
    /// Character offset into the raw expression. Inserted tokens take the
    /// offset of the raw token that follows them.
    pub offset: usize,
    /// True for the wrapping parentheses, the end marker and implicit
    /// concatenations.
    pub synthetic: bool,
}

impl Lexeme {
    fn synthetic(token: Token, offset: usize) -> Lexeme {
        Lexeme { token: token, offset: offset, synthetic: true }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ParseError {
    /// The end marker was used as an ordinary symbol.
    ReservedSymbol(usize),
    UnmatchedOpen(usize),
    UnmatchedClose(usize),
    /// A `()` group with nothing inside.
    EmptyGroup(usize),
    /// An operator without enough operands.
    MissingOperand(char, usize),
    /// The expression did not reduce to exactly one tree.
    Incomplete,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseError::ReservedSymbol(at) => {
                write!(f, "reserved end marker `{}` at offset {}", END_MARKER, at)
            }
            ParseError::UnmatchedOpen(at) => write!(f, "unmatched '(' at offset {}", at),
            ParseError::UnmatchedClose(at) => write!(f, "unmatched ')' at offset {}", at),
            ParseError::EmptyGroup(at) => write!(f, "empty group at offset {}", at),
            ParseError::MissingOperand(op, at) => {
                write!(f, "missing operand for `{}` at offset {}", op, at)
            }
            ParseError::Incomplete => write!(f, "expression could not be parsed"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Classifies `expr`, wraps it as `(expr)#` and makes every implicit
/// concatenation explicit. The empty expression becomes `(#)`.
///
/// Apart from rejecting the end marker, no validation happens here.
pub fn normalize(expr: &str) -> Result<Vec<Lexeme>, ParseError> {
    let len = expr.chars().count();
    let mut augmented = Vec::with_capacity(len + 3);
    augmented.push(Lexeme::synthetic(Token::Open, 0));
    for (offset, c) in expr.chars().enumerate() {
        if c == END_MARKER {
            return Err(ParseError::ReservedSymbol(offset));
        }
        augmented.push(Lexeme { token: Token::classify(c), offset: offset, synthetic: false });
    }
    if len == 0 {
        augmented.push(Lexeme::synthetic(Token::Symbol(Symbol::End), 0));
        augmented.push(Lexeme::synthetic(Token::Close, 0));
    } else {
        augmented.push(Lexeme::synthetic(Token::Close, len));
        augmented.push(Lexeme::synthetic(Token::Symbol(Symbol::End), len));
    }

    let mut result = Vec::with_capacity(augmented.len() * 2);
    for (i, &lexeme) in augmented.iter().enumerate() {
        result.push(lexeme);
        if let Some(next) = augmented.get(i + 1) {
            if lexeme.token.ends_operand() && next.token.starts_operand() {
                result.push(Lexeme::synthetic(Token::Concat, next.offset));
            }
        }
    }
    debug!("normalized {:?} into {} tokens", expr, result.len());
    Ok(result)
}

/// Shunting-yard conversion of a normalized expression to postfix order.
/// Parentheses are checked for balance and never emitted.
pub fn to_postfix(infix: &[Lexeme]) -> Result<Vec<Lexeme>, ParseError> {
    let mut output = Vec::with_capacity(infix.len());
    let mut stack: Vec<Lexeme> = Vec::new();
    let mut prev = None;
    for &lexeme in infix {
        match lexeme.token {
            // `*` is postfix already.
            Token::Symbol(_) | Token::Star => output.push(lexeme),
            Token::Open => stack.push(lexeme),
            Token::Close => {
                let open = loop {
                    match stack.pop() {
                        Some(open @ Lexeme { token: Token::Open, .. }) => break open,
                        Some(op) => output.push(op),
                        None => return Err(ParseError::UnmatchedClose(lexeme.offset)),
                    }
                };
                // The wrapping parentheses only ever match each other.
                if open.synthetic && !lexeme.synthetic {
                    return Err(ParseError::UnmatchedClose(lexeme.offset));
                }
                if !open.synthetic && lexeme.synthetic {
                    return Err(ParseError::UnmatchedOpen(open.offset));
                }
                if prev == Some(Token::Open) {
                    return Err(ParseError::EmptyGroup(open.offset));
                }
            }
            Token::Concat | Token::Union => {
                // Both are left-associative; `(` has the lowest precedence and stops the loop.
                while let Some(&top) = stack.last() {
                    if top.token.precedence() < lexeme.token.precedence() {
                        break;
                    }
                    output.push(top);
                    stack.pop();
                }
                stack.push(lexeme);
            }
        }
        prev = Some(lexeme.token);
    }
    while let Some(lexeme) = stack.pop() {
        if lexeme.token == Token::Open {
            return Err(ParseError::UnmatchedOpen(lexeme.offset));
        }
        output.push(lexeme);
    }
    Ok(output)
}
