use std::fmt::{self, Debug};
pub mod parser;

pub use self::parser::{parse, Parser};

/// One step of a postfix program. Atoms push a fragment; operators pop
/// their operands (two for `Concat`, `Or`, `And`; one for the quantifiers)
/// and push the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    /// `a` or `42`: the default attribute equals the literal.
    Word(String),
    /// `/re/`: the pattern is found in the default attribute.
    Regexp(Pattern),
    /// `{ name : value }`
    Attr(String, Value),
    Concat,
    Or,
    And,
    Maybe,
    Star,
    Plus,
}

impl Inst {
    /// Returns how many operands this instruction pops.
    pub fn arity(&self) -> usize {
        match *self {
            Inst::Word(_) | Inst::Regexp(_) | Inst::Attr(..) => 0,
            Inst::Maybe | Inst::Star | Inst::Plus => 1,
            Inst::Concat | Inst::Or | Inst::And => 2,
        }
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Inst::Word(ref w) => f.write_str(w),
            Inst::Regexp(ref re) => fmt::Display::fmt(re, f),
            Inst::Attr(ref name, ref value) => write!(f, "{{{}:{}}}", name, value),
            Inst::Concat => f.write_str("."),
            Inst::Or => f.write_str("|"),
            Inst::And => f.write_str("&"),
            Inst::Maybe => f.write_str("?"),
            Inst::Star => f.write_str("*"),
            Inst::Plus => f.write_str("+"),
        }
    }
}

/// The right hand side of an attribute test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Literal(String),
    Pattern(Pattern),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Value::Literal(ref s) => f.write_str(s),
            Value::Pattern(ref re) => fmt::Display::fmt(re, f),
        }
    }
}

/// A compiled character-level regular expression from a `/…/` token.
#[derive(Clone)]
pub struct Pattern(regex::Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Pattern, regex::Error> {
        regex::Regex::new(source).map(Pattern)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// True when the pattern occurs anywhere in `haystack`.
    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Pattern) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.as_str())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Position {
    pub offset: usize,
}
impl Position {
    pub fn new(offset: usize) -> Position {
        Position { offset }
    }
}

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn point(pos: Position) -> Span {
        Span {
            start: pos,
            end: pos,
        }
    }

    pub(crate) fn new(start: Position, end: Position) -> Span {
        Span { start, end }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({:?}, {:?})", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.offset, self.end.offset)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("syntax error: {kind} at {span} in {pattern:?}")]
pub struct Error {
    kind: ErrorKind,
    pattern: String,
    span: Span,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    #[error("unexpected character")]
    UnexpectedChar,
    #[error("empty pattern")]
    EmptyPattern,
    #[error("empty group")]
    EmptyGroup,
    #[error("closing delimiter without an open group")]
    GroupUnopened,
    #[error("unclosed group")]
    GroupUnclosed,
    #[error("closing delimiter does not match the open group")]
    GroupMismatch,
    #[error("operator is missing an operand")]
    MissingOperand,
    #[error("'|' and '&' are only allowed directly inside [ ... ]")]
    OperatorOutsideBracket,
    #[error("quantifier without an operand")]
    RepetitionMissing,
    #[error("quantifier must directly follow its operand")]
    RepetitionAfterWhitespace,
    #[error("quantifier applied to a quantifier")]
    RepetitionStacked,
    #[error("malformed attribute, expected {{ name : value }}")]
    AttributeMalformed,
    #[error("unterminated /.../ pattern")]
    PatternUnclosed,
    #[error("invalid pattern: {0}")]
    PatternInvalid(String),
}
