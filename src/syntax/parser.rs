use crate::syntax::{self, Inst, Pattern, Position, Span, Value};
use std::{borrow::Borrow, cell::Cell, mem, result};

type Result<T> = result::Result<T, syntax::Error>;

/// Parses `pattern` into its postfix instruction sequence.
pub fn parse(pattern: &str) -> Result<Vec<Inst>> {
    Parser::new(pattern.to_owned()).parse()
}

/// Operator-precedence parser that emits postfix instructions as it goes.
///
/// Precedence, tightest first: quantifiers, concatenation, `&`, `|`. The
/// boolean operators are only legal at the top level of a `[ ... ]` group.
pub struct Parser {
    p: String,
    pos: Cell<Position>,
    stack: Vec<GroupState>,
    insts: Vec<Inst>,
    last: Last,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GroupKind {
    Paren,
    Bracket,
}

struct GroupState {
    kind: GroupKind,
    open: Span,
    outer: Sequence,
}

/// What the previous significant input was; quantifier legality depends on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Last {
    Nothing,
    Space,
    Operand,
    Quantifier,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BoolOp {
    Or,
    And,
}

impl BoolOp {
    fn precedence(self) -> u8 {
        match self {
            BoolOp::Or => 1,
            BoolOp::And => 2,
        }
    }

    fn inst(self) -> Inst {
        match self {
            BoolOp::Or => Inst::Or,
            BoolOp::And => Inst::And,
        }
    }
}

/// Bookkeeping for the group currently being parsed.
#[derive(Default)]
struct Sequence {
    /// Finished terms in the current concatenation run.
    terms: usize,
    /// A term has been emitted but may still receive a quantifier.
    pending: bool,
    ops: Vec<BoolOp>,
}

impl Parser {
    pub fn new(p: String) -> Self {
        Parser {
            p: p,
            pos: Cell::new(Position::new(0)),
            stack: vec![],
            insts: vec![],
            last: Last::Nothing,
        }
    }

    fn pattern(&self) -> &str {
        self.p.borrow()
    }

    fn pos(&self) -> Position {
        self.pos.get()
    }

    fn span(&self) -> Span {
        Span::point(self.pos())
    }

    fn span_char(&self) -> Span {
        let len = self.peek().map_or(0, char::len_utf8);
        Span::new(self.pos(), Position::new(self.offset() + len))
    }

    fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.pos())
    }

    fn error(&self, span: Span, kind: syntax::ErrorKind) -> syntax::Error {
        syntax::Error {
            kind,
            pattern: self.pattern().to_string(),
            span,
        }
    }

    fn offset(&self) -> usize {
        self.pos().offset
    }

    fn bump(&self) -> bool {
        match self.peek() {
            None => false,
            Some(c) => {
                self.pos.set(Position::new(self.offset() + c.len_utf8()));
                !self.is_eof()
            }
        }
    }

    fn is_eof(&self) -> bool {
        self.offset() == self.p.len()
    }

    fn peek(&self) -> Option<char> {
        self.pattern()[self.offset()..].chars().next()
    }

    fn bump_while(&self, f: impl Fn(char) -> bool) -> &str {
        let start = self.offset();
        while self.peek().map_or(false, &f) {
            self.bump();
        }
        &self.pattern()[start..self.offset()]
    }

    fn skip_whitespace(&self) {
        self.bump_while(|c| c.is_ascii_whitespace());
    }

    pub fn parse(&mut self) -> Result<Vec<Inst>> {
        let mut seq = Sequence::default();
        while let Some(c) = self.peek() {
            match c {
                c if c.is_ascii_whitespace() => {
                    self.bump();
                    self.last = Last::Space;
                }
                '(' => seq = self.push_group(seq, GroupKind::Paren),
                '[' => seq = self.push_group(seq, GroupKind::Bracket),
                ')' => seq = self.pop_group(seq, GroupKind::Paren)?,
                ']' => seq = self.pop_group(seq, GroupKind::Bracket)?,
                '|' => self.push_operator(&mut seq, BoolOp::Or)?,
                '&' => self.push_operator(&mut seq, BoolOp::And)?,
                '?' => self.parse_repetition(&mut seq, Inst::Maybe)?,
                '*' => self.parse_repetition(&mut seq, Inst::Star)?,
                '+' => self.parse_repetition(&mut seq, Inst::Plus)?,
                '/' => {
                    let re = self.parse_pattern()?;
                    self.push_atom(&mut seq, Inst::Regexp(re));
                }
                '{' => {
                    let (name, value) = self.parse_attribute()?;
                    self.push_atom(&mut seq, Inst::Attr(name, value));
                }
                c if c.is_ascii_alphanumeric() => {
                    let word = self.parse_word();
                    self.push_atom(&mut seq, Inst::Word(word));
                }
                _ => return Err(self.error(self.span_char(), syntax::ErrorKind::UnexpectedChar)),
            }
        }
        self.pop_end(seq)
    }

    fn push_atom(&mut self, seq: &mut Sequence, inst: Inst) {
        self.finish_term(seq);
        self.insts.push(inst);
        seq.pending = true;
        self.last = Last::Operand;
    }

    /// Closes the pending term, concatenating it onto the run before it.
    fn finish_term(&mut self, seq: &mut Sequence) {
        if !seq.pending {
            return;
        }
        seq.pending = false;
        seq.terms += 1;
        if seq.terms >= 2 {
            self.insts.push(Inst::Concat);
        }
    }

    /// A maximal run of ASCII letters, or of ASCII digits.
    fn parse_word(&self) -> String {
        let word = match self.peek() {
            Some(c) if c.is_ascii_digit() => self.bump_while(|c| c.is_ascii_digit()),
            _ => self.bump_while(|c| c.is_ascii_alphabetic()),
        };
        word.to_string()
    }

    fn parse_pattern(&self) -> Result<Pattern> {
        assert_eq!(self.peek(), Some('/'));
        let start = self.pos();
        self.bump();

        let mut source = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(self.error(self.span_from(start), syntax::ErrorKind::PatternUnclosed))
                }
                Some('/') => break,
                Some('\\') => {
                    self.bump();
                    match self.peek() {
                        None => {
                            return Err(
                                self.error(self.span_from(start), syntax::ErrorKind::PatternUnclosed)
                            )
                        }
                        Some('/') => source.push('/'),
                        Some(c) => {
                            source.push('\\');
                            source.push(c);
                        }
                    }
                }
                Some(c) => source.push(c),
            }
            self.bump();
        }
        self.bump();

        Pattern::new(&source).map_err(|err| {
            self.error(
                self.span_from(start),
                syntax::ErrorKind::PatternInvalid(err.to_string()),
            )
        })
    }

    /// `{ name : value }`, whitespace allowed around every part.
    fn parse_attribute(&self) -> Result<(String, Value)> {
        assert_eq!(self.peek(), Some('{'));
        let start = self.pos();
        let malformed =
            |p: &Parser| p.error(p.span_from(start), syntax::ErrorKind::AttributeMalformed);
        self.bump();

        self.skip_whitespace();
        let name = self
            .bump_while(|c| c.is_ascii_alphanumeric() || c == '_')
            .to_string();
        if name.is_empty() {
            return Err(malformed(self));
        }

        self.skip_whitespace();
        if self.peek() != Some(':') {
            return Err(malformed(self));
        }
        self.bump();
        self.skip_whitespace();

        let value = match self.peek() {
            Some('/') => Value::Pattern(self.parse_pattern()?),
            Some(c) if c.is_ascii_alphanumeric() => Value::Literal(self.parse_word()),
            _ => return Err(malformed(self)),
        };

        self.skip_whitespace();
        if self.peek() != Some('}') {
            return Err(malformed(self));
        }
        self.bump();
        Ok((name, value))
    }

    fn parse_repetition(&mut self, seq: &mut Sequence, inst: Inst) -> Result<()> {
        let kind = match self.last {
            Last::Operand => None,
            Last::Quantifier => Some(syntax::ErrorKind::RepetitionStacked),
            Last::Space if seq.pending => Some(syntax::ErrorKind::RepetitionAfterWhitespace),
            Last::Space | Last::Nothing => Some(syntax::ErrorKind::RepetitionMissing),
        };
        if let Some(kind) = kind {
            return Err(self.error(self.span_char(), kind));
        }

        self.insts.push(inst);
        self.bump();
        self.last = Last::Quantifier;
        Ok(())
    }

    fn push_group(&mut self, mut seq: Sequence, kind: GroupKind) -> Sequence {
        self.finish_term(&mut seq);
        self.stack.push(GroupState {
            kind,
            open: self.span_char(),
            outer: seq,
        });
        self.bump();
        self.last = Last::Nothing;
        Sequence::default()
    }

    fn pop_group(&mut self, mut seq: Sequence, kind: GroupKind) -> Result<Sequence> {
        self.finish_term(&mut seq);
        let group = match self.stack.pop() {
            None => return Err(self.error(self.span_char(), syntax::ErrorKind::GroupUnopened)),
            Some(group) if group.kind != kind => {
                return Err(self.error(self.span_char(), syntax::ErrorKind::GroupMismatch))
            }
            Some(group) => group,
        };
        self.bump();
        let span = Span::new(group.open.start, self.pos());
        self.close_sequence(seq, span, syntax::ErrorKind::EmptyGroup)?;

        let mut outer = group.outer;
        outer.pending = true;
        self.last = Last::Operand;
        Ok(outer)
    }

    fn push_operator(&mut self, seq: &mut Sequence, op: BoolOp) -> Result<()> {
        match self.stack.last() {
            Some(GroupState {
                kind: GroupKind::Bracket,
                ..
            }) => {}
            _ => {
                return Err(self.error(
                    self.span_char(),
                    syntax::ErrorKind::OperatorOutsideBracket,
                ))
            }
        }

        self.finish_term(seq);
        if seq.terms == 0 {
            return Err(self.error(self.span_char(), syntax::ErrorKind::MissingOperand));
        }
        while let Some(&top) = seq.ops.last() {
            if top.precedence() < op.precedence() {
                break;
            }
            seq.ops.pop();
            self.insts.push(top.inst());
        }
        seq.ops.push(op);
        seq.terms = 0;
        self.bump();
        self.last = Last::Nothing;
        Ok(())
    }

    /// Flushes the pending boolean operators of a finished sequence.
    fn close_sequence(&mut self, seq: Sequence, span: Span, empty: syntax::ErrorKind) -> Result<()> {
        if seq.terms == 0 {
            let kind = if seq.ops.is_empty() {
                empty
            } else {
                syntax::ErrorKind::MissingOperand
            };
            return Err(self.error(span, kind));
        }
        for op in seq.ops.into_iter().rev() {
            self.insts.push(op.inst());
        }
        Ok(())
    }

    fn pop_end(&mut self, mut seq: Sequence) -> Result<Vec<Inst>> {
        self.finish_term(&mut seq);
        if let Some(group) = self.stack.pop() {
            return Err(self.error(group.open, syntax::ErrorKind::GroupUnclosed));
        }
        self.close_sequence(seq, self.span(), syntax::ErrorKind::EmptyPattern)?;
        Ok(mem::take(&mut self.insts))
    }
}
