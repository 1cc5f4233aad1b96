use std::thread;

use tracing::{debug, trace};

use crate::{
    error::{ParseError, ParseFailure},
    interpreter::{
        lexer::{self, Item, ItemKind, Keyword},
        node::{Node, NodeKind},
        value::core::Pos,
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses one input line into a validated, flat node sequence.
///
/// The scanner runs concurrently on a scoped thread and hands items over one
/// at a time. On success the sequence ends with [`Node::End`]; on failure the
/// returned [`ParseFailure`] holds the nodes accepted so far, ending with
/// [`Node::ParsingStopped`].
///
/// # Errors
/// Returns a `ParseFailure` for lexical errors, grammar violations,
/// unbalanced parentheses, malformed verbs and premature end of input.
///
/// # Example
/// ```
/// use radcalc::interpreter::{node::NodeKind, parser::parse};
///
/// let nodes = parse("2 + -1").unwrap();
/// let text: Vec<String> = nodes.iter().map(ToString::to_string).collect();
/// assert_eq!(text, ["2", "+", "-1", ""]);
/// assert_eq!(nodes.last().unwrap().kind(), NodeKind::End);
///
/// let failure = parse("1 +").unwrap_err();
/// assert_eq!(failure.error.to_string(), "unexpected end of input");
/// assert_eq!(failure.nodes.last().unwrap().kind(), NodeKind::ParsingStopped);
/// ```
pub fn parse(input: &str) -> Result<Vec<Node>, ParseFailure> {
    thread::scope(|scope| Parser::new(lexer::stream(scope, input), input.len()).run())
}

/// Single-pass validating parser.
///
/// Every grammar decision is made from the node immediately to the left of
/// the current item, plus at most one item of lookahead for negative number
/// literals.
pub struct Parser<I> {
    pub(super) items:     I,
    pub(super) peeked:    Option<Item>,
    pub(super) input_len: usize,
    pub(super) depth:     usize,
    pub(super) last_end:  Pos,
    pub(super) nodes:     Vec<Node>,
}

impl<I> Parser<I> where I: Iterator<Item = Item>
{
    /// Creates a parser over an item stream for an input of `input_len`
    /// bytes.
    pub fn new<T>(items: T, input_len: usize) -> Self
        where T: IntoIterator<IntoIter = I>
    {
        Self { items: items.into_iter(),
               peeked: None,
               input_len,
               depth: 0,
               last_end: 0,
               nodes: Vec::new() }
    }

    /// Consumes the whole item stream and returns the node sequence.
    ///
    /// The stream is read to its end or error item even when parsing fails
    /// early, so a scanner feeding it always runs to completion.
    ///
    /// # Errors
    /// See [`parse`].
    pub fn run(mut self) -> Result<Vec<Node>, ParseFailure> {
        match self.read_nodes() {
            Ok(()) => {
                debug!(nodes = self.nodes.len(), "line parsed");
                Ok(self.nodes)
            },
            Err(error) => {
                debug!(%error, pos = self.last_end, "parsing stopped");
                let skipped = self.items.by_ref().count();
                trace!(skipped, "drained remaining items");
                self.nodes.push(Node::ParsingStopped { pos: self.last_end });
                Err(ParseFailure { error,
                                   nodes: self.nodes })
            },
        }
    }

    fn read_nodes(&mut self) -> ParseResult<()> {
        loop {
            let Some(item) = self.next_item()? else {
                return self.finish();
            };

            match item.kind {
                ItemKind::Equals => self.parse_assign(&item)?,
                ItemKind::Number => self.parse_number(item)?,
                ItemKind::Variable => self.parse_variable(item)?,
                ItemKind::Operator(op) => self.parse_operator(op, item)?,
                ItemKind::LParen => self.parse_open_paren(&item)?,
                ItemKind::RParen => self.parse_close_paren(&item)?,
                ItemKind::Keyword(Keyword::Abs) => self.parse_abs(&item)?,
                ItemKind::Keyword(Keyword::Dec | Keyword::Hex | Keyword::Bin | Keyword::Oct) => {
                    self.parse_output(item)?;
                },
                ItemKind::Keyword(verb @ (Keyword::Clear | Keyword::Save | Keyword::Load)) => {
                    return self.parse_verb(verb, &item);
                },
                ItemKind::Text | ItemKind::Space | ItemKind::End | ItemKind::Error => {
                    return Err(ParseError::Unexpected { token: item.text,
                                                        pos:   item.pos, });
                },
            }
        }
    }

    /// Handles end of input: the line must not end on an operator, `(`, `=`
    /// or a function name.
    fn finish(&mut self) -> ParseResult<()> {
        if let Some(left) = self.nodes.last()
           && !left.kind().closes_expression()
        {
            return Err(ParseError::UnexpectedEnd { pos: self.input_len });
        }

        self.nodes.push(Node::End { pos: self.input_len });
        Ok(())
    }

    /// Pulls the next item that is not whitespace, from the lookahead slot
    /// first.
    fn pull(&mut self) -> Option<Item> {
        self.peeked
            .take()
            .or_else(|| self.items.by_ref().find(|item| item.kind != ItemKind::Space))
    }

    /// Returns the next meaningful item, or `None` at end of input.
    ///
    /// Scanner errors and end of input with open parentheses become parse
    /// errors here.
    pub(super) fn next_item(&mut self) -> ParseResult<Option<Item>> {
        let Some(item) = self.pull() else {
            return Err(ParseError::Interrupted { pos: self.last_end });
        };

        match item.kind {
            ItemKind::End if self.depth > 0 => Err(ParseError::UnclosedParen { pos: item.pos }),
            ItemKind::End => Ok(None),
            ItemKind::Error => Err(ParseError::Lex { message: item.text,
                                                     pos:     item.pos, }),
            _ => {
                self.last_end = item.end();
                Ok(Some(item))
            },
        }
    }

    /// Looks at the kind of the next meaningful item without consuming it.
    pub(super) fn peek_kind(&mut self) -> Option<ItemKind> {
        if self.peeked.is_none() {
            self.peeked = self.pull();
        }
        self.peeked.as_ref().map(|item| item.kind)
    }

    /// Kind of the node immediately to the left, if any.
    pub(super) fn left(&self) -> Option<NodeKind> {
        self.nodes.last().map(Node::kind)
    }
}
