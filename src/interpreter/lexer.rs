use std::{
    iter::FusedIterator,
    sync::mpsc::{self, Receiver},
    thread::Scope,
};

use logos::Logos;
use strum::{AsRefStr, Display, EnumString};
use tracing::{debug, trace};

use crate::interpreter::{node::Operator, value::core::Pos};

/// Raw lexemes recognised by the scanner's state machine.
///
/// `logos` compiles these patterns into a single deterministic automaton that
/// always takes the longest match, so `**`, `//`, `<<` and `>>` win over their
/// one-character prefixes and `b101` wins over the identifier `b`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    #[regex(r"[ \t\r\n]+")]
    Space,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("=")]
    Equals,
    #[token("+")]
    Add,
    #[token("-")]
    Sub,
    #[token("**")]
    Exp,
    #[token("*")]
    Mult,
    #[token("//")]
    Fdiv,
    #[token("/")]
    Div,
    #[token("&")]
    And,
    #[token("|")]
    Or,
    #[token("^")]
    Xor,
    #[token("~")]
    Inv,
    #[token("%")]
    Mod,
    #[token("<<")]
    LShift,
    #[token(">>")]
    RShift,
    /// `b0101`, `0xff`, `123`, `1.5`, `0755`
    #[regex(r"b[01]+")]
    #[regex(r"0[xX][0-9a-fA-F]*")]
    #[regex(r"[0-9]+(\.[0-9]*)?")]
    Number,
    /// `$` followed by letters and underscores.
    #[regex(r"\$[a-zA-Z_]*")]
    Variable,
    /// A letter followed by letters and underscores.
    #[regex(r"[a-zA-Z][a-zA-Z_]*")]
    Text,
}

/// Built-in function names. A text item that spells one of these exactly is
/// reclassified as the keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    /// `abs(...)`
    Abs,
    /// `dec(...)`
    Dec,
    /// `hex(...)`
    Hex,
    /// `bin(...)`
    Bin,
    /// `oct(...)`
    Oct,
    /// `save(name)`
    Save,
    /// `load(name)`
    Load,
    /// `clear()`
    Clear,
}

/// Kind of a lexical item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Scanning failed; the item text is the message.
    Error,
    /// End of input.
    End,
    /// One or more whitespace characters, collapsed.
    Space,
    /// `=`
    Equals,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// A number literal.
    Number,
    /// `$name`
    Variable,
    /// A binary operator.
    Operator(Operator),
    /// A bare identifier that is not a keyword.
    Text,
    /// A built-in function name.
    Keyword(Keyword),
}

/// One lexical item: its kind, the text it was scanned from, and where that
/// text starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// What was scanned.
    pub kind: ItemKind,
    /// The source text, `" "` for whitespace, the message for errors, and
    /// empty for the end of input.
    pub text: String,
    /// Byte offset of the first character.
    pub pos:  Pos,
}

impl Item {
    fn new(kind: ItemKind, text: impl Into<String>, pos: Pos) -> Self {
        Self { kind,
               text: text.into(),
               pos }
    }

    /// Byte offset just past the item's source text.
    #[must_use]
    pub fn end(&self) -> Pos {
        match self.kind {
            ItemKind::Error | ItemKind::End | ItemKind::Space => self.pos,
            _ => self.pos + self.text.len(),
        }
    }
}

/// Streaming scanner over one input line.
///
/// Yields items lazily, in order, and exactly once. The last item is always
/// either [`ItemKind::End`] or [`ItemKind::Error`]; after that the scanner is
/// exhausted for good.
///
/// # Example
/// ```
/// use radcalc::interpreter::lexer::{ItemKind, Scanner};
///
/// let kinds: Vec<ItemKind> = Scanner::new("$x = 1").map(|item| item.kind).collect();
/// assert_eq!(kinds,
///            [ItemKind::Variable,
///             ItemKind::Space,
///             ItemKind::Equals,
///             ItemKind::Space,
///             ItemKind::Number,
///             ItemKind::End]);
/// ```
pub struct Scanner<'src> {
    lexer:    logos::Lexer<'src, Lexeme>,
    len:      usize,
    finished: bool,
}

impl<'src> Scanner<'src> {
    /// Creates a scanner for `input`.
    #[must_use]
    pub fn new(input: &'src str) -> Self {
        Self { lexer:    Lexeme::lexer(input),
               len:      input.len(),
               finished: false, }
    }

    fn classify(lexeme: Lexeme, text: &str, pos: Pos) -> Item {
        let kind = match lexeme {
            Lexeme::Space => return Item::new(ItemKind::Space, " ", pos),
            Lexeme::LParen => ItemKind::LParen,
            Lexeme::RParen => ItemKind::RParen,
            Lexeme::Equals => ItemKind::Equals,
            Lexeme::Add => ItemKind::Operator(Operator::Add),
            Lexeme::Sub => ItemKind::Operator(Operator::Sub),
            Lexeme::Exp => ItemKind::Operator(Operator::Exp),
            Lexeme::Mult => ItemKind::Operator(Operator::Mult),
            Lexeme::Fdiv => ItemKind::Operator(Operator::Fdiv),
            Lexeme::Div => ItemKind::Operator(Operator::Div),
            Lexeme::And => ItemKind::Operator(Operator::And),
            Lexeme::Or => ItemKind::Operator(Operator::Or),
            Lexeme::Xor => ItemKind::Operator(Operator::Xor),
            Lexeme::Inv => ItemKind::Operator(Operator::Inv),
            Lexeme::Mod => ItemKind::Operator(Operator::Mod),
            Lexeme::LShift => ItemKind::Operator(Operator::LShift),
            Lexeme::RShift => ItemKind::Operator(Operator::RShift),
            Lexeme::Number => ItemKind::Number,
            Lexeme::Variable => ItemKind::Variable,
            Lexeme::Text => text.parse::<Keyword>().map_or(ItemKind::Text, ItemKind::Keyword),
        };
        Item::new(kind, text, pos)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Item;

    fn next(&mut self) -> Option<Item> {
        if self.finished {
            return None;
        }

        let item = match self.lexer.next() {
            Some(Ok(lexeme)) => Self::classify(lexeme, self.lexer.slice(), self.lexer.span().start),
            Some(Err(())) => {
                self.finished = true;
                let unexpected = self.lexer.slice().chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
                Item::new(ItemKind::Error, format!("Unexpected {unexpected}"), self.lexer.span().start)
            },
            None => {
                self.finished = true;
                Item::new(ItemKind::End, "", self.len)
            },
        };

        trace!(kind = ?item.kind, text = %item.text, pos = item.pos, "scanned");
        Some(item)
    }
}

impl FusedIterator for Scanner<'_> {}

/// Runs a [`Scanner`] on its own thread inside `scope`, handing items over one
/// at a time.
///
/// The channel has no buffer: the scanner blocks after each item until the
/// consumer takes it. Dropping the receiver stops the scanner at its next
/// send, so the scope can always be joined.
pub fn stream<'scope, 'env>(scope: &'scope Scope<'scope, 'env>, input: &'env str) -> Receiver<Item> {
    let (sender, receiver) = mpsc::sync_channel(0);

    scope.spawn(move || {
        for item in Scanner::new(input) {
            if sender.send(item).is_err() {
                debug!("item consumer hung up, scanner stopped early");
                break;
            }
        }
    });

    receiver
}
