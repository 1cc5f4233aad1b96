use std::fmt;

use strum::{AsRefStr, Display, EnumString};

use crate::interpreter::value::core::{Number, NumberSystem, Pos};

/// The binary operators of the language.
///
/// The `strum` serializations are the operator spellings, so an operator can
/// be printed with `to_string()` and recovered with `str::parse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum Operator {
    /// `+`
    #[strum(serialize = "+")]
    Add,
    /// `-`
    #[strum(serialize = "-")]
    Sub,
    /// `*`
    #[strum(serialize = "*")]
    Mult,
    /// `**`
    #[strum(serialize = "**")]
    Exp,
    /// `/`
    #[strum(serialize = "/")]
    Div,
    /// `//`
    #[strum(serialize = "//")]
    Fdiv,
    /// `&`
    #[strum(serialize = "&")]
    And,
    /// `|`
    #[strum(serialize = "|")]
    Or,
    /// `^`
    #[strum(serialize = "^")]
    Xor,
    /// `~`
    #[strum(serialize = "~")]
    Inv,
    /// `%`
    #[strum(serialize = "%")]
    Mod,
    /// `<<`
    #[strum(serialize = "<<")]
    LShift,
    /// `>>`
    #[strum(serialize = ">>")]
    RShift,
}

/// Precedence tier of an operator. Lower tiers bind tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// `**`
    Exponent,
    /// `* / // % & | ^ ~ << >>`
    Multiplicative,
    /// `+ -`
    Additive,
}

impl Operator {
    /// Returns the precedence tier the evaluator reduces this operator in.
    #[must_use]
    pub const fn tier(self) -> Tier {
        match self {
            Self::Exp => Tier::Exponent,
            Self::Add | Self::Sub => Tier::Additive,
            _ => Tier::Multiplicative,
        }
    }
}

/// The persistence verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DiskVerb {
    /// `save(name)`
    Save,
    /// `load(name)`
    Load,
}

/// Discriminant of a [`Node`], used for grammar checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `$foo =`
    Assign,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `123`, `0.5`, `0xff`, `b101`, `0755`
    Number,
    /// `$foo`
    Variable,
    /// Any binary operator.
    Operator(Operator),
    /// `abs`
    Abs,
    /// `dec`, `hex`, `bin`, `oct`
    SetOutput,
    /// `save(name)`
    Save,
    /// `load(name)`
    Load,
    /// `clear()`
    Clear,
    /// Successful end of input.
    End,
    /// Parsing failed after the preceding nodes.
    ParsingStopped,
}

impl NodeKind {
    /// Nodes that evaluate to a value: numbers and variables.
    #[must_use]
    pub const fn is_value(self) -> bool {
        matches!(self, Self::Number | Self::Variable)
    }

    /// Binary operators.
    #[must_use]
    pub const fn is_operator(self) -> bool {
        matches!(self, Self::Operator(_))
    }

    /// Nodes a value or an opening parenthesis may directly follow besides
    /// operators: `(`, an output setting, and an assignment.
    #[must_use]
    pub const fn is_prefix(self) -> bool {
        matches!(self, Self::LParen | Self::SetOutput | Self::Assign)
    }

    /// Nodes that may end an expression: values and `)`.
    #[must_use]
    pub const fn closes_expression(self) -> bool {
        self.is_value() || matches!(self, Self::RParen)
    }

    /// Built-in function nodes.
    #[must_use]
    pub const fn is_function(self) -> bool {
        matches!(self, Self::Abs | Self::SetOutput | Self::Save | Self::Load | Self::Clear)
    }
}

/// One validated unit of a parsed line.
///
/// The parser emits a flat sequence of nodes; the evaluator reduces that
/// sequence in place. Every node remembers the byte offset it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Assignment target, rewritten from a leading variable followed by `=`.
    Assign {
        /// Variable name including the `$`.
        target: String,
        /// Byte offset of the variable.
        pos:    Pos,
    },
    /// A number literal.
    Number(Number),
    /// A variable reference.
    Variable {
        /// Variable name including the `$`.
        name: String,
        /// Byte offset of the `$`.
        pos:  Pos,
    },
    /// A binary operator.
    Operator {
        /// Which operator.
        op:  Operator,
        /// Byte offset of the operator.
        pos: Pos,
    },
    /// Output number system selection.
    SetOutput {
        /// Requested output system.
        system: NumberSystem,
        /// Byte offset of the keyword.
        pos:    Pos,
    },
    /// `save(profile)` or `load(profile)`.
    Disk {
        /// Which verb.
        verb:    DiskVerb,
        /// Profile name argument.
        profile: String,
        /// Byte offset of the verb.
        pos:     Pos,
    },
    /// `clear()`
    Clear {
        /// Byte offset of the verb.
        pos: Pos,
    },
    /// `(`
    LParen {
        /// Byte offset.
        pos: Pos,
    },
    /// `)`
    RParen {
        /// Byte offset.
        pos: Pos,
    },
    /// `abs`, applied to the parenthesised group that follows it.
    Abs {
        /// Byte offset.
        pos: Pos,
    },
    /// Successful end of the line.
    End {
        /// Length of the input.
        pos: Pos,
    },
    /// Parsing stopped with an error.
    ParsingStopped {
        /// End of the last item that was consumed successfully.
        pos: Pos,
    },
}

impl Node {
    /// Returns the node's kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Assign { .. } => NodeKind::Assign,
            Self::Number(_) => NodeKind::Number,
            Self::Variable { .. } => NodeKind::Variable,
            Self::Operator { op, .. } => NodeKind::Operator(*op),
            Self::SetOutput { .. } => NodeKind::SetOutput,
            Self::Disk { verb: DiskVerb::Save, .. } => NodeKind::Save,
            Self::Disk { verb: DiskVerb::Load, .. } => NodeKind::Load,
            Self::Clear { .. } => NodeKind::Clear,
            Self::LParen { .. } => NodeKind::LParen,
            Self::RParen { .. } => NodeKind::RParen,
            Self::Abs { .. } => NodeKind::Abs,
            Self::End { .. } => NodeKind::End,
            Self::ParsingStopped { .. } => NodeKind::ParsingStopped,
        }
    }

    /// Returns the byte offset the node originates from.
    #[must_use]
    pub const fn pos(&self) -> Pos {
        match self {
            Self::Number(number) => number.pos,
            Self::Assign { pos, .. }
            | Self::Variable { pos, .. }
            | Self::Operator { pos, .. }
            | Self::SetOutput { pos, .. }
            | Self::Disk { pos, .. }
            | Self::Clear { pos }
            | Self::LParen { pos }
            | Self::RParen { pos }
            | Self::Abs { pos }
            | Self::End { pos }
            | Self::ParsingStopped { pos } => *pos,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign { target, .. } => write!(f, "{target} ="),
            Self::Number(number) => write!(f, "{number}"),
            Self::Variable { name, .. } => f.write_str(name),
            Self::Operator { op, .. } => f.write_str(op.as_ref()),
            Self::SetOutput { system, .. } => f.write_str(system.as_ref()),
            Self::Disk { verb, profile, .. } => write!(f, "{verb}({profile})"),
            Self::Clear { .. } => f.write_str("clear()"),
            Self::LParen { .. } => f.write_str("("),
            Self::RParen { .. } => f.write_str(")"),
            Self::Abs { .. } => f.write_str("abs"),
            Self::End { .. } => Ok(()),
            Self::ParsingStopped { pos } => write!(f, "<parsing stopped at {pos}>"),
        }
    }
}
