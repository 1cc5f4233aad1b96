use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Item, ItemKind},
        node::{Node, NodeKind, Operator},
        parser::core::{ParseResult, Parser},
        value::core::Number,
    },
};

impl<I> Parser<I> where I: Iterator<Item = Item>
{
    /// `=` is only valid directly after a variable that is the first node on
    /// the line. That variable becomes the assignment target.
    pub(super) fn parse_assign(&mut self, item: &Item) -> ParseResult<()> {
        let [Node::Variable { name, pos }] = self.nodes.as_slice() else {
            return Err(ParseError::AssignPlacement { pos: item.pos });
        };

        let target = Node::Assign { target: name.clone(),
                                    pos:    *pos, };
        self.nodes[0] = target;
        Ok(())
    }

    /// Numbers and variables must start the line or follow an operator, `(`,
    /// `=` or an output setting.
    fn expect_value_context(&self, item: &Item) -> ParseResult<()> {
        match self.left() {
            None => Ok(()),
            Some(left) if left.is_operator() || left.is_prefix() => Ok(()),
            Some(_) => Err(ParseError::ValuePlacement { token: item.text.clone(),
                                                        pos:   item.pos, }),
        }
    }

    pub(super) fn parse_number(&mut self, item: Item) -> ParseResult<()> {
        self.expect_value_context(&item)?;
        self.nodes.push(Node::Number(Number::parse(item.pos, &item.text)));
        Ok(())
    }

    pub(super) fn parse_variable(&mut self, item: Item) -> ParseResult<()> {
        self.expect_value_context(&item)?;
        self.nodes.push(Node::Variable { name: item.text,
                                         pos:  item.pos, });
        Ok(())
    }

    /// Whether a `-` at this point is a sign rather than subtraction.
    ///
    /// It is a sign when the next item is a number and nothing that could be
    /// a left operand precedes it: the line start, an operator, `(`, `=` or
    /// an output setting.
    fn is_negative_sign(&mut self) -> bool {
        let fusable_left = match self.left() {
            None => true,
            Some(left) => left.is_operator() || left.is_prefix(),
        };
        fusable_left && self.peek_kind() == Some(ItemKind::Number)
    }

    pub(super) fn parse_operator(&mut self, op: Operator, item: Item) -> ParseResult<()> {
        if op == Operator::Sub && self.is_negative_sign() {
            let Some(digits) = self.next_item()? else {
                return Err(ParseError::UnexpectedEnd { pos: self.input_len });
            };
            let literal = format!("-{}", digits.text);
            self.nodes.push(Node::Number(Number::parse(item.pos, &literal)));
            return Ok(());
        }

        match self.left() {
            None => Err(ParseError::Unexpected { token: item.text,
                                                 pos:   item.pos, }),
            Some(left) if left.closes_expression() => {
                self.nodes.push(Node::Operator { op,
                                                 pos: item.pos });
                Ok(())
            },
            Some(_) => Err(ParseError::OperatorPlacement { token: item.text,
                                                           pos:   item.pos, }),
        }
    }

    /// `(` may start the line or follow an operator, `(`, `=` or a function
    /// name (`abs` or an output setting).
    pub(super) fn parse_open_paren(&mut self, item: &Item) -> ParseResult<()> {
        let allowed = match self.left() {
            None => true,
            Some(left) => left.is_operator() || left.is_prefix() || left.is_function(),
        };
        if !allowed {
            return Err(ParseError::OpenParenPlacement { pos: item.pos });
        }

        self.depth += 1;
        self.nodes.push(Node::LParen { pos: item.pos });
        Ok(())
    }

    /// `)` needs an open group and must close a value or another `)`.
    pub(super) fn parse_close_paren(&mut self, item: &Item) -> ParseResult<()> {
        if self.depth == 0 {
            return Err(ParseError::NoOpenParen { pos: item.pos });
        }
        if !self.left().is_some_and(NodeKind::closes_expression) {
            return Err(ParseError::CloseParenPlacement { pos: item.pos });
        }

        self.depth -= 1;
        self.nodes.push(Node::RParen { pos: item.pos });
        Ok(())
    }

    /// `abs` is placed like a value and must be followed by `(`, which
    /// [`Self::parse_open_paren`] accepts after it.
    pub(super) fn parse_abs(&mut self, item: &Item) -> ParseResult<()> {
        let allowed = match self.left() {
            None => true,
            Some(left) => left.is_operator() || left.is_prefix(),
        };
        if !allowed {
            return Err(ParseError::AbsPlacement { pos: item.pos });
        }

        self.nodes.push(Node::Abs { pos: item.pos });
        Ok(())
    }
}
