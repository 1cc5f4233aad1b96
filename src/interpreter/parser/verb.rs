use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Item, ItemKind, Keyword},
        node::{DiskVerb, Node},
        parser::core::{ParseResult, Parser},
        value::core::NumberSystem,
    },
};

impl<I> Parser<I> where I: Iterator<Item = Item>
{
    /// `dec`, `hex`, `bin` and `oct` select the output system and must be the
    /// first node on the line.
    pub(super) fn parse_output(&mut self, item: Item) -> ParseResult<()> {
        if !self.nodes.is_empty() {
            return Err(ParseError::OutputPlacement { token: item.text,
                                                     pos:   item.pos, });
        }

        let system = match item.kind {
            ItemKind::Keyword(Keyword::Hex) => NumberSystem::Hex,
            ItemKind::Keyword(Keyword::Bin) => NumberSystem::Bin,
            ItemKind::Keyword(Keyword::Oct) => NumberSystem::Oct,
            _ => NumberSystem::Dec,
        };
        self.nodes.push(Node::SetOutput { system,
                                          pos: item.pos });
        Ok(())
    }

    /// `clear()`, `save(name)` and `load(name)` make up the entire line.
    ///
    /// The rest of the line is read in one go and must match the verb's form
    /// exactly; the verb node is followed directly by the end marker.
    pub(super) fn parse_verb(&mut self, verb: Keyword, item: &Item) -> ParseResult<()> {
        let form = match verb {
            Keyword::Save => "save(name)",
            Keyword::Load => "load(name)",
            _ => "clear()",
        };
        let malformed = || ParseError::VerbForm { verb: item.text.clone(),
                                                  pos: item.pos,
                                                  form };

        if !self.nodes.is_empty() {
            return Err(malformed());
        }

        let mut rest = Vec::new();
        while let Some(next) = self.next_item()? {
            rest.push(next);
        }

        let node = match (verb, rest.as_slice()) {
            (Keyword::Clear, [open, close])
                if open.kind == ItemKind::LParen && close.kind == ItemKind::RParen =>
            {
                Node::Clear { pos: item.pos }
            },
            (Keyword::Save | Keyword::Load, [open, name, close])
                if open.kind == ItemKind::LParen
                   && name.kind == ItemKind::Text
                   && close.kind == ItemKind::RParen =>
            {
                let verb = if verb == Keyword::Save { DiskVerb::Save } else { DiskVerb::Load };
                Node::Disk { verb,
                             profile: name.text.clone(),
                             pos: item.pos }
            },
            _ => return Err(malformed()),
        };

        self.nodes.push(node);
        self.nodes.push(Node::End { pos: self.input_len });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::interpreter::{
        node::{DiskVerb, Node, NodeKind},
        parser::parse,
    };

    #[test]
    fn verbs_take_the_whole_line() {
        assert_eq!(parse("clear()").unwrap(),
                   [Node::Clear { pos: 0 }, Node::End { pos: 7 }]);
        assert_eq!(parse("  save( work )").unwrap(),
                   [Node::Disk { verb:    DiskVerb::Save,
                                 profile: "work".into(),
                                 pos:     2, },
                    Node::End { pos: 14 }]);
    }

    #[test]
    fn malformed_verbs() {
        for (input, message) in
            [("save(x)y", "unexpected save at pos 0, when used the input should be only: save(name)"),
             ("save()", "unexpected save at pos 0, when used the input should be only: save(name)"),
             ("save(hex)", "unexpected save at pos 0, when used the input should be only: save(name)"),
             ("load(clear)", "unexpected load at pos 0, when used the input should be only: load(name)"),
             ("load x", "unexpected load at pos 0, when used the input should be only: load(name)"),
             ("clear(1)", "unexpected clear at pos 0, when used the input should be only: clear()"),
             ("1 + clear()", "unexpected clear at pos 4, when used the input should be only: clear()")]
        {
            let failure = parse(input).unwrap_err();
            assert_eq!(failure.error.to_string(), message, "{input}");
            assert_eq!(failure.nodes.last().map(Node::kind), Some(NodeKind::ParsingStopped));
        }
    }

    #[test]
    fn lexical_errors_inside_a_verb_win() {
        assert_eq!(parse("save(a.b)").unwrap_err().error.to_string(), "Unexpected . at pos 6");
    }

    #[test]
    fn output_setting_must_come_first() {
        assert_eq!(parse("hex 255").unwrap()[0].kind(), NodeKind::SetOutput);
        assert_eq!(parse("(oct(1))").unwrap_err().error.to_string(),
                   "unexpected oct at pos 1, setting output type must be the first thing you do");
    }
}
