use std::ops::RangeInclusive;

use tracing::trace;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary,
            core::{Calculator, EvalResult},
        },
        node::{Node, Tier},
        value::{
            core::{Number, Pos},
            radix::format_in,
        },
    },
};

/// A parenthesised group that is still being collected.
struct Group {
    /// Nodes inside the group, with inner groups already reduced.
    nodes: Vec<Node>,
    /// Position of the `(`.
    open:  Pos,
    /// Position of an `abs` directly in front of the `(`.
    abs:   Option<Pos>,
}

impl Group {
    const fn new(open: Pos, abs: Option<Pos>) -> Self {
        Self { nodes: Vec::new(),
               open,
               abs }
    }
}

impl Calculator {
    /// Reduces a node sequence to a single number.
    ///
    /// Groups are reduced innermost first, in a single left-to-right pass
    /// that keeps one open group per pending `(`. When a `)` arrives its
    /// group, now free of parentheses, is reduced flat and spliced into the
    /// enclosing group as one number (its absolute value if an `abs` precedes
    /// the `(`). The end marker is dropped. What remains at the top level is
    /// reduced flat last.
    ///
    /// Nesting depth is limited by memory only.
    pub(super) fn reduce(&self, nodes: Vec<Node>) -> EvalResult<Number> {
        let mut open: Vec<Group> = Vec::new();
        let mut top = Group::new(0, None);

        for node in nodes {
            let current = open.last_mut().unwrap_or(&mut top);
            match node {
                Node::LParen { pos } => {
                    let abs = match current.nodes.last() {
                        Some(Node::Abs { pos }) => Some(*pos),
                        _ => None,
                    };
                    if abs.is_some() {
                        current.nodes.pop();
                    }
                    open.push(Group::new(pos, abs));
                },
                Node::RParen { pos } => {
                    let Some(group) = open.pop() else {
                        return Err(RuntimeError::Irreducible { nodes: ")".to_string() });
                    };
                    let value = self.reduce_group(group)?;
                    trace!(close = pos, result = %value, "reduced group");
                    open.last_mut().unwrap_or(&mut top).nodes.push(Node::Number(value));
                },
                Node::End { .. } => {},
                other => current.nodes.push(other),
            }
        }

        if let Some(group) = open.first() {
            return Err(RuntimeError::Irreducible { nodes: format!("( {}", render(&group.nodes)) });
        }
        self.reduce_flat(top.nodes)
    }

    /// Reduces a closed group and positions the result at its left edge.
    fn reduce_group(&self, group: Group) -> EvalResult<Number> {
        let mut value = self.reduce_flat(group.nodes)?;
        match group.abs {
            Some(pos) => {
                let magnitude = value.to_f64()?.abs();
                Ok(Number::parse(pos, &format_in(magnitude, value.system)))
            },
            None => {
                value.pos = group.open;
                Ok(value)
            },
        }
    }

    /// Reduces a sequence without parentheses: the leftmost `**`, then the
    /// leftmost `* / // % & | ^ ~ << >>`, then the leftmost `+ -`, until one
    /// value is left. Operators of one tier therefore associate to the left,
    /// `**` included.
    fn reduce_flat(&self, mut nodes: Vec<Node>) -> EvalResult<Number> {
        loop {
            if let [node] = nodes.as_slice() {
                return self.read_value(node);
            }

            let Some(at) = find_operator(&nodes, Tier::Exponent)
                           .or_else(|| find_operator(&nodes, Tier::Multiplicative))
                           .or_else(|| find_operator(&nodes, Tier::Additive))
            else {
                return Err(irreducible(&nodes));
            };
            self.reduce_operator(&mut nodes, at)?;
        }
    }

    /// Resolves a number or variable node to its number.
    fn read_value(&self, node: &Node) -> EvalResult<Number> {
        match node {
            Node::Number(number) => Ok(number.clone()),
            Node::Variable { name, pos } => {
                let stored = self.variables()
                                 .get(name)
                                 .ok_or_else(|| RuntimeError::UnknownVariable { name: name.clone() })?;
                Ok(Number { pos: *pos,
                            ..stored.clone() })
            },
            other => Err(RuntimeError::NotAValue { token: other.to_string(),
                                                   pos:   other.pos(), }),
        }
    }

    /// Replaces the operator at `at` and its two neighbours with the result.
    fn reduce_operator(&self, nodes: &mut Vec<Node>, at: usize) -> EvalResult<()> {
        let (Some(left), Some(Node::Operator { op, .. }), Some(right)) =
            (at.checked_sub(1).and_then(|i| nodes.get(i)), nodes.get(at), nodes.get(at + 1))
        else {
            return Err(irreducible(nodes));
        };

        let left = self.read_value(left)?;
        let right = self.read_value(right)?;
        let value = binary::apply(*op, left.to_f64()?, right.to_f64()?)?;
        let result = Number::from_f64(left.pos, value);

        trace!(%left, %op, %right, %result, "reduced operator");
        replace(nodes, at - 1..=at + 1, Node::Number(result));
        Ok(())
    }
}

/// Index of the leftmost operator in `tier`.
fn find_operator(nodes: &[Node], tier: Tier) -> Option<usize> {
    nodes.iter()
         .position(|node| matches!(node, Node::Operator { op, .. } if op.tier() == tier))
}

fn replace(nodes: &mut Vec<Node>, range: RangeInclusive<usize>, node: Node) {
    let start = *range.start();
    nodes.drain(range);
    nodes.insert(start, node);
}

fn render(nodes: &[Node]) -> String {
    nodes.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

fn irreducible(nodes: &[Node]) -> RuntimeError {
    RuntimeError::Irreducible { nodes: render(nodes) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        interpreter::{node::Operator, parser::parse},
        storage::MemoryStore,
    };

    fn nodes(input: &str) -> Vec<Node> {
        parse(input).unwrap()
    }

    fn calc() -> Calculator {
        Calculator::new(MemoryStore::new())
    }

    #[test]
    fn operator_tiers_are_found_leftmost_first() {
        let nodes = nodes("1 + 2 * 3 ** 4 // 5");
        assert_eq!(find_operator(&nodes, Tier::Exponent), Some(5));
        assert_eq!(find_operator(&nodes, Tier::Multiplicative), Some(3));
        assert_eq!(find_operator(&nodes, Tier::Additive), Some(1));
    }

    #[test]
    fn sibling_and_nested_groups() {
        let calc = calc();
        assert_eq!(calc.reduce(nodes("((1) + (2)) * (3)")).unwrap().value, "9");
        assert_eq!(calc.reduce(nodes("(2 - (3 * (1 + 1))) ** 2")).unwrap().value, "16");
        assert_eq!(calc.reduce(nodes("abs(1 - abs(-3)) + abs(-(0x10))")).unwrap().value, "18");
    }

    #[test]
    fn results_keep_the_position_of_their_left_edge() {
        let result = calc().reduce(nodes("  (1 + 2) * 3")).unwrap();
        assert_eq!(result.value, "9");
        assert_eq!(result.pos, 2);

        let result = calc().reduce(nodes("1 + abs(-4)")).unwrap();
        assert_eq!(result.pos, 0);
    }

    #[test]
    fn deeply_nested_groups_do_not_exhaust_the_stack() {
        let depth = 10_000;
        let input = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(calc().reduce(nodes(&input)).unwrap().value, "1");

        let input = format!("{}-5{}", "abs(".repeat(depth), ")".repeat(depth));
        assert_eq!(calc().reduce(nodes(&input)).unwrap().value, "5");
    }

    #[test]
    fn sequences_that_are_not_expressions_are_rejected() {
        let calc = calc();
        let bare = vec![Node::Operator { op:  Operator::Add,
                                         pos: 0, },
                        Node::End { pos: 1 }];
        assert!(matches!(calc.reduce(bare), Err(RuntimeError::Irreducible { .. })));
        assert!(matches!(calc.reduce(vec![Node::Clear { pos: 0 }]),
                         Err(RuntimeError::NotAValue { .. })));

        let unclosed = vec![Node::LParen { pos: 0 }, Node::Number(Number::parse(1, "1"))];
        assert!(matches!(calc.reduce(unclosed), Err(RuntimeError::Irreducible { .. })));
        assert!(matches!(calc.reduce(vec![Node::RParen { pos: 0 }]),
                         Err(RuntimeError::Irreducible { .. })));
    }
}
