//! Sink for converting parser events into a Rowan green tree.

use rowan::{GreenNode, GreenNodeBuilder};

use crate::lexer::Token;
use crate::parser::event::Event;
use crate::syntax_kind::Kind;

/// Converts parser events and tokens into a green tree.
pub struct Sink<'t, 'input> {
    builder: GreenNodeBuilder<'static>,
    tokens: &'t [Token<'input>],
    cursor: usize,
    events: Vec<Event>,
}

impl<'t, 'input> Sink<'t, 'input> {
    pub fn new(tokens: &'t [Token<'input>], events: Vec<Event>) -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
            tokens,
            cursor: 0,
            events,
        }
    }

    /// Consume the sink and build the green tree.
    pub fn finish(mut self) -> GreenNode {
        let mut forward_parents = Vec::new();

        for i in 0..self.events.len() {
            match std::mem::replace(&mut self.events[i], Event::Placeholder) {
                Event::Start {
                    kind,
                    forward_parent,
                } => {
                    forward_parents.push(kind);
                    let mut fp = forward_parent;

                    while let Some(parent_idx) = fp {
                        match std::mem::replace(&mut self.events[parent_idx], Event::Placeholder) {
                            Event::Start {
                                kind,
                                forward_parent,
                            } => {
                                fp = forward_parent;
                                forward_parents.push(kind);
                            }
                            _ => unreachable!(),
                        }
                    }

                    // Outermost first
                    for kind in forward_parents.drain(..).rev() {
                        self.builder.start_node(kind.into());
                    }
                }
                Event::Token { kind, n_raw_tokens } => {
                    self.token(kind, usize::from(n_raw_tokens));
                }
                Event::Finish => {
                    self.builder.finish_node();
                }
                Event::Placeholder => {}
            }
        }

        self.builder.finish()
    }

    fn token(&mut self, kind: Kind, n_raw_tokens: usize) {
        let start = self.cursor;
        self.cursor += n_raw_tokens;
        let text: String = self.tokens[start..self.cursor]
            .iter()
            .map(|t| t.text)
            .collect();
        self.builder.token(kind.into(), &text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::syntax_kind::{SyntaxKind, SyntaxNode};

    #[test]
    fn sink_builds_simple_tree() {
        let tokens = vec![Token {
            kind: SyntaxKind::TEXT,
            text: "hello",
        }];

        let events = vec![
            Event::start(SyntaxKind::ROOT),
            Event::start(SyntaxKind::PARAGRAPH),
            Event::token(SyntaxKind::TEXT),
            Event::Finish,
            Event::Finish,
        ];

        let tree = SyntaxNode::new_root(Sink::new(&tokens, events).finish());

        assert_eq!(tree.kind(), SyntaxKind::ROOT);
        assert_eq!(tree.children().count(), 1);
    }

    #[test]
    fn sink_glues_raw_tokens() {
        let input = "a+b";
        let tokens = lex(input);

        let events = vec![
            Event::start(SyntaxKind::ROOT),
            Event::Token {
                kind: SyntaxKind::TEXT.into(),
                n_raw_tokens: 3,
            },
            Event::Finish,
        ];

        let tree = SyntaxNode::new_root(Sink::new(&tokens, events).finish());
        let only = tree.first_token().map(|t| (t.kind(), t.text().to_string()));
        assert_eq!(only, Some((SyntaxKind::TEXT.into(), input.to_string())));
    }

    #[test]
    fn sink_accepts_custom_kinds() {
        let tokens = lex("x");
        let custom = Kind::from_raw(Kind::FIRST_CUSTOM);
        let events = vec![
            Event::start(SyntaxKind::ROOT),
            Event::start(custom),
            Event::token(SyntaxKind::TEXT),
            Event::Finish,
            Event::Finish,
        ];

        let tree = SyntaxNode::new_root(Sink::new(&tokens, events).finish());
        let child = tree.first_child().map(|n| n.kind());
        assert_eq!(child, Some(custom));
    }
}
