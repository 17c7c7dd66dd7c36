//! Composing grammars from independently written extensions.

use markdown_strata_syntax::{
    Attempt, BlockExtension, ConfigError, ExtensionError, ExtensionSlots, Grammar, GrammarBuilder,
    InlineExtension, NodeTypeCatalog, Parser, Priority, SyntaxKind, SyntaxNode, compose, preset,
};
use markdown_strata_syntax::{BaseBlock, BaseGrammar, LanguageRegistry};
use pretty_assertions::assert_eq;

/// Claims a whole line starting with `%%` as a comment block.
struct PercentComment;

impl BlockExtension for PercentComment {
    fn name(&self) -> &str {
        "PercentComment"
    }

    fn emits(&self) -> &[&str] {
        &["Comment"]
    }

    fn attempt(&self, p: &mut Parser<'_, '_>) -> Result<Attempt, ExtensionError> {
        if !p.rest_of_line().starts_with("%%") {
            return Ok(Attempt::NoMatch);
        }
        let kind = p.kind("Comment")?;
        let m = p.start();
        p.bump_to_line_end();
        p.eat(SyntaxKind::NEWLINE);
        m.complete(p, kind);
        Ok(Attempt::Matched)
    }

    fn interrupts_paragraph(&self, p: &Parser<'_, '_>) -> bool {
        p.rest_of_line().starts_with("%%")
    }
}

/// Claims `#word` as a tag, which competes with nothing in the base grammar
/// but shows up as a paragraph otherwise.
struct Hashtag;

impl InlineExtension for Hashtag {
    fn name(&self) -> &str {
        "Hashtag"
    }

    fn emits(&self) -> &[&str] {
        &["Tag"]
    }

    fn attempt(&self, p: &mut Parser<'_, '_>) -> Result<Attempt, ExtensionError> {
        if !p.at(SyntaxKind::HASH) || p.nth(1) != SyntaxKind::TEXT {
            return Ok(Attempt::NoMatch);
        }
        let kind = p.kind("Tag")?;
        let m = p.start();
        p.bump();
        p.bump();
        m.complete(p, kind);
        Ok(Attempt::Matched)
    }
}

/// A buggy extension: asks for a kind it never declared.
struct Undeclared;

impl InlineExtension for Undeclared {
    fn name(&self) -> &str {
        "Undeclared"
    }

    fn emits(&self) -> &[&str] {
        &[]
    }

    fn attempt(&self, p: &mut Parser<'_, '_>) -> Result<Attempt, ExtensionError> {
        let kind = p.kind("NotInCatalog")?;
        let m = p.start();
        p.bump();
        m.complete(p, kind);
        Ok(Attempt::Matched)
    }
}

/// A buggy extension: declares nothing, then asks for a kind the catalog
/// knows but another extension owns.
struct Borrowing;

impl InlineExtension for Borrowing {
    fn name(&self) -> &str {
        "Borrowing"
    }

    fn emits(&self) -> &[&str] {
        &[]
    }

    fn attempt(&self, p: &mut Parser<'_, '_>) -> Result<Attempt, ExtensionError> {
        if !p.at(SyntaxKind::AT) {
            return Ok(Attempt::NoMatch);
        }
        let kind = p.kind("Citation")?;
        let m = p.start();
        p.bump();
        m.complete(p, kind);
        Ok(Attempt::Matched)
    }
}

/// A buggy extension: opens a node, then panics.
struct Exploding;

impl BlockExtension for Exploding {
    fn name(&self) -> &str {
        "Exploding"
    }

    fn emits(&self) -> &[&str] {
        &[]
    }

    fn attempt(&self, p: &mut Parser<'_, '_>) -> Result<Attempt, ExtensionError> {
        let m = p.start();
        p.bump_to_line_end();
        m.abandon(p);
        panic!("boom")
    }
}

fn names(grammar: &Grammar, tree: &SyntaxNode) -> Vec<String> {
    tree.children()
        .map(|n| grammar.kind_name(n.kind()).unwrap_or("?").to_string())
        .collect()
}

fn custom_grammar() -> Grammar {
    GrammarBuilder::new()
        .node_type("Comment", "comment")
        .node_type("Tag", "tag")
        .block(PercentComment, Priority::HIGH)
        .inline(Hashtag, Priority::HIGH)
        .build()
        .unwrap()
}

#[test]
fn extensions_coexist_with_base_grammar() {
    let grammar = custom_grammar();
    let input = "# Title #rust\n%% hidden\nText with #tag\n%% interrupts\n";
    let tree = grammar.parse(input).syntax();

    assert_eq!(tree.text().to_string(), input);
    assert_eq!(
        names(&grammar, &tree),
        vec!["HEADING", "Comment", "PARAGRAPH", "Comment"]
    );

    let tag = grammar.kind("Tag").unwrap();
    let tags: Vec<_> = tree
        .descendants()
        .filter(|n| n.kind() == tag)
        .map(|n| n.text().to_string())
        .collect();
    assert_eq!(tags, vec!["#rust", "#tag"]);
}

#[test]
fn tree_only_contains_base_and_catalog_kinds() {
    let grammar = custom_grammar();
    let tree = grammar
        .parse("%% c\n# h #t\n> q #t\n- item\n```\ncode\n```\n")
        .syntax();
    for element in tree.descendants_with_tokens() {
        assert!(
            grammar.kind_name(element.kind()).is_some(),
            "unnamed kind {:?}",
            element.kind()
        );
    }
}

/// Claims any line starting with `#`, competing with the heading rule.
struct HashComment;

impl BlockExtension for HashComment {
    fn name(&self) -> &str {
        "HashComment"
    }

    fn emits(&self) -> &[&str] {
        &["Comment"]
    }

    fn attempt(&self, p: &mut Parser<'_, '_>) -> Result<Attempt, ExtensionError> {
        if !p.at(SyntaxKind::HASH) {
            return Ok(Attempt::NoMatch);
        }
        let kind = p.kind("Comment")?;
        let m = p.start();
        p.bump_to_line_end();
        p.eat(SyntaxKind::NEWLINE);
        m.complete(p, kind);
        Ok(Attempt::Matched)
    }
}

fn hash_comment_grammar(priority: Priority) -> Grammar {
    GrammarBuilder::new()
        .node_type("Comment", "comment")
        .block(HashComment, priority)
        .build()
        .unwrap()
}

#[test]
fn higher_priority_extension_shadows_base_rule() {
    let grammar = hash_comment_grammar(Priority::HIGH);
    let tree = grammar.parse("# heading\n#tag\n").syntax();
    assert_eq!(names(&grammar, &tree), vec!["Comment", "Comment"]);
}

#[test]
fn lower_priority_extension_loses_to_base_rule() {
    let grammar = hash_comment_grammar(Priority::LOW);
    let tree = grammar.parse("# heading\n#tag\n").syntax();
    assert_eq!(names(&grammar, &tree), vec!["HEADING", "Comment"]);
}

#[test]
fn base_rule_wins_a_priority_tie() {
    let grammar = hash_comment_grammar(Priority::BASE);
    let tree = grammar.parse("# heading\n\n#tag\n").syntax();
    assert_eq!(names(&grammar, &tree), vec!["HEADING", "Comment"]);
}

#[test]
fn removed_base_rule_leaves_room_for_extension() {
    let grammar = GrammarBuilder::new()
        .base(BaseGrammar::default().without_block(BaseBlock::Heading))
        .node_type("Comment", "comment")
        .block(HashComment, Priority::LOW)
        .build()
        .unwrap();
    let tree = grammar.parse("# heading\n").syntax();
    assert_eq!(names(&grammar, &tree), vec!["Comment"]);
}

#[test]
fn undeclared_kind_degrades_to_text() {
    let grammar = GrammarBuilder::new()
        .inline(Undeclared, Priority::HIGH)
        .build()
        .unwrap();
    let input = "plain text\n";
    let tree = grammar.parse(input).syntax();
    assert_eq!(tree.text().to_string(), input);
    assert!(!tree.descendants().any(|n| n.kind().is_custom()));
}

#[test]
fn kinds_outside_emits_are_refused() {
    let grammar = preset::standard_builder()
        .inline(Borrowing, Priority(i16::MAX))
        .build()
        .unwrap();
    let citation = grammar.kind("Citation").unwrap();
    let input = "write to a @ sign, cite @doe\n";
    let tree = grammar.parse(input).syntax();
    assert_eq!(tree.text().to_string(), input);
    let citations: Vec<_> = tree
        .descendants()
        .filter(|n| n.kind() == citation)
        .map(|n| n.text().to_string())
        .collect();
    assert_eq!(citations, vec!["@doe"]);
}

#[test]
fn panicking_extension_is_skipped() {
    let _ = env_logger::builder().is_test(true).try_init();
    let grammar = GrammarBuilder::new()
        .block(Exploding, Priority::HIGH)
        .build()
        .unwrap();
    let input = "# still a heading\nand a paragraph\n";
    let tree = grammar.parse(input).syntax();
    assert_eq!(tree.text().to_string(), input);
    assert_eq!(names(&grammar, &tree), vec!["HEADING", "PARAGRAPH"]);
}

#[test]
fn compose_reports_unknown_emitted_kind() {
    let mut slots = ExtensionSlots::new();
    slots.block(PercentComment, Priority::HIGH);
    let err = compose(
        BaseGrammar::default(),
        LanguageRegistry::new(),
        slots,
        NodeTypeCatalog::new(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnknownNodeKind {
            extension: "PercentComment".into(),
            name: "Comment".into(),
        }
    );
    assert_eq!(
        err.to_string(),
        "extension `PercentComment` emits `Comment`, which is not a known node type"
    );
}

#[test]
fn custom_kinds_are_grammar_local() {
    let a = GrammarBuilder::new()
        .node_type("Tag", "tag")
        .node_type("Comment", "comment")
        .build()
        .unwrap();
    let b = custom_grammar();
    assert_ne!(a.kind("Tag"), b.kind("Tag"));
    assert_eq!(a.kind_name(b.kind("Tag").unwrap()), Some("Comment"));
}

#[test]
fn concurrent_parses_share_one_grammar() {
    let grammar = preset::standard().unwrap();
    let inputs: Vec<String> = (0..8)
        .map(|i| format!("# Doc {i}\n\nSee [@key{i}] and $x_{i}$.\n\n[^{i}]: note {i}\n"))
        .collect();

    let dumps: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let grammar = &grammar;
                s.spawn(move || grammar.debug_tree(&grammar.parse(input).syntax()))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (input, dump) in inputs.iter().zip(&dumps) {
        assert_eq!(*dump, grammar.debug_tree(&grammar.parse(input).syntax()));
        assert!(dump.contains("Citation@"));
        assert!(dump.contains("InlineMath@"));
        assert!(dump.contains("FootnoteRef@"));
    }
}

#[test]
fn parse_is_deterministic() {
    let grammar = preset::standard().unwrap();
    let input = "---\na: 1\n---\n$$\nx\n$$\nhttps://example.com @doe\n";
    let first = grammar.parse(input);
    let second = grammar.parse(input);
    assert_eq!(first.green(), second.green());
}

#[test]
fn standard_extensions_share_one_document() {
    let grammar = preset::standard().unwrap();
    let input = "---\ntitle: x\n---\nMath $y$ note[^1] cite [@doe] at https://example.com now\n\n```rust\nfn main() {}\n```\n";
    let parse = grammar.parse(input);
    let tree = parse.syntax();
    assert_eq!(tree.text().to_string(), input);

    let wanted = ["YAMLFrontmatter", "InlineMath", "Footnote", "Citation", "PlainLink"];
    let found: Vec<(&str, String)> = tree
        .descendants()
        .filter_map(|n| {
            let name = grammar.kind_name(n.kind())?;
            wanted.contains(&name).then(|| (name, n.text().to_string()))
        })
        .collect();
    let found_names: Vec<&str> = found.iter().map(|(name, _)| *name).collect();
    assert_eq!(found_names, wanted);
    assert_eq!(
        found[1..].iter().map(|(_, text)| text.as_str()).collect::<Vec<_>>(),
        vec!["$y$", "[^1]", "[@doe]", "https://example.com"]
    );

    let fences = parse.fences();
    assert_eq!(fences.len(), 1);
    assert_eq!(fences[0].language_name(), Some("rust"));
    assert_eq!(fences[0].code_text(input).trim_end(), "fn main() {}");
}

#[test]
fn unclosed_brackets_do_not_exhaust_the_stack() {
    let grammar = preset::standard().unwrap();
    let input = "[".repeat(100_000);
    let tree = grammar.parse(&input).syntax();
    assert_eq!(tree.text().to_string(), input);

    let nested = format!("{}x\n", "[*".repeat(10_000));
    let tree = grammar.parse(&nested).syntax();
    assert_eq!(tree.text().to_string(), nested);
}
