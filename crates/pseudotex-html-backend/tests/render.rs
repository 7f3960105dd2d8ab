use pretty_assertions::assert_eq;
use pseudotex_html_backend::{
    render_document, render_to_markup, CaptionCounter, DeferredMath, Element, MathCapability,
    PlainMath, RenderOptions,
};
use pseudotex_ir::{
    Algorithm, AlgorithmItem, Algorithmic, AlgorithmicItem, Atom, AtomKind, Block, BlockItem,
    Comment, Document, Environment, Function, FunctionKind, If, Loop, LoopKind, Repeat,
    Statement, StatementKind, Text, TextItem, Upon,
};

fn word(text: &str) -> Text {
    Text::close(vec![TextItem::Atom(Atom::new(AtomKind::Ordinary, text, false))])
}

fn state(text: &str) -> BlockItem {
    BlockItem::Statement(Statement {
        kind: StatementKind::State,
        text: Text::open(vec![TextItem::Atom(Atom::new(
            AtomKind::Ordinary,
            text,
            true,
        ))]),
    })
}

fn comment(text: &str) -> BlockItem {
    BlockItem::Comment(Comment { text: word(text) })
}

fn algorithmic(items: Vec<BlockItem>) -> Algorithmic {
    Algorithmic {
        items: vec![AlgorithmicItem::Block(Block::new(items))],
    }
}

fn doc_of(items: Vec<BlockItem>) -> Document {
    Document::new(vec![Environment::Algorithmic(algorithmic(items))])
}

fn lines(root: &Element) -> Vec<String> {
    root.find_all_by_class("ps-line")
        .into_iter()
        .map(|line| line.text_content())
        .collect()
}

fn render(doc: &Document, options: &RenderOptions) -> Element {
    render_document(doc, options, &PlainMath).unwrap().element
}

fn nested_constructs() -> Document {
    let inner_if = BlockItem::If(If {
        condition: word("c"),
        then_block: Block::new(vec![state("a")]),
        elifs: vec![],
        else_block: Some(Block::new(vec![state("b")])),
    });
    let while_loop = BlockItem::Loop(Loop {
        kind: LoopKind::While,
        condition: word("w"),
        body: Block::new(vec![inner_if]),
    });
    let upon = BlockItem::Upon(Upon {
        condition: word("event"),
        body: Block::new(vec![while_loop]),
    });
    let function = BlockItem::Function(Function {
        kind: FunctionKind::Procedure,
        name: "Run".into(),
        args: word("x"),
        body: Block::new(vec![upon]),
    });
    doc_of(vec![function])
}

#[test]
fn end_lines_once_per_construct() {
    let root = render(&nested_constructs(), &RenderOptions::default());
    let lines = lines(&root);
    for end in ["end procedure", "end upon", "end while", "end if"] {
        assert_eq!(lines.iter().filter(|l| l.as_str() == end).count(), 1, "{}", end);
    }
}

#[test]
fn no_end_suppresses_all_end_lines() {
    let options = RenderOptions {
        no_end: true,
        ..RenderOptions::default()
    };
    let root = render(&nested_constructs(), &options);
    assert!(lines(&root).iter().all(|l| !l.starts_with("end")));
}

#[test]
fn repeat_has_until_line_instead_of_end() {
    let doc = doc_of(vec![BlockItem::Repeat(Repeat {
        body: Block::new(vec![state("x")]),
        condition: word("done"),
    })]);
    let options = RenderOptions {
        no_end: true,
        ..RenderOptions::default()
    };
    assert_eq!(lines(&render(&doc, &options)), vec!["repeat", " x", "until done"]);
}

#[test]
fn leading_comment_goes_on_header_line() {
    let doc = doc_of(vec![BlockItem::If(If {
        condition: word("c"),
        then_block: Block::new(vec![comment("why"), state("s")]),
        elifs: vec![],
        else_block: None,
    })]);
    let root = render(&doc, &RenderOptions::default());
    assert_eq!(lines(&root), vec!["if c then // why", " s", "end if"]);

    let blocks = root.find_all_by_class("ps-block");
    // outer algorithmic block, then the if body
    assert_eq!(blocks.len(), 2);
    assert!(blocks[1].find_all_by_class("ps-comment").is_empty());
}

#[test]
fn trailing_comment_joins_previous_line() {
    let doc = doc_of(vec![state("x"), comment("note")]);
    let root = render(&doc, &RenderOptions::default());
    assert_eq!(lines(&root), vec![" x // note"]);
}

#[test]
fn forall_displays_for_all_and_ends_with_end_for() {
    let doc = doc_of(vec![BlockItem::Loop(Loop {
        kind: LoopKind::ForAll,
        condition: word("v"),
        body: Block::default(),
    })]);
    assert_eq!(
        lines(&render(&doc, &RenderOptions::default())),
        vec!["for all v do", "end for"]
    );
}

fn captioned(title: &str) -> Environment {
    Environment::Algorithm(Algorithm {
        items: vec![
            AlgorithmItem::Caption(word(title)),
            AlgorithmItem::Algorithmic(algorithmic(vec![state("x")])),
        ],
    })
}

#[test]
fn caption_counter_advances_once_per_captioned_algorithm() {
    let doc = Document::new(vec![
        captioned("One"),
        Environment::Algorithm(Algorithm { items: vec![] }),
        captioned("Two"),
    ]);
    let options = RenderOptions::default().with_caption_count(3);
    let root = render(&doc, &options);
    let titles: Vec<String> = lines(&root)
        .into_iter()
        .filter(|l| l.starts_with("Algorithm"))
        .collect();
    assert_eq!(titles, vec!["Algorithm 4 One", "Algorithm 5 Two"]);
    assert_eq!(options.caption_counter.get(), 5);
}

#[test]
fn multiple_captions_count_once() {
    let doc = Document::new(vec![Environment::Algorithm(Algorithm {
        items: vec![
            AlgorithmItem::Caption(word("Draft")),
            AlgorithmItem::Caption(word("Final")),
        ],
    })]);
    let options = RenderOptions::default();
    let root = render(&doc, &options);
    assert_eq!(lines(&root), vec!["Algorithm 1 Final"]);
    assert_eq!(options.caption_counter.get(), 1);
}

#[test]
fn counter_continues_across_calls_with_shared_options() {
    let doc = Document::new(vec![captioned("A")]);
    let options = RenderOptions::default()
        .with_caption_counter(CaptionCounter::new(0))
        .with_title_prefix("Listing");
    render(&doc, &options);
    let root = render(&doc, &options);
    assert_eq!(lines(&root)[0], "Listing 2 A");
}

#[test]
fn line_numbers_restart_per_algorithmic() {
    let doc = Document::new(vec![
        Environment::Algorithmic(algorithmic(vec![state("a"), state("b")])),
        Environment::Algorithmic(algorithmic(vec![state("c")])),
    ]);
    let root = render(&doc, &RenderOptions::numbered());
    let numbers: Vec<String> = root
        .find_all_by_class("ps-linenum")
        .into_iter()
        .map(|n| n.text_content())
        .collect();
    assert_eq!(numbers, vec!["1:", "2:", "1:"]);
    assert_eq!(
        root.find_all_by_class("ps-algorithmic")[0].class.as_deref(),
        Some("ps-algorithmic with-linenum")
    );
}

#[test]
fn first_block_is_widened_for_line_numbers() {
    let doc = doc_of(vec![BlockItem::Loop(Loop {
        kind: LoopKind::For,
        condition: word("i"),
        body: Block::new(vec![state("x")]),
    })]);
    let root = render(&doc, &RenderOptions::numbered());
    let styles: Vec<Option<String>> = root
        .find_all_by_class("ps-block")
        .into_iter()
        .map(|b| b.style.clone())
        .collect();
    assert_eq!(
        styles,
        vec![
            Some("margin-left:1.8em;".to_string()),
            Some("margin-left:1.2em;".to_string())
        ]
    );
}

#[test]
fn scope_lines_halve_block_indent() {
    let doc = doc_of(vec![state("x")]);
    let options = RenderOptions {
        scope_lines: true,
        ..RenderOptions::default()
    };
    let root = render(&doc, &options);
    assert_eq!(
        root.find_all_by_class("ps-block")[0].style.as_deref(),
        Some("margin-left:0.6em;")
    );
    assert!(root.find_all_by_class("ps-algorithmic")[0].has_class("with-scopeline"));
}

#[test]
fn precondition_lines_hang() {
    let doc = Document::new(vec![Environment::Algorithmic(Algorithmic {
        items: vec![AlgorithmicItem::Io(Statement {
            kind: StatementKind::Require,
            text: Text::open(vec![TextItem::Atom(Atom::new(AtomKind::Ordinary, "n", true))]),
        })],
    })]);
    let markup = render_to_markup(&doc, &RenderOptions::default()).unwrap();
    assert!(markup.contains(
        "<p class=\"ps-line\" style=\"text-indent:-1.2em;padding-left:1.2em;\"><span class=\"ps-keyword\">Require: </span> n</p>"
    ));
}

#[test]
fn deferred_math_reports_capability() {
    let doc = doc_of(vec![BlockItem::Statement(Statement {
        kind: StatementKind::State,
        text: Text::open(vec![TextItem::Atom(Atom::new(AtomKind::Math, "x^2", false))]),
    })]);
    let backend = DeferredMath::new("mathjax", |_: &Element| {});
    let rendered = render_document(&doc, &RenderOptions::default(), &backend).unwrap();
    assert_eq!(rendered.capability, MathCapability::Deferred);
    assert_eq!(rendered.math_spans, 1);
    assert!(rendered.element.to_markup().contains("\\(x^2\\)"));
}

#[test]
fn declaration_in_statement_styles_following_lines() {
    let doc = doc_of(vec![
        BlockItem::Statement(Statement {
            kind: StatementKind::State,
            text: Text::open(vec![
                TextItem::Atom(Atom::new(AtomKind::FontDeclaration, "bfseries", false)),
                TextItem::Atom(Atom::new(AtomKind::Ordinary, "a", true)),
            ]),
        }),
        state("b"),
    ]);
    let root = render(&doc, &RenderOptions::default());
    let code = root.find_all_by_class("ps-code");
    assert_eq!(code[0].style, None);
    assert_eq!(code[1].style.as_deref(), Some("font-weight:bold;"));
}
