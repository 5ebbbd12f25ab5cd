use comrak::{
  Arena,
  nodes::{AstNode, NodeValue},
  parse_document,
};
use inkpost_commonmark::{ArticleRenderer, HeadingSlugTable};

/// Text content left to right, with highlight marks written back as
/// `==content==` and generated heading markers skipped.
fn flatten<'a>(root: &'a AstNode<'a>) -> String {
  let mut out = String::new();
  for node in root.descendants() {
    match &node.data.borrow().value {
      NodeValue::Text(t) => out.push_str(t),
      NodeValue::Code(code) => out.push_str(&code.literal),
      NodeValue::HtmlInline(html) if html.starts_with("<mark") => {
        let inner = html
          .trim_start_matches("<mark class=\"highlight\">")
          .trim_end_matches("</mark>");
        out.push_str("==");
        out.push_str(inner);
        out.push_str("==");
      },
      _ => {},
    }
  }
  out
}

fn rewrite_and_compare(markdown: &str) {
  let renderer = ArticleRenderer::default();
  let options = renderer.comrak_options();
  let arena = Arena::new();
  let root = parse_document(&arena, markdown, &options);
  let before = flatten(root);

  let alloc = |value: NodeValue| &*arena.alloc(value.into());
  renderer.rewrite_document(root, &alloc, &mut HeadingSlugTable::new());

  assert_eq!(flatten(root), before, "order changed for {markdown:?}");
}

#[test]
fn test_highlight_split_yields_three_siblings() {
  let renderer = ArticleRenderer::default();
  let options = renderer.comrak_options();
  let arena = Arena::new();
  let root = parse_document(&arena, "before ==alert== after", &options);

  let alloc = |value: NodeValue| &*arena.alloc(value.into());
  renderer.rewrite_document(root, &alloc, &mut HeadingSlugTable::new());

  let paragraph = root.first_child().expect("paragraph");
  let children: Vec<String> = paragraph
    .children()
    .map(|child| {
      match &child.data.borrow().value {
        NodeValue::Text(t) => format!("text:{t}"),
        NodeValue::HtmlInline(html) => format!("raw:{html}"),
        other => format!("other:{other:?}"),
      }
    })
    .collect();

  assert_eq!(children, [
    "text:before ",
    "raw:<mark class=\"highlight\">alert</mark>",
    "text: after",
  ]);
}

#[test]
fn test_rewrites_preserve_sibling_order() {
  for markdown in [
    "A ==b== C `x` D ==e==",
    "# Head ==one==\n\npara *em ==two== em* tail\n",
    "- item ==1==\n- `code` item\n- plain\n\n> quote ==q== end\n",
    "## Intro\n\n## Intro\n\n[link ==l==](x) after",
  ] {
    rewrite_and_compare(markdown);
  }
}

#[test]
fn test_heading_marker_is_first_child() {
  let renderer = ArticleRenderer::default();
  let options = renderer.comrak_options();
  let arena = Arena::new();
  let root = parse_document(&arena, "## Intro\n", &options);

  let alloc = |value: NodeValue| &*arena.alloc(value.into());
  let headers =
    renderer.rewrite_document(root, &alloc, &mut HeadingSlugTable::new());

  assert_eq!(headers.len(), 1);
  let heading = root.first_child().expect("heading");
  let marker = heading.first_child().expect("marker");
  assert!(matches!(
    &marker.data.borrow().value,
    NodeValue::HtmlInline(html) if html == "<!-- anchor: intro -->"
  ));
}
