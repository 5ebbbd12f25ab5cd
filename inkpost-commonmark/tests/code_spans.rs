use inkpost_commonmark::ArticleRenderer;

fn render(markdown: &str) -> String {
  ArticleRenderer::default().render(markdown).html
}

#[test]
fn test_fenced_block_with_language_gets_chrome() {
  let html = render("```rust\nif a < b {}\n```\n");

  assert!(html.contains("<div class=\"code-block\" data-language=\"rust\">"));
  assert!(html.contains("class=\"code-chrome\""));
  assert!(html.contains("<code class=\"language-rust\">if a &lt; b {}</code>"));
}

#[test]
fn test_multiline_block_without_language_gets_chrome() {
  let html = render("```\nline one\nline two\n```\n");

  assert!(html.contains("code-chrome"));
  assert!(html.contains("<pre><code>line one\nline two</code></pre>"));
  assert!(!html.contains("data-language"));
}

#[test]
fn test_single_line_block_without_language_gets_chrome() {
  let html = render("```\nnpm install\n```\n");

  assert!(html.contains("code-chrome"));
  assert!(html.contains("<pre><code>npm install</code></pre>"));
  assert!(!html.contains("<p><code>"));
}

#[test]
fn test_indented_single_line_block_gets_chrome() {
  let html = render("Install:\n\n    cargo install inkpost\n");

  assert!(html.contains("<pre><code>cargo install inkpost</code></pre>"));
  assert!(html.contains("code-chrome"));
}

#[test]
fn test_inline_code_has_no_chrome() {
  let html = render("Run `cargo test` now.\n");

  assert_eq!(html, "<p>Run <code>cargo test</code> now.</p>\n");
}

#[test]
fn test_inline_code_with_even_backticks_is_split() {
  let html = render("See ``a `b` c`` here.\n");

  assert_eq!(html, "<p>See <code>a </code>b<code> c</code> here.</p>\n");
}

#[test]
fn test_inline_code_with_odd_backticks_is_unchanged() {
  let html = render("See `` a ` b `` here.\n");

  assert_eq!(html, "<p>See <code>a ` b</code> here.</p>\n");
}

#[test]
fn test_code_contents_are_not_highlighted() {
  let html = render("`==x==` and ==y==\n");

  assert!(html.contains("<code>==x==</code>"));
  assert!(html.contains("<mark class=\"highlight\">y</mark>"));
}

#[test]
fn test_code_block_in_document_with_headings() {
  let result = ArticleRenderer::default().render("# Setup\n\n```sh\necho hi\n```\n");

  assert_eq!(result.headers.len(), 1);
  assert!(result.html.contains("<h1 id=\"setup\">Setup</h1>"));
  assert!(result.html.contains("<code class=\"language-sh\">echo hi</code>"));
  assert_eq!(result.html.matches("code-chrome-dot").count(), 3);
}
