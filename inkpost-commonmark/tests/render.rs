use inkpost_assets::{AssetNamespace, AssetResolver};
use inkpost_commonmark::{
  ArticleRenderer,
  RenderOptions,
  RendererPreset,
  create_renderer,
  process_with_recovery,
};

fn renderer_in(namespace: &str) -> ArticleRenderer {
  ArticleRenderer::new(RenderOptions {
    resolver: AssetResolver::new("https://cdn.example.com", "uploads", "avatars"),
    ..Default::default()
  })
  .with_namespace(AssetNamespace::new(namespace))
}

#[test]
fn test_highlight_marks_render_as_mark_elements() {
  let result = ArticleRenderer::default().render("before ==alert== after");
  assert_eq!(
    result.html,
    "<p>before <mark class=\"highlight\">alert</mark> after</p>\n"
  );
}

#[test]
fn test_unbalanced_highlight_is_plain_text() {
  let result = ArticleRenderer::default().render("a ==b and c\n");
  assert_eq!(result.html, "<p>a ==b and c</p>\n");
}

#[test]
fn test_highlight_inside_emphasis() {
  let result = ArticleRenderer::default().render("*so ==very== nice*");
  assert!(
    result
      .html
      .contains("<em>so <mark class=\"highlight\">very</mark> nice</em>")
  );
}

#[test]
fn test_raw_html_is_escaped_by_default() {
  let strict = create_renderer(RendererPreset::Strict);
  let inline = strict.render("Hello <b>bold</b> world\n");
  assert!(inline.html.contains("&lt;b&gt;bold&lt;/b&gt;"));
  assert!(!inline.html.contains("<b>"));

  let block = strict.render("<div class=\"x\">hi</div>\n");
  assert!(block.html.starts_with("<p>&lt;div"));
  assert!(!block.html.contains("<div"));
}

#[test]
fn test_raw_html_passes_when_trusted() {
  let trusted = create_renderer(RendererPreset::Trusted);
  let result = trusted.render("Hello <b>bold</b> world\n");
  assert!(result.html.contains("<b>bold</b>"));
}

#[test]
fn test_generated_markup_survives_strict_mode() {
  let strict = create_renderer(RendererPreset::Strict);
  let result = strict.render("# Title\n\n==hi==\n");
  assert!(result.html.contains("<h1 id=\"title\">Title</h1>"));
  assert!(result.html.contains("<mark class=\"highlight\">hi</mark>"));
}

#[test]
fn test_image_paths_resolve_into_namespace() {
  let result = renderer_in("trip").render("![a cat](./cat.png)\n");
  assert!(
    result
      .html
      .contains("src=\"https://cdn.example.com/uploads/trip/cat.png\"")
  );
}

#[test]
fn test_storage_and_absolute_paths() {
  let renderer = renderer_in("trip");
  let stored = renderer.render("![me](/avatars/me.png)\n");
  assert!(
    stored
      .html
      .contains("src=\"https://cdn.example.com/avatars/me.png\"")
  );

  let absolute = renderer.render("![x](https://other.example.com/x.png)\n");
  assert!(absolute.html.contains("src=\"https://other.example.com/x.png\""));
}

#[test]
fn test_without_namespace_paths_stay_relative() {
  let result = ArticleRenderer::default().render("![a](../img\\a.png)\n");
  assert!(result.html.contains("src=\"img/a.png\""));
}

#[test]
fn test_script_links_are_blanked() {
  let result =
    ArticleRenderer::default().render("[click](javascript:alert(1))\n");
  assert!(result.html.contains("<a href=\"\">click</a>"));
  assert!(!result.html.contains("javascript"));
}

#[test]
fn test_fragment_links_are_untouched() {
  let result = renderer_in("trip").render("[jump](#usage)\n");
  assert!(result.html.contains("<a href=\"#usage\">jump</a>"));
}

#[test]
fn test_recovery_wrapper_returns_render() {
  let renderer = ArticleRenderer::default();
  let result = process_with_recovery(&renderer, "# Hi\n");
  assert_eq!(result.title.as_deref(), Some("Hi"));
}

#[test]
fn test_empty_document() {
  let result = ArticleRenderer::default().render("");
  assert!(result.html.is_empty());
  assert!(result.headers.is_empty());
  assert!(result.title.is_none());
}
