use inkpost_assets::{UploadBatch, reconcile};

fn batch(pairs: &[(&str, &str)]) -> UploadBatch {
  pairs.iter().copied().collect()
}

#[test]
fn test_partial_match_replaces_only_first_reference() {
  let draft = "Intro\n\n![a](photo.png)\n\n![b](shot.png)\n";
  let report = reconcile(
    draft,
    &batch(&[("photo.png", "https://x/1.png")]),
    None,
  );

  assert_eq!(
    report.text,
    "Intro\n\n![a](https://x/1.png)\n\n![b](shot.png)\n"
  );
  assert_eq!(report.matched_count, 1);
  assert_eq!(report.total_references_before, 2);
  assert_eq!(report.appended_count, 0);
  assert!(!report.is_complete());
}

#[test]
fn test_unreferenced_uploads_are_appended_in_order() {
  let draft = "No images here.";
  let report = reconcile(
    draft,
    &batch(&[("a.png", "https://x/a.png"), ("b.png", "https://x/b.png")]),
    None,
  );

  assert_eq!(
    report.text,
    "No images here.\n![a.png](https://x/a.png)\n![b.png](https://x/b.png)"
  );
  assert_eq!(report.matched_count, 0);
  assert_eq!(report.appended_count, 2);
  assert!(report.is_complete());
}

#[test]
fn test_no_extra_separator_when_draft_ends_with_newline() {
  let report = reconcile(
    "Text\n",
    &batch(&[("a.png", "https://x/a.png")]),
    Some("image"),
  );
  assert_eq!(report.text, "Text\n![image](https://x/a.png)");
}

#[test]
fn test_empty_batch_is_identity() {
  let draft = "![a](photo.png) and ![b](<dir/shot.png>)";
  let report = reconcile(draft, &UploadBatch::new(), Some("image"));

  assert_eq!(report.text, draft);
  assert_eq!(report.matched_count, 0);
  assert_eq!(report.total_references_before, 2);
}

#[test]
fn test_one_upload_replaces_at_most_one_reference() {
  let draft = "![one](cat.png) ![two](cat.png)";
  let report = reconcile(draft, &batch(&[("cat.png", "https://x/c")]), None);

  assert_eq!(report.text, "![one](https://x/c) ![two](cat.png)");
  assert_eq!(report.matched_count, 1);
}

#[test]
fn test_duplicate_upload_names_last_write_wins() {
  let draft = "![a](cat.png)";
  let report = reconcile(
    draft,
    &batch(&[("cat.png", "https://x/old"), ("cat.png", "https://x/new")]),
    None,
  );

  assert_eq!(report.text, "![a](https://x/new)");
  assert_eq!(report.appended_count, 0);
}

#[test]
fn test_matches_on_basename_and_keeps_title() {
  let draft = r#"![a](./img\shots\cat.png "A cat")"#;
  let report = reconcile(draft, &batch(&[("cat.png", "https://x/c")]), None);

  assert_eq!(report.text, r#"![a](https://x/c "A cat")"#);
  assert_eq!(report.matched_count, 1);
}

#[test]
fn test_percent_encoded_reference_matches_plain_filename() {
  let draft = "![a](my%20cat.png)";
  let report = reconcile(draft, &batch(&[("my cat.png", "https://x/c")]), None);

  assert_eq!(report.text, "![a](https://x/c)");
}

#[test]
fn test_conservation_holds() {
  let draft = "![a](1.png) ![b](2.png) ![c](3.png) ![d](1.png)";
  let uploads = batch(&[
    ("1.png", "https://x/1"),
    ("3.png", "https://x/3"),
    ("9.png", "https://x/9"),
  ]);
  let report = reconcile(draft, &uploads, Some("img"));

  assert!(report.matched_count <= report.total_references_before);
  assert!(report.matched_count <= uploads.len());
  assert_eq!(report.matched_count, 2);
  assert_eq!(report.appended_count, 1);
  assert_eq!(report.text.matches("https://x/9").count(), 1);
  assert!(report.text.ends_with("\n![img](https://x/9)"));
}

#[test]
fn test_empty_draft_gets_no_leading_newline() {
  let report = reconcile("", &batch(&[("a.png", "https://x/a")]), None);
  assert_eq!(report.text, "![a.png](https://x/a)");
}

#[test]
fn test_path_with_spaces_is_matched() {
  let draft = "![a](Screen Shot.png)\n";
  let report =
    reconcile(draft, &batch(&[("Screen Shot.png", "https://x/1.png")]), None);

  assert_eq!(report.total_references_before, 1);
  assert_eq!(report.matched_count, 1);
  assert_eq!(report.appended_count, 0);
  assert!(report.is_complete());
  assert_eq!(report.text, "![a](https://x/1.png)\n");
}

#[test]
fn test_path_with_spaces_keeps_title() {
  let draft = r#"![a](shots/Screen Shot 2.png "Before")"#;
  let report =
    reconcile(draft, &batch(&[("Screen Shot 2.png", "https://x/2.png")]), None);

  assert_eq!(report.text, r#"![a](https://x/2.png "Before")"#);
}
