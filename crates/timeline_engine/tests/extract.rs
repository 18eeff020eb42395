use pretty_assertions::assert_eq;
use timeline_engine::{extract, resolve_avatar, DomSource, ItemSource};
use url::Url;

fn source() -> DomSource {
    DomSource::new(Url::parse("https://x.com").unwrap())
}

fn full_tweet(avatar_src: &str) -> String {
    format!(
        r#"<html><body><main>
        <article data-testid="tweet">
          <div data-testid="UserAvatar-Container-ada"><img src="{avatar_src}"></div>
          <div data-testid="User-Name">
            <div dir="ltr"><span>Ada Lovelace</span></div>
            <a role="link" tabindex="-1" href="/ada"><span>@ada</span></a>
          </div>
          <div data-testid="tweetText"><span>First segment</span></div>
          <div data-testid="tweetText"><span>Second segment</span></div>
          <a href="/ada/status/123"><time datetime="2026-08-29T10:00:00.000Z">2h</time></a>
          <button data-testid="reply"><span><span>1,234</span></span></button>
          <button data-testid="retweet"><span><span>2.5K</span></span></button>
          <button data-testid="like"><span><span>3M</span></span></button>
          <a href="/ada/status/123/analytics"><span><span>45.1K</span></span></a>
        </article>
        </main></body></html>"#
    )
}

#[test]
fn extracts_every_field_from_a_fully_rendered_item() {
    let source = source();
    source.push_document(&full_tweet("https://pbs.example.net/ada.jpg"));
    let items = source.items_in_document();
    assert_eq!(items.len(), 1);

    let record = extract(&source, &items[0]).expect("item is a record");
    assert_eq!(record.text.as_deref(), Some("First segment\nSecond segment"));
    assert_eq!(record.author_display_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(record.author_handle.as_deref(), Some("@ada"));
    assert_eq!(
        record.author_image_url.as_deref(),
        Some("https://pbs.example.net/ada.jpg")
    );
    assert_eq!(
        record.created_at.as_deref(),
        Some("2026-08-29T10:00:00.000Z")
    );
    assert_eq!(
        record.permalink.as_deref(),
        Some("https://x.com/ada/status/123")
    );
    assert!(!record.is_promoted);
    assert_eq!(record.reply_count, 1234);
    assert_eq!(record.share_count, 2500);
    assert_eq!(record.like_count, 3_000_000);
    assert_eq!(record.view_count, 45_100);
    assert!(record.is_complete());
}

#[test]
fn extraction_is_pure_for_unchanged_node_state() {
    let source = source();
    source.push_document(&full_tweet("https://pbs.example.net/ada.jpg"));
    let node = source.items_in_document().remove(0);
    assert_eq!(extract(&source, &node), extract(&source, &node));
}

#[test]
fn missing_sub_elements_degrade_to_field_defaults() {
    let source = source();
    source.push_document(
        r#"<html><body><article data-testid="tweet"></article></body></html>"#,
    );
    let node = source.items_in_document().remove(0);

    let record = extract(&source, &node).expect("bare item still extracts");
    assert_eq!(record.text, None);
    assert_eq!(record.author_display_name, None);
    assert_eq!(record.author_handle, None);
    assert_eq!(record.author_image_url, None);
    assert_eq!(record.created_at, None);
    assert_eq!(record.permalink, None);
    assert!(!record.is_promoted);
    assert_eq!(record.reply_count, 0);
    assert_eq!(record.view_count, 0);
    assert!(!record.is_complete());
}

#[test]
fn empty_text_is_absent_not_empty_string() {
    let source = source();
    source.push_document(
        r#"<html><body><article data-testid="tweet">
        <div data-testid="tweetText"></div>
        </article></body></html>"#,
    );
    let node = source.items_in_document().remove(0);
    assert_eq!(extract(&source, &node).unwrap().text, None);
}

#[test]
fn svg_placeholder_avatar_counts_as_absent() {
    let source = source();
    source.push_document(&full_tweet("data:image/svg+xml,%3Csvg%20xmlns%3D..."));
    let node = source.items_in_document().remove(0);
    assert_eq!(resolve_avatar(&source, &node), None);
    assert!(!extract(&source, &node).unwrap().is_complete());
}

#[test]
fn bare_origin_avatar_counts_as_absent() {
    let source = source();
    source.push_document(&full_tweet("/"));
    let node = source.items_in_document().remove(0);
    assert_eq!(resolve_avatar(&source, &node), None);
}

#[test]
fn literal_ad_span_marks_the_item_promoted() {
    let source = source();
    source.push_document(
        r#"<html><body><article data-testid="tweet">
        <span> Ad </span>
        </article></body></html>"#,
    );
    let node = source.items_in_document().remove(0);
    assert!(extract(&source, &node).unwrap().is_promoted);
}

#[test]
fn ad_prefixed_span_text_is_not_a_promotion_marker() {
    let source = source();
    source.push_document(
        r#"<html><body><article data-testid="tweet">
        <span>Advert for something</span>
        </article></body></html>"#,
    );
    let node = source.items_in_document().remove(0);
    assert!(!extract(&source, &node).unwrap().is_promoted);
}

#[test]
fn tracking_marker_marks_the_item_promoted() {
    let source = source();
    source.push_document(
        r#"<html><body><article data-testid="tweet">
        <div data-testid="placementTracking-1"></div>
        </article></body></html>"#,
    );
    let node = source.items_in_document().remove(0);
    assert!(extract(&source, &node).unwrap().is_promoted);
}

#[test]
fn items_under_an_added_root_finds_descendants_only() {
    let source = source();
    let root = source.push_document(&format!(
        "<html><body>{}{}</body></html>",
        full_tweet("https://pbs.example.net/a.jpg"),
        full_tweet("https://pbs.example.net/b.jpg")
    ));
    // full_tweet wraps each article in <main>, so two nested items.
    assert_eq!(source.items_under(&root).len(), 2);
}

#[test]
fn stale_node_after_document_rewrite_is_not_a_record() {
    let source = source();
    let root = source.push_document(&full_tweet("https://pbs.example.net/ada.jpg"));
    let node = source.items_in_document().remove(0);

    source.rewrite_document(root, "<html></html>");
    assert!(!source.is_element(&node));
    assert_eq!(extract(&source, &node), None);
}

#[test]
fn rewriting_a_document_in_place_lets_the_avatar_resolve_late() {
    let source = source();
    let root = source.push_document(&full_tweet("data:image/svg+xml,placeholder"));
    let node = source.items_in_document().remove(0);
    assert_eq!(resolve_avatar(&source, &node), None);

    // Same element structure, real image: the handle stays valid.
    source.rewrite_document(root, &full_tweet("https://pbs.example.net/ada.jpg"));
    assert_eq!(
        resolve_avatar(&source, &node).as_deref(),
        Some("https://pbs.example.net/ada.jpg")
    );
}
