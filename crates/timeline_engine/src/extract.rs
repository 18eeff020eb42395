use timeline_core::{parse_count, to_absolute_url, Record};
use url::Url;

use crate::source::{ActionKind, ItemSource, UserIdentity};

/// Trimmed span content that marks a promoted item.
const PROMOTED_LABEL: &str = "Ad";

/// Signature of an inline vector placeholder standing in for a real photo.
const SVG_PLACEHOLDER_SIGNATURE: &str = "data:image/svg+xml";

/// Produce a candidate record from one item node.
///
/// Returns `None` only when the node itself is not a structural element;
/// any lookup failure inside a valid item degrades to that field's default
/// and never aborts extraction of the remaining fields. Reading the node
/// does not mutate it, so the same node state always yields the same record.
pub fn extract<S: ItemSource>(source: &S, node: &S::Node) -> Option<Record> {
    if !source.is_element(node) {
        return None;
    }

    let text = join_segments(source.text_segments(node));

    let (author_display_name, author_handle) = match source.identity(node) {
        Some(UserIdentity {
            display_name,
            handle,
        }) => (non_empty(display_name), non_empty(handle)),
        None => (None, None),
    };

    let origin = source.origin();
    let author_image_url = resolve_avatar(source, node);
    let created_at = source.time_datetime(node);
    let permalink = source
        .time_permalink(node)
        .and_then(|href| to_absolute_url(&href, &origin));

    let is_promoted = source
        .span_texts(node)
        .iter()
        .any(|span| span.trim() == PROMOTED_LABEL)
        || source.has_tracking_marker(node);

    let reply_count = action_count(source, node, ActionKind::Reply);
    let share_count = action_count(source, node, ActionKind::Share);
    let like_count = action_count(source, node, ActionKind::Like);
    let view_count = source
        .analytics_label(node)
        .map(|label| parse_count(&label))
        .unwrap_or(0);

    Some(Record {
        text,
        author_display_name,
        author_handle,
        author_image_url,
        created_at,
        permalink,
        is_promoted,
        reply_count,
        share_count,
        like_count,
        view_count,
    })
}

/// The avatar step alone, reused by the deferred completion recheck so the
/// full extractor is never re-run for a buffered record.
///
/// Rejects the bare origin URL and inline vector placeholders; both are
/// rendering artifacts, not photos.
pub fn resolve_avatar<S: ItemSource>(source: &S, node: &S::Node) -> Option<String> {
    let src = source.avatar_src(node)?;
    let origin = source.origin();
    let url = to_absolute_url(&src, &origin)?;
    if is_placeholder_avatar(&url, &origin) {
        return None;
    }
    Some(url)
}

fn is_placeholder_avatar(url: &str, origin: &Url) -> bool {
    if url.contains(SVG_PLACEHOLDER_SIGNATURE) {
        return true;
    }
    match Url::parse(url) {
        Ok(parsed) => {
            parsed.origin() == origin.origin()
                && parsed.path() == "/"
                && parsed.query().is_none()
                && parsed.fragment().is_none()
        }
        Err(_) => false,
    }
}

/// Trim each text segment and join with newlines; an empty result is
/// absent, not an empty string.
fn join_segments(segments: Vec<String>) -> Option<String> {
    let joined = segments
        .iter()
        .map(|segment| segment.trim())
        .collect::<Vec<_>>()
        .join("\n");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn action_count<S: ItemSource>(source: &S, node: &S::Node, action: ActionKind) -> u64 {
    source
        .action_label(node, action)
        .map(|label| parse_count(&label))
        .unwrap_or(0)
}
