use serde::Serialize;

/// One harvested timeline item.
///
/// Every field except the author image is resolved synchronously at
/// extraction time; the image loads asynchronously and may be backfilled
/// once while the record sits in the completion buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Item text, multi-segment joined by newline. Absent, not empty.
    pub text: Option<String>,
    pub author_display_name: Option<String>,
    pub author_handle: Option<String>,
    /// Absolute URL of the author image; placeholder artifacts are
    /// rejected at extraction and count as absent.
    pub author_image_url: Option<String>,
    /// ISO-8601 timestamp as published by the source.
    pub created_at: Option<String>,
    pub permalink: Option<String>,
    pub is_promoted: bool,
    pub reply_count: u64,
    pub share_count: u64,
    pub like_count: u64,
    pub view_count: u64,
}

impl Record {
    /// A record is complete once its author image has resolved; all other
    /// fields default to empty/zero and never arrive late.
    pub fn is_complete(&self) -> bool {
        self.author_image_url.is_some()
    }
}
