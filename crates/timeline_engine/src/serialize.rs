use timeline_core::Record;

/// CSV header, matching the record field names and their order.
pub const CSV_HEADER: [&str; 11] = [
    "text",
    "authorDisplayName",
    "authorHandle",
    "authorImageUrl",
    "createdAt",
    "permalink",
    "isPromoted",
    "replyCount",
    "shareCount",
    "likeCount",
    "viewCount",
];

/// Serialize records to CSV text: fixed header row, absent fields empty,
/// booleans and numbers stringified plainly. An empty record set
/// serializes to the empty string.
pub fn to_csv(records: &[Record]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(CSV_HEADER.join(","));
    for record in records {
        let fields = [
            quote(record.text.as_deref().unwrap_or("")),
            quote(record.author_display_name.as_deref().unwrap_or("")),
            quote(record.author_handle.as_deref().unwrap_or("")),
            quote(record.author_image_url.as_deref().unwrap_or("")),
            quote(record.created_at.as_deref().unwrap_or("")),
            quote(record.permalink.as_deref().unwrap_or("")),
            record.is_promoted.to_string(),
            record.reply_count.to_string(),
            record.share_count.to_string(),
            record.like_count.to_string(),
            record.view_count.to_string(),
        ];
        rows.push(fields.join(","));
    }
    rows.join("\n")
}

/// Serialize records as a JSON array, the structured counterpart of the
/// CSV text. Serialization of plain data cannot fail; degrade to an empty
/// array rather than propagate.
pub fn to_json(records: &[Record]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
}

/// Wrap a field in double quotes when it contains a comma, quote or
/// newline, doubling internal quotes.
fn quote(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
