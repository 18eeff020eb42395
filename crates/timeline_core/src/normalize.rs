use url::Url;

/// Resolve a possibly-relative URL against the document origin.
///
/// Fails closed to `None` on malformed input; never panics.
pub fn to_absolute_url(raw: &str, origin: &Url) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    origin.join(trimmed).ok().map(Into::into)
}

/// Parse an engagement-count label into a non-negative integer.
///
/// Accepts plain integers (commas ignored), `K`/`k` shorthand (x1 000) and
/// `M`/`m` shorthand (x1 000 000), rounded to nearest. Empty or otherwise
/// malformed input parses to 0.
pub fn parse_count(raw: &str) -> u64 {
    let txt: String = raw.chars().filter(|c| *c != ',').collect();
    let txt = txt.trim();
    if txt.is_empty() {
        return 0;
    }

    if txt.bytes().all(|b| b.is_ascii_digit()) {
        return txt.parse().unwrap_or(0);
    }

    let Some(suffix) = txt.chars().last() else {
        return 0;
    };
    let scale = match suffix {
        'K' | 'k' => 1_000.0,
        'M' | 'm' => 1_000_000.0,
        _ => return 0,
    };
    let number = &txt[..txt.len() - suffix.len_utf8()];
    if !is_decimal(number) {
        return 0;
    }
    number
        .parse::<f64>()
        .map(|value| (value * scale).round() as u64)
        .unwrap_or(0)
}

/// Matches `[0-9]*.?[0-9]+`: optional integer part, at most one dot,
/// mandatory trailing digits.
fn is_decimal(txt: &str) -> bool {
    let mut dots = 0;
    for b in txt.bytes() {
        match b {
            b'0'..=b'9' => {}
            b'.' => dots += 1,
            _ => return false,
        }
    }
    dots <= 1 && txt.bytes().last().is_some_and(|b| b.is_ascii_digit())
}
