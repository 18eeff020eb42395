use chrono::{DateTime, Utc};

/// Output filename for one collection run:
/// `tweets-<UTC timestamp, ':' and '.' replaced by '-', whole seconds>.csv`.
pub fn csv_filename(now: DateTime<Utc>) -> String {
    format!("tweets-{}.csv", now.format("%Y-%m-%dT%H-%M-%S"))
}
