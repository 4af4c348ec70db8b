use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Render a provider date as `Month D, YYYY`, e.g. `March 1, 2024`.
pub fn display_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let date = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()?;
    Some(date.format("%B %-d, %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wordpress_format() {
        assert_eq!(display_date("2024-03-01 09:30:00").as_deref(), Some("March 1, 2024"));
    }

    #[test]
    fn rfc3339_and_plain_date() {
        assert_eq!(
            display_date("2024-09-30T10:00:00+02:00").as_deref(),
            Some("September 30, 2024")
        );
        assert_eq!(display_date("2023-11-21").as_deref(), Some("November 21, 2023"));
    }

    #[test]
    fn junk_is_none() {
        assert_eq!(display_date(""), None);
        assert_eq!(display_date("0000-00-00 00:00:00"), None);
        assert_eq!(display_date("yesterday"), None);
    }
}
