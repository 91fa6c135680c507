use time::{macros::format_description, OffsetDateTime, UtcOffset};

/// Current UTC instant as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn now_iso() -> String {
    format_iso(OffsetDateTime::now_utc())
}

pub fn format_iso(at: OffsetDateTime) -> String {
    let fmt = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );
    at.to_offset(UtcOffset::UTC)
        .format(fmt)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}
