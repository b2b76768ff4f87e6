pub mod app {
    //! parsers for dates provided on the command line of this application,
    //! which use yyyy-mm-dd format. month and day may omit the leading zero.
    use std::sync::LazyLock;

    use chrono::NaiveDate;
    use regex::Regex;

    pub const APP_DATE_FORMAT: &str = "%Y-%m-%d";

    static APP_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^([12][0-9]{3})-([0-9]{1,2})-([0-9]{1,2})$")
            .unwrap_or_else(|e| panic!("invalid date pattern: {e}"))
    });

    /// parses a date argument such as `2024-01-03` or `2024-1-3`.
    pub fn parse_naive_date(date_str: &str) -> Result<NaiveDate, String> {
        let invalid = || format!("Invalid date '{date_str}', expected YYYY-MM-DD");
        let captures = APP_DATE_PATTERN.captures(date_str).ok_or_else(invalid)?;
        let part = |idx: usize| -> Result<u32, String> {
            captures
                .get(idx)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .ok_or_else(invalid)
        };
        let year = part(1)? as i32;
        NaiveDate::from_ymd_opt(year, part(2)?, part(3)?).ok_or_else(invalid)
    }

    /// renders a date in the format accepted by [`parse_naive_date`].
    pub fn format_naive_date(date: &NaiveDate) -> String {
        date.format(APP_DATE_FORMAT).to_string()
    }
}
