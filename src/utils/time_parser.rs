//! 过期时间解析
//!
//! 向导第三步和 update 命令共用，支持 RFC3339 和相对时间两种输入

use chrono::{DateTime, Duration, Utc};

pub struct TimeParser;

impl TimeParser {
    /// 解析过期时间字符串，支持：
    /// - RFC3339 格式：2026-10-01T12:00:00Z
    /// - 相对时间：1d, 2w, 3h, 1y
    /// - 组合格式：1d2h30m
    pub fn parse_expire_time(input: &str) -> Result<DateTime<Utc>, String> {
        let input = input.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(dt.with_timezone(&Utc));
        }

        Self::parse_relative_time(input)
    }

    fn parse_relative_time(input: &str) -> Result<DateTime<Utc>, String> {
        let mut total_duration = Duration::zero();
        let mut remaining = input;

        while !remaining.is_empty() {
            let num_str: String = remaining
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();

            if num_str.is_empty() {
                return Err(format!("Invalid time format: '{}'", input));
            }
            remaining = &remaining[num_str.len()..];

            let num: i64 = num_str
                .parse()
                .map_err(|_| format!("Invalid number: '{}'", num_str))?;

            let unit_str: String = remaining.chars().take_while(|c| c.is_alphabetic()).collect();

            if unit_str.is_empty() {
                return Err(format!("Missing time unit after '{}'", num));
            }

            let duration = match unit_str.to_lowercase().as_str() {
                "s" | "sec" | "second" | "seconds" => Duration::seconds(num),
                "m" | "min" | "minute" | "minutes" => Duration::minutes(num),
                "h" | "hour" | "hours" => Duration::hours(num),
                "d" | "day" | "days" => Duration::days(num),
                "w" | "week" | "weeks" => Duration::weeks(num),
                "y" | "year" | "years" => Duration::days(num * 365), // 近似365天
                _ => return Err(format!("Unsupported time unit: '{}'", unit_str)),
            };

            total_duration += duration;
            remaining = &remaining[unit_str.len()..];
        }

        if total_duration == Duration::zero() {
            return Err("Time interval cannot be zero".to_string());
        }

        let now = Utc::now();
        now.checked_add_signed(total_duration)
            .ok_or_else(|| "Computed expire time out of range".to_string())
    }
}
