//! 日期与时段解析

use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::{AbsenceTrackerError, Result};
use crate::models::absences::entities::Session;

/// 解析缺勤日期
///
/// 支持 `YYYY-MM-DD` 与 RFC 3339 时间戳；时间戳先换算为 UTC 再取日期部分。
pub fn parse_absence_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AbsenceTrackerError::date_parse("Date is required"));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| {
            AbsenceTrackerError::date_parse(format!(
                "Invalid date: '{trimmed}'. Expected YYYY-MM-DD or an RFC 3339 timestamp"
            ))
        })
}

/// 解析上课时段（大小写不敏感）
pub fn parse_session(input: &str) -> Result<Session> {
    input
        .parse::<Session>()
        .map_err(AbsenceTrackerError::validation)
}

/// 日期转换为当天 UTC 零点的时间戳
pub fn date_to_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// 时间戳转换为 UTC 日期
pub fn date_from_timestamp(timestamp: i64) -> NaiveDate {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        let date = parse_absence_date("2024-01-10").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_is_normalized_to_utc() {
        // 东八区 1 月 11 日凌晨对应 UTC 1 月 10 日
        let date = parse_absence_date("2024-01-11T02:30:00+08:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());

        let date = parse_absence_date("2024-01-10T23:59:59Z").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[test]
    fn test_parse_invalid_date() {
        assert!(parse_absence_date("").is_err());
        assert!(parse_absence_date("10/01/2024").is_err());
        let err = parse_absence_date("2024-02-30").unwrap_err();
        assert_eq!(err.code(), "E005");
    }

    #[test]
    fn test_timestamp_roundtrip_is_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let ts = date_to_timestamp(date);
        assert_eq!(ts % 86_400, 0);
        assert_eq!(date_from_timestamp(ts), date);
    }

    #[test]
    fn test_parse_session() {
        assert_eq!(parse_session("morning").unwrap(), Session::Morning);
        assert_eq!(parse_session("Afternoon").unwrap(), Session::Afternoon);
        let err = parse_session("night").unwrap_err();
        assert_eq!(err.code(), "E004");
    }
}
