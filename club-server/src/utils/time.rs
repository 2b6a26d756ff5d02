//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis 或 ISO 日期字符串。

use chrono::NaiveDate;
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date format: {}", date)))
}

/// 当前营业日 (业务时区) 的 ISO 日期
pub fn today_in(tz: Tz) -> String {
    chrono::Utc::now()
        .with_timezone(&tz)
        .date_naive()
        .format("%Y-%m-%d")
        .to_string()
}

/// 日期 + 天数 → ISO 日期 (会员有效期推算)
pub fn add_days(date: &str, days: i64) -> Result<String, chrono::ParseError> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;
    Ok((parsed + chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string())
}

/// 日期的当天 [start, end) Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn day_bounds_millis(date: NaiveDate, tz: Tz) -> (i64, i64) {
    let start = day_start_millis(date, tz);
    let next = date.succ_opt().unwrap_or(date);
    let end = day_start_millis(next, tz);
    (start, end)
}

fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(0, 0, 0).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}
