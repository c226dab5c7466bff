//! API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::errors::{AfflinkError, Result};

use super::types::ApiResponse;

/// 错误码数字化：E003 -> 3，拆不开时归到 -1
fn numeric_code(err: &AfflinkError) -> i32 {
    err.code()
        .trim_start_matches('E')
        .parse()
        .unwrap_or(-1)
}

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: i32,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, 0, "OK", Some(data))
}

/// 从 AfflinkError 构建错误响应（自动映射 HTTP 状态码）
pub fn error_from_afflink(err: &AfflinkError) -> HttpResponse {
    json_response::<()>(err.http_status(), numeric_code(err), err.message(), None)
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T: Serialize>(result: Result<T>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_afflink(&e),
    }
}

/// 取上游身份代理写入的 X-User-Id
///
/// 网关保证该头可信，这里只做存在性校验。
pub fn owner_from_request(req: &HttpRequest) -> Result<String> {
    req.headers()
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().to_string())
        .ok_or_else(|| AfflinkError::invalid_input("缺少 X-User-Id 请求头"))
}

/// 解析统计区间起点：RFC3339 或 YYYY-MM-DD（当天零点）
pub fn parse_range_start(raw: &str) -> Result<DateTime<Utc>> {
    parse_date_param(raw, false)
}

/// 解析统计区间终点：RFC3339 原样使用，YYYY-MM-DD 含当天整天
pub fn parse_range_end(raw: &str) -> Result<DateTime<Utc>> {
    parse_date_param(raw, true)
}

fn parse_date_param(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| AfflinkError::date_parse(format!("日期格式无效 '{}': {}", raw, e)))?;

    // 裸日期作为终点时取次日零点，让 [start, end) 覆盖整天
    let date = if end_of_day {
        date.checked_add_days(Days::new(1))
            .ok_or_else(|| AfflinkError::date_parse(format!("日期超出范围: {}", raw)))?
    } else {
        date
    };

    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date_start() {
        let dt = parse_range_start("2024-01-15").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T00:00:00+00:00");
    }

    #[test]
    fn test_parse_plain_date_end_covers_whole_day() {
        let dt = parse_range_end("2024-01-15").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-16T00:00:00+00:00");
    }

    #[test]
    fn test_parse_rfc3339_passthrough() {
        let dt = parse_range_end("2024-01-15T12:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T12:30:00+00:00");
    }

    #[test]
    fn test_parse_garbage_date() {
        assert!(parse_range_start("15/01/2024").is_err());
        assert!(parse_range_start("").is_err());
    }
}
