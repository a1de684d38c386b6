//! 时间格式化与解析

use regex::Regex;
use std::sync::LazyLock;

static ISO_DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").unwrap());

/// 秒数格式化为 `h:mm:ss`（不足一小时为 `m:ss`）
pub fn format_duration(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

fn parse_parts(input: &str) -> Option<Vec<u32>> {
    input
        .trim()
        .split(':')
        .map(|p| p.trim().parse::<u32>().ok())
        .collect()
}

fn combine(parts: &[u32]) -> Option<u32> {
    match parts {
        [h, m, s] => h
            .checked_mul(3600)?
            .checked_add(m.checked_mul(60)?)?
            .checked_add(*s),
        [m, s] => m.checked_mul(60)?.checked_add(*s),
        _ => None,
    }
}

/// 解析 `h:mm:ss` / `m:ss` / 纯秒数
///
/// 任意一段不是数字时返回 `None`。
pub fn parse_time_to_seconds(input: &str) -> Option<u32> {
    let parts = parse_parts(input)?;
    match parts.as_slice() {
        [secs] => Some(*secs),
        other => combine(other),
    }
}

/// 只接受 `m:ss` 或 `h:mm:ss`（视频聊天的讲解区间输入）
pub fn parse_simple_time(input: &str) -> Option<u32> {
    if input.trim().is_empty() {
        return None;
    }
    combine(&parse_parts(input)?)
}

/// 解析 ISO 8601 时长（`PT1H2M3S`），无法识别时为 0
pub fn parse_iso8601_duration(iso: &str) -> u32 {
    let Some(caps) = ISO_DURATION.captures(iso) else {
        return 0;
    };
    let field = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    };
    field(1)
        .saturating_mul(3600)
        .saturating_add(field(2).saturating_mul(60))
        .saturating_add(field(3))
}
