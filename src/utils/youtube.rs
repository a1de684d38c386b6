//! YouTube 链接解析

use regex::Regex;
use std::sync::LazyLock;

// 依次尝试：视频、播放列表、频道、@handle
static YOUTUBE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)",
        r"youtube\.com/playlist\?list=([^&\n?#]+)",
        r"youtube\.com/channel/([^&\n?#]+)",
        r"youtube\.com/@([^&\n?#/]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// 从链接中提取视频 / 播放列表 / 频道 id，不匹配返回 `None`
pub fn extract_youtube_id(url: &str) -> Option<String> {
    YOUTUBE_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// 视频默认缩略图
pub fn thumbnail_url(youtube_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/mqdefault.jpg", youtube_id)
}
