/// SSE 流解码器
///
/// 把任意切分的字节块还原为 OpenAI 风格的 `data:` 帧：
/// - 使用有状态 UTF-8 解码器，多字节字符可以跨 chunk
/// - 只处理以 `\n` 结尾的完整行，末尾不完整的行留在缓冲区
/// - `[DONE]` 之后不再处理任何行
/// - JSON 解析失败的行连同换行符推回缓冲区头部，本 chunk 停止提取；
///   收到新字节后重试一次，仍失败则丢弃
use encoding_rs::UTF_8;
use serde_json::Value;
use tracing::{debug, warn};

const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

/// 解码出的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// `choices[0].delta.content` 文本片段
    Delta(String),
    /// 收到 `[DONE]`
    Done,
}

pub struct SseDecoder {
    decoder: encoding_rs::Decoder,
    buffer: String,
    done: bool,
    /// 缓冲区头部是上次推回的行
    retrying: bool,
}

enum LineOutcome {
    Skip,
    Delta(String),
    Done,
    Unparsable,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self {
            decoder: UTF_8.new_decoder_without_bom_handling(),
            buffer: String::new(),
            done: false,
            retrying: false,
        }
    }

    /// 是否已收到 `[DONE]`
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// 缓冲区中是否还有未处理的文本
    pub fn has_remaining(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// 处理新到达的字节块
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        if self.done {
            return Vec::new();
        }
        // 没有新文本（空 chunk 或半个多字节字符）时不消耗重试机会
        if !self.decode_into_buffer(chunk, false) {
            return Vec::new();
        }
        self.drain_lines(false)
    }

    /// 流结束：冲刷解码器，并把剩余内容（包括没有换行结尾的最后一行）处理一次
    pub fn finish(&mut self) -> Vec<SseEvent> {
        if self.done {
            return Vec::new();
        }
        self.decode_into_buffer(&[], true);
        if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
        let events = self.drain_lines(true);
        self.buffer.clear();
        events
    }

    /// 返回是否追加了新文本
    fn decode_into_buffer(&mut self, bytes: &[u8], last: bool) -> bool {
        let capacity = self
            .decoder
            .max_utf8_buffer_length(bytes.len())
            .unwrap_or(bytes.len() * 3 + 4);
        let mut decoded = String::with_capacity(capacity);
        let (_, _, had_errors) = self.decoder.decode_to_string(bytes, &mut decoded, last);
        if had_errors {
            warn!("[SseDecoder] Malformed UTF-8 replaced with U+FFFD");
        }
        self.buffer.push_str(&decoded);
        !decoded.is_empty()
    }

    /// 逐行提取。`final_pass` 为 true 时解析失败的行直接丢弃
    fn drain_lines(&mut self, final_pass: bool) -> Vec<SseEvent> {
        let mut events = Vec::new();

        while let Some(newline) = self.buffer.find('\n') {
            let mut line: String = self.buffer.drain(..=newline).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            let was_retry = std::mem::replace(&mut self.retrying, false);

            match Self::classify(&line) {
                LineOutcome::Skip => {}
                LineOutcome::Delta(text) => events.push(SseEvent::Delta(text)),
                LineOutcome::Done => {
                    debug!("[SseDecoder] Received [DONE]");
                    self.done = true;
                    self.buffer.clear();
                    events.push(SseEvent::Done);
                    break;
                }
                LineOutcome::Unparsable => {
                    if was_retry || final_pass {
                        warn!("[SseDecoder] Dropping unparsable frame: {}", line);
                        continue;
                    }
                    line.push('\n');
                    self.buffer.insert_str(0, &line);
                    self.retrying = true;
                    break;
                }
            }
        }

        events
    }

    fn classify(line: &str) -> LineOutcome {
        if line.trim().is_empty() || line.starts_with(':') {
            return LineOutcome::Skip;
        }
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            return LineOutcome::Skip;
        };
        let payload = payload.trim();
        if payload == DONE_SENTINEL {
            return LineOutcome::Done;
        }

        match serde_json::from_str::<Value>(payload) {
            Ok(json) => match json
                .pointer("/choices/0/delta/content")
                .and_then(Value::as_str)
            {
                Some(text) if !text.is_empty() => LineOutcome::Delta(text.to_string()),
                _ => LineOutcome::Skip,
            },
            Err(_) => LineOutcome::Unparsable,
        }
    }
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// 从事件序列中拼接文本
pub fn collect_deltas(events: &[SseEvent]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            SseEvent::Delta(text) => Some(text.as_str()),
            SseEvent::Done => None,
        })
        .collect()
}
