/// SSE 字节流消费：解码 + 取消 + 片段回调
use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{StudyError, StudyResult};
use crate::utils::sse_buffer::{SseDecoder, SseEvent};

/// 流结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// 收到 `[DONE]`
    Completed,
    /// 响应体结束但没有 `[DONE]`
    Ended,
    /// 被取消
    Cancelled,
}

/// 消费字节流，按到达顺序把文本片段交给 `on_delta`
///
/// 整个响应体没有任何字节时视为缺少响应体（[`StudyError::MissingBody`]）。
pub async fn decode_sse_stream<S, B, E, F>(
    stream: S,
    cancel: &CancellationToken,
    mut on_delta: F,
) -> StudyResult<StreamOutcome>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<StudyError>,
    F: FnMut(&str),
{
    tokio::pin!(stream);
    let mut decoder = SseDecoder::new();
    let mut received = 0usize;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("[SseStream] Cancelled after {} bytes", received);
                return Ok(StreamOutcome::Cancelled);
            }
            item = stream.next() => item,
        };

        match next {
            Some(Ok(bytes)) => {
                let bytes = bytes.as_ref();
                received += bytes.len();
                for event in decoder.feed(bytes) {
                    match event {
                        SseEvent::Delta(text) => on_delta(&text),
                        SseEvent::Done => return Ok(StreamOutcome::Completed),
                    }
                }
            }
            Some(Err(e)) => return Err(e.into()),
            None => break,
        }
    }

    if received == 0 {
        return Err(StudyError::MissingBody);
    }

    for event in decoder.finish() {
        match event {
            SseEvent::Delta(text) => on_delta(&text),
            SseEvent::Done => return Ok(StreamOutcome::Completed),
        }
    }
    Ok(StreamOutcome::Ended)
}
