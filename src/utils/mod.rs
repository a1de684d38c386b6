pub mod sse_buffer;
pub mod time;
pub mod youtube;

pub use sse_buffer::{collect_deltas, SseDecoder, SseEvent};
pub use time::{format_duration, parse_iso8601_duration, parse_simple_time, parse_time_to_seconds};
pub use youtube::extract_youtube_id;
