//! 页面区间测验

pub mod session;
pub mod types;

pub use session::{QuizBackend, QuizSession};
pub use types::QuizRequest;
