//! 콘솔 라인 입력 포트 구현체.

mod editor;
mod scripted;
mod stdin;

pub use editor::EditorLineSource;
pub use scripted::{ChannelLineSource, ScriptedLineSource};
pub use stdin::StdinLineSource;
