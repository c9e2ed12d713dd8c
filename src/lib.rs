//! cmdconsole library root.
//! 선언형 명령/플래그 등록, 시작 플래그 처리, 대화형 콘솔 루프를 계층별로 노출한다.

use anyhow::Result;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;

pub use application::config::{ConsoleSettings, LoggingSettings};
pub use application::console::{Console, ConsoleIo, LineOutcome, StartupPhase};
pub use application::logging::{LogChannel, LogRouting, LogSink, emit};
pub use application::ports::{
    CommandSummary, ConsoleOutput, LineSource, LogConfigurator, ReadOutcome,
};
pub use application::repl::{CancelSignal, ConsoleHandle, StartMode};
pub use application::startup::StartupOutcome;
pub use domain::command::{Command, CommandHandler};
pub use domain::context::DispatchContext;
pub use domain::error::ConsoleError;
pub use domain::flag::{FlagDef, FlagSpec, FlagValue, InputKind, LogFlag};
pub use domain::parse::{Activation, ParseResult, parse, tokenize};
pub use interface::ConsoleComposition;

/// 설정 파일과 터미널 어댑터로 콘솔을 만든다.
pub fn console(app_name: &str) -> Result<Console> {
    ConsoleComposition::new(app_name).console()
}
