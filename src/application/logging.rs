//! 로그 채널 라우팅 규칙.
//!
//! 채널 세 개(plain/debug/verbose-debug)가 각자 출력 대상(none/console/file/both)을 가진다.
//! 채널은 tracing 레벨로 구분한다: INFO 이상 = plain, DEBUG = debug, TRACE = verbose-debug.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::Level;

use crate::application::config::LoggingSettings;
use crate::domain::flag::LogFlag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogChannel {
    Plain,
    Debug,
    VerboseDebug,
}

impl LogChannel {
    pub fn for_level(level: &Level) -> Self {
        match *level {
            Level::TRACE => LogChannel::VerboseDebug,
            Level::DEBUG => LogChannel::Debug,
            _ => LogChannel::Plain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSink {
    None,
    Console,
    File,
    Both,
}

impl LogSink {
    pub fn from_targets(console: bool, file: bool) -> Self {
        match (console, file) {
            (true, true) => LogSink::Both,
            (true, false) => LogSink::Console,
            (false, true) => LogSink::File,
            (false, false) => LogSink::None,
        }
    }

    pub fn to_console(self) -> bool {
        matches!(self, LogSink::Console | LogSink::Both)
    }

    pub fn to_file(self) -> bool {
        matches!(self, LogSink::File | LogSink::Both)
    }
}

/// 채널별 최종 출력 대상.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRouting {
    pub plain: LogSink,
    pub debug: LogSink,
    pub verbose_debug: LogSink,
    pub file: PathBuf,
}

impl LogRouting {
    /// 설정 기본값과 시작 로깅 플래그를 합쳐 라우팅을 결정한다.
    /// - `--verbose`/`--debug`/`--verbose-debug`: 각 채널 활성화
    /// - `--log`/`--log-stdout`: plain 채널 활성화 + 출력 대상 지정(설정 대상을 대체)
    pub fn resolve(settings: &LoggingSettings, app_name: &str, flags: &[LogFlag]) -> Self {
        let has = |flag: LogFlag| flags.contains(&flag);

        let to_file = has(LogFlag::Log);
        let to_stdout = has(LogFlag::LogStdout);
        let sink = if to_file || to_stdout {
            LogSink::from_targets(to_stdout, to_file)
        } else {
            settings.sink()
        };

        let plain =
            settings.plain.unwrap_or(false) || has(LogFlag::Verbose) || to_file || to_stdout;
        let debug = settings.debug.unwrap_or(false) || has(LogFlag::Debug);
        let verbose_debug =
            settings.verbose_debug.unwrap_or(false) || has(LogFlag::VerboseDebug);

        let route = |enabled: bool| if enabled { sink } else { LogSink::None };
        Self {
            plain: route(plain),
            debug: route(debug),
            verbose_debug: route(verbose_debug),
            file: PathBuf::from(settings.file_or(app_name)),
        }
    }

    /// 모든 채널이 꺼진 라우팅.
    pub fn silent(file: PathBuf) -> Self {
        Self {
            plain: LogSink::None,
            debug: LogSink::None,
            verbose_debug: LogSink::None,
            file,
        }
    }

    pub fn sink(&self, channel: LogChannel) -> LogSink {
        match channel {
            LogChannel::Plain => self.plain,
            LogChannel::Debug => self.debug,
            LogChannel::VerboseDebug => self.verbose_debug,
        }
    }

    pub fn console_accepts(&self, level: &Level) -> bool {
        self.sink(LogChannel::for_level(level)).to_console()
    }

    pub fn file_accepts(&self, level: &Level) -> bool {
        self.sink(LogChannel::for_level(level)).to_file()
    }

    /// 어떤 채널도 출력하지 않는지.
    pub fn is_silent(&self) -> bool {
        [self.plain, self.debug, self.verbose_debug]
            .iter()
            .all(|sink| *sink == LogSink::None)
    }

    pub fn writes_file(&self) -> bool {
        [self.plain, self.debug, self.verbose_debug]
            .iter()
            .any(|sink| sink.to_file())
    }
}

/// 로깅 협력자의 `emit(level, message)` 진입점.
pub fn emit(channel: LogChannel, message: &str) {
    match channel {
        LogChannel::Plain => tracing::info!("{message}"),
        LogChannel::Debug => tracing::debug!("{message}"),
        LogChannel::VerboseDebug => tracing::trace!("{message}"),
    }
}
