//! 콘솔이 사용하는 설정 스키마(순수 데이터).
//!
//! 주의: 파일/환경변수 접근은 `infrastructure::config`에서만 수행한다.

use serde::Deserialize;

use crate::application::logging::LogSink;

pub const DEFAULT_PROMPT: &str = "> ";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConsoleSettings {
    /// 콘솔 입력 프롬프트
    pub prompt: Option<String>,
    /// raw 모드 입력 편집기 사용 여부(기본 true, TTY가 아니면 자동으로 일반 입력)
    pub interactive_input: Option<bool>,
    /// 내장 `help`/`exit` 명령 등록 여부(기본 true)
    pub builtin_commands: Option<bool>,
    /// 내장 `--help`/로깅 시작 플래그 등록 여부(기본 true)
    pub builtin_flags: Option<bool>,
    /// 로그 채널 기본 라우팅
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingSettings {
    /// 파일 출력 경로(기본 `<app>.log`)
    pub file: Option<String>,
    /// 시작 플래그로 출력 대상을 지정하지 않았을 때의 기본 대상
    pub sink: Option<LogSink>,
    pub plain: Option<bool>,
    pub debug: Option<bool>,
    pub verbose_debug: Option<bool>,
}

impl ConsoleSettings {
    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
    }

    pub fn interactive_input(&self) -> bool {
        self.interactive_input.unwrap_or(true)
    }

    pub fn builtin_commands(&self) -> bool {
        self.builtin_commands.unwrap_or(true)
    }

    pub fn builtin_flags(&self) -> bool {
        self.builtin_flags.unwrap_or(true)
    }

    /// 우선순위가 높은 설정 값으로 덮어쓴다.
    pub fn merge_from(&mut self, other: ConsoleSettings) {
        if other.prompt.is_some() {
            self.prompt = other.prompt;
        }
        if other.interactive_input.is_some() {
            self.interactive_input = other.interactive_input;
        }
        if other.builtin_commands.is_some() {
            self.builtin_commands = other.builtin_commands;
        }
        if other.builtin_flags.is_some() {
            self.builtin_flags = other.builtin_flags;
        }
        self.logging.merge_from(other.logging);
    }
}

impl LoggingSettings {
    pub fn sink(&self) -> LogSink {
        self.sink.unwrap_or(LogSink::Console)
    }

    pub fn file_or(&self, app_name: &str) -> String {
        self.file
            .clone()
            .unwrap_or_else(|| format!("{app_name}.log"))
    }

    pub fn merge_from(&mut self, other: LoggingSettings) {
        if other.file.is_some() {
            self.file = other.file;
        }
        if other.sink.is_some() {
            self.sink = other.sink;
        }
        if other.plain.is_some() {
            self.plain = other.plain;
        }
        if other.debug.is_some() {
            self.debug = other.debug;
        }
        if other.verbose_debug.is_some() {
            self.verbose_debug = other.verbose_debug;
        }
    }
}
