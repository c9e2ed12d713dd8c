//! 플래그 정의(FlagDef/FlagSpec)와 입력 타입 모델.

use std::fmt;
use std::sync::Arc;

use crate::domain::context::{DispatchContext, HandlerFn};
use crate::domain::error::ConsoleError;

pub const HELP_FLAG: &str = "--help";
pub const HELP_SHORT: &str = "-h";

/// 플래그가 요구하는 입력 타입.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    #[default]
    None,
    String,
    Int,
    Float,
}

impl InputKind {
    pub fn requires_input(self) -> bool {
        self != InputKind::None
    }

    /// 도움말에 표시할 입력 자리표시자.
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            InputKind::None => None,
            InputKind::String => Some("<string>"),
            InputKind::Int => Some("<int>"),
            InputKind::Float => Some("<float>"),
        }
    }

    /// 토큰을 입력 타입에 맞게 변환한다. 실패 시 `None`.
    pub fn coerce(self, token: &str) -> Option<FlagValue> {
        match self {
            InputKind::None => None,
            InputKind::String => Some(FlagValue::Str(token.to_string())),
            InputKind::Int => token.parse().ok().map(FlagValue::Int),
            InputKind::Float => token.parse().ok().map(FlagValue::Float),
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputKind::None => "no",
            InputKind::String => "string",
            InputKind::Int => "integer",
            InputKind::Float => "float",
        };
        f.write_str(name)
    }
}

/// 변환이 끝난 플래그 입력값.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl FlagValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FlagValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FlagValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Str(s) => f.write_str(s),
            FlagValue::Int(v) => write!(f, "{v}"),
            FlagValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// 로깅 라우팅을 바꾸는 내장 시작 플래그.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFlag {
    Log,
    LogStdout,
    Verbose,
    Debug,
    VerboseDebug,
}

impl LogFlag {
    pub const ALL: [LogFlag; 5] = [
        LogFlag::Log,
        LogFlag::LogStdout,
        LogFlag::Verbose,
        LogFlag::Debug,
        LogFlag::VerboseDebug,
    ];

    pub fn long_name(self) -> &'static str {
        match self {
            LogFlag::Log => "--log",
            LogFlag::LogStdout => "--log-stdout",
            LogFlag::Verbose => "--verbose",
            LogFlag::Debug => "--debug",
            LogFlag::VerboseDebug => "--verbose-debug",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            LogFlag::Log => "-l",
            LogFlag::LogStdout => "-L",
            LogFlag::Verbose => "-v",
            LogFlag::Debug => "-d",
            LogFlag::VerboseDebug => "-D",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            LogFlag::Log => "write enabled log channels to the log file",
            LogFlag::LogStdout => "write enabled log channels to stdout",
            LogFlag::Verbose => "enable the plain log channel",
            LogFlag::Debug => "enable the debug log channel",
            LogFlag::VerboseDebug => "enable the verbose-debug log channel",
        }
    }
}

/// 플래그 활성화 시 실행할 동작.
/// 핸들러가 없는 플래그는 콘솔의 기본 플래그 핸들러로 처리된다.
#[derive(Clone)]
pub enum FlagHandler {
    Call(HandlerFn),
    /// 소유 명령(또는 시작 플래그)의 도움말 출력
    Help,
    /// 디스패치 엔진이 사용자 핸들러보다 먼저 소비하는 로깅 플래그
    Logging(LogFlag),
}

impl fmt::Debug for FlagHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagHandler::Call(_) => f.write_str("Call(..)"),
            FlagHandler::Help => f.write_str("Help"),
            FlagHandler::Logging(flag) => f.debug_tuple("Logging").field(flag).finish(),
        }
    }
}

/// 등록 전 플래그 정의 빌더. `Command::add_flag`에서 정규화/검증된다.
#[derive(Debug, Clone)]
pub struct FlagDef {
    long: String,
    short: Option<String>,
    description: String,
    input: InputKind,
    handler: Option<FlagHandler>,
}

impl FlagDef {
    /// `"--name"`, `"-name"`, `"name"` 모두 허용한다.
    pub fn new(long: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            short: None,
            description: String::new(),
            input: InputKind::None,
            handler: None,
        }
    }

    /// `"-x"`, `"x"` 모두 허용한다.
    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn input(mut self, kind: InputKind) -> Self {
        self.input = kind;
        self
    }

    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut DispatchContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.handler = Some(FlagHandler::Call(Arc::new(handler)));
        self
    }

    pub(crate) fn builtin(mut self, handler: FlagHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// 이름을 정규 형식으로 바꾸고 검증한다.
    pub fn build(self) -> Result<FlagSpec, ConsoleError> {
        let long_name = normalize_long(&self.long)?;
        let short_name = match self.short.as_deref() {
            Some(raw) => Some(normalize_short(&long_name, raw)?),
            None => None,
        };

        Ok(FlagSpec {
            long_name,
            short_name,
            description: self.description,
            input_kind: self.input,
            handler: self.handler,
        })
    }
}

/// 검증이 끝난 불변 플래그 정의.
#[derive(Debug, Clone)]
pub struct FlagSpec {
    long_name: String,
    short_name: Option<String>,
    description: String,
    input_kind: InputKind,
    handler: Option<FlagHandler>,
}

impl FlagSpec {
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_kind(&self) -> InputKind {
        self.input_kind
    }

    pub fn handler(&self) -> Option<&FlagHandler> {
        self.handler.as_ref()
    }

    pub fn is_help(&self) -> bool {
        matches!(self.handler, Some(FlagHandler::Help))
    }

    pub fn log_flag(&self) -> Option<LogFlag> {
        match self.handler {
            Some(FlagHandler::Logging(flag)) => Some(flag),
            _ => None,
        }
    }

    /// long 이름 다음 short 이름 순으로 토큰과 비교한다.
    pub fn matches(&self, token: &str) -> bool {
        self.long_name == token || self.short_name.as_deref() == Some(token)
    }
}

fn normalize_long(raw: &str) -> Result<String, ConsoleError> {
    let name = raw.trim_start_matches('-');
    if name.is_empty() {
        return Err(invalid(raw, "long name is empty"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(invalid(raw, "long name must not contain whitespace"));
    }
    Ok(format!("--{name}"))
}

fn normalize_short(long_name: &str, raw: &str) -> Result<String, ConsoleError> {
    let name = raw.trim_start_matches('-');
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if !ch.is_whitespace() => Ok(format!("-{ch}")),
        _ => Err(invalid(
            long_name,
            &format!("short name `{raw}` must be a single character"),
        )),
    }
}

fn invalid(flag: &str, reason: &str) -> ConsoleError {
    ConsoleError::InvalidFlagDefinition {
        flag: flag.to_string(),
        reason: reason.to_string(),
    }
}
