//! 토큰 스트림을 플래그 활성화 목록과 잔여 인자로 해석하는 파서.
//!
//! 규칙:
//! - 토큰마다 등록 순서대로 플래그를 비교하고 처음 매칭된 플래그를 사용한다.
//! - 입력이 필요한 플래그는 다음 토큰을 그대로 입력으로 소비한다.
//! - 같은 플래그가 다시 나오면 이전 활성화를 제거하고 끝에 다시 추가한다.
//! - 입력 누락/변환 실패 시 즉시 실패하며 부분 결과는 버린다.

use crate::domain::error::ConsoleError;
use crate::domain::flag::{FlagHandler, FlagSpec, FlagValue, InputKind, LogFlag};

/// 파서 입력 토큰 열. 원시 한 줄(공백 분리) 또는 이미 분리된 토큰 모두 받는다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens(Vec<String>);

impl Tokens {
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// 공백 기준으로 한 줄을 토큰으로 나눈다.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(ToString::to_string).collect()
}

impl From<&str> for Tokens {
    fn from(line: &str) -> Self {
        Tokens(tokenize(line))
    }
}

impl From<&String> for Tokens {
    fn from(line: &String) -> Self {
        Tokens(tokenize(line))
    }
}

impl From<String> for Tokens {
    fn from(line: String) -> Self {
        Tokens(tokenize(&line))
    }
}

impl From<Vec<String>> for Tokens {
    fn from(tokens: Vec<String>) -> Self {
        Tokens(tokens)
    }
}

impl From<&[String]> for Tokens {
    fn from(tokens: &[String]) -> Self {
        Tokens(tokens.to_vec())
    }
}

impl From<Vec<&str>> for Tokens {
    fn from(tokens: Vec<&str>) -> Self {
        Tokens(tokens.into_iter().map(ToString::to_string).collect())
    }
}

impl From<&[&str]> for Tokens {
    fn from(tokens: &[&str]) -> Self {
        Tokens(tokens.iter().map(ToString::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Tokens {
    fn from(tokens: [&str; N]) -> Self {
        Tokens(tokens.iter().map(ToString::to_string).collect())
    }
}

/// 한 줄에서 매칭된 플래그와 변환된 입력값.
#[derive(Debug, Clone)]
pub struct Activation {
    flag: FlagSpec,
    pub value: Option<FlagValue>,
}

impl Activation {
    pub fn flag(&self) -> &FlagSpec {
        &self.flag
    }

    pub fn long_name(&self) -> &str {
        self.flag.long_name()
    }

    pub fn description(&self) -> &str {
        self.flag.description()
    }

    pub fn input_kind(&self) -> InputKind {
        self.flag.input_kind()
    }

    pub fn handler(&self) -> Option<&FlagHandler> {
        self.flag.handler()
    }

    pub fn is_help(&self) -> bool {
        self.flag.is_help()
    }

    pub fn log_flag(&self) -> Option<LogFlag> {
        self.flag.log_flag()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// 마지막 등장 순서로 정렬된 활성화 목록
    pub active_flags: Vec<Activation>,
    /// 어떤 플래그에도 매칭되지 않은 토큰(원래 순서 유지)
    pub leftover_args: Vec<String>,
}

impl ParseResult {
    pub fn has_help(&self) -> bool {
        self.active_flags.iter().any(Activation::is_help)
    }

    pub fn active_names(&self) -> Vec<&str> {
        self.active_flags.iter().map(Activation::long_name).collect()
    }

    fn activate(&mut self, activation: Activation) {
        self.active_flags
            .retain(|existing| existing.long_name() != activation.long_name());
        self.active_flags.push(activation);
    }
}

/// 플래그 목록을 기준으로 토큰을 해석한다.
/// `strip_command_token`이면 첫 토큰(명령 이름)은 건너뛴다.
pub fn parse(
    flags: &[FlagSpec],
    tokens: impl Into<Tokens>,
    strip_command_token: bool,
) -> Result<ParseResult, ConsoleError> {
    let mut tokens = tokens.into().into_vec().into_iter();
    if strip_command_token {
        tokens.next();
    }

    let mut result = ParseResult::default();
    while let Some(token) = tokens.next() {
        let Some(spec) = flags.iter().find(|flag| flag.matches(&token)) else {
            result.leftover_args.push(token);
            continue;
        };

        let kind = spec.input_kind();
        let value = if kind.requires_input() {
            let Some(raw) = tokens.next() else {
                return Err(ConsoleError::MissingFlagInput {
                    flag: spec.long_name().to_string(),
                    expected: kind,
                });
            };
            let Some(value) = kind.coerce(&raw) else {
                return Err(ConsoleError::InvalidFlagInput {
                    token: raw,
                    flag: spec.long_name().to_string(),
                    expected: kind,
                });
            };
            Some(value)
        } else {
            None
        };

        result.activate(Activation {
            flag: spec.clone(),
            value,
        });
    }

    Ok(result)
}
