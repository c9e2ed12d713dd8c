//! 콘솔 프레임워크 전역 오류 타입.

use thiserror::Error;

use crate::domain::flag::InputKind;

/// 등록/파싱/디스패치 단계에서 발생하는 오류.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// 플래그 정의가 잘못됨(빈 이름, 잘못된 short 형식 등).
    #[error("invalid flag definition `{flag}`: {reason}")]
    InvalidFlagDefinition { flag: String, reason: String },

    /// 명령 정의가 잘못됨(빈 이름, 중복 이름 등).
    #[error("invalid command definition `{name}`: {reason}")]
    InvalidCommandDefinition { name: String, reason: String },

    /// 입력이 필요한 플래그가 줄의 마지막 토큰이었음.
    #[error("flag {flag} expects {expected} input but none was given")]
    MissingFlagInput { flag: String, expected: InputKind },

    /// 플래그 입력값 변환 실패.
    #[error("invalid input `{token}` for flag {flag}: expected {expected}")]
    InvalidFlagInput {
        token: String,
        flag: String,
        expected: InputKind,
    },

    /// 시작 플래그를 두 번 처리했거나, 처리 이후 터미널 플래그를 추가하려 함.
    #[error("{operation}: startup flags were already processed")]
    AlreadyProcessed { operation: &'static str },

    #[error("handler for `{name}` failed: {source:#}")]
    Handler {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// 콘솔 루프가 사용자 인터럽트로 종료됨.
    #[error("console interrupted")]
    Interrupted,

    #[error("failed to read console input: {0:#}")]
    Input(#[source] anyhow::Error),

    #[error("failed to configure logging: {0:#}")]
    Logging(#[source] anyhow::Error),

    #[error("failed to spawn console worker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("console worker panicked")]
    WorkerPanicked,
}

impl ConsoleError {
    /// 콘솔 루프가 진단만 출력하고 계속 진행할 수 있는 오류인지 여부.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ConsoleError::MissingFlagInput { .. }
                | ConsoleError::InvalidFlagInput { .. }
                | ConsoleError::Handler { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_are_recoverable() {
        let err = ConsoleError::MissingFlagInput {
            flag: "--jobs".to_string(),
            expected: InputKind::Int,
        };
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "flag --jobs expects integer input but none was given"
        );
    }

    #[test]
    fn lifecycle_errors_are_fatal() {
        assert!(!ConsoleError::Interrupted.is_recoverable());
        assert!(
            !ConsoleError::AlreadyProcessed {
                operation: "process_startup"
            }
            .is_recoverable()
        );
    }

    #[test]
    fn handler_error_keeps_context_chain() {
        let source = anyhow::anyhow!("disk full").context("writing report");
        let err = ConsoleError::Handler {
            name: "--out".to_string(),
            source,
        };
        assert_eq!(
            err.to_string(),
            "handler for `--out` failed: writing report: disk full"
        );
    }
}
