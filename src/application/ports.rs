//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use anyhow::Result;

use crate::application::logging::LogRouting;

/// 콘솔 입력 한 번의 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// 편집기 EOT(Ctrl-D). 무시하고 루프를 계속한다.
    EndOfInput,
    /// 입력 스트림이 닫힘. 더 읽을 수 없으므로 루프를 정상 종료한다.
    Closed,
    /// 사용자 인터럽트(Ctrl-C). 정리 훅 실행 후 루프를 중단한다.
    Interrupted,
}

/// 입력 편집기 추천 목록용 명령 요약.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSummary {
    pub name: String,
    pub description: String,
    pub usage: String,
}

/// 한 줄 단위 입력 포트. 유일한 블로킹 지점이다.
pub trait LineSource: Send {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;

    /// 루프 시작 전에 등록된 명령 목록을 전달받는다.
    fn set_commands(&mut self, _commands: &[CommandSummary]) {}
}

/// 콘솔 출력 포트.
pub trait ConsoleOutput: Send + Sync {
    fn line(&self, text: &str);
    /// 사용자에게 보이는 진단 메시지(알 수 없는 명령, 파싱 오류 등)
    fn diagnostic(&self, text: &str);

    /// 도움말 줄바꿈에 사용할 출력 폭.
    fn width(&self) -> usize {
        80
    }
}

/// 로깅 협력자 설정 포트.
pub trait LogConfigurator: Send {
    fn apply(&self, routing: &LogRouting) -> Result<()>;
}
