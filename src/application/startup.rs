//! 시작 플래그(프로세스 인자) 1회 처리 단계.

use tracing::debug;

use crate::application::console::{Console, StartupPhase};
use crate::application::logging::LogRouting;
use crate::domain::context::DispatchContext;
use crate::domain::error::ConsoleError;
use crate::domain::flag::LogFlag;
use crate::domain::parse::{Activation, parse};
use crate::infrastructure::render;

/// 시작 단계 처리 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupOutcome {
    Completed,
    /// `--help`가 있어 사용법만 출력하고 다른 핸들러는 실행하지 않음
    HelpShown,
}

impl Console {
    /// 시작 인자를 터미널 플래그 기준으로 해석하고 핸들러를 실행한다.
    /// 0번 토큰은 프로그램 이름으로 보고 파싱에서 제외한다.
    ///
    /// 한 번만 호출할 수 있다. 실패해도 단계는 `StartupDone`으로 넘어간다.
    pub fn process_startup<I, S>(&mut self, args: I) -> Result<StartupOutcome, ConsoleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.phase != StartupPhase::Uninitialized {
            return Err(ConsoleError::AlreadyProcessed {
                operation: "process_startup",
            });
        }

        self.phase = StartupPhase::StartupProcessing;
        let result = self.run_startup(args.into_iter().map(Into::into).collect());
        self.phase = StartupPhase::StartupDone;
        result
    }

    /// 프로세스 인자로 시작 단계를 처리한다. `--help`면 사용법 출력 후 종료 코드 0으로 끝낸다.
    pub fn startup_from_env(&mut self) -> Result<(), ConsoleError> {
        if self.process_startup(std::env::args())? == StartupOutcome::HelpShown {
            std::process::exit(0);
        }
        Ok(())
    }

    fn run_startup(&mut self, mut tokens: Vec<String>) -> Result<StartupOutcome, ConsoleError> {
        if !tokens.is_empty() {
            self.program = tokens.remove(0);
        }

        let parsed = parse(self.terminal.flags(), tokens, false)?;
        debug!(
            program = %self.program,
            flags = ?parsed.active_names(),
            "processing startup flags"
        );

        if parsed.has_help() {
            self.output.line(&render::startup_help(
                &self.program,
                &self.terminal,
                self.output.width(),
            ));
            return Ok(StartupOutcome::HelpShown);
        }

        // 로깅 플래그는 사용자 핸들러보다 먼저 적용한다.
        let log_flags: Vec<LogFlag> = parsed
            .active_flags
            .iter()
            .filter_map(Activation::log_flag)
            .collect();
        let routing = LogRouting::resolve(&self.settings.logging, &self.app_name, &log_flags);
        self.logging.apply(&routing).map_err(ConsoleError::Logging)?;

        let mut ctx = DispatchContext::new(
            self.terminal.name(),
            parsed.leftover_args.clone(),
            parsed.active_flags.clone(),
        );
        for activation in parsed
            .active_flags
            .iter()
            .filter(|a| a.log_flag().is_none())
        {
            self.invoke_flag(activation, &mut ctx)?;
        }

        self.startup_args = parsed.leftover_args;
        Ok(StartupOutcome::Completed)
    }
}
