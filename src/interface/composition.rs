//! 애플리케이션 조립(composition root) 모듈.

use std::sync::Arc;

use anyhow::Result;

use crate::application::config::ConsoleSettings;
use crate::application::console::{Console, ConsoleIo};
use crate::application::ports::LineSource;
use crate::infrastructure::adapters::TerminalOutput;
use crate::infrastructure::input::{EditorLineSource, StdinLineSource};
use crate::infrastructure::logging::TracingLogConfigurator;

/// 실행 시점 의존성(설정/입력/출력/로깅)을 한 곳에서 조립하는 컨테이너.
#[derive(Debug, Clone)]
pub struct ConsoleComposition {
    app_name: String,
}

impl ConsoleComposition {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// 앱 이름 기준 설정 파일을 병합해 로딩한다.
    pub fn settings(&self) -> Result<ConsoleSettings> {
        ConsoleSettings::load(&self.app_name)
    }

    /// 터미널 입출력과 tracing 로깅 어댑터를 만든다.
    pub fn io(&self, settings: &ConsoleSettings) -> ConsoleIo {
        let input: Box<dyn LineSource> = if settings.interactive_input() {
            Box::new(EditorLineSource::new())
        } else {
            Box::new(StdinLineSource::new())
        };

        ConsoleIo {
            input,
            output: Arc::new(TerminalOutput::new()),
            logging: Box::new(TracingLogConfigurator::new()),
        }
    }

    /// 설정 로딩부터 콘솔 생성까지 한 번에 수행한다.
    pub fn console(&self) -> Result<Console> {
        let settings = self.settings()?;
        let io = self.io(&settings);
        Ok(Console::new(&self.app_name, settings, io)?)
    }
}
