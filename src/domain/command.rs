//! 콘솔 명령과 명령별 플래그 레지스트리.

use std::fmt;
use std::sync::Arc;

use crate::domain::context::{DispatchContext, HandlerFn};
use crate::domain::error::ConsoleError;
use crate::domain::flag::{FlagDef, FlagHandler, FlagSpec, HELP_FLAG, HELP_SHORT};

/// 시작 플래그를 담는 터미널 의사 명령 이름.
pub const TERMINAL_COMMAND: &str = "terminal";

/// 명령의 주 핸들러.
#[derive(Clone)]
pub enum CommandHandler {
    Call(HandlerFn),
    /// 등록된 명령 목록 출력(내장 `help`)
    ListCommands,
    /// 콘솔 루프 종료(내장 `exit`)
    Exit,
}

impl CommandHandler {
    pub fn call<F>(handler: F) -> Self
    where
        F: Fn(&mut DispatchContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        CommandHandler::Call(Arc::new(handler))
    }
}

impl fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandHandler::Call(_) => f.write_str("Call(..)"),
            CommandHandler::ListCommands => f.write_str("ListCommands"),
            CommandHandler::Exit => f.write_str("Exit"),
        }
    }
}

/// 이름/설명/사용법과 자체 플래그 목록을 가진 명령.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    handler: CommandHandler,
    description: String,
    usage: String,
    flags: Vec<FlagSpec>,
}

impl Command {
    /// 명령을 만들고 내장 `--help` 플래그를 자동 등록한다.
    pub fn new(
        name: &str,
        handler: CommandHandler,
        description: &str,
        usage: &str,
    ) -> Result<Self, ConsoleError> {
        if name.is_empty() {
            return Err(invalid(name, "command name is empty"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(invalid(name, "command name must not contain whitespace"));
        }

        let mut command = Self::bare(name, handler, description, usage);
        command.add_flag(help_flag())?;
        Ok(command)
    }

    /// 검증과 `--help` 자동 등록 없이 만든다(터미널 의사 명령용).
    pub(crate) fn bare(
        name: &str,
        handler: CommandHandler,
        description: &str,
        usage: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            handler,
            description: description.to_string(),
            usage: usage.to_string(),
            flags: Vec::new(),
        }
    }

    /// 플래그를 정규화/검증해 등록 순서 끝에 추가한다.
    /// 같은 long 이름이 이미 있어도 거부하지 않는다(파싱은 먼저 등록된 쪽이 이긴다).
    pub fn add_flag(&mut self, def: FlagDef) -> Result<&mut Self, ConsoleError> {
        let spec = def.build()?;
        self.flags.push(spec);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler(&self) -> &CommandHandler {
        &self.handler
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn flags(&self) -> &[FlagSpec] {
        &self.flags
    }

    pub fn flag(&self, long_name: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.long_name() == long_name)
    }
}

pub(crate) fn help_flag() -> FlagDef {
    FlagDef::new(HELP_FLAG)
        .short(HELP_SHORT)
        .description("show this help")
        .builtin(FlagHandler::Help)
}

fn invalid(name: &str, reason: &str) -> ConsoleError {
    ConsoleError::InvalidCommandDefinition {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
