//! 명령 레지스트리와 디스패치 엔진.
//!
//! 시작 단계는 `startup`, 대화형 루프와 백그라운드 실행은 `repl` 모듈에 있다.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::application::config::ConsoleSettings;
use crate::application::ports::{CommandSummary, ConsoleOutput, LineSource, LogConfigurator};
use crate::application::repl::CancelSignal;
use crate::domain::command::{Command, CommandHandler, TERMINAL_COMMAND, help_flag};
use crate::domain::context::{DispatchContext, HandlerFn};
use crate::domain::error::ConsoleError;
use crate::domain::flag::{FlagDef, FlagHandler, LogFlag};
use crate::domain::parse::{Activation, parse, tokenize};
use crate::infrastructure::render;

/// 콘솔이 사용하는 입출력/로깅 어댑터 묶음.
pub struct ConsoleIo {
    pub input: Box<dyn LineSource>,
    pub output: Arc<dyn ConsoleOutput>,
    pub logging: Box<dyn LogConfigurator>,
}

/// 시작 플래그 처리 단계. `Uninitialized`에서 `StartupDone`으로 한 번만 진행한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupPhase {
    Uninitialized,
    StartupProcessing,
    StartupDone,
}

/// 콘솔 한 줄 처리 후 루프 진행 여부.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    Exit,
}

pub type CleanupFn = Box<dyn FnMut() + Send>;

pub struct Console {
    pub(crate) app_name: String,
    pub(crate) settings: ConsoleSettings,
    pub(crate) terminal: Command,
    commands: Vec<Command>,
    pub(crate) phase: StartupPhase,
    pub(crate) program: String,
    pub(crate) startup_args: Vec<String>,
    default_flag_handler: HandlerFn,
    cleanup: Option<CleanupFn>,
    pub(crate) cancel: CancelSignal,
    pub(crate) input: Box<dyn LineSource>,
    pub(crate) output: Arc<dyn ConsoleOutput>,
    pub(crate) logging: Box<dyn LogConfigurator>,
}

impl Console {
    /// 설정에 따라 내장 시작 플래그와 내장 명령(`help`, `exit`)을 등록한다.
    pub fn new(
        app_name: &str,
        settings: ConsoleSettings,
        io: ConsoleIo,
    ) -> Result<Self, ConsoleError> {
        let mut terminal = Command::bare(
            TERMINAL_COMMAND,
            CommandHandler::call(|_| Ok(())),
            "startup flags",
            "",
        );
        if settings.builtin_flags() {
            terminal.add_flag(help_flag())?;
            for flag in LogFlag::ALL {
                terminal.add_flag(
                    FlagDef::new(flag.long_name())
                        .short(flag.short_name())
                        .description(flag.description())
                        .builtin(FlagHandler::Logging(flag)),
                )?;
            }
        }

        let mut console = Self {
            app_name: app_name.to_string(),
            program: app_name.to_string(),
            settings,
            terminal,
            commands: Vec::new(),
            phase: StartupPhase::Uninitialized,
            startup_args: Vec::new(),
            default_flag_handler: Arc::new(|ctx: &mut DispatchContext| -> anyhow::Result<()> {
                debug!(
                    flag = ?ctx.flag_name,
                    input = ?ctx.flag_input,
                    "flag has no handler bound"
                );
                Ok(())
            }),
            cleanup: None,
            cancel: CancelSignal::new(),
            input: io.input,
            output: io.output,
            logging: io.logging,
        };

        if console.settings.builtin_commands() {
            console.add_command(
                "help",
                CommandHandler::ListCommands,
                "list available commands",
                "",
            )?;
            console.add_command("exit", CommandHandler::Exit, "leave the console", "")?;
        }

        Ok(console)
    }

    /// 터미널(시작) 플래그를 추가한다. 시작 플래그 처리 이후에는 실패한다.
    pub fn terminal_add_flag(&mut self, def: FlagDef) -> Result<(), ConsoleError> {
        if self.phase != StartupPhase::Uninitialized {
            return Err(ConsoleError::AlreadyProcessed {
                operation: "terminal_add_flag",
            });
        }
        self.terminal.add_flag(def)?;
        Ok(())
    }

    /// 입력 없는 기본 핸들러 플래그 여러 개를 한 번에 추가한다.
    /// `shorts`의 i번째 문자가 i번째 플래그의 short 이름이며 `?`나 빈 자리는 short 없음.
    pub fn terminal_quickadd_flags(
        &mut self,
        names: &[&str],
        shorts: &str,
    ) -> Result<(), ConsoleError> {
        let mut shorts = shorts.chars();
        for name in names {
            let mut def = FlagDef::new(*name);
            if let Some(ch) = shorts.next()
                && ch != '?'
            {
                def = def.short(ch.to_string());
            }
            self.terminal_add_flag(def)?;
        }
        Ok(())
    }

    /// 명령을 등록하고, 추가 플래그를 붙일 수 있도록 돌려준다.
    pub fn add_command(
        &mut self,
        name: &str,
        handler: CommandHandler,
        description: &str,
        usage: &str,
    ) -> Result<&mut Command, ConsoleError> {
        if self.command(name).is_some() {
            return Err(ConsoleError::InvalidCommandDefinition {
                name: name.to_string(),
                reason: "command is already registered".to_string(),
            });
        }

        let command = Command::new(name, handler, description, usage)?;
        let idx = self.commands.len();
        self.commands.push(command);
        Ok(&mut self.commands[idx])
    }

    /// 핸들러 없이 등록된 플래그를 처리할 기본 핸들러를 지정한다.
    pub fn set_default_flag_handler<F>(&mut self, handler: F)
    where
        F: Fn(&mut DispatchContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.default_flag_handler = Arc::new(handler);
    }

    /// 인터럽트로 루프가 끝날 때 실행할 정리 훅.
    /// 편집기의 Ctrl-C나 `ConsoleHandle::interrupt`로 전달된 인터럽트에서 실행된다.
    /// 콘솔은 시그널 핸들러를 설치하지 않으므로, 호스트가 SIGINT를 받아 `interrupt`로 넘겨야 한다.
    pub fn on_cleanup<F>(&mut self, cleanup: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.cleanup = Some(Box::new(cleanup));
    }

    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name() == name)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn terminal(&self) -> &Command {
        &self.terminal
    }

    pub fn phase(&self) -> StartupPhase {
        self.phase
    }

    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    /// 시작 인자의 0번 토큰(프로그램 이름). 처리 전에는 앱 이름.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// 시작 플래그에 매칭되지 않은 인자.
    pub fn startup_args(&self) -> &[String] {
        &self.startup_args
    }

    /// 핸들러가 콘솔과 같은 출력으로 쓰고 싶을 때 사용한다.
    pub fn output(&self) -> Arc<dyn ConsoleOutput> {
        Arc::clone(&self.output)
    }

    /// 다른 스레드에서 루프를 멈출 때 쓰는 취소 신호.
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    pub fn summaries(&self) -> Vec<CommandSummary> {
        self.commands
            .iter()
            .map(|c| CommandSummary {
                name: c.name().to_string(),
                description: c.description().to_string(),
                usage: c.usage().to_string(),
            })
            .collect()
    }

    /// 콘솔 입력 한 줄을 해석해 명령을 실행한다.
    /// 알 수 없는 명령은 진단만 출력하고 `Continue`를 돌려준다.
    pub fn dispatch_line(&self, line: &str) -> Result<LineOutcome, ConsoleError> {
        let tokens = tokenize(line);
        let Some(name) = tokens.first() else {
            return Ok(LineOutcome::Continue);
        };

        let Some(command) = self.command(name) else {
            self.output.diagnostic(&format!("unknown command: {name}"));
            if self.command("help").is_some() {
                self.output.diagnostic("hint: type `help` to list available commands");
            }
            return Ok(LineOutcome::Continue);
        };

        let parsed = parse(command.flags(), tokens, true)?;
        debug!(
            command = command.name(),
            flags = ?parsed.active_names(),
            args = ?parsed.leftover_args,
            "dispatching console command"
        );

        if parsed.has_help() {
            self.output
                .line(&render::command_help(command, self.output.width()));
            return Ok(LineOutcome::Continue);
        }

        let mut ctx = DispatchContext::new(
            command.name(),
            parsed.leftover_args,
            parsed.active_flags.clone(),
        );
        for activation in &parsed.active_flags {
            self.invoke_flag(activation, &mut ctx)?;
        }
        ctx.leave_flag();

        match command.handler() {
            CommandHandler::Call(handler) => {
                handler(&mut ctx).map_err(|source| ConsoleError::Handler {
                    name: command.name().to_string(),
                    source,
                })?;
            }
            CommandHandler::ListCommands => {
                self.output
                    .line(&render::command_list(&self.commands, self.output.width()));
            }
            CommandHandler::Exit => return Ok(LineOutcome::Exit),
        }

        Ok(LineOutcome::Continue)
    }

    /// 활성화 하나를 실행한다. 핸들러가 없으면 기본 플래그 핸들러를 쓴다.
    pub(crate) fn invoke_flag(
        &self,
        activation: &Activation,
        ctx: &mut DispatchContext,
    ) -> Result<(), ConsoleError> {
        ctx.enter_flag(activation);
        trace!(
            flag = activation.long_name(),
            input = ?activation.value,
            "invoking flag handler"
        );

        let result = match activation.handler() {
            Some(FlagHandler::Call(handler)) => handler(ctx),
            // 도움말/로깅 플래그는 엔진이 별도로 처리한다.
            Some(FlagHandler::Help | FlagHandler::Logging(_)) => Ok(()),
            None => (self.default_flag_handler)(ctx),
        };

        result.map_err(|source| ConsoleError::Handler {
            name: activation.long_name().to_string(),
            source,
        })
    }

    pub(crate) fn run_cleanup(&mut self) {
        if let Some(cleanup) = self.cleanup.as_mut() {
            debug!("running console cleanup hook");
            cleanup();
        }
    }
}
