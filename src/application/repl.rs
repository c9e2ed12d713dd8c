//! 대화형 콘솔 루프와 백그라운드 실행 핸들.
//!
//! 취소 신호는 읽기 사이에서만 확인한다. 블로킹 읽기 중에 취소되면
//! 읽기가 끝난 뒤(보통 사용자가 Enter를 누른 뒤) 그 줄은 실행하지 않고 종료한다.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use tracing::{debug, trace, warn};

use crate::application::console::{Console, LineOutcome, StartupPhase};
use crate::application::ports::ReadOutcome;
use crate::domain::error::ConsoleError;

/// 어느 스레드에서든 설정할 수 있는 협조적 취소 신호.
/// `interrupt`는 취소와 함께 루프가 정리 훅을 실행하고 `Interrupted`로 끝나게 한다.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Arc<CancelState>);

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    interrupted: AtomicBool,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.cancelled.store(true, Ordering::SeqCst);
    }

    /// 외부 인터럽트(예: SIGINT)를 전달한다.
    pub fn interrupt(&self) {
        self.0.interrupted.store(true, Ordering::SeqCst);
        self.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.cancelled.load(Ordering::SeqCst)
    }

    pub fn is_interrupted(&self) -> bool {
        self.0.interrupted.load(Ordering::SeqCst)
    }
}

/// 콘솔 루프 실행 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// 호출 스레드에서 루프가 끝날 때까지 블로킹
    Inline,
    /// 워커 스레드에서 실행. daemon이면 join 없이 버려도 된다.
    Background { daemon: bool },
}

/// 실행 중(또는 끝난) 콘솔 루프 핸들.
pub struct ConsoleHandle {
    cancel: CancelSignal,
    worker: Option<JoinHandle<Result<(), ConsoleError>>>,
    daemon: bool,
}

impl ConsoleHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// 취소와 같지만 루프가 정리 훅을 실행하고 `Interrupted`를 돌려준다.
    pub fn interrupt(&self) {
        self.cancel.interrupt();
    }

    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    pub fn is_daemon(&self) -> bool {
        self.daemon
    }

    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// 루프가 끝날 때까지 기다리고 결과를 돌려준다.
    pub fn join(mut self) -> Result<(), ConsoleError> {
        match self.worker.take() {
            Some(worker) => worker.join().map_err(|_| ConsoleError::WorkerPanicked)?,
            None => Ok(()),
        }
    }

    /// 취소 후 종료를 기다린다. 입력 대기 중이면 읽기가 끝난 뒤에 반환된다.
    pub fn shutdown(self) -> Result<(), ConsoleError> {
        self.cancel();
        self.join()
    }

    /// 비동기 런타임에서 루프 종료를 기다린다.
    pub async fn wait(self) -> Result<(), ConsoleError> {
        tokio::task::spawn_blocking(move || self.join())
            .await
            .map_err(|_| ConsoleError::WorkerPanicked)?
    }
}

impl Drop for ConsoleHandle {
    fn drop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        if self.daemon || worker.is_finished() {
            return;
        }

        self.cancel.cancel();
        warn!("non-daemon console worker dropped without shutdown; cancellation requested");
    }
}

impl Console {
    /// 콘솔 루프를 시작한다. 시작 플래그가 아직 처리되지 않았다면 프로세스 인자로 먼저 처리한다.
    pub fn start(mut self, mode: StartMode) -> Result<ConsoleHandle, ConsoleError> {
        if self.phase == StartupPhase::Uninitialized {
            self.startup_from_env()?;
        }

        let cancel = self.cancel.clone();
        match mode {
            StartMode::Inline => {
                self.run()?;
                Ok(ConsoleHandle {
                    cancel,
                    worker: None,
                    daemon: false,
                })
            }
            StartMode::Background { daemon } => {
                let worker = thread::Builder::new()
                    .name(format!("{}-console", self.app_name))
                    .spawn(move || self.run())
                    .map_err(ConsoleError::Spawn)?;
                debug!(daemon, "console worker spawned");
                Ok(ConsoleHandle {
                    cancel,
                    worker: Some(worker),
                    daemon,
                })
            }
        }
    }

    /// 현재 스레드에서 콘솔 루프를 실행한다.
    pub fn run(&mut self) -> Result<(), ConsoleError> {
        let summaries = self.summaries();
        self.input.set_commands(&summaries);
        let prompt = self.settings.prompt().to_string();
        debug!(commands = summaries.len(), "console loop started");

        loop {
            if self.cancel.is_cancelled() {
                debug!("console cancelled; leaving loop");
                return self.finish_cancelled();
            }

            let outcome = self.input.read_line(&prompt).map_err(ConsoleError::Input)?;
            if self.cancel.is_cancelled() {
                debug!("console cancelled while waiting for input; discarding line");
                return self.finish_cancelled();
            }

            match outcome {
                ReadOutcome::Line(line) => match self.dispatch_line(&line) {
                    Ok(LineOutcome::Continue) => {}
                    Ok(LineOutcome::Exit) => {
                        debug!("exit command received");
                        break;
                    }
                    Err(err) if err.is_recoverable() => {
                        self.output.diagnostic(&format!("error: {err}"));
                    }
                    Err(err) => return Err(err),
                },
                ReadOutcome::EndOfInput => {
                    trace!("end of input on console read; continuing");
                }
                ReadOutcome::Closed => {
                    debug!("console input closed; leaving loop");
                    break;
                }
                ReadOutcome::Interrupted => {
                    self.run_cleanup();
                    return Err(ConsoleError::Interrupted);
                }
            }
        }

        Ok(())
    }

    fn finish_cancelled(&mut self) -> Result<(), ConsoleError> {
        if self.cancel.is_interrupted() {
            self.run_cleanup();
            return Err(ConsoleError::Interrupted);
        }
        Ok(())
    }
}
