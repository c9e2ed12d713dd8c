//! `cmdconsole` 데모 바이너리 진입점.

use cmdconsole::interface::demo;
use cmdconsole::{ConsoleError, ConsoleHandle, StartMode};

#[tokio::main]
async fn main() {
    let mut console = match cmdconsole::console("cmdconsole") {
        Ok(console) => console,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    };

    if let Err(err) = demo::register(&mut console) {
        eprintln!("error: {err}");
        std::process::exit(2);
    }

    // 시작 플래그 핸들러는 콘솔 루프보다 먼저 실행된다.
    if let Err(err) = console.startup_from_env() {
        eprintln!("error: {err}");
        std::process::exit(2);
    }

    let handle = match console.start(StartMode::Background { daemon: false }) {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    match wait_for_shutdown(handle).await {
        Ok(()) => {}
        // 편집기 Ctrl-C 또는 SIGINT: 정리 훅은 이미 실행됨
        Err(ConsoleError::Interrupted) => std::process::exit(130),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

/// 콘솔이 스스로 끝나거나 Ctrl-C가 들어올 때까지 기다린다.
async fn wait_for_shutdown(handle: ConsoleHandle) -> Result<(), ConsoleError> {
    let cancel = handle.cancel_signal();
    let finished = handle.wait();
    tokio::pin!(finished);

    tokio::select! {
        result = &mut finished => result,
        _ = tokio::signal::ctrl_c() => {
            // 입력 대기 중이면 다음 줄을 받은 뒤에 루프가 끝난다.
            cancel.interrupt();
            eprintln!("shutting down; press Enter to leave the console");
            finished.await
        }
    }
}
