//! 콘솔 출력 포트 구현 어댑터.

use std::sync::{Arc, Mutex};

use crossterm::terminal;

use crate::application::ports::ConsoleOutput;

const FALLBACK_WIDTH: usize = 80;

/// 표준 출력/표준 에러로 쓰는 출력 어댑터.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleOutput for TerminalOutput {
    fn line(&self, text: &str) {
        println!("{text}");
    }

    fn diagnostic(&self, text: &str) {
        eprintln!("{text}");
    }

    fn width(&self) -> usize {
        // TTY가 아니면 크기를 알 수 없으므로 기본 폭을 쓴다.
        terminal::size()
            .map(|(w, _)| usize::from(w))
            .ok()
            .filter(|w| *w > 0)
            .unwrap_or(FALLBACK_WIDTH)
    }
}

#[derive(Debug, Default)]
struct Captured {
    lines: Vec<String>,
    diagnostics: Vec<String>,
}

/// 출력을 메모리에 모으는 어댑터. 복제본끼리 버퍼를 공유한다.
#[derive(Debug, Default, Clone)]
pub struct BufferedOutput {
    inner: Arc<Mutex<Captured>>,
    width: Option<usize>,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(width: usize) -> Self {
        Self {
            inner: Arc::default(),
            width: Some(width),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|c| c.lines.clone())
            .unwrap_or_default()
    }

    pub fn diagnostics(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|c| c.diagnostics.clone())
            .unwrap_or_default()
    }

    /// 일반 출력 전체를 한 문자열로 합친다.
    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}

impl ConsoleOutput for BufferedOutput {
    fn line(&self, text: &str) {
        if let Ok(mut c) = self.inner.lock() {
            c.lines.push(text.to_string());
        }
    }

    fn diagnostic(&self, text: &str) {
        if let Ok(mut c) = self.inner.lock() {
            c.diagnostics.push(text.to_string());
        }
    }

    fn width(&self) -> usize {
        self.width.unwrap_or(FALLBACK_WIDTH)
    }
}
