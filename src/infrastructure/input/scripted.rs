//! 프로그램에서 입력을 공급하는 라인 소스.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::Result;

use crate::application::ports::{LineSource, ReadOutcome};

/// 미리 정한 입력 결과를 순서대로 돌려준다. 다 쓰면 `Closed`.
#[derive(Debug, Default, Clone)]
pub struct ScriptedLineSource {
    queue: VecDeque<ReadOutcome>,
}

impl ScriptedLineSource {
    pub fn new(outcomes: impl IntoIterator<Item = ReadOutcome>) -> Self {
        Self {
            queue: outcomes.into_iter().collect(),
        }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(lines.into_iter().map(|l| ReadOutcome::Line(l.into())))
    }

    pub fn push(&mut self, outcome: ReadOutcome) {
        self.queue.push_back(outcome);
    }
}

impl LineSource for ScriptedLineSource {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome> {
        Ok(self.queue.pop_front().unwrap_or(ReadOutcome::Closed))
    }
}

/// 다른 스레드가 채널로 줄을 보내는 라인 소스. 송신측이 모두 닫히면 `Closed`.
#[derive(Debug)]
pub struct ChannelLineSource {
    rx: Receiver<String>,
}

impl ChannelLineSource {
    pub fn new() -> (Sender<String>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }
}

impl LineSource for ChannelLineSource {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome> {
        Ok(match self.rx.recv() {
            Ok(line) => ReadOutcome::Line(line),
            Err(_) => ReadOutcome::Closed,
        })
    }
}
