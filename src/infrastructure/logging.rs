//! `tracing-subscriber` 기반 로그 채널 설정.
//!
//! 콘솔/파일 레이어에 채널 라우팅 필터를 각각 건다. `RUST_LOG`가 있으면 전역 필터로 함께 적용한다.

use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::{Metadata, debug};
use tracing_subscriber::filter::{EnvFilter, filter_fn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

use crate::application::logging::LogRouting;
use crate::application::ports::LogConfigurator;

/// 전역 tracing 구독자를 설치하는 로깅 협력자.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogConfigurator;

impl TracingLogConfigurator {
    pub fn new() -> Self {
        Self
    }
}

impl LogConfigurator for TracingLogConfigurator {
    fn apply(&self, routing: &LogRouting) -> Result<()> {
        if !needs_subscriber(routing, std::env::var_os("RUST_LOG").as_deref()) {
            return Ok(());
        }

        let console_routing = routing.clone();
        let console_layer = fmt::layer()
            .with_writer(io::stdout)
            .with_target(false)
            .with_filter(filter_fn(move |meta: &Metadata<'_>| {
                console_routing.console_accepts(meta.level())
            }));

        let file_layer = if routing.writes_file() {
            let file = open_log_file(&routing.file)?;
            let file_routing = routing.clone();
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(filter_fn(move |meta: &Metadata<'_>| {
                        file_routing.file_accepts(meta.level())
                    })),
            )
        } else {
            None
        };

        let installed = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().ok())
            .with(console_layer)
            .with(file_layer)
            .try_init();

        if let Err(err) = installed {
            // 라이브러리 사용자가 이미 구독자를 설치한 경우 그대로 둔다.
            debug!(error = %err, "tracing subscriber already installed; keeping it");
        }
        Ok(())
    }
}

/// 모든 채널이 꺼져 있고 `RUST_LOG`도 없으면 전역 구독자를 설치하지 않는다.
fn needs_subscriber(routing: &LogRouting, rust_log: Option<&OsStr>) -> bool {
    !routing.is_silent() || rust_log.is_some()
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
