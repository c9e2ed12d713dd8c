//! 설정 파일 탐색/병합 로더.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::config::ConsoleSettings;

pub(crate) const CONFIG_FILE: &str = "console.json";

#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: ConsoleSettings,
    pub searched_paths: Vec<PathBuf>,
    pub loaded_paths: Vec<PathBuf>,
}

/// 앱 이름 기준 우선순위 경로를 순회해 설정을 병합한다.
pub(crate) fn load_merged_settings(app_name: &str) -> Result<LoadedSettings> {
    load_from_paths(config_paths(app_name))
}

/// 주어진 경로를 낮은 우선순위부터 병합한다. 없는 파일은 건너뛴다.
pub(crate) fn load_from_paths(paths: Vec<PathBuf>) -> Result<LoadedSettings> {
    let mut merged = ConsoleSettings::default();
    let mut loaded_paths = Vec::new();

    for path in &paths {
        if !path.exists() {
            continue;
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let parsed: ConsoleSettings = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))?;
        merged.merge_from(parsed);
        loaded_paths.push(path.to_path_buf());
    }

    debug!(loaded = ?loaded_paths, "console settings loaded");
    Ok(LoadedSettings {
        settings: merged,
        searched_paths: paths,
        loaded_paths,
    })
}

/// 시스템 + 사용자 + 프로젝트 + 명시 경로 순으로 병합 경로를 구성한다.
pub fn config_paths(app_name: &str) -> Vec<PathBuf> {
    // 낮은 우선순위 -> 높은 우선순위 순서로 병합됨.
    let mut paths = vec![Path::new("/etc").join(app_name).join(CONFIG_FILE)];

    if let Some(base) = dirs::config_dir() {
        paths.push(base.join(app_name).join(CONFIG_FILE));
    }

    paths.push(PathBuf::from(format!(".{app_name}")).join(CONFIG_FILE));

    if let Ok(path) = env::var(config_env_var(app_name)) {
        paths.push(PathBuf::from(path));
    }

    dedup_paths(paths)
}

/// 명시 설정 경로 환경변수 이름. `my-app` -> `MY_APP_CONSOLE_CONFIG`
pub fn config_env_var(app_name: &str) -> String {
    let stem: String = app_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}_CONSOLE_CONFIG")
}

fn dedup_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for p in paths {
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}
