//! 콘솔 설정(JSON) 로딩/병합 모듈.
//! 여러 경로의 설정을 우선순위대로 병합한다.

mod loader;

use anyhow::Result;

use crate::application::config::ConsoleSettings;

pub use loader::{LoadedSettings, config_env_var, config_paths};

impl ConsoleSettings {
    /// 병합된 최종 설정을 로딩한다.
    pub fn load(app_name: &str) -> Result<Self> {
        Ok(loader::load_merged_settings(app_name)?.settings)
    }

    /// 탐색/로딩된 경로를 포함해 로딩한다.
    pub fn load_with_sources(app_name: &str) -> Result<LoadedSettings> {
        loader::load_merged_settings(app_name)
    }

    /// 지정한 경로만으로 병합한다.
    pub fn load_from(paths: Vec<std::path::PathBuf>) -> Result<Self> {
        Ok(loader::load_from_paths(paths)?.settings)
    }
}
