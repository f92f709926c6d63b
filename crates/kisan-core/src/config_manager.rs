//! 설정 파일 관리.
//!
//! `config.json` 하나에 전체 설정을 담는다. 파일이 없으면 기본값으로 만들고,
//! 파일에 없는 필드는 serde 기본값으로 채워진다.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use directories::ProjectDirs;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::CoreError;

const CONFIG_FILE_NAME: &str = "config.json";

/// 설정 관리자
///
/// 복제해도 같은 설정을 공유한다. 저장은 검증을 통과한 설정만.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    current: Arc<RwLock<AppConfig>>,
    path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 설정 디렉토리의 `config.json` 사용
    pub fn new() -> Result<Self, CoreError> {
        Self::with_path(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// 지정 경로 사용 (없으면 기본 설정으로 생성)
    pub fn with_path(path: PathBuf) -> Result<Self, CoreError> {
        ensure_parent_dir(&path)?;

        let config = if path.is_file() {
            read_config(&path)?
        } else {
            let defaults = AppConfig::default_config();
            write_config(&path, &defaults)?;
            info!(path = %path.display(), "기본 설정 파일 생성");
            defaults
        };

        Ok(Self {
            current: Arc::new(RwLock::new(config)),
            path,
        })
    }

    /// 현재 설정 복제본
    pub fn get(&self) -> AppConfig {
        self.read().clone()
    }

    /// 검증 → 파일 저장 → 메모리 반영
    pub fn update(&self, config: AppConfig) -> Result<(), CoreError> {
        config.validate()?;
        write_config(&self.path, &config)?;
        *self.write() = config;
        debug!(path = %self.path.display(), "설정 저장");
        Ok(())
    }

    /// 현재 설정을 고쳐서 저장. 실패하면 메모리 설정은 그대로.
    pub fn update_with<F>(&self, edit: F) -> Result<AppConfig, CoreError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut next = self.get();
        edit(&mut next);
        self.update(next.clone())?;
        Ok(next)
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// 파일 내용으로 다시 로드
    pub fn reload(&self) -> Result<(), CoreError> {
        let config = read_config(&self.path)?;
        *self.write() = config;
        info!(path = %self.path.display(), "설정 다시 로드");
        Ok(())
    }

    /// 플랫폼 설정 디렉토리
    ///
    /// Linux `~/.config/kisan-assist`, macOS `~/Library/Application Support/com.kisan.assist`,
    /// Windows `%APPDATA%\kisan\assist\config`.
    pub fn config_dir() -> Result<PathBuf, CoreError> {
        ProjectDirs::from("com", "kisan", "assist")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| CoreError::Config("홈 디렉토리를 찾을 수 없습니다".to_string()))
    }

    fn read(&self) -> RwLockReadGuard<'_, AppConfig> {
        self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AppConfig> {
        self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), CoreError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(parent).map_err(|e| {
        CoreError::Config(format!("설정 디렉토리 생성 실패 ({}): {e}", parent.display()))
    })?;
    info!(dir = %parent.display(), "설정 디렉토리 생성");
    Ok(())
}

fn read_config(path: &Path) -> Result<AppConfig, CoreError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| CoreError::Config(format!("설정 파일 읽기 실패 ({}): {e}", path.display())))?;
    let config: AppConfig = serde_json::from_str(&raw)
        .map_err(|e| CoreError::Config(format!("설정 파일 파싱 실패 ({}): {e}", path.display())))?;
    config.validate()?;
    debug!(path = %path.display(), "설정 파일 로드");
    Ok(config)
}

fn write_config(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
        .map_err(|e| CoreError::Config(format!("설정 파일 저장 실패 ({}): {e}", path.display())))
}
