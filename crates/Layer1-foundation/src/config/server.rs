//! Server Settings - 서버 실행 모드 결정
//!
//! 실행 플래그(core/dev/watch)와 앱 디렉토리 위치로부터 실제 모드와
//! 페이지 설정의 빌드 플래그를 계산한다.

use super::page::PageConfig;
use crate::url_ext::{url_escape, url_join};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 실행 옵션 (CLI/호스트가 채움)
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// core 모드 요청
    pub core_mode: bool,

    /// dev 모드 요청
    pub dev_mode: bool,

    /// watch 모드 요청
    pub watch: bool,

    /// 애플리케이션 디렉토리
    pub app_dir: PathBuf,

    /// 패키지 설치 디렉토리 (이 아래의 app_dir는 core 모드로 간주)
    pub install_dir: Option<PathBuf>,

    /// 소스 dev 디렉토리 (이 아래의 app_dir는 dev 모드로 간주)
    pub dev_dir: Option<PathBuf>,

    /// 서버 인증 토큰
    pub token: Option<String>,

    /// 시작 시 열 파일
    pub file_to_run: Option<PathBuf>,

    /// 노트북 루트 디렉토리
    pub notebook_dir: PathBuf,
}

/// 결정된 서버 설정
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub core_mode: bool,
    pub dev_mode: bool,
    pub watch: bool,

    /// 모드에 따라 보정된 앱 디렉토리
    pub app_dir: PathBuf,

    /// 정적 파일 캐시 여부 (watch 모드에서는 끔)
    pub cache_files: bool,

    /// 빌드 플래그가 반영된 페이지 설정
    pub page_config: PageConfig,

    /// `file_to_run`이 있으면 시작 URL
    pub default_url: Option<String>,

    /// 모드 충돌 경고
    pub warnings: Vec<String>,
}

fn is_under(path: &Path, root: Option<&PathBuf>) -> bool {
    root.is_some_and(|root| path.starts_with(root))
}

impl ServerSettings {
    /// 실행 옵션으로부터 설정 결정
    pub fn resolve(options: &LaunchOptions, base: PageConfig) -> Self {
        let mut warnings = Vec::new();

        let mut core_mode =
            options.core_mode || is_under(&options.app_dir, options.install_dir.as_ref());
        if core_mode {
            info!("Running in core mode");
        }

        let dev_mode = options.dev_mode || is_under(&options.app_dir, options.dev_dir.as_ref());
        if dev_mode {
            info!("Running in dev mode");
        }

        let mut watch = options.watch;
        if watch && core_mode {
            let msg = "Cannot watch in core mode, did you mean --dev-mode?";
            warn!("{}", msg);
            warnings.push(msg.to_string());
            watch = false;
        }

        if core_mode && dev_mode {
            let msg = "Conflicting modes, choosing dev_mode over core_mode";
            warn!("{}", msg);
            warnings.push(msg.to_string());
            core_mode = false;
        }

        let mut page_config = base;
        page_config.build_available = !core_mode && !dev_mode;
        page_config.build_check = !core_mode && !dev_mode;
        page_config.dev_mode = dev_mode;
        if options.token.is_some() {
            page_config.token = options.token.clone();
        }
        if watch && !dev_mode {
            page_config.build_available = false;
        }

        let app_dir = match (core_mode, dev_mode) {
            (true, _) => options
                .install_dir
                .clone()
                .unwrap_or_else(|| options.app_dir.clone()),
            (_, true) => options
                .dev_dir
                .clone()
                .unwrap_or_else(|| options.app_dir.clone()),
            _ => options.app_dir.clone(),
        };

        let default_url = options
            .file_to_run
            .as_deref()
            .map(|file| Self::file_url(&page_config, file, &options.notebook_dir));

        Self {
            core_mode,
            dev_mode,
            watch,
            app_dir,
            cache_files: !watch,
            page_config,
            default_url,
            warnings,
        }
    }

    /// 파일 경로를 `<page>/tree/<relpath>` URL로 변환
    fn file_url(page_config: &PageConfig, file: &Path, notebook_dir: &Path) -> String {
        let relpath = file.strip_prefix(notebook_dir).unwrap_or(file);
        let segments: Vec<String> = relpath
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        let mut parts: Vec<&str> = vec![&page_config.page_url, "tree"];
        parts.extend(segments.iter().map(String::as_str));
        url_escape(&url_join(&parts))
    }
}
