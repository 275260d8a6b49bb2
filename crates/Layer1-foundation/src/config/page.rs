//! Page Config - 클라이언트 페이지 설정
//!
//! 서버가 페이지에 주입하는 값(`baseUrl`, `pageUrl`, `treeUrl`, `notFoundUrl`,
//! 빌드 플래그 등)을 한 곳에 모은 설정.

use crate::storage::JsonStore;
use crate::url_ext::url_join;
use crate::Result;
use serde::{Deserialize, Serialize};

/// 저장소 키 (`page_config.json`)
pub const PAGE_CONFIG_KEY: &str = "page_config";

fn default_base_url() -> String {
    "/".to_string()
}

fn default_page_url() -> String {
    "/lab".to_string()
}

fn default_app_name() -> String {
    "JupyterLab".to_string()
}

/// 페이지 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    /// 서버 base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 애플리케이션 페이지 경로 (base URL 기준)
    #[serde(default = "default_page_url")]
    pub page_url: String,

    /// 파일 트리 URL (base URL 기준, 없으면 `<page>/tree`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_url: Option<String>,

    /// 서버가 찾지 못한 경로 (리다이렉트된 경우)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_found_url: Option<String>,

    /// 빌드 가능 여부
    #[serde(default)]
    pub build_available: bool,

    /// 시작 시 빌드 필요 여부 확인
    #[serde(default)]
    pub build_check: bool,

    /// 개발 모드
    #[serde(default)]
    pub dev_mode: bool,

    /// 서버 인증 토큰
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// 애플리케이션 이름
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_url: default_page_url(),
            tree_url: None,
            not_found_url: None,
            build_available: false,
            build_check: false,
            dev_mode: false,
            token: None,
            app_name: default_app_name(),
        }
    }
}

impl PageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();
        for store in JsonStore::layered() {
            if let Some(layer) = store.read::<PageConfig>(PAGE_CONFIG_KEY)? {
                config.merge(layer);
            }
        }
        Ok(config)
    }

    /// 지정한 저장소에서만 로드 (파일이 없으면 기본값)
    pub fn load_from(store: &JsonStore) -> Result<Self> {
        Ok(store.read::<PageConfig>(PAGE_CONFIG_KEY)?.unwrap_or_default())
    }

    /// 저장소에 저장
    pub fn save_to(&self, store: &JsonStore) -> Result<()> {
        store.write(PAGE_CONFIG_KEY, self)
    }

    /// 다른 설정 병합 (기본값이 아닌 값만 덮어씀)
    pub fn merge(&mut self, other: PageConfig) {
        if other.base_url != default_base_url() {
            self.base_url = other.base_url;
        }
        if other.page_url != default_page_url() {
            self.page_url = other.page_url;
        }
        if other.app_name != default_app_name() {
            self.app_name = other.app_name;
        }
        if other.tree_url.is_some() {
            self.tree_url = other.tree_url;
        }
        if other.not_found_url.is_some() {
            self.not_found_url = other.not_found_url;
        }
        if other.token.is_some() {
            self.token = other.token;
        }
        self.build_available |= other.build_available;
        self.build_check |= other.build_check;
        self.dev_mode |= other.dev_mode;
    }

    // ========================================================================
    // URL
    // ========================================================================

    /// 애플리케이션 URL (`baseUrl` + `pageUrl`)
    pub fn app_url(&self) -> String {
        url_join(&[&self.base_url, &self.page_url])
    }

    /// 파일 트리 URL
    pub fn tree_url(&self) -> String {
        match &self.tree_url {
            Some(tree) => url_join(&[&self.base_url, tree]),
            None => url_join(&[&self.base_url, &self.page_url, "tree"]),
        }
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = url.into();
        self
    }

    pub fn with_tree_url(mut self, url: impl Into<String>) -> Self {
        self.tree_url = Some(url.into());
        self
    }

    pub fn with_not_found_url(mut self, url: impl Into<String>) -> Self {
        self.not_found_url = Some(url.into());
        self
    }

    pub fn with_build(mut self, available: bool, check: bool) -> Self {
        self.build_available = available;
        self.build_check = check;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PageConfig::default();
        assert_eq!(config.app_url(), "/lab");
        assert_eq!(config.tree_url(), "/lab/tree");
    }

    #[test]
    fn test_explicit_tree_url() {
        let config = PageConfig::new()
            .base_url("/user/alice/")
            .with_tree_url("lab/tree");
        assert_eq!(config.app_url(), "/user/alice/lab");
        assert_eq!(config.tree_url(), "/user/alice/lab/tree");
    }

    #[test]
    fn test_camel_case_parse() {
        let config: PageConfig = serde_json::from_str(
            r#"{ "baseUrl": "/hub/", "notFoundUrl": "/hub/lab/missing", "buildCheck": true }"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "/hub/");
        assert_eq!(config.page_url, "/lab");
        assert_eq!(config.not_found_url.as_deref(), Some("/hub/lab/missing"));
        assert!(config.build_check);
        assert!(!config.build_available);
    }

    #[test]
    fn test_merge_overrides_non_defaults() {
        let mut config = PageConfig::new().base_url("/global/");
        config.merge(PageConfig::new().page_url("/custom"));

        assert_eq!(config.base_url, "/global/");
        assert_eq!(config.page_url, "/custom");
    }

    #[test]
    fn test_save_and_load_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::at(dir.path());

        assert_eq!(PageConfig::load_from(&store).unwrap(), PageConfig::default());

        let config = PageConfig::new().with_build(true, true);
        config.save_to(&store).unwrap();
        assert!(dir.path().join("page_config.json").exists());
        assert_eq!(PageConfig::load_from(&store).unwrap(), config);
    }
}
