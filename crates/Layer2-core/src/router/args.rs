//! Route arguments - URL을 path / query로 분해

use lab_foundation::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// 상대 URL을 해석할 때 쓰는 임시 origin
const FALLBACK_ORIGIN: &str = "http://localhost/";

/// 매칭된 커맨드에 전달되는 인자
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteArgs {
    /// base URL 이후의 경로 (항상 `/`로 시작)
    pub path: String,

    /// `?`를 뺀 쿼리 문자열
    pub query: String,
}

impl RouteArgs {
    /// URL을 base 기준으로 분해
    ///
    /// `url`은 절대 URL(`http://host/lab/tree/a.ipynb`)이나 경로
    /// (`/lab/tree/a.ipynb?x=1`) 모두 가능하다. `base`는 앱의 base URL로,
    /// 경로만 사용된다.
    pub fn parse(base: &str, url: &str) -> Result<Self> {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(FALLBACK_ORIGIN)?.join(url)?,
            Err(e) => return Err(e.into()),
        };

        let base_path = Self::base_path(base);
        let pathname = parsed.path();
        let path = match pathname.strip_prefix(base_path.as_str()) {
            Some(rest) if !base_path.is_empty() && (rest.is_empty() || rest.starts_with('/')) => rest,
            _ => pathname,
        };

        Ok(Self {
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            query: parsed.query().unwrap_or_default().to_string(),
        })
    }

    /// base URL의 경로 부분 (끝의 `/` 제거)
    fn base_path(base: &str) -> String {
        let path = match Url::parse(base) {
            Ok(url) => url.path().to_string(),
            Err(_) => base.to_string(),
        };
        path.trim_end_matches('/').to_string()
    }

    /// 쿼리 파라미터 (디코딩됨)
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(self.query.as_bytes())
            .into_owned()
            .collect()
    }

    /// 커맨드 인자 형태 (`{"path", "query"}`)
    pub fn to_value(&self) -> Value {
        serde_json::json!({ "path": self.path, "query": self.query })
    }
}
