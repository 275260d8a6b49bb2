//! URL 경로 유틸리티
//!
//! 페이지 설정의 `baseUrl`/`pageUrl`/`treeUrl` 조합과 파일 경로 이스케이프에 사용한다.

/// URL 조각을 `/`로 연결
///
/// - 첫 조각의 scheme(`http://`)과 선행 `/`는 유지
/// - 중복 `/`는 하나로 합침
/// - 마지막 조각이 `/`로 끝나면 결과도 `/`로 끝남
///
/// ```
/// use lab_foundation::url_ext::url_join;
/// assert_eq!(url_join(&["/", "/lab"]), "/lab");
/// assert_eq!(url_join(&["http://host/base/", "lab", "tree"]), "http://host/base/lab/tree");
/// ```
pub fn url_join(parts: &[&str]) -> String {
    let parts: Vec<&str> = parts.iter().copied().filter(|p| !p.is_empty()).collect();
    let Some(first) = parts.first() else {
        return String::new();
    };

    let (prefix, first_rest) = match first.find("://") {
        Some(idx) => first.split_at(idx + 3),
        None => ("", *first),
    };

    let mut segments: Vec<&str> = Vec::new();
    for part in std::iter::once(first_rest).chain(parts.iter().skip(1).copied()) {
        segments.extend(part.split('/').filter(|s| !s.is_empty()));
    }

    let mut joined = String::from(prefix);
    if prefix.is_empty() && first_rest.starts_with('/') {
        joined.push('/');
    }
    joined.push_str(&segments.join("/"));

    let trailing = parts.last().is_some_and(|p| p.ends_with('/'));
    if trailing && !joined.ends_with('/') {
        joined.push('/');
    }
    joined
}

/// 경로의 각 세그먼트를 percent-encoding (구분자 `/`는 유지)
pub fn url_escape(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// percent-encoding 해제 (실패 시 원본 유지)
pub fn url_unescape(path: &str) -> String {
    urlencoding::decode(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
