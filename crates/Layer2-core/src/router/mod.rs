//! # Router
//!
//! URL 경로 패턴(정규식)을 커맨드에 연결한다.
//!
//! ```text
//! route(url)
//!   │  RouteArgs::parse(base, url) → { path, query }
//!   ▼
//! rules (rank, 등록 순서로 정렬)
//!   │  pattern.is_match(path)
//!   ▼
//! commands.start(command, {path, query})   ← 규칙 순서대로, 동기 호출
//!   │
//!   ▼
//! tokio::spawn(pending)                     ← 매칭마다 하나씩
//! ```
//!
//! 매칭된 커맨드는 모두 실행되며, 라우터는 완료를 기다리지 않는다.
//! 실행 시작 순서만 보장되고 완료 순서는 보장되지 않는다.

mod args;
mod dispatch;

pub use args::RouteArgs;
pub use dispatch::{Dispatched, RouteDispatch, RouteOutcome};

use crate::command::CommandRegistry;
use lab_foundation::{Error, EventBus, EventType, LabEvent, Result};
use parking_lot::RwLock;
use regex::Regex;
use serde_json::json;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// 라우트 규칙
#[derive(Debug, Clone)]
pub struct RouteRule {
    pub pattern: Regex,
    pub command: String,
    pub rank: usize,
    /// 등록 순서 (같은 rank의 tie-break)
    seq: usize,
}

/// 라우터
pub struct Router {
    base: String,
    commands: Arc<CommandRegistry>,
    events: Option<Arc<EventBus>>,
    rules: RwLock<Vec<RouteRule>>,
}

impl Router {
    /// 새 라우터 생성
    pub fn new(base: impl Into<String>, commands: Arc<CommandRegistry>) -> Self {
        Self {
            base: base.into(),
            commands,
            events: None,
            rules: RwLock::new(Vec::new()),
        }
    }

    /// 실패한 커맨드를 `CommandFailed` 이벤트로 발행
    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    // ========================================================================
    // 등록
    // ========================================================================

    /// 패턴 등록 (rank = 등록 순서)
    ///
    /// 커맨드 존재 여부는 확인하지 않는다. 커맨드는 나중에 등록될 수 있다.
    pub fn register(&self, pattern: &str, command: impl Into<String>) -> Result<()> {
        self.register_regex(Regex::new(pattern)?, command, None);
        Ok(())
    }

    /// rank를 지정해 패턴 등록 (낮을수록 먼저)
    pub fn register_ranked(&self, pattern: &str, command: impl Into<String>, rank: usize) -> Result<()> {
        self.register_regex(Regex::new(pattern)?, command, Some(rank));
        Ok(())
    }

    /// 컴파일된 정규식 등록
    pub fn register_regex(&self, pattern: Regex, command: impl Into<String>, rank: Option<usize>) {
        let command = command.into();
        let mut rules = self.rules.write();
        let seq = rules.len();
        let rank = rank.unwrap_or(seq);
        debug!("Registered route {} -> {} (rank {})", pattern, command, rank);

        let rule = RouteRule {
            pattern,
            command,
            rank,
            seq,
        };
        let index = rules.partition_point(|r| (r.rank, r.seq) <= (rule.rank, rule.seq));
        rules.insert(index, rule);
    }

    /// 등록된 규칙 (평가 순서)
    pub fn rules(&self) -> Vec<RouteRule> {
        self.rules.read().clone()
    }

    // ========================================================================
    // 라우팅
    // ========================================================================

    /// 경로에 매칭되는 커맨드 (평가 순서)
    pub fn matches(&self, path: &str) -> Vec<String> {
        self.rules
            .read()
            .iter()
            .filter(|rule| rule.pattern.is_match(path))
            .map(|rule| rule.command.clone())
            .collect()
    }

    /// URL 라우팅
    ///
    /// 매칭된 커맨드를 규칙 순서대로 시작하고, 남은 실행은 커맨드마다
    /// 태스크로 띄운 뒤 바로 반환한다. 한 커맨드의 실패는
    /// 로그와 이벤트로만 보고되고 다른 커맨드에는 영향을 주지 않는다.
    /// tokio 런타임 안에서 호출해야 한다.
    pub fn route(&self, url: &str) -> Result<RouteDispatch> {
        let args = RouteArgs::parse(&self.base, url)?;
        let matched = self.matches(&args.path);

        if matched.is_empty() {
            debug!("No route matches {}", args.path);
            return Ok(RouteDispatch {
                args,
                dispatched: Vec::new(),
            });
        }

        let runtime = Handle::try_current()
            .map_err(|e| Error::Internal(format!("routing requires a tokio runtime: {}", e)))?;
        debug!("Routing {} to [{}]", args.path, matched.join(", "));

        let dispatched = matched
            .into_iter()
            .map(|command| {
                // 실행 함수는 여기서 규칙 순서대로 불리고, 나머지만 태스크로 넘어간다
                let started = self.commands.start(&command, args.to_value());
                let events = self.events.clone();
                let task_command = command.clone();

                let handle = runtime.spawn(async move {
                    let result = match started {
                        Ok(pending) => pending.await,
                        Err(e) => Err(e),
                    };
                    if let Err(e) = &result {
                        warn!("Routed command {} failed: {}", task_command, e);
                        if let Some(events) = events {
                            events
                                .publish(LabEvent::new(
                                    EventType::CommandFailed,
                                    json!({ "command": task_command, "error": e.to_string() }),
                                    "router",
                                ))
                                .await;
                        }
                    }
                    result
                });

                Dispatched { command, handle }
            })
            .collect();

        Ok(RouteDispatch { args, dispatched })
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("base", &self.base)
            .field("rules", &self.rules.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandSpec;
    use parking_lot::Mutex;
    use serde_json::Value;

    /// 호출된 (커맨드, path)를 기록하는 커맨드들이 등록된 레지스트리
    fn recording_commands(ids: &[&str]) -> (Arc<CommandRegistry>, Arc<Mutex<Vec<(String, String)>>>) {
        let commands = Arc::new(CommandRegistry::new());
        let calls = Arc::new(Mutex::new(Vec::new()));
        for id in ids {
            let calls = calls.clone();
            let name = id.to_string();
            commands
                .add_command(
                    *id,
                    CommandSpec::new(move |args: Value| {
                        let path = args["path"].as_str().unwrap_or_default().to_string();
                        calls.lock().push((name.clone(), path));
                        async { Ok::<_, Error>(Value::Null) }
                    }),
                )
                .unwrap();
        }
        (commands, calls)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_all_matches_in_registration_order() {
        let (commands, calls) = recording_commands(&["cmd:a", "cmd:b"]);
        let router = Router::new("/", commands);
        router.register(r"^/a/.+", "cmd:a").unwrap();
        router.register(r"^/a/b$", "cmd:b").unwrap();

        let dispatch = router.route("/a/b").unwrap();
        assert_eq!(dispatch.commands(), vec!["cmd:a", "cmd:b"]);

        // 태스크가 돌기 전에 이미 순서대로 시작됨
        assert_eq!(
            calls.lock().clone(),
            vec![("cmd:a".into(), "/a/b".into()), ("cmd:b".into(), "/a/b".into())]
        );

        let outcomes = dispatch.settle().await;
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_many_matches_start_in_rule_order() {
        let ids: Vec<String> = (0..64).map(|i| format!("cmd:{}", i)).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let (commands, calls) = recording_commands(&id_refs);
        let router = Router::new("/", commands);
        for id in &ids {
            router.register(r"^/a", id.as_str()).unwrap();
        }

        for _ in 0..20 {
            calls.lock().clear();
            let outcomes = router.route("/a").unwrap().settle().await;
            assert_eq!(outcomes.len(), 64);

            let started: Vec<String> = calls.lock().iter().map(|(id, _)| id.clone()).collect();
            assert_eq!(started, ids);
        }
    }

    #[tokio::test]
    async fn test_no_match_is_silent() {
        let (commands, calls) = recording_commands(&["cmd:a"]);
        let router = Router::new("/lab", commands);
        router.register(r"^/a/.+", "cmd:a").unwrap();

        let dispatch = router.route("http://localhost/lab/elsewhere").unwrap();
        assert!(dispatch.is_empty());
        assert!(dispatch.settle().await.is_empty());
        assert!(calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_rank_orders_evaluation() {
        let (commands, _calls) = recording_commands(&["cmd:a", "cmd:b", "cmd:c"]);
        let router = Router::new("/", commands);
        router.register(r"^/x", "cmd:a").unwrap();
        router.register(r"^/x", "cmd:b").unwrap();
        router.register_ranked(r"^/x", "cmd:c", 0).unwrap();

        // 같은 rank면 먼저 등록된 규칙이 앞선다
        assert_eq!(router.matches("/x"), vec!["cmd:a", "cmd:c", "cmd:b"]);
        let dispatch = router.route("/x").unwrap();
        assert_eq!(dispatch.commands(), vec!["cmd:a", "cmd:c", "cmd:b"]);
        dispatch.settle().await;
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let (commands, calls) = recording_commands(&["cmd:ok"]);
        let events = Arc::new(EventBus::new());
        commands
            .add_command(
                "cmd:broken",
                CommandSpec::new(|_| async { Err::<Value, _>(Error::Internal("boom".into())) }),
            )
            .unwrap();

        let router = Router::new("/", commands).with_events(events.clone());
        router.register(r"^/tree/", "cmd:broken").unwrap();
        router.register(r"^/tree/", "cmd:missing").unwrap();
        router.register(r"^/tree/", "cmd:ok").unwrap();

        let outcomes = router.route("/tree/a").unwrap().settle().await;
        assert!(outcomes[0].result.is_err());
        assert!(matches!(outcomes[1].result, Err(Error::CommandNotFound(_))));
        assert!(outcomes[2].result.is_ok());
        assert_eq!(calls.lock().len(), 1);
        assert_eq!(events.history_by_type(EventType::CommandFailed).await.len(), 2);
    }

    #[tokio::test]
    async fn test_tree_path_is_passed_unstripped() {
        let (commands, calls) = recording_commands(&["router:tree"]);
        let router = Router::new("/lab", commands);
        router.register(r"^/tree/.+", "router:tree").unwrap();

        router
            .route("http://localhost:8888/lab/tree/foo/bar.ipynb")
            .unwrap()
            .settle()
            .await;
        assert_eq!(
            calls.lock().as_slice(),
            &[("router:tree".to_string(), "/tree/foo/bar.ipynb".to_string())]
        );
    }

    #[test]
    fn test_invalid_pattern() {
        let router = Router::new("/", Arc::new(CommandRegistry::new()));
        assert!(matches!(
            router.register("(", "x"),
            Err(Error::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_route_outside_runtime() {
        let (commands, _calls) = recording_commands(&["cmd:a"]);
        let router = Router::new("/", commands);
        router.register(r"^/a", "cmd:a").unwrap();
        assert!(matches!(router.route("/a"), Err(Error::Internal(_))));
    }
}
