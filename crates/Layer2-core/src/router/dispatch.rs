//! Route dispatch - 매칭된 커맨드 실행 핸들

use super::args::RouteArgs;
use lab_foundation::{Error, Result};
use serde_json::Value;
use tokio::task::JoinHandle;

/// 실행이 시작된 커맨드 하나
#[derive(Debug)]
pub struct Dispatched {
    pub command: String,
    pub handle: JoinHandle<Result<Value>>,
}

/// 끝난 커맨드 하나의 결과
#[derive(Debug)]
pub struct RouteOutcome {
    pub command: String,
    pub result: Result<Value>,
}

/// `route()` 한 번의 결과
///
/// 커맨드는 이미 실행 중이다. 이 값을 버려도 실행은 계속되며,
/// 결과가 필요하면 `settle()`로 기다린다.
#[derive(Debug)]
pub struct RouteDispatch {
    pub args: RouteArgs,
    pub dispatched: Vec<Dispatched>,
}

impl RouteDispatch {
    /// 실행이 시작된 커맨드 (시작 순서)
    pub fn commands(&self) -> Vec<&str> {
        self.dispatched.iter().map(|d| d.command.as_str()).collect()
    }

    /// 매칭된 커맨드가 없는지 확인
    pub fn is_empty(&self) -> bool {
        self.dispatched.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dispatched.len()
    }

    /// 모든 커맨드가 끝날 때까지 기다린 뒤 결과 수집 (시작 순서)
    pub async fn settle(self) -> Vec<RouteOutcome> {
        let mut outcomes = Vec::with_capacity(self.dispatched.len());
        for Dispatched { command, handle } in self.dispatched {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(Error::Internal(format!("command task for {} ended abnormally: {}", command, e))),
            };
            outcomes.push(RouteOutcome { command, result });
        }
        outcomes
    }
}
