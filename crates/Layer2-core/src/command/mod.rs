//! Command - 이름으로 실행되는 커맨드
//!
//! 플러그인이 커맨드를 등록하고, 라우터와 UI(팔레트, 메뉴)가 id로 실행한다.
//! 인자와 결과는 JSON(`serde_json::Value`)으로 주고받는다.

mod registry;

pub use registry::{
    CommandFuture, CommandInfo, CommandRegistry, CommandSpec, ExecuteFn, LabelFn, PredicateFn,
};
