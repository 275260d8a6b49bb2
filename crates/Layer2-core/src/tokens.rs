//! Well-known tokens - 기본 플러그인들이 주고받는 기능 토큰

use crate::plugin::Token;
use crate::router::Router;
use crate::services::{CommandPalette, LayoutRestorer, StateDb};

/// URL 라우터
pub const ROUTER: Token<Router> = Token::new("@lab/application:IRouter");

/// 레이아웃 복원기
pub const LAYOUT_RESTORER: Token<LayoutRestorer> = Token::new("@lab/application:ILayoutRestorer");

/// 커맨드 팔레트
pub const COMMAND_PALETTE: Token<dyn CommandPalette> = Token::new("@lab/apputils:ICommandPalette");

/// 상태 저장소
pub const STATE_DB: Token<dyn StateDb> = Token::new("@lab/coreutils:IStateDB");
