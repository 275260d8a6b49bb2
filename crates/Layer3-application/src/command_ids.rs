//! Command IDs - 애플리케이션 플러그인이 등록하는 커맨드

pub const ACTIVATE_NEXT_TAB: &str = "application:activate-next-tab";

pub const ACTIVATE_PREVIOUS_TAB: &str = "application:activate-previous-tab";

pub const CLOSE_ALL: &str = "application:close-all";

pub const SET_MODE: &str = "application:set-mode";

pub const TOGGLE_MODE: &str = "application:toggle-mode";

pub const TOGGLE_LEFT_AREA: &str = "application:toggle-left-area";

pub const TOGGLE_RIGHT_AREA: &str = "application:toggle-right-area";

pub const TREE: &str = "router:tree";

pub const TREE_URL: &str = "router:tree-url";

/// 파일 브라우저 플러그인이 제공 (router:tree가 위임)
pub const NAVIGATE_MAIN: &str = "filebrowser:navigate-main";
