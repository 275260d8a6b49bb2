//! Command Palette - 검색 가능한 커맨드 목록

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

/// 팔레트 항목
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteItem {
    pub command: String,
    pub category: String,
    pub args: Value,
}

impl PaletteItem {
    pub fn new(command: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            category: category.into(),
            args: Value::Null,
        }
    }

    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }
}

/// 커맨드 팔레트
pub trait CommandPalette: Send + Sync {
    fn add_item(&self, item: PaletteItem);

    fn items(&self) -> Vec<PaletteItem>;

    /// 카테고리별 항목
    fn items_in(&self, category: &str) -> Vec<PaletteItem> {
        self.items()
            .into_iter()
            .filter(|item| item.category == category)
            .collect()
    }
}

/// 항목만 보관하는 팔레트 모델
#[derive(Default)]
pub struct PaletteModel {
    items: RwLock<Vec<PaletteItem>>,
}

impl PaletteModel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommandPalette for PaletteModel {
    fn add_item(&self, item: PaletteItem) {
        self.items.write().push(item);
    }

    fn items(&self) -> Vec<PaletteItem> {
        self.items.read().clone()
    }
}
