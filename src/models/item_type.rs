use serde::{Deserialize, Serialize};

/// 物品类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemType {
    pub id: u64,
    #[serde(rename = "documentId", default)]
    pub document_id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Color", default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "Icon", default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ItemType {
    /// 列表中显示的图标，缺失时为 `?`
    pub fn icon_label(&self) -> &str {
        self.icon.as_deref().filter(|s| !s.is_empty()).unwrap_or("?")
    }
}
