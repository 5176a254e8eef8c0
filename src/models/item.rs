use super::{null_as_empty, ImageSize, ItemType, Photo, UserSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 库存物品（由后端持有，客户端只读取）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    #[serde(rename = "documentId", default)]
    pub document_id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "DateAdded", default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
    #[serde(rename = "Favorited", default, deserialize_with = "null_as_empty")]
    pub favorited: Vec<UserSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    #[serde(rename = "Photos", default, deserialize_with = "null_as_empty")]
    pub photos: Vec<Photo>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "publishedAt", default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Item {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "No name"
        } else {
            &self.name
        }
    }

    pub fn display_description(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("No description")
    }

    /// 创建日期（`YYYY-MM-DD`），缺失时为 `N/A`
    pub fn date_added_label(&self) -> String {
        self.created_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn is_favorited_by(&self, user_id: u64) -> bool {
        self.favorited.iter().any(|u| u.id == user_id)
    }

    pub fn favorited_usernames(&self) -> Vec<&str> {
        self.favorited.iter().map(|u| u.username.as_str()).collect()
    }

    pub fn thumbnail_url(&self, base_url: &str) -> Option<String> {
        super::first_image_url(&self.photos, ImageSize::Thumbnail, base_url)
    }
}
