//! 由表单生成的物品创建请求

use super::state::FormState;
use crate::api::RecordPayload;
use serde_json::json;

/// 提交时的表单快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub description: Option<String>,
    /// 标记为收藏时记录收藏者（当前登录用户）
    pub favorited_by: Option<u64>,
    pub photo_id: Option<u64>,
    pub item_type: Option<u64>,
}

impl ItemDraft {
    pub fn from_form(form: &FormState, current_user: Option<u64>) -> Self {
        let description = form.description.trim();
        Self {
            name: form.name.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            favorited_by: if form.favorite { current_user } else { None },
            photo_id: form.uploaded_photo_id,
            item_type: form.item_type,
        }
    }

    pub fn to_payload(&self) -> RecordPayload {
        let mut payload = RecordPayload::new();
        payload
            .set("Name", self.name.as_str())
            .set_opt("Description", self.description.as_deref())
            .set_opt("Favorited", self.favorited_by.map(|user| json!([user])))
            .set_opt("Photos", self.photo_id)
            .set_opt("item_type", self.item_type);
        payload
    }
}
