//! 表单意图与内部事件

use crate::api::{BlobId, PhotoBlob, UploadedFile};
use crate::models::Item;

/// 单个字段的编辑
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Name(String),
    Description(String),
    ItemType(Option<u64>),
}

/// 展示层可以发出的意图
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SelectPhoto(PhotoBlob),
    EditField(FieldEdit),
    ToggleFavorite,
    Submit,
    Reset,
}

/// 状态机处理的事件：用户意图，或异步操作的完成
#[derive(Debug, Clone)]
pub enum Event {
    Intent(Intent),
    UploadSettled {
        blob: BlobId,
        outcome: Result<UploadedFile, String>,
    },
    CreateSettled {
        submission: u64,
        outcome: Result<Item, String>,
    },
    /// 成功提示的展示时间已到
    SuccessDisplayElapsed { epoch: u64 },
}

impl From<Intent> for Event {
    fn from(intent: Intent) -> Self {
        Event::Intent(intent)
    }
}
