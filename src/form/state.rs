//! 表单状态

use crate::api::{BlobId, PhotoBlob};
use std::fmt;

/// 一次提交的生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    /// 正在上传该图片
    Uploading(BlobId),
    Validating,
    Creating,
    Succeeded,
    Failed,
}

impl SubmissionPhase {
    /// 是否有网络请求决定着当前阶段
    pub fn is_busy(self) -> bool {
        matches!(self, SubmissionPhase::Uploading(_) | SubmissionPhase::Creating)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionPhase::Succeeded | SubmissionPhase::Failed)
    }
}

impl fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionPhase::Idle => write!(f, "Idle"),
            SubmissionPhase::Uploading(blob) => write!(f, "Uploading({})", blob),
            SubmissionPhase::Validating => write!(f, "Validating"),
            SubmissionPhase::Creating => write!(f, "Creating"),
            SubmissionPhase::Succeeded => write!(f, "Succeeded"),
            SubmissionPhase::Failed => write!(f, "Failed"),
        }
    }
}

/// 本地校验错误，不会触发任何网络请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    NameRequired,
    PhotoStillUploading,
    /// 图片上传失败，需要重新选择
    PhotoUploadFailed,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NameRequired => write!(f, "Item name is required"),
            ValidationError::PhotoStillUploading => {
                write!(f, "Please wait for the photo to finish uploading")
            }
            ValidationError::PhotoUploadFailed => {
                write!(f, "Photo upload failed, select the photo again")
            }
        }
    }
}

/// 展示给用户的表单错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    Validation(ValidationError),
    Upload(String),
    Create(String),
}

impl FormError {
    /// 名称为空属于字段级错误，其余显示在表单顶部
    pub fn is_field_level(&self) -> bool {
        matches!(self, FormError::Validation(ValidationError::NameRequired))
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Validation(e) => write!(f, "{}", e),
            FormError::Upload(msg) => write!(f, "Failed to upload photo: {}", msg),
            FormError::Create(msg) => write!(f, "Failed to create item: {}", msg),
        }
    }
}

/// 新建物品表单
///
/// 不变量：`uploaded_photo_id` 非空时 `selected_photo` 必然非空，且该 id 来自这张图片的上传结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub name: String,
    pub description: String,
    pub favorite: bool,
    pub item_type: Option<u64>,
    pub selected_photo: Option<PhotoBlob>,
    pub uploaded_photo_id: Option<u64>,
    pub phase: SubmissionPhase,
    pub last_error: Option<FormError>,
}

impl FormState {
    /// 名称为空时的字段提示
    pub fn name_helper_text(&self) -> Option<&'static str> {
        match &self.last_error {
            Some(error) if error.is_field_level() && self.name.trim().is_empty() => {
                Some("Name is required")
            }
            _ => None,
        }
    }

    /// 提交按钮是否可用
    pub fn can_submit(&self) -> bool {
        !self.phase.is_busy()
            && self.phase != SubmissionPhase::Validating
            && !self.name.trim().is_empty()
            && (self.selected_photo.is_none() || self.uploaded_photo_id.is_some())
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.phase, SubmissionPhase::Uploading(_))
    }
}
