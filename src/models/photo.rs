use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 图片尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    #[default]
    Thumbnail,
    Small,
    Medium,
    Large,
    Original,
}

impl ImageSize {
    fn format_key(self) -> Option<&'static str> {
        match self {
            ImageSize::Thumbnail => Some("thumbnail"),
            ImageSize::Small => Some("small"),
            ImageSize::Medium => Some("medium"),
            ImageSize::Large => Some("large"),
            ImageSize::Original => None,
        }
    }
}

/// 某个尺寸的图片版本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoFormat {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// 上传后的图片文件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<BTreeMap<String, PhotoFormat>>,
}

impl Photo {
    /// 指定尺寸的完整 URL
    ///
    /// 请求的尺寸不存在时回退到原图
    pub fn image_url(&self, size: ImageSize, base_url: &str) -> String {
        let relative = size
            .format_key()
            .and_then(|key| self.formats.as_ref()?.get(key))
            .map(|format| format.url.as_str())
            .unwrap_or(&self.url);
        resolve_media_url(relative, base_url)
    }
}

/// 第一张图片的 URL
pub fn first_image_url(photos: &[Photo], size: ImageSize, base_url: &str) -> Option<String> {
    photos.first().map(|photo| photo.image_url(size, base_url))
}

fn resolve_media_url(url: &str, base_url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    format!("{}{}", base_url.trim_end_matches('/'), url)
}
