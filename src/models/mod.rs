pub mod item;
pub mod item_type;
pub mod pagination;
pub mod photo;
pub mod user;

pub use item::Item;
pub use item_type::ItemType;
pub use pagination::{Paginated, Pagination};
pub use photo::{first_image_url, ImageSize, Photo, PhotoFormat};
pub use user::{AuthUser, UserSummary};

use serde::{Deserialize, Deserializer};

/// 后端对空关联字段可能返回 `null`，统一反序列化为空列表
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
