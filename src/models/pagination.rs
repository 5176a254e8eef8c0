use serde::{Deserialize, Serialize};

/// 分页元数据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u64,
}

impl Pagination {
    /// 当前页显示的条目区间（从 1 开始，闭区间）；没有条目时为 `(0, 0)`
    pub fn item_range(&self) -> (u64, u64) {
        if self.total == 0 || self.page == 0 {
            return (0, 0);
        }
        let size = u64::from(self.page_size);
        let start = (u64::from(self.page) - 1) * size + 1;
        let end = (u64::from(self.page) * size).min(self.total);
        (start.min(self.total), end)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// 列表接口的响应信封：`{ data: [...], meta: { pagination } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// 分页信息；后端未返回时按单页推算
    pub fn pagination(&self) -> Pagination {
        self.meta.pagination.unwrap_or(Pagination {
            page: 1,
            page_size: self.data.len() as u32,
            page_count: 1,
            total: self.data.len() as u64,
        })
    }
}
