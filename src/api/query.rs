//! 列表查询参数
//!
//! 渲染为后端约定的方括号形式：`pagination[page]=1`、`filters[Favorited][id][$eq]=3`

/// 列表查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub populate_all: bool,
    filters: Vec<(Vec<String>, String)>,
}

impl ListQuery {
    /// 第 `page` 页（从 1 开始，0 视为 1），默认展开全部关联字段
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            populate_all: true,
            filters: Vec::new(),
        }
    }

    /// 增加一个等值过滤条件，`path` 为字段路径（如 `["Favorited", "id"]`）
    pub fn filter_eq(mut self, path: &[&str], value: impl ToString) -> Self {
        self.filters.push((
            path.iter().map(|s| s.to_string()).collect(),
            value.to_string(),
        ));
        self
    }

    pub fn without_populate(mut self) -> Self {
        self.populate_all = false;
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("pagination[page]".to_string(), self.page.to_string()),
            ("pagination[pageSize]".to_string(), self.page_size.to_string()),
        ];
        if self.populate_all {
            pairs.push(("populate".to_string(), "*".to_string()));
        }
        for (path, value) in &self.filters {
            let key = path
                .iter()
                .fold("filters".to_string(), |acc, segment| format!("{}[{}]", acc, segment));
            pairs.push((format!("{}[$eq]", key), value.clone()));
        }
        pairs
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::page(1, 25)
    }
}
