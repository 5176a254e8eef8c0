//! 物品查询服务
//!
//! 负责列表、收藏、类型、详情与删除；新建物品走 [`crate::form`] 的提交流程

use crate::api::{Collection, ListQuery, RemoteApi};
use crate::models::{Item, ItemType, Paginated};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// 一次性取回全部类型时的页大小
const ITEM_TYPE_PAGE_SIZE: u32 = 100;

pub struct ItemService<A> {
    api: Arc<A>,
    page_size: u32,
}

impl<A: RemoteApi> ItemService<A> {
    pub fn new(api: Arc<A>, page_size: u32) -> Self {
        Self {
            api,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// 分页获取物品，`page_size` 为空时使用配置的默认值
    pub async fn get_items(&self, page: u32, page_size: Option<u32>) -> Result<Paginated<Item>> {
        let query = ListQuery::page(page, page_size.unwrap_or(self.page_size));
        debug!("获取物品列表: 第 {} 页", query.page);

        self.api
            .list_records(Collection::Items, &query)
            .await
            .with_context(|| format!("获取物品列表失败 (第 {} 页)", query.page))
    }

    /// 分页获取某个用户收藏的物品
    pub async fn get_favorite_items(
        &self,
        user_id: u64,
        page: u32,
        page_size: Option<u32>,
    ) -> Result<Paginated<Item>> {
        let query = ListQuery::page(page, page_size.unwrap_or(self.page_size))
            .filter_eq(&["Favorited", "id"], user_id);
        debug!("获取用户 {} 的收藏: 第 {} 页", user_id, query.page);

        self.api
            .list_records(Collection::Items, &query)
            .await
            .with_context(|| format!("获取收藏列表失败 (用户 {})", user_id))
    }

    pub async fn get_item_types(&self) -> Result<Vec<ItemType>> {
        let query = ListQuery::page(1, ITEM_TYPE_PAGE_SIZE).without_populate();
        let page: Paginated<ItemType> = self
            .api
            .list_records(Collection::ItemTypes, &query)
            .await
            .context("获取物品类型失败")?;
        Ok(page.data)
    }

    pub async fn get_item(&self, document_id: &str) -> Result<Item> {
        self.api
            .get_record(Collection::Items, document_id)
            .await
            .with_context(|| format!("获取物品详情失败: {}", document_id))
    }

    pub async fn delete_item(&self, document_id: &str) -> Result<()> {
        self.api
            .delete_record(Collection::Items, document_id)
            .await
            .with_context(|| format!("删除物品失败: {}", document_id))?;
        info!("🗑️ 已删除物品 {}", document_id);
        Ok(())
    }
}
