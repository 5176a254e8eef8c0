//! 应用编排层
//!
//! 持有配置、HTTP 客户端和会话，把命令行的每个子命令委托给对应的服务或提交流程

use crate::api::{PhotoBlob, RestClient};
use crate::config::Config;
use crate::form::{FieldEdit, Intent, SubmissionController, SubmissionPhase};
use crate::models::{ImageSize, Item, Paginated};
use crate::services::ItemService;
use crate::session::{FileSessionStore, SessionManager};
use crate::utils::logging;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// 新建物品的输入
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub photo: Option<PathBuf>,
    pub favorite: bool,
    pub item_type: Option<u64>,
}

/// 应用主结构
pub struct App {
    config: Config,
    api: Arc<RestClient>,
    session: SessionManager<RestClient, FileSessionStore>,
    items: ItemService<RestClient>,
}

impl App {
    /// 初始化应用：创建客户端并恢复上次的会话
    pub fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(&config);

        let api = Arc::new(RestClient::new(&config).context("创建 HTTP 客户端失败")?);
        let store = FileSessionStore::new(&config.session_file);
        let mut session = SessionManager::new(Arc::clone(&api), store);
        if session.restore().is_none() {
            info!("🔒 当前未登录");
        }
        let items = ItemService::new(Arc::clone(&api), config.page_size);

        Ok(Self {
            config,
            api,
            session,
            items,
        })
    }

    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<()> {
        let user = self
            .session
            .login(identifier, password)
            .await
            .context("登录失败")?;
        info!("👤 {} <{}>", user.username, user.email);
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        self.session.logout().context("清除会话失败")
    }

    pub fn whoami(&self) {
        match self.session.current_user() {
            Some(user) => info!("👤 {} (id {}) <{}>", user.username, user.id, user.email),
            None => info!("🔒 当前未登录"),
        }
    }

    pub async fn list_items(&self, page: u32, page_size: Option<u32>) -> Result<()> {
        let items = self.items.get_items(page, page_size).await?;
        self.print_page(&items);
        Ok(())
    }

    pub async fn list_favorites(&self, page: u32, page_size: Option<u32>) -> Result<()> {
        let user = self.session.require_user()?;
        let items = self
            .items
            .get_favorite_items(user.id, page, page_size)
            .await?;
        self.print_page(&items);
        Ok(())
    }

    pub async fn list_item_types(&self) -> Result<()> {
        let types = self.items.get_item_types().await?;
        if types.is_empty() {
            info!("没有物品类型");
        }
        for item_type in &types {
            info!("{} [{}] {}", item_type.icon_label(), item_type.id, item_type.name);
        }
        Ok(())
    }

    pub async fn show_item(&self, document_id: &str) -> Result<()> {
        let item = self.items.get_item(document_id).await?;
        let base = &self.config.media_base_url;

        info!("{}", "=".repeat(60));
        info!("📦 {} ({})", item.display_name(), item.document_id);
        info!("   {}", item.display_description());
        info!("   添加日期: {}", item.date_added_label());
        if let Some(item_type) = &item.item_type {
            info!("   类型: {} {}", item_type.icon_label(), item_type.name);
        }
        let fans = item.favorited_usernames();
        if !fans.is_empty() {
            info!("   ⭐ {}", fans.join(", "));
        }
        for photo in &item.photos {
            info!("   🖼️ {}", photo.image_url(ImageSize::Large, base));
        }
        info!("{}", "=".repeat(60));
        Ok(())
    }

    /// 通过提交流程新建物品
    ///
    /// 有图片时先等待上传完成，再提交并等待创建结果
    pub async fn add_item(&self, new_item: NewItem) -> Result<Item> {
        let mut controller = SubmissionController::new(Arc::clone(&self.api), &self.config);
        controller.set_current_user(self.session.current_user().map(|u| u.id));

        controller.dispatch(Intent::EditField(FieldEdit::Name(new_item.name)));
        if let Some(description) = new_item.description {
            controller.dispatch(Intent::EditField(FieldEdit::Description(description)));
        }
        if new_item.item_type.is_some() {
            controller.dispatch(Intent::EditField(FieldEdit::ItemType(new_item.item_type)));
        }
        if new_item.favorite {
            if !self.session.is_authenticated() {
                warn!("⚠️ 未登录，收藏标记将被忽略");
            }
            controller.dispatch(Intent::ToggleFavorite);
        }

        if let Some(path) = new_item.photo {
            let blob = PhotoBlob::from_path(&path)
                .await
                .with_context(|| format!("无法读取图片: {}", path.display()))?;
            info!("📤 正在上传图片 {} ({} 字节)...", blob.file_name(), blob.len());
            controller.dispatch(Intent::SelectPhoto(blob));
            controller.wait_for_upload().await;

            if let Some(error) = &controller.form_state().last_error {
                bail!("{}", error);
            }
            info!("✓ 图片上传完成");
        }

        controller.dispatch(Intent::Submit);
        controller.wait_for_outcome().await;

        let state = controller.form_state();
        match (state.phase, &state.last_error) {
            (SubmissionPhase::Succeeded, _) => {
                let item = controller
                    .last_created()
                    .cloned()
                    .context("创建成功但没有返回记录")?;
                info!("✅ 已创建物品: {} ({})", item.display_name(), item.document_id);
                Ok(item)
            }
            (_, Some(error)) => bail!("{}", error),
            (phase, None) => bail!("提交未完成，当前状态: {}", phase),
        }
    }

    pub async fn delete_item(&self, document_id: &str) -> Result<()> {
        self.items.delete_item(document_id).await
    }

    fn print_page(&self, page: &Paginated<Item>) {
        let user_id = self.session.current_user().map(|u| u.id);
        for item in &page.data {
            print_item_row(item, user_id, &self.config.media_base_url);
        }
        let pagination = page.pagination();
        logging::log_page_summary(&pagination);
        if pagination.has_next() {
            info!("➡️ 使用 --page {} 查看下一页", pagination.page + 1);
        }
    }
}

fn print_item_row(item: &Item, user_id: Option<u64>, media_base_url: &str) {
    let star = match user_id {
        Some(id) if item.is_favorited_by(id) => "⭐",
        _ => "  ",
    };
    let icon = item
        .item_type
        .as_ref()
        .map(|t| t.icon_label())
        .unwrap_or("?");
    info!(
        "{} {} {} | {} | {} | {}",
        star,
        icon,
        item.display_name(),
        logging::truncate_text(item.display_description(), 40),
        item.date_added_label(),
        item.document_id
    );
    if let Some(url) = item.thumbnail_url(media_base_url) {
        info!("      🖼️ {}", url);
    }
}
