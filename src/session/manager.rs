//! 会话管理
//!
//! 启动时读取并校验持久化的会话；登录成功时写入，登出或发现数据损坏时清除

use super::store::{Session, SessionStore};
use crate::api::{AuthResponse, RemoteApi};
use crate::error::{AppResult, SessionError};
use crate::models::AuthUser;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct SessionManager<A, S> {
    api: Arc<A>,
    store: S,
    current: Option<Session>,
}

impl<A, S> SessionManager<A, S>
where
    A: RemoteApi,
    S: SessionStore,
{
    pub fn new(api: Arc<A>, store: S) -> Self {
        Self {
            api,
            store,
            current: None,
        }
    }

    /// 恢复持久化的会话
    ///
    /// 不会失败：数据损坏时清除并视为未登录
    pub fn restore(&mut self) -> Option<&AuthUser> {
        match self.store.load() {
            Ok(Some(session)) => {
                info!("✓ 已恢复会话: {}", session.user.username);
                self.api.set_bearer_token(Some(session.token.clone()));
                self.current = Some(session);
            }
            Ok(None) => {
                debug!("没有已保存的会话");
                self.forget();
            }
            Err(SessionError::Corrupted { reason }) => {
                warn!("⚠️ 会话数据已损坏，已清除: {}", reason);
                if let Err(e) = self.store.clear() {
                    warn!("清除会话失败: {}", e);
                }
                self.forget();
            }
            Err(e) => {
                warn!("⚠️ 读取会话失败，按未登录处理: {}", e);
                self.forget();
            }
        }
        self.current_user()
    }

    pub async fn login(&mut self, identifier: &str, password: &str) -> AppResult<&AuthUser> {
        let AuthResponse { jwt, user } = self.api.login(identifier, password).await?;
        self.api.set_bearer_token(Some(jwt.clone()));

        let session = Session { token: jwt, user };
        if let Err(e) = self.store.save(&session) {
            warn!("⚠️ 会话保存失败，仅在本次运行中有效: {}", e);
        }
        info!("✓ 登录成功: {}", session.user.username);

        let session = self.current.insert(session);
        Ok(&session.user)
    }

    pub fn logout(&mut self) -> AppResult<()> {
        if let Some(session) = &self.current {
            info!("👋 登出: {}", session.user.username);
        }
        self.forget();
        self.store.clear()?;
        Ok(())
    }

    pub fn current_user(&self) -> Option<&AuthUser> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn require_user(&self) -> AppResult<&AuthUser> {
        self.current_user()
            .ok_or_else(|| SessionError::NotAuthenticated.into())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    fn forget(&mut self) {
        self.current = None;
        self.api.set_bearer_token(None);
    }
}
