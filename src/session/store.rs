//! 会话持久化
//!
//! 只通过 [`SessionStore`] 这一窄接口访问，避免到处读写全局存储

use crate::error::SessionError;
use crate::models::AuthUser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 已登录的会话：凭证 + 用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: AuthUser,
}

impl Session {
    /// 从持久化文本解析并校验
    pub fn parse(raw: &str) -> Result<Self, SessionError> {
        let session: Session = serde_json::from_str(raw).map_err(|e| SessionError::Corrupted {
            reason: e.to_string(),
        })?;
        if session.token.trim().is_empty() {
            return Err(SessionError::Corrupted {
                reason: "凭证为空".to_string(),
            });
        }
        Ok(session)
    }
}

/// 会话存储接口
pub trait SessionStore: Send + Sync {
    /// 读取并校验；没有保存过会话时返回 `Ok(None)`
    fn load(&self) -> Result<Option<Session>, SessionError>;
    fn save(&self, session: &Session) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// JSON 文件存储
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        Session::parse(&raw).map(Some)
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let raw = serde_json::to_string_pretty(session).map_err(|e| SessionError::Corrupted {
            reason: e.to_string(),
        })?;
        std::fs::write(&self.path, raw).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// 内存存储，保存原始文本
#[derive(Default)]
pub struct MemorySessionStore {
    raw: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置任意文本（可以是损坏的数据）
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot().clone()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.raw.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        self.slot().as_deref().map(Session::parse).transpose()
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let raw = serde_json::to_string(session).map_err(|e| SessionError::Corrupted {
            reason: e.to_string(),
        })?;
        *self.slot() = Some(raw);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            token: "jwt-abc".to_string(),
            user: AuthUser {
                id: 7,
                username: "marta".to_string(),
                email: "marta@example.com".to_string(),
                provider: Some("local".to_string()),
                confirmed: true,
                blocked: false,
                avatar: None,
            },
        }
    }

    #[test]
    fn test_file_store_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.load().unwrap(), None);
        store.save(&session()).unwrap();
        assert_eq!(store.load().unwrap(), Some(session()));

        store.clear().unwrap();
        assert!(!store.path().exists());
        // 重复清除不报错
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupted_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{\"token\": \"abc\", \"user\": ").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(matches!(store.load(), Err(SessionError::Corrupted { .. })));
    }

    #[test]
    fn test_empty_token_is_corrupted() {
        let store = MemorySessionStore::with_raw(
            r#"{"token":"  ","user":{"id":1,"username":"x"}}"#,
        );
        assert!(matches!(store.load(), Err(SessionError::Corrupted { .. })));
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load().unwrap(), None);
        store.save(&session()).unwrap();
        assert_eq!(store.load().unwrap().map(|s| s.user.id), Some(7));
        store.clear().unwrap();
        assert_eq!(store.raw(), None);
    }
}
