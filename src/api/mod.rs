//! API 模块
//!
//! 负责所有与后端（通用 CRUD + 鉴权服务）的交互。
//! 上层只依赖 [`RemoteApi`] 这一接口，具体实现为基于 reqwest 的 [`RestClient`]

pub mod blob;
pub mod envelope;
pub mod query;
pub mod rest_client;

pub use blob::{BlobId, PhotoBlob};
pub use envelope::UploadedFile;
pub use query::ListQuery;
pub use rest_client::RestClient;

use crate::error::AppResult;
use crate::models::{AuthUser, Paginated};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;

/// 后端的记录集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Items,
    ItemTypes,
}

impl Collection {
    pub fn path(self) -> &'static str {
        match self {
            Collection::Items => "items",
            Collection::ItemTypes => "item-types",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// 创建记录的字段表
///
/// 未设置的可选字段直接省略，而不是发送 `null`，避免覆盖后端默认值
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordPayload(Map<String, Value>);

impl RecordPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn set_opt<V: Into<Value>>(&mut self, field: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.0.insert(field.to_string(), value.into());
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// 登录接口的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub jwt: String,
    pub user: AuthUser,
}

/// 远端 API 接口
///
/// 所有方法只描述请求/响应契约；超时与重试交给传输层
pub trait RemoteApi: Send + Sync {
    /// 账号密码登录
    fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> impl Future<Output = AppResult<AuthResponse>> + Send;

    /// 设置（或清除）之后所有请求携带的 Bearer 凭证
    fn set_bearer_token(&self, token: Option<String>);

    fn create_record<T>(
        &self,
        collection: Collection,
        payload: &RecordPayload,
    ) -> impl Future<Output = AppResult<T>> + Send
    where
        T: DeserializeOwned + Send;

    /// multipart 上传，返回可写入记录的文件 id
    fn upload_binary(&self, blob: &PhotoBlob) -> impl Future<Output = AppResult<UploadedFile>> + Send;

    fn list_records<T>(
        &self,
        collection: Collection,
        query: &ListQuery,
    ) -> impl Future<Output = AppResult<Paginated<T>>> + Send
    where
        T: DeserializeOwned + Send;

    fn get_record<T>(
        &self,
        collection: Collection,
        document_id: &str,
    ) -> impl Future<Output = AppResult<T>> + Send
    where
        T: DeserializeOwned + Send;

    fn delete_record(
        &self,
        collection: Collection,
        document_id: &str,
    ) -> impl Future<Output = AppResult<()>> + Send;
}
