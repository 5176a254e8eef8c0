//! REST API 客户端
//!
//! 封装所有与后端 HTTP 接口相关的调用逻辑

use super::envelope::{self, UploadedFile};
use super::{AuthResponse, Collection, ListQuery, PhotoBlob, RecordPayload, RemoteApi};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::Paginated;
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::RwLock;
use tracing::{debug, warn};

/// 基于 reqwest 的后端客户端
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl RestClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::api_request_failed(&config.api_base_url, e))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.current_token().is_some()
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    fn current_token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// 附加 Bearer 凭证（如果已登录）
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.current_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// 发送请求并返回响应体文本
    ///
    /// 非 2xx 响应会解析错误信封，服务端的提示信息作为错误消息
    async fn send(&self, endpoint: &str, request: RequestBuilder) -> AppResult<String> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        if !status.is_success() {
            let message = envelope::error_message(&body)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            warn!("请求失败 {} [{}]: {}", endpoint, status.as_u16(), message);
            return Err(AppError::bad_response(endpoint, status.as_u16(), message));
        }

        debug!("请求成功 {} [{}], 响应长度: {}", endpoint, status.as_u16(), body.len());
        Ok(body)
    }
}

impl RemoteApi for RestClient {
    async fn login(&self, identifier: &str, password: &str) -> AppResult<AuthResponse> {
        let endpoint = "api/auth/local";
        debug!("登录: {}", identifier);

        let request = self.http.post(self.url(endpoint)).json(&json!({
            "identifier": identifier,
            "password": password,
        }));
        let body = self.send(endpoint, request).await?;
        envelope::decode(endpoint, &body)
    }

    fn set_bearer_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    async fn create_record<T>(&self, collection: Collection, payload: &RecordPayload) -> AppResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let endpoint = format!("api/{}", collection.path());
        let body = json!({ "data": payload });
        debug!("创建记录 Payload: {}", body);

        let request = self.http.post(self.url(&endpoint)).json(&body);
        let response = self.send(&endpoint, request).await?;
        envelope::decode_data(&endpoint, &response)
    }

    async fn upload_binary(&self, blob: &PhotoBlob) -> AppResult<UploadedFile> {
        let endpoint = "api/upload";
        debug!("上传图片 {} ({} 字节)", blob.file_name(), blob.len());

        let part = Part::bytes(blob.bytes().to_vec())
            .file_name(blob.file_name().to_string())
            .mime_str(blob.content_type())
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;
        let form = Form::new().part("files", part);

        let request = self.http.post(self.url(endpoint)).multipart(form);
        let response = self.send(endpoint, request).await?;
        envelope::parse_upload_response(endpoint, &response)
    }

    async fn list_records<T>(&self, collection: Collection, query: &ListQuery) -> AppResult<Paginated<T>>
    where
        T: DeserializeOwned + Send,
    {
        let endpoint = format!("api/{}", collection.path());
        let request = self
            .http
            .get(self.url(&endpoint))
            .query(&query.to_query_pairs());
        let response = self.send(&endpoint, request).await?;
        envelope::decode(&endpoint, &response)
    }

    async fn get_record<T>(&self, collection: Collection, document_id: &str) -> AppResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let endpoint = format!("api/{}/{}", collection.path(), document_id);
        let request = self
            .http
            .get(self.url(&endpoint))
            .query(&[("populate", "*")]);
        let response = self.send(&endpoint, request).await?;
        envelope::decode_data(&endpoint, &response)
    }

    async fn delete_record(&self, collection: Collection, document_id: &str) -> AppResult<()> {
        let endpoint = format!("api/{}/{}", collection.path(), document_id);
        let request = self.http.delete(self.url(&endpoint));
        self.send(&endpoint, request).await?;
        Ok(())
    }
}
