//! 测试用的内存后端
#![allow(dead_code)]

use inventory_client::api::{
    AuthResponse, Collection, ListQuery, PhotoBlob, RecordPayload, RemoteApi, UploadedFile,
};
use inventory_client::models::{AuthUser, Paginated};
use inventory_client::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub const PASSWORD: &str = "secret";

/// 记录所有请求的假后端
///
/// 上传和创建可以用闸门挂起，测试决定何时放行
#[derive(Default)]
pub struct FakeApi {
    uploads: Mutex<Vec<String>>,
    creates: Mutex<Vec<Value>>,
    tokens: Mutex<Vec<Option<String>>>,
    queries: Mutex<Vec<(Collection, Vec<(String, String)>)>>,
    deletes: Mutex<Vec<String>>,
    upload_gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    create_gate: Mutex<Option<oneshot::Receiver<()>>>,
    upload_ids: Mutex<HashMap<String, u64>>,
    failing_uploads: Mutex<HashSet<String>>,
    create_error: Mutex<Option<(u16, String)>>,
    items: Mutex<Vec<Value>>,
    item_types: Mutex<Vec<Value>>,
    next_id: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap()
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_items(items: Vec<Value>) -> Arc<Self> {
        let api = Self::default();
        *lock(&api.items) = items;
        Arc::new(api)
    }

    pub fn set_item_types(&self, item_types: Vec<Value>) {
        *lock(&self.item_types) = item_types;
    }

    /// 挂起指定文件名的上传，直到返回的发送端被触发
    pub fn gate_upload(&self, file_name: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        lock(&self.upload_gates).insert(file_name.to_string(), rx);
        tx
    }

    /// 挂起下一次创建请求
    pub fn gate_create(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *lock(&self.create_gate) = Some(rx);
        tx
    }

    pub fn set_upload_id(&self, file_name: &str, id: u64) {
        lock(&self.upload_ids).insert(file_name.to_string(), id);
    }

    pub fn fail_upload(&self, file_name: &str) {
        lock(&self.failing_uploads).insert(file_name.to_string());
    }

    pub fn fail_create(&self, status: u16, message: &str) {
        *lock(&self.create_error) = Some((status, message.to_string()));
    }

    pub fn clear_create_error(&self) {
        *lock(&self.create_error) = None;
    }

    pub fn upload_names(&self) -> Vec<String> {
        lock(&self.uploads).clone()
    }

    pub fn created_payloads(&self) -> Vec<Value> {
        lock(&self.creates).clone()
    }

    pub fn create_count(&self) -> usize {
        lock(&self.creates).len()
    }

    pub fn tokens(&self) -> Vec<Option<String>> {
        lock(&self.tokens).clone()
    }

    pub fn last_token(&self) -> Option<String> {
        lock(&self.tokens).last().cloned().flatten()
    }

    pub fn queries(&self) -> Vec<(Collection, Vec<(String, String)>)> {
        lock(&self.queries).clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        lock(&self.deletes).clone()
    }

    fn next_id(&self) -> u64 {
        100 + self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

pub fn user(id: u64, username: &str) -> AuthUser {
    AuthUser {
        id,
        username: username.to_string(),
        email: format!("{}@example.com", username),
        provider: Some("local".to_string()),
        confirmed: true,
        blocked: false,
        avatar: None,
    }
}

/// 后端格式的物品记录
pub fn item_json(id: u64, name: &str, favorited_by: &[u64]) -> Value {
    let favorited: Vec<Value> = favorited_by
        .iter()
        .map(|user_id| json!({ "id": user_id, "username": format!("user{}", user_id) }))
        .collect();
    json!({
        "id": id,
        "documentId": format!("doc-{}", id),
        "Name": name,
        "Description": format!("{} description", name),
        "Favorited": favorited,
        "Photos": null,
        "createdAt": "2024-05-01T10:00:00.000Z",
    })
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> AppResult<T> {
    serde_json::from_value(value).map_err(|e| AppError::json_parse_failed(endpoint, e))
}

impl RemoteApi for FakeApi {
    async fn login(&self, identifier: &str, password: &str) -> AppResult<AuthResponse> {
        if password != PASSWORD {
            return Err(AppError::bad_response(
                "api/auth/local",
                400,
                "Invalid identifier or password",
            ));
        }
        Ok(AuthResponse {
            jwt: format!("jwt-{}", identifier),
            user: user(7, identifier),
        })
    }

    fn set_bearer_token(&self, token: Option<String>) {
        lock(&self.tokens).push(token);
    }

    async fn create_record<T>(&self, collection: Collection, payload: &RecordPayload) -> AppResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let endpoint = format!("api/{}", collection.path());
        lock(&self.creates).push(payload.to_value());

        let gate = lock(&self.create_gate).take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let error = lock(&self.create_error).clone();
        if let Some((status, message)) = error {
            return Err(AppError::bad_response(endpoint, status, message));
        }

        let id = self.next_id();
        let mut record = json!({ "id": id, "documentId": format!("doc-{}", id) });
        for field in ["Name", "Description"] {
            if let Some(value) = payload.get(field) {
                record[field] = value.clone();
            }
        }
        decode(&endpoint, record)
    }

    async fn upload_binary(&self, blob: &PhotoBlob) -> AppResult<UploadedFile> {
        let name = blob.file_name().to_string();
        lock(&self.uploads).push(name.clone());

        let gate = lock(&self.upload_gates).remove(&name);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if lock(&self.failing_uploads).contains(&name) {
            return Err(AppError::bad_response("api/upload", 413, "File too large"));
        }
        let preset = lock(&self.upload_ids).get(&name).copied();
        let id = preset.unwrap_or_else(|| self.next_id());
        Ok(UploadedFile {
            id,
            url: format!("/uploads/{}", name),
        })
    }

    async fn list_records<T>(&self, collection: Collection, query: &ListQuery) -> AppResult<Paginated<T>>
    where
        T: DeserializeOwned + Send,
    {
        let endpoint = format!("api/{}", collection.path());
        let pairs = query.to_query_pairs();
        lock(&self.queries).push((collection, pairs.clone()));

        let source = match collection {
            Collection::Items => lock(&self.items).clone(),
            Collection::ItemTypes => lock(&self.item_types).clone(),
        };
        let favorited_filter = pairs
            .iter()
            .find(|(key, _)| key == "filters[Favorited][id][$eq]")
            .and_then(|(_, value)| value.parse::<u64>().ok());
        let matching: Vec<Value> = source
            .into_iter()
            .filter(|record| match favorited_filter {
                Some(user_id) => record["Favorited"]
                    .as_array()
                    .map(|users| users.iter().any(|u| u["id"] == json!(user_id)))
                    .unwrap_or(false),
                None => true,
            })
            .collect();

        let total = matching.len() as u64;
        let size = query.page_size as usize;
        let page_count = (matching.len() + size - 1) / size;
        let data: Vec<Value> = matching
            .into_iter()
            .skip((query.page as usize - 1) * size)
            .take(size)
            .collect();

        decode(
            &endpoint,
            json!({
                "data": data,
                "meta": { "pagination": {
                    "page": query.page,
                    "pageSize": query.page_size,
                    "pageCount": page_count,
                    "total": total,
                } },
            }),
        )
    }

    async fn get_record<T>(&self, collection: Collection, document_id: &str) -> AppResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let endpoint = format!("api/{}/{}", collection.path(), document_id);
        let found = lock(&self.items)
            .iter()
            .find(|record| record["documentId"] == json!(document_id))
            .cloned();
        match found {
            Some(record) => decode(&endpoint, record),
            None => Err(AppError::bad_response(endpoint, 404, "Not Found")),
        }
    }

    async fn delete_record(&self, collection: Collection, document_id: &str) -> AppResult<()> {
        let endpoint = format!("api/{}/{}", collection.path(), document_id);
        lock(&self.deletes).push(document_id.to_string());

        let mut items = lock(&self.items);
        let before = items.len();
        items.retain(|record| record["documentId"] != json!(document_id));
        if items.len() == before {
            return Err(AppError::bad_response(endpoint, 404, "Not Found"));
        }
        Ok(())
    }
}
