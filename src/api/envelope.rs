//! 响应信封解析
//!
//! 成功：`{ "data": ... }`；失败：`{ "error": { status, name, message, details } }`；
//! 上传接口直接返回文件数组

use crate::error::{ApiError, AppError, AppResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// 单条记录信封
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// 上传成功后的文件
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedFile {
    pub id: u64,
    #[serde(default)]
    pub url: String,
}

pub fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> AppResult<T> {
    serde_json::from_str(body).map_err(|e| AppError::json_parse_failed(endpoint, e))
}

pub fn decode_data<T: DeserializeOwned>(endpoint: &str, body: &str) -> AppResult<T> {
    decode::<DataEnvelope<T>>(endpoint, body).map(|envelope| envelope.data)
}

/// 提取错误信封中的提示信息
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|message| !message.is_empty())
}

/// 上传接口返回数组，取第一个文件
pub fn parse_upload_response(endpoint: &str, body: &str) -> AppResult<UploadedFile> {
    let files: Vec<UploadedFile> = decode(endpoint, body)?;
    files.into_iter().next().ok_or_else(|| {
        AppError::Api(ApiError::EmptyResponse {
            endpoint: endpoint.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;

    #[test]
    fn test_error_message_from_envelope() {
        let body = r#"{"data":null,"error":{"status":400,"name":"ValidationError","message":"Invalid identifier or password","details":{}}}"#;
        assert_eq!(
            error_message(body).as_deref(),
            Some("Invalid identifier or password")
        );
        assert_eq!(error_message("<html>Bad Gateway</html>"), None);
        assert_eq!(error_message(r#"{"error":{"message":""}}"#), None);
    }

    #[test]
    fn test_upload_takes_first_file() {
        let body = r#"[{"id":41,"name":"a.jpg","url":"/uploads/a.jpg"},{"id":42,"url":"/uploads/b.jpg"}]"#;
        let file = parse_upload_response("api/upload", body).unwrap();
        assert_eq!(file, UploadedFile { id: 41, url: "/uploads/a.jpg".to_string() });
    }

    #[test]
    fn test_upload_empty_array() {
        let err = parse_upload_response("api/upload", "[]").unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::EmptyResponse { .. })));
    }

    #[test]
    fn test_decode_data_record() {
        let item: Item =
            decode_data("api/items", r#"{"data":{"id":5,"documentId":"abc","Name":"Hammer"},"meta":{}}"#)
                .unwrap();
        assert_eq!(item.id, 5);
        assert_eq!(item.name, "Hammer");

        let err = decode_data::<Item>("api/items", "not json").unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::JsonParseFailed { .. })));
    }
}
