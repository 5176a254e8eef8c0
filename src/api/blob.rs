//! 待上传的图片

use crate::error::{AppError, AppResult};
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_BLOB_ID: AtomicU64 = AtomicU64::new(1);

/// 图片身份标识，每次选择图片都会分配新的标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobId(u64);

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob#{}", self.0)
    }
}

/// 用户选择的图片
///
/// 以 [`BlobId`] 判等：即使内容相同，两次选择也是两张不同的图片
#[derive(Clone)]
pub struct PhotoBlob {
    id: BlobId,
    file_name: String,
    content_type: String,
    bytes: Arc<[u8]>,
}

impl PhotoBlob {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            id: BlobId(NEXT_BLOB_ID.fetch_add(1, Ordering::Relaxed)),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: Arc::from(bytes),
        }
    }

    /// 从磁盘读取图片，按扩展名推断 MIME 类型
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo".to_string());
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn id(&self) -> BlobId {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl PartialEq for PhotoBlob {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PhotoBlob {}

impl fmt::Debug for PhotoBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoBlob")
            .field("id", &self.id)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_identity_not_content() {
        let a = PhotoBlob::new("a.jpg", "image/jpeg", vec![1, 2, 3]);
        let b = PhotoBlob::new("a.jpg", "image/jpeg", vec![1, 2, 3]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert!(a.id() < b.id());
    }

    #[tokio::test]
    async fn test_from_path_guesses_mime() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

        let blob = PhotoBlob::from_path(file.path()).await.unwrap();
        assert_eq!(blob.content_type(), "image/png");
        assert_eq!(blob.len(), 4);
        assert!(blob.file_name().ends_with(".png"));
    }

    #[test]
    fn test_from_missing_path_is_file_error() {
        let err = tokio_test::block_on(PhotoBlob::from_path("/definitely/not/here.jpg")).unwrap_err();
        assert!(matches!(err, AppError::File(_)));
    }
}
