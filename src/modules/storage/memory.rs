//! In-memory object storage for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ObjectStorage, StoredObject};
use crate::core::error::AppError;

#[derive(Default)]
pub struct InMemoryStorage {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_uploads: AtomicBool,
    /// Uploads never complete
    pub hang_uploads: AtomicBool,
    /// Every call, successful or not
    pub calls: AtomicUsize,
}

impl InMemoryStorage {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn put_public(
        &self,
        path: &str,
        data: &[u8],
        _content_type: &str,
    ) -> Result<StoredObject, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_uploads.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::ExternalServiceError(
                "Storage rejected the upload".to_string(),
            ));
        }

        let key = format!("public/{}", path);
        self.objects
            .lock()
            .unwrap()
            .insert(key.clone(), data.to_vec());

        Ok(StoredObject {
            url: format!("http://storage.test/report-photos/{}", key),
            key,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}
