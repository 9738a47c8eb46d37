use std::path::PathBuf;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

use super::error::StorageError;
use super::hash::ContentHash;
use super::traits::{BlobStore, BoxReader};

/// Filesystem-backed photo store.
///
/// Blobs live in a Git-style sharded layout:
/// `{root}/{first 2 hex chars}/{remaining 62 hex chars}`.
/// Writes go through a temp file and finish with an atomic rename, so a
/// crashed upload never leaves a partial blob at its final path.
pub struct FilesystemBlobStore {
    root: PathBuf,
    max_size: u64,
}

impl FilesystemBlobStore {
    pub async fn new(root: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self { root, max_size })
    }

    fn blob_path(&self, hash: &ContentHash) -> PathBuf {
        self.root.join(hash.shard_prefix()).join(hash.shard_suffix())
    }

    fn temp_path(&self) -> PathBuf {
        self.root.join(".tmp").join(uuid::Uuid::new_v4().to_string())
    }

    async fn commit_temp(
        &self,
        temp_path: &PathBuf,
        hash: &ContentHash,
    ) -> Result<(), StorageError> {
        let blob_path = self.blob_path(hash);

        if blob_path.exists() {
            // Identical content already stored.
            let _ = fs::remove_file(temp_path).await;
            return Ok(());
        }

        if let Some(parent) = blob_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(temp_path, &blob_path).await {
            let _ = fs::remove_file(temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put_stream(&self, mut reader: BoxReader) -> Result<ContentHash, StorageError> {
        let temp_path = self.temp_path();
        let mut hasher = Sha256::new();
        let mut total: u64 = 0;

        let mut buf = vec![0u8; 64 * 1024];
        let mut temp_file = fs::File::create(&temp_path).await?;

        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }

            total += n as u64;
            if total > self.max_size {
                drop(temp_file);
                let _ = fs::remove_file(&temp_path).await;
                return Err(StorageError::SizeLimitExceeded {
                    actual: total,
                    limit: self.max_size,
                });
            }

            hasher.update(&buf[..n]);
            temp_file.write_all(&buf[..n]).await?;
        }

        temp_file.flush().await?;
        drop(temp_file);

        let hash = ContentHash::from_bytes(hasher.finalize().into());
        self.commit_temp(&temp_path, &hash).await?;

        Ok(hash)
    }

    async fn get_stream(&self, hash: &ContentHash) -> Result<BoxReader, StorageError> {
        let path = self.blob_path(hash);
        match fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(hash.to_hex()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, hash: &ContentHash) -> Result<bool, StorageError> {
        Ok(self.blob_path(hash).exists())
    }

    async fn size(&self, hash: &ContentHash) -> Result<u64, StorageError> {
        let path = self.blob_path(hash);
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(hash.to_hex()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
