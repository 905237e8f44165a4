//! Project image store: local blobs plus signed, time-limited URLs.
//!
//! Blobs live under `{root}/{company_id}/{project_id}/{kind}/{image_id}.{ext}`
//! with a metadata row in `project_images`. Saving is two steps; if the row
//! insert fails the written blob is removed so the store and the table stay
//! consistent.

use std::path::{Path, PathBuf};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use db::models::project_image::{ImageKind, ProjectImage};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid file extension: {0}")]
    InvalidExtension(String),
    #[error("invalid download token")]
    InvalidToken,
    #[error("download token expired")]
    TokenExpired,
}

#[derive(Clone)]
pub struct ImageStore {
    root: PathBuf,
    signing_key: Vec<u8>,
    url_ttl: Duration,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, signing_key: impl Into<Vec<u8>>) -> Self {
        Self {
            root: root.into(),
            signing_key: signing_key.into(),
            url_ttl: Duration::minutes(15),
        }
    }

    pub fn with_url_ttl(mut self, ttl: Duration) -> Self {
        self.url_ttl = ttl;
        self
    }

    fn blob_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write the blob and insert its metadata row. The blob is removed if
    /// the insert fails.
    pub async fn save(
        &self,
        pool: &SqlitePool,
        company_id: Uuid,
        project_id: Uuid,
        kind: ImageKind,
        ext: &str,
        bytes: &[u8],
    ) -> Result<ProjectImage, StorageError> {
        if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(StorageError::InvalidExtension(ext.to_string()));
        }

        let id = Uuid::new_v4();
        let relative = format!("{company_id}/{project_id}/{kind}/{id}.{ext}");
        let path = self.blob_path(&relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        match ProjectImage::create(pool, id, company_id, project_id, kind, ext, bytes.len() as i64)
            .await
        {
            Ok(image) => {
                info!(image_id = %image.id, path = %relative, "Stored project image");
                Ok(image)
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                    warn!(path = %relative, error = %cleanup, "Failed to remove orphaned blob");
                }
                Err(e.into())
            }
        }
    }

    /// Delete the metadata row and the blob. A missing blob is not an error;
    /// the row is authoritative.
    pub async fn delete(&self, pool: &SqlitePool, image: &ProjectImage) -> Result<(), StorageError> {
        ProjectImage::delete(pool, image.id).await?;
        let path = self.blob_path(&image.storage_path());
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(image_id = %image.id, error = %e, "Failed to remove blob");
            }
        }
        Ok(())
    }

    pub async fn read(&self, relative: &str) -> Result<Vec<u8>, StorageError> {
        Ok(tokio::fs::read(self.blob_path(relative)).await?)
    }

    /// Signed download token for an image, valid for the store's TTL.
    pub fn token_for(&self, image: &ProjectImage, now: DateTime<Utc>) -> String {
        let expires_at = (now + self.url_ttl).timestamp();
        self.sign(&image.storage_path(), expires_at)
    }

    fn sign(&self, relative: &str, expires_at: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.signing_key)
            .expect("HMAC can take key of any size");
        mac.update(format!("{relative}|{expires_at}").as_bytes());
        let sig = mac.finalize().into_bytes();
        format!(
            "{}.{expires_at}.{}",
            URL_SAFE_NO_PAD.encode(relative),
            URL_SAFE_NO_PAD.encode(sig)
        )
    }

    /// Verify a token and return the blob path it grants access to.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<String, StorageError> {
        let mut parts = token.splitn(3, '.');
        let (path_b64, expires_str, sig_b64) = match (parts.next(), parts.next(), parts.next()) {
            (Some(p), Some(e), Some(s)) => (p, e, s),
            _ => return Err(StorageError::InvalidToken),
        };

        let path_bytes = URL_SAFE_NO_PAD
            .decode(path_b64)
            .map_err(|_| StorageError::InvalidToken)?;
        let relative =
            String::from_utf8(path_bytes).map_err(|_| StorageError::InvalidToken)?;
        let expires_at: i64 = expires_str.parse().map_err(|_| StorageError::InvalidToken)?;
        let sig = URL_SAFE_NO_PAD
            .decode(sig_b64)
            .map_err(|_| StorageError::InvalidToken)?;

        let mut mac = HmacSha256::new_from_slice(&self.signing_key)
            .expect("HMAC can take key of any size");
        mac.update(format!("{relative}|{expires_at}").as_bytes());
        mac.verify_slice(&sig).map_err(|_| StorageError::InvalidToken)?;

        if now.timestamp() > expires_at {
            return Err(StorageError::TokenExpired);
        }

        // Paths are built from UUIDs and validated extensions; reject
        // anything that could climb out of the root anyway.
        if relative.contains("..") || Path::new(&relative).is_absolute() {
            return Err(StorageError::InvalidToken);
        }
        Ok(relative)
    }
}

#[cfg(test)]
mod tests {
    use db::{
        DBService,
        models::{
            client::{Client, CreateClient},
            company::{Company, CreateCompany},
            project::{CreateProject, Project},
        },
    };
    use tempfile::tempdir;

    use super::*;

    async fn setup_project(db: &DBService) -> (Uuid, Uuid) {
        let company = Company::create(
            &db.pool,
            &CreateCompany {
                name: "Co".to_string(),
            },
        )
        .await
        .expect("company");
        let client = Client::create(
            &db.pool,
            &CreateClient {
                company_id: company.id,
                name: "Client".to_string(),
                email: None,
                phone: None,
                notes: None,
            },
        )
        .await
        .expect("client");
        let project = Project::create(
            &db.pool,
            &CreateProject {
                company_id: company.id,
                client_id: client.id,
                property_id: None,
                name: "Job".to_string(),
                status: None,
            },
        )
        .await
        .expect("project");
        (company.id, project.id)
    }

    #[tokio::test]
    async fn save_writes_blob_under_path_convention() {
        let db = DBService::new_in_memory().await.expect("db");
        let (company_id, project_id) = setup_project(&db).await;
        let dir = tempdir().expect("tempdir");
        let store = ImageStore::new(dir.path(), "test-key");

        let image = store
            .save(
                &db.pool,
                company_id,
                project_id,
                ImageKind::Before,
                "jpg",
                b"not really a jpeg",
            )
            .await
            .expect("save");

        let expected = dir.path().join(format!(
            "{company_id}/{project_id}/before/{}.jpg",
            image.id
        ));
        assert!(expected.exists());
        assert_eq!(image.byte_size, 17);

        let bytes = store.read(&image.storage_path()).await.expect("read");
        assert_eq!(bytes, b"not really a jpeg");
    }

    #[tokio::test]
    async fn failed_insert_removes_blob() {
        let db = DBService::new_in_memory().await.expect("db");
        let (company_id, _project_id) = setup_project(&db).await;
        let dir = tempdir().expect("tempdir");
        let store = ImageStore::new(dir.path(), "test-key");

        // Nonexistent project violates the foreign key; the insert fails
        // after the blob was written.
        let missing_project = Uuid::new_v4();
        let result = store
            .save(
                &db.pool,
                company_id,
                missing_project,
                ImageKind::After,
                "png",
                b"bytes",
            )
            .await;
        assert!(result.is_err());

        let kind_dir = dir
            .path()
            .join(format!("{company_id}/{missing_project}/after"));
        let leftover = std::fs::read_dir(&kind_dir)
            .map(|entries| entries.count())
            .unwrap_or(0);
        assert_eq!(leftover, 0);
    }

    #[tokio::test]
    async fn rejects_bad_extension() {
        let db = DBService::new_in_memory().await.expect("db");
        let (company_id, project_id) = setup_project(&db).await;
        let dir = tempdir().expect("tempdir");
        let store = ImageStore::new(dir.path(), "test-key");

        let err = store
            .save(
                &db.pool,
                company_id,
                project_id,
                ImageKind::Before,
                "j/pg",
                b"x",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidExtension(_)));
    }

    #[test]
    fn token_round_trips_and_expires() {
        let store = ImageStore::new("/tmp/unused", "secret").with_url_ttl(Duration::minutes(5));
        let relative = "a/b/before/c.jpg";
        let now = Utc::now();

        let token = store.sign(relative, (now + Duration::minutes(5)).timestamp());
        assert_eq!(store.verify(&token, now).expect("valid"), relative);

        let later = now + Duration::minutes(6);
        assert!(matches!(
            store.verify(&token, later),
            Err(StorageError::TokenExpired)
        ));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let store = ImageStore::new("/tmp/unused", "secret");
        let token = store.sign("a/b/before/c.jpg", Utc::now().timestamp() + 600);

        let mut tampered = token.clone();
        tampered.replace_range(0..4, "AAAA");
        assert!(matches!(
            store.verify(&tampered, Utc::now()),
            Err(StorageError::InvalidToken)
        ));

        let other_key = ImageStore::new("/tmp/unused", "different");
        assert!(matches!(
            other_key.verify(&token, Utc::now()),
            Err(StorageError::InvalidToken)
        ));
    }
}
