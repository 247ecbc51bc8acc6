//! Almacenamiento de objetos
//!
//! Subida de blobs (firmas, fotos de carga) de solo escritura. Las rutas tienen la
//! forma `{company_id}/{unix_millis}_{label}.{ext}`.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::environment::{EnvironmentConfig, StorageBackend};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("ruta de objeto inválida: {0}")]
    InvalidPath(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("el storage rechazó la subida ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError>;
}

/// Ruta de un objeto de evidencia
pub fn object_path(company_id: Uuid, unix_millis: i64, label: &str, extension: &str) -> String {
    format!("{}/{}_{}.{}", company_id, unix_millis, label, extension)
}

fn validate_relative(path: &str) -> Result<&Path, StorageError> {
    let candidate = Path::new(path);
    let safe = !path.is_empty()
        && candidate
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if safe {
        Ok(candidate)
    } else {
        Err(StorageError::InvalidPath(path.to_string()))
    }
}

/// Storage en disco local (desarrollo)
pub struct LocalDiskStorage {
    root: PathBuf,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStorage for LocalDiskStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> Result<(), StorageError> {
        let target = self.root.join(validate_relative(path)?);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        debug!("💾 Objeto guardado en {}", target.display());
        Ok(())
    }
}

/// Storage remoto por HTTP (`POST {base}/storage/v1/object/{bucket}/{path}`)
pub struct HttpObjectStorage {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    api_key: String,
}

impl HttpObjectStorage {
    pub fn new(base_url: String, bucket: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket,
            api_key,
        }
    }

    pub fn object_url(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            urlencoding::encode(&self.bucket),
            encoded.join("/")
        )
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        validate_relative(path)?;
        let url = self.object_url(path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        debug!("📤 Objeto subido a {}", url);
        Ok(())
    }
}

/// Construir el storage configurado
pub fn storage_from_config(config: &EnvironmentConfig) -> Box<dyn ObjectStorage> {
    match &config.storage {
        StorageBackend::Local { root } => {
            info!("📁 Storage local en {}", root.display());
            Box::new(LocalDiskStorage::new(root.join(&config.signature_bucket)))
        }
        StorageBackend::Http { base_url, api_key } => {
            info!("☁️ Storage HTTP en {}", base_url);
            Box::new(HttpObjectStorage::new(
                base_url.clone(),
                config.signature_bucket.clone(),
                api_key.clone(),
            ))
        }
    }
}
