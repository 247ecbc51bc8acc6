//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;

/// Backend de almacenamiento de objetos (firmas, fotos de carga)
#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Local { root: PathBuf },
    Http { base_url: String, api_key: String },
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub storage: StorageBackend,
    pub signature_bucket: String,
    pub draft_ttl_minutes: i64,
    pub run_migrations: bool,
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        let draft_ttl_minutes =
            parse_draft_ttl(&env::var("DRAFT_TTL_MINUTES").unwrap_or_else(|_| "240".to_string()))?;

        let run_migrations = env::var("RUN_MIGRATIONS")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let storage = match env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".to_string()).as_str() {
            "local" => StorageBackend::Local {
                root: PathBuf::from(
                    env::var("STORAGE_LOCAL_ROOT").unwrap_or_else(|_| "./storage".to_string()),
                ),
            },
            "http" => StorageBackend::Http {
                base_url: env::var("STORAGE_URL").context("STORAGE_URL must be set for http storage")?,
                api_key: env::var("STORAGE_API_KEY")
                    .context("STORAGE_API_KEY must be set for http storage")?,
            },
            other => return Err(anyhow!("STORAGE_BACKEND desconocido: {}", other)),
        };

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret,
            cors_origins: parse_origins(&env::var("CORS_ORIGINS").unwrap_or_default()),
            storage,
            signature_bucket: env::var("SIGNATURE_BUCKET").unwrap_or_else(|_| "signatures".to_string()),
            draft_ttl_minutes,
            run_migrations,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// TTL de borradores en minutos; un valor no positivo purgaría todos los borradores
fn parse_draft_ttl(raw: &str) -> Result<i64> {
    let minutes: i64 = raw
        .trim()
        .parse()
        .context("DRAFT_TTL_MINUTES must be a valid number")?;
    if minutes <= 0 {
        return Err(anyhow!("DRAFT_TTL_MINUTES debe ser mayor que cero: {}", minutes));
    }
    Ok(minutes)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
