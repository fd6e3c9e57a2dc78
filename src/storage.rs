//! Image uploads to external object storage.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    config::GithubConfig,
    error::{AppError, AppResult},
};

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `content` at `org/repo/path` and return the public URL.
    async fn upload(&self, content: Vec<u8>, org: &str, repo: &str, path: &str) -> AppResult<String>;
}

/// An image received from a multipart form, not yet validated.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    /// Lower-cased extension including the dot, if it is an accepted image type.
    pub fn validated_extension(&self) -> AppResult<String> {
        if self.content.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty.".into()));
        }
        if self.content.len() > MAX_IMAGE_BYTES {
            return Err(AppError::BadRequest("File size exceeds 5MB.".into()));
        }
        let ext = self
            .file_name
            .rfind('.')
            .map(|idx| self.file_name[idx..].to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::BadRequest(
                "Only .jpg, .jpeg, and .png are allowed.".into(),
            ));
        }
        Ok(ext)
    }

    /// Content-addressed file name: sha256 of the bytes plus the extension.
    pub fn hashed_name(&self) -> AppResult<String> {
        let ext = self.validated_extension()?;
        let digest = Sha256::digest(&self.content);
        Ok(format!("{}{}", hex::encode(digest), ext))
    }
}

pub struct GithubStorage {
    client: reqwest::Client,
    config: GithubConfig,
}

#[derive(Serialize)]
struct Committer<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct PutContent<'a> {
    message: String,
    content: String,
    committer: Committer<'a>,
}

#[derive(Deserialize)]
struct ContentInfo {
    html_url: String,
}

#[derive(Deserialize)]
struct PutContentResponse {
    content: ContentInfo,
}

impl GithubStorage {
    pub fn new(config: GithubConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent("farm-distribution-api")
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
        Ok(Self { client, config })
    }

    fn contents_url(org: &str, repo: &str, path: &str) -> String {
        format!("https://api.github.com/repos/{org}/{repo}/contents/{path}")
    }

    async fn existing_url(&self, token: &str, url: &str) -> AppResult<String> {
        let info: ContentInfo = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::Storage(e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;
        Ok(info.html_url)
    }
}

#[async_trait]
impl ObjectStorage for GithubStorage {
    async fn upload(&self, content: Vec<u8>, org: &str, repo: &str, path: &str) -> AppResult<String> {
        let token = self
            .config
            .token
            .as_deref()
            .ok_or_else(|| AppError::Storage("GITHUB_TOKEN is not set".into()))?;
        let url = Self::contents_url(org, repo, path);
        let body = PutContent {
            message: format!("Upload {path}"),
            content: STANDARD.encode(&content),
            committer: Committer {
                name: &self.config.author_name,
                email: &self.config.author_email,
            },
        };

        let response = self
            .client
            .put(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        // Names are content hashes, so an existing file already holds these bytes.
        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            tracing::debug!(path, "file already stored, reusing");
            return self.existing_url(token, &url).await;
        }

        let created: PutContentResponse = response
            .error_for_status()
            .map_err(|e| AppError::Storage(e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        tracing::info!(org, repo, path, "image uploaded");
        Ok(created.content.html_url)
    }
}

/// Keeps uploads in memory. Used by tests and local runs without a token.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(&self, content: Vec<u8>, org: &str, repo: &str, path: &str) -> AppResult<String> {
        let key = format!("{org}/{repo}/{path}");
        self.objects
            .lock()
            .map_err(|_| AppError::Storage("storage lock poisoned".into()))?
            .insert(key.clone(), content);
        Ok(format!("memory://{key}"))
    }
}
