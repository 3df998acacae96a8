use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::{ImageStore, ImageUpload, StorageError};
use crate::config::AssetHostConfig;

/// Uploads images to a Cloudinary-compatible asset host using signed requests.
#[derive(Debug, Clone)]
pub struct RemoteImageStore {
    http: reqwest::Client,
    host: AssetHostConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl RemoteImageStore {
    #[must_use]
    pub fn new(host: AssetHostConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            host,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{action}",
            self.host.base_url.trim_end_matches('/'),
            self.host.cloud_name
        )
    }

    /// Sign request parameters: hex SHA-256 of `k1=v1&k2=v2...` (keys sorted) followed by
    /// the API secret.
    #[must_use]
    pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);

        let joined = sorted
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        hasher.update(api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Recover the host's public id from a delivery URL such as
    /// `https://res.host.com/<cloud>/image/upload/v1712/<folder>/<id>.png`.
    #[must_use]
    pub fn public_id_from_url(image_url: &str) -> Option<String> {
        let (_, rest) = image_url.split_once("/upload/")?;
        let rest = rest.split(['?', '#']).next().unwrap_or(rest);

        let mut segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        if segments.first().is_some_and(|s| is_version_segment(s)) {
            segments.remove(0);
        }

        let last = segments.pop()?;
        let stem = last.rsplit_once('.').map_or(last, |(stem, _)| stem);
        if stem.is_empty() {
            return None;
        }
        segments.push(stem);
        Some(segments.join("/"))
    }

    fn signed_params(
        &self,
        mut params: Vec<(&'static str, String)>,
    ) -> Vec<(&'static str, String)> {
        params.push(("timestamp", chrono::Utc::now().timestamp().to_string()));
        let signature = Self::sign(&params, &self.host.api_secret);
        params.push(("signature", signature));
        params.push(("signature_algorithm", "sha256".to_string()));
        params.push(("api_key", self.host.api_key.clone()));
        params
    }

    async fn rejected(response: reqwest::Response) -> StorageError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        StorageError::Rejected { status, message }
    }
}

/// Client-declared content types that do not parse are dropped; the host sniffs the bytes.
fn usable_content_type(content_type: Option<&str>) -> Option<&str> {
    content_type.filter(|ct| Part::text("").mime_str(ct).is_ok())
}

/// Delivery URLs may carry a `v<digits>` cache-busting segment before the public id.
fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

#[async_trait]
impl ImageStore for RemoteImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<String, StorageError> {
        let mut params = vec![("public_id", Uuid::new_v4().to_string())];
        if let Some(folder) = &self.host.folder {
            params.push(("folder", folder.clone()));
        }

        let file_name = format!("upload{}", upload.extension());
        let mut file = Part::bytes(upload.data).file_name(file_name);
        if let Some(content_type) = usable_content_type(upload.content_type.as_deref()) {
            file = file.mime_str(content_type)?;
        }

        let form = self
            .signed_params(params)
            .into_iter()
            .fold(Form::new().part("file", file), |form, (key, value)| {
                form.text(key, value)
            });

        let response = self
            .http
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let body: UploadResponse = response.json().await?;
        tracing::debug!(url = %body.secure_url, "Uploaded image to asset host");
        Ok(body.secure_url)
    }

    async fn remove(&self, image_url: &str) -> Result<(), StorageError> {
        let public_id = Self::public_id_from_url(image_url)
            .ok_or_else(|| StorageError::ForeignUrl(image_url.to_string()))?;

        let params = self.signed_params(vec![("public_id", public_id)]);
        let response = self
            .http
            .post(self.endpoint("destroy"))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let body: DestroyResponse = response.json().await?;
        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(StorageError::Rejected {
                status: 200,
                message: other.to_string(),
            }),
        }
    }

    fn kind(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_sorts_keys() {
        let secret = "abcd";
        let forward = RemoteImageStore::sign(
            &[
                ("public_id", "x".to_string()),
                ("timestamp", "1700000000".to_string()),
            ],
            secret,
        );
        let reversed = RemoteImageStore::sign(
            &[
                ("timestamp", "1700000000".to_string()),
                ("public_id", "x".to_string()),
            ],
            secret,
        );
        assert_eq!(forward, reversed);

        let mut hasher = Sha256::new();
        hasher.update(b"public_id=x&timestamp=1700000000abcd");
        assert_eq!(forward, hex::encode(hasher.finalize()));
    }

    #[test]
    fn test_usable_content_type() {
        assert_eq!(usable_content_type(Some("image/png")), Some("image/png"));
        assert_eq!(usable_content_type(Some("not a mime")), None);
        assert_eq!(usable_content_type(Some("")), None);
        assert_eq!(usable_content_type(None), None);
    }

    #[test]
    fn test_public_id_from_url() {
        assert_eq!(
            RemoteImageStore::public_id_from_url(
                "https://res.example.com/demo/image/upload/v1712345/games/abc-123.png"
            )
            .as_deref(),
            Some("games/abc-123")
        );
        assert_eq!(
            RemoteImageStore::public_id_from_url(
                "https://res.example.com/demo/image/upload/abc.jpg?x=1"
            )
            .as_deref(),
            Some("abc")
        );
        assert_eq!(
            RemoteImageStore::public_id_from_url("/uploads/abc.png"),
            None
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let store = RemoteImageStore::new(AssetHostConfig {
            base_url: "http://127.0.0.1:9000/".to_string(),
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            folder: None,
        });
        assert_eq!(
            store.endpoint("upload"),
            "http://127.0.0.1:9000/v1_1/demo/image/upload"
        );
    }
}
