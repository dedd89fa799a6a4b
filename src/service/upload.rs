use std::future::Future;
use std::time::Duration;

use futures_util::future::{abortable, AbortHandle, Aborted};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::conf;
use crate::erx::{Erx, Layouted, ResultE};
use crate::web::client::{error_message, Client};

/// What the asset host answers for a stored file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uploaded {
    #[serde(default)]
    pub secure_url: String,
    #[serde(default)]
    pub public_id: String,
    #[serde(default)]
    pub resource_type: String,
}

/// Cancels one in-flight upload.
#[derive(Debug, Clone)]
pub struct UploadHandle {
    handle: AbortHandle,
}

impl UploadHandle {
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_aborted()
    }
}

/// Unsigned multipart uploads to the media host.
#[derive(Clone)]
pub struct MediaUploader {
    cli: reqwest::Client,
    endpoint: String,
    preset: String,
    timeout: Duration,
}

impl MediaUploader {
    pub fn new(cli: reqwest::Client, upload: &conf::Upload) -> Self {
        Self {
            cli,
            endpoint: upload.endpoint.clone(),
            preset: upload.preset.clone(),
            timeout: Duration::from_secs(upload.timeout_secs.max(1)),
        }
    }

    /// From the `upload` settings, sharing the backend client's connection
    /// pool. Fails when no media host is configured.
    pub fn from_settings(client: &Client) -> ResultE<Self> {
        Self::from_upload(client, conf::settings_snapshot().upload)
    }

    fn from_upload(client: &Client, upload: Option<conf::Upload>) -> ResultE<Self> {
        match upload {
            Some(upload) if !upload.endpoint.is_empty() => {
                Ok(Self::new(client.raw().clone(), &upload))
            },
            _ => {
                let code = Layouted::config("UPLD", "0001");
                Err(Erx::with_code(code, "upload endpoint is not configured"))
            },
        }
    }

    /// Start an upload. The future resolves with the stored file, or with a
    /// cancelled error once the handle is used.
    pub fn upload(
        &self, bytes: Vec<u8>, file_name: &str, mime: &str,
    ) -> ResultE<(UploadHandle, impl Future<Output = ResultE<Uploaded>> + Send + 'static)> {
        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| Erx::upload(&format!("invalid mime type {}: {}", mime, e)))?;
        let form = Form::new().part("file", part).text("upload_preset", self.preset.clone());
        let request = self.cli.post(&self.endpoint).timeout(self.timeout).multipart(form);

        info!("uploading {} ({} bytes) to {}", file_name, size, self.endpoint);
        let (task, handle) = abortable(async move {
            let response = request.send().await.map_err(|e| Erx::upload(&e.to_string()))?;
            let status = response.status();
            let body = response.text().await.map_err(|e| Erx::upload(&e.to_string()))?;
            if !status.is_success() {
                let mut erx = Erx::upload(&error_message(status, &body));
                erx.add_extra("STATUS", status.as_str());
                return Err(erx);
            }

            let uploaded: Uploaded = serde_json::from_str(&body)?;
            if uploaded.secure_url.is_empty() {
                return Err(Erx::upload("upload response has no secure_url"));
            }
            Ok(uploaded)
        });

        let name = file_name.to_string();
        let future = async move {
            match task.await {
                Ok(result) => result,
                Err(Aborted) => {
                    warn!("upload of {} cancelled", name);
                    Err(Erx::cancelled())
                },
            }
        };

        Ok((UploadHandle { handle }, future))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(endpoint: &str) -> conf::Upload {
        conf::Upload { endpoint: endpoint.into(), preset: "courses".into(), timeout_secs: 5 }
    }

    fn uploader() -> MediaUploader {
        MediaUploader::new(reqwest::Client::new(), &settings("http://127.0.0.1:9/upload"))
    }

    #[tokio::test]
    async fn test_cancel_before_poll() {
        let (handle, future) =
            uploader().upload(b"%PDF".to_vec(), "notes.pdf", "application/pdf").unwrap();
        handle.cancel();
        assert!(handle.is_cancelled());
        assert!(future.await.unwrap_err().is_cancelled());
    }

    #[test]
    fn test_bad_mime() {
        let err = uploader().upload(vec![1], "x.bin", "not a mime").err().unwrap();
        assert_eq!(err.pre(), crate::erx::PreL4::UPLD);
    }

    #[test]
    fn test_unconfigured_host() {
        let client = crate::web::ClientBuilder::new("http://127.0.0.1:9/api").build().unwrap();
        let err = MediaUploader::from_upload(&client, None).err().unwrap();
        assert_eq!(err.pre(), crate::erx::PreL4::CONF);
        assert!(MediaUploader::from_upload(&client, Some(settings(""))).is_err());
        assert!(MediaUploader::from_upload(&client, Some(settings("http://h/upload"))).is_ok());
    }

    #[tokio::test]
    async fn test_upload_reads_secure_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(body_string_contains("upload_preset"))
            .and(body_string_contains("notes.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secure_url": "https://cdn.example/notes.pdf",
                "public_id": "notes",
                "resource_type": "raw"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = crate::web::ClientBuilder::new(&server.uri()).build().unwrap();
        let upload = settings(&format!("{}/upload", server.uri()));
        let uploader = MediaUploader::new(client.raw().clone(), &upload);
        let (_handle, future) =
            uploader.upload(b"%PDF".to_vec(), "notes.pdf", "application/pdf").unwrap();
        let uploaded = future.await.unwrap();
        assert_eq!(uploaded.secure_url, "https://cdn.example/notes.pdf");
    }
}
