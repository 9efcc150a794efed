//! Delivery of the rendered JPEG to the network display.
//!
//! The display runs a small HTTP file server that accepts a multipart upload into its
//! image directory. A second upload arriving mid-transfer can leave a half-written file
//! on the device, so uploads through one [`HttpUploader`] never overlap.
//!
//! That server answers with malformed status lines and headers often enough that the
//! response cannot be trusted. Once the request has left, a reply that fails to parse,
//! or never arrives, is logged as a warning and the upload counts as delivered. Only a
//! failure to reach the device, or a well-formed non-2xx reply, is an error.

use anyhow::{Context, Result, bail};
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::blocking::multipart::{Form, Part};
use std::sync::Mutex;
use std::time::Duration;

pub const UPLOAD_FILE_NAME: &str = "glucose.jpg";
pub const UPLOAD_MIME: &str = "image/jpeg";
const UPLOAD_PATH: &str = "/doUpload?dir=/image/";

/// Anything that can put a rendered frame on a display.
pub trait DeviceUploader {
    fn upload(&self, jpeg: &[u8]) -> Result<()>;
}

#[derive(Debug)]
pub struct HttpUploader {
    pub base_url: String,
    http: HttpClient,
    in_flight: Mutex<()>,
}

impl HttpUploader {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            // The display sits on the local network.
            .no_proxy()
            .user_agent(concat!("glucotv/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self {
            base_url: base_url.into(),
            http,
            in_flight: Mutex::new(()),
        })
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), UPLOAD_PATH)
    }
}

/// Multipart body with the frame as the `file` field.
pub fn build_form(jpeg: &[u8]) -> Result<Form> {
    let part = Part::bytes(jpeg.to_vec())
        .file_name(UPLOAD_FILE_NAME)
        .mime_str(UPLOAD_MIME)
        .context("set upload content type")?;
    Ok(Form::new().part("file", part))
}

/// Decide whether a sent upload succeeded.
fn settle(url: &str, sent: reqwest::Result<Response>) -> Result<()> {
    match sent {
        Ok(resp) if resp.status().is_success() => Ok(()),
        Ok(resp) => bail!("device rejected upload with HTTP {}", resp.status()),
        Err(e) if e.is_connect() || e.is_builder() => {
            Err(anyhow::Error::new(e).context(format!("POST {}", url)))
        }
        Err(e) => {
            log::warn!("ignoring unreadable reply from {}: {}", url, e);
            Ok(())
        }
    }
}

impl DeviceUploader for HttpUploader {
    fn upload(&self, jpeg: &[u8]) -> Result<()> {
        let _guard = self.in_flight.lock().unwrap_or_else(|p| p.into_inner());
        let url = self.upload_url();
        log::info!("uploading {} bytes to {}", jpeg.len(), url);

        let sent = self.http.post(&url).multipart(build_form(jpeg)?).send();
        settle(&url, sent)
    }
}
