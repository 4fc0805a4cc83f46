use crate::foundation::error::{TapeError, TapeResult};
use anyhow::Context as _;
use std::io::Write as _;
use std::path::Path;
use std::time::Duration;
use tempfile::TempPath;

/// HTTP client settings for [`fetch`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FetchOpts {
    pub connect_timeout: Option<Duration>,
    /// Whole-request timeout, including the body download.
    pub timeout: Option<Duration>,
}

impl Default for FetchOpts {
    fn default() -> Self {
        Self {
            connect_timeout: Some(Duration::from_secs(10)),
            timeout: Some(Duration::from_secs(300)),
        }
    }
}

/// A downloaded file. The file is deleted when this value (or the [`TempPath`] taken from it)
/// is dropped.
#[derive(Debug)]
pub struct FetchedMedia {
    temp: TempPath,
    content_type: String,
    extension: &'static str,
}

impl FetchedMedia {
    pub fn path(&self) -> &Path {
        &self.temp
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// File extension chosen from the content type (`"wav"` or `"mp3"`).
    pub fn extension(&self) -> &'static str {
        self.extension
    }

    pub fn into_temp_path(self) -> TempPath {
        self.temp
    }
}

/// Map a response content type to a file extension.
///
/// Matching is case-insensitive and ignores parameters such as `; charset=...`.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    match mime.as_str() {
        "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/x-pn-wav" => Some("wav"),
        "audio/mpeg" | "audio/x-mpeg" | "audio/mp3" | "audio/x-mp3" | "audio/mpeg3"
        | "audio/x-mpeg3" | "audio/mpg" | "audio/x-mpg" | "audio/x-mpegaudio" => Some("mp3"),
        _ => None,
    }
}

/// Download `url` into a temporary file named after its content type.
#[tracing::instrument(skip(opts))]
pub fn fetch(url: &str, opts: &FetchOpts) -> TapeResult<FetchedMedia> {
    let mut client_builder = reqwest::blocking::Client::builder();
    if let Some(connect_timeout) = opts.connect_timeout {
        client_builder = client_builder.connect_timeout(connect_timeout);
    }
    if let Some(timeout) = opts.timeout {
        client_builder = client_builder.timeout(timeout);
    }
    let client = client_builder.build()?;

    let mut response = client.get(url).send()?.error_for_status()?;
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let extension = extension_for_content_type(&content_type)
        .ok_or_else(|| TapeError::UnsupportedContentType(content_type.clone()))?;

    let mut file = tempfile::Builder::new()
        .prefix("audio")
        .suffix(&format!(".{extension}"))
        .tempfile()
        .context("failed to create download file")?;
    let bytes = response.copy_to(&mut file)?;
    file.flush().context("failed to flush download file")?;

    let temp = file.into_temp_path();
    tracing::info!(
        bytes,
        path = %temp.display(),
        content_type = content_type.as_str(),
        "fetched media"
    );
    Ok(FetchedMedia {
        temp,
        content_type,
        extension,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/media/fetch.rs"]
mod tests;
