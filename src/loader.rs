//! Asynchronous image loading into fresh canvas models.
//!
//! [`load_image`] suspends rather than blocks: bytes are fetched through
//! async IO and decoding runs on the blocking pool. Multiple loads may be in
//! flight concurrently; each allocates its own backing surface. Once decode
//! has been handed off there is no cancellation - dropping the future merely
//! abandons the result.

use std::path::PathBuf;

use base64::Engine as _;

use crate::model::CanvasModel;
use crate::pixels;

/// Image fetch/decode failure.
///
/// Deliberately payload-free: decode diagnostics are not threaded through to
/// callers, they go to `tracing` at debug level. A caller wanting a retry
/// simply invokes [`load_image`] again.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("image load failed")]
pub struct LoadError;

/// Cross-origin access mode requested for a fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrossOrigin {
    /// Anonymous access: no credentials, pixel data readable after load.
    Anonymous,
}

/// A parsed image source URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// An embedded `data:` URI (base64 payload).
    DataUri(String),
    /// A local file, from a bare path or a `file://` URI.
    File(PathBuf),
    /// An `http://` or `https://` URL (requires the `network` feature).
    Url(String),
}

impl ImageSource {
    /// Parse a source URI string.
    ///
    /// `data:` URIs stay embedded, `http(s)://` becomes a network source,
    /// `file://` is stripped to a path, anything else is a bare file path.
    pub fn from_uri(uri: &str) -> Self {
        if uri.starts_with("data:") {
            Self::DataUri(uri.to_string())
        } else if uri.starts_with("http://") || uri.starts_with("https://") {
            Self::Url(uri.to_string())
        } else if let Some(path) = uri.strip_prefix("file://") {
            Self::File(PathBuf::from(path))
        } else {
            Self::File(PathBuf::from(uri))
        }
    }

    /// The cross-origin mode this fetch is tagged with.
    ///
    /// Everything except a data URI requests anonymous cross-origin access so
    /// pixel data can be read back after the load; data URIs are same-origin
    /// by construction and carry no tag.
    pub fn cross_origin(&self) -> Option<CrossOrigin> {
        match self {
            Self::DataUri(_) => None,
            Self::File(_) | Self::Url(_) => Some(CrossOrigin::Anonymous),
        }
    }
}

/// Decode an external image resource into a fresh [`CanvasModel`].
///
/// Completes with a model sized to the image's natural dimensions, painted
/// once from the decoded pixels. On any fetch or decode failure the future
/// resolves to [`LoadError`]; a partially-initialized model is never
/// produced.
pub async fn load_image(source_uri: &str) -> Result<CanvasModel, LoadError> {
    let source = ImageSource::from_uri(source_uri);
    tracing::debug!(cross_origin = ?source.cross_origin(), "loading image");

    let bytes = fetch_bytes(&source).await?;
    tokio::task::spawn_blocking(move || decode_to_model(&bytes))
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "image decode task failed");
            LoadError
        })?
}

async fn fetch_bytes(source: &ImageSource) -> Result<Vec<u8>, LoadError> {
    match source {
        ImageSource::DataUri(uri) => decode_data_uri(uri),
        ImageSource::File(path) => tokio::fs::read(path).await.map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "image file read failed");
            LoadError
        }),
        ImageSource::Url(url) => fetch_url(url).await,
    }
}

#[cfg(feature = "network")]
async fn fetch_url(url: &str) -> Result<Vec<u8>, LoadError> {
    let response = reqwest::get(url).await.map_err(|e| {
        tracing::debug!(%url, error = %e, "image fetch failed");
        LoadError
    })?;
    let bytes = response.bytes().await.map_err(|e| {
        tracing::debug!(%url, error = %e, "image body read failed");
        LoadError
    })?;
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "network"))]
async fn fetch_url(url: &str) -> Result<Vec<u8>, LoadError> {
    tracing::debug!(%url, "url image sources require the `network` feature");
    Err(LoadError)
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>, LoadError> {
    let rest = uri.strip_prefix("data:").ok_or(LoadError)?;
    let (meta, payload) = rest.split_once(',').ok_or_else(|| {
        tracing::debug!("data uri has no payload separator");
        LoadError
    })?;
    if !meta.ends_with(";base64") {
        tracing::debug!("only base64 data uris are supported");
        return Err(LoadError);
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| {
            tracing::debug!(error = %e, "data uri base64 decode failed");
            LoadError
        })
}

fn decode_to_model(bytes: &[u8]) -> Result<CanvasModel, LoadError> {
    let dyn_img = image::load_from_memory(bytes).map_err(|e| {
        tracing::debug!(error = %e, "image decode failed");
        LoadError
    })?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixmap = pixels::pixmap_from_straight_bytes(&rgba.into_raw(), width, height)
        .map_err(|e| {
            tracing::debug!(error = %e, "decoded image does not fit a surface");
            LoadError
        })?;
    Ok(CanvasModel::from_pixmap(width, height, pixmap))
}
