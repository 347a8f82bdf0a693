//! Sandboxed media resolution and file delivery
//!
//! All served files live under a single media root. Caller-supplied path
//! components are reduced to their final segment before joining, so
//! traversal attempts (`..`, absolute paths, embedded separators) can
//! never escape the root. Delivery streams files from disk, either whole
//! or as a single byte range for video seeking.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// File name of the fixed singleton birthday photo
const BIRTHDAY_PHOTO: &str = "11.jpg";

/// Cache policy for full media responses
const CACHE_CONTROL: &str = "public, max-age=86400";

/// Access to media files under a sandboxed root directory
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

/// Reduce a caller-supplied component to its final path segment
///
/// Returns `None` when nothing safe remains (empty input, `..`, a bare
/// separator). `a/../b` becomes `b`, `/etc/passwd` becomes `passwd`.
fn sanitize(component: &str) -> Option<String> {
    let name = Path::new(component).file_name()?;
    let name = name.to_str()?;
    if name == ".." {
        return None;
    }
    Some(name.to_string())
}

impl MediaStore {
    /// Create a media store rooted at the given directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve a photo inside `photos/<folder>/<file>`
    pub fn resolve_photo(&self, folder: &str, filename: &str) -> Option<PathBuf> {
        let folder = sanitize(folder)?;
        let filename = sanitize(filename)?;
        Some(self.root.join("photos").join(folder).join(filename))
    }

    /// Resolve a video inside `videos/<file>`
    pub fn resolve_video(&self, filename: &str) -> Option<PathBuf> {
        let filename = sanitize(filename)?;
        Some(self.root.join("videos").join(filename))
    }

    /// Resolve a music track inside `music/<file>`
    pub fn resolve_music(&self, filename: &str) -> Option<PathBuf> {
        let filename = sanitize(filename)?;
        Some(self.root.join("music").join(filename))
    }

    /// Resolve the fixed birthday photo; takes no caller input
    pub fn birthday_photo(&self) -> PathBuf {
        self.root.join("photos").join("single").join(BIRTHDAY_PHOTO)
    }
}

/// Image MIME type from a file extension, with a generic binary fallback
pub fn image_content_type(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Audio MIME type: mp3 is `audio/mpeg`, everything else `audio/ogg`
pub fn audio_content_type(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        _ => "audio/ogg",
    }
}

/// Parse a `Range` header against a known file size
///
/// Returns `Ok(None)` when no header is present. Syntactically malformed
/// values are a 400; well-formed but unsatisfiable ranges are a 416. The
/// end bound defaults to the last byte and is clamped to it.
pub fn parse_range(
    value: Option<&HeaderValue>,
    file_size: u64,
) -> Result<Option<(u64, u64)>, ApiError> {
    let Some(value) = value else {
        return Ok(None);
    };
    if file_size == 0 {
        return Err(ApiError::RangeNotSatisfiable(file_size));
    }
    let value = value
        .to_str()
        .map_err(|_| ApiError::BadRequest("Invalid Range header".into()))?;
    let Some(range) = value.strip_prefix("bytes=") else {
        return Err(ApiError::BadRequest("Invalid Range header".into()));
    };
    if range.contains(',') {
        return Err(ApiError::BadRequest("Multiple ranges not supported".into()));
    }

    let mut parts = range.splitn(2, '-');
    let start_part = parts.next().unwrap_or_default().trim();
    let end_part = parts.next().unwrap_or_default().trim();

    let (start, end) = if start_part.is_empty() {
        // Suffix form: bytes=-N means the final N bytes.
        let suffix: u64 = end_part
            .parse()
            .map_err(|_| ApiError::BadRequest("Invalid Range header".into()))?;
        if suffix == 0 {
            return Err(ApiError::RangeNotSatisfiable(file_size));
        }
        let start = file_size.saturating_sub(suffix);
        (start, file_size - 1)
    } else {
        let start: u64 = start_part
            .parse()
            .map_err(|_| ApiError::BadRequest("Invalid Range header".into()))?;
        let end: u64 = if end_part.is_empty() {
            file_size - 1
        } else {
            end_part
                .parse()
                .map_err(|_| ApiError::BadRequest("Invalid Range header".into()))?
        };
        (start, end.min(file_size - 1))
    };

    if start > end || start >= file_size {
        return Err(ApiError::RangeNotSatisfiable(file_size));
    }

    Ok(Some((start, end)))
}

fn header_value(value: &str) -> ApiResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| ApiError::InternalServerError)
}

async fn open_with_size(path: &Path) -> ApiResult<(File, u64)> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) | Err(_) => return Err(ApiError::NotFound("File not found".into())),
    };
    let file = File::open(path)
        .await
        .map_err(|_| ApiError::NotFound("File not found".into()))?;
    Ok((file, metadata.len()))
}

/// Stream a whole file with a long-lived public cache header
pub async fn serve_full(path: &Path, content_type: &'static str) -> ApiResult<Response> {
    let (file, size) = open_with_size(path).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CONTENT_LENGTH, header_value(&size.to_string())?);
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(CACHE_CONTROL),
    );

    let stream = ReaderStream::new(file);
    Ok((StatusCode::OK, headers, Body::from_stream(stream)).into_response())
}

/// Stream a file honoring an optional `Range` header
///
/// Without a range this behaves like [`serve_full`] plus an
/// `Accept-Ranges` advertisement. With one it answers 206 and streams
/// only the requested slice.
pub async fn serve_ranged(
    path: &Path,
    content_type: &'static str,
    range: Option<&HeaderValue>,
) -> ApiResult<Response> {
    let (mut file, size) = open_with_size(path).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    if let Some((start, end)) = parse_range(range, size)? {
        let length = end - start + 1;
        debug!(start, end, length, "serving byte range");

        file.seek(SeekFrom::Start(start))
            .await
            .map_err(|_| ApiError::InternalServerError)?;
        let stream = ReaderStream::new(file.take(length));

        headers.insert(
            header::CONTENT_RANGE,
            header_value(&format!("bytes {}-{}/{}", start, end, size))?,
        );
        headers.insert(header::CONTENT_LENGTH, header_value(&length.to_string())?);
        return Ok((
            StatusCode::PARTIAL_CONTENT,
            headers,
            Body::from_stream(stream),
        )
            .into_response());
    }

    headers.insert(header::CONTENT_LENGTH, header_value(&size.to_string())?);
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(CACHE_CONTROL),
    );
    let stream = ReaderStream::new(file);
    Ok((StatusCode::OK, headers, Body::from_stream(stream)).into_response())
}
