//! Upload ingestion: validates user-supplied image bytes and inlines them
//! as data-URI asset references.
//!
//! Ingestion is gated on size before any decode work happens, then the
//! decode itself runs off-thread since base64 over a multi-megabyte upload
//! is CPU-bound. A failed ingestion never disturbs the previously accepted
//! reference for the slot.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default upload size gate: 3 MiB, checked before any decode work.
pub const MAX_UPLOAD_BYTES: u64 = 3 * 1024 * 1024;

/// The two independent image-holding positions in the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSlot {
    /// The circular avatar next to the display name
    Profile,
    /// The large media attachment under the message
    Post,
}

/// One file selection handed to the ingestor: a name plus raw bytes.
#[derive(Debug, Clone)]
pub struct FileBlob {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileBlob {
    /// Read a blob from disk, keeping only the final path component as the
    /// file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, bytes })
    }
}

/// An embeddable representation of one accepted upload.
///
/// The data URI is what the preview surface and the rasterizer consume;
/// the metadata feeds the upload-control receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReference {
    /// `data:<mime>;base64,...` content ready to embed
    pub data_uri: String,
    /// Name of the file the reference was created from
    pub source_file_name: String,
    /// Size of the original upload in bytes
    pub byte_size: u64,
}

/// Notification emitted after a successful ingestion, reflecting the most
/// recently accepted file for the slot. Presentation-only: hosts use it to
/// label the upload control.
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    pub slot: AssetSlot,
    pub file_name: String,
    pub byte_size: u64,
}

/// Holds the current reference for each asset slot.
///
/// References persist until replaced by a newer accepted upload; they are
/// the only state that survives a refresh pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetStore {
    profile: Option<AssetReference>,
    post: Option<AssetReference>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current reference for a slot, if any upload has been accepted.
    pub fn get(&self, slot: AssetSlot) -> Option<&AssetReference> {
        match slot {
            AssetSlot::Profile => self.profile.as_ref(),
            AssetSlot::Post => self.post.as_ref(),
        }
    }

    /// Replace the slot's reference with a newly accepted one.
    pub fn replace(&mut self, slot: AssetSlot, reference: AssetReference) {
        match slot {
            AssetSlot::Profile => self.profile = Some(reference),
            AssetSlot::Post => self.post = Some(reference),
        }
    }
}

/// Validate and convert one upload into an [`AssetReference`].
///
/// The size gate runs synchronously, before the bytes are touched; the
/// sniff-and-encode step runs on the blocking pool. The returned reference
/// has not been stored anywhere yet, so a caller that gets an `Err` keeps
/// its previous reference untouched.
pub async fn ingest(blob: FileBlob, limit: u64) -> Result<AssetReference> {
    let size = blob.bytes.len() as u64;
    if size > limit {
        return Err(Error::FileTooLarge { size, limit });
    }

    tokio::task::spawn_blocking(move || encode_reference(blob))
        .await
        .map_err(|e| Error::ReadError(format!("Decode task failed: {}", e)))?
}

/// Sniff the image format and build the data URI. Blocking.
fn encode_reference(blob: FileBlob) -> Result<AssetReference> {
    let format = image::guess_format(&blob.bytes)
        .map_err(|e| Error::ReadError(format!("Unrecognized image data: {}", e)))?;

    let encoded = BASE64.encode(&blob.bytes);
    let byte_size = blob.bytes.len() as u64;

    Ok(AssetReference {
        data_uri: format!("data:{};base64,{}", format.to_mime_type(), encoded),
        source_file_name: blob.file_name,
        byte_size,
    })
}

/// Decode a data URI produced by [`ingest`] back into raw image bytes.
///
/// Used by the rasterizer when inlining image slots into a capture.
pub fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>> {
    let payload = data_uri
        .split_once(";base64,")
        .map(|(_, payload)| payload)
        .ok_or_else(|| Error::ReadError("Not a base64 data URI".to_string()))?;

    BASE64
        .decode(payload)
        .map_err(|e| Error::ReadError(format!("Invalid base64 payload: {}", e)))
}
