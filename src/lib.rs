//! Postmock: a headless social-post preview engine
//!
//! Postmock keeps a rendered preview of a social-media post consistent with
//! an arbitrary set of form inputs. The rendering surface is an explicit
//! in-memory value, so the whole refresh cycle runs and tests without a UI
//! host; a pluggable capture backend turns the surface into a raster image
//! for download or clipboard use.
//!
//! # Design
//!
//! - **Full-pass refresh**: every field change re-runs the whole binding
//!   table instead of diffing. The field set is small and the pass is
//!   idempotent, so the simple policy wins.
//! - **Closed variants**: badges, themes, and icons are tagged enums the
//!   rendering layer resolves, never injected markup.
//! - **Degraded, never corrupt**: a failing sub-update is logged and
//!   skipped; the rest of the pass still runs.
//!
//! # Example
//!
//! ```
//! use postmock::{FieldPatch, PreviewConfig, PreviewEngine};
//!
//! let mut engine = PreviewEngine::new(PreviewConfig::default());
//! engine.set_field(FieldPatch::Name("Ada Lovelace".to_string()));
//! engine.set_field(FieldPatch::Likes("2300000".to_string()));
//!
//! let snapshot = engine.text_snapshot();
//! assert!(snapshot.header.starts_with("Ada Lovelace"));
//! assert!(snapshot.stats.contains("2.3M likes"));
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod assets;
pub mod bindings;
pub mod engine;
pub mod export;
pub mod format;
pub mod render;
pub mod surface;
pub mod sync;

pub use assets::{AssetReference, AssetSlot, FileBlob, IngestReceipt};
pub use engine::PreviewEngine;
pub use export::{Bitmap, CaptureBackend, CaptureOptions, ExportRequest, Exporter};
pub use surface::{BadgeTier, PreviewSurface, SurfaceSnapshot, Theme};

use bindings::FieldId;

/// Configuration for a preview engine instance.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Logical size of the preview card
    pub surface: SurfaceSize,
    /// Upload size gate applied before any decode work
    pub max_upload_bytes: u64,
    /// Pixel density multiplier used when capturing the surface
    pub capture_scale: f32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceSize::default(),
            max_upload_bytes: assets::MAX_UPLOAD_BYTES,
            capture_scale: 2.0,
        }
    }
}

/// Logical dimensions of the preview card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self {
            width: 600,
            height: 420,
        }
    }
}

/// The full form state: one value per input field.
///
/// Counts are numeric-as-text, exactly as an input control would hold
/// them; the formatters decide how they display. The engine reads these
/// values and never mutates them during a refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostFields {
    pub name: String,
    pub handle: String,
    pub message: String,
    pub replies: String,
    pub reposts: String,
    pub likes: String,
    pub views: String,
    pub bookmarks: String,
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    /// 24-hour clock, `HH:MM`
    pub time: String,
    pub bookmarked: bool,
    pub theme: Theme,
    pub badge: BadgeTier,
}

impl Default for PostFields {
    fn default() -> Self {
        Self {
            name: "John Doe".to_string(),
            handle: "johndoe".to_string(),
            message: "Just setting up my account.".to_string(),
            replies: "0".to_string(),
            reposts: "0".to_string(),
            likes: "0".to_string(),
            views: "0".to_string(),
            bookmarks: "0".to_string(),
            date: String::new(),
            time: String::new(),
            bookmarked: false,
            theme: Theme::Light,
            badge: BadgeTier::None,
        }
    }
}

/// A raw value read from one input field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Flag(bool),
    ThemeChoice(Theme),
    BadgeChoice(BadgeTier),
}

impl PostFields {
    /// Read the current value of a bound field. Asset fields return `None`:
    /// their current value lives in the engine's asset store, not in the
    /// form state.
    pub fn value(&self, field: FieldId) -> Option<FieldValue<'_>> {
        match field {
            FieldId::Name => Some(FieldValue::Text(&self.name)),
            FieldId::Handle => Some(FieldValue::Text(&self.handle)),
            FieldId::Message => Some(FieldValue::Text(&self.message)),
            FieldId::Replies => Some(FieldValue::Text(&self.replies)),
            FieldId::Reposts => Some(FieldValue::Text(&self.reposts)),
            FieldId::Likes => Some(FieldValue::Text(&self.likes)),
            FieldId::Views => Some(FieldValue::Text(&self.views)),
            FieldId::Bookmarks => Some(FieldValue::Text(&self.bookmarks)),
            FieldId::Date => Some(FieldValue::Text(&self.date)),
            FieldId::Time => Some(FieldValue::Text(&self.time)),
            FieldId::Bookmarked => Some(FieldValue::Flag(self.bookmarked)),
            FieldId::BackgroundTheme => Some(FieldValue::ThemeChoice(self.theme)),
            FieldId::BadgeTier => Some(FieldValue::BadgeChoice(self.badge)),
            FieldId::ProfileImage | FieldId::PostImage => None,
        }
    }

    /// Apply one field change.
    pub fn apply(&mut self, patch: FieldPatch) {
        match patch {
            FieldPatch::Name(v) => self.name = v,
            FieldPatch::Handle(v) => self.handle = v,
            FieldPatch::Message(v) => self.message = v,
            FieldPatch::Replies(v) => self.replies = v,
            FieldPatch::Reposts(v) => self.reposts = v,
            FieldPatch::Likes(v) => self.likes = v,
            FieldPatch::Views(v) => self.views = v,
            FieldPatch::Bookmarks(v) => self.bookmarks = v,
            FieldPatch::Date(v) => self.date = v,
            FieldPatch::Time(v) => self.time = v,
            FieldPatch::Bookmarked(v) => self.bookmarked = v,
            FieldPatch::Theme(v) => self.theme = v,
            FieldPatch::Badge(v) => self.badge = v,
        }
    }
}

/// One change to the form state, as produced by an input control.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPatch {
    Name(String),
    Handle(String),
    Message(String),
    Replies(String),
    Reposts(String),
    Likes(String),
    Views(String),
    Bookmarks(String),
    Date(String),
    Time(String),
    Bookmarked(bool),
    Theme(Theme),
    Badge(BadgeTier),
}
