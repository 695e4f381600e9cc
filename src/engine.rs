//! The engine facade: owns the form state, the asset store, and the
//! preview surface, and keeps them synchronized.
//!
//! Trigger policy: the surface is refreshed once at construction with the
//! starting field values, then synchronously after every field change and
//! after every accepted ingestion. No batching, no debouncing; the field
//! set is small enough that a full pass per change is the simplest
//! consistent policy.

use std::sync::Arc;

use log::debug;

use crate::assets::{self, AssetSlot, AssetStore, FileBlob, IngestReceipt};
use crate::surface::{PreviewSurface, SurfaceSnapshot};
use crate::sync::{self, RefreshReport};
use crate::{FieldPatch, PostFields, PreviewConfig, Result};

type IngestHandler = Arc<dyn Fn(&IngestReceipt) + Send + Sync>;

/// A headless preview engine instance.
pub struct PreviewEngine {
    config: PreviewConfig,
    fields: PostFields,
    assets: AssetStore,
    surface: PreviewSurface,
    on_ingest: Option<IngestHandler>,
}

impl PreviewEngine {
    /// Create an engine with default field values and run the initial
    /// refresh pass.
    pub fn new(config: PreviewConfig) -> Self {
        Self::with_fields(config, PostFields::default())
    }

    /// Create an engine with the given starting field values.
    pub fn with_fields(config: PreviewConfig, fields: PostFields) -> Self {
        let mut engine = Self {
            config,
            fields,
            assets: AssetStore::new(),
            surface: PreviewSurface::new(),
            on_ingest: None,
        };
        engine.refresh();
        engine
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// The current form state. Read-only: changes go through
    /// [`set_field`](Self::set_field) so the surface stays consistent.
    pub fn fields(&self) -> &PostFields {
        &self.fields
    }

    /// The current preview surface.
    pub fn surface(&self) -> &PreviewSurface {
        &self.surface
    }

    /// Apply one field change and synchronously refresh the surface.
    pub fn set_field(&mut self, patch: FieldPatch) -> RefreshReport {
        self.fields.apply(patch);
        self.refresh()
    }

    /// Run a full refresh pass now.
    pub fn refresh(&mut self) -> RefreshReport {
        let report = sync::refresh(&self.fields, &self.assets, &mut self.surface);
        debug!(
            "Refresh pass: {} applied, {} failed",
            report.completed, report.failed
        );
        report
    }

    /// Ingest one upload into an asset slot.
    ///
    /// On success the slot's reference is replaced, the ingest handler (if
    /// any) is notified, and the surface is refreshed. On failure the
    /// slot's previous reference stays active and the surface is left
    /// alone.
    pub async fn attach_asset(&mut self, slot: AssetSlot, blob: FileBlob) -> Result<IngestReceipt> {
        let reference = assets::ingest(blob, self.config.max_upload_bytes).await?;
        let receipt = IngestReceipt {
            slot,
            file_name: reference.source_file_name.clone(),
            byte_size: reference.byte_size,
        };

        self.assets.replace(slot, reference);
        if let Some(handler) = &self.on_ingest {
            handler(&receipt);
        }
        self.refresh();

        Ok(receipt)
    }

    /// Register a callback invoked after each accepted ingestion. Hosts
    /// use it to label the upload control with the accepted file.
    pub fn on_ingest<F>(&mut self, handler: F)
    where
        F: Fn(&IngestReceipt) + Send + Sync + 'static,
    {
        self.on_ingest = Some(Arc::new(handler));
    }

    /// Remove a previously registered ingest callback if any.
    pub fn clear_on_ingest(&mut self) {
        self.on_ingest = None;
    }

    /// Render the current surface as a text snapshot.
    pub fn text_snapshot(&self) -> SurfaceSnapshot {
        self.surface.text_snapshot()
    }
}
