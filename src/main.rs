//! postmock CLI: drive the preview engine from a form-state document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use postmock::assets::{AssetSlot, FileBlob};
use postmock::export::{CaptureOptions, ExportOutcome, ExportRequest, Exporter, NoopClipboard};
use postmock::render::SoftwareRaster;
use postmock::{PostFields, PreviewConfig, PreviewEngine};

#[derive(Parser)]
#[command(name = "postmock", version, about = "Headless social-post preview renderer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the preview and save it as an image
    Render {
        /// Form-state document (JSON)
        #[arg(long)]
        input: PathBuf,
        /// Output encoding
        #[arg(long, value_enum, default_value = "png")]
        format: OutputFormat,
        /// Directory the fixed-name outputs are written to
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Print a text snapshot of the preview
    Snapshot {
        /// Form-state document (JSON)
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Png,
    Jpeg,
    Both,
}

/// A form-state document: the post fields plus optional image paths.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FormDoc {
    #[serde(flatten)]
    fields: PostFields,
    profile_image: Option<PathBuf>,
    post_image: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Render { input, format, out } => {
            let engine = load_engine(&input).await?;
            render(&engine, format, &out)
        }
        Command::Snapshot { input } => {
            let engine = load_engine(&input).await?;
            println!("{}", engine.text_snapshot());
            Ok(())
        }
    }
}

/// Build an engine from a form-state document, filling empty date/time
/// fields from the system clock once and attaching any referenced images.
async fn load_engine(input: &Path) -> Result<PreviewEngine> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let doc: FormDoc = serde_json::from_str(&text)
        .map_err(|e| postmock::Error::ConfigError(e.to_string()))
        .with_context(|| format!("invalid form-state document {}", input.display()))?;

    let mut fields = doc.fields;
    let now = Local::now();
    if fields.date.is_empty() {
        fields.date = now.format("%Y-%m-%d").to_string();
    }
    if fields.time.is_empty() {
        fields.time = now.format("%H:%M").to_string();
    }

    let mut engine = PreviewEngine::with_fields(PreviewConfig::default(), fields);

    if let Some(path) = doc.profile_image {
        let receipt = engine
            .attach_asset(AssetSlot::Profile, FileBlob::from_path(&path)?)
            .await
            .with_context(|| format!("profile image {}", path.display()))?;
        eprintln!("Attached profile image {} ({} bytes)", receipt.file_name, receipt.byte_size);
    }
    if let Some(path) = doc.post_image {
        let receipt = engine
            .attach_asset(AssetSlot::Post, FileBlob::from_path(&path)?)
            .await
            .with_context(|| format!("post image {}", path.display()))?;
        eprintln!("Attached post image {} ({} bytes)", receipt.file_name, receipt.byte_size);
    }

    Ok(engine)
}

fn render(engine: &PreviewEngine, format: OutputFormat, out: &Path) -> Result<()> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("failed to create {}", out.display()))?;

    let backend = SoftwareRaster::new(engine.config().surface);
    let options = CaptureOptions {
        scale: engine.config().capture_scale,
        background: None,
    };
    let exporter = Exporter::new();
    let mut clipboard = NoopClipboard;

    let requests: &[ExportRequest] = match format {
        OutputFormat::Png => &[ExportRequest::SavePng],
        OutputFormat::Jpeg => &[ExportRequest::SaveJpeg],
        OutputFormat::Both => &[ExportRequest::SavePng, ExportRequest::SaveJpeg],
    };

    for request in requests {
        let outcome = exporter.run(
            engine.surface(),
            &backend,
            &options,
            *request,
            out,
            &mut clipboard,
        )?;
        if let ExportOutcome::Saved(path) = outcome {
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
