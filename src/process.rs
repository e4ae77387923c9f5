//! Image variant generation.
//!
//! Offline batch job over a single directory of source images. For every
//! JPEG/PNG it writes a same-size WebP plus WebP and JPEG variants at twice
//! the resolution, next to the original:
//!
//! ```text
//! static/images/
//! ├── portrait.jpg          # source
//! ├── portrait.webp         # same size, quality 85
//! ├── portrait-2x.webp      # 2x, quality 80
//! └── portrait@2x.jpg       # 2x, quality 85
//! ```
//!
//! ## Idempotence
//!
//! Existing targets are never overwritten, so re-running after a successful
//! run performs no writes. This makes the job safe to call from a deploy
//! script on every build.
//!
//! ## Failure model
//!
//! - Missing directory: fatal, [`ProcessError::SourceDirMissing`].
//! - No source images: not an error, reported via [`ProcessEvent::Started`]
//!   with a count of zero.
//! - Unsupported file: reported via [`ProcessEvent::Skipped`].
//! - Decode/encode failure on one file: reported via [`ProcessEvent::Failed`];
//!   the batch continues with the next file.
//!
//! Files are processed sequentially in file-name order.

use crate::config::ImagesConfig;
use crate::imaging::{
    ImageBackend, Quality, RustBackend, VariantConfig, VariantReport, create_variants,
};
use crate::naming::{EntryKind, classify};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Images directory not found: {}", .0.display())]
    SourceDirMissing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Progress events emitted during processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// Directory scanned; `image_count` source images will be processed.
    Started { dir: PathBuf, image_count: usize },
    /// A file that is neither a source image nor a generated variant.
    Skipped { file_name: String },
    /// All variants of one source handled (created or already present).
    ImageProcessed {
        /// 1-based position among the source images.
        index: usize,
        file_name: String,
        report: VariantReport,
    },
    /// Processing one source failed; the batch continues.
    Failed {
        index: usize,
        file_name: String,
        error: String,
    },
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub images: usize,
    pub skipped: usize,
    pub failed: usize,
    pub created: usize,
    pub existing: usize,
}

impl fmt::Display for ProcessSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} images, {} variants created, {} already present, {} skipped, {} failed",
            self.images, self.created, self.existing, self.skipped, self.failed
        )
    }
}

impl VariantConfig {
    pub fn from_images_config(config: &ImagesConfig) -> Self {
        Self {
            quality: Quality::new(config.quality),
            quality_2x: Quality::new(config.quality_2x),
        }
    }
}

/// A directory listing split into what the job acts on.
#[derive(Debug, Default)]
struct DirListing {
    sources: Vec<(PathBuf, String)>,
    unsupported: Vec<String>,
}

/// List regular files directly inside `dir`, sorted by name.
///
/// Files named like variants of a source in the listing are dropped; a
/// variant-like name without its source counts as unsupported.
fn list_dir(dir: &Path) -> Result<DirListing, ProcessError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let classified: Vec<(PathBuf, EntryKind)> = files
        .into_iter()
        .map(|path| {
            let kind = classify(&path);
            (path, kind)
        })
        .collect();
    let source_stems: HashSet<String> = classified
        .iter()
        .filter_map(|(_, kind)| match kind {
            EntryKind::Source { stem } => Some(stem.clone()),
            _ => None,
        })
        .collect();

    let mut listing = DirListing::default();
    for (path, kind) in classified {
        match kind {
            EntryKind::Source { stem } => listing.sources.push((path, stem)),
            derived @ EntryKind::Derived { .. }
                if derived.is_variant_of(|stem| source_stems.contains(stem)) => {}
            EntryKind::Derived { .. } | EntryKind::Unsupported => {
                listing.unsupported.push(file_name_of(&path));
            }
        }
    }
    Ok(listing)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn process(
    config: &ImagesConfig,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<ProcessSummary, ProcessError> {
    let backend = RustBackend::new();
    process_with_backend(&backend, config, progress)
}

/// Process a directory using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    config: &ImagesConfig,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<ProcessSummary, ProcessError> {
    let dir = &config.dir;
    if !dir.is_dir() {
        return Err(ProcessError::SourceDirMissing(dir.clone()));
    }

    let emit = |event: ProcessEvent| {
        if let Some(tx) = &progress {
            tx.send(event).ok();
        }
    };

    let listing = list_dir(dir)?;
    let variant_config = VariantConfig::from_images_config(config);
    let mut summary = ProcessSummary {
        skipped: listing.unsupported.len(),
        ..ProcessSummary::default()
    };

    emit(ProcessEvent::Started {
        dir: dir.clone(),
        image_count: listing.sources.len(),
    });
    for file_name in listing.unsupported {
        emit(ProcessEvent::Skipped { file_name });
    }

    for (i, (source, stem)) in listing.sources.iter().enumerate() {
        let index = i + 1;
        let file_name = file_name_of(source);

        match create_variants(backend, source, dir, stem, &variant_config) {
            Ok(report) => {
                summary.images += 1;
                summary.created += report.created();
                summary.existing += report.variants.len() - report.created();
                emit(ProcessEvent::ImageProcessed {
                    index,
                    file_name,
                    report,
                });
            }
            Err(e) => {
                summary.failed += 1;
                emit(ProcessEvent::Failed {
                    index,
                    file_name,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(summary)
}
