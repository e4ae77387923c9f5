//! Filename conventions for image variants.
//!
//! Every source image `<name>.<ext>` gets three siblings in the same directory:
//!
//! ```text
//! portrait.jpg        source (jpg, jpeg or png)
//! portrait.webp       same size, lossy WebP
//! portrait-2x.webp    double size, lossy WebP
//! portrait@2x.jpg     double size, JPEG
//! ```
//!
//! The same names are used by the home page's `<picture>` element, so the
//! generator and the templates cannot drift apart.
//!
//! Because `portrait@2x.jpg` is itself a JPEG, classification has to recognize
//! derived files explicitly. Otherwise a second run would treat it as a new
//! source and produce `portrait@2x@2x.jpg`.

use std::path::Path;

/// Extensions accepted as source images (compared case-insensitively).
pub const SOURCE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Suffix appended to the stem of the double-size WebP.
const WEBP_2X_SUFFIX: &str = "-2x";
/// Suffix appended to the stem of the double-size JPEG.
const JPEG_2X_SUFFIX: &str = "@2x";

/// The three file names derived from one source stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantNames {
    /// `<name>.webp`
    pub webp: String,
    /// `<name>-2x.webp`
    pub webp_2x: String,
    /// `<name>@2x.jpg`
    pub jpeg_2x: String,
}

/// Derive the variant file names for a source stem.
///
/// ```
/// # use folio::naming::variant_names;
/// let names = variant_names("photo");
/// assert_eq!(names.webp, "photo.webp");
/// assert_eq!(names.webp_2x, "photo-2x.webp");
/// assert_eq!(names.jpeg_2x, "photo@2x.jpg");
/// ```
pub fn variant_names(stem: &str) -> VariantNames {
    VariantNames {
        webp: format!("{stem}.webp"),
        webp_2x: format!("{stem}{WEBP_2X_SUFFIX}.webp"),
        jpeg_2x: format!("{stem}{JPEG_2X_SUFFIX}.jpg"),
    }
}

/// How the generator treats a directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A source image; carries its file stem.
    Source { stem: String },
    /// Named like a generated variant. `candidates` are the source stems it
    /// could belong to; it is generator output only if one of them is a
    /// source in the same directory.
    Derived { candidates: Vec<String> },
    /// Anything else. Reported and skipped.
    Unsupported,
}

impl EntryKind {
    /// Whether a derived entry belongs to one of `source_stems`.
    pub fn is_variant_of(&self, mut source_stems: impl FnMut(&str) -> bool) -> bool {
        match self {
            EntryKind::Derived { candidates } => {
                candidates.iter().any(|c| source_stems(c.as_str()))
            }
            _ => false,
        }
    }
}

/// Classify a file by name.
///
/// A `.webp` may be `<name>.webp` or `<name>-2x.webp`, so both readings are
/// offered as candidates. A `<name>@2x.jpg` is never a source, even without
/// its `<name>` next to it.
pub fn classify(path: &Path) -> EntryKind {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return EntryKind::Unsupported;
    };
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if ext == "webp" {
        let mut candidates = vec![stem.to_string()];
        if let Some(base) = stem.strip_suffix(WEBP_2X_SUFFIX) {
            candidates.push(base.to_string());
        }
        return EntryKind::Derived { candidates };
    }
    if ext == "jpg"
        && let Some(base) = stem.strip_suffix(JPEG_2X_SUFFIX)
    {
        return EntryKind::Derived {
            candidates: vec![base.to_string()],
        };
    }
    if SOURCE_EXTENSIONS.contains(&ext.as_str()) && !stem.is_empty() {
        return EntryKind::Source {
            stem: stem.to_string(),
        };
    }
    EntryKind::Unsupported
}
