//! High-level image operations.
//!
//! These functions combine naming, calculations, and backend execution. They
//! decide which variants are missing, then decode, resize, and encode only
//! what is needed.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::double_dimensions;
use super::params::{EncodeParams, OutputFormat, Quality};
use crate::naming::variant_names;
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Encoding qualities for the variant set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantConfig {
    /// Same-size WebP and 2x JPEG.
    pub quality: Quality,
    /// 2x WebP.
    pub quality_2x: Quality,
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            quality: Quality::new(85),
            quality_2x: Quality::new(80),
        }
    }
}

/// Pixel density of a planned variant relative to its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Density {
    Original,
    Double,
}

/// One variant to write, before checking whether it already exists.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantPlan {
    pub file_name: String,
    pub density: Density,
    pub params: EncodeParams,
}

/// Whether a variant was written by this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantStatus {
    Created,
    Exists,
}

/// Outcome for a single variant file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantInfo {
    pub file_name: String,
    pub status: VariantStatus,
}

/// Outcome for one source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantReport {
    /// Source dimensions, or `None` when every variant existed and the
    /// source was never decoded.
    pub dimensions: Option<Dimensions>,
    pub variants: Vec<VariantInfo>,
}

impl VariantReport {
    pub fn created(&self) -> usize {
        self.variants
            .iter()
            .filter(|v| v.status == VariantStatus::Created)
            .count()
    }
}

/// Plan the three variants of `stem` in `output_dir`, in write order.
pub fn plan_variants(output_dir: &Path, stem: &str, config: &VariantConfig) -> Vec<VariantPlan> {
    let names = variant_names(stem);
    let plan = |file_name: String, density, format, quality| {
        let output: PathBuf = output_dir.join(&file_name);
        VariantPlan {
            file_name,
            density,
            params: EncodeParams {
                output,
                format,
                quality,
            },
        }
    };

    vec![
        plan(
            names.webp,
            Density::Original,
            OutputFormat::WebP,
            config.quality,
        ),
        plan(
            names.webp_2x,
            Density::Double,
            OutputFormat::WebP,
            config.quality_2x,
        ),
        plan(
            names.jpeg_2x,
            Density::Double,
            OutputFormat::Jpeg,
            config.quality,
        ),
    ]
}

/// Create the missing variants of one source image.
///
/// Existing targets are never overwritten. The source is decoded only if at
/// least one target is missing, and the 2x image is computed at most once.
pub fn create_variants(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    stem: &str,
    config: &VariantConfig,
) -> Result<VariantReport> {
    let plans = plan_variants(output_dir, stem, config);

    if plans.iter().all(|p| p.params.output.exists()) {
        return Ok(VariantReport {
            dimensions: None,
            variants: plans
                .into_iter()
                .map(|p| VariantInfo {
                    file_name: p.file_name,
                    status: VariantStatus::Exists,
                })
                .collect(),
        });
    }

    let original = backend.decode(source)?;
    let dimensions = Dimensions::from(&original);
    let mut doubled: Option<RgbImage> = None;
    let mut variants = Vec::with_capacity(plans.len());

    for plan in plans {
        if plan.params.output.exists() {
            variants.push(VariantInfo {
                file_name: plan.file_name,
                status: VariantStatus::Exists,
            });
            continue;
        }

        let img = match plan.density {
            Density::Original => &original,
            Density::Double => match &mut doubled {
                Some(img) => &*img,
                slot => {
                    let target = double_dimensions(dimensions).ok_or_else(|| {
                        BackendError::ProcessingFailed(format!(
                            "{}x{} is too large to double",
                            dimensions.width, dimensions.height
                        ))
                    })?;
                    &*slot.insert(backend.resize(&original, target)?)
                }
            },
        };

        backend.encode(img, &plan.params)?;
        variants.push(VariantInfo {
            file_name: plan.file_name,
            status: VariantStatus::Created,
        });
    }

    Ok(VariantReport {
        dimensions: Some(dimensions),
        variants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use tempfile::TempDir;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    #[test]
    fn get_dimensions_calls_backend() {
        let backend = MockBackend::with_dimensions(vec![dims(1920, 1080)]);
        let result = get_dimensions(&backend, Path::new("/test.jpg")).unwrap();
        assert_eq!(result, (1920, 1080));
    }

    #[test]
    fn plan_variants_names_formats_and_qualities() {
        let plans = plan_variants(Path::new("/img"), "photo", &VariantConfig::default());
        let summary: Vec<_> = plans
            .iter()
            .map(|p| {
                (
                    p.file_name.as_str(),
                    p.density,
                    p.params.format,
                    p.params.quality.value(),
                )
            })
            .collect();
        assert_eq!(summary, vec![
            ("photo.webp", Density::Original, OutputFormat::WebP, 85),
            ("photo-2x.webp", Density::Double, OutputFormat::WebP, 80),
            ("photo@2x.jpg", Density::Double, OutputFormat::Jpeg, 85),
        ]);
        assert_eq!(plans[2].params.output, PathBuf::from("/img/photo@2x.jpg"));
    }

    #[test]
    fn create_variants_writes_all_three() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::with_dimensions(vec![dims(300, 200)]);

        let report = create_variants(
            &backend,
            &tmp.path().join("photo.jpg"),
            tmp.path(),
            "photo",
            &VariantConfig::default(),
        )
        .unwrap();

        assert_eq!(report.dimensions, Some(dims(300, 200)));
        assert_eq!(report.created(), 3);

        let sizes: Vec<(u32, u32, u32)> = backend
            .encodes()
            .into_iter()
            .map(|op| match op {
                RecordedOp::Encode {
                    width,
                    height,
                    quality,
                    ..
                } => (width, height, quality),
                other => panic!("unexpected op {other:?}"),
            })
            .collect();
        assert_eq!(sizes, vec![(300, 200, 85), (600, 400, 80), (600, 400, 85)]);
    }

    #[test]
    fn create_variants_resizes_once() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::with_dimensions(vec![dims(10, 10)]);

        create_variants(
            &backend,
            &tmp.path().join("a.png"),
            tmp.path(),
            "a",
            &VariantConfig::default(),
        )
        .unwrap();

        let resizes = backend
            .get_operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::Resize { .. }))
            .count();
        assert_eq!(resizes, 1);
    }

    #[test]
    fn create_variants_skips_existing_targets() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("photo-2x.webp"), b"existing").unwrap();
        let backend = MockBackend::with_dimensions(vec![dims(100, 50)]);

        let report = create_variants(
            &backend,
            &tmp.path().join("photo.jpg"),
            tmp.path(),
            "photo",
            &VariantConfig::default(),
        )
        .unwrap();

        let statuses: Vec<_> = report.variants.iter().map(|v| v.status).collect();
        assert_eq!(statuses, vec![
            VariantStatus::Created,
            VariantStatus::Exists,
            VariantStatus::Created,
        ]);
        assert_eq!(backend.encodes().len(), 2);
        assert_eq!(
            std::fs::read(tmp.path().join("photo-2x.webp")).unwrap(),
            b"existing"
        );
    }

    #[test]
    fn create_variants_without_missing_2x_targets_does_not_resize() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("photo-2x.webp"), b"").unwrap();
        std::fs::write(tmp.path().join("photo@2x.jpg"), b"").unwrap();
        let backend = MockBackend::with_dimensions(vec![dims(100, 50)]);

        create_variants(
            &backend,
            &tmp.path().join("photo.jpg"),
            tmp.path(),
            "photo",
            &VariantConfig::default(),
        )
        .unwrap();

        assert!(
            !backend
                .get_operations()
                .iter()
                .any(|op| matches!(op, RecordedOp::Resize { .. }))
        );
        assert_eq!(backend.encodes().len(), 1);
    }

    #[test]
    fn lone_missing_2x_jpeg_is_encoded_at_double_size() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("photo.webp"), b"").unwrap();
        std::fs::write(tmp.path().join("photo-2x.webp"), b"").unwrap();
        let backend = MockBackend::with_dimensions(vec![dims(120, 90)]);

        create_variants(
            &backend,
            &tmp.path().join("photo.jpg"),
            tmp.path(),
            "photo",
            &VariantConfig::default(),
        )
        .unwrap();

        assert_eq!(backend.encodes(), vec![RecordedOp::Encode {
            output: tmp.path().join("photo@2x.jpg").to_string_lossy().to_string(),
            format: OutputFormat::Jpeg,
            width: 240,
            height: 180,
            quality: 85,
        }]);
    }

    #[test]
    fn create_variants_all_existing_skips_decode() {
        let tmp = TempDir::new().unwrap();
        for name in ["photo.webp", "photo-2x.webp", "photo@2x.jpg"] {
            std::fs::write(tmp.path().join(name), b"").unwrap();
        }
        let backend = MockBackend::new();

        let report = create_variants(
            &backend,
            &tmp.path().join("photo.jpg"),
            tmp.path(),
            "photo",
            &VariantConfig::default(),
        )
        .unwrap();

        assert_eq!(report.dimensions, None);
        assert_eq!(report.created(), 0);
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn create_variants_propagates_decode_failure() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new().failing_on("broken");

        let result = create_variants(
            &backend,
            &tmp.path().join("broken.jpg"),
            tmp.path(),
            "broken",
            &VariantConfig::default(),
        );
        assert!(result.is_err());
        assert!(backend.encodes().is_empty());
    }
}
