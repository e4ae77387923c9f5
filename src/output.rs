//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure — no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Images
//!
//! ```text
//! Processing 2 images in static/images
//! Skipping unsupported file: notes.txt
//! 001 portrait.jpg (640x800)
//!     Created portrait.webp
//!     Created portrait-2x.webp
//!     Exists portrait@2x.jpg, skipping
//! 002 team.png
//!     Failed: Processing failed: Failed to decode ...
//! Done: 1 images, 2 variants created, 1 already present, 1 skipped, 1 failed
//! ```
//!
//! ## Routes
//!
//! ```text
//! /                      → index.html
//! /index.html            → index.html
//! /about.html            → about.html
//! ```
//!
//! ## Serve
//!
//! ```text
//! ==> Serving Portfolio on http://0.0.0.0:5000 (4 workers)
//! GET /about 200
//! GET /missing 404
//! ```

use crate::imaging::VariantStatus;
use crate::process::{ProcessEvent, ProcessSummary};
use crate::routes::Route;
use std::net::SocketAddr;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// Images
// ============================================================================

/// Format a single processing event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started { dir, image_count } => match image_count {
            0 => vec![format!("No images found to process in {}", dir.display())],
            1 => vec![format!("Processing 1 image in {}", dir.display())],
            n => vec![format!("Processing {} images in {}", n, dir.display())],
        },
        ProcessEvent::Skipped { file_name } => {
            vec![format!("Skipping unsupported file: {}", file_name)]
        }
        ProcessEvent::ImageProcessed {
            index,
            file_name,
            report,
        } => {
            let mut lines = Vec::with_capacity(report.variants.len() + 1);
            let header = match report.dimensions {
                Some(d) => format!(
                    "{} {} ({}x{})",
                    format_index(*index),
                    file_name,
                    d.width,
                    d.height
                ),
                None => format!("{} {}", format_index(*index), file_name),
            };
            lines.push(header);
            for variant in &report.variants {
                let line = match variant.status {
                    VariantStatus::Created => format!("Created {}", variant.file_name),
                    VariantStatus::Exists => format!("Exists {}, skipping", variant.file_name),
                };
                lines.push(format!("{}{}", indent(1), line));
            }
            lines
        }
        ProcessEvent::Failed {
            index,
            file_name,
            error,
        } => vec![
            format!("{} {}", format_index(*index), file_name),
            format!("{}Failed: {}", indent(1), error),
        ],
    }
}

/// Format the closing line of an images run.
pub fn format_process_summary(summary: &ProcessSummary) -> String {
    format!("Done: {}", summary)
}

// ============================================================================
// Routes
// ============================================================================

/// Format the route table, one path per line, aligned on the arrow.
pub fn format_routes(routes: &[Route]) -> Vec<String> {
    let width = routes.iter().map(|r| r.path.len()).max().unwrap_or(0);
    routes
        .iter()
        .map(|r| {
            format!(
                "{:<width$} \u{2192} {}",
                r.path,
                r.page.template_name(),
                width = width
            )
        })
        .collect()
}

pub fn print_routes(routes: &[Route]) {
    for line in format_routes(routes) {
        println!("{}", line);
    }
}

// ============================================================================
// Serve
// ============================================================================

/// Startup banner for the HTTP server.
pub fn format_serve_banner(title: &str, addr: SocketAddr, workers: usize) -> String {
    let plural = if workers == 1 { "worker" } else { "workers" };
    format!(
        "==> Serving {} on http://{} ({} {})",
        title, addr, workers, plural
    )
}

/// One access-log line per handled request.
pub fn format_request(method: &str, url: &str, status: u16) -> String {
    format!("{} {} {}", method, url, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{Dimensions, VariantInfo, VariantReport};
    use crate::routes::{Page, ROUTES};
    use std::path::PathBuf;

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn format_started_empty_directory() {
        let lines = format_process_event(&ProcessEvent::Started {
            dir: PathBuf::from("static/images"),
            image_count: 0,
        });
        assert_eq!(lines, vec!["No images found to process in static/images"]);
    }

    #[test]
    fn format_started_counts() {
        let one = format_process_event(&ProcessEvent::Started {
            dir: PathBuf::from("img"),
            image_count: 1,
        });
        assert_eq!(one, vec!["Processing 1 image in img"]);
        let many = format_process_event(&ProcessEvent::Started {
            dir: PathBuf::from("img"),
            image_count: 3,
        });
        assert_eq!(many, vec!["Processing 3 images in img"]);
    }

    #[test]
    fn format_skipped() {
        let lines = format_process_event(&ProcessEvent::Skipped {
            file_name: "notes.txt".into(),
        });
        assert_eq!(lines, vec!["Skipping unsupported file: notes.txt"]);
    }

    #[test]
    fn format_image_processed() {
        let event = ProcessEvent::ImageProcessed {
            index: 1,
            file_name: "portrait.jpg".into(),
            report: VariantReport {
                dimensions: Some(Dimensions {
                    width: 640,
                    height: 800,
                }),
                variants: vec![
                    VariantInfo {
                        file_name: "portrait.webp".into(),
                        status: VariantStatus::Created,
                    },
                    VariantInfo {
                        file_name: "portrait@2x.jpg".into(),
                        status: VariantStatus::Exists,
                    },
                ],
            },
        };
        assert_eq!(format_process_event(&event), vec![
            "001 portrait.jpg (640x800)",
            "    Created portrait.webp",
            "    Exists portrait@2x.jpg, skipping",
        ]);
    }

    #[test]
    fn format_image_processed_without_decode_omits_dimensions() {
        let event = ProcessEvent::ImageProcessed {
            index: 12,
            file_name: "a.png".into(),
            report: VariantReport {
                dimensions: None,
                variants: vec![],
            },
        };
        assert_eq!(format_process_event(&event), vec!["012 a.png"]);
    }

    #[test]
    fn format_failed() {
        let event = ProcessEvent::Failed {
            index: 2,
            file_name: "team.png".into(),
            error: "boom".into(),
        };
        assert_eq!(format_process_event(&event), vec![
            "002 team.png",
            "    Failed: boom"
        ]);
    }

    #[test]
    fn format_summary_line() {
        let summary = ProcessSummary {
            images: 1,
            created: 3,
            ..ProcessSummary::default()
        };
        assert_eq!(
            format_process_summary(&summary),
            "Done: 1 images, 3 variants created, 0 already present, 0 skipped, 0 failed"
        );
    }

    #[test]
    fn format_routes_aligns_arrows() {
        let routes = [
            Route {
                path: "/",
                page: Page::Home,
            },
            Route {
                path: "/about.html",
                page: Page::About,
            },
        ];
        assert_eq!(format_routes(&routes), vec![
            "/           \u{2192} index.html",
            "/about.html \u{2192} about.html",
        ]);
    }

    #[test]
    fn format_routes_covers_table() {
        assert_eq!(format_routes(ROUTES).len(), ROUTES.len());
    }

    #[test]
    fn serve_banner() {
        let addr: SocketAddr = "0.0.0.0:5000".parse().unwrap();
        assert_eq!(
            format_serve_banner("Portfolio", addr, 4),
            "==> Serving Portfolio on http://0.0.0.0:5000 (4 workers)"
        );
        assert!(format_serve_banner("P", addr, 1).ends_with("(1 worker)"));
    }

    #[test]
    fn request_line() {
        assert_eq!(format_request("GET", "/about", 200), "GET /about 200");
    }
}
