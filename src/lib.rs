//! # Folio
//!
//! A small personal portfolio website served by a single binary, plus an
//! offline job that prepares the site's photographs for high-density screens.
//!
//! # Two Programs, One Binary
//!
//! ```text
//! folio            serve the six pages on 0.0.0.0:5000
//! folio images     write WebP and 2x variants next to every JPEG/PNG
//! ```
//!
//! The two halves share nothing at runtime. The server never touches images
//! beyond serving files from `static/`, and the image job never renders HTML.
//! They meet only in the variant naming convention ([`naming`]), which the
//! hero `<picture>` uses to find the files the job wrote.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`routes`] | Fixed route table: canonical `.html` paths and short aliases |
//! | [`pages`] | Renders every page once with Maud, prose from embedded markdown |
//! | [`server`] | `tiny_http` listener with a rayon worker pool |
//! | [`process`] | Batch variant generation over one directory |
//! | [`imaging`] | Decode, Lanczos3 2x resample, WebP/JPEG encode |
//! | [`naming`] | Source/derived file classification and variant file names |
//! | [`config`] | Optional `config.toml`: defaults and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Render Once, Serve Many
//!
//! Page content is compiled into the binary and depends only on config, so
//! every page is rendered at startup into a string. Request handling is a
//! table lookup plus a copy; workers share the rendered site behind an `Arc`
//! and never lock.
//!
//! ## Idempotent Variants
//!
//! The image job never overwrites a file. A second run over the same
//! directory reads nothing but the listing and writes nothing, so it can run
//! on every deploy.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod pages;
pub mod process;
pub mod routes;
pub mod server;
