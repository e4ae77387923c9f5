//! Site configuration module.
//!
//! Handles loading and validating the optional `config.toml` in the
//! site root. Every key has a default, so a site without a config file serves
//! on `0.0.0.0:5000` and generates variants in `static/images/` at the stock
//! qualities.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Portfolio"
//! author = "Jane Doe"
//! email = "hello@example.com"
//! hero_image = ""           # File name inside images.dir; empty = no hero
//!
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//! static_dir = "static"     # Served under /static/
//! workers = 4               # Request workers (omit for auto = CPU cores)
//!
//! [images]
//! dir = "static/images"
//! quality = 85              # <name>.webp and <name>@2x.jpg
//! quality_2x = 80           # <name>-2x.webp
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [server]
//! port = 8080
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Identity shown in page titles, header, and contact page.
    pub site: SiteInfo,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Image variant generation settings.
    pub images: ImagesConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.title must not be empty".into(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port must be non-zero".into(),
            ));
        }
        if self.server.workers == Some(0) {
            return Err(ConfigError::Validation(
                "server.workers must be at least 1".into(),
            ));
        }
        for (key, value) in [
            ("images.quality", self.images.quality),
            ("images.quality_2x", self.images.quality_2x),
        ] {
            if !(1..=100).contains(&value) {
                return Err(ConfigError::Validation(format!("{key} must be 1-100")));
            }
        }
        Ok(())
    }

    /// Resolve the configured paths against the site root.
    ///
    /// Absolute paths in the config are kept as they are.
    pub fn rooted_at(mut self, root: &Path) -> Self {
        self.server.static_dir = root.join(&self.server.static_dir);
        self.images.dir = root.join(&self.images.dir);
        self
    }
}

/// Who the site belongs to.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub title: String,
    pub author: String,
    pub email: String,
    /// Source image shown on the home page, e.g. `portrait.jpg`.
    pub hero_image: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            author: "Jane Doe".to_string(),
            email: "hello@example.com".to_string(),
            hero_image: String::new(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Directory served under `/static/`.
    pub static_dir: PathBuf,
    /// Number of request worker threads.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            static_dir: PathBuf::from("static"),
            workers: None,
        }
    }
}

/// Resolve the effective worker count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_workers(config: &ServerConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.workers.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Image variant generation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Directory holding the source images; variants are written next to them.
    pub dir: PathBuf,
    /// Quality of the same-size WebP and the 2x JPEG.
    pub quality: u32,
    /// Quality of the 2x WebP.
    pub quality_2x: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("static/images"),
            quality: 85,
            quality_2x: 80,
        }
    }
}

// =============================================================================
// Config loading
// =============================================================================

/// Name of the config file looked up in the site root.
pub const CONFIG_FILE: &str = "config.toml";

/// Parse a `config.toml` document and validate it.
///
/// Omitted sections and keys take their defaults; unknown keys are errors.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Without a file the defaults apply. Relative paths stay relative; call
/// [`SiteConfig::rooted_at`] to anchor them.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(SiteConfig::default());
    }
    parse_config(&fs::read_to_string(&config_path)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Shown in the page header and every <title>.
title = "Portfolio"
author = "Jane Doe"
# Rendered as a mailto: link on the contact page.
email = "hello@example.com"
# Source image (file name inside images.dir) shown on the home page.
# Run `folio images` first so its .webp and 2x variants exist.
hero_image = ""

# ---------------------------------------------------------------------------
# HTTP server
# ---------------------------------------------------------------------------
[server]
host = "0.0.0.0"
port = 5000
# Directory served under /static/.
static_dir = "static"
# Request worker threads. Omit to use one per CPU core.
# workers = 4

# ---------------------------------------------------------------------------
# Image variants
# ---------------------------------------------------------------------------
[images]
# Source images; variants are written into the same directory.
dir = "static/images"
# WebP/JPEG quality (1 = worst, 100 = best) for <name>.webp and <name>@2x.jpg.
quality = 85
# WebP quality for <name>-2x.webp.
quality_2x = 80
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_stock_values() {
        let config = SiteConfig::default();
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.images.dir, PathBuf::from("static/images"));
        assert_eq!(config.images.quality, 85);
        assert_eq!(config.images.quality_2x, 80);
        assert!(config.site.hero_image.is_empty());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[server]
port = 8080
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        // Defaults preserved
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.images.quality, 85);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.site.title, "Portfolio");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[site]
title = "Field Notes"
hero_image = "portrait.jpg"

[images]
quality_2x = 70
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Field Notes");
        assert_eq!(config.site.hero_image, "portrait.jpg");
        assert_eq!(config.images.quality_2x, 70);
        // Unspecified values should be defaults
        assert_eq!(config.images.quality, 85);
        assert_eq!(config.site.author, "Jane Doe");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn host_parses_ipv6() {
        let config: SiteConfig = toml::from_str("[server]\nhost = \"::1\"\n").unwrap();
        assert!(config.server.host.is_ipv6());
    }

    #[test]
    fn rooted_at_joins_relative_paths() {
        let config = SiteConfig::default().rooted_at(Path::new("/srv/site"));
        assert_eq!(config.server.static_dir, PathBuf::from("/srv/site/static"));
        assert_eq!(config.images.dir, PathBuf::from("/srv/site/static/images"));
    }

    #[test]
    fn rooted_at_keeps_absolute_paths() {
        let mut config = SiteConfig::default();
        config.images.dir = PathBuf::from("/data/photos");
        let config = config.rooted_at(Path::new("/srv/site"));
        assert_eq!(config.images.dir, PathBuf::from("/data/photos"));
    }

    #[test]
    fn sparse_section_keeps_sibling_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[images]\nquality = 70\n").unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.images.quality, 70);
        assert_eq!(config.images.quality_2x, 80);
        assert_eq!(config.images.dir, PathBuf::from("static/images"));
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn empty_document_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config.site.title, "Portfolio");
        assert_eq!(config.server.workers, None);
    }

    // =========================================================================
    // Unknown key rejection and validation
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[images]\nqualty = 90\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[imagez]\nquality = 90\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[server]\nprot = 1\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_quality_out_of_range() {
        let mut config = SiteConfig::default();
        config.images.quality_2x = 0;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("images.quality_2x"));

        let mut config = SiteConfig::default();
        config.images.quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_port_zero() {
        let mut config = SiteConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_workers() {
        let mut config = SiteConfig::default();
        config.server.workers = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[images]\nquality = 200\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let parsed: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(parsed.server.port, defaults.server.port);
        assert_eq!(parsed.images.dir, defaults.images.dir);
        assert_eq!(parsed.images.quality_2x, defaults.images.quality_2x);
        assert_eq!(parsed.site.title, defaults.site.title);
    }

    #[test]
    fn effective_workers_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ServerConfig {
            workers: Some(cores + 100),
            ..ServerConfig::default()
        };
        assert_eq!(effective_workers(&config), cores);
        assert_eq!(effective_workers(&ServerConfig::default()), cores);
    }
}
