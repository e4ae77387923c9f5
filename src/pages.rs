//! HTML page rendering.
//!
//! Every page is rendered once at startup into a string; requests only ever
//! read the result.
//!
//! ## Page Structure
//!
//! - **Header**: site title plus navigation; the current page is marked.
//! - **Main**: page prose, written in markdown under `content/` and embedded
//!   at compile time.
//! - **Footer**: copyright line and the privacy (Datenschutz) link.
//!
//! The home page can additionally show a hero image. It is rendered as a
//! `<picture>` that prefers the generated WebP variants and falls back to the
//! original with its `@2x` JPEG, listing only variants that exist on disk.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time and inlined into every page:
//! - `assets/style.css`: layout and colors, light and dark
//! - `assets/motion.js`: reduced-motion toggle remembered in `localStorage`
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config::SiteConfig;
use crate::imaging::{Dimensions, RustBackend, get_dimensions};
use crate::naming::{EntryKind, classify, variant_names};
use crate::routes::Page;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use pulldown_cmark::{Parser, html as md_html};
use std::collections::BTreeMap;
use std::path::Path;

const CSS: &str = include_str!("../assets/style.css");
const JS: &str = include_str!("../assets/motion.js");

const HOME_MD: &str = include_str!("../content/index.md");
const ABOUT_MD: &str = include_str!("../content/about.md");
const PROJECTS_MD: &str = include_str!("../content/projects.md");
const RESEARCH_MD: &str = include_str!("../content/research.md");
const CONTACT_MD: &str = include_str!("../content/contact.md");
const PRIVACY_MD: &str = include_str!("../content/datenschutz.md");

/// Bytes left unescaped in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'@');

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Markdown source of a page's main content.
fn page_markdown(page: Page) -> &'static str {
    match page {
        Page::Home => HOME_MD,
        Page::About => ABOUT_MD,
        Page::Projects => PROJECTS_MD,
        Page::Research => RESEARCH_MD,
        Page::Contact => CONTACT_MD,
        Page::Privacy => PRIVACY_MD,
    }
}

fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

/// A hero image whose variants can be served under `/static/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroImage {
    /// URL of the directory holding the image, percent-encoded, without
    /// trailing slash.
    pub base_url: String,
    /// Source file name, e.g. `portrait.jpg`.
    pub file_name: String,
    pub alt: String,
    pub dimensions: Option<Dimensions>,
    /// `<name>.webp` and `<name>-2x.webp` both exist.
    pub has_webp: bool,
    /// `<name>@2x.jpg` exists.
    pub has_jpeg_2x: bool,
}

impl HeroImage {
    /// Locate the configured hero image.
    ///
    /// Returns `None` when no hero is configured, the file is not a source
    /// image, it does not exist, or the images directory is not inside the
    /// static directory (it could not be served).
    pub fn from_config(config: &SiteConfig) -> Option<Self> {
        let file_name = config.site.hero_image.trim();
        if file_name.is_empty() {
            return None;
        }
        let images_dir = &config.images.dir;
        let source = images_dir.join(file_name);
        let EntryKind::Source { stem } = classify(&source) else {
            return None;
        };
        if !source.is_file() {
            return None;
        }

        let relative = images_dir.strip_prefix(&config.server.static_dir).ok()?;
        let mut base_url = String::from("/static");
        for part in relative.iter() {
            base_url.push('/');
            base_url.push_str(&encode_segment(&part.to_string_lossy()));
        }

        let names = variant_names(&stem);
        let exists = |name: &str| images_dir.join(name).is_file();
        let dimensions = get_dimensions(&RustBackend::new(), &source)
            .ok()
            .map(|(width, height)| Dimensions { width, height });

        Some(Self {
            base_url,
            file_name: file_name.to_string(),
            alt: config.site.author.clone(),
            dimensions,
            has_webp: exists(&names.webp) && exists(&names.webp_2x),
            has_jpeg_2x: exists(&names.jpeg_2x),
        })
    }

    fn url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, encode_segment(name))
    }
}

/// Render every page of the site.
pub fn render_site(config: &SiteConfig) -> BTreeMap<Page, String> {
    let hero = HeroImage::from_config(config);
    Page::ALL
        .into_iter()
        .map(|page| (page, render_page(page, config, hero.as_ref()).into_string()))
        .collect()
}

/// Render a single page.
pub fn render_page(page: Page, config: &SiteConfig, hero: Option<&HeroImage>) -> Markup {
    let body = PreEscaped(markdown_to_html(page_markdown(page)));
    let content = match page {
        Page::Home => html! {
            @if let Some(hero) = hero {
                (render_hero(hero))
            }
            (body)
        },
        Page::Contact => html! {
            (body)
            p.contact-email {
                a href={ "mailto:" (config.site.email) } { (config.site.email) }
            }
        },
        _ => body,
    };

    let title = match page {
        Page::Home => config.site.title.clone(),
        _ => format!("{} · {}", page.label(), config.site.title),
    };

    base_document(
        &title,
        html! {
            (site_header(&config.site.title, page))
            main class={ "page-content page-" (page_slug(page)) } {
                (content)
            }
            (site_footer(&config.site.author))
        },
    )
}

/// Body class suffix for a page, e.g. `page-about`.
fn page_slug(page: Page) -> &'static str {
    page.template_name().trim_end_matches(".html")
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Renders the site header with title and navigation
fn site_header(site_title: &str, current: Page) -> Markup {
    html! {
        header.site-header {
            div.header-wrapper {
                a.site-title href="/" { (site_title) }
                nav.site-nav {
                    (render_nav(current))
                }
                div.control-group {}
            }
        }
    }
}

/// Renders the navigation list, marking the current page
pub fn render_nav(current: Page) -> Markup {
    html! {
        ul {
            @for page in Page::ALL.into_iter().filter(|p| p.in_nav()) {
                @let is_current = page == current;
                li class=[is_current.then_some("current")] {
                    a href=(page.href()) aria-current=[is_current.then_some("page")] {
                        (page.label())
                    }
                }
            }
        }
    }
}

fn site_footer(author: &str) -> Markup {
    html! {
        footer.site-footer {
            span { "© " (author) }
            a href=(Page::Privacy.href()) { (Page::Privacy.label()) }
        }
    }
}

/// Renders the hero `<picture>` with whichever variants exist
fn render_hero(hero: &HeroImage) -> Markup {
    let stem = Path::new(&hero.file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let names = variant_names(&stem);
    let fallback_srcset = hero
        .has_jpeg_2x
        .then(|| format!("{} 2x", hero.url(&names.jpeg_2x)));

    html! {
        figure.hero {
            picture {
                @if hero.has_webp {
                    source type="image/webp"
                        srcset={ (hero.url(&names.webp)) " 1x, " (hero.url(&names.webp_2x)) " 2x" };
                }
                img src=(hero.url(&hero.file_name))
                    srcset=[fallback_srcset]
                    alt=(hero.alt)
                    width=[hero.dimensions.map(|d| d.width)]
                    height=[hero.dimensions.map(|d| d.height)]
                    decoding="async";
            }
        }
    }
}
