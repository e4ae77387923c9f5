//! The fixed route table.
//!
//! Every page is reachable under its canonical `.html` path and a short
//! alias without the extension; the home page additionally answers on `/`.
//! The table is static and never changes at runtime.

/// The pages the site serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Page {
    Home,
    About,
    Projects,
    Research,
    Contact,
    Privacy,
}

impl Page {
    /// All pages, in navigation order.
    pub const ALL: [Page; 6] = [
        Page::Home,
        Page::About,
        Page::Projects,
        Page::Research,
        Page::Contact,
        Page::Privacy,
    ];

    /// Template identifier, which doubles as the canonical file name.
    pub fn template_name(self) -> &'static str {
        match self {
            Page::Home => "index.html",
            Page::About => "about.html",
            Page::Projects => "projects.html",
            Page::Research => "research.html",
            Page::Contact => "contact.html",
            Page::Privacy => "datenschutz.html",
        }
    }

    /// Canonical URL used in links.
    pub fn href(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::About => "/about.html",
            Page::Projects => "/projects.html",
            Page::Research => "/research.html",
            Page::Contact => "/contact.html",
            Page::Privacy => "/datenschutz.html",
        }
    }

    /// Label shown in navigation.
    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::About => "About",
            Page::Projects => "Projects",
            Page::Research => "Research",
            Page::Contact => "Contact",
            Page::Privacy => "Datenschutz",
        }
    }

    /// Whether the page appears in the header navigation.
    /// The privacy page is linked from the footer only.
    pub fn in_nav(self) -> bool {
        self != Page::Privacy
    }
}

/// A URL path bound to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub page: Page,
}

const fn route(path: &'static str, page: Page) -> Route {
    Route { path, page }
}

/// Every path the site answers, in registration order.
pub const ROUTES: &[Route] = &[
    route("/", Page::Home),
    route("/index.html", Page::Home),
    route("/about.html", Page::About),
    route("/projects.html", Page::Projects),
    route("/research.html", Page::Research),
    route("/contact.html", Page::Contact),
    route("/datenschutz.html", Page::Privacy),
    route("/about", Page::About),
    route("/projects", Page::Projects),
    route("/research", Page::Research),
    route("/contact", Page::Contact),
    route("/datenschutz", Page::Privacy),
];

/// Strip the query string and fragment from a request target.
pub fn request_path(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// Look up the page for a request target. Matching is exact and
/// case-sensitive; a trailing slash is a different path.
pub fn resolve(url: &str) -> Option<Page> {
    let path = request_path(url);
    ROUTES.iter().find(|r| r.path == path).map(|r| r.page)
}
