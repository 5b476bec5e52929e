// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level for non-access messages (error, warn, info, debug)
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Routes configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RoutesConfig {
    /// Request paths answered with the rendered page
    #[serde(default = "default_page_paths")]
    pub page_paths: Vec<String>,
    #[serde(default)]
    pub health: HealthConfig,
}

fn default_page_paths() -> Vec<String> {
    vec![
        "/".to_string(),
        "/index.php".to_string(),
        "/index.html".to_string(),
    ]
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            page_paths: default_page_paths(),
            health: HealthConfig::default(),
        }
    }
}

/// Health check configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

fn default_healthz_path() -> String {
    "/healthz".to_string()
}

fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}

/// Documentation site configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding one fragment file per page
    pub content_dir: String,
    /// Fragment file extension, without the dot
    pub fragment_extension: String,
    /// Page rendered when the request names none
    pub default_page: String,
    /// Allow-list of page identifiers
    pub pages: Vec<String>,
    /// Directory for stylesheets, images and the API reference (optional)
    pub static_dir: Option<String>,
    pub chrome: ChromeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: "content".to_string(),
            fragment_extension: "ih".to_string(),
            default_page: "home".to_string(),
            pages: vec![
                "home".to_string(),
                "publication".to_string(),
                "manual".to_string(),
            ],
            static_dir: None,
            chrome: ChromeConfig::default(),
        }
    }
}

/// Static page chrome shared by every page
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChromeConfig {
    pub title: String,
    pub language: String,
    pub author: String,
    pub keywords: String,
    pub description: String,
    pub favicon: String,
    pub stylesheets: Vec<String>,
    pub menu: Vec<MenuEntry>,
    pub footer: String,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            title: "D3, Dynamic and Decentralized Distribution".to_string(),
            language: "fr".to_string(),
            author: "Guilhelm Savin".to_string(),
            keywords: "guilhelm savin d3 distribution middleware".to_string(),
            description: String::new(),
            favicon: "/img/favicon.png".to_string(),
            stylesheets: vec!["/d3.css".to_string(), "/rst.css".to_string()],
            menu: vec![
                MenuEntry::link("Home", "/index.php?page=home"),
                MenuEntry::link("Publications", "/index.php?page=publication"),
                MenuEntry::link("Manual", "/index.php?page=manual"),
                MenuEntry::link("API", "/api/index.html"),
                MenuEntry::text("Downloads"),
                MenuEntry::link("d3 @ github", "http://github.com/gsavin/d3"),
            ],
            footer: "Copyright (C) 2010 - Guilhelm Savin ( guilhelm [dot] savin [at] litislab.fr )"
                .to_string(),
        }
    }
}

/// Menu bar entry; entries without `href` render as plain text
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    #[serde(default)]
    pub href: Option<String>,
}

impl MenuEntry {
    pub fn link(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: Some(href.to_string()),
        }
    }

    pub fn text(label: &str) -> Self {
        Self {
            label: label.to_string(),
            href: None,
        }
    }
}
