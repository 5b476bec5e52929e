//! Page allow-list
//!
//! Maps each registered page identifier to its content fragment on disk.
//! Request parameters are only ever used as lookup keys, never as path segments.

use super::SiteError;
use crate::config::SiteConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Outcome of looking up a requested page identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Registered page and the fragment file backing it
    Page { id: &'a str, fragment: &'a Path },
    /// Identifier that is not in the allow-list
    Unknown(String),
}

/// Registered pages, built once at startup
#[derive(Debug, Clone)]
pub struct PageRegistry {
    pages: HashMap<String, PathBuf>,
    default_page: String,
}

impl PageRegistry {
    pub fn from_config(site: &SiteConfig) -> Result<Self, SiteError> {
        let ext = site.fragment_extension.trim_start_matches('.');
        if ext.is_empty() || ext.contains(['/', '\\']) {
            return Err(SiteError::InvalidExtension(site.fragment_extension.clone()));
        }

        let content_dir = Path::new(&site.content_dir);
        let mut pages = HashMap::with_capacity(site.pages.len());
        for id in &site.pages {
            if !is_valid_page_id(id) {
                return Err(SiteError::InvalidPageId(id.clone()));
            }
            let fragment = content_dir.join(format!("{id}.{ext}"));
            if pages.insert(id.clone(), fragment).is_some() {
                return Err(SiteError::DuplicatePage(id.clone()));
            }
        }

        if !pages.contains_key(&site.default_page) {
            return Err(SiteError::UnknownDefaultPage(site.default_page.clone()));
        }

        Ok(Self {
            pages,
            default_page: site.default_page.clone(),
        })
    }

    /// Resolve a requested identifier; absent or empty selects the default page
    pub fn resolve(&self, requested: Option<&str>) -> Resolution<'_> {
        let id = match requested {
            Some(id) if !id.is_empty() => id,
            _ => self.default_page.as_str(),
        };

        match self.pages.get_key_value(id) {
            Some((id, fragment)) => Resolution::Page {
                id: id.as_str(),
                fragment: fragment.as_path(),
            },
            None => Resolution::Unknown(id.to_string()),
        }
    }

    pub fn default_page(&self) -> &str {
        &self.default_page
    }

    /// Registered identifiers with their fragment paths, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.pages
            .iter()
            .map(|(id, fragment)| (id.as_str(), fragment.as_path()))
    }
}

fn is_valid_page_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_config(pages: &[&str]) -> SiteConfig {
        SiteConfig {
            content_dir: "content".to_string(),
            pages: pages.iter().map(ToString::to_string).collect(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_default_pages() {
        let registry = PageRegistry::from_config(&SiteConfig::default()).unwrap();
        let mut ids: Vec<_> = registry.iter().map(|(id, _)| id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["home", "manual", "publication"]);
        assert_eq!(registry.default_page(), "home");

        let mut fragments: Vec<_> = registry.iter().map(|(_, path)| path.to_path_buf()).collect();
        fragments.sort();
        assert_eq!(
            fragments,
            vec![
                PathBuf::from("content/home.ih"),
                PathBuf::from("content/manual.ih"),
                PathBuf::from("content/publication.ih"),
            ]
        );
    }

    #[test]
    fn test_resolve_registered_page() {
        let registry = PageRegistry::from_config(&SiteConfig::default()).unwrap();
        assert_eq!(
            registry.resolve(Some("manual")),
            Resolution::Page {
                id: "manual",
                fragment: Path::new("content/manual.ih"),
            }
        );
    }

    #[test]
    fn test_resolve_absent_or_empty_uses_default() {
        let registry = PageRegistry::from_config(&SiteConfig::default()).unwrap();
        let home = registry.resolve(Some("home"));
        assert_eq!(registry.resolve(None), home);
        assert_eq!(registry.resolve(Some("")), home);
    }

    #[test]
    fn test_resolve_unknown_and_traversal() {
        let registry = PageRegistry::from_config(&SiteConfig::default()).unwrap();
        assert_eq!(
            registry.resolve(Some("downloads")),
            Resolution::Unknown("downloads".to_string())
        );
        assert_eq!(
            registry.resolve(Some("../../etc/passwd")),
            Resolution::Unknown("../../etc/passwd".to_string())
        );
        // Lookup is exact, no trimming or case folding
        assert!(matches!(registry.resolve(Some("Home")), Resolution::Unknown(_)));
        assert!(matches!(registry.resolve(Some(" home")), Resolution::Unknown(_)));
    }

    #[test]
    fn test_extension_leading_dot_is_ignored() {
        let mut site = site_config(&["home"]);
        site.fragment_extension = ".html".to_string();
        let registry = PageRegistry::from_config(&site).unwrap();
        assert_eq!(
            registry.resolve(None),
            Resolution::Page {
                id: "home",
                fragment: Path::new("content/home.html"),
            }
        );
    }

    #[test]
    fn test_invalid_configuration() {
        assert_eq!(
            PageRegistry::from_config(&site_config(&["home", "../x"])).unwrap_err(),
            SiteError::InvalidPageId("../x".to_string())
        );
        assert_eq!(
            PageRegistry::from_config(&site_config(&["home", ""])).unwrap_err(),
            SiteError::InvalidPageId(String::new())
        );
        assert_eq!(
            PageRegistry::from_config(&site_config(&["home", "home"])).unwrap_err(),
            SiteError::DuplicatePage("home".to_string())
        );
        assert_eq!(
            PageRegistry::from_config(&site_config(&["manual"])).unwrap_err(),
            SiteError::UnknownDefaultPage("home".to_string())
        );

        let mut site = site_config(&["home"]);
        site.fragment_extension = "ih/x".to_string();
        assert!(matches!(
            PageRegistry::from_config(&site),
            Err(SiteError::InvalidExtension(_))
        ));
    }
}
