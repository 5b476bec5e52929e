//! Site error types

use std::fmt;

/// Errors raised while building the page allow-list from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    /// A configured page identifier contains characters outside `[A-Za-z0-9_-]`
    InvalidPageId(String),
    /// The same identifier is registered twice
    DuplicatePage(String),
    /// The default page is not part of the allow-list
    UnknownDefaultPage(String),
    /// The fragment extension is empty or contains a path separator
    InvalidExtension(String),
}

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPageId(id) => write!(f, "invalid page identifier: '{id}'"),
            Self::DuplicatePage(id) => write!(f, "page '{id}' is registered more than once"),
            Self::UnknownDefaultPage(id) => {
                write!(f, "default page '{id}' is not in the page list")
            }
            Self::InvalidExtension(ext) => write!(f, "invalid fragment extension: '{ext}'"),
        }
    }
}

impl std::error::Error for SiteError {}
