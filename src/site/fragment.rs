//! Content fragment loading
//!
//! A fragment is read once per request and embedded verbatim. Any failure to
//! produce it leaves the content slot empty.

use super::Resolution;
use std::io::ErrorKind;
use tokio::fs;

/// Why the content slot is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// Requested identifier is not in the allow-list
    UnknownPage,
    /// Fragment file does not exist
    Missing,
    /// Fragment exists but could not be read
    Unreadable,
}

/// Content embedded in the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Content(String),
    Empty(EmptyReason),
}

impl Fragment {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Content(text) => text,
            Self::Empty(_) => "",
        }
    }
}

/// Load the fragment for a resolved page
pub async fn load_fragment(resolution: &Resolution<'_>) -> Fragment {
    let (id, path) = match resolution {
        Resolution::Page { id, fragment } => (*id, *fragment),
        Resolution::Unknown(_) => return Fragment::Empty(EmptyReason::UnknownPage),
    };

    match fs::read(path).await {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Fragment::Content(text),
            Err(e) => {
                crate::logger::log_warning(&format!(
                    "Fragment '{}' for page '{id}' is not valid UTF-8, replacing invalid bytes",
                    path.display()
                ));
                Fragment::Content(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => Fragment::Empty(EmptyReason::Missing),
        Err(e) => {
            crate::logger::log_error(&format!(
                "Failed to read fragment '{}' for page '{id}': {e}",
                path.display()
            ));
            Fragment::Empty(EmptyReason::Unreadable)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[tokio::test]
    async fn test_load_existing_fragment_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manual.ih");
        let markup = "<h1>Manual</h1>\n<p>Use <code>d3</code> &amp; enjoy</p>\n";
        std::fs::write(&path, markup).unwrap();

        let fragment = load_fragment(&Resolution::Page {
            id: "manual",
            fragment: &path,
        })
        .await;
        assert_eq!(fragment, Fragment::Content(markup.to_string()));
        assert_eq!(fragment.as_str(), markup);
    }

    #[tokio::test]
    async fn test_missing_fragment_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("home.ih");
        let fragment = load_fragment(&Resolution::Page {
            id: "home",
            fragment: &path,
        })
        .await;
        assert_eq!(fragment, Fragment::Empty(EmptyReason::Missing));
        assert_eq!(fragment.as_str(), "");
    }

    #[tokio::test]
    async fn test_unknown_page_is_empty_without_io() {
        let fragment = load_fragment(&Resolution::Unknown("nope".to_string())).await;
        assert_eq!(fragment, Fragment::Empty(EmptyReason::UnknownPage));
    }

    #[tokio::test]
    async fn test_directory_in_place_of_fragment_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("home.ih");
        std::fs::create_dir(&path).unwrap();
        let fragment = load_fragment(&Resolution::Page {
            id: "home",
            fragment: Path::new(&path),
        })
        .await;
        assert_eq!(fragment, Fragment::Empty(EmptyReason::Unreadable));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_embedded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("publication.ih");
        std::fs::write(&path, b"<p>a\xffb</p>").unwrap();

        let fragment = load_fragment(&Resolution::Page {
            id: "publication",
            fragment: &path,
        })
        .await;
        assert_eq!(fragment, Fragment::Content("<p>a\u{fffd}b</p>".to_string()));
    }
}
