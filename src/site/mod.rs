//! Documentation page rendering
//!
//! A page is the shared shell with one content fragment embedded in it. The
//! fragment is chosen by the `page` request parameter through the allow-list
//! in [`PageRegistry`]; unknown identifiers and missing files render an empty
//! content slot.

mod error;
mod fragment;
mod registry;
mod shell;

pub use error::SiteError;
pub use fragment::{load_fragment, EmptyReason, Fragment};
pub use registry::{PageRegistry, Resolution};
pub use shell::PageShell;

use crate::config::AppState;
use crate::logger;

/// Name of the query parameter selecting the page
pub const PAGE_PARAM: &str = "page";

/// Result of rendering one page request
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Identifier that was looked up (the default page when none was given)
    pub page: String,
    pub fragment: Fragment,
    pub html: String,
}

/// Extract the `page` parameter from a raw query string.
///
/// Values are form-decoded. When the parameter repeats, the last value wins.
pub fn page_param(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .filter(|(key, _)| key == PAGE_PARAM)
        .map(|(_, value)| value.into_owned())
        .last()
}

/// Render the page selected by `requested`
pub async fn render_page(state: &AppState, requested: Option<&str>) -> RenderedPage {
    let resolution = state.registry.resolve(requested);
    let fragment = load_fragment(&resolution).await;

    let page = match &resolution {
        Resolution::Page { id, .. } => (*id).to_string(),
        Resolution::Unknown(id) => id.clone(),
    };

    match &fragment {
        Fragment::Empty(EmptyReason::UnknownPage) => {
            logger::log_warning(&format!("Unknown page requested: '{page}'"));
        }
        Fragment::Empty(EmptyReason::Missing) => {
            logger::log_warning(&format!("No content fragment for page '{page}'"));
        }
        Fragment::Empty(EmptyReason::Unreadable) | Fragment::Content(_) => {}
    }

    let html = state.shell.render(fragment.as_str());
    RenderedPage {
        page,
        fragment,
        html,
    }
}
