//! Request handler module
//!
//! Request routing dispatch, page rendering and static asset serving.

pub mod router;
pub mod static_files;

pub use router::{handle_request, respond, RequestContext};
