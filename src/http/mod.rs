//! HTTP protocol layer module
//!
//! Response builders, caching validators and MIME detection, decoupled from
//! page rendering.

pub mod cache;
pub mod mime;
pub mod response;

pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_health_response, build_options_response, build_page_response,
};
