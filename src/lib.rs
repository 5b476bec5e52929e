//! D3 documentation site server
//!
//! Serves the D3 landing page: a fixed HTML shell with one content fragment
//! selected by the `page` query parameter from an allow-list of pages.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod site;
