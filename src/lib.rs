//! Serving pages built with `spass_html` through rouille: request and
//! session adapters, configuration, the login flow and response
//! helpers.

pub mod util;
pub mod config;
pub mod url_encoding;
pub mod http_response_status_codes;
pub mod arequest;
pub mod asession;
pub mod webutils;
pub mod app;
pub mod demo;
