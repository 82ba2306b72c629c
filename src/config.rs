//! Settings of a spass application, with defaults that can be
//! overridden from the environment.

use anyhow::Result;
use kstring::KString;
use spass_html::{PageOptions, listing::DEFAULT_ROW_LIMIT};

use crate::util::{getenv, getenv_bool, getenv_parse};

pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
pub const DEFAULT_SCRIPT_SRC: &str = "static/spass_forms.js";
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Clone, PartialEq)]
pub struct SpassConfig {
    /// ip:port for the server to listen on
    pub listen: String,
    /// Url of the script defining the selection handlers, as
    /// referenced from the page head.
    pub script_src: KString,
    /// Directory the script (and other static files) are served from.
    pub static_dir: String,
    pub lang: KString,
    pub legacy_preamble: bool,
    pub row_limit: usize,
    pub demo_user: KString,
    pub demo_password: KString,
}

impl Default for SpassConfig {
    fn default() -> Self {
        SpassConfig {
            listen: DEFAULT_LISTEN.into(),
            script_src: KString::from_static(DEFAULT_SCRIPT_SRC),
            static_dir: DEFAULT_STATIC_DIR.into(),
            lang: KString::from_static("de"),
            legacy_preamble: true,
            row_limit: DEFAULT_ROW_LIMIT,
            demo_user: KString::from_static("demo"),
            demo_password: KString::from_static("demo"),
        }
    }
}

impl SpassConfig {
    /// The defaults, overridden by the `SPASS_*` env vars that are
    /// set.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(v) = getenv("SPASS_LISTEN")? {
            config.listen = v;
        }
        if let Some(v) = getenv("SPASS_SCRIPT_SRC")? {
            config.script_src = KString::from_string(v);
        }
        if let Some(v) = getenv("SPASS_STATIC_DIR")? {
            config.static_dir = v;
        }
        if let Some(v) = getenv("SPASS_LANG")? {
            config.lang = KString::from_string(v);
        }
        if let Some(v) = getenv_bool("SPASS_LEGACY_PREAMBLE")? {
            config.legacy_preamble = v;
        }
        if let Some(v) = getenv_parse("SPASS_ROW_LIMIT")? {
            config.row_limit = v;
        }
        if let Some(v) = getenv("SPASS_DEMO_USER")? {
            config.demo_user = KString::from_string(v);
        }
        if let Some(v) = getenv("SPASS_DEMO_PASSWORD")? {
            config.demo_password = KString::from_string(v);
        }
        Ok(config)
    }

    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            legacy_preamble: self.legacy_preamble,
            lang: self.lang.clone(),
        }
    }
}
