//! The frame of a spass application: page setup and the login flow.

use anyhow::Result;
use kstring::KString;
use spass_html::{AId, FieldSource, HtmlPage, Node, SessionStorage};

use crate::config::SpassConfig;

/// Session key marking a completed login.
pub const SUCCESS_LOGIN: &str = "success_login";
/// Name of the login form's submit button.
pub const SUBMIT_LOGIN: &str = "submit_login";

/// Checks a username/password pair.
pub trait Credentials {
    fn affirm(&self, username: &str, password: &str) -> Result<bool>;
}

/// A single fixed user.
pub struct StaticCredentials {
    pub username: KString,
    pub password: KString,
}

impl Credentials for StaticCredentials {
    fn affirm(&self, username: &str, password: &str) -> Result<bool> {
        Ok(self.username == username && self.password == password)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    /// From an earlier request.
    Established,
    /// Just now, via the submitted form.
    Succeeded,
    /// Not logged in; the login form has been added to the page.
    FormShown,
}

impl LoginState {
    pub fn is_logged_in(self) -> bool {
        self != LoginState::FormShown
    }
}

pub struct SpassApp<'c> {
    /// Distinct name of the application, prefixed to the names of
    /// its form fields.
    app_name: KString,
    config: &'c SpassConfig,
}

impl<'c> SpassApp<'c> {
    pub fn new(app_name: &str, config: &'c SpassConfig) -> Self {
        SpassApp { app_name: KString::from_ref(app_name), config }
    }

    pub fn app_name(&self) -> &str { &self.app_name }
    pub fn config(&self) -> &SpassConfig { self.config }

    pub fn username_field(&self) -> String {
        format!("{}_username_entry", self.app_name)
    }

    pub fn password_field(&self) -> String {
        format!("{}_password_entry", self.app_name)
    }

    /// A new page, loading the script the selection handlers live in.
    pub fn setup_page(&self) -> Result<HtmlPage> {
        tracing::info!("{}: setup page root", self.app_name);
        let mut page = HtmlPage::new(self.config.page_options());
        page.html.script(page.head, "", Some(self.config.script_src.as_str()), None)?;
        Ok(page)
    }

    pub fn display_login_form(&self, page: &mut HtmlPage) -> Result<AId<Node>> {
        tracing::info!("{}: display login form", self.app_name);
        let html = &mut page.html;
        let div = html.div(page.body, "", Some("centerBox"))?;
        let form = html.form(div, Some("loginform"))?;
        html.add(form, "Username")?;
        let username = html.textinput(form, &self.username_field(), "", 20, None)?;
        html.set_attribute(username, "placeholder", "username")?;
        html.add(form, "Password")?;
        html.br(form, 1)?;
        let password = html.password(form, &self.password_field(), "", 20)?;
        html.set_attribute(password, "placeholder", "password")?;
        html.submit(form, SUBMIT_LOGIN, "enter", None, None)?;
        Ok(form)
    }

    /// Check the session for an established login, else the request
    /// for submitted credentials. Shows the login form on the page
    /// if neither succeeds.
    pub fn resolve_login(&self,
                         page: &mut HtmlPage,
                         request: &dyn FieldSource,
                         session: &mut dyn SessionStorage,
                         credentials: &dyn Credentials) -> Result<LoginState> {
        tracing::info!("{}: resolving login", self.app_name);
        if !session.get(SUCCESS_LOGIN, None, None).is_empty() {
            tracing::debug!("login already established");
            return Ok(LoginState::Established)
        }
        tracing::debug!("login will be resolved");
        let success =
            if request.field(SUBMIT_LOGIN).is_some() {
                let username = request.get(&self.username_field(), None, None);
                let password = request.get(&self.password_field(), None, None);
                credentials.affirm(username.trim(), &password)?
            } else {
                false
            };
        if success {
            session.set(SUCCESS_LOGIN, KString::from_static("true"));
            tracing::debug!("login successful");
            Ok(LoginState::Succeeded)
        } else {
            self.display_login_form(page)?;
            Ok(LoginState::FormShown)
        }
    }

    pub fn logout(&self, session: &mut dyn SessionStorage) {
        tracing::info!("{}: logout", self.app_name);
        session.remove(SUCCESS_LOGIN);
    }
}
