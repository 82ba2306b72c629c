//! A small application: after logging in, a table of records whose
//! rows can be selected and edited in place.

use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow, bail};
use kstring::KString;
use lazy_static::lazy_static;
use rouille::{Request, Response, match_assets, session::session};
use spass_html::{Codes, Content, FieldSource, HtmlPage, ListingOptions, Mapping, ResultEditor,
                 Row, Selection, Value, choice::{ListingIndex, SAVE_NAME}, row};

use crate::{app::{SpassApp, StaticCredentials},
            arequest::ARequest,
            asession::SessionStore,
            config::SpassConfig,
            http_response_status_codes::HttpResponseStatusCode,
            webutils::{errorpage_from_error, errorpage_from_status, htmlresponse}};

pub const APP_NAME: &str = "demo";
pub const FORM_ID: &str = "editorform";
pub const SUBMIT_LOGOUT: &str = "submit_logout";

lazy_static! {
    static ref ROLES: Codes = Codes::map([("dev", "Developer"),
                                          ("ops", "Operations"),
                                          ("mgmt", "Management")]);
}

/// The records shown, and how.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub rows: Vec<Row>,
    /// Column identifying a row.
    pub index: KString,
    pub mapping: Option<Mapping>,
    pub codes: Vec<(KString, Codes)>,
}

impl Dataset {
    pub fn builtin() -> Self {
        Dataset {
            rows: vec![
                row!{"id" => 1, "name" => "Anna Meier", "role" => "dev", "city" => "Basel"},
                row!{"id" => 2, "name" => "Ben Okafor", "role" => "ops", "city" => "Zürich"},
                row!{"id" => 3, "name" => "Carla Rossi", "role" => "mgmt", "city" => "Bern"},
                row!{"id" => 4, "name" => "Dan Weber", "role" => "dev", "city" => "Luzern"},
            ],
            index: KString::from_static("id"),
            mapping: Some(Mapping::labels([("id", "ID"),
                                           ("name", "Name"),
                                           ("role", "Role"),
                                           ("city", "City")])),
            codes: vec![(KString::from_static("role"), ROLES.clone())],
        }
    }

    /// A JSON array of objects, all of which have the `index` key.
    pub fn from_json_str(s: &str, index: &str) -> Result<Self> {
        let rows = match Content::from_json_str(s)? {
            Content::Rows(rows) => rows,
            Content::Record(_) => bail!("expecting an array of objects, got a single object"),
        };
        for (i, row) in rows.iter().enumerate() {
            if !row.contains_key(index) {
                bail!("row {i} is missing the index column {index:?}")
            }
        }
        Ok(Dataset {
            rows,
            index: KString::from_ref(index),
            mapping: None,
            codes: Vec::new(),
        })
    }
}

/// Keep the kind of number if the edited value still parses as one.
fn reparse(old: Option<&Value>, s: KString) -> Value {
    match old {
        Some(Value::Int(_)) => s.trim().parse::<i64>().map(Value::Int)
            .unwrap_or(Value::Text(s)),
        Some(Value::Float(_)) => s.trim().parse::<f64>().map(Value::Float)
            .unwrap_or(Value::Text(s)),
        _ => Value::Text(s),
    }
}

pub struct Demo {
    config: SpassConfig,
    credentials: StaticCredentials,
    sessions: SessionStore,
    dataset: Mutex<Dataset>,
}

impl Demo {
    pub fn new(config: SpassConfig, dataset: Dataset) -> Self {
        let credentials = StaticCredentials {
            username: config.demo_user.clone(),
            password: config.demo_password.clone(),
        };
        Demo {
            config,
            credentials,
            sessions: SessionStore::new(),
            dataset: Mutex::new(dataset),
        }
    }

    pub fn config(&self) -> &SpassConfig { &self.config }
    pub fn sessions(&self) -> &SessionStore { &self.sessions }

    fn lock_dataset(&self) -> Result<std::sync::MutexGuard<'_, Dataset>> {
        self.dataset.lock().map_err(|_| anyhow!("dataset lock poisoned"))
    }

    pub fn rows(&self) -> Result<Vec<Row>> {
        Ok(self.lock_dataset()?.rows.clone())
    }

    /// The page for `request`, in the session with id `session_id`.
    pub fn handle(&self, request: &Request, session_id: &str) -> Result<Response> {
        let arequest = ARequest::new(request)?;
        let mut session = self.sessions.open(session_id)?;
        let app = SpassApp::new(APP_NAME, &self.config);
        let mut page = app.setup_page()?;
        let login = app.resolve_login(&mut page, &arequest, &mut session, &self.credentials)?;
        if login.is_logged_in() {
            if arequest.field(SUBMIT_LOGOUT).is_some() {
                app.logout(&mut session);
                app.display_login_form(&mut page)?;
            } else {
                self.show_editor(&mut page, &arequest)?;
            }
        }
        session.commit()?;
        htmlresponse(&page, HttpResponseStatusCode::OK200)
    }

    fn show_editor(&self, page: &mut HtmlPage, request: &dyn FieldSource) -> Result<()> {
        let index = ListingIndex::from(self.lock_dataset()?.index.clone());
        let mut selection = Selection::from_fields(request, &index, false);
        if request.field(SAVE_NAME).is_some() {
            self.save(&selection, request)?;
            selection = Selection::None;
        }
        let dataset = self.lock_dataset()?.clone();

        let mut options = ListingOptions::default().row_limit(self.config.row_limit);
        if let Some(mapping) = &dataset.mapping {
            options = options.mapping(mapping.clone());
        }
        let html = &mut page.html;
        html.h1(page.body, "Records")?;
        let form = html.form(page.body, Some(FORM_ID))?;
        let mut editor = ResultEditor::new_editor(html, form, dataset.rows, index, selection,
                                                  options, Vec::<KString>::new())?;
        editor.set_id(APP_NAME);
        for (column, codes) in dataset.codes {
            editor.set_codes(&column, codes);
        }
        editor.compose(html)?;
        html.br(form, 1)?;
        html.submit(form, SUBMIT_LOGOUT, "logout", None, None)?;
        Ok(())
    }

    /// Take over the posted values of the edited row.
    fn save(&self, selection: &Selection, request: &dyn FieldSource) -> Result<()> {
        let key = match selection {
            Selection::Row(key) => key,
            _ => {
                tracing::warn!("save without a selected row, ignoring");
                return Ok(())
            }
        };
        let mut dataset = self.lock_dataset()?;
        let index = ListingIndex::from(dataset.index.clone());
        let index_column = dataset.index.clone();
        let row = match dataset.rows.iter_mut()
            .find(|row| selection.matches(row, &index))
        {
            Some(row) => row,
            None => {
                tracing::warn!("save: no row with key {key:?}");
                return Ok(())
            }
        };
        for column in row.keys().unwrap_or_default() {
            if column == index_column {
                continue;
            }
            if let Some(value) = request.field(&column) {
                let value = reparse(row.get(&column), value);
                row.set(&column, value);
            }
        }
        tracing::info!("saved row {key:?}");
        Ok(())
    }
}

/// The request handler for rouille's `Server`.
pub fn server_handler(demo: Arc<Demo>)
                      -> impl Fn(&Request) -> Response + Send + Sync + 'static
{
    move |request: &Request| -> Response {
        tracing::debug!("{} {}", request.method(), request.raw_url());
        if let Some(request) = request.remove_prefix("/static") {
            let response = match_assets(&request, &demo.config.static_dir);
            if response.is_success() {
                return response
            }
            return errorpage_from_status(HttpResponseStatusCode::NotFound404)
        }
        if request.url() != "/" {
            return errorpage_from_status(HttpResponseStatusCode::NotFound404)
        }
        match request.method() {
            "GET" | "POST" => (),
            _ => return errorpage_from_status(HttpResponseStatusCode::MethodNotAllowed405)
        }
        session(request, "sid", 3600 /*sec*/, |session| {
            demo.handle(request, session.id()).unwrap_or_else(errorpage_from_error)
        })
    }
}
