use anyhow::{Result, Context, anyhow};
use kstring::KString;
use rouille::{Request, input::post::raw_urlencoded_post_input};
use spass_html::{FieldSource, MapFields};

use crate::url_encoding::parse_urlencoded;

/// A rouille request with its form fields decoded: those of a posted
/// url-encoded body first, then those from the query string.
pub struct ARequest<'r> {
    request: &'r Request,
    fields: MapFields,
}

impl<'r> ARequest<'r> {
    /// Reads the request body if it is a POST, thus can only be
    /// created once per request.
    pub fn new(request: &'r Request) -> Result<Self> {
        let mut fields = MapFields::new();
        if request.method() == "POST" {
            let posted = raw_urlencoded_post_input(request)
                .map_err(|e| anyhow!("{e}"))
                .with_context(|| anyhow!("reading form data of POST to {:?}",
                                         request.url()))?;
            for (k, v) in posted {
                fields.push(k, v);
            }
        }
        let query = parse_urlencoded(request.raw_query_string())
            .with_context(|| anyhow!("decoding query string of {:?}", request.url()))?;
        for (k, v) in query {
            fields.push(k, v);
        }
        Ok(ARequest { request, fields })
    }

    pub fn request(&self) -> &Request { self.request }
    pub fn method(&self) -> &str { self.request.method() }
    pub fn is_post(&self) -> bool { self.request.method() == "POST" }
    /// Path only
    pub fn url(&self) -> String { self.request.url() }
    pub fn fields(&self) -> &MapFields { &self.fields }
}

impl<'r> FieldSource for ARequest<'r> {
    fn field(&self, name: &str) -> Option<KString> {
        self.fields.field(name)
    }

    fn field_list(&self, name: &str) -> Vec<KString> {
        self.fields.field_list(name)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn post(url: &str, body: &str) -> Request {
        Request::fake_http("POST", url,
                           vec![("Content-Type".into(),
                                 "application/x-www-form-urlencoded".into())],
                           body.as_bytes().to_vec())
    }

    #[test]
    fn t_get() {
        let request = Request::fake_http("GET", "/list?a=1&tags%5B%5D=x&tags%5B%5D=y",
                                         vec![], vec![]);
        let r = ARequest::new(&request).unwrap();
        assert!(!r.is_post());
        assert_eq!(r.get("a", None, None), "1");
        assert_eq!(r.get_list("tags"), vec![KString::from_static("x"),
                                            KString::from_static("y")]);
        assert_eq!(r.url(), "/list");
    }

    #[test]
    fn t_post_before_query() {
        let request = post("/?a=query&b=2", "a=posted&_rct_selected_id=3%3B4");
        let r = ARequest::new(&request).unwrap();
        assert_eq!(r.get("a", None, None), "posted");
        assert_eq!(r.get("b", None, None), "2");
        assert_eq!(r.get("_rct_selected_id", None, None), "3;4");
        assert_eq!(r.field_list("a").len(), 2);
    }

    #[test]
    fn t_bad_query() {
        let request = Request::fake_http("GET", "/?a=%zz", vec![], vec![]);
        assert!(ARequest::new(&request).is_err());
    }
}
