use std::borrow::Cow;

use anyhow::{Result, Error};
use rouille::{Response, ResponseBody};
use spass_html::{HtmlPage, page::LEGACY_PREAMBLE};

use crate::http_response_status_codes::HttpResponseStatusCode;


pub fn errorpage_from_status(status: HttpResponseStatusCode) -> Response {
    let title = status.title();
    let explanation = status.desc();
    let resp = format!("<html><head><title>{title}</title></head><body><h1>{title}</h1>\
                        <p>{explanation}</p></body></html>\n");
    Response {
        status_code: status.code(),
        headers: vec![(Cow::from("Content-type"), Cow::from("text/html"))],
        data: ResponseBody::from_string(resp),
        upgrade: None,
    }
}

/// Any error ends up as a 500 page, the details only go to the log.
pub fn errorpage_from_error(err: Error) -> Response {
    let status = HttpResponseStatusCode::InternalServerError500;
    tracing::error!("error in page (returning {status:?}): {err:#}");
    errorpage_from_status(status)
}

pub fn htmlresponse(page: &HtmlPage, status: HttpResponseStatusCode) -> Result<Response> {
    let content_type = if page.options().legacy_preamble {
        // The legacy preamble is not well-formed xml.
        "text/html; charset=utf-8"
    } else {
        "application/xhtml+xml; charset=utf-8"
    };
    Ok(Response {
        status_code: status.code(),
        headers: vec![(Cow::from("Content-type"), Cow::from(content_type))],
        data: ResponseBody::from_string(page.render()?),
        upgrade: None,
    })
}

/// Whether `body` starts with the preamble browsers have to tolerate.
pub fn has_legacy_preamble(body: &str) -> bool {
    body.starts_with(LEGACY_PREAMBLE)
}


#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    fn body_string(response: Response) -> String {
        let (mut reader, _) = response.data.into_reader_and_size();
        let mut s = String::new();
        reader.read_to_string(&mut s).unwrap();
        s
    }

    #[test]
    fn t_errorpage_from_error() {
        let r = errorpage_from_error(anyhow::anyhow!("secret detail"));
        assert_eq!(r.status_code, 500);
        let body = body_string(r);
        assert!(body.contains("Internal Server Error"));
        assert!(!body.contains("secret detail"));
    }

    #[test]
    fn t_htmlresponse() {
        let mut page = HtmlPage::default();
        page.html.p(page.body, "hello", None).unwrap();
        let r = htmlresponse(&page, HttpResponseStatusCode::OK200).unwrap();
        assert_eq!(r.status_code, 200);
        assert_eq!(r.headers[0].1, "text/html; charset=utf-8");
        let body = body_string(r);
        assert!(has_legacy_preamble(&body));
        assert!(body.contains("<p>\nhello\n</p>"));
    }
}
