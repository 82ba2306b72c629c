use pct_str::{PctString, URIReserved, InvalidPctString, PctStr};

pub fn url_encode(s: &str) -> String {
    let p = PctString::encode(s.chars(), URIReserved);
    p.to_string()
}

// Own error type that owns the string: InvalidPctString borrows the
// input, which would then have to outlive the anyhow::Error it ends
// up in.

#[derive(Debug, thiserror::Error)]
#[error("url decoding error: {0}")]
pub struct UrlDecodingError(Box<String>);

impl From<InvalidPctString<&str>> for UrlDecodingError {
    fn from(e: InvalidPctString<&str>) -> Self {
        Self(Box::new(format!("{}", e)))
    }
}

pub fn url_decode(s: &str) -> Result<String, UrlDecodingError> {
    let p = PctStr::new(s)?;
    Ok(p.decode())
}

/// Decode one key or value of an `application/x-www-form-urlencoded`
/// string, where `+` stands for a space.
pub fn form_decode(s: &str) -> Result<String, UrlDecodingError> {
    if s.contains('+') {
        url_decode(&s.replace('+', "%20"))
    } else {
        url_decode(s)
    }
}

/// Split a query string (without the leading `?`) or url-encoded
/// form body into its decoded key/value pairs, in order. A key
/// without `=` gets the empty value.
pub fn parse_urlencoded(s: &str) -> Result<Vec<(String, String)>, UrlDecodingError> {
    s.split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (k, v) = part.split_once('=').unwrap_or((part, ""));
            Ok((form_decode(k)?, form_decode(v)?))
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_decode() {
        assert_eq!(url_decode("a%20b").unwrap(), "a b");
        assert_eq!(form_decode("a+b%2Bc").unwrap(), "a b+c");
        assert!(url_decode("%zz").is_err());
    }

    #[test]
    fn t_parse_urlencoded() {
        assert_eq!(parse_urlencoded("a=1&b=x+y&&c&ids%5B%5D=3&ids%5B%5D=4").unwrap(),
                   vec![("a".into(), "1".into()),
                        ("b".into(), "x y".into()),
                        ("c".into(), "".into()),
                        ("ids[]".into(), "3".into()),
                        ("ids[]".into(), "4".into())]);
        assert_eq!(parse_urlencoded("").unwrap(), vec![]);
        assert_eq!(parse_urlencoded("_rct_selected_id=1%3B2").unwrap(),
                   vec![("_rct_selected_id".into(), "1;2".into())]);
    }

    #[test]
    fn t_encode() {
        assert_eq!(url_decode(&url_encode("a b/ä")).unwrap(), "a b/ä");
    }
}
