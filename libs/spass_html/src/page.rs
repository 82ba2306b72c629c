//! A complete HTML page: head and body plus the document preamble.

use anyhow::Result;
use kstring::KString;

use crate::allocator::{AId, HtmlAllocator, Node};

/// The preamble existing consumers expect, malformed `</?xml` included.
pub const LEGACY_PREAMBLE: &str = "</?xml version=\"1.0\" encoding=\"utf-8\" ?>\n";
pub const XML_PREAMBLE: &str = "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n";
pub const DOCTYPE: &str = "<!DOCTYPE html>\n";

#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
    /// Reproduce the historical preamble and `<html>` tag byte for
    /// byte.
    pub legacy_preamble: bool,
    pub lang: KString,
}

impl Default for PageOptions {
    fn default() -> Self {
        PageOptions {
            legacy_preamble: true,
            lang: KString::from_static("de"),
        }
    }
}

/// A page owns the allocator all of its nodes live in.
pub struct HtmlPage {
    pub html: HtmlAllocator,
    pub head: AId<Node>,
    pub body: AId<Node>,
    options: PageOptions,
}

impl HtmlPage {
    pub fn new(options: PageOptions) -> Self {
        let mut html = HtmlAllocator::new();
        let head = html.new_head();
        let body = html.new_body();
        HtmlPage { html, head, body, options }
    }

    pub fn options(&self) -> &PageOptions {
        &self.options
    }

    pub fn render(&self) -> Result<String> {
        let head = self.html.to_html_string(self.head)?;
        let body = self.html.to_html_string(self.body)?;
        let lang = &self.options.lang;
        Ok(if self.options.legacy_preamble {
            format!("{LEGACY_PREAMBLE}{DOCTYPE}\
                     <html xmlns=\"http://www.w3.org/1999/xhtml\"xml:lang=\"{lang}\" \
                     lang=\"{lang}\">\n{head}\n{body}\n</html>\n")
        } else {
            format!("{XML_PREAMBLE}{DOCTYPE}\
                     <html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"{lang}\" \
                     lang=\"{lang}\">\n{head}\n{body}\n</html>\n")
        })
    }
}

impl Default for HtmlPage {
    fn default() -> Self {
        Self::new(PageOptions::default())
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn t_legacy_render() {
        let mut page = HtmlPage::default();
        page.html.p(page.body, "hi", None).unwrap();
        assert_eq!(page.render().unwrap(),
                   "</?xml version=\"1.0\" encoding=\"utf-8\" ?>\n\
                    <!DOCTYPE html>\n\
                    <html xmlns=\"http://www.w3.org/1999/xhtml\"xml:lang=\"de\" lang=\"de\">\n\
                    <head>\n</head>\n\n\
                    <body>\n<p>\nhi\n</p>\n\n</body>\n\n\
                    </html>\n");
    }

    #[test]
    fn t_fixed_render() {
        let page = HtmlPage::new(PageOptions {
            legacy_preamble: false,
            lang: KString::from_static("en"),
        });
        let s = page.render().unwrap();
        assert!(s.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n<!DOCTYPE html>\n\
                               <html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"en\" \
                               lang=\"en\">\n"));
    }
}
