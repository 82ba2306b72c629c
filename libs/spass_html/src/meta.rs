//! Static per-tag information driving construction checks and
//! serialisation.

/// How an element is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `<tag attrs>\n...\n</tag>\n`
    Block,
    /// `<table attrs>...\n</table>\n`
    Table,
    /// `<tag attrs/>`, no children allowed.
    Void,
    /// Options rendered from the element's select data.
    Select,
    /// `<textarea attrs>value</textarea>`
    TextArea,
    /// No tag of its own, the children back to back.
    Fragment,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ElementMeta {
    pub tag_name: &'static str,
    pub layout: Layout,
}

impl ElementMeta {
    pub fn allows_children(&self) -> bool {
        match self.layout {
            Layout::Block | Layout::Table | Layout::Fragment => true,
            Layout::Void | Layout::Select | Layout::TextArea => false,
        }
    }
}

macro_rules! def_metas {
    { $($name:ident = $tag:expr, $layout:ident;)* } => {
        $(
            pub static $name: ElementMeta = ElementMeta {
                tag_name: $tag,
                layout: Layout::$layout,
            };
        )*
    }
}

def_metas! {
    HTML_META = "html", Block;
    HEAD_META = "head", Block;
    BODY_META = "body", Block;
    DIV_META = "div", Block;
    P_META = "p", Block;
    SPAN_META = "span", Block;
    FORM_META = "form", Block;
    H1_META = "h1", Block;
    H2_META = "h2", Block;
    H3_META = "h3", Block;
    A_META = "a", Block;
    LABEL_META = "label", Block;
    SCRIPT_META = "script", Block;
    TABLE_META = "table", Table;
    TR_META = "tr", Block;
    TD_META = "td", Block;
    TH_META = "th", Block;
    INPUT_META = "input", Void;
    LINK_META = "link", Void;
    SELECT_META = "select", Select;
    TEXTAREA_META = "textarea", TextArea;
    LISTING_META = "", Fragment;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_children() {
        assert!(DIV_META.allows_children());
        assert!(LISTING_META.allows_children());
        assert!(!INPUT_META.allows_children());
        assert!(!SELECT_META.allows_children());
    }
}
