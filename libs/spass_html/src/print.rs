//! Serialisation of trees to HTML text. Printing only reads the tree,
//! so a tree renders the same any number of times.

use std::io::Write;

use anyhow::{Result, anyhow};
use itertools::Itertools;
use kstring::KString;

use crate::{allocator::{AId, Element, ElementData, HtmlAllocator, Node},
            meta::Layout,
            select::SelectData};

/// Escape an attribute value for use inside double quotes.
pub fn attribute_escape(s: &str) -> std::borrow::Cow<str> {
    if s.contains(['&', '"']) {
        s.replace('&', "&amp;").replace('"', "&quot;").into()
    } else {
        s.into()
    }
}

pub trait Print {
    /// Print serialized HTML.
    fn print_html_fragment(&self, out: &mut impl Write, allocator: &HtmlAllocator)
                           -> Result<()>;

    fn to_html_fragment_string(&self, allocator: &HtmlAllocator) -> Result<String> {
        let mut s = Vec::new();
        self.print_html_fragment(&mut s, allocator)?;
        // All pieces come from str values.
        Ok(String::from_utf8(s)?)
    }
}

impl Print for AId<Node> {
    fn print_html_fragment(&self, out: &mut impl Write, allocator: &HtmlAllocator)
                           -> Result<()> {
        let node = allocator.get_node(*self).ok_or_else(
            || anyhow!("id does not resolve in this allocator: {self:?}"))?;
        node.print_html_fragment(out, allocator)
    }
}

impl Print for (&KString, &KString) {
    fn print_html_fragment(&self, out: &mut impl Write, _allocator: &HtmlAllocator)
                           -> Result<()> {
        write_attribute(out, self.0, self.1)
    }
}

fn write_attribute(out: &mut impl Write, key: &str, val: &str) -> Result<()> {
    out.write_all(b" ")?;
    out.write_all(key.as_bytes())?;
    out.write_all(b"=\"")?;
    out.write_all(attribute_escape(val).as_bytes())?;
    out.write_all(b"\"")?;
    Ok(())
}

impl Print for Node {
    fn print_html_fragment(&self, out: &mut impl Write, allocator: &HtmlAllocator)
                           -> Result<()> {
        match self {
            Node::Element(e) => e.print_html_fragment(out, allocator),
            Node::Text(s) => Ok(out.write_all(s.as_bytes())?),
            Node::None => Ok(()),
        }
    }
}

impl Element {
    fn styles_string(&self) -> Option<String> {
        if self.styles.is_empty() {
            None
        } else {
            Some(self.styles.iter().map(|(k, v)| format!("{k}:{v}")).join(";"))
        }
    }

    /// The attributes with styles folded in, without touching the
    /// element.
    fn print_attributes(&self, out: &mut impl Write, allocator: &HtmlAllocator)
                        -> Result<()> {
        let styles = self.styles_string();
        let multiple = match &self.data {
            ElementData::Select(sel) => sel.options.multiple,
            _ => false,
        };
        let mut style_done = false;
        for (k, v) in self.attr.iter() {
            match k.as_str() {
                "style" => {
                    if let Some(styles) = &styles {
                        write_attribute(out, "style", styles)?;
                        style_done = true;
                    } else {
                        (k, v).print_html_fragment(out, allocator)?;
                    }
                }
                "name" if multiple => {
                    write_attribute(out, "name", &format!("{v}[]"))?;
                }
                _ => (k, v).print_html_fragment(out, allocator)?
            }
        }
        if let ElementData::Select(sel) = &self.data {
            if sel.options.autosubmit {
                write_attribute(out, "onchange", "submit()")?;
            }
            if sel.options.multiple {
                write_attribute(out, "multiple", "multiple")?;
                write_attribute(out, "size", &sel.options.size.to_string())?;
            }
        }
        if !style_done {
            if let Some(styles) = &styles {
                write_attribute(out, "style", styles)?;
            }
        }
        Ok(())
    }

    fn print_children(&self, out: &mut impl Write, allocator: &HtmlAllocator)
                      -> Result<()> {
        for id in &self.body {
            id.print_html_fragment(out, allocator)?;
        }
        Ok(())
    }
}

fn print_option(out: &mut impl Write, value: &str, label: &str, selected: bool)
                -> Result<()> {
    out.write_all(b"<option")?;
    write_attribute(out, "value", value)?;
    if selected {
        write_attribute(out, "selected", "selected")?;
    }
    out.write_all(b">")?;
    out.write_all(label.replace('\n', "").as_bytes())?;
    out.write_all(b"</option>")?;
    Ok(())
}

fn print_options(out: &mut impl Write, sel: &SelectData) -> Result<()> {
    let offered = sel.offered();
    if let Some(groups) = &sel.options.optgroups {
        for (i, (group, values)) in groups.iter().enumerate() {
            if i > 0 {
                out.write_all(b"\n")?;
            }
            out.write_all(b"<optgroup")?;
            write_attribute(out, "label", group)?;
            out.write_all(b">")?;
            for value in values {
                // A value missing from the codes is its own label.
                let label = offered.get(value.as_str()).unwrap_or(value);
                print_option(out, value, label, sel.is_selected(value))?;
            }
            out.write_all(b"</optgroup>")?;
        }
    } else {
        for (i, (code, label)) in offered.iter().enumerate() {
            if i > 0 {
                out.write_all(b"\n")?;
            }
            print_option(out, code, label, sel.is_selected(code))?;
        }
    }
    Ok(())
}

impl Print for Element {
    fn print_html_fragment(&self, out: &mut impl Write, allocator: &HtmlAllocator)
                           -> Result<()> {
        let tag = self.meta.tag_name.as_bytes();
        if self.meta.layout == Layout::Fragment {
            return self.print_children(out, allocator)
        }
        out.write_all(b"<")?;
        out.write_all(tag)?;
        self.print_attributes(out, allocator)?;
        match self.meta.layout {
            Layout::Block => {
                out.write_all(b">\n")?;
                if !self.body.is_empty() {
                    self.print_children(out, allocator)?;
                    out.write_all(b"\n")?;
                }
                out.write_all(b"</")?;
                out.write_all(tag)?;
                out.write_all(b">\n")?;
            }
            Layout::Table => {
                out.write_all(b">")?;
                self.print_children(out, allocator)?;
                out.write_all(b"\n</")?;
                out.write_all(tag)?;
                out.write_all(b">\n")?;
            }
            Layout::Void => {
                out.write_all(b"/>")?;
            }
            Layout::TextArea => {
                out.write_all(b">")?;
                if let ElementData::TextArea(Some(value)) = &self.data {
                    out.write_all(value.as_bytes())?;
                }
                out.write_all(b"</")?;
                out.write_all(tag)?;
                out.write_all(b">")?;
            }
            Layout::Select => {
                out.write_all(b">")?;
                if let ElementData::Select(sel) = &self.data {
                    print_options(out, sel)?;
                }
                out.write_all(b"\n</")?;
                out.write_all(tag)?;
                out.write_all(b">\n")?;
            }
            Layout::Fragment => unreachable!(),
        }
        Ok(())
    }
}

impl HtmlAllocator {
    pub fn print_html_fragment(&self, id: AId<Node>, out: &mut impl Write) -> Result<()> {
        id.print_html_fragment(out, self)
    }

    pub fn to_html_string(&self, id: AId<Node>) -> Result<String> {
        id.to_html_fragment_string(self)
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::meta::{DIV_META, INPUT_META, TABLE_META, TR_META};

    #[test]
    fn t_empty_container() {
        let mut html = HtmlAllocator::new();
        let div = html.new_element(&DIV_META);
        assert_eq!(html.to_html_string(div).unwrap(), "<div>\n</div>\n");
    }

    #[test]
    fn t_styles_and_escaping() {
        let mut html = HtmlAllocator::new();
        let div = html.new_element(&DIV_META);
        html.set_id(div, "x").unwrap();
        html.set_style(div, "color", "white").unwrap();
        html.set_style(div, "background", "grey").unwrap();
        html.set_attribute(div, "title", "a \"b\" & c").unwrap();
        html.add(div, "<b>verbatim</b>").unwrap();
        assert_eq!(html.to_html_string(div).unwrap(),
                   "<div id=\"x\" title=\"a &quot;b&quot; &amp; c\" \
                    style=\"color:white;background:grey\">\n<b>verbatim</b>\n</div>\n");
    }

    #[test]
    fn t_style_keeps_attribute_position() {
        let mut html = HtmlAllocator::new();
        let input = html.new_element(&INPUT_META);
        html.set_attribute(input, "style", "").unwrap();
        html.set_attribute(input, "name", "n").unwrap();
        html.set_style(input, "text-align", "right").unwrap();
        assert_eq!(html.to_html_string(input).unwrap(),
                   "<input style=\"text-align:right\" name=\"n\"/>");
    }

    #[test]
    fn t_table_layout() {
        let mut html = HtmlAllocator::new();
        let table = html.new_element(&TABLE_META);
        let tr = html.new_element(&TR_META);
        html.add(table, tr).unwrap();
        assert_eq!(html.to_html_string(table).unwrap(),
                   "<table><tr>\n</tr>\n\n</table>\n");
    }

    #[test]
    fn t_render_twice() {
        let mut html = HtmlAllocator::new();
        let div = html.new_element(&DIV_META);
        html.set_style(div, "color", "blue").unwrap();
        let a = html.to_html_string(div).unwrap();
        let b = html.to_html_string(div).unwrap();
        assert_eq!(a, b);
    }
}
