//! Constructors for the individual elements. Each one builds the
//! element, adds it to `parent` and returns the new child.

use anyhow::Result;
use kstring::KString;

use crate::{allocator::{AId, Element, ElementData, HtmlAllocator, Node, ToBody},
            meta::*,
            myfrom::MyFrom,
            table::Alignment};

/// Options for `HtmlAllocator::checkbox`.
#[derive(Debug, Clone)]
pub struct CheckboxOptions<'t> {
    pub label: &'t str,
    /// The submitted value; the box is checked if it equals the
    /// checkbox value.
    pub input: Option<&'t str>,
    /// Submit the form on click.
    pub autosubmit: bool,
    pub id: Option<&'t str>,
    pub class: Option<&'t str>,
    /// Put the label after the box instead of before it.
    pub label_trailing: bool,
}

impl<'t> Default for CheckboxOptions<'t> {
    fn default() -> Self {
        CheckboxOptions {
            label: "",
            input: None,
            autosubmit: false,
            id: None,
            class: None,
            label_trailing: true,
        }
    }
}

impl HtmlAllocator {
    /// Allocate `elt`, fill it with `content` and add it to `parent`.
    pub fn add_element(&mut self,
                       parent: AId<Node>,
                       elt: Element,
                       content: impl ToBody) -> Result<AId<Node>> {
        let id = self.allocate_element(elt);
        content.append_to(self, id)?;
        self.add(parent, id)
    }

    fn new_input(&mut self, typ: &str, name: &str) -> Element {
        let mut e = Element::new(&INPUT_META);
        e.set_attribute("type", typ);
        e.set_attribute("name", name);
        e
    }

    // ---- roots --------------------------------------------------------

    pub fn new_head(&mut self) -> AId<Node> {
        self.new_element(&HEAD_META)
    }

    pub fn new_body(&mut self) -> AId<Node> {
        self.new_element(&BODY_META)
    }

    /// A parentless `<div>`.
    pub fn new_div(&mut self, content: impl ToBody, id: Option<&str>) -> Result<AId<Node>> {
        let div = self.allocate_element(Element::with_id_class(&DIV_META, id, None));
        content.append_to(self, div)?;
        Ok(div)
    }

    /// A parentless `<form method="post" action="">`.
    pub fn new_form(&mut self, id: Option<&str>) -> AId<Node> {
        self.allocate_element(form_element(id))
    }

    // ---- containers ---------------------------------------------------

    pub fn div(&mut self, parent: AId<Node>, content: impl ToBody, id: Option<&str>)
               -> Result<AId<Node>> {
        self.add_element(parent, Element::with_id_class(&DIV_META, id, None), content)
    }

    pub fn p(&mut self, parent: AId<Node>, content: impl ToBody, id: Option<&str>)
             -> Result<AId<Node>> {
        self.add_element(parent, Element::with_id_class(&P_META, id, None), content)
    }

    pub fn span(&mut self, parent: AId<Node>, content: impl ToBody, id: Option<&str>)
                -> Result<AId<Node>> {
        self.add_element(parent, Element::with_id_class(&SPAN_META, id, None), content)
    }

    pub fn form(&mut self, parent: AId<Node>, id: Option<&str>) -> Result<AId<Node>> {
        self.add_element(parent, form_element(id), [])
    }

    pub fn h1(&mut self, parent: AId<Node>, content: impl ToBody) -> Result<AId<Node>> {
        self.add_element(parent, Element::new(&H1_META), content)
    }

    pub fn h2(&mut self, parent: AId<Node>, content: impl ToBody) -> Result<AId<Node>> {
        self.add_element(parent, Element::new(&H2_META), content)
    }

    pub fn h3(&mut self, parent: AId<Node>, content: impl ToBody) -> Result<AId<Node>> {
        self.add_element(parent, Element::new(&H3_META), content)
    }

    /// `<a>` opening in a new window; `href` defaults to the content.
    pub fn link(&mut self, parent: AId<Node>, content: &str, href: Option<&str>)
                -> Result<AId<Node>> {
        let mut e = Element::new(&A_META);
        e.set_attribute("href", href.unwrap_or(content));
        e.set_attribute("target", "_blank");
        self.add_element(parent, e, content)
    }

    pub fn label(&mut self, parent: AId<Node>, content: impl ToBody, for_id: Option<&str>)
                 -> Result<AId<Node>> {
        let mut e = Element::new(&LABEL_META);
        if let Some(for_id) = for_id {
            e.set_attribute("for", for_id);
        }
        self.add_element(parent, e, content)
    }

    /// `<script>`, external if `src` is given.
    pub fn script(&mut self,
                  parent: AId<Node>,
                  content: impl ToBody,
                  src: Option<&str>,
                  script_type: Option<&str>) -> Result<AId<Node>> {
        let mut e = Element::new(&SCRIPT_META);
        if let Some(src) = src {
            e.set_attribute("src", src);
        }
        if let Some(t) = script_type {
            e.set_attribute("type", t);
        }
        self.add_element(parent, e, content)
    }

    /// `<link>` to a resource like a style sheet, for the head.
    pub fn resourcelink(&mut self, parent: AId<Node>, rel: &str, linktype: &str, href: &str)
                        -> Result<AId<Node>> {
        let mut e = Element::new(&LINK_META);
        e.set_attribute("href", href);
        e.set_attribute("rel", rel);
        e.set_attribute("type", linktype);
        self.add_element(parent, e, [])
    }

    pub fn br(&mut self, parent: AId<Node>, count: usize) -> Result<AId<Node>> {
        for _ in 0..count {
            self.add(parent, "<br />\n")?;
        }
        Ok(parent)
    }

    pub fn hr(&mut self, parent: AId<Node>) -> Result<AId<Node>> {
        self.add(parent, "<hr />\n")
    }

    // ---- inputs -------------------------------------------------------

    /// `value` is omitted if empty.
    pub fn hidden(&mut self, parent: AId<Node>, name: &str, value: &str, id: Option<&str>)
                  -> Result<AId<Node>> {
        let mut e = self.new_input("hidden", name);
        if !value.is_empty() {
            e.set_attribute("value", value);
        }
        if let Some(id) = id {
            e.set_id(id);
        }
        self.add_element(parent, e, [])
    }

    pub fn submit(&mut self,
                  parent: AId<Node>,
                  name: &str,
                  value: &str,
                  id: Option<&str>,
                  class: Option<&str>) -> Result<AId<Node>> {
        let e = self.button_element("submit", name, value, id, class);
        self.add_element(parent, e, [])
    }

    pub fn button(&mut self,
                  parent: AId<Node>,
                  name: &str,
                  value: &str,
                  id: Option<&str>,
                  class: Option<&str>) -> Result<AId<Node>> {
        let e = self.button_element("button", name, value, id, class);
        self.add_element(parent, e, [])
    }

    fn button_element(&mut self,
                      typ: &str,
                      name: &str,
                      value: &str,
                      id: Option<&str>,
                      class: Option<&str>) -> Element {
        let mut e = self.new_input(typ, name);
        if !value.is_empty() {
            e.set_attribute("value", value);
        }
        if let Some(id) = id {
            e.set_id(id);
        }
        if let Some(class) = class {
            e.set_class(class);
        }
        e
    }

    pub fn radio(&mut self, parent: AId<Node>, name: &str, value: &str) -> Result<AId<Node>> {
        let mut e = self.new_input("radio", name);
        if !value.is_empty() {
            e.set_attribute("value", value);
        }
        self.add_element(parent, e, [])
    }

    /// A checkbox plus its label; returns the checkbox.
    pub fn checkbox<V>(&mut self,
                       parent: AId<Node>,
                       name: &str,
                       value: V,
                       opts: CheckboxOptions) -> Result<AId<Node>>
    where KString: MyFrom<V>
    {
        self.checkbox_with_value(parent, name, KString::myfrom(value), opts)
    }

    fn checkbox_with_value(&mut self,
                           parent: AId<Node>,
                           name: &str,
                           value: KString,
                           opts: CheckboxOptions) -> Result<AId<Node>> {
        let mut e = self.new_input("checkbox", name);
        e.set_attribute("value", &value);
        if opts.autosubmit {
            e.set_attribute("onclick", "submit()");
        }
        if opts.input == Some(value.as_str()) {
            e.set_attribute("checked", "checked");
        }
        if let Some(id) = opts.id {
            e.set_id(id);
        }
        if let Some(class) = opts.class {
            e.set_class(class);
        }
        let label = {
            let mut l = Element::new(&LABEL_META);
            if let Some(id) = opts.id {
                l.set_attribute("for", id);
            }
            l
        };
        if opts.label_trailing {
            let checkbox = self.add_element(parent, e, [])?;
            self.add_element(parent, label, opts.label)?;
            Ok(checkbox)
        } else {
            self.add_element(parent, label, opts.label)?;
            self.add_element(parent, e, [])
        }
    }

    /// `<input type="text">`; the id is the name.
    pub fn textinput(&mut self,
                     parent: AId<Node>,
                     name: &str,
                     value: &str,
                     size: u32,
                     alignment: Option<&str>) -> Result<AId<Node>> {
        let mut e = self.sized_input("text", name, value, size);
        if let Some(code) = alignment {
            if let Some(a) = Alignment::from_code(code) {
                e.set_style("text-align", a.css());
            } else {
                tracing::warn!("textinput {name:?}: ignoring unknown alignment {code:?}");
            }
        }
        self.add_element(parent, e, [])
    }

    pub fn password(&mut self, parent: AId<Node>, name: &str, value: &str, size: u32)
                    -> Result<AId<Node>> {
        let e = self.sized_input("password", name, value, size);
        self.add_element(parent, e, [])
    }

    fn sized_input(&mut self, typ: &str, name: &str, value: &str, size: u32) -> Element {
        let mut e = self.new_input(typ, name);
        e.set_attribute("size", size);
        e.set_id(name);
        if !value.is_empty() {
            e.set_attribute("value", value);
        }
        e
    }

    pub fn textarea(&mut self,
                    parent: AId<Node>,
                    name: &str,
                    value: Option<&str>,
                    rows: u32,
                    cols: u32) -> Result<AId<Node>> {
        let mut e = Element::new(&TEXTAREA_META);
        e.set_attribute("name", name);
        e.set_attribute("cols", cols);
        e.set_attribute("rows", rows);
        e.set_id(name);
        e.data = ElementData::TextArea(value.map(KString::from_ref));
        self.add_element(parent, e, [])
    }
}

fn form_element(id: Option<&str>) -> Element {
    let mut e = Element::with_id_class(&FORM_META, id, None);
    e.set_attribute("method", "post");
    e.set_attribute("action", "");
    e
}
