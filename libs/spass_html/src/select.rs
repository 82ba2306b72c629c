//! Dropdowns (`<select>`): code tables, the selected values and how
//! options are generated from them.

use anyhow::Result;
use kstring::KString;

use crate::{alist::AList,
            allocator::{AId, Element, ElementData, HtmlAllocator, Node},
            input::FieldSource,
            meta::SELECT_META,
            myfrom::MyFrom};

pub const MISSING_CODE_ID: &str = "-1";
pub const MISSING_CODE_LABEL: &str = "No Entry";

/// A table of codes offered by a dropdown. A list uses each entry as
/// both value and label; a map gives the label per value.
#[derive(Debug, Clone, PartialEq)]
pub enum Codes {
    List(Vec<KString>),
    Map(AList<KString, KString>),
}

impl Codes {
    pub fn list<T>(codes: impl IntoIterator<Item = T>) -> Self
    where KString: MyFrom<T>
    {
        Codes::List(codes.into_iter().map(KString::myfrom).collect())
    }

    /// Keys are stored as strings, whatever their type on the calling
    /// side.
    pub fn map<K, V>(codes: impl IntoIterator<Item = (K, V)>) -> Self
    where KString: MyFrom<K> + MyFrom<V>
    {
        Codes::Map(codes.into_iter()
                   .map(|(k, v)| (KString::myfrom(k), KString::myfrom(v)))
                   .collect())
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Codes::Map(_))
    }

    /// Label for `code`; for lists that is the code itself, if listed.
    pub fn label(&self, code: &str) -> Option<&KString> {
        match self {
            Codes::List(l) => l.iter().find(|c| c.as_str() == code),
            Codes::Map(m) => m.get(code),
        }
    }

    /// (value, label) pairs in order.
    pub fn pairs(&self) -> AList<KString, KString> {
        match self {
            Codes::List(l) => l.iter().map(|c| (c.clone(), c.clone())).collect(),
            Codes::Map(m) => m.clone(),
        }
    }
}


/// Options for `HtmlAllocator::dropdown`.
#[derive(Debug, Clone)]
pub struct DropdownOptions {
    /// Values to mark as selected.
    pub selected: Vec<KString>,
    pub autosubmit: bool,
    /// Offer the "No Entry" code `-1` first.
    pub missing_allowed: bool,
    pub multiple: bool,
    pub size: u32,
    /// Group label -> values, rendered instead of the flat code list.
    pub optgroups: Option<AList<KString, Vec<KString>>>,
}

impl Default for DropdownOptions {
    fn default() -> Self {
        DropdownOptions {
            selected: Vec::new(),
            autosubmit: false,
            missing_allowed: true,
            multiple: false,
            size: 1,
            optgroups: None,
        }
    }
}

impl DropdownOptions {
    pub fn selected<T>(mut self, value: T) -> Self
    where KString: MyFrom<T>
    {
        self.selected = vec![KString::myfrom(value)];
        self
    }

    pub fn selected_list<T>(mut self, values: impl IntoIterator<Item = T>) -> Self
    where KString: MyFrom<T>
    {
        self.selected = values.into_iter().map(KString::myfrom).collect();
        self
    }

    /// Take the selection from the submitted value(s) of field `name`
    /// (`name[]` for multiple selection).
    pub fn selected_from(mut self, source: &dyn FieldSource, name: &str) -> Self {
        self.selected = if self.multiple {
            source.get_list(name)
        } else {
            vec![source.get(name, None, None)]
        };
        self
    }

    pub fn missing_allowed(mut self, yes: bool) -> Self {
        self.missing_allowed = yes;
        self
    }

    pub fn autosubmit(mut self, yes: bool) -> Self {
        self.autosubmit = yes;
        self
    }

    /// Should be called before `selected_from`.
    pub fn multiple(mut self, size: u32) -> Self {
        self.multiple = true;
        self.size = size;
        self
    }

    pub fn optgroups(mut self, groups: AList<KString, Vec<KString>>) -> Self {
        self.optgroups = Some(groups);
        self
    }
}


#[derive(Debug, Clone)]
pub struct SelectData {
    pub codes: Codes,
    pub options: DropdownOptions,
}

impl SelectData {
    /// The codes actually offered, including the missing code if
    /// allowed.
    pub fn offered(&self) -> AList<KString, KString> {
        let mut offered = AList::new();
        if self.options.missing_allowed {
            offered.insert(KString::from_static(MISSING_CODE_ID),
                           KString::from_static(MISSING_CODE_LABEL));
        }
        for (k, v) in self.codes.pairs() {
            offered.insert(k, v);
        }
        offered
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.options.selected.iter().any(|s| s.as_str() == code)
    }
}


impl HtmlAllocator {
    /// Add a `<select name=..>` to `parent`.
    pub fn dropdown(&mut self,
                    parent: AId<Node>,
                    name: &str,
                    codes: Codes,
                    options: DropdownOptions) -> Result<AId<Node>> {
        let mut e = Element::new(&SELECT_META);
        e.set_attribute("name", name);
        e.data = ElementData::Select(Box::new(SelectData { codes, options }));
        let id = self.allocate_element(e);
        self.add(parent, id)
    }
}
