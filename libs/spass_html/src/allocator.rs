use std::{marker::PhantomData,
          sync::atomic::{AtomicU32, Ordering}};

use anyhow::{Result, bail};
use kstring::KString;

use crate::{alist::AList,
            error::StructuralError,
            meta::{ElementMeta, FORM_META},
            myfrom::MyFrom,
            select::SelectData};


static NEXT_ALLOCATOR_ID: AtomicU32 = AtomicU32::new(0);

fn next_allocator_id() -> u32 {
    NEXT_ALLOCATOR_ID.fetch_add(1, Ordering::Relaxed)
}

/// Identifies the allocator an `AId` was issued by.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RegionId {
    allocator_id: u32,
}

/// Id of a value stored in a `HtmlAllocator`. Only valid with the
/// allocator that created it; using it with another one gives a
/// `StructuralError::ForeignId`.
#[derive(Debug)]
pub struct AId<T> {
    t: PhantomData<fn() -> T>,
    regionid: RegionId,
    id: u32,
}

impl<T> AId<T> {
    fn new(regionid: RegionId, id: u32) -> AId<T> {
        AId { t: PhantomData, regionid, id }
    }
}

// derive is broken when using PhantomData, so do it manually:
impl<T> Clone for AId<T> {
    fn clone(&self) -> Self {
        Self { t: PhantomData, regionid: self.regionid, id: self.id }
    }
}
impl<T> Copy for AId<T> {}
impl<T> PartialEq for AId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.regionid == other.regionid && self.id == other.id
    }
}
impl<T> Eq for AId<T> {}


/// Something to put into a container.
#[derive(Debug, Clone)]
pub enum Child {
    Text(KString),
    Node(AId<Node>),
}

impl From<AId<Node>> for Child {
    fn from(id: AId<Node>) -> Self { Child::Node(id) }
}
impl From<&str> for Child {
    fn from(s: &str) -> Self { Child::Text(KString::from_ref(s)) }
}
impl From<String> for Child {
    fn from(s: String) -> Self { Child::Text(KString::from_string(s)) }
}
impl From<KString> for Child {
    fn from(s: KString) -> Self { Child::Text(s) }
}
impl From<&KString> for Child {
    fn from(s: &KString) -> Self { Child::Text(s.clone()) }
}
impl From<i64> for Child {
    fn from(v: i64) -> Self { Child::Text(KString::myfrom(v)) }
}


/// Per-kind payload of an element.
#[derive(Debug, Clone)]
pub enum ElementData {
    Plain,
    TextArea(Option<KString>),
    Select(Box<SelectData>),
}

#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) meta: &'static ElementMeta,
    pub(crate) data: ElementData,
    pub(crate) attr: AList<KString, KString>,
    pub(crate) styles: AList<KString, KString>,
    pub(crate) id: Option<KString>,
    pub(crate) class: Option<KString>,
    pub(crate) body: Vec<AId<Node>>,
}

impl Element {
    pub fn new(meta: &'static ElementMeta) -> Self {
        Element {
            meta,
            data: ElementData::Plain,
            attr: AList::new(),
            styles: AList::new(),
            id: None,
            class: None,
            body: Vec::new(),
        }
    }

    /// Sets `id` and `class` the way most constructors do, as the
    /// first attributes.
    pub fn with_id_class(meta: &'static ElementMeta,
                         id: Option<&str>,
                         class: Option<&str>) -> Self {
        let mut e = Element::new(meta);
        if let Some(id) = id {
            e.set_id(id);
        }
        if let Some(class) = class {
            e.set_class(class);
        }
        e
    }

    pub fn meta(&self) -> &'static ElementMeta { self.meta }
    pub fn tag_name(&self) -> &'static str { self.meta.tag_name }
    pub fn is_form(&self) -> bool { std::ptr::eq(self.meta, &FORM_META) }
    pub fn id(&self) -> Option<&KString> { self.id.as_ref() }
    pub fn class(&self) -> Option<&KString> { self.class.as_ref() }
    pub fn attr(&self) -> &AList<KString, KString> { &self.attr }
    pub fn styles(&self) -> &AList<KString, KString> { &self.styles }
    pub fn body(&self) -> &[AId<Node>] { &self.body }
    pub fn data(&self) -> &ElementData { &self.data }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attr.get(key).map(|v| v.as_str())
    }
    pub fn style(&self, key: &str) -> Option<&str> {
        self.styles.get(key).map(|v| v.as_str())
    }

    pub fn set_attribute<K, V>(&mut self, key: K, val: V)
    where KString: MyFrom<K> + MyFrom<V>
    {
        self.attr.insert(KString::myfrom(key), KString::myfrom(val));
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<KString> {
        self.attr.remove(key)
    }

    pub fn set_style<K, V>(&mut self, key: K, val: V)
    where KString: MyFrom<K> + MyFrom<V>
    {
        self.styles.insert(KString::myfrom(key), KString::myfrom(val));
    }

    pub fn set_id(&mut self, id: &str) {
        self.set_attribute("id", id);
        self.id = Some(KString::from_ref(id));
    }

    pub fn set_class(&mut self, class: &str) {
        self.set_attribute("class", class);
        self.class = Some(KString::from_ref(class));
    }
}


/// A value stored in the allocator.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(KString),
    /// Left behind where a replaced node used to be.
    None,
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
            Node::None => None,
        }
    }
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Element(_) => None,
            Node::Text(s) => Some(s.as_str()),
            Node::None => None,
        }
    }
}

#[derive(Debug)]
struct Slot {
    node: Node,
    parent: Option<AId<Node>>,
    depth: u32,
}


/// Owns all nodes of one or more trees. Containers refer to their
/// children, and children to their parent, by `AId`.
pub struct HtmlAllocator {
    regionid: RegionId,
    nodes: Vec<Slot>,
}

impl Default for HtmlAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlAllocator {
    pub fn new() -> Self {
        HtmlAllocator {
            regionid: RegionId { allocator_id: next_allocator_id() },
            nodes: Vec::new(),
        }
    }

    pub fn regionid(&self) -> RegionId {
        self.regionid
    }

    fn index(&self, id: AId<Node>) -> Result<usize> {
        if id.regionid != self.regionid {
            bail!(StructuralError::ForeignId)
        }
        Ok(id.id as usize)
    }

    fn slot(&self, id: AId<Node>) -> Result<&Slot> {
        let i = self.index(id)?;
        // Ids are only handed out after their slot has been pushed.
        self.nodes.get(i).ok_or_else(|| StructuralError::ForeignId.into())
    }

    fn slot_mut(&mut self, id: AId<Node>) -> Result<&mut Slot> {
        let i = self.index(id)?;
        self.nodes.get_mut(i).ok_or_else(|| StructuralError::ForeignId.into())
    }

    fn push(&mut self, node: Node) -> AId<Node> {
        let id = self.nodes.len();
        self.nodes.push(Slot { node, parent: None, depth: 0 });
        AId::new(self.regionid, id as u32)
    }

    /// Store a new, parentless element.
    pub fn allocate_element(&mut self, elt: Element) -> AId<Node> {
        self.push(Node::Element(elt))
    }

    /// Store a new, parentless element without attributes.
    pub fn new_element(&mut self, meta: &'static ElementMeta) -> AId<Node> {
        self.allocate_element(Element::new(meta))
    }

    pub fn text<T>(&mut self, s: T) -> AId<Node>
    where KString: MyFrom<T>
    {
        self.push(Node::Text(KString::myfrom(s)))
    }

    pub fn get_node(&self, id: AId<Node>) -> Option<&Node> {
        self.slot(id).ok().map(|s| &s.node)
    }

    pub fn element(&self, id: AId<Node>) -> Result<&Element> {
        match &self.slot(id)?.node {
            Node::Element(e) => Ok(e),
            _ => bail!(StructuralError::NotAnElement),
        }
    }

    pub fn element_mut(&mut self, id: AId<Node>) -> Result<&mut Element> {
        match &mut self.slot_mut(id)?.node {
            Node::Element(e) => Ok(e),
            _ => bail!(StructuralError::NotAnElement),
        }
    }

    /// Like `element` but also checks the tag.
    pub fn expect_element(&self, id: AId<Node>, meta: &'static ElementMeta)
                          -> Result<&Element> {
        let e = self.element(id)?;
        if !std::ptr::eq(e.meta, meta) {
            bail!(StructuralError::WrongElement {
                expected: meta.tag_name,
                got: e.meta.tag_name
            })
        }
        Ok(e)
    }

    pub fn parent(&self, id: AId<Node>) -> Result<Option<AId<Node>>> {
        Ok(self.slot(id)?.parent)
    }

    pub fn depth(&self, id: AId<Node>) -> Result<u32> {
        Ok(self.slot(id)?.depth)
    }

    pub fn children(&self, id: AId<Node>) -> Result<&[AId<Node>]> {
        Ok(&self.element(id)?.body)
    }

    /// The `i`th child of container `id`.
    pub fn child(&self, id: AId<Node>, i: usize) -> Result<Option<AId<Node>>> {
        Ok(self.children(id)?.get(i).copied())
    }

    /// The first child if it is a text node.
    pub fn first_text(&self, id: AId<Node>) -> Result<Option<&str>> {
        Ok(match self.children(id)?.first() {
            Some(c) => self.get_node(*c).and_then(Node::as_text),
            None => None,
        })
    }

    /// Append `child` to container `parent`. Returns the child if it
    /// is a node, `parent` for text, to continue building from there.
    pub fn add(&mut self, parent: AId<Node>, child: impl Into<Child>)
               -> Result<AId<Node>> {
        match child.into() {
            Child::Text(s) => {
                self.check_container(parent)?;
                if !s.is_empty() {
                    let t = self.push(Node::Text(s));
                    self.link_child(parent, t, None)?;
                }
                Ok(parent)
            }
            Child::Node(c) => {
                self.link_child(parent, c, None)?;
                Ok(c)
            }
        }
    }

    /// Replace the `i`th child of `parent` with `child`; the old child
    /// is dropped. Returns `child`.
    pub fn replace_child(&mut self, parent: AId<Node>, i: usize, child: AId<Node>)
                         -> Result<AId<Node>> {
        let old = self.child(parent, i)?.ok_or_else(
            || anyhow::anyhow!("replace_child: no child at index {i}"))?;
        self.link_child(parent, child, Some(i))?;
        let slot = self.slot_mut(old)?;
        slot.node = Node::None;
        slot.parent = None;
        Ok(child)
    }

    /// Set the text of a container to `s`, removing all its children.
    pub fn set_text<T>(&mut self, id: AId<Node>, s: T) -> Result<()>
    where KString: MyFrom<T>
    {
        self.check_container(id)?;
        let t = self.push(Node::Text(KString::myfrom(s)));
        let old = std::mem::take(&mut self.element_mut(id)?.body);
        for c in old {
            let slot = self.slot_mut(c)?;
            slot.node = Node::None;
            slot.parent = None;
        }
        self.link_child(id, t, None)
    }

    fn check_container(&self, id: AId<Node>) -> Result<()> {
        let meta = self.element(id)?.meta;
        if !meta.allows_children() {
            bail!(StructuralError::NotAContainer { tag: meta.tag_name })
        }
        Ok(())
    }

    // Make `child` a child of `parent`, appended or at `replace_at`.
    fn link_child(&mut self, parent: AId<Node>, child: AId<Node>, replace_at: Option<usize>)
            -> Result<()> {
        self.check_container(parent)?;
        if self.slot(child)?.parent.is_some() {
            bail!(StructuralError::AlreadyHasParent)
        }
        let mut cur = Some(parent);
        while let Some(c) = cur {
            if c == child {
                bail!(StructuralError::Cycle)
            }
            cur = self.slot(c)?.parent;
        }
        {
            let body = &mut self.element_mut(parent)?.body;
            match replace_at {
                Some(i) => body[i] = child,
                None => body.push(child),
            }
        }
        let slot = self.slot_mut(child)?;
        slot.parent = Some(parent);
        slot.depth += 1;
        Ok(())
    }

    pub fn set_attribute<K, V>(&mut self, id: AId<Node>, key: K, val: V) -> Result<()>
    where KString: MyFrom<K> + MyFrom<V>
    {
        self.element_mut(id)?.set_attribute(key, val);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: AId<Node>, key: &str) -> Result<Option<KString>> {
        Ok(self.element_mut(id)?.remove_attribute(key))
    }

    pub fn set_style<K, V>(&mut self, id: AId<Node>, key: K, val: V) -> Result<()>
    where KString: MyFrom<K> + MyFrom<V>
    {
        self.element_mut(id)?.set_style(key, val);
        Ok(())
    }

    pub fn set_id(&mut self, id: AId<Node>, html_id: &str) -> Result<()> {
        self.element_mut(id)?.set_id(html_id);
        Ok(())
    }

    pub fn is_form(&self, id: AId<Node>) -> bool {
        self.element(id).map(|e| e.is_form()).unwrap_or(false)
    }

    fn form_id(&self, id: AId<Node>) -> Option<KString> {
        self.element(id).ok().and_then(|e| e.id.clone())
    }

    /// The nearest form ancestor of `id`, if any. Fails if that form
    /// sits inside another form, or if `id` is itself a form inside
    /// it.
    pub fn find_enclosing_form(&self, id: AId<Node>) -> Result<Option<AId<Node>>> {
        let parent = match self.parent(id)? {
            None => return Ok(None),
            Some(p) => p,
        };
        let parent_form = if self.is_form(parent) {
            Some(parent)
        } else {
            self.find_enclosing_form(parent)?
        };
        if let Some(form) = parent_form {
            if let Some(outer) = self.find_enclosing_form(form)? {
                bail!(StructuralError::NestedForms {
                    inner: self.form_id(form),
                    outer: self.form_id(outer),
                })
            }
            if self.is_form(id) {
                bail!(StructuralError::NestedForms {
                    inner: self.form_id(id),
                    outer: self.form_id(form),
                })
            }
        }
        Ok(parent_form)
    }
}


/// Conversion of the `content` argument of the element constructors
/// into children. Empty strings add nothing.
pub trait ToBody {
    fn append_to(self, html: &mut HtmlAllocator, parent: AId<Node>) -> Result<()>;
}

impl ToBody for &str {
    fn append_to(self, html: &mut HtmlAllocator, parent: AId<Node>) -> Result<()> {
        if !self.is_empty() {
            html.add(parent, self)?;
        }
        Ok(())
    }
}

impl ToBody for String {
    fn append_to(self, html: &mut HtmlAllocator, parent: AId<Node>) -> Result<()> {
        self.as_str().append_to(html, parent)
    }
}

impl ToBody for &String {
    fn append_to(self, html: &mut HtmlAllocator, parent: AId<Node>) -> Result<()> {
        self.as_str().append_to(html, parent)
    }
}

impl ToBody for KString {
    fn append_to(self, html: &mut HtmlAllocator, parent: AId<Node>) -> Result<()> {
        if !self.is_empty() {
            html.add(parent, self)?;
        }
        Ok(())
    }
}

impl ToBody for &KString {
    fn append_to(self, html: &mut HtmlAllocator, parent: AId<Node>) -> Result<()> {
        self.clone().append_to(html, parent)
    }
}

impl ToBody for AId<Node> {
    fn append_to(self, html: &mut HtmlAllocator, parent: AId<Node>) -> Result<()> {
        html.add(parent, self)?;
        Ok(())
    }
}

impl<const N: usize> ToBody for [AId<Node>; N] {
    fn append_to(self, html: &mut HtmlAllocator, parent: AId<Node>) -> Result<()> {
        for id in self {
            html.add(parent, id)?;
        }
        Ok(())
    }
}

impl<T: ToBody> ToBody for Option<T> {
    fn append_to(self, html: &mut HtmlAllocator, parent: AId<Node>) -> Result<()> {
        match self {
            Some(v) => v.append_to(html, parent),
            None => Ok(()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{DIV_META, INPUT_META};

    #[test]
    fn t_parent_is_set_once() {
        let mut html = HtmlAllocator::new();
        let a = html.new_element(&DIV_META);
        let b = html.new_element(&DIV_META);
        let c = html.new_element(&DIV_META);
        assert_eq!(html.add(a, c).unwrap(), c);
        assert_eq!(html.parent(c).unwrap(), Some(a));
        assert_eq!(html.depth(c).unwrap(), 1);
        let e = html.add(b, c).err().unwrap();
        assert_eq!(e.downcast_ref::<StructuralError>(),
                   Some(&StructuralError::AlreadyHasParent));
        assert_eq!(html.parent(c).unwrap(), Some(a));
        assert_eq!(html.children(b).unwrap().len(), 0);
    }

    #[test]
    fn t_text_returns_container() {
        let mut html = HtmlAllocator::new();
        let a = html.new_element(&DIV_META);
        assert_eq!(html.add(a, "hi").unwrap(), a);
        assert_eq!(html.first_text(a).unwrap(), Some("hi"));
    }

    #[test]
    fn t_empty_text_is_not_stored() {
        let mut html = HtmlAllocator::new();
        let a = html.new_element(&DIV_META);
        assert_eq!(html.add(a, "").unwrap(), a);
        assert!(html.children(a).unwrap().is_empty());
        assert_eq!(html.first_text(a).unwrap(), None);
        html.add(a, "x").unwrap();
        html.add(a, "").unwrap();
        assert_eq!(html.children(a).unwrap().len(), 1);
    }

    #[test]
    fn t_cycle() {
        let mut html = HtmlAllocator::new();
        let a = html.new_element(&DIV_META);
        let b = html.new_element(&DIV_META);
        html.add(a, b).unwrap();
        let e = html.add(b, a).err().unwrap();
        assert_eq!(e.downcast_ref::<StructuralError>(), Some(&StructuralError::Cycle));
        let e = html.add(a, a).err().unwrap();
        assert_eq!(e.downcast_ref::<StructuralError>(), Some(&StructuralError::Cycle));
    }

    #[test]
    fn t_void_elements_take_no_children() {
        let mut html = HtmlAllocator::new();
        let input = html.new_element(&INPUT_META);
        let e = html.add(input, "x").err().unwrap();
        assert_eq!(e.downcast_ref::<StructuralError>(),
                   Some(&StructuralError::NotAContainer { tag: "input" }));
    }

    #[test]
    fn t_foreign_id() {
        let mut html1 = HtmlAllocator::new();
        let mut html2 = HtmlAllocator::new();
        let a = html1.new_element(&DIV_META);
        let b = html2.new_element(&DIV_META);
        assert!(html1.element(b).is_err());
        let e = html2.add(b, a).err().unwrap();
        assert_eq!(e.downcast_ref::<StructuralError>(), Some(&StructuralError::ForeignId));
    }

    #[test]
    fn t_replace_child() {
        let mut html = HtmlAllocator::new();
        let a = html.new_element(&DIV_META);
        let b = html.new_element(&DIV_META);
        let c = html.new_element(&DIV_META);
        html.add(a, b).unwrap();
        html.replace_child(a, 0, c).unwrap();
        assert_eq!(html.children(a).unwrap(), &[c]);
        assert_eq!(html.parent(c).unwrap(), Some(a));
        assert!(matches!(html.get_node(b), Some(Node::None)));
    }
}
