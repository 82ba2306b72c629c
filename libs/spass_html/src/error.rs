//! The error kinds raised while building, composing and rendering
//! trees. All public operations return `anyhow::Result`; callers that
//! need to tell the kinds apart use `downcast_ref`.

use kstring::KString;

/// The tree, or a widget's place in it, is not usable.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StructuralError {
    #[error("nested forms detected: {inner:?} within {outer:?}")]
    NestedForms { inner: Option<KString>, outer: Option<KString> },
    #[error("result tables have to be direct or indirect children of a form")]
    MissingForm,
    #[error("the enclosing form needs an id")]
    MissingFormId,
    #[error("listing index {column:?} not in list content ({available:?})")]
    MissingIndexColumn { column: KString, available: Vec<KString> },
    #[error("a single selection value needs a single-column listing index, \
             got {index:?}")]
    ScalarSelectionNeedsSingleIndex { index: Vec<KString> },
    #[error("compose() was already called on this widget")]
    AlreadyComposed,
    #[error("node already has a parent")]
    AlreadyHasParent,
    #[error("adding a node into its own subtree")]
    Cycle,
    #[error("element {tag:?} can't have children")]
    NotAContainer { tag: &'static str },
    #[error("expected a {expected:?} element, got {got:?}")]
    WrongElement { expected: &'static str, got: &'static str },
    #[error("id does not belong to this allocator")]
    ForeignId,
    #[error("id does not refer to an element")]
    NotAnElement,
}

/// A configuration the editor does not implement.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum UnsupportedConfigurationError {
    #[error("column {column:?}: multi choice editing is not implemented")]
    MultiChoice { column: KString },
    #[error("column {column:?}: display size {size} is not implemented, only 1")]
    DisplaySize { column: KString, size: u32 },
}

/// Content that doesn't have the shape a widget needs.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DataShapeError {
    #[error("first content row does not expose column names")]
    NoColumnNames,
    #[error("selection needs a sequence of rows, not a single record")]
    RecordNotSelectable,
    #[error("invalid content JSON: {0}")]
    Json(String),
}
