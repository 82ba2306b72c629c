//! `ResultChoice` and `ResultEditor`: listings whose rows can be
//! selected (and edited) by clicking them.
//!
//! The selection travels through hidden fields of the enclosing form:
//! a click sets them via JavaScript and submits the form; on the next
//! request `Selection::from_fields` reads them back.

use anyhow::{Result, anyhow, bail};
use itertools::Itertools;
use kstring::KString;

use crate::{alist::AList,
            allocator::{AId, Element, HtmlAllocator, Node},
            error::{DataShapeError, StructuralError, UnsupportedConfigurationError},
            input::FieldSource,
            js,
            listing::{ListingOptions, ResultListing},
            meta::TD_META,
            myfrom::MyFrom,
            select::{Codes, DropdownOptions},
            value::{Content, Row}};

/// Prefix of the hidden fields carrying the selection.
pub const PREFIX: &str = "_rct_selected_";
pub const DEFAULT_TRIGGER: &str = "trigger";
/// Name of the save button in the edited row.
pub const SAVE_NAME: &str = "submit_save_resulteditor";
pub const SAVE_LABEL: &str = "save";
/// Separates the values of several selected rows in a hidden field.
pub const MULTI_SEPARATOR: &str = ";";

/// The column(s) identifying a row.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingIndex(Vec<KString>);

impl ListingIndex {
    pub fn columns(&self) -> &[KString] { &self.0 }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn first(&self) -> Option<&KString> { self.0.first() }
}

impl From<&str> for ListingIndex {
    fn from(s: &str) -> Self { ListingIndex(vec![KString::from_ref(s)]) }
}
impl From<KString> for ListingIndex {
    fn from(s: KString) -> Self { ListingIndex(vec![s]) }
}
impl From<Vec<&str>> for ListingIndex {
    fn from(v: Vec<&str>) -> Self { ListingIndex(v.into_iter().map(KString::from_ref).collect()) }
}
impl From<Vec<KString>> for ListingIndex {
    fn from(v: Vec<KString>) -> Self { ListingIndex(v) }
}
impl<const N: usize> From<[&str; N]> for ListingIndex {
    fn from(v: [&str; N]) -> Self { ListingIndex(v.into_iter().map(KString::from_ref).collect()) }
}

/// Values of the index columns of one row.
pub type RowKey = AList<KString, KString>;

fn row_key<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> RowKey
where KString: MyFrom<K> + MyFrom<V>
{
    pairs.into_iter().map(|(k, v)| (KString::myfrom(k), KString::myfrom(v))).collect()
}

/// The selection as given by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionInput {
    None,
    /// The value of the single index column.
    Value(KString),
    Row(RowKey),
    /// Several selected rows; switches the listing to multi selection.
    Rows(Vec<RowKey>),
}

impl SelectionInput {
    pub fn value<T>(v: T) -> Self
    where KString: MyFrom<T>
    {
        SelectionInput::Value(KString::myfrom(v))
    }

    pub fn row<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where KString: MyFrom<K> + MyFrom<V>
    {
        SelectionInput::Row(row_key(pairs))
    }

    pub fn rows<K, V, R>(rows: impl IntoIterator<Item = R>) -> Self
    where KString: MyFrom<K> + MyFrom<V>,
          R: IntoIterator<Item = (K, V)>
    {
        SelectionInput::Rows(rows.into_iter().map(row_key).collect())
    }
}

impl From<&str> for SelectionInput {
    fn from(s: &str) -> Self { SelectionInput::Value(KString::from_ref(s)) }
}
impl From<KString> for SelectionInput {
    fn from(s: KString) -> Self { SelectionInput::Value(s) }
}
impl From<i64> for SelectionInput {
    fn from(i: i64) -> Self { SelectionInput::value(i) }
}

impl From<Selection> for SelectionInput {
    fn from(s: Selection) -> Self {
        match s {
            Selection::None => SelectionInput::None,
            Selection::Row(k) => SelectionInput::Row(k),
            Selection::Rows(ks) => SelectionInput::Rows(ks),
        }
    }
}

/// The selection after normalisation against the listing index.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    None,
    Row(RowKey),
    Rows(Vec<RowKey>),
}

impl Selection {
    /// A single value is turned into a row key for the (only) index
    /// column.
    pub fn normalize(input: SelectionInput, index: &ListingIndex) -> Result<Self> {
        Ok(match input {
            SelectionInput::None => Selection::None,
            SelectionInput::Value(v) => {
                if index.len() != 1 {
                    bail!(StructuralError::ScalarSelectionNeedsSingleIndex {
                        index: index.0.clone()
                    })
                }
                Selection::Row([(index.0[0].clone(), v)].into_iter().collect())
            }
            SelectionInput::Row(k) => Selection::Row(k),
            SelectionInput::Rows(ks) => Selection::Rows(ks),
        })
    }

    /// Read back the selection from the hidden fields posted with the
    /// form. With `multi`, values are split on `;` and the result is
    /// always `Rows`, possibly empty.
    pub fn from_fields(source: &dyn FieldSource, index: &ListingIndex, multi: bool) -> Self {
        let values: Vec<(KString, KString)> = index.0.iter()
            .map(|col| (col.clone(), source.get(&format!("{PREFIX}{col}"), None, None)))
            .collect();
        if multi {
            let split: Vec<(&KString, Vec<&str>)> = values.iter()
                .map(|(col, v)| {
                    (col, v.split(MULTI_SEPARATOR).filter(|s| !s.is_empty()).collect())
                })
                .collect();
            let n = split.iter().map(|(_, vs)| vs.len()).max().unwrap_or(0);
            Selection::Rows((0..n).map(|i| {
                split.iter()
                    .filter_map(|(col, vs)| {
                        vs.get(i).map(|v| ((*col).clone(), KString::from_ref(v)))
                    })
                    .collect()
            }).collect())
        } else if values.iter().all(|(_, v)| v.is_empty()) {
            Selection::None
        } else {
            Selection::Row(values.into_iter().filter(|(_, v)| !v.is_empty()).collect())
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Selection::Rows(_))
    }

    fn key_matches(key: &RowKey, row: &Row, index: &ListingIndex) -> bool {
        index.0.iter().all(|col| {
            key.get(col.as_str()).map(|v| *v == row.get_str(col)).unwrap_or(false)
        })
    }

    /// Whether `row` is selected. Values are compared as strings.
    pub fn matches(&self, row: &Row, index: &ListingIndex) -> bool {
        match self {
            Selection::None => false,
            Selection::Row(key) => Self::key_matches(key, row, index),
            Selection::Rows(keys) => keys.iter().any(|key| Self::key_matches(key, row, index)),
        }
    }

    /// The value for the hidden field of index column `column`.
    pub fn hidden_value(&self, column: &str) -> Option<KString> {
        match self {
            Selection::None => None,
            Selection::Row(key) => key.get(column).cloned(),
            Selection::Rows(keys) => Some(KString::from_string(
                keys.iter().filter_map(|k| k.get(column)).join(MULTI_SEPARATOR))),
        }
    }
}


/// Per-column code configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnConfig {
    pub codes: Codes,
    pub multi_choice: bool,
    pub display_size: u32,
}

/// What a `RowAnnotator` gets to see of the widget.
pub struct ChoiceView<'a> {
    pub listing: &'a ResultListing,
    pub index: &'a ListingIndex,
    pub columns_config: &'a AList<KString, ColumnConfig>,
}

/// Decides what happens to the rendered row of a selected content
/// row.
pub trait RowAnnotator {
    fn selected_row(&self, html: &mut HtmlAllocator, row: AId<Node>, view: &ChoiceView)
                    -> Result<()>;
}

/// Grey background, white text.
#[derive(Debug, Clone, Default)]
pub struct HighlightSelected;

impl RowAnnotator for HighlightSelected {
    fn selected_row(&self, html: &mut HtmlAllocator, row: AId<Node>, _view: &ChoiceView)
                    -> Result<()> {
        html.set_style(row, "color", "white")?;
        html.set_style(row, "background", "grey")
    }
}

/// Turns the selected row into a form row: inputs in place of the
/// cells of unprotected columns, plus a save button.
#[derive(Debug, Clone, Default)]
pub struct EditSelected {
    pub columns_protected: Vec<KString>,
}

impl EditSelected {
    fn is_protected(&self, column: &KString, view: &ChoiceView) -> bool {
        self.columns_protected.contains(column) || view.index.0.contains(column)
    }

    fn input_cell(&self,
                  html: &mut HtmlAllocator,
                  column: &KString,
                  current: Option<KString>,
                  view: &ChoiceView) -> Result<AId<Node>> {
        let cell = html.allocate_element(Element::new(&TD_META));
        if let Some(config) = view.columns_config.get(column.as_str()) {
            if config.multi_choice {
                bail!(UnsupportedConfigurationError::MultiChoice { column: column.clone() })
            }
            if config.display_size != 1 {
                bail!(UnsupportedConfigurationError::DisplaySize {
                    column: column.clone(),
                    size: config.display_size
                })
            }
            let mut options = DropdownOptions::default().missing_allowed(false);
            if let Some(current) = current {
                options = options.selected(current);
            }
            html.dropdown(cell, column, config.codes.clone(), options)?;
        } else {
            html.textinput(cell, column, current.as_deref().unwrap_or(""), 20, None)?;
        }
        Ok(cell)
    }
}

impl RowAnnotator for EditSelected {
    fn selected_row(&self, html: &mut HtmlAllocator, row: AId<Node>, view: &ChoiceView)
                    -> Result<()> {
        html.set_style(row, "color", "white")?;
        html.set_style(row, "background", "blue")?;
        html.remove_attribute(row, "onclick")?;
        let cells = html.children(row)?.to_vec();
        for (i, (cell, column)) in cells.into_iter()
            .zip(view.listing.columns_display())
            .enumerate()
        {
            if self.is_protected(column, view) {
                continue;
            }
            let current = html.first_text(cell)?.map(KString::from_ref);
            let new_cell = self.input_cell(html, column, current, view)?;
            html.replace_child(row, i, new_cell)?;
        }
        let cell_submit = html.td(row, "")?;
        let button = html.submit(cell_submit, SAVE_NAME, SAVE_LABEL, None, None)?;
        html.set_attribute(button, "autofocus", "autofocus")
    }
}


/// A `ResultListing` with selectable rows. Build it, configure it
/// (`set_codes`), then call `compose` once before rendering.
#[derive(Debug)]
pub struct ResultChoice<A: RowAnnotator = HighlightSelected> {
    listing: ResultListing,
    index: ListingIndex,
    selection: Selection,
    columns_config: AList<KString, ColumnConfig>,
    columns_with_mappings: Vec<KString>,
    annotator: A,
    widget_id: Option<KString>,
    composed: bool,
}

/// Selected rows become editable.
pub type ResultEditor = ResultChoice<EditSelected>;

impl ResultChoice<HighlightSelected> {
    pub fn new(html: &mut HtmlAllocator,
               parent: AId<Node>,
               content: impl Into<Content>,
               index: impl Into<ListingIndex>,
               selected: impl Into<SelectionInput>,
               options: ListingOptions) -> Result<Self> {
        Self::with_annotator(html, parent, content, index, selected, options, HighlightSelected)
    }
}

impl ResultChoice<EditSelected> {
    /// The index columns are protected in any case.
    pub fn new_editor<T>(html: &mut HtmlAllocator,
                         parent: AId<Node>,
                         content: impl Into<Content>,
                         index: impl Into<ListingIndex>,
                         selected: impl Into<SelectionInput>,
                         options: ListingOptions,
                         columns_protected: impl IntoIterator<Item = T>) -> Result<Self>
    where KString: MyFrom<T>
    {
        let index = index.into();
        let mut protected: Vec<KString> =
            columns_protected.into_iter().map(KString::myfrom).collect();
        for col in index.columns() {
            if !protected.contains(col) {
                protected.push(col.clone());
            }
        }
        Self::with_annotator(html, parent, content, index, selected, options,
                             EditSelected { columns_protected: protected })
    }

    pub fn columns_protected(&self) -> &[KString] {
        &self.annotator.columns_protected
    }
}

impl<A: RowAnnotator> ResultChoice<A> {
    pub fn with_annotator(html: &mut HtmlAllocator,
                          parent: AId<Node>,
                          content: impl Into<Content>,
                          index: impl Into<ListingIndex>,
                          selected: impl Into<SelectionInput>,
                          options: ListingOptions,
                          annotator: A) -> Result<Self> {
        let index = index.into();
        let selection = Selection::normalize(selected.into(), &index)?;
        let listing = ResultListing::new(html, parent, content, options)?;
        Ok(ResultChoice {
            listing,
            index,
            selection,
            columns_config: AList::new(),
            columns_with_mappings: Vec::new(),
            annotator,
            widget_id: None,
            composed: false,
        })
    }

    /// Id of this widget, used to name its trigger field.
    pub fn set_id(&mut self, id: &str) -> &mut Self {
        self.widget_id = Some(KString::from_ref(id));
        self
    }

    /// Code table for `column`; map codes also replace the shown
    /// values by their labels.
    pub fn set_codes(&mut self, column: &str, codes: Codes) -> &mut Self {
        self.set_codes_config(column, codes, false, 1)
    }

    pub fn set_codes_config(&mut self,
                            column: &str,
                            codes: Codes,
                            multi_choice: bool,
                            display_size: u32) -> &mut Self {
        let column = KString::from_ref(column);
        if codes.is_map() && !self.columns_with_mappings.contains(&column) {
            self.columns_with_mappings.push(column.clone());
        }
        self.columns_config.insert(column, ColumnConfig { codes, multi_choice, display_size });
        self
    }

    pub fn listing(&self) -> &ResultListing { &self.listing }
    pub fn index(&self) -> &ListingIndex { &self.index }
    pub fn selection(&self) -> &Selection { &self.selection }
    pub fn columns_config(&self) -> &AList<KString, ColumnConfig> { &self.columns_config }
    pub fn columns_with_mappings(&self) -> &[KString] { &self.columns_with_mappings }
    pub fn container(&self) -> AId<Node> { self.listing.container() }

    pub fn trigger_name(&self) -> KString {
        match &self.widget_id {
            Some(id) => KString::from_string(format!("{id}_{DEFAULT_TRIGGER}")),
            None => KString::from_static(DEFAULT_TRIGGER),
        }
    }

    pub fn is_selected_row(&self, row: &Row) -> bool {
        self.selection.matches(row, &self.index)
    }

    /// Wire up the rows with the enclosing form and add the hidden
    /// fields.
    pub fn compose(&mut self, html: &mut HtmlAllocator) -> Result<()> {
        if self.composed {
            bail!(StructuralError::AlreadyComposed)
        }
        self.composed = true;

        let form = html.find_enclosing_form(self.listing.container())?
            .ok_or(StructuralError::MissingForm)?;
        let form_id = html.element(form)?.id()
            .filter(|id| !id.is_empty())
            .cloned()
            .ok_or(StructuralError::MissingFormId)?;

        let rows: &[Row] = match self.listing.content() {
            content if content.is_empty() => &[],
            Content::Rows(rows) => rows,
            Content::Record(_) => bail!(DataShapeError::RecordNotSelectable),
        };
        if let Some(first) = rows.first() {
            for col in self.index.columns() {
                if !first.contains_key(col) {
                    bail!(StructuralError::MissingIndexColumn {
                        column: col.clone(),
                        available: first.keys().unwrap_or_default(),
                    })
                }
            }
        }

        let trigger = self.trigger_name();
        let single_column_toggle = self.selection.is_multi() && self.index.len() == 1;
        let view = ChoiceView {
            listing: &self.listing,
            index: &self.index,
            columns_config: &self.columns_config,
        };
        tracing::debug!("compose: form {form_id:?}, {} rows, selection {:?}",
                        rows.len(), self.selection);
        for (i, row_dat) in rows.iter().take(self.listing.options().row_limit).enumerate() {
            let row = self.listing.data_row(html, i)?
                .ok_or_else(|| anyhow!("listing table has no row for content row {i}"))?;

            let onclick = if single_column_toggle {
                let col = &self.index.columns()[0];
                js::multi_choice_call(&form_id, col, &row_dat.get_str(col))
            } else {
                let values: Vec<(&str, KString)> = self.index.columns().iter()
                    .map(|col| (col.as_str(), row_dat.get_str(col)))
                    .collect();
                js::choice_call(&form_id,
                                values.iter().map(|(k, v)| (*k, v.as_str()))
                                .chain([(trigger.as_str(), "true")]))
            };
            html.set_attribute(row, "onclick", onclick)?;

            if self.selection.matches(row_dat, &self.index) {
                tracing::debug!("compose: row {i} is selected");
                self.annotator.selected_row(html, row, &view)?;
            }

            for column in &self.columns_with_mappings {
                let ci = match self.listing.columns_display().iter().position(|c| c == column) {
                    Some(ci) => ci,
                    None => continue,
                };
                let cell = match html.child(row, ci)? {
                    Some(cell) => cell,
                    None => continue,
                };
                // An empty cell holds the empty string. Cells replaced
                // by inputs have no text to translate.
                let raw = match html.first_text(cell)? {
                    Some(t) => KString::from_ref(t),
                    None if html.children(cell)?.is_empty() => KString::from_static(""),
                    None => continue,
                };
                if let Some(config) = self.columns_config.get(column.as_str()) {
                    if let Some(label) = config.codes.label(&raw) {
                        html.set_text(cell, label.clone())?;
                    }
                }
            }
        }

        let container = self.listing.container();
        for col in self.index.columns() {
            let name = format!("{PREFIX}{col}");
            let value = self.selection.hidden_value(col)
                .map(|v| v.to_string())
                .unwrap_or_default();
            html.hidden(container, &name, &value, Some(&name))?;
        }
        let name = format!("{PREFIX}{trigger}");
        html.hidden(container, &name, "false", Some(&name))?;
        Ok(())
    }

    pub fn to_html_string(&self, html: &HtmlAllocator) -> Result<String> {
        self.listing.to_html_string(html)
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{input::MapFields, row, value::Value};

    fn content() -> Content {
        vec![row!{"column_1" => 1, "column_2" => 2},
             row!{"column_1" => 4, "column_2" => 5}].into()
    }

    fn in_form(html: &mut HtmlAllocator) -> AId<Node> {
        let body = html.new_body();
        html.form(body, Some("form_id")).unwrap()
    }

    #[test]
    fn t_no_selection() {
        let mut html = HtmlAllocator::new();
        let form = in_form(&mut html);
        let mut rc = ResultChoice::new(&mut html, form, content(), "column_1",
                                       SelectionInput::None,
                                       ListingOptions::default()).unwrap();
        rc.compose(&mut html).unwrap();
        let s = rc.to_html_string(&html).unwrap();
        assert!(s.contains("<tr onclick=\"entryChoiceSetSelection('form_id', \
                            {'column_1':'1','trigger':'true'});\">"));
        assert!(s.contains("<tr onclick=\"entryChoiceSetSelection('form_id', \
                            {'column_1':'4','trigger':'true'});\">"));
        assert_eq!(s.matches("<tr onclick=").count(), 2);
        assert!(s.contains("<input type=\"hidden\" name=\"_rct_selected_column_1\" \
                            id=\"_rct_selected_column_1\"/>"));
        assert!(s.contains("<input type=\"hidden\" name=\"_rct_selected_trigger\" \
                            value=\"false\" id=\"_rct_selected_trigger\"/>"));
        assert!(!s.contains("background"));
    }

    #[test]
    fn t_multi_selection_styles() {
        let mut html = HtmlAllocator::new();
        let form = in_form(&mut html);
        let mut rc = ResultChoice::new(&mut html, form, content(), "column_1",
                                       SelectionInput::rows([[("column_1", "4")]]),
                                       ListingOptions::default()).unwrap();
        rc.compose(&mut html).unwrap();
        let s = rc.to_html_string(&html).unwrap();
        assert!(s.contains(
            "<tr onclick=\"entryMultiChoiceSetSelection('form_id', 'column_1', '4');\" \
             style=\"color:white;background:grey\">"));
        assert!(s.contains(
            "<tr onclick=\"entryMultiChoiceSetSelection('form_id', 'column_1', '1');\">"));
        assert!(s.contains("name=\"_rct_selected_column_1\" value=\"4\""));
    }

    #[test]
    fn t_hidden_field_round_trip() {
        let mut html = HtmlAllocator::new();
        let form = in_form(&mut html);
        let mut rc = ResultChoice::new(&mut html, form, content(), "col1",
                                       SelectionInput::row([("col1", "4")]),
                                       ListingOptions::default());
        // col1 isn't a column of the content
        let e = rc.as_mut().unwrap().compose(&mut html).err().unwrap();
        assert!(matches!(e.downcast_ref::<StructuralError>(),
                         Some(StructuralError::MissingIndexColumn { .. })));

        let mut html = HtmlAllocator::new();
        let form = in_form(&mut html);
        let rows: Vec<Row> = vec![row!{"col1" => 4, "x" => "a"}];
        let mut rc = ResultChoice::new(&mut html, form, rows, "col1",
                                       SelectionInput::row([("col1", "4")]),
                                       ListingOptions::default()).unwrap();
        rc.compose(&mut html).unwrap();
        let s = rc.to_html_string(&html).unwrap();
        assert!(s.contains("<input type=\"hidden\" name=\"_rct_selected_col1\" value=\"4\" \
                            id=\"_rct_selected_col1\"/>"));

        let fields: MapFields = [("_rct_selected_col1", "4")].into_iter().collect();
        let sel = Selection::from_fields(&fields, rc.index(), false);
        assert_eq!(&sel, rc.selection());
    }

    #[test]
    fn t_multi_hidden_value() {
        let mut html = HtmlAllocator::new();
        let form = in_form(&mut html);
        let mut rc = ResultChoice::new(&mut html, form, content(), "column_1",
                                       SelectionInput::rows([[("column_1", "4")],
                                                             [("column_1", "10")]]),
                                       ListingOptions::default()).unwrap();
        rc.compose(&mut html).unwrap();
        let s = rc.to_html_string(&html).unwrap();
        assert!(s.contains("name=\"_rct_selected_column_1\" value=\"4;10\""));

        let fields: MapFields = [("_rct_selected_column_1", "4;10")].into_iter().collect();
        assert_eq!(Selection::from_fields(&fields, rc.index(), true), *rc.selection());
        let empty = MapFields::new();
        assert_eq!(Selection::from_fields(&empty, rc.index(), true), Selection::Rows(vec![]));
        assert_eq!(Selection::from_fields(&empty, rc.index(), false), Selection::None);
    }

    #[test]
    fn t_stringified_equality() {
        let index = ListingIndex::from("id");
        let row = row!{"id" => 4};
        let sel = Selection::normalize(SelectionInput::value("4"), &index).unwrap();
        assert!(sel.matches(&row, &index));
        let sel = Selection::normalize(SelectionInput::value(5i64), &index).unwrap();
        assert!(!sel.matches(&row, &index));
        assert!(!Selection::None.matches(&row, &index));
    }

    #[test]
    fn t_multi_column_index() {
        let index = ListingIndex::from(["a", "b"]);
        let e = Selection::normalize(SelectionInput::value("1"), &index).err().unwrap();
        assert!(matches!(e.downcast_ref::<StructuralError>(),
                         Some(StructuralError::ScalarSelectionNeedsSingleIndex { .. })));

        let row = row!{"a" => 1, "b" => "x"};
        let sel = Selection::normalize(SelectionInput::row([("a", "1"), ("b", "x")]), &index)
            .unwrap();
        assert!(sel.matches(&row, &index));
        let sel = Selection::normalize(SelectionInput::row([("a", "1")]), &index).unwrap();
        assert!(!sel.matches(&row, &index));

        let mut html = HtmlAllocator::new();
        let form = in_form(&mut html);
        let mut rc = ResultChoice::new(&mut html, form, vec![row], index,
                                       SelectionInput::rows([[("a", "1"), ("b", "x")]]),
                                       ListingOptions::default()).unwrap();
        rc.set_id("list");
        rc.compose(&mut html).unwrap();
        let s = rc.to_html_string(&html).unwrap();
        // several index columns always set the full selection
        assert!(s.contains("entryChoiceSetSelection('form_id', \
                            {'a':'1','b':'x','list_trigger':'true'});"));
        assert!(s.contains("name=\"_rct_selected_list_trigger\" value=\"false\""));
    }

    #[test]
    fn t_compose_errors() {
        // no form
        let mut html = HtmlAllocator::new();
        let div = html.new_div("", None).unwrap();
        let mut rc = ResultChoice::new(&mut html, div, content(), "column_1",
                                       SelectionInput::None, ListingOptions::default()).unwrap();
        let e = rc.compose(&mut html).err().unwrap();
        assert_eq!(e.downcast_ref::<StructuralError>(), Some(&StructuralError::MissingForm));
        let e = rc.compose(&mut html).err().unwrap();
        assert_eq!(e.downcast_ref::<StructuralError>(), Some(&StructuralError::AlreadyComposed));

        // form without id, indirectly
        let mut html = HtmlAllocator::new();
        let form = html.new_form(None);
        let div = html.div(form, "", None).unwrap();
        let mut rc = ResultChoice::new(&mut html, div, content(), "column_1",
                                       SelectionInput::None, ListingOptions::default()).unwrap();
        let e = rc.compose(&mut html).err().unwrap();
        assert_eq!(e.downcast_ref::<StructuralError>(), Some(&StructuralError::MissingFormId));

        // a record can't be selected from
        let mut html = HtmlAllocator::new();
        let form = in_form(&mut html);
        let record = [(KString::from_static("k"), Value::from(1))].into_iter().collect();
        let mut rc = ResultChoice::new(&mut html, form, Content::Record(record), "k",
                                       SelectionInput::None, ListingOptions::default()).unwrap();
        let e = rc.compose(&mut html).err().unwrap();
        assert_eq!(e.downcast_ref::<DataShapeError>(),
                   Some(&DataShapeError::RecordNotSelectable));
    }

    #[test]
    fn t_empty_content() {
        let mut html = HtmlAllocator::new();
        let form = in_form(&mut html);
        let mut rc = ResultChoice::new(&mut html, form, Content::default(), "column_1",
                                       SelectionInput::None, ListingOptions::default()).unwrap();
        rc.compose(&mut html).unwrap();
        assert_eq!(rc.to_html_string(&html).unwrap(),
                   "<table><tr>\n</tr>\n\n</table>\n\
                    <input type=\"hidden\" name=\"_rct_selected_column_1\" \
                    id=\"_rct_selected_column_1\"/>\
                    <input type=\"hidden\" name=\"_rct_selected_trigger\" value=\"false\" \
                    id=\"_rct_selected_trigger\"/>");
    }

    #[test]
    fn t_empty_record() {
        let mut html = HtmlAllocator::new();
        let form = in_form(&mut html);
        let mut rc = ResultChoice::new(&mut html, form, Content::from_json_str("{}").unwrap(),
                                       "k", SelectionInput::None,
                                       ListingOptions::default()).unwrap();
        rc.compose(&mut html).unwrap();
        assert_eq!(rc.to_html_string(&html).unwrap(),
                   "<table><tr>\n</tr>\n\n</table>\n\
                    <input type=\"hidden\" name=\"_rct_selected_k\" id=\"_rct_selected_k\"/>\
                    <input type=\"hidden\" name=\"_rct_selected_trigger\" value=\"false\" \
                    id=\"_rct_selected_trigger\"/>");
    }

    #[test]
    fn t_set_codes() {
        let mut html = HtmlAllocator::new();
        let form = in_form(&mut html);
        let mut rc = ResultChoice::new(&mut html, form, content(), "column_1",
                                       SelectionInput::None, ListingOptions::default()).unwrap();
        rc.set_codes("column_1", Codes::map([(1i64, "a"), (2i64, "c")]))
            .set_codes("column_2", Codes::list(["2", "5"]));
        assert_eq!(rc.columns_with_mappings(), &[KString::from_static("column_1")]);
        rc.compose(&mut html).unwrap();
        let s = rc.to_html_string(&html).unwrap();
        assert!(s.contains("<td>\na\n</td>\n<td>\n2\n</td>"));
        // not in the code table: raw value
        assert!(s.contains("<td>\n4\n</td>\n<td>\n5\n</td>"));
        // the selection still uses the raw value
        assert!(s.contains("{'column_1':'1','trigger':'true'}"));
    }

    #[test]
    fn t_codes_for_empty_value() {
        let mut html = HtmlAllocator::new();
        let form = in_form(&mut html);
        let content: Content = vec![row!{"column_1" => 1, "column_2" => ""},
                                    row!{"column_1" => 2, "column_2" => "x"}].into();
        let mut rc = ResultChoice::new(&mut html, form, content, "column_1",
                                       SelectionInput::None, ListingOptions::default()).unwrap();
        rc.set_codes("column_2", Codes::map([("", "none"), ("x", "ex")]));
        rc.compose(&mut html).unwrap();
        let s = rc.to_html_string(&html).unwrap();
        assert!(s.contains("<td>\n1\n</td>\n<td>\nnone\n</td>"));
        assert!(s.contains("<td>\n2\n</td>\n<td>\nex\n</td>"));
    }

    fn editor_content() -> Content {
        vec![row!{"column_id" => 1, "column_2" => 2, "column_3" => "A"},
             row!{"column_id" => 2, "column_2" => 4, "column_3" => "B"},
             row!{"column_id" => 3, "column_2" => 6, "column_3" => "C"}].into()
    }

    #[test]
    fn t_editor() {
        let mut html = HtmlAllocator::new();
        let form = in_form(&mut html);
        let mut re = ResultEditor::new_editor(&mut html, form, editor_content(), "column_id",
                                              "2", ListingOptions::default(),
                                              Vec::<&str>::new()).unwrap();
        assert_eq!(re.columns_protected(), &[KString::from_static("column_id")]);
        re.set_codes("column_3", Codes::map([("A", "Alpha"), ("B", "Beta"), ("C", "Gamma")]));
        re.compose(&mut html).unwrap();
        let s = re.to_html_string(&html).unwrap();
        assert!(s.contains(
            "<tr style=\"color:white;background:blue\">\n\
             <td>\n2\n</td>\n\
             <td>\n<input type=\"text\" name=\"column_2\" size=\"20\" id=\"column_2\" \
             value=\"4\"/>\n</td>\n\
             <td>\n<select name=\"column_3\"><option value=\"A\">Alpha</option>\n\
             <option value=\"B\" selected=\"selected\">Beta</option>\n\
             <option value=\"C\">Gamma</option>\n</select>\n\n</td>\n\
             <td>\n<input type=\"submit\" name=\"submit_save_resulteditor\" value=\"save\" \
             autofocus=\"autofocus\"/>\n</td>\n\n</tr>\n"));
        assert!(s.contains("<td>\nAlpha\n</td>"));
        assert!(s.contains("<td>\nGamma\n</td>"));
        assert_eq!(s.matches("onclick").count(), 2);
    }

    #[test]
    fn t_editor_protects_columns() {
        let mut html = HtmlAllocator::new();
        let form = in_form(&mut html);
        let mut re = ResultEditor::new_editor(&mut html, form, editor_content(), "column_id",
                                              "2", ListingOptions::default().show_all(true),
                                              ["column_3"]).unwrap();
        re.compose(&mut html).unwrap();
        let s = re.to_html_string(&html).unwrap();
        assert!(!s.contains("name=\"column_id\""));
        assert!(!s.contains("name=\"column_3\""));
        assert!(s.contains("name=\"column_2\""));
    }

    #[test]
    fn t_editor_unsupported() {
        for (multi, size, expected) in [
            (true, 1, UnsupportedConfigurationError::MultiChoice {
                column: KString::from_static("column_3")
            }),
            (false, 3, UnsupportedConfigurationError::DisplaySize {
                column: KString::from_static("column_3"),
                size: 3
            }),
        ] {
            let mut html = HtmlAllocator::new();
            let form = in_form(&mut html);
            let mut re = ResultEditor::new_editor(&mut html, form, editor_content(), "column_id",
                                                  "2", ListingOptions::default(),
                                                  Vec::<&str>::new()).unwrap();
            re.set_codes_config("column_3", Codes::list(["A", "B"]), multi, size);
            let e = re.compose(&mut html).err().unwrap();
            assert_eq!(e.downcast_ref::<UnsupportedConfigurationError>(), Some(&expected));
        }
    }
}
