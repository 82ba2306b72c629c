//! `ResultListing`: content rows shown as a table.

use anyhow::{Result, bail};
use kstring::KString;

use crate::{alist::AList,
            allocator::{AId, HtmlAllocator, Node},
            error::DataShapeError,
            meta::LISTING_META,
            myfrom::MyFrom,
            table::Alignments,
            value::{Content, Row}};

pub const DEFAULT_ROW_LIMIT: usize = 200;

/// Which columns to show, in which order, and under which label.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping(AList<KString, KString>);

impl Mapping {
    /// Show these columns under their own name.
    pub fn columns<T>(columns: impl IntoIterator<Item = T>) -> Self
    where KString: MyFrom<T>
    {
        Mapping(columns.into_iter()
                .map(|c| {
                    let c = KString::myfrom(c);
                    (c.clone(), c)
                })
                .collect())
    }

    /// Show these columns with the given header labels.
    pub fn labels<K, V>(labels: impl IntoIterator<Item = (K, V)>) -> Self
    where KString: MyFrom<K> + MyFrom<V>
    {
        Mapping(labels.into_iter()
                .map(|(k, v)| (KString::myfrom(k), KString::myfrom(v)))
                .collect())
    }

    pub fn label<'s>(&'s self, column: &'s KString) -> &'s KString {
        self.0.get(column.as_str()).unwrap_or(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn keys(&self) -> impl Iterator<Item = &KString> {
        self.0.keys()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingOptions {
    pub mapping: Option<Mapping>,
    /// With a mapping: also show the columns it doesn't name, after
    /// the mapped ones.
    pub show_all: bool,
    /// Rows beyond this are not shown.
    pub row_limit: usize,
    pub alignments: Option<Alignments>,
}

impl Default for ListingOptions {
    fn default() -> Self {
        ListingOptions {
            mapping: None,
            show_all: false,
            row_limit: DEFAULT_ROW_LIMIT,
            alignments: None,
        }
    }
}

impl ListingOptions {
    pub fn mapping(mut self, mapping: Mapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn show_all(mut self, yes: bool) -> Self {
        self.show_all = yes;
        self
    }

    pub fn row_limit(mut self, limit: usize) -> Self {
        self.row_limit = limit;
        self
    }

    pub fn alignments(mut self, alignments: impl Into<Alignments>) -> Self {
        self.alignments = Some(alignments.into());
        self
    }
}


/// The columns to show, derived from the keys of the first row.
pub fn derive_columns_display(first_row_keys: &[KString],
                              mapping: Option<&Mapping>,
                              show_all: bool) -> Vec<KString> {
    match mapping {
        None => first_row_keys.to_vec(),
        Some(mapping) => {
            if show_all {
                let mut columns: Vec<KString> = mapping.keys().cloned().collect();
                for key in first_row_keys {
                    if !mapping.contains(key) {
                        columns.push(key.clone());
                    }
                }
                columns
            } else {
                mapping.keys()
                    .filter(|k| first_row_keys.contains(*k))
                    .cloned()
                    .collect()
            }
        }
    }
}


/// A table built from `content` at construction time. Has no tag of
/// its own; it renders as its table followed by anything added
/// later (e.g. the hidden fields of a `ResultChoice`).
#[derive(Debug)]
pub struct ResultListing {
    container: AId<Node>,
    table: AId<Node>,
    content: Content,
    options: ListingOptions,
    columns_display: Vec<KString>,
}

impl ResultListing {
    /// Build the listing and add it to `parent`.
    pub fn new(html: &mut HtmlAllocator,
               parent: AId<Node>,
               content: impl Into<Content>,
               options: ListingOptions) -> Result<Self> {
        let content = content.into();
        let container = html.new_element(&LISTING_META);
        let table = html.table(container)?;
        let headrow = html.tr(table)?;

        let columns_display = match &content {
            // just the empty header row
            _ if content.is_empty() => Vec::new(),
            Content::Record(record) => {
                html.th(headrow, "KEY")?;
                html.th(headrow, "VALUE")?;
                for (key, value) in record.iter() {
                    let row = html.tr(table)?;
                    html.td(row, key)?;
                    html.td(row, value.to_kstring())?;
                }
                record.keys().cloned().collect()
            }
            Content::Rows(rows) => match rows.first() {
                None => Vec::new(),
                Some(first) => {
                    let columns_display = Self::derive_columns(first, &options)?;
                    for key in &columns_display {
                        let label = match &options.mapping {
                            Some(mapping) => mapping.label(key).clone(),
                            None => key.clone(),
                        };
                        html.th(headrow, label)?;
                    }
                    for row in rows.iter().take(options.row_limit) {
                        let tr = html.tr(table)?;
                        for key in &columns_display {
                            html.td(tr, row.get_str(key))?;
                        }
                    }
                    columns_display
                }
            }
        };
        if !content.is_empty() {
            if let Some(alignments) = &options.alignments {
                html.set_column_alignments(table, alignments)?;
            }
        }
        html.add(parent, container)?;
        Ok(ResultListing { container, table, content, options, columns_display })
    }

    fn derive_columns(first: &Row, options: &ListingOptions) -> Result<Vec<KString>> {
        let keys = match first.keys() {
            Some(keys) => keys,
            None => bail!(DataShapeError::NoColumnNames),
        };
        Ok(derive_columns_display(&keys, options.mapping.as_ref(), options.show_all))
    }

    /// The node holding the table; render this one.
    pub fn container(&self) -> AId<Node> { self.container }
    pub fn table(&self) -> AId<Node> { self.table }
    pub fn content(&self) -> &Content { &self.content }
    pub fn options(&self) -> &ListingOptions { &self.options }
    pub fn columns_display(&self) -> &[KString] { &self.columns_display }

    /// The rendered row for content row `i` (the header is row 0).
    pub fn data_row(&self, html: &HtmlAllocator, i: usize) -> Result<Option<AId<Node>>> {
        html.child(self.table, i + 1)
    }

    pub fn to_html_string(&self, html: &HtmlAllocator) -> Result<String> {
        html.to_html_string(self.container)
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{meta::DIV_META, row, value::Value};

    fn ks_vec(v: &[&str]) -> Vec<KString> {
        v.iter().map(|s| KString::from_ref(s)).collect()
    }

    fn content() -> Content {
        vec![row!{"a" => 1, "b" => 2}].into()
    }

    fn listing(content: Content, options: ListingOptions) -> (HtmlAllocator, ResultListing) {
        let mut html = HtmlAllocator::new();
        let div = html.new_element(&DIV_META);
        let rl = ResultListing::new(&mut html, div, content, options).unwrap();
        (html, rl)
    }

    #[test]
    fn t_columns_display() {
        let (_, rl) = listing(content(), ListingOptions::default());
        assert_eq!(rl.columns_display(), ks_vec(&["a", "b"]));

        let (_, rl) = listing(content(), ListingOptions::default()
                              .mapping(Mapping::columns(["a"])));
        assert_eq!(rl.columns_display(), ks_vec(&["a"]));

        let (_, rl) = listing(content(), ListingOptions::default()
                              .mapping(Mapping::columns(["a"]))
                              .show_all(true));
        assert_eq!(rl.columns_display(), ks_vec(&["a", "b"]));
    }

    #[test]
    fn t_show_all_keeps_unknown_mapped_columns() {
        let keys = ks_vec(&["a", "b", "c"]);
        let mapping = Mapping::labels([("c", "C"), ("x", "X")]);
        assert_eq!(derive_columns_display(&keys, Some(&mapping), true),
                   ks_vec(&["c", "x", "a", "b"]));
        assert_eq!(derive_columns_display(&keys, Some(&mapping), false),
                   ks_vec(&["c"]));
    }

    #[test]
    fn t_render() {
        let rows = vec![row!{"id" => 1, "name" => "Jo", "note" => Value::Null},
                        row!{"id" => 2, "name" => "Al"}];
        let (html, rl) = listing(rows.into(), ListingOptions::default()
                                 .mapping(Mapping::labels([("name", "Name"), ("id", "ID")])));
        assert_eq!(rl.to_html_string(&html).unwrap(),
                   "<table><tr>\n<th>\nName\n</th>\n<th>\nID\n</th>\n\n</tr>\n\
                    <tr>\n<td>\nJo\n</td>\n<td>\n1\n</td>\n\n</tr>\n\
                    <tr>\n<td>\nAl\n</td>\n<td>\n2\n</td>\n\n</tr>\n\n</table>\n");
    }

    #[test]
    fn t_uneven_rows() {
        let rows = vec![row!{"a" => 1, "b" => 2}, row!{"a" => 3}];
        let (html, rl) = listing(rows.into(), ListingOptions::default());
        let row = rl.data_row(&html, 1).unwrap().unwrap();
        let cells = html.children(row).unwrap();
        assert_eq!(html.first_text(cells[0]).unwrap(), Some("3"));
        assert_eq!(html.children(cells[1]).unwrap().len(), 0);
    }

    #[test]
    fn t_row_limit() {
        let rows: Vec<Row> = (0..5).map(|i| row!{"n" => i}).collect();
        let (html, rl) = listing(rows.into(), ListingOptions::default().row_limit(2));
        // header plus two rows
        assert_eq!(html.children(rl.table()).unwrap().len(), 3);
        assert_eq!(rl.to_html_string(&html).unwrap().matches("<td>").count(), 2);
    }

    #[test]
    fn t_empty_content() {
        let (html, rl) = listing(Content::default(), ListingOptions::default().alignments("lrc"));
        assert!(rl.columns_display().is_empty());
        assert_eq!(rl.to_html_string(&html).unwrap(),
                   "<table><tr>\n</tr>\n\n</table>\n");
    }

    #[test]
    fn t_empty_record() {
        let (html, rl) = listing(Content::from_json_str("{}").unwrap(),
                                 ListingOptions::default());
        assert!(rl.columns_display().is_empty());
        assert_eq!(rl.to_html_string(&html).unwrap(),
                   "<table><tr>\n</tr>\n\n</table>\n");
    }

    #[test]
    fn t_record() {
        let record = [(KString::from_static("k"), Value::from(4))].into_iter().collect();
        let (html, rl) = listing(Content::Record(record), ListingOptions::default());
        assert_eq!(rl.to_html_string(&html).unwrap(),
                   "<table><tr>\n<th>\nKEY\n</th>\n<th>\nVALUE\n</th>\n\n</tr>\n\
                    <tr>\n<td>\nk\n</td>\n<td>\n4\n</td>\n\n</tr>\n\n</table>\n");
    }

    #[test]
    fn t_no_column_names() {
        let mut html = HtmlAllocator::new();
        let div = html.new_element(&DIV_META);
        let rows = vec![Row::Values(vec![Value::from(1)])];
        let e = ResultListing::new(&mut html, div, rows, ListingOptions::default())
            .err().unwrap();
        assert_eq!(e.downcast_ref::<DataShapeError>(), Some(&DataShapeError::NoColumnNames));
    }

    #[test]
    fn t_alignments() {
        let rows = vec![row!{"a" => 1, "b" => 2, "c" => 3}];
        let (html, rl) = listing(rows.into(), ListingOptions::default().alignments("lrc"));
        let s = rl.to_html_string(&html).unwrap();
        assert!(s.contains("<td style=\"text-align:left\">\n1\n</td>"));
        assert!(s.contains("<td style=\"text-align:right\">\n2\n</td>"));
        assert!(s.contains("<td style=\"text-align:center\">\n3\n</td>"));
        assert!(s.contains("<th style=\"text-align:right\">\nb\n</th>"));
    }

    #[test]
    fn t_render_is_repeatable() {
        let (html, rl) = listing(content(), ListingOptions::default().alignments("rl"));
        assert_eq!(rl.to_html_string(&html).unwrap(), rl.to_html_string(&html).unwrap());
    }
}
