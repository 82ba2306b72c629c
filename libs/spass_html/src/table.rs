//! Tables, rows and cells.

use anyhow::Result;

use crate::{allocator::{AId, Element, HtmlAllocator, Node, ToBody},
            meta::{TABLE_META, TD_META, TH_META, TR_META}};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

impl Alignment {
    /// Accepts `l`/`r`/`c` and the long forms.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "l" | "left" => Some(Alignment::Left),
            "r" | "right" => Some(Alignment::Right),
            "c" | "center" => Some(Alignment::Center),
            _ => None,
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Center => "center",
        }
    }
}

/// Per-column alignment codes, one character per column (`"lrc"`),
/// or a list of codes.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignments(pub Vec<String>);

impl From<&str> for Alignments {
    fn from(s: &str) -> Self {
        Alignments(s.chars().map(String::from).collect())
    }
}

impl From<Vec<&str>> for Alignments {
    fn from(v: Vec<&str>) -> Self {
        Alignments(v.into_iter().map(String::from).collect())
    }
}

impl HtmlAllocator {
    pub fn table(&mut self, parent: AId<Node>) -> Result<AId<Node>> {
        self.add_element(parent, Element::new(&TABLE_META), [])
    }

    /// Append a row to `table`.
    pub fn tr(&mut self, table: AId<Node>) -> Result<AId<Node>> {
        self.expect_element(table, &TABLE_META)?;
        self.add_element(table, Element::new(&TR_META), [])
    }

    /// Append a cell to `row`.
    pub fn td(&mut self, row: AId<Node>, content: impl ToBody) -> Result<AId<Node>> {
        self.expect_element(row, &TR_META)?;
        self.add_element(row, Element::new(&TD_META), content)
    }

    /// Append a header cell to `row`.
    pub fn th(&mut self, row: AId<Node>, content: impl ToBody) -> Result<AId<Node>> {
        self.expect_element(row, &TR_META)?;
        self.add_element(row, Element::new(&TH_META), content)
    }

    /// Append one header cell per item.
    pub fn th_all<T: ToBody>(&mut self, row: AId<Node>, contents: impl IntoIterator<Item = T>)
                             -> Result<Vec<AId<Node>>> {
        contents.into_iter().map(|c| self.th(row, c)).collect()
    }

    /// Set `text-align` on the cells of every row of `table`, column by
    /// column. Rows shorter than the codes are fine; unknown codes are
    /// skipped.
    pub fn set_column_alignments(&mut self, table: AId<Node>, alignments: &Alignments)
                                 -> Result<()> {
        self.expect_element(table, &TABLE_META)?;
        let rows = self.children(table)?.to_vec();
        for row in rows {
            let cells = self.children(row)?.to_vec();
            for (cell, code) in cells.into_iter().zip(&alignments.0) {
                match Alignment::from_code(code) {
                    Some(a) => self.set_style(cell, "text-align", a.css())?,
                    None => tracing::warn!("ignoring unknown alignment code {code:?}"),
                }
            }
        }
        Ok(())
    }
}
