//! Html node trees built programmatically and printed to strings,
//! with result tables (`ResultListing`, `ResultChoice`,
//! `ResultEditor`) whose row selection round-trips through the
//! enclosing form.

pub mod myfrom;
pub mod alist;
pub mod error;
pub mod meta;
pub mod allocator;
pub mod print;
pub mod elements;
pub mod select;
pub mod table;
pub mod value;
pub mod listing;
pub mod js;
pub mod choice;
pub mod input;
pub mod page;

pub use allocator::{AId, Child, Element, HtmlAllocator, Node, ToBody};
pub use choice::{ResultChoice, ResultEditor, RowAnnotator, Selection, SelectionInput};
pub use elements::CheckboxOptions;
pub use error::{DataShapeError, StructuralError, UnsupportedConfigurationError};
pub use input::{FieldSource, MapFields, SessionStorage};
pub use listing::{ListingOptions, Mapping, ResultListing};
pub use page::{HtmlPage, PageOptions};
pub use print::Print;
pub use select::{Codes, DropdownOptions};
pub use value::{Content, Row, Value};
