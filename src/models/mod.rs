pub mod category;
pub mod result;
pub mod sheet;

pub use category::{Category, CategoryDef, CategoryTable, MatchMode};
pub use result::{AggregateResult, CategoryTotal, MatchedColumn};
pub use sheet::{Cell, Column, Sheet, Workbook};
