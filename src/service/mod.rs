pub mod aggregator;
pub mod report;

pub use aggregator::{coerce_cell, compute_aggregate, Aggregator, Coerced};
pub use report::{render_report, render_sheets_markdown, render_totals_markdown, totals_to_csv};
