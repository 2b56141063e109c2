use bigdecimal::{BigDecimal, Zero};
use crate::error::AggregateError;
use crate::models::{
    AggregateResult, CategoryTable, CategoryTotal, Cell, Column, MatchedColumn, Workbook,
};
use indexmap::IndexMap;
use std::str::FromStr;

/// Decimal places kept in every category total
pub const TOTAL_SCALE: i64 = 2;

/// Outcome of coercing one raw cell
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Value(BigDecimal),
    Blank,
    /// Non-blank but not a number; contributes zero.
    Zeroed,
}

/// Coerces a raw cell to a decimal.
///
/// Text keeps only ASCII digits and '.', so currency symbols, thousands
/// separators, whitespace and signs are all dropped before parsing.
pub fn coerce_cell(cell: &Cell) -> Coerced {
    if cell.is_blank() {
        return Coerced::Blank;
    }
    match cell {
        Cell::Empty => Coerced::Blank,
        Cell::Bool(_) => Coerced::Zeroed,
        Cell::Int(n) => Coerced::Value(BigDecimal::from(*n)),
        Cell::Number(n) if n.is_finite() => match BigDecimal::from_str(&n.to_string()) {
            Ok(v) => Coerced::Value(v),
            Err(_) => Coerced::Zeroed,
        },
        Cell::Number(_) => Coerced::Zeroed,
        Cell::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            match BigDecimal::from_str(&cleaned) {
                Ok(v) if !cleaned.is_empty() => Coerced::Value(v),
                _ => Coerced::Zeroed,
            }
        }
    }
}

/// Running sum for one category
#[derive(Debug)]
struct Accumulator {
    total: CategoryTotal,
}

impl Accumulator {
    fn new(category: &str) -> Self {
        Self {
            total: CategoryTotal::empty(category),
        }
    }

    fn add_column(&mut self, sheet: &str, column: &Column, keyword: &str) {
        let mut column_sum = BigDecimal::zero();
        for cell in &column.values {
            match coerce_cell(cell) {
                Coerced::Value(v) => {
                    column_sum += v;
                    self.total.cells_summed += 1;
                }
                Coerced::Blank => self.total.cells_blank += 1,
                Coerced::Zeroed => self.total.cells_zeroed += 1,
            }
        }

        tracing::debug!(
            "category '{}' <- sheet '{}' column '{}' (keyword '{}'): {}",
            self.total.category, sheet, column.label, keyword, column_sum
        );

        self.total.total += column_sum;
        self.total.matched_columns.push(MatchedColumn {
            sheet: sheet.to_string(),
            label: column.label.clone(),
            keyword: keyword.to_string(),
        });
    }

    fn finish(mut self) -> CategoryTotal {
        self.total.total = self.total.total.round(TOTAL_SCALE).with_scale(TOTAL_SCALE);
        self.total
    }
}

/// Sums every column matching each category, across every sheet.
///
/// Never fails on cell contents; only a structurally invalid workbook
/// (e.g. no sheets at all) is rejected.
pub fn compute_aggregate(
    workbook: &Workbook,
    table: &CategoryTable,
) -> Result<AggregateResult, AggregateError> {
    workbook.validate()?;

    let mode = table.mode();
    let mut totals: IndexMap<String, CategoryTotal> = IndexMap::with_capacity(table.len());

    for def in table.categories() {
        let mut acc = Accumulator::new(&def.name);
        for sheet in &workbook.sheets {
            for column in &sheet.columns {
                if let Some(keyword) = def.matching_keyword(&column.label, mode) {
                    acc.add_column(&sheet.name, column, keyword);
                }
            }
        }
        totals.insert(def.name.clone(), acc.finish());
    }

    Ok(AggregateResult {
        totals,
        sheets_scanned: workbook.sheets.len(),
    })
}

/// Aggregation service holding the configured category table
#[derive(Debug, Clone)]
pub struct Aggregator {
    table: CategoryTable,
}

impl Aggregator {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    pub fn aggregate(&self, workbook: &Workbook) -> Result<AggregateResult, AggregateError> {
        let result = match compute_aggregate(workbook, &self.table) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Aggregation rejected: {}", e);
                return Err(e);
            }
        };

        let zeroed: usize = result.iter().map(|t| t.cells_zeroed).sum();
        let missing = result.missing_categories();
        tracing::info!(
            "Aggregated {} sheets: {} categories, {} cells zeroed, no column for {:?}",
            result.sheets_scanned,
            result.totals.len(),
            zeroed,
            missing
        );

        Ok(result)
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(CategoryTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Sheet};

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn coerce_strips_currency_and_separators() {
        assert_eq!(coerce_cell(&"₹1,000.50".into()), Coerced::Value(dec("1000.50")));
        assert_eq!(coerce_cell(&" 2 000 ".into()), Coerced::Value(dec("2000")));
        assert_eq!(coerce_cell(&Cell::Number(12.25)), Coerced::Value(dec("12.25")));
    }

    #[test]
    fn coerce_drops_sign_from_text_only() {
        assert_eq!(coerce_cell(&"-150".into()), Coerced::Value(dec("150")));
        assert_eq!(coerce_cell(&Cell::Number(-150.0)), Coerced::Value(dec("-150")));
        assert_eq!(coerce_cell(&Cell::Int(-150)), Coerced::Value(dec("-150")));
    }

    #[test]
    fn coerce_int_is_exact_beyond_f64_range() {
        // 2^53 + 1 is not representable as f64
        assert_eq!(
            coerce_cell(&Cell::Int(9_007_199_254_740_993)),
            Coerced::Value(dec("9007199254740993"))
        );
    }

    #[test]
    fn coerce_unparseable_is_zeroed() {
        assert_eq!(coerce_cell(&"N/A".into()), Coerced::Zeroed);
        assert_eq!(coerce_cell(&"1.2.3".into()), Coerced::Zeroed);
        assert_eq!(coerce_cell(&".".into()), Coerced::Zeroed);
        assert_eq!(coerce_cell(&Cell::Bool(true)), Coerced::Zeroed);
        assert_eq!(coerce_cell(&Cell::Number(f64::NAN)), Coerced::Zeroed);
    }

    #[test]
    fn coerce_blank() {
        assert_eq!(coerce_cell(&Cell::Empty), Coerced::Blank);
        assert_eq!(coerce_cell(&"   ".into()), Coerced::Blank);
    }

    #[test]
    fn totals_round_half_away_from_zero() {
        let sheet = Sheet::new(
            "s",
            vec![Column::new("Cess", vec!["0.125".into(), "0.0".into()])],
        );
        let result = compute_aggregate(&Workbook::single(sheet), &CategoryTable::default()).unwrap();
        assert_eq!(result.total(Category::Cess), dec("0.13"));
        assert_eq!(result.total(Category::Cess).to_string(), "0.13");
    }

    #[test]
    fn counts_are_tracked_per_category() {
        let sheet = Sheet::new(
            "b2b",
            vec![Column::new(
                "IGST",
                vec!["10".into(), Cell::Empty, "n/a".into(), Cell::Number(5.0)],
            )],
        );
        let result = compute_aggregate(&Workbook::single(sheet), &CategoryTable::default()).unwrap();
        let igst = result.get("IGST").unwrap();
        assert_eq!(igst.total, dec("15"));
        assert_eq!(igst.cells_summed, 2);
        assert_eq!(igst.cells_blank, 1);
        assert_eq!(igst.cells_zeroed, 1);
        assert_eq!(igst.matched_columns.len(), 1);
        assert_eq!(igst.matched_columns[0].keyword, "IGST");
    }

    #[test]
    fn aggregator_uses_its_table() {
        let table = CategoryTable::new(
            vec![crate::models::CategoryDef::new("TCS", vec!["TCS".into()])],
            crate::models::MatchMode::Substring,
        )
        .unwrap();
        let aggregator = Aggregator::new(table);
        let sheet = Sheet::new("s", vec![Column::new("TCS Amount", vec!["7".into()])]);
        let result = aggregator.aggregate(&Workbook::single(sheet)).unwrap();
        assert_eq!(result.totals.len(), 1);
        assert_eq!(result.get("TCS").unwrap().total, dec("7"));
        assert_eq!(result.total(Category::Cgst), BigDecimal::zero());
    }
}
