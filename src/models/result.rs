use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Category;

/// A column that contributed to a category total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedColumn {
    pub sheet: String,
    pub label: String,
    pub keyword: String,
}

/// Per-category total plus coverage diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: BigDecimal,
    pub matched_columns: Vec<MatchedColumn>,
    pub cells_summed: usize,  // cells that parsed to a number
    pub cells_blank: usize,   // empty or whitespace-only
    pub cells_zeroed: usize,  // non-blank but unparseable, counted as 0
}

impl CategoryTotal {
    pub fn empty(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            total: BigDecimal::zero(),
            matched_columns: Vec::new(),
            cells_summed: 0,
            cells_blank: 0,
            cells_zeroed: 0,
        }
    }

    /// Whether any column matched this category; separates "no data" from "totals to zero".
    pub fn has_data(&self) -> bool {
        !self.matched_columns.is_empty()
    }
}

/// Category name -> total, in category table order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub totals: IndexMap<String, CategoryTotal>,
    pub sheets_scanned: usize,
}

impl AggregateResult {
    pub fn get(&self, category: &str) -> Option<&CategoryTotal> {
        self.totals.get(category)
    }

    /// Rounded total for a built-in category; zero if the table did not include it.
    pub fn total(&self, category: Category) -> BigDecimal {
        self.totals
            .get(category.name())
            .map(|t| t.total.clone())
            .unwrap_or_else(BigDecimal::zero)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryTotal> {
        self.totals.values()
    }

    /// Categories for which no column was found anywhere
    pub fn missing_categories(&self) -> Vec<&str> {
        self.totals
            .values()
            .filter(|t| !t.has_data())
            .map(|t| t.category.as_str())
            .collect()
    }
}
