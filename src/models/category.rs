use crate::error::AggregateError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Built-in GSTR-1 reconciliation line items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    TaxableValue,
    Cgst,
    Sgst,
    Igst,
    Cess,
    GrossTotal,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::TaxableValue,
        Category::Cgst,
        Category::Sgst,
        Category::Igst,
        Category::Cess,
        Category::GrossTotal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::TaxableValue => "Taxable Value",
            Self::Cgst => "CGST",
            Self::Sgst => "SGST",
            Self::Igst => "IGST",
            Self::Cess => "Cess",
            Self::GrossTotal => "Gross Total",
        }
    }

    /// Default synonyms, most specific first
    pub fn default_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::TaxableValue => &["Taxable", "Assessable", "Assessed"],
            Self::Cgst => &["CGST", "Central"],
            Self::Sgst => &["SGST", "UTGST", "State/UT", "State Tax"],
            Self::Igst => &["IGST", "Integrated"],
            Self::Cess => &["Cess"],
            Self::GrossTotal => &["Invoice Value", "Gross", "Total Value"],
        }
    }

    pub fn definition(&self) -> CategoryDef {
        CategoryDef::new(
            self.name(),
            self.default_keywords().iter().map(|k| k.to_string()).collect(),
        )
    }
}

/// How a keyword is tested against a column label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Case-insensitive substring; "Taxable Reference Code" matches "Taxable".
    #[default]
    Substring,
    /// Keyword must be bounded by non-alphanumeric characters or the label edge.
    WholeWord,
}

/// A category name plus its ordered keyword synonyms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryDef {
    pub fn new(name: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            name: name.into(),
            keywords,
        }
    }

    /// Returns the first keyword that matches `label`, if any.
    pub fn matching_keyword(&self, label: &str, mode: MatchMode) -> Option<&str> {
        let label = label.to_lowercase();
        self.keywords
            .iter()
            .find(|kw| keyword_matches(&label, &kw.trim().to_lowercase(), mode))
            .map(|kw| kw.as_str())
    }

    pub fn matches(&self, label: &str, mode: MatchMode) -> bool {
        self.matching_keyword(label, mode).is_some()
    }
}

/// `label` and `keyword` must already be lowercased.
fn keyword_matches(label: &str, keyword: &str, mode: MatchMode) -> bool {
    if keyword.is_empty() {
        return false;
    }
    match mode {
        MatchMode::Substring => label.contains(keyword),
        MatchMode::WholeWord => label.match_indices(keyword).any(|(start, hit)| {
            let before = label[..start].chars().next_back();
            let after = label[start + hit.len()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        }),
    }
}

/// Validated, ordered category table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTable {
    categories: Vec<CategoryDef>,
    mode: MatchMode,
}

impl CategoryTable {
    pub fn new(categories: Vec<CategoryDef>, mode: MatchMode) -> Result<Self, AggregateError> {
        let mut seen = HashSet::new();
        for def in &categories {
            if def.name.trim().is_empty() {
                return Err(AggregateError::InvalidCategory(
                    "category name is blank".to_string(),
                ));
            }
            if !seen.insert(def.name.to_lowercase()) {
                return Err(AggregateError::InvalidCategory(format!(
                    "duplicate category '{}'",
                    def.name
                )));
            }
            if def.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(AggregateError::InvalidCategory(format!(
                    "category '{}' has no keywords",
                    def.name
                )));
            }
        }
        Ok(Self { categories, mode })
    }

    /// Replaces the keywords of an existing category, or appends a new one.
    pub fn with_override(
        mut self,
        name: &str,
        keywords: Vec<String>,
    ) -> Result<Self, AggregateError> {
        match self
            .categories
            .iter_mut()
            .find(|d| d.name.eq_ignore_ascii_case(name))
        {
            Some(def) => def.keywords = keywords,
            None => self.categories.push(CategoryDef::new(name, keywords)),
        }
        Self::new(self.categories, self.mode)
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn categories(&self) -> &[CategoryDef] {
        &self.categories
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            categories: Category::ALL.iter().map(Category::definition).collect(),
            mode: MatchMode::Substring,
        }
    }
}
