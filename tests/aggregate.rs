use bigdecimal::BigDecimal;
use gstr_reco::models::{Category, CategoryDef, CategoryTable, Cell, Column, MatchMode, Sheet, Workbook};
use gstr_reco::{compute_aggregate, AggregateError};
use std::str::FromStr;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn text(values: &[&str]) -> Vec<Cell> {
    values.iter().map(|v| Cell::Text(v.to_string())).collect()
}

fn nums(values: &[f64]) -> Vec<Cell> {
    values.iter().map(|v| Cell::Number(*v)).collect()
}

#[test]
fn no_matching_column_gives_all_zero() {
    let wb = Workbook::single(Sheet::new(
        "misc",
        vec![
            Column::new("GSTIN", text(&["29ABCDE1234F1Z5"])),
            Column::new("Invoice Number", text(&["INV-001"])),
        ],
    ));
    let result = compute_aggregate(&wb, &CategoryTable::default()).unwrap();

    assert_eq!(result.totals.len(), 6);
    for cat in Category::ALL {
        let entry = result.get(cat.name()).unwrap();
        assert_eq!(entry.total, dec("0"));
        assert_eq!(entry.total.to_string(), "0.00");
        assert!(!entry.has_data());
    }
    assert_eq!(result.missing_categories().len(), 6);
}

#[test]
fn clean_numbers_sum_exactly() {
    let values = [0.1, 0.2, 0.3, 1234.567, 99.999];
    let wb = Workbook::single(Sheet::new("hsn", vec![Column::new("IGST Amount", nums(&values))]));
    let result = compute_aggregate(&wb, &CategoryTable::default()).unwrap();
    // 0.1 + 0.2 + 0.3 + 1234.567 + 99.999 = 1335.166
    assert_eq!(result.total(Category::Igst), dec("1335.17"));
}

#[test]
fn identical_inputs_identical_output() {
    let wb = Workbook::new(vec![
        Sheet::new("a", vec![Column::new("CGST", text(&["₹10.10", "x"]))]),
        Sheet::new("b", vec![Column::new("Total Invoice Value", nums(&[5.0]))]),
    ]);
    let table = CategoryTable::default();
    let first = compute_aggregate(&wb, &table).unwrap();
    let second = compute_aggregate(&wb, &table).unwrap();
    assert_eq!(first, second);
}

#[test]
fn currency_symbols_and_separators_are_stripped() {
    let wb = Workbook::single(Sheet::new(
        "b2b",
        vec![Column::new("Taxable Value", text(&["₹1,000.50", "₹2,000.00"]))],
    ));
    let result = compute_aggregate(&wb, &CategoryTable::default()).unwrap();
    assert_eq!(result.total(Category::TaxableValue), dec("3000.50"));
    assert_eq!(result.total(Category::TaxableValue).to_string(), "3000.50");
}

#[test]
fn totals_accumulate_across_sheets() {
    let wb = Workbook::new(vec![
        Sheet::new("b2b", vec![Column::new("CGST", nums(&[100.0]))]),
        Sheet::new("b2cs", vec![Column::new("cgst amount", nums(&[50.5]))]),
    ]);
    let result = compute_aggregate(&wb, &CategoryTable::default()).unwrap();
    assert_eq!(result.total(Category::Cgst), dec("150.5"));

    let cgst = result.get("CGST").unwrap();
    let sheets: Vec<_> = cgst.matched_columns.iter().map(|m| m.sheet.as_str()).collect();
    assert_eq!(sheets, vec!["b2b", "b2cs"]);
    assert_eq!(result.sheets_scanned, 2);
}

#[test]
fn ambiguous_label_is_double_counted() {
    let wb = Workbook::single(Sheet::new(
        "summary",
        vec![Column::new("Total Central Tax Taxable", nums(&[40.0, 2.0]))],
    ));
    let result = compute_aggregate(&wb, &CategoryTable::default()).unwrap();
    assert_eq!(result.total(Category::TaxableValue), dec("42"));
    assert_eq!(result.total(Category::Cgst), dec("42"));
    assert_eq!(result.get("CGST").unwrap().matched_columns[0].keyword, "Central");
    assert_eq!(result.total(Category::Sgst), dec("0"));
}

#[test]
fn zero_sheets_is_invalid_input() {
    let err = compute_aggregate(&Workbook::new(Vec::new()), &CategoryTable::default()).unwrap_err();
    assert!(matches!(err, AggregateError::InvalidInput(_)));
}

#[test]
fn empty_sheets_and_columns_are_valid() {
    let wb = Workbook::new(vec![
        Sheet::new("nothing", Vec::new()),
        Sheet::new("blank", vec![Column::new("Cess", Vec::new())]),
    ]);
    let result = compute_aggregate(&wb, &CategoryTable::default()).unwrap();
    let cess = result.get("Cess").unwrap();
    assert_eq!(cess.total, dec("0"));
    // Found the column, so this is "data totals zero", not "no data"
    assert!(cess.has_data());
    assert!(!result.get("IGST").unwrap().has_data());
}

#[test]
fn malformed_cells_contribute_zero() {
    let wb = Workbook::single(Sheet::new(
        "b2b",
        vec![Column::new(
            "SGST",
            vec![
                Cell::Text("12.50".into()),
                Cell::Text("--".into()),
                Cell::Bool(false),
                Cell::Empty,
                Cell::Text("1.2.3".into()),
                Cell::Number(7.5),
            ],
        )],
    ));
    let result = compute_aggregate(&wb, &CategoryTable::default()).unwrap();
    let sgst = result.get("SGST").unwrap();
    assert_eq!(sgst.total, dec("20"));
    assert_eq!(sgst.cells_summed, 2);
    assert_eq!(sgst.cells_zeroed, 3);
    assert_eq!(sgst.cells_blank, 1);
}

#[test]
fn false_positive_kept_unless_whole_word() {
    let wb = Workbook::single(Sheet::new(
        "b2b",
        vec![
            Column::new("Taxable Value", nums(&[100.0])),
            Column::new("NonTaxableRef", text(&["REF-9001"])),
        ],
    ));

    let loose = compute_aggregate(&wb, &CategoryTable::default()).unwrap();
    assert_eq!(loose.total(Category::TaxableValue), dec("9101"));

    let strict = compute_aggregate(&wb, &CategoryTable::default().with_mode(MatchMode::WholeWord)).unwrap();
    assert_eq!(strict.total(Category::TaxableValue), dec("100"));
}

#[test]
fn custom_table_controls_keys_and_order() {
    let table = CategoryTable::new(
        vec![
            CategoryDef::new("Gross Total", vec!["Invoice Value".into()]),
            CategoryDef::new("Net", vec!["Net".into()]),
        ],
        MatchMode::Substring,
    )
    .unwrap();
    let wb = Workbook::single(Sheet::new(
        "b2b",
        vec![
            Column::new("Net Amount", text(&["₹ 10"])),
            Column::new("Invoice Value", text(&["110"])),
        ],
    ));
    let result = compute_aggregate(&wb, &table).unwrap();
    let keys: Vec<_> = result.totals.keys().cloned().collect();
    assert_eq!(keys, vec!["Gross Total".to_string(), "Net".to_string()]);
    assert_eq!(result.get("Net").unwrap().total, dec("10"));
    assert_eq!(result.total(Category::GrossTotal), dec("110"));
    assert_eq!(result.total(Category::Cess), dec("0"));
}
