//! Dashboard Tests - pages composed from the fixture datasets
//!
//! Loads `tests/fixtures/cleaned_df.csv` (ten policies, index column first)
//! and `tests/fixtures/car_insurance_claim.csv` (raw export with currency
//! strings, missing cells and one duplicate row), then checks page contents
//! through the HTML and text renderers.
//!
//! Run: cargo test --test dashboard_test

#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use claim_explorer::prelude::*;
use claim_explorer::profiling::AlertKind;
use claim_explorer::server::respond;
use tiny_http::Method;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn cleaned() -> Table {
    load_csv(fixture("cleaned_df.csv"), &LoadOptions::indexed()).unwrap()
}

fn raw() -> Table {
    load_csv(fixture("car_insurance_claim.csv"), &LoadOptions::default()).unwrap()
}

fn config() -> Config {
    let mut config = Config::new();
    config.data.cleaned = fixture("cleaned_df.csv");
    config.data.raw = fixture("car_insurance_claim.csv");
    config
}

fn metric<'a>(doc: &'a Document, label: &str) -> &'a str {
    doc.blocks
        .iter()
        .find_map(|b| match b {
            Block::Metrics(metrics) => metrics.iter().find(|m| m.label == label).map(|m| m.value.as_str()),
            _ => None,
        })
        .unwrap()
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn cleaned_fixture_drops_index_and_infers_types() {
    let table = cleaned();
    assert_eq!(table.shape(), (10, 26));
    assert_eq!(table.column("age").unwrap().dtype(), DType::Int64);
    assert_eq!(table.column("gender").unwrap().kind(), ColumnKind::Categorical);
    assert_eq!(table.column("urbanicity").unwrap().label(2).as_deref(), Some("Highly Rural/ Rural"));
}

#[test]
fn raw_fixture_keeps_currency_as_text() {
    let table = raw();
    assert_eq!(table.shape(), (8, 15));
    assert_eq!(table.column("INCOME").unwrap().kind(), ColumnKind::Categorical);
    assert_eq!(table.column("AGE").unwrap().missing_count(), 1);
}

// ============================================================================
// Pages
// ============================================================================

#[test]
fn home_page_overview() {
    let doc = Page::Home.compose(&cleaned(), &Selection::default()).unwrap();
    let text = TextRenderer::new().render(&doc);
    assert!(text.contains("Number of rows: 10"));
    assert!(text.contains("Number of columns: 26"));
    assert!(text.contains("Min: 23, Max: 67"));
}

#[test]
fn univariate_kpis() {
    let doc = Page::Univariate.compose(&cleaned(), &Selection::default()).unwrap();
    assert_eq!(metric(&doc, "Total Records"), "10");
    assert_eq!(metric(&doc, "Average Claim Amount"), "$1,400.00");
    assert_eq!(metric(&doc, "Total Claim Amount"), "$14,000.00");
}

#[test]
fn univariate_categorical_selection() {
    let selection = Selection::new(AnalysisMode::Categorical, Some("car_type"));
    let doc = Page::Univariate.compose(&cleaned(), &selection).unwrap();
    let titles: Vec<&str> = doc.charts().iter().map(|c| c.chart_title()).collect();
    assert_eq!(titles[0], "Distribution of car_type");
    assert!(titles.contains(&"Gender Proportion"));
}

#[test]
fn univariate_rejects_column_of_other_kind() {
    let selection = Selection::new(AnalysisMode::Numerical, Some("car_type"));
    let err = Page::Univariate.compose(&cleaned(), &selection).unwrap_err();
    assert!(matches!(err, Error::InvalidSelection(_)));
}

#[test]
fn multivariate_vehicle_use_insights() {
    let doc = Page::Multivariate.compose(&cleaned(), &Selection::default()).unwrap();
    let text = TextRenderer::new().render(&doc);
    assert!(text.contains("- Commercial vehicles: $2,833.33"));
    assert!(text.contains("- Private vehicles: $785.71"));
    assert_eq!(doc.charts().len(), 12);
}

#[test]
fn exploration_report_from_raw_file() {
    let report = ProfileReport::build(&raw());
    assert_eq!(report.overview.rows, 8);
    assert_eq!(report.overview.missing_cells, 3);
    assert_eq!(report.overview.duplicate_rows, 1);
    assert_eq!(report.alerts_of(AlertKind::Duplicates).count(), 1);

    let doc = Page::Exploration.compose(&raw(), &Selection::default()).unwrap();
    assert!(!doc.charts().is_empty());
}

// ============================================================================
// Delivery
// ============================================================================

#[test]
fn html_pages_over_routes() {
    let config = config();
    for page in Page::ALL {
        let reply = respond(&config, &Method::Get, page.route());
        assert_eq!(reply.status, 200, "{page} failed: {}", reply.body);
        if page != Page::Home {
            assert!(reply.body.contains("<svg"), "{page} has no inline chart");
        }
    }
}

#[test]
fn export_every_multivariate_chart() {
    let dir = tempfile::tempdir().unwrap();
    let doc = Page::Multivariate.render(&config().page_context(Selection::default())).unwrap();
    let written = export_charts(&doc, dir.path(), ChartFormat::Svg).unwrap();
    assert_eq!(written.len(), 12);
    assert!(written.iter().all(|p| p.extension().is_some_and(|e| e == "svg")));
}
