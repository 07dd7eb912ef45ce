//! Univariate page: KPIs, a selectable single-column analysis, and a fixed
//! set of featured distributions.

use super::selector::{partition_columns, AnalysisMode, Selection, SelectorBlock};
use super::{Block, Document, Metric};
use crate::chart::ChartSpec;
use crate::dataset::Table;
use crate::error::Result;
use crate::format;
use crate::stats::{count_where, describe, value_counts, NumericSummary, ValueCounts};

const SELECTED_BINS: usize = 30;

/// Compose the univariate page for `selection`.
///
/// # Errors
///
/// Fails when the selection does not resolve to a column of its mode, or a
/// column the KPIs and featured analyses rely on is absent.
pub fn build(table: &Table, selection: &Selection) -> Result<Document> {
    let mut doc = Document::new("Univariate Analysis");
    doc.push(Block::Title("Univariate Analysis".into()));
    doc.push(Block::text(
        "This page provides key performance indicators (KPIs) and univariate analysis of the cleaned dataset.",
    ));

    doc.push(Block::Header("Key Performance Indicators (KPIs)".into()));
    let claims = describe(table, "clm_amt")?;
    doc.push(Block::Metrics(vec![
        Metric::new("Total Records", table.row_count().to_string()),
        Metric::new("Average Claim Amount", format::money(claims.mean)),
        Metric::new("Total Claim Amount", format::money(claims.sum)),
    ]));

    doc.push(Block::Header("Univariate Analysis".into()));
    let partition = partition_columns(table);
    let column = selection.resolve(&partition)?;
    doc.push(Block::Selector(SelectorBlock {
        mode: selection.mode,
        column: column.clone(),
        options: partition.for_mode(selection.mode).to_vec(),
    }));

    match selection.mode {
        AnalysisMode::Numerical => numerical(&mut doc, table, &column)?,
        AnalysisMode::Categorical => categorical(&mut doc, table, &column)?,
    }

    doc.push(Block::Divider);
    doc.push(Block::Header("Featured Univariate Analyses".into()));
    featured_age(&mut doc, table)?;
    featured_income(&mut doc, table)?;
    featured_gender(&mut doc, table)?;
    featured_claim_frequency(&mut doc, table)?;
    featured_years_on_job(&mut doc, table)?;

    Ok(doc)
}

fn numerical(doc: &mut Document, table: &Table, column: &str) -> Result<()> {
    doc.push(Block::chart(
        ChartSpec::histogram(table.clone(), column)
            .nbins(SELECTED_BINS)
            .title(&format!("Distribution of {column}"))
            .label(column, column),
    ));

    let summary = describe(table, column)?;
    doc.push(Block::Subheader(format!("Statistics for {column}")));
    doc.push(Block::Table(summary.to_table(column)?));

    doc.push(Block::Subheader("Analysis Insights".into()));
    doc.push(Block::expander("View Analysis Questions", vec![numerical_insights(column, &summary)]));
    Ok(())
}

fn numerical_insights(column: &str, s: &NumericSummary) -> Block {
    Block::markdown([
        format!("**Q: What is the distribution shape of {column}?**"),
        format!("- Mean: {}", format::money(s.mean)),
        format!("- Median: {}", format::money(s.median)),
        format!("- Std Dev: {}", format::money(s.std)),
        String::new(),
        format!("**Q: Are there any outliers in {column}?**"),
        format!("- Min: {}", format::money(s.min)),
        format!("- Max: {}", format::money(s.max)),
        format!("- Range: {}", format::money(s.range())),
        format!("- IQR: {}", format::money(s.iqr())),
        String::new(),
        "**Q: What percentage of records have zero value?**".to_string(),
        format!("- Zero Count: {} ({:.2}%)", s.zero_count, s.zero_pct),
    ])
}

fn categorical(doc: &mut Document, table: &Table, column: &str) -> Result<()> {
    let counts = value_counts(table, column)?;
    let counts_table = counts.to_table(column, "Count")?;

    doc.push(Block::chart(
        ChartSpec::bar(counts_table.clone(), column, "Count")
            .title(&format!("Distribution of {column}"))
            .label("Count", "Frequency"),
    ));

    doc.push(Block::Subheader(format!("Value Counts for {column}")));
    doc.push(Block::Table(counts_table));

    doc.push(Block::Subheader("Analysis Insights".into()));
    doc.push(Block::expander("View Analysis Questions", vec![categorical_insights(column, &counts)]));
    Ok(())
}

fn categorical_insights(column: &str, counts: &ValueCounts) -> Block {
    let mut lines = vec![format!("**Q: What is the most common category in {column}?**")];
    if let Some((value, n)) = counts.top() {
        lines.push(format!("- Top Category: {value} ({n} records, {:.2}%)", counts.share_pct(*n)));
    }
    let top3 = counts.top_n_total(3);
    lines.extend([
        String::new(),
        format!("**Q: How diverse is the {column} distribution?**"),
        format!("- Unique Categories: {}", counts.unique()),
        format!("- Diversity Index: {:.2}", counts.diversity_index()),
        String::new(),
        "**Q: What percentage do top 3 categories represent?**".to_string(),
        format!("- Top 3 Total: {top3} records ({:.2}%)", counts.share_pct(top3)),
    ]);
    Block::markdown(lines)
}

// ============================================================================
// Featured analyses
// ============================================================================

fn featured_age(doc: &mut Document, table: &Table) -> Result<()> {
    let s = describe(table, "age")?;
    doc.push(Block::Subheader("Age Distribution Analysis".into()));
    doc.push(Block::chart(
        ChartSpec::histogram(table.clone(), "age")
            .nbins(40)
            .title("Age Distribution")
            .label("age", "Age (years)")
            .label("count", "Count"),
    ));
    doc.push(Block::expander(
        "Age Analysis Questions",
        vec![Block::markdown([
            "**Q: What is the age profile of our customers?**".to_string(),
            format!("- Average Age: {:.1} years", s.mean),
            format!("- Median Age: {:.1} years", s.median),
            String::new(),
            "**Q: What age groups do we have?**".to_string(),
            format!("- Youngest: {:.0} years", s.min),
            format!("- Oldest: {:.0} years", s.max),
            format!("- Age Range: {:.0} years", s.range()),
        ])],
    ));
    Ok(())
}

fn featured_income(doc: &mut Document, table: &Table) -> Result<()> {
    let s = describe(table, "income")?;
    doc.push(Block::Subheader("Income Distribution Analysis".into()));
    doc.push(Block::chart(
        ChartSpec::histogram(table.clone(), "income")
            .nbins(50)
            .title("Income Distribution")
            .label("income", "Income ($)")
            .label("count", "Count"),
    ));
    doc.push(Block::expander(
        "Income Analysis Questions",
        vec![Block::markdown([
            "**Q: What is the income distribution of our customer base?**".to_string(),
            format!("- Average Income: {}", format::money_whole(s.mean)),
            format!("- Median Income: {}", format::money_whole(s.median)),
            String::new(),
            "**Q: Are there significant income variations?**".to_string(),
            format!("- Min Income: {}", format::money_whole(s.min)),
            format!("- Max Income: {}", format::money_whole(s.max)),
            format!("- Std Dev: {}", format::money_whole(s.std)),
        ])],
    ));
    Ok(())
}

fn featured_gender(doc: &mut Document, table: &Table) -> Result<()> {
    let counts = value_counts(table, "gender")?;
    let counts_table = counts.to_table("Gender", "Count")?;

    doc.push(Block::Subheader("Gender Distribution Analysis".into()));
    doc.push(Block::Columns(vec![
        vec![Block::chart(
            ChartSpec::bar(counts_table.clone(), "Gender", "Count")
                .title("Gender Distribution")
                .label("Count", "Number of Customers"),
        )],
        vec![Block::chart(ChartSpec::pie(counts_table, "Gender", "Count").title("Gender Proportion"))],
    ]));

    let total = counts.total();
    let mut lines = vec![
        "**Q: What is the gender composition of our customer base?**".to_string(),
        format!("- Total Customers: {total}"),
    ];
    for (value, n) in counts.entries.iter().take(2) {
        let share = if total == 0 { 0.0 } else { *n as f64 / total as f64 * 100.0 };
        lines.push(format!("- {value}: {n} ({share:.1}%)"));
    }
    doc.push(Block::expander("Gender Analysis Questions", vec![Block::markdown(lines)]));
    Ok(())
}

fn featured_claim_frequency(doc: &mut Document, table: &Table) -> Result<()> {
    let s = describe(table, "clm_freq")?;
    let rows = table.row_count() as f64;
    let none = count_where(table, "clm_freq", |v| v == 0.0)?;
    let some = count_where(table, "clm_freq", |v| v > 0.0)?;

    doc.push(Block::Subheader("Claim Frequency Analysis".into()));
    doc.push(Block::chart(
        ChartSpec::histogram(table.clone(), "clm_freq")
            .nbins(20)
            .title("Claim Frequency Distribution")
            .label("clm_freq", "Number of Claims")
            .label("count", "Count"),
    ));
    doc.push(Block::expander(
        "Claim Frequency Analysis Questions",
        vec![Block::markdown([
            "**Q: What is the typical claim frequency?**".to_string(),
            format!("- Average Claims: {:.2}", s.mean),
            format!("- Median Claims: {:.0}", s.median),
            String::new(),
            "**Q: How many customers have never filed a claim?**".to_string(),
            format!("- No Claims: {none} customers ({:.1}%)", none as f64 / rows * 100.0),
            format!("- 1+ Claims: {some} customers ({:.1}%)", some as f64 / rows * 100.0),
        ])],
    ));
    Ok(())
}

fn featured_years_on_job(doc: &mut Document, table: &Table) -> Result<()> {
    let s = describe(table, "yoj")?;
    doc.push(Block::Subheader("Years on Job Analysis".into()));
    doc.push(Block::chart(
        ChartSpec::histogram(table.clone(), "yoj")
            .nbins(30)
            .title("Years on Job Distribution")
            .label("yoj", "Years on Job")
            .label("count", "Count"),
    ));
    doc.push(Block::expander(
        "Years on Job Analysis Questions",
        vec![Block::markdown([
            "**Q: What is the job tenure profile?**".to_string(),
            format!("- Average Years: {:.1}", s.mean),
            format!("- Median Years: {:.1}", s.median),
            String::new(),
            "**Q: Employee stability insights?**".to_string(),
            format!("- Min Years: {:.0}", s.min),
            format!("- Max Years: {:.0}", s.max),
        ])],
    ));
    Ok(())
}
