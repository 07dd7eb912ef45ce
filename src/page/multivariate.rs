//! Multivariate page: ten relationship questions over the cleaned data.

use super::{Block, Document};
use crate::chart::ChartSpec;
use crate::dataset::Table;
use crate::error::Result;
use crate::format;
use crate::stats::{corr, cut, group_by, mean, Agg, GroupOrder};

const AGE_EDGES: [f64; 6] = [0.0, 30.0, 40.0, 50.0, 60.0, 100.0];
const AGE_LABELS: [&str; 5] = ["18-30", "31-40", "41-50", "51-60", "60+"];

const TENURE_EDGES: [f64; 5] = [0.0, 5.0, 10.0, 15.0, 20.0];
const TENURE_LABELS: [&str; 4] = ["0-5 years", "6-10 years", "11-15 years", "15+ years"];

const SCATTER_OPACITY: f32 = 0.6;

/// Compose the multivariate page.
///
/// # Errors
///
/// Fails when a required column is absent, or a group the insight text
/// quotes (`M`/`F`, `Commercial`/`Private`) does not occur in the data.
pub fn build(table: &Table) -> Result<Document> {
    let mut doc = Document::new("Multivariate Analysis");
    doc.push(Block::Title("Multivariate Analysis".into()));
    doc.push(Block::text(
        "This page explores relationships between multiple variables to uncover insights in car insurance data.",
    ));
    doc.push(Block::Divider);

    let age_group = cut(table, "age", &AGE_EDGES, &AGE_LABELS, "age_group")?;
    let tenure_group = cut(table, "yoj", &TENURE_EDGES, &TENURE_LABELS, "job_tenure_group")?;
    let table = table.with_column(age_group)?.with_column(tenure_group)?;

    claim_vs_age(&mut doc, &table)?;
    claim_vs_income(&mut doc, &table)?;
    income_by_age_group(&mut doc, &table)?;
    claim_frequency_by_age_group(&mut doc, &table)?;
    gender_patterns(&mut doc, &table)?;
    vehicle_type(&mut doc, &table)?;
    education(&mut doc, &table)?;
    marital_status(&mut doc, &table)?;
    vehicle_use(&mut doc, &table)?;
    job_tenure(&mut doc, &table)?;
    summary(&mut doc);

    Ok(doc)
}

/// Question header followed by its content and a closing divider.
fn question(doc: &mut Document, header: &str, content: Vec<Block>, insights: Vec<String>) {
    doc.push(Block::Header(header.to_string()));
    doc.blocks.extend(content);
    doc.push(Block::expander("Insights", vec![Block::Markdown(insights)]));
}

/// Three-decimal correlation, `nan` when undefined.
fn correlation(value: Option<f64>) -> String {
    value.map_or_else(|| "nan".to_string(), |v| format!("{v:.3}"))
}

fn or_nan(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}

fn age_order() -> GroupOrder {
    GroupOrder::Categories(AGE_LABELS.iter().map(|s| (*s).to_string()).collect())
}

fn tenure_order() -> GroupOrder {
    GroupOrder::Categories(TENURE_LABELS.iter().map(|s| (*s).to_string()).collect())
}

fn claim_vs_age(doc: &mut Document, table: &Table) -> Result<()> {
    let r = corr(table, "age", "clm_amt")?;
    doc.push(Block::Divider);
    question(
        doc,
        "1. How does Claim Amount vary with Customer Age?",
        vec![Block::chart(
            ChartSpec::scatter(table.clone(), "age", "clm_amt")
                .title("Claim Amount vs Age")
                .label("age", "Age (years)")
                .label("clm_amt", "Claim Amount ($)")
                .opacity(SCATTER_OPACITY)
                .trendline(true),
        )],
        vec![
            format!("- Correlation: {}", correlation(r)),
            "- Average claim by age group shows the relationship between customer age and claim amounts".into(),
            "- Trend line helps identify if older or younger customers tend to have higher claims".into(),
        ],
    );
    Ok(())
}

fn claim_vs_income(doc: &mut Document, table: &Table) -> Result<()> {
    let r = corr(table, "income", "clm_amt")?;
    doc.push(Block::Divider);
    question(
        doc,
        "2. What is the relationship between Customer Income and Claim Amount?",
        vec![Block::chart(
            ChartSpec::scatter(table.clone(), "income", "clm_amt")
                .title("Claim Amount vs Income")
                .label("income", "Income ($)")
                .label("clm_amt", "Claim Amount ($)")
                .opacity(SCATTER_OPACITY)
                .trendline(true),
        )],
        vec![
            format!("- Correlation: {}", correlation(r)),
            "- Understanding if higher income customers file larger claims".into(),
            "- Income level may indicate car value and thus claim amounts".into(),
        ],
    );
    Ok(())
}

fn income_by_age_group(doc: &mut Document, table: &Table) -> Result<()> {
    let grouped = group_by(table, "age_group", &[Agg::mean("income")], age_order())?
        .rename_columns(&["Age Group", "Average Income"])?;

    let ages = table.numeric("age")?;
    let young: Vec<Option<f64>> = table
        .numeric("income")?
        .iter()
        .zip(ages)
        .filter(|(_, age)| age.is_some_and(|a| a <= 30.0))
        .map(|(income, _)| *income)
        .collect();
    let peak = grouped.numbers("Average Income")?.into_iter().reduce(f64::max);

    doc.push(Block::Divider);
    question(
        doc,
        "3. How does Customer Income vary across Age Groups?",
        vec![Block::chart(
            ChartSpec::bar(grouped, "Age Group", "Average Income")
                .title("Average Income by Age Group")
                .label("Average Income", "Income ($)"),
        )],
        vec![
            format!("- Younger customers (18-30) avg income: {}", format::money_whole(or_nan(mean(&young)))),
            format!("- Peak earning age group avg income: {}", format::money_whole(or_nan(peak))),
            "- Income typically increases with age up to a point, then may stabilize or decrease".into(),
        ],
    );
    Ok(())
}

fn claim_frequency_by_age_group(doc: &mut Document, table: &Table) -> Result<()> {
    let grouped = group_by(table, "age_group", &[Agg::mean("clm_freq")], age_order())?
        .rename_columns(&["Age Group", "Average Claim Frequency"])?;
    let r = corr(table, "age", "clm_freq")?;

    doc.push(Block::Divider);
    question(
        doc,
        "4. How does Claim Frequency vary with Customer Age?",
        vec![Block::chart(
            ChartSpec::bar(grouped, "Age Group", "Average Claim Frequency")
                .title("Average Claim Frequency by Age Group")
                .label("Average Claim Frequency", "Average Number of Claims"),
        )],
        vec![
            format!("- Correlation: {}", correlation(r)),
            "- Risk profile changes across age groups".into(),
            "- Younger drivers may have different claim patterns than older drivers".into(),
        ],
    );
    Ok(())
}

fn gender_patterns(doc: &mut Document, table: &Table) -> Result<()> {
    let grouped = group_by(
        table,
        "gender",
        &[Agg::mean("clm_amt"), Agg::mean("clm_freq")],
        GroupOrder::KeyAscending,
    )?
    .rename_columns(&["Gender", "Avg Claim Amount", "Avg Claim Frequency"])?;

    let male = or_nan(grouped.lookup("Gender", "M", "Avg Claim Amount")?);
    let female = or_nan(grouped.lookup("Gender", "F", "Avg Claim Amount")?);

    doc.push(Block::Divider);
    question(
        doc,
        "5. Do Male and Female Customers have Different Claim Patterns?",
        vec![Block::Columns(vec![
            vec![Block::chart(
                ChartSpec::bar(grouped.clone(), "Gender", "Avg Claim Amount")
                    .title("Average Claim Amount by Gender")
                    .label("Avg Claim Amount", "Claim Amount ($)"),
            )],
            vec![Block::chart(
                ChartSpec::bar(grouped, "Gender", "Avg Claim Frequency")
                    .title("Average Claim Frequency by Gender")
                    .label("Avg Claim Frequency", "Number of Claims"),
            )],
        ])],
        vec![
            format!("- Male customers avg claim amount: {}", format::money(male)),
            format!("- Female customers avg claim amount: {}", format::money(female)),
            "- Gender differences in claim behavior may indicate different risk profiles".into(),
        ],
    );
    Ok(())
}

/// Mean and count of claim amount per `key`, highest mean first.
fn claims_ranked(table: &Table, key: &str, key_label: &str) -> Result<Table> {
    group_by(
        table,
        key,
        &[Agg::mean("clm_amt"), Agg::count("clm_amt")],
        GroupOrder::ByAggregateDescending(0),
    )?
    .rename_columns(&[key_label, "Avg Claim Amount", "Count"])
}

/// `name ($amount)` for one row of a ranked table.
fn ranked_entry(ranked: &Table, key_label: &str, row: usize) -> Result<String> {
    let name = ranked.column(key_label)?.label(row).unwrap_or_default();
    let amount = or_nan(ranked.numeric("Avg Claim Amount")?.get(row).copied().flatten());
    Ok(format!("{name} ({})", format::money(amount)))
}

fn vehicle_type(doc: &mut Document, table: &Table) -> Result<()> {
    let ranked = claims_ranked(table, "car_type", "Car Type")?;
    let last = ranked.row_count().saturating_sub(1);
    let highest = ranked_entry(&ranked, "Car Type", 0)?;
    let lowest = ranked_entry(&ranked, "Car Type", last)?;

    doc.push(Block::Divider);
    question(
        doc,
        "6. Which Vehicle Types have the Highest Average Claims?",
        vec![Block::chart(
            ChartSpec::bar(ranked, "Car Type", "Avg Claim Amount")
                .title("Average Claim Amount by Vehicle Type")
                .label("Avg Claim Amount", "Claim Amount ($)")
                .label("Car Type", "Vehicle Type")
                .color("Avg Claim Amount"),
        )],
        vec![
            format!("- Highest claim vehicle: {highest}"),
            format!("- Lowest claim vehicle: {lowest}"),
            "- Vehicle type is a key factor in determining claim amounts".into(),
        ],
    );
    Ok(())
}

fn education(doc: &mut Document, table: &Table) -> Result<()> {
    let ranked = claims_ranked(table, "education", "Education")?;
    let highest = ranked_entry(&ranked, "Education", 0)?;

    doc.push(Block::Divider);
    question(
        doc,
        "7. How does Education Level Impact Claim Amounts?",
        vec![Block::chart(
            ChartSpec::bar(ranked, "Education", "Avg Claim Amount")
                .title("Average Claim Amount by Education Level")
                .label("Avg Claim Amount", "Claim Amount ($)")
                .color("Avg Claim Amount"),
        )],
        vec![
            format!("- Highest claim education group: {highest}"),
            "- Education may correlate with income and vehicle type".into(),
            "- Better educated drivers may own more expensive vehicles".into(),
        ],
    );
    Ok(())
}

fn marital_status(doc: &mut Document, table: &Table) -> Result<()> {
    let grouped = group_by(table, "mstatus", &[Agg::mean("clm_freq")], GroupOrder::KeyAscending)?
        .rename_columns(&["Marital Status", "Avg Claim Frequency"])?;

    doc.push(Block::Divider);
    question(
        doc,
        "8. Does Marital Status Affect Claim Frequency?",
        vec![Block::chart(
            ChartSpec::bar(grouped, "Marital Status", "Avg Claim Frequency")
                .title("Average Claim Frequency by Marital Status")
                .label("Avg Claim Frequency", "Number of Claims"),
        )],
        vec![
            "- Marital status may indicate lifestyle and driving patterns".into(),
            "- Married individuals may have different risk profiles".into(),
            "- Family status can affect claim behavior".into(),
        ],
    );
    Ok(())
}

fn vehicle_use(doc: &mut Document, table: &Table) -> Result<()> {
    let grouped = group_by(
        table,
        "car_use",
        &[Agg::mean("clm_amt"), Agg::count("clm_amt")],
        GroupOrder::KeyAscending,
    )?
    .rename_columns(&["Car Use", "Avg Claim Amount", "Count"])?;

    let commercial = or_nan(grouped.lookup("Car Use", "Commercial", "Avg Claim Amount")?);
    let private = or_nan(grouped.lookup("Car Use", "Private", "Avg Claim Amount")?);

    doc.push(Block::Divider);
    question(
        doc,
        "9. How does Vehicle Usage Type Impact Claim Amounts?",
        vec![Block::chart(
            ChartSpec::bar(grouped, "Car Use", "Avg Claim Amount")
                .title("Average Claim Amount by Vehicle Use Type")
                .label("Avg Claim Amount", "Claim Amount ($)")
                .label("Car Use", "Use Type"),
        )],
        vec![
            format!("- Commercial vehicles: {}", format::money(commercial)),
            format!("- Private vehicles: {}", format::money(private)),
            "- Business vs personal use drives different claim patterns".into(),
        ],
    );
    Ok(())
}

fn job_tenure(doc: &mut Document, table: &Table) -> Result<()> {
    let tenured = table.drop_missing("job_tenure_group")?;
    let grouped = group_by(
        &tenured,
        "job_tenure_group",
        &[Agg::mean("clm_freq"), Agg::mean("clm_amt")],
        tenure_order(),
    )?
    .rename_columns(&["Job Tenure", "Avg Claim Frequency", "Avg Claim Amount"])?;

    let freq = corr(table, "yoj", "clm_freq")?;
    let amount = corr(table, "yoj", "clm_amt")?;

    doc.push(Block::Divider);
    question(
        doc,
        "10. How do Employment Stability and Claim Patterns Correlate?",
        vec![Block::Columns(vec![
            vec![Block::chart(
                ChartSpec::bar(grouped.clone(), "Job Tenure", "Avg Claim Frequency")
                    .title("Claim Frequency by Job Tenure")
                    .label("Avg Claim Frequency", "Number of Claims"),
            )],
            vec![Block::chart(
                ChartSpec::bar(grouped, "Job Tenure", "Avg Claim Amount")
                    .title("Claim Amount by Job Tenure")
                    .label("Avg Claim Amount", "Claim Amount ($)"),
            )],
        ])],
        vec![
            "- Employees with longer tenure show different risk patterns".into(),
            "- Job stability may indicate overall stability and reliability".into(),
            "- More established employees may have different vehicle choices and claim patterns".into(),
            format!("- Correlation (YOJ vs Claim Freq): {}", correlation(freq)),
            format!("- Correlation (YOJ vs Claim Amount): {}", correlation(amount)),
        ],
    );
    Ok(())
}

fn summary(doc: &mut Document) {
    doc.push(Block::Divider);
    doc.push(Block::Header("Summary of Key Findings".into()));
    doc.push(Block::markdown([
        "These multivariate analyses reveal important relationships in the car insurance dataset:",
        "",
        "1. **Demographics Matter**: Age, gender, and marital status all play roles in claim patterns",
        "2. **Income Correlation**: Higher income correlates with different claim behaviors",
        "3. **Vehicle Factors**: Car type and usage significantly impact claims",
        "4. **Stability Indicators**: Education and job tenure reflect overall stability and risk profile",
        "5. **Risk Assessment**: Multiple factors work together to determine insurance risk",
    ]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartKind;
    use crate::dataset::Column;
    use crate::error::Error;

    fn table() -> Table {
        Table::from_columns(vec![
            Column::numeric("age", vec![25.0, 35.0, 45.0, 65.0, 28.0, 52.0]),
            Column::numeric("income", vec![30_000.0, 50_000.0, 80_000.0, 60_000.0, 40_000.0, 90_000.0]),
            Column::numeric("clm_amt", vec![1000.0, 0.0, 500.0, 0.0, 3000.0, 200.0]),
            Column::numeric("clm_freq", vec![2.0, 0.0, 1.0, 0.0, 3.0, 1.0]),
            Column::numeric("yoj", vec![0.0, 4.0, 12.0, 18.0, 7.0, 25.0]),
            Column::categorical("gender", ["M", "F", "F", "M", "M", "F"]),
            Column::categorical("car_type", ["SUV", "Minivan", "Sports Car", "SUV", "Pickup", "Minivan"]),
            Column::categorical("education", ["PhD", "Bachelors", "Masters", "PhD", "High School", "Masters"]),
            Column::categorical("mstatus", ["Yes", "No", "Yes", "Yes", "No", "No"]),
            Column::categorical("car_use", ["Private", "Commercial", "Private", "Private", "Commercial", "Private"]),
        ])
        .unwrap()
    }

    fn insights(doc: &Document) -> Vec<String> {
        doc.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Expander { blocks, .. } => Some(blocks),
                _ => None,
            })
            .flatten()
            .filter_map(|b| match b {
                Block::Markdown(lines) => Some(lines.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn test_ten_questions_and_summary() {
        let doc = build(&table()).unwrap();
        let headers: Vec<&str> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Header(h) => Some(h.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(headers.len(), 11);
        assert!(headers[0].starts_with("1. "));
        assert!(headers[9].starts_with("10. "));
        assert_eq!(headers[10], "Summary of Key Findings");
        assert_eq!(doc.charts().len(), 12);
    }

    #[test]
    fn test_scatter_questions_use_trend_lines() {
        let doc = build(&table()).unwrap();
        let charts = doc.charts();
        assert_eq!(charts[0].kind(), ChartKind::Scatter);
        assert_eq!(charts[1].kind(), ChartKind::Scatter);
        assert!(charts[0].to_svg().unwrap().contains("<polyline"));
    }

    #[test]
    fn test_age_groups_follow_bin_order() {
        let doc = build(&table()).unwrap();
        let groups = doc.charts()[2].data().labels("Age Group").unwrap();
        let groups: Vec<&str> = groups.iter().flatten().map(String::as_str).collect();
        assert_eq!(groups, vec!["18-30", "31-40", "41-50", "51-60", "60+"]);
    }

    #[test]
    fn test_insight_figures() {
        let lines = insights(&build(&table()).unwrap());
        assert!(lines.contains(&"- Younger customers (18-30) avg income: $35,000".to_string()));
        assert!(lines.contains(&"- Peak earning age group avg income: $90,000".to_string()));
        assert!(lines.contains(&"- Male customers avg claim amount: $1,333.33".to_string()));
        assert!(lines.contains(&"- Female customers avg claim amount: $233.33".to_string()));
        assert!(lines.contains(&"- Highest claim vehicle: Pickup ($3,000.00)".to_string()));
        assert!(lines.contains(&"- Lowest claim vehicle: Minivan ($100.00)".to_string()));
        assert!(lines.contains(&"- Highest claim education group: High School ($3,000.00)".to_string()));
        assert!(lines.contains(&"- Commercial vehicles: $1,500.00".to_string()));
        assert!(lines.contains(&"- Private vehicles: $425.00".to_string()));
    }

    #[test]
    fn test_job_tenure_drops_out_of_range() {
        let doc = build(&table()).unwrap();
        // yoj 0 and 25 fall outside (0, 20].
        let tenure = doc.charts()[10].data();
        let labels = tenure.labels("Job Tenure").unwrap();
        let labels: Vec<&str> = labels.iter().flatten().map(String::as_str).collect();
        assert_eq!(labels, vec!["0-5 years", "6-10 years", "11-15 years", "15+ years"]);
        assert_eq!(tenure.numbers("Avg Claim Frequency").unwrap(), vec![0.0, 3.0, 1.0, 0.0]);
    }

    #[test]
    fn test_missing_named_group_fails() {
        let table = table()
            .with_column(Column::categorical("car_use", ["Private"; 6]))
            .unwrap();
        let err = build(&table).unwrap_err();
        assert!(matches!(err, Error::GroupNotFound { ref value, .. } if value == "Commercial"));
    }
}
