//! Home page: dataset description and column dictionary.

use super::{Block, Document};
use crate::dataset::{ColumnKind, DType, Table};
use crate::error::Result;
use crate::stats::{distinct_count, summarize};

/// Field descriptions shown on the home page, in display order.
pub const COLUMN_DESCRIPTIONS: [(&str, &str); 26] = [
    ("kidsdriv", "Number of children who drive"),
    ("age", "Age of the primary driver"),
    ("homekids", "Number of children at home"),
    ("yoj", "Years on current job"),
    ("income", "Annual income of the customer"),
    ("parent1", "Indicator if the customer is a single parent (Yes/No)"),
    ("home_val", "Value of the home owned by the customer"),
    ("mstatus", "Marital status of the customer (Yes/No for married)"),
    ("gender", "Gender of the customer (M/F)"),
    ("education", "Education level of the customer"),
    ("occupation", "Occupation of the customer"),
    ("travtime", "Travel time to work in minutes"),
    ("car_use", "Primary use of the car (Private/Commercial)"),
    ("bluebook", "Value of the car (blue book value)"),
    ("tif", "Time in force - length of time the policy has been in effect"),
    ("car_type", "Type of car (e.g., Minivan, SUV, Sports Car)"),
    ("red_car", "Indicator if the car is red (yes/no)"),
    ("oldclaim", "Amount of previous claims"),
    ("clm_freq", "Frequency of claims"),
    ("revoked", "Indicator if the license was ever revoked (Yes/No)"),
    ("mvr_pts", "Motor vehicle record points"),
    ("clm_amt", "Amount of the current claim"),
    ("car_age", "Age of the car in years"),
    ("claim_flag", "Indicator if a claim was made (0/1)"),
    ("urbanicity", "Urbanicity level of the customer's location"),
    ("Customer_Loyalty", "Customer loyalty category"),
];

const DATA_DESCRIPTION: &str = "This dataset contains information about car insurance customers, \
their demographics, vehicle details, and claim history. It is used for analyzing factors that \
influence insurance claims and customer behavior. The data has been cleaned and processed for analysis.";

/// Compose the home page.
pub fn build(table: &Table) -> Result<Document> {
    let mut doc = Document::new("Home");
    doc.push(Block::Title("Home Page".into()));

    doc.push(Block::Header("Data Description".into()));
    doc.push(Block::text(DATA_DESCRIPTION));

    doc.push(Block::Subheader("Dataset Overview".into()));
    doc.push(Block::text(format!("Number of rows: {}", table.row_count())));
    doc.push(Block::text(format!("Number of columns: {}", table.column_count())));
    doc.push(Block::text("Sample data:"));
    doc.push(Block::Table(table.head(5)));

    doc.push(Block::Header("Column Descriptions".into()));
    doc.push(Block::text("Below is a detailed description of each column in the dataset:"));

    for (name, description) in COLUMN_DESCRIPTIONS {
        doc.push(Block::Subheader(name.to_string()));
        doc.push(Block::text(description));
        if let Ok(column) = table.column(name) {
            doc.push(Block::text(format!("Data type: {}", column.dtype())));
            doc.push(Block::text(format!("Unique values: {}", distinct_count(table, name)?)));
            if column.kind() == ColumnKind::Numeric {
                let range = match column.as_numeric().and_then(summarize) {
                    Some(s) => {
                        let integer = column.dtype() == DType::Int64;
                        format!(
                            "Min: {}, Max: {}, Mean: {:.2}",
                            display_value(s.min, integer),
                            display_value(s.max, integer),
                            s.mean
                        )
                    }
                    None => "Min: nan, Max: nan, Mean: nan".to_string(),
                };
                doc.push(Block::text(range));
            }
            doc.push(Block::Divider);
        }
    }

    Ok(doc)
}

/// Integers without a decimal point; floats always show one (`0.0`).
fn display_value(v: f64, integer: bool) -> String {
    if integer && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v:?}")
    }
}
