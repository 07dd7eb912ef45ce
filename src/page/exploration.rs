//! Exploration page: the automated profiling report of the raw file.

use super::Document;
use crate::dataset::Table;
use crate::error::Result;
use crate::profiling::ProfileReport;

/// Compose the exploration page over the raw (uncleaned) table.
pub fn build(table: &Table) -> Result<Document> {
    ProfileReport::build(table).to_document()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::LoadOptions;
    use crate::page::Block;

    #[test]
    fn test_title_and_sample() {
        let raw = "ID,KIDSDRIV,BIRTH\n63581743,0,16MAR39\n132761049,0,21JAN56\n";
        let table = Table::from_csv_str(raw, &LoadOptions::default()).unwrap();
        let doc = build(&table).unwrap();

        assert_eq!(doc.title, "Data Exploration");
        assert!(matches!(&doc.blocks[0], Block::Title(t) if t == "Data Exploration"));
        let Some(Block::Table(sample)) = doc.blocks.last() else { panic!("sample table expected last") };
        assert_eq!(sample.row_count(), 2);
        assert_eq!(sample.column_names(), vec!["ID", "KIDSDRIV", "BIRTH"]);
    }
}
