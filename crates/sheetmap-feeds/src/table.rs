//! CSV text → typed rows.
//!
//! The first record is the header row; columns are matched to row fields by
//! exact (case-sensitive) name and extra columns are ignored. Blank lines are
//! skipped. One malformed record fails the whole sheet: a layer is either
//! loaded completely or not at all.

use crate::FeedError;
use serde::de::DeserializeOwned;
use sheetmap_core::{Row, ShapeRow};

pub fn parse_rows(text: &str) -> Result<Vec<Row>, FeedError> {
    parse(text)
}

pub fn parse_shape_rows(text: &str) -> Result<Vec<ShapeRow>, FeedError> {
    parse(text)
}

fn parse<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, FeedError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.trim_start_matches('\u{feff}').as_bytes());

    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()?;
    tracing::debug!(rows = rows.len(), "sheet parsed");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn header_row_names_the_columns() {
        let text = "name,description,color,lat,lon\nA,d1,red,43.9,12.9\n";
        let rows = parse_rows(text).unwrap();
        assert_eq!(rows, vec![Row::new("A", "d1", "red", 43.9, 12.9)]);
    }

    #[test]
    fn column_order_and_extra_columns_do_not_matter() {
        let text = "lon,notes,lat,name,color,description\n12.9,x,43.9,A,red,\"d1, with comma\"\n";
        let rows = parse_rows(text).unwrap();
        assert_eq!(rows[0].name, "A");
        assert_eq!(rows[0].description, "d1, with comma");
        assert_eq!(rows[0].position().unwrap().lat, 43.9);
    }

    #[test]
    fn blank_lines_and_bom_are_ignored() {
        let text = concat!(
            "\u{feff}name,description,color,lat,lon\r\n",
            "A,d1,red,43.9,12.9\r\n\r\n",
            "B,d2,blue,44,13\r\n",
        );
        let rows = parse_rows(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].lat, "44");
    }

    #[test]
    fn missing_coordinate_column_fails_the_sheet() {
        let text = "name,description,color,lat\nA,d1,red,43.9\n";
        assert!(matches!(parse_rows(text), Err(FeedError::Csv(_))));
    }

    #[test]
    fn shape_rows_keep_json_cells_verbatim() {
        let text = "name,description,color,geometry\nWalls,,darkred,\"[[12.9,43.9],[13,44]]\"\n";
        let rows = parse_shape_rows(text).unwrap();
        assert_eq!(rows[0].geometry, "[[12.9,43.9],[13,44]]");
    }
}
