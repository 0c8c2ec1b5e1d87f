use crate::error::Result;
use crate::table::write_table;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Write;

/// Empty-value counts for one column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmptyCounts {
    pub column: String,
    /// Rows holding an explicit `null`.
    pub null_count: usize,
    /// Rows without the key at all.
    pub missing_count: usize,
    /// Rows holding a string that is empty or only whitespace.
    pub blank_count: usize,
}

/// Count the different kinds of empty values per column.
///
/// Columns are the union of the keys of every row, in the order they are
/// first seen. Rows that aren't objects are missing every column.
pub fn empty_value_summary(rows: &[Value]) -> Vec<EmptyCounts> {
    let mut summary: Vec<EmptyCounts> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for key in rows.iter().filter_map(Value::as_object).flat_map(|row| row.keys()) {
        index.entry(key.as_str()).or_insert_with(|| {
            summary.push(EmptyCounts { column: key.clone(), ..EmptyCounts::default() });
            summary.len() - 1
        });
    }
    for row in rows {
        let Some(row) = row.as_object() else {
            summary.iter_mut().for_each(|counts| counts.missing_count += 1);
            continue;
        };
        for counts in &mut summary {
            match row.get(&counts.column) {
                None => counts.missing_count += 1,
                Some(Value::Null) => counts.null_count += 1,
                Some(Value::String(text)) if text.trim().is_empty() => counts.blank_count += 1,
                Some(_) => {},
            }
        }
    }
    summary
}

/// Write the counts as a `column  null_count  missing_count  blank_count` table.
pub fn write_empty_summary(summary: &[EmptyCounts], writer: &mut impl Write) -> Result<()> {
    let rows: Vec<[String; 4]> = summary
        .iter()
        .map(|counts| {
            [
                counts.column.clone(),
                counts.null_count.to_string(),
                counts.missing_count.to_string(),
                counts.blank_count.to_string(),
            ]
        })
        .collect();
    write_table(writer, ["column", "null_count", "missing_count", "blank_count"], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counts(column: &str, null_count: usize, missing_count: usize, blank_count: usize) -> EmptyCounts {
        EmptyCounts { column: column.to_string(), null_count, missing_count, blank_count }
    }

    #[test]
    fn test_counts_each_kind_separately() {
        let rows = [
            json!({"name": "Booster Box", "category": "booster_box", "releaseDate": null}),
            json!({"name": "", "category": null}),
            json!({"name": "Bundle", "category": "  ", "releaseDate": "2024-02-09", "subtype": "default"}),
        ];
        assert_eq!(
            empty_value_summary(&rows),
            [
                counts("name", 0, 0, 1),
                counts("category", 1, 0, 1),
                counts("releaseDate", 1, 1, 0),
                counts("subtype", 0, 2, 0),
            ]
        );
    }

    #[test]
    fn test_non_object_rows_are_missing_everything() {
        let rows = [json!({"code": "LEA"}), json!(null), json!("LEB")];
        assert_eq!(empty_value_summary(&rows), [counts("code", 0, 2, 0)]);
    }

    #[test]
    fn test_falsy_values_are_not_empty() {
        let rows = [json!({"count": 0, "isFoilOnly": false, "cards": [], "identifiers": {}})];
        let summary = empty_value_summary(&rows);
        assert_eq!(summary.len(), 4);
        assert!(summary.iter().all(|c| c.null_count + c.missing_count + c.blank_count == 0));
    }

    #[test]
    fn test_no_rows() {
        assert!(empty_value_summary(&[]).is_empty());
    }

    #[test]
    fn test_write_empty_summary() {
        let mut output = Vec::new();
        write_empty_summary(&[counts("name", 1, 22, 3)], &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "column  null_count  missing_count  blank_count\nname    1           22             3\n"
        );
    }
}
