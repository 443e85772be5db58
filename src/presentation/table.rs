use serde_json::Value;

use crate::source::Table;

/// Placeholder for a cell whose column the backend did not return.
pub const ABSENT_CELL: &str = "n/a";

/// A fully stringified table, ready for the template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    /// Every column of the source table, in backend order.
    pub fn from_table(table: &Table) -> Self {
        Self::select(table, &table.columns.iter().map(String::as_str).collect::<Vec<_>>()).0
    }

    /// Only the requested columns. Columns the table lacks are rendered with
    /// a placeholder and returned as the second element.
    pub fn select(table: &Table, columns: &[&str]) -> (Self, Vec<String>) {
        let missing: Vec<String> = columns
            .iter()
            .filter(|c| !table.has_column(c))
            .map(|c| c.to_string())
            .collect();

        let rows = table
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|col| {
                        if missing.iter().any(|m| m == col) {
                            ABSENT_CELL.to_string()
                        } else {
                            cell_text(row.get(*col).unwrap_or(&Value::Null))
                        }
                    })
                    .collect()
            })
            .collect();

        let view = Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        };
        (view, missing)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_reports_missing_columns_with_placeholder() {
        let table = Table::from_json("courses", json!([{"title": "A", "featured": true}]))
            .expect("table");
        let (view, missing) = TableView::select(&table, &["title", "duration", "featured"]);

        assert_eq!(missing, vec!["duration"]);
        assert_eq!(view.rows, vec![vec!["A", ABSENT_CELL, "true"]]);
    }

    #[test]
    fn test_from_table_keeps_every_column_and_blanks_nulls() {
        let table = Table::from_json(
            "apps",
            json!([{"email": "x@x", "extra": null}, {"email": "y@y", "notes": 3}]),
        )
        .expect("table");
        let view = TableView::from_table(&table);

        assert_eq!(view.columns, vec!["email", "extra", "notes"]);
        assert_eq!(view.rows[0], vec!["x@x", "", ""]);
        assert_eq!(view.rows[1], vec!["y@y", "", "3"]);
    }
}
