//! SQL text emission: script header, schema statements and `CREATE TABLE`.

use itertools::Itertools;

use crate::sniff::Delimiter;

const BANNER_WIDTH: usize = 60;
const PREVIEW_COLUMNS: usize = 5;
const COLUMN_TYPE: &str = "VARCHAR";

/// An external CSV table over the files of one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub schema: String,
    pub table: String,
    pub columns: Vec<String>,
    pub location: String,
    pub delimiter: Delimiter,
}

impl TableDefinition {
    /// Renders the `CREATE TABLE IF NOT EXISTS` statement.
    ///
    /// The table name is unqualified; the statement relies on the preceding
    /// `USE` from [`schema_statements`].
    pub fn create_statement(&self) -> String {
        let column_defs = self
            .columns
            .iter()
            .map(|column| format!("{column} {COLUMN_TYPE}"))
            .join(",\n    ");
        let separator = if self.delimiter.is_default() {
            String::new()
        } else {
            format!(",\n    csv_separator = '{}'", self.delimiter.escaped())
        };
        format!(
            "CREATE TABLE IF NOT EXISTS {table} (\n    {column_defs}\n)\nWITH (\n    \
             external_location = '{location}',\n    \
             format = 'CSV',\n    \
             skip_header_line_count = 1{separator}\n);",
            table = self.table,
            location = quote_literal(&self.location),
        )
    }

    /// First few column names for the comment preceding the statement.
    pub fn column_preview(&self) -> String {
        let shown = self.columns.iter().take(PREVIEW_COLUMNS).join(", ");
        if self.columns.len() > PREVIEW_COLUMNS {
            format!("{shown}...")
        } else {
            shown
        }
    }
}

pub fn script_header(root_label: &str) -> Vec<String> {
    let rule = format!("-- {}", "=".repeat(BANNER_WIDTH));
    vec![
        rule.clone(),
        "-- AUTO-GENERATED TRINO SCHEMAS FOR RAW DATA".to_string(),
        format!("-- Generated from CSV files in {root_label}/ directory"),
        rule,
        String::new(),
    ]
}

pub fn schema_statements(catalog: &str, schema: &str) -> Vec<String> {
    vec![
        format!("-- Schema: {schema}"),
        format!("CREATE SCHEMA IF NOT EXISTS {catalog}.{schema};"),
        format!("USE {catalog}.{schema};"),
        String::new(),
    ]
}

pub fn table_block(definition: &TableDefinition, source: &str) -> Vec<String> {
    vec![
        format!("-- Table: {}", definition.table),
        format!("-- Source: {source}"),
        format!("-- Columns: {}", definition.column_preview()),
        definition.create_statement(),
        String::new(),
    ]
}

fn quote_literal(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(columns: &[&str], delimiter: Delimiter) -> TableDefinition {
        TableDefinition {
            schema: "raw_hotels".to_string(),
            table: "hotels".to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            location: "s3://raw/hotels/".to_string(),
            delimiter,
        }
    }

    #[test]
    fn comma_tables_omit_separator_option() {
        let sql = definition(&["hotel_name", "city"], Delimiter::Comma).create_statement();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS hotels (\n    hotel_name VARCHAR,\n    city VARCHAR\n)\n\
             WITH (\n    external_location = 's3://raw/hotels/',\n    format = 'CSV',\n    \
             skip_header_line_count = 1\n);"
        );
    }

    #[test]
    fn semicolon_tables_declare_separator() {
        let sql = definition(&["id"], Delimiter::Semicolon).create_statement();
        assert!(sql.ends_with("skip_header_line_count = 1,\n    csv_separator = ';'\n);"));
    }

    #[test]
    fn tab_separator_is_escaped() {
        let sql = definition(&["id"], Delimiter::Tab).create_statement();
        assert!(sql.contains("csv_separator = '\\t'"));
    }

    #[test]
    fn quotes_in_location_are_doubled() {
        let mut def = definition(&["id"], Delimiter::Comma);
        def.location = "s3://raw/o'hare/".to_string();
        assert!(def.create_statement().contains("'s3://raw/o''hare/'"));
    }

    #[test]
    fn preview_truncates_after_five_columns() {
        let wide = definition(&["a", "b", "c", "d", "e", "f"], Delimiter::Comma);
        assert_eq!(wide.column_preview(), "a, b, c, d, e...");
        let narrow = definition(&["a", "b"], Delimiter::Comma);
        assert_eq!(narrow.column_preview(), "a, b");
    }

    #[test]
    fn schema_statements_use_catalog() {
        assert_eq!(
            schema_statements("hive", "raw_hotels"),
            vec![
                "-- Schema: raw_hotels".to_string(),
                "CREATE SCHEMA IF NOT EXISTS hive.raw_hotels;".to_string(),
                "USE hive.raw_hotels;".to_string(),
                String::new(),
            ]
        );
    }
}
