// caseline/src/commands/inspect.rs
//
// USE CASE: Inspect a DuckDB table (schema + sample rows).

use comfy_table::Table;
use std::path::Path;

use caseline_core::infrastructure::adapters::DuckDBConnector;

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn execute(db_path: String, table: String, limit: usize) -> anyhow::Result<()> {
    if !Path::new(&db_path).exists() {
        anyhow::bail!(
            "❌ Database not found at: {}\n👉 Have you run 'caseline run' with the duckdb engine?",
            db_path
        );
    }

    let connector = DuckDBConnector::new(&db_path)?;
    let (schema, name) = table.split_once('.').unwrap_or(("main", table.as_str()));

    println!("\n🔍 Inspecting Table: '{}.{}'", schema, name);

    let columns = connector.fetch_columns(schema, name)?;
    if columns.is_empty() {
        anyhow::bail!("❌ Table '{}.{}' not found in {}", schema, name, db_path);
    }

    let mut schema_table = Table::new();
    schema_table.set_header(vec!["Column", "Type", "Nullable"]);
    for col in &columns {
        schema_table.add_row(vec![
            col.name.clone(),
            col.data_type.clone(),
            col.is_nullable.to_string(),
        ]);
    }
    println!("{schema_table}");

    let total = connector.query_scalar(&format!(
        "SELECT COUNT(*) FROM {}.{}",
        quote_ident(schema),
        quote_ident(name)
    ))?;
    println!("   --- Rows ({} of {}) ---", limit.min(total.max(0) as usize), total);

    let rows = connector.fetch_rows(&format!(
        "SELECT COLUMNS(*)::VARCHAR FROM {}.{} LIMIT {}",
        quote_ident(schema),
        quote_ident(name),
        limit
    ))?;

    let mut sample = Table::new();
    sample.set_header(columns.iter().map(|c| c.name.clone()).collect::<Vec<_>>());
    for row in rows {
        sample.add_row(row);
    }
    println!("{sample}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("Age (Years)"), "\"Age (Years)\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
