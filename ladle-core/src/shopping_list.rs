//! Shopping list aggregation and CSV export.
//!
//! The cart is loaded as one row per (recipe, ingredient) pair. Rows are
//! grouped by ingredient name and measurement unit and their amounts summed,
//! so "flour, g" from two recipes becomes a single line.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ExportError;

/// Byte-order mark written ahead of the CSV so spreadsheet tools pick UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const CSV_HEADER: [&str; 3] = ["name", "measurement_unit", "amount"];

pub const EXPORT_FILENAME: &str = "shopping_cart.csv";

/// One ingredient line of one recipe in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRow {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingListEntry {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Group rows by (name, unit) and sum their amounts, ordered by (name, unit).
pub fn aggregate<I>(rows: I) -> Vec<ShoppingListEntry>
where
    I: IntoIterator<Item = CartRow>,
{
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for row in rows {
        *totals.entry((row.name, row.measurement_unit)).or_insert(0) += i64::from(row.amount);
    }

    totals
        .into_iter()
        .map(|((name, measurement_unit), amount)| ShoppingListEntry {
            name,
            measurement_unit,
            amount,
        })
        .collect()
}

/// Render entries as BOM-prefixed CSV with a header row.
pub fn render_csv(entries: &[ShoppingListEntry]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(CSV_HEADER)?;
    for entry in entries {
        writer.write_record([
            entry.name.as_str(),
            entry.measurement_unit.as_str(),
            entry.amount.to_string().as_str(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))
}
