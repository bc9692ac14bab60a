use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::client::{Client, Created, IngredientInput};

/// Parse a JSON array of `{name, measurement_unit}` or a headerless
/// two-column CSV. JSON is assumed when the first non-blank character is `[`.
pub fn parse_ingredients(contents: &str) -> Result<Vec<IngredientInput>> {
    let contents = contents.trim_start_matches('\u{feff}');
    if contents.trim_start().starts_with('[') {
        return serde_json::from_str(contents).context("Failed to parse ingredient JSON");
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let mut ingredients = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Bad CSV record on line {}", line + 1))?;
        let (Some(name), Some(unit)) = (record.get(0), record.get(1)) else {
            anyhow::bail!("Line {} needs a name and a measurement unit", line + 1);
        };
        ingredients.push(IngredientInput {
            name: name.trim().to_string(),
            measurement_unit: unit.trim().to_string(),
        });
    }
    Ok(ingredients)
}

pub async fn load_ingredients(client: &Client, path: &Path) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let ingredients = parse_ingredients(&contents)?;

    let mut created = 0;
    let mut skipped = 0;
    for ingredient in &ingredients {
        match client.create_ingredient(ingredient).await? {
            Created::Created => created += 1,
            Created::Rejected => skipped += 1,
        }
    }

    println!(
        "Loaded {} ingredients from {} ({} created, {} skipped)",
        ingredients.len(),
        path.display(),
        created,
        skipped
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_array() {
        let parsed = parse_ingredients(
            r#"[{"name": "абрикосовое варенье", "measurement_unit": "г"},
                {"name": "flour", "measurement_unit": "g"}]"#,
        )
        .unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "абрикосовое варенье");
        assert_eq!(parsed[1].measurement_unit, "g");
    }

    #[test]
    fn parses_headerless_csv_with_bom() {
        let parsed = parse_ingredients("\u{feff}flour,g\n\"salt, coarse\",g\nmilk, ml\n").unwrap();
        assert_eq!(
            parsed,
            vec![
                IngredientInput {
                    name: "flour".to_string(),
                    measurement_unit: "g".to_string(),
                },
                IngredientInput {
                    name: "salt, coarse".to_string(),
                    measurement_unit: "g".to_string(),
                },
                IngredientInput {
                    name: "milk".to_string(),
                    measurement_unit: "ml".to_string(),
                },
            ]
        );
    }

    #[test]
    fn rejects_single_column_rows() {
        assert!(parse_ingredients("flour\n").is_err());
    }
}
