//! Aggregation of cart rows into the downloadable shopping list.

use ladle_core::shopping_list::UTF8_BOM;
use ladle_core::{aggregate, render_csv, CartRow, ShoppingListEntry};

fn row(name: &str, unit: &str, amount: i32) -> CartRow {
    CartRow {
        name: name.to_string(),
        measurement_unit: unit.to_string(),
        amount,
    }
}

/// Parse an export back into (name, unit, amount) records, skipping the header.
fn read_back(bytes: &[u8]) -> Vec<(String, String, i64)> {
    assert!(bytes.starts_with(UTF8_BOM), "export must start with a BOM");
    let mut reader = csv::Reader::from_reader(&bytes[UTF8_BOM.len()..]);
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["name", "measurement_unit", "amount"]
    );
    let mut rows: Vec<(String, String, i64)> = reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            (r[0].to_string(), r[1].to_string(), r[2].parse().unwrap())
        })
        .collect();
    rows.sort();
    rows
}

#[test]
fn flour_from_two_recipes_becomes_one_row() {
    // recipe A: flour 100 g, eggs 2 pcs; recipe B: flour 50 g, sugar 30 g
    let cart = vec![
        row("flour", "g", 100),
        row("eggs", "pcs", 2),
        row("flour", "g", 50),
        row("sugar", "g", 30),
    ];

    let bytes = render_csv(&aggregate(cart)).unwrap();
    let rows = read_back(&bytes);

    let flour: Vec<_> = rows.iter().filter(|(name, _, _)| name == "flour").collect();
    assert_eq!(flour, vec![&("flour".to_string(), "g".to_string(), 150)]);
    assert_eq!(
        rows,
        vec![
            ("eggs".to_string(), "pcs".to_string(), 2),
            ("flour".to_string(), "g".to_string(), 150),
            ("sugar".to_string(), "g".to_string(), 30),
        ]
    );
}

#[test]
fn cyrillic_names_survive_the_export() {
    let cart = vec![
        row("мука", "г", 200),
        row("мука", "г", 300),
        row("молоко", "мл", 500),
    ];

    let rows = read_back(&render_csv(&aggregate(cart)).unwrap());

    assert!(rows.contains(&("мука".to_string(), "г".to_string(), 500)));
    assert!(rows.contains(&("молоко".to_string(), "мл".to_string(), 500)));
}

#[test]
fn entries_serialize_with_api_field_names() {
    let entry = ShoppingListEntry {
        name: "flour".to_string(),
        measurement_unit: "g".to_string(),
        amount: 150,
    };
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"name": "flour", "measurement_unit": "g", "amount": 150})
    );
}
