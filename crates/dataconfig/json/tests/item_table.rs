//! End-to-end decoding of a realistic item table.

use std::collections::BTreeMap;

use dataconfig_core::{DiagnosticKind, RecordSchema};
use dataconfig_json::{DataParser, JsonDataParser};

#[derive(Clone, Debug, Default, PartialEq)]
struct ItemConfig {
    item_id: i32,
    name: String,
    price: i64,
    stack_limit: i16,
    tradable: bool,
    drop_rate: f64,
    attribute_bonuses: BTreeMap<i64, i64>,
    shop_tabs: Vec<i64>,
    aliases: Vec<String>,
}

impl dataconfig_core::ConfigRecord for ItemConfig {
    fn schema() -> RecordSchema<Self> {
        RecordSchema::<Self>::builder("ItemConfig")
            .int32("itemId", |row, v| row.item_id = v)
            .primary_key()
            .text("name", |row, v| row.name = v)
            .int64("price", |row, v| row.price = v)
            .int16("stackLimit", |row, v| row.stack_limit = v)
            .boolean("tradable", |row, v| row.tradable = v)
            .float64("dropRate", |row, v| row.drop_rate = v)
            .map_int_int("attributeBonuses", |row, v| row.attribute_bonuses = v)
            .list_int("shopTabs", |row, v| row.shop_tabs = v)
            .list_text("aliases", |row, v| row.aliases = v)
            .build()
    }
}

const ITEM_TABLE: &str = r#"[
    {
        "itemId": 1001,
        "name": "iron sword",
        "price": "250.0",
        "stackLimit": 1,
        "tradable": "1",
        "dropRate": "0.05",
        "attributeBonuses": "{\"1\": 12, \"5\": 3}",
        "shopTabs": "[2, 7]",
        "aliases": ["sword", "blade"]
    },
    {
        "itemId": 1002,
        "name": "healing potion",
        "price": 40,
        "stackLimit": "99",
        "tradable": "true",
        "dropRate": "",
        "attributeBonuses": "",
        "shopTabs": [3],
        "aliases": []
    },
    {
        "itemId": 1003,
        "name": "quest scroll",
        "price": "",
        "tradable": "0"
    }
]"#;

#[test]
fn test_decodes_full_item_table() {
    let batch = JsonDataParser.parse::<ItemConfig>(ITEM_TABLE).unwrap();
    assert_eq!(batch.rows.len(), 3);

    let sword = &batch.rows[0];
    assert_eq!(sword.item_id, 1001);
    assert_eq!(sword.name, "iron sword");
    assert_eq!(sword.price, 250);
    assert_eq!(sword.stack_limit, 1);
    assert!(sword.tradable);
    assert_eq!(sword.drop_rate, 0.05);
    assert_eq!(sword.attribute_bonuses, BTreeMap::from([(1, 12), (5, 3)]));
    assert_eq!(sword.shop_tabs, [2, 7]);
    assert_eq!(sword.aliases, ["sword", "blade"]);

    let potion = &batch.rows[1];
    assert_eq!(potion.stack_limit, 99);
    assert!(potion.tradable);
    assert_eq!(potion.drop_rate, 0.0);
    assert!(potion.attribute_bonuses.is_empty());
    assert_eq!(potion.shop_tabs, [3]);
}

#[test]
fn test_sparse_record_keeps_defaults_with_diagnostics() {
    let batch = JsonDataParser.parse::<ItemConfig>(ITEM_TABLE).unwrap();

    let scroll = &batch.rows[2];
    assert_eq!(scroll.item_id, 1003);
    assert_eq!(scroll.price, 0);
    assert_eq!(scroll.stack_limit, 0);
    assert!(!scroll.tradable);
    assert!(scroll.aliases.is_empty());

    // stackLimit, dropRate, attributeBonuses, shopTabs, aliases are absent
    // from the third record only.
    assert_eq!(batch.diagnostics.count_of(DiagnosticKind::MissingField), 5);
    assert!(
        batch
            .diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::MissingField && d.record == Some(2))
    );
}

#[test]
fn test_bad_row_data_never_loses_the_row() {
    let text = r#"[
        {"itemId": "oops", "name": "broken", "price": "1.5"},
        {"itemId": 2, "name": "fine", "price": 10}
    ]"#;
    let batch = JsonDataParser.parse::<ItemConfig>(text).unwrap();

    let ids: Vec<_> = batch.rows.iter().map(|row| row.item_id).collect();
    assert_eq!(ids, [0, 2]);
    assert_eq!(batch.rows[0].name, "broken");
    assert_eq!(batch.rows[0].price, 1);
    assert_eq!(batch.diagnostics.count_of(DiagnosticKind::InvalidValue), 1);
}

#[test]
fn test_repeated_parse_is_deterministic() {
    let first = JsonDataParser.parse::<ItemConfig>(ITEM_TABLE).unwrap();
    let second = JsonDataParser.parse::<ItemConfig>(ITEM_TABLE).unwrap();
    assert_eq!(first.rows, second.rows);
    assert_eq!(first.diagnostics.len(), second.diagnostics.len());
}
