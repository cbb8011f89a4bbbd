use quiz_check::restock::{InventoryItem, load_inventory, plan_restock};

fn item(name: &str, stock: f64, sales: f64) -> InventoryItem {
    InventoryItem {
        item: name.into(),
        stock,
        sales,
    }
}

#[test]
fn flags_items_below_twice_sales() {
    let plan = plan_restock(
        &[
            item("apples", 5.0, 3.0),
            item("pears", 6.0, 3.0),
            item("figs", 0.0, 0.0),
            item("returns", -2.0, 1.5),
        ],
        2.0,
    );
    assert!(plan[0].restock);
    assert_eq!(plan[0].recommended_order, 1.0);
    assert!(!plan[1].restock);
    assert_eq!(plan[1].recommended_order, 0.0);
    assert!(!plan[2].restock);
    assert!(plan[3].restock);
    assert_eq!(plan[3].recommended_order, 5.0);
}

#[test]
fn missing_or_invalid_inventory_is_empty() {
    let dir = std::env::temp_dir().join(format!("quiz-check-restock-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let bad = dir.join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();

    assert!(load_inventory(&dir.join("absent.json")).is_empty());
    assert!(load_inventory(&bad).is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn fractional_stock_loads_and_bad_items_are_skipped() {
    let dir = std::env::temp_dir().join(format!("quiz-check-items-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("inventory.json");
    std::fs::write(
        &path,
        r#"[
            {"item": "a", "stock": 2.5, "sales": 4},
            {"item": "b", "stock": "lots", "sales": 1},
            {"item": "c", "stock": 10, "sales": 1}
        ]"#,
    )
    .unwrap();

    assert_eq!(
        load_inventory(&path),
        vec![item("a", 2.5, 4.0), item("c", 10.0, 1.0)]
    );

    let _ = std::fs::remove_dir_all(&dir);
}
