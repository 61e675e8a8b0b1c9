use super::*;
use crate::schema::{ColorRow, InventoryPartRow, PartRelationshipRow};

fn s(v: &str) -> Option<String> {
    Some(v.to_string())
}

fn set(set_num: &str, theme_id: Option<i64>, num_parts: i64) -> SetRow {
    SetRow {
        set_num: set_num.into(),
        name: s(&format!("Set {}", set_num)),
        year: Some(2017),
        theme_id,
        num_parts: Some(num_parts),
        img_url: s(&format!("https://img/{}.jpg", set_num)),
    }
}

fn theme(id: i64, name: &str) -> ThemeRow {
    ThemeRow { id, name: s(name) }
}

fn color(id: i64, name: &str) -> ColorRow {
    ColorRow {
        id,
        name: s(name),
        rgb: s("05131D"),
        is_trans: s("False"),
        num_parts: Some(10),
        num_sets: Some(2),
        y1: s("1957"),
        y2: s("2024"),
    }
}

fn part(part_num: &str, cat: i64) -> PartRow {
    PartRow {
        part_num: part_num.into(),
        name: s(&format!("Part {}", part_num)),
        part_cat_id: Some(cat),
        part_material: s("Plastic"),
    }
}

fn category(id: i64, name: &str) -> PartCategoryRow {
    PartCategoryRow { id, name: s(name) }
}

fn inventory(id: i64, set_num: &str) -> InventoryRow {
    InventoryRow {
        id,
        version: Some(1),
        set_num: s(set_num),
    }
}

fn inventory_part(inventory_id: Option<i64>, part_num: &str, color_id: i64) -> InventoryPartRow {
    InventoryPartRow {
        inventory_id,
        part_num: part_num.into(),
        color_id: Some(color_id),
        quantity: Some(4),
        is_spare: s("False"),
        img_url: None,
    }
}

fn inventory_minifig(id: Option<i64>, fig_num: &str, quantity: i64) -> InventoryMinifigRow {
    InventoryMinifigRow {
        inventory_id: id,
        fig_num: fig_num.into(),
        quantity: Some(quantity),
        set_url: None,
        last_modified_dt: None,
    }
}

fn inventory_set(inventory_id: Option<i64>, set_num: &str, quantity: i64) -> InventorySetRow {
    InventorySetRow {
        inventory_id,
        set_num: set_num.into(),
        quantity: Some(quantity),
    }
}

fn rel(parent: &str, code: &str) -> PartRelationshipRow {
    PartRelationshipRow {
        rel_type: code.into(),
        child_part_num: "x".into(),
        parent_part_num: parent.into(),
    }
}

fn staged() -> StagedTables {
    StagedTables {
        inventory_parts: vec![
            inventory_part(Some(1), "3001", 0),
            inventory_part(Some(1), "3001", 4),
            inventory_part(Some(2), "3626", 0),
            inventory_part(Some(2), "ghost", 0),
        ],
        part_relationships: vec![rel("3626", "P"), rel("3626", "P"), rel("3626", "M")],
        colors: vec![color(0, "Black"), color(4, "Red"), color(0, "Black (dup)")],
        parts: vec![part("3001", 11), part("3626", 59)],
        part_categories: vec![category(11, "Bricks"), category(59, "Minifig Heads")],
        sets: vec![set("10255-1", Some(155), 4002), set("75911-1", Some(999), 406)],
        themes: vec![theme(155, "Modular Buildings")],
        inventories: vec![
            inventory(1, "10255-1"),
            inventory(2, "75911-1"),
            inventory(3, "missing-1"),
        ],
        inventory_minifigs: vec![
            inventory_minifig(Some(1), "fig-000001", 2),
            inventory_minifig(Some(2), "fig-404", 1),
        ],
        minifigs: vec![MinifigRow {
            set_num: "fig-000001".into(),
            name: s("Toy Store Employee"),
            set_url: s("https://rebrickable.com/minifigs/fig-000001/"),
            last_modified_dt: s("2023-10-18T20:55:41.123456Z"),
        }],
        inventory_sets: vec![
            inventory_set(Some(1), "75911-1", 1),
            inventory_set(Some(3), "nope-1", 2),
        ],
    }
}

#[test]
fn test_dimension_sets_is_a_relabeled_projection() {
    let model = DimensionalModel::build(&staged()).unwrap();
    assert_eq!(model.dimension_sets.len(), 2);
    assert_eq!(
        model.dimension_sets[0],
        DimSet {
            set_num: "10255-1".into(),
            set_name: s("Set 10255-1"),
            year: Some(2017),
            theme_id: Some(155),
            num_parts: Some(4002),
            image_url: s("https://img/10255-1.jpg"),
        }
    );
}

#[test]
fn test_colors_dedupe_on_id_keeping_first() {
    let model = DimensionalModel::build(&staged()).unwrap();
    let colors: Vec<(i64, Option<&str>)> = model
        .dimension_colors
        .iter()
        .map(|c| (c.color_id, c.color_name.as_deref()))
        .collect();
    assert_eq!(colors, vec![(0, Some("Black")), (4, Some("Red"))]);
}

#[test]
fn test_parts_dimension_has_no_duplicate_rows() {
    let model = DimensionalModel::build(&staged()).unwrap();
    // 3001 appears twice in inventory parts (two colors) but once here
    let numbers: Vec<&str> = model
        .dimension_parts
        .iter()
        .map(|p| p.part_number.as_str())
        .collect();
    assert_eq!(numbers, vec!["3001", "3626", "ghost"]);
}

#[test]
fn test_parts_dimension_carries_relationship_summary() {
    let model = DimensionalModel::build(&staged()).unwrap();
    let head = &model.dimension_parts[1];
    assert_eq!(head.part_category_name.as_deref(), Some("Minifig Heads"));
    assert_eq!(head.relationship_type.as_deref(), Some("P, M"));
    assert_eq!(head.relationship_type_desc.as_deref(), Some("Print, Mold"));
    assert_eq!(model.dimension_parts[0].relationship_type, None);
}

#[test]
fn test_unknown_part_keeps_row_with_nulls() {
    let model = DimensionalModel::build(&staged()).unwrap();

    assert_eq!(model.ft_inv_parts.len(), 4);
    let ghost = model
        .dimension_parts
        .iter()
        .find(|p| p.part_number == "ghost")
        .unwrap();
    assert_eq!(ghost.part_name, None);
    assert_eq!(ghost.part_category_id, None);
    assert_eq!(ghost.part_category_name, None);
    assert_eq!(ghost.part_material, None);
}

#[test]
fn test_inventory_parts_fact_preserves_rows_in_order() {
    let model = DimensionalModel::build(&staged()).unwrap();
    let keys: Vec<(Option<i64>, &str, Option<i64>)> = model
        .ft_inv_parts
        .iter()
        .map(|f| (f.inventory_id, f.part_num_id.as_str(), f.color_id))
        .collect();
    assert_eq!(
        keys,
        vec![
            (Some(1), "3001", Some(0)),
            (Some(1), "3001", Some(4)),
            (Some(2), "3626", Some(0)),
            (Some(2), "ghost", Some(0)),
        ]
    );
}

#[test]
fn test_duplicate_right_keys_do_not_multiply_rows() {
    let mut tables = staged();
    tables.parts.push(part("3001", 59));
    tables.part_categories.push(category(11, "Other"));

    let model = DimensionalModel::build(&tables).unwrap();

    assert_eq!(model.ft_inv_parts.len(), 4);
    assert_eq!(model.dimension_parts[0].part_category_id, Some(11));
    assert_eq!(
        model.dimension_parts[0].part_category_name.as_deref(),
        Some("Bricks")
    );
}

#[test]
fn test_null_inventory_ids_keep_their_rows() {
    let mut tables = staged();
    tables.inventory_parts.push(inventory_part(None, "3626", 4));
    tables.inventory_minifigs.push(inventory_minifig(None, "fig-000001", 3));
    tables.inventory_sets.push(inventory_set(None, "10255-1", 1));

    let model = DimensionalModel::build(&tables).unwrap();

    assert_eq!(model.ft_inv_parts.len(), 5);
    let row = &model.ft_inv_parts[4];
    assert_eq!(row.inventory_id, None);
    assert_eq!(row.part_num_id, "3626");

    assert_eq!(model.ft_inv_minifigs.len(), 3);
    assert_eq!(
        model.ft_inv_minifigs[2],
        FactInventoryMinifig {
            inventory_id: None,
            fig_num: "fig-000001".into(),
            quantity: Some(3),
            set_num: s("fig-000001"),
            set_url: s("https://rebrickable.com/minifigs/fig-000001/"),
            last_modified: s("2023-10-18 20:55:41.123456"),
        }
    );

    assert_eq!(model.ft_inv_sets.len(), 3);
    assert_eq!(
        model.ft_inv_sets[2],
        FactInventorySet {
            inventory_id: None,
            setnum: "10255-1".into(),
            num_parts: Some(4002),
            set_img_url: s("https://img/10255-1.jpg"),
            quantity: Some(1),
        }
    );
}

#[test]
fn test_null_inventory_id_with_unknown_keys_has_null_enrichment() {
    let mut tables = staged();
    tables.inventory_minifigs.push(inventory_minifig(None, "fig-404", 1));
    tables.inventory_sets.push(inventory_set(None, "nope-1", 1));

    let model = DimensionalModel::build(&tables).unwrap();

    let minifig = model.ft_inv_minifigs.last().unwrap();
    assert_eq!(minifig.inventory_id, None);
    assert_eq!(minifig.set_num, None);
    assert_eq!(minifig.set_url, None);
    assert_eq!(minifig.last_modified, None);

    let set = model.ft_inv_sets.last().unwrap();
    assert_eq!(set.inventory_id, None);
    assert_eq!(set.num_parts, None);
    assert_eq!(set.set_img_url, None);
}

#[test]
fn test_minifig_fact_takes_url_and_timestamp_from_minifig() {
    let model = DimensionalModel::build(&staged()).unwrap();
    assert_eq!(
        model.ft_inv_minifigs[0],
        FactInventoryMinifig {
            inventory_id: Some(1),
            fig_num: "fig-000001".into(),
            quantity: Some(2),
            set_num: s("fig-000001"),
            set_url: s("https://rebrickable.com/minifigs/fig-000001/"),
            last_modified: s("2023-10-18 20:55:41.123456"),
        }
    );
}

#[test]
fn test_unmatched_minifig_has_null_columns() {
    let model = DimensionalModel::build(&staged()).unwrap();
    let unmatched = &model.ft_inv_minifigs[1];
    assert_eq!(unmatched.fig_num, "fig-404");
    assert_eq!(unmatched.set_num, None);
    assert_eq!(unmatched.set_url, None);
    assert_eq!(unmatched.last_modified, None);
}

#[test]
fn test_inventory_row_values_override_minifig() {
    let mut tables = staged();
    tables.inventory_minifigs[0].set_url = s("https://example.test/own");
    tables.inventory_minifigs[0].last_modified_dt = s("2020-01-02 03:04:05");

    let model = DimensionalModel::build(&tables).unwrap();

    assert_eq!(
        model.ft_inv_minifigs[0].set_url.as_deref(),
        Some("https://example.test/own")
    );
    assert_eq!(
        model.ft_inv_minifigs[0].last_modified.as_deref(),
        Some("2020-01-02 03:04:05")
    );
}

#[test]
fn test_bad_timestamp_is_fatal() {
    let mut tables = staged();
    tables.minifigs[0].last_modified_dt = s("yesterday");

    let err = DimensionalModel::build(&tables).unwrap_err();

    assert!(matches!(err, TransformError::InvalidValue { .. }));
    assert!(err.to_string().contains("yesterday"));
}

#[test]
fn test_set_fact_uses_metadata_of_its_own_set() {
    let model = DimensionalModel::build(&staged()).unwrap();
    assert_eq!(
        model.ft_inv_sets,
        vec![
            FactInventorySet {
                inventory_id: Some(1),
                setnum: "75911-1".into(),
                num_parts: Some(406),
                set_img_url: s("https://img/75911-1.jpg"),
                quantity: Some(1),
            },
            FactInventorySet {
                inventory_id: Some(3),
                setnum: "nope-1".into(),
                num_parts: None,
                set_img_url: None,
                quantity: Some(2),
            },
        ]
    );
}

#[test]
fn test_catalog_resolves_themes() {
    let tables = staged();
    let catalog = SetCatalog::build(&tables.sets, &tables.themes);

    let modular = catalog.get("10255-1").unwrap();
    assert_eq!(
        modular.theme.and_then(|t| t.name.as_deref()),
        Some("Modular Buildings")
    );
    assert!(catalog.get("75911-1").unwrap().theme.is_none());
    assert!(catalog.get("missing-1").is_none());
}

#[test]
fn test_inventory_view_left_joins_sets_and_themes() {
    let tables = staged();

    let view = InventoryView::build(&tables.inventories, &tables.sets, &tables.themes);

    let first = view.inventory(Some(1)).unwrap();
    let entry = first.catalog.unwrap();
    assert_eq!(entry.set.set_num, "10255-1");
    assert_eq!(
        entry.theme.and_then(|t| t.name.as_deref()),
        Some("Modular Buildings")
    );

    let orphan = view.inventory(Some(3)).unwrap();
    assert!(orphan.catalog.is_none());
    assert_eq!(orphan.inventory.set_num.as_deref(), Some("missing-1"));

    assert!(view.inventory(Some(42)).is_none());
    assert!(view.inventory(None).is_none());
    assert_eq!(view.set("75911-1").map(|e| e.set.num_parts), Some(Some(406)));
}

#[test]
fn test_build_is_deterministic() {
    let tables = staged();
    assert_eq!(
        DimensionalModel::build(&tables).unwrap(),
        DimensionalModel::build(&tables).unwrap()
    );
}

#[test]
fn test_empty_inputs_give_empty_model() {
    let model = DimensionalModel::build(&StagedTables::default()).unwrap();
    assert_eq!(model, DimensionalModel::default());
}
