use super::*;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_read_rows_with_nulls_and_extra_columns() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "colors.csv",
        "id,name,rgb,is_trans,num_parts,num_sets,y1,y2,extra\n\
         0,Black,05131D,False,1000,200,1957,2024,x\n\
         9999,[No Color],,False,,,,,\n",
    );

    let rows: Vec<ColorRow> = read_rows(&path).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, 0);
    assert_eq!(rows[0].name.as_deref(), Some("Black"));
    assert_eq!(rows[0].num_parts, Some(1000));
    assert_eq!(rows[1].rgb, None);
    assert_eq!(rows[1].y1, None);
}

#[test]
fn test_missing_column_names_table_and_column() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "parts.csv",
        "part_num,name,part_material\n3001,Brick 2 x 4,Plastic\n",
    );

    let err = read_rows::<PartRow>(&path).unwrap_err();

    match err {
        TransformError::MissingColumn { table, column } => {
            assert_eq!(table, "parts_tbl_parts");
            assert_eq!(column, "part_cat_id");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_column_checked_before_rows() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "themes.csv", "id\n");
    assert!(matches!(
        read_rows::<ThemeRow>(&path),
        Err(TransformError::MissingColumn { .. })
    ));
}

#[test]
fn test_bad_integer_is_invalid_value() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "themes.csv", "id,name,parent_id\nabc,Technic,\n");

    let err = read_rows::<ThemeRow>(&path).unwrap_err();

    assert!(
        matches!(err, TransformError::InvalidValue { ref table, .. } if table == "sets_tbl_themes")
    );
    assert!(err.to_string().contains("row 1"));
}

#[test]
fn test_optional_minifig_columns() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "minifigs.csv", "set_num,num_parts\nfig-000001,4\n");

    let rows: Vec<MinifigRow> = read_rows(&path).unwrap();

    assert_eq!(rows[0].set_num, "fig-000001");
    assert_eq!(rows[0].name, None);
    assert_eq!(rows[0].set_url, None);
    assert_eq!(rows[0].last_modified_dt, None);
}

#[test]
fn test_inventory_minifig_without_url_columns() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "inventory_minifigs.csv",
        "inventory_id,fig_num,quantity\n3,fig-000001,2\n",
    );

    let rows: Vec<InventoryMinifigRow> = read_rows(&path).unwrap();

    assert_eq!(rows[0].inventory_id, Some(3));
    assert_eq!(rows[0].quantity, Some(2));
    assert!(rows[0].set_url.is_none());
}

#[test]
fn test_blank_inventory_id_reads_as_null() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "inventory_parts.csv",
        "inventory_id,part_num,color_id,quantity,is_spare,img_url\n\
         1,3001,4,2,False,\n\
         ,3002,0,1,False,\n",
    );

    let rows: Vec<InventoryPartRow> = read_rows(&path).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].inventory_id, Some(1));
    assert_eq!(rows[1].inventory_id, None);
    assert_eq!(rows[1].part_num, "3002");
}

#[test]
fn test_load_requires_every_artifact() {
    let temp = TempDir::new().unwrap();
    let artifacts = StagedArtifacts::discover(temp.path()).unwrap();
    assert!(matches!(
        StagedTables::load(&artifacts),
        Err(TransformError::MissingArtifacts(keys)) if keys.len() == 11
    ));
}
