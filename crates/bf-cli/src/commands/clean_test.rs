use super::*;
use std::fs::File;
use std::path::Path;
use tempfile::tempdir;

fn global_for(project: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: project.to_path_buf(),
        config: None,
        staging_root: None,
        transformed_root: None,
    }
}

fn seed_data_dirs(project: &Path) {
    let raw = project.join("data/raw/parts_tbl");
    let transformed = project.join("data/transformed");
    fs::create_dir_all(&raw).unwrap();
    fs::create_dir_all(&transformed).unwrap();
    File::create(raw.join("colors.csv")).unwrap();
    File::create(transformed.join("dimension_colors.csv")).unwrap();
}

#[tokio::test]
async fn test_clean_removes_staging_and_transformed() {
    let temp_dir = tempdir().unwrap();
    let project = temp_dir.path();
    seed_data_dirs(project);

    execute(&CleanArgs { dry_run: false }, &global_for(project))
        .await
        .unwrap();

    assert!(!project.join("data/raw").exists());
    assert!(!project.join("data/transformed").exists());
}

#[tokio::test]
async fn test_clean_dry_run_does_not_remove() {
    let temp_dir = tempdir().unwrap();
    let project = temp_dir.path();
    seed_data_dirs(project);

    execute(&CleanArgs { dry_run: true }, &global_for(project))
        .await
        .unwrap();

    assert!(project.join("data/raw/parts_tbl/colors.csv").exists());
    assert!(project.join("data/transformed").exists());
}

#[tokio::test]
async fn test_clean_handles_missing_directory() {
    let temp_dir = tempdir().unwrap();
    let project = temp_dir.path();

    let result = execute(&CleanArgs { dry_run: false }, &global_for(project)).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_clean_honors_configured_roots() {
    let temp_dir = tempdir().unwrap();
    let project = temp_dir.path();
    fs::write(
        project.join("brickflow.yml"),
        "storage:\n  staging_root: staging\n  transformed_root: out\n",
    )
    .unwrap();
    fs::create_dir_all(project.join("staging")).unwrap();
    fs::create_dir_all(project.join("out")).unwrap();
    fs::create_dir_all(project.join("data/raw")).unwrap();

    execute(&CleanArgs { dry_run: false }, &global_for(project))
        .await
        .unwrap();

    assert!(!project.join("staging").exists());
    assert!(!project.join("out").exists());
    assert!(project.join("data/raw").exists());
}
