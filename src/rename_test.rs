use crate::common::DrScore;
use crate::rename::*;
use crate::testing;
use std::fs;

#[test]
fn test_dr_folder_name() {
    assert_eq!(dr_folder_name("Artist - Album (2001)", DrScore(8)), Some("Artist - Album (2001) (DR 8)".to_string()));
    assert_eq!(dr_folder_name("Artist - Album (DR 8)", DrScore(8)), None);
    assert_eq!(dr_folder_name("Artist - Album (DR 12) [FLAC]", DrScore(8)), None);
    assert_eq!(dr_folder_name("Artist - Album DR 8", DrScore(8)), Some("Artist - Album DR 8 (DR 8)".to_string()));
}

#[test]
fn test_free_path() {
    let temp_dir = testing::init();
    let target = temp_dir.path().join("foo_dr_processed.txt");
    assert_eq!(free_path(&target), target);

    fs::write(&target, "").unwrap();
    assert_eq!(free_path(&target), temp_dir.path().join("foo_dr_processed_1.txt"));

    fs::write(temp_dir.path().join("foo_dr_processed_1.txt"), "").unwrap();
    assert_eq!(free_path(&target), temp_dir.path().join("foo_dr_processed_2.txt"));
}

#[test]
fn test_safe_rename_avoids_collision() {
    let temp_dir = testing::init();
    let old = temp_dir.path().join("a.txt");
    let new = temp_dir.path().join("b.txt");
    fs::write(&old, "old").unwrap();
    fs::write(&new, "taken").unwrap();

    let landed = safe_rename(&old, &new).unwrap();
    assert_eq!(landed, temp_dir.path().join("b_1.txt"));
    assert_eq!(fs::read_to_string(&new).unwrap(), "taken");
    assert_eq!(fs::read_to_string(&landed).unwrap(), "old");
    assert!(!old.exists());
}

#[test]
fn test_safe_rename_missing_source() {
    let temp_dir = testing::init();
    assert!(safe_rename(&temp_dir.path().join("nope"), &temp_dir.path().join("other")).is_err());
}

#[test]
fn test_rename_release_folder() {
    let temp_dir = testing::init();
    let dir = temp_dir.path().join("Album");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("01.flac"), "").unwrap();

    let renamed = rename_release_folder(&dir, DrScore(9)).unwrap();
    assert_eq!(renamed, temp_dir.path().join("Album (DR 9)"));
    assert!(renamed.join("01.flac").exists());
    assert!(!dir.exists());

    // Already carries a score.
    let again = rename_release_folder(&renamed, DrScore(10)).unwrap();
    assert_eq!(again, renamed);
    assert!(renamed.exists());
}
