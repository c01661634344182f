use std::fs;
use std::path::Path;

use delve_core::{
    BattleTemplate, GridPos, LevelConfig, LevelGenerator, RoomTemplate, TemplateCatalog,
    TemplateError,
};
use tempfile::tempdir;

fn write_pack(root: &Path) {
    let rooms = root.join("rooms");
    let battles = root.join("battles");
    fs::create_dir_all(&battles).expect("battle dir");

    RoomTemplate::blank(11, 11)
        .with_object("lever", 5, 8)
        .save(&rooms.join("start.json"))
        .expect("save start");
    RoomTemplate::blank(12, 9)
        .with_tile(1, 4, 4, "walls", 2)
        .save(&rooms.join("cell.json"))
        .expect("save cell");
    RoomTemplate::blank(30, 12).save(&rooms.join("cathedral.json")).expect("save oversized");
    fs::write(rooms.join("README.txt"), "editor notes").expect("stray file");

    fs::write(battles.join("duel.json"), r#"{"waves": [{"knight": 1}, {"slime": 2}]}"#)
        .expect("battle json");
}

#[test]
fn loads_rooms_and_battles_by_file_stem() {
    let dir = tempdir().expect("tempdir");
    write_pack(dir.path());

    let catalog =
        TemplateCatalog::load_dirs(&dir.path().join("rooms"), &dir.path().join("battles"), 21)
            .expect("pack loads");

    assert_eq!(catalog.room_count(), 2, "oversized and non-JSON files are skipped");
    assert!(catalog.room("cathedral").is_none());
    assert_eq!(catalog.room("cell").map(|room| (room.rows, room.cols)), Some((12, 9)));
    assert_eq!(
        catalog.battle("duel"),
        Some(&BattleTemplate::from_waves(&[&[("knight", 1)], &[("slime", 2)]]))
    );
}

#[test]
fn generated_level_uses_only_loaded_templates() {
    let dir = tempdir().expect("tempdir");
    write_pack(dir.path());
    let catalog =
        TemplateCatalog::load_dirs(&dir.path().join("rooms"), &dir.path().join("battles"), 21)
            .expect("pack loads");

    let level = LevelGenerator::new(64, LevelConfig::default(), &catalog)
        .generate()
        .expect("generates from disk pack");

    for room in level.rooms() {
        if room.grid_pos == GridPos::ORIGIN {
            assert_eq!(room.name, "start");
            assert_eq!(room.objects().len(), 1);
        } else {
            assert_eq!(room.name, "cell");
            assert_eq!(room.battle().map(|battle| battle.waves().len()), Some(2));
        }
    }
}

#[test]
fn missing_directory_reports_its_path() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("nowhere");

    let err = TemplateCatalog::load_dirs(&missing, &missing, 21).expect_err("no such dir");
    assert!(matches!(err, TemplateError::Io { ref path, .. } if path == &missing));
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn malformed_battle_is_an_error() {
    let dir = tempdir().expect("tempdir");
    write_pack(dir.path());
    fs::write(dir.path().join("battles").join("broken.json"), "{\"waves\": 3}").expect("write");

    let err = TemplateCatalog::load_dirs(&dir.path().join("rooms"), &dir.path().join("battles"), 21)
        .expect_err("waves must be a list");
    assert!(matches!(err, TemplateError::Json { .. }));
}
