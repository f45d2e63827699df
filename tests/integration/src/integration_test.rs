//! End-to-end scenarios across the filesync crates
//!
//! These drive the engine the way a user session would: register, edit,
//! refresh, sync, inspect the registry document on disk.

use filesync_core::{CopyStatus, Error, SyncConfig, SyncEngine};
use filesync_fs::{CanonicalPath, compute_content_checksum, compute_file_checksum};
use filesync_test_utils::TestTree;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn engine(tree: &TestTree) -> SyncEngine {
    SyncEngine::new(SyncConfig::new(tree.registry_path())).unwrap()
}

fn key(tree: &TestTree, rel: &str) -> String {
    CanonicalPath::resolve(tree.path(rel)).unwrap().as_key()
}

fn document(tree: &TestTree) -> Value {
    serde_json::from_str(&tree.read("state/synclist.json")).unwrap()
}

#[test]
fn scenario_register_and_sync_single_copy() {
    let tree = TestTree::new();
    let engine = engine(&tree);
    tree.write("a.txt", "X");

    engine.add(tree.path("a.txt"), &[tree.path("out/a.txt")]).unwrap();
    assert_eq!(
        document(&tree),
        json!({
            key(&tree, "a.txt"): {
                "hash": compute_content_checksum(b"X").as_str(),
                "copies": { key(&tree, "out/a.txt"): { "hash": null } }
            }
        })
    );

    engine.sync(tree.path("a.txt")).unwrap();

    tree.assert_file_eq("out/a.txt", "X");
    assert_eq!(
        engine
            .get_copy_status(tree.path("a.txt"), tree.path("out/a.txt"))
            .unwrap(),
        CopyStatus::Same
    );
    assert_eq!(
        document(&tree)[key(&tree, "a.txt")]["copies"][key(&tree, "out/a.txt")]["hash"],
        json!(compute_content_checksum(b"X").as_str())
    );
}

#[test]
fn scenario_fan_out_to_many_copies() {
    let tree = TestTree::new();
    let engine = engine(&tree);
    tree.write("dotfiles/bashrc", "export EDITOR=vi\n");
    tree.write("backup/bashrc", "stale");

    engine
        .add(
            tree.path("dotfiles/bashrc"),
            &[
                tree.path("backup/bashrc"),
                tree.path("usb/bashrc"),
                tree.path("cloud/home/bashrc"),
            ],
        )
        .unwrap();
    let report = engine.sync(tree.path("dotfiles/bashrc")).unwrap();

    assert_eq!(report.copied.len(), 3);
    let origin_digest = compute_file_checksum(&tree.path("dotfiles/bashrc")).unwrap();
    for copy in ["backup/bashrc", "usb/bashrc", "cloud/home/bashrc"] {
        assert_eq!(compute_file_checksum(&tree.path(copy)).unwrap(), origin_digest);
    }
}

#[test]
fn scenario_engines_share_state_through_document() {
    let tree = TestTree::new();
    tree.write("a.txt", "X");

    engine(&tree).add(tree.path("a.txt"), &[tree.path("b.txt")]).unwrap();

    let reopened = engine(&tree);
    assert_eq!(
        reopened.get_copies(tree.path("a.txt")).unwrap(),
        vec![CanonicalPath::resolve(tree.path("b.txt")).unwrap()]
    );
    reopened.sync_all().unwrap();
    tree.assert_file_eq("b.txt", "X");
}

#[test]
fn scenario_copy_drift_is_repaired_by_sync_all() {
    let tree = TestTree::new();
    let engine = engine(&tree);
    tree.write("a.txt", "X");
    engine.add(tree.path("a.txt"), &[tree.path("b.txt")]).unwrap();
    engine.sync_all().unwrap();

    tree.write("b.txt", "edited by hand");
    assert_eq!(
        engine.get_copy_status(tree.path("a.txt"), tree.path("b.txt")).unwrap(),
        CopyStatus::Different
    );
    // Stored digests only learn about the drift on refresh
    assert!(engine.compare_digests(tree.path("a.txt"), tree.path("b.txt")).unwrap());

    engine.sync_all().unwrap();

    tree.assert_file_eq("b.txt", "X");
    assert!(engine.compare_digests(tree.path("a.txt"), tree.path("b.txt")).unwrap());
}

#[test]
fn scenario_delete_then_reregister() {
    let tree = TestTree::new();
    let engine = engine(&tree);
    tree.write("a.txt", "X");
    engine.add(tree.path("a.txt"), &[tree.path("b.txt")]).unwrap();

    let none: &[&str] = &[];
    engine.delete(tree.path("a.txt"), none).unwrap();
    assert_eq!(document(&tree), json!({}));
    assert!(matches!(
        engine.get_copies(tree.path("a.txt")),
        Err(Error::OriginNotFound { .. })
    ));

    engine.add(tree.path("a.txt"), &[tree.path("c.txt")]).unwrap();
    assert_eq!(
        engine.get_copies(tree.path("a.txt")).unwrap(),
        vec![CanonicalPath::resolve(tree.path("c.txt")).unwrap()]
    );
}

#[test]
fn scenario_registry_written_atomically() {
    let tree = TestTree::new();
    let engine = engine(&tree);
    tree.write("a.txt", "X");
    engine.add(tree.path("a.txt"), &[tree.path("b.txt")]).unwrap();
    engine.sync_all().unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(tree.path("state"))
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name != "synclist.json" && name != "synclist.json.lock")
        .collect();
    assert!(leftovers.is_empty(), "unexpected files: {:?}", leftovers);
}
