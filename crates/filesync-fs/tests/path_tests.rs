use filesync_fs::CanonicalPath;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_existing_file_resolves_to_canonical() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("a.txt");
    fs::write(&file, "x").unwrap();

    let resolved = CanonicalPath::resolve(&file).unwrap();

    assert_eq!(resolved.as_path(), dunce::canonicalize(&file).unwrap());
    assert!(resolved.as_path().is_absolute());
}

#[test]
fn test_dot_segments_collapse_to_same_key() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("dir")).unwrap();
    fs::write(temp.path().join("a.txt"), "x").unwrap();

    let direct = CanonicalPath::resolve(temp.path().join("a.txt")).unwrap();
    let dotted = CanonicalPath::resolve(temp.path().join("dir/.././a.txt")).unwrap();

    assert_eq!(direct, dotted);
    assert_eq!(direct.as_key(), dotted.as_key());
}

#[test]
fn test_missing_path_resolves_through_existing_ancestor() {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap();

    let resolved = CanonicalPath::resolve(temp.path().join("out/./nested/../a.txt")).unwrap();

    assert_eq!(resolved.as_path(), root.join("out").join("a.txt"));
    assert!(!resolved.exists());
}

#[test]
fn test_from_canonical_keeps_key() {
    let path = CanonicalPath::from_canonical("/abs/a.txt");
    assert_eq!(path.as_key(), "/abs/a.txt");
    assert_eq!(path.file_name(), Some("a.txt"));
}

#[cfg(unix)]
#[test]
fn test_symlink_resolves_to_target() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("target.txt");
    let link = temp.path().join("link.txt");
    fs::write(&target, "x").unwrap();
    std::os::unix::fs::symlink(&target, &link).unwrap();

    assert_eq!(
        CanonicalPath::resolve(&link).unwrap(),
        CanonicalPath::resolve(&target).unwrap()
    );
}

#[cfg(unix)]
#[test]
fn test_missing_path_parent_dir_follows_symlink() {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap();
    fs::create_dir_all(root.join("real/sub")).unwrap();
    std::os::unix::fs::symlink(root.join("real/sub"), root.join("link")).unwrap();

    let resolved = CanonicalPath::resolve(root.join("link/../out.txt")).unwrap();

    assert_eq!(resolved.as_path(), root.join("real").join("out.txt"));

    fs::write(root.join("real/out.txt"), "x").unwrap();
    assert_eq!(
        CanonicalPath::resolve(root.join("link/../out.txt")).unwrap(),
        resolved
    );
}
