//! Integration tests for the atomic textfile writer.

use smart_textfile_collector::textfile::write_atomic;

#[tokio::test]
async fn test_write_then_read_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smart.prom");
    let body = "# TYPE smart_attr gauge\nsmart_attr{device=\"sda\"} 1\n";

    write_atomic(&path, body).await.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), body);
}

#[tokio::test]
async fn test_write_creates_nested_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prometheus/node-exporter/smart.prom");

    write_atomic(&path, "smart_attr 1\n").await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn test_overwrite_leaves_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smart.prom");

    write_atomic(&path, "cycle 1\n").await.unwrap();
    write_atomic(&path, "cycle 2\n").await.unwrap();

    // No .tmp residue: the rename must consume the temporary file.
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "cycle 2\n");
}

#[tokio::test]
async fn test_write_empty_contents() {
    // A cycle with no devices still truncates stale metrics away.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smart.prom");

    write_atomic(&path, "old 1\n").await.unwrap();
    write_atomic(&path, "").await.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}
