//! End-to-end bundle decoding: serialize an archive, gzip it, and read
//! it back through the public loader API.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use flate2::Compression;
use flate2::write::GzEncoder;

use runtar::tar::{BLOCK_SIZE, DEFAULT_PRIMARY_SUFFIX};
use runtar::{Bundle, BundleExtractor, LocalFileReader};

fn build_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut archive = Vec::new();
    for (name, content) in files {
        let mut header = [0u8; BLOCK_SIZE];
        header[..name.len()].copy_from_slice(name.as_bytes());
        let size = format!("{:011o}", content.len());
        header[124..135].copy_from_slice(size.as_bytes());
        archive.extend_from_slice(&header);
        archive.extend_from_slice(content);
        let pad = content.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE - content.len();
        archive.resize(archive.len() + pad, 0);
    }
    archive.resize(archive.len() + 2 * BLOCK_SIZE, 0);
    archive
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("runtar-test-{}-{name}", std::process::id()))
}

#[tokio::test]
async fn load_gzipped_bundle_from_disk() {
    let urdf = br#"<robot name="arm"><mesh filename="parts/arm.stl"/></robot>"#;
    let stl = b"solid arm\nendsolid arm\n";
    let payload = gzip(&build_archive(&[
        ("robot.urdf", urdf.as_slice()),
        ("parts/arm.stl", stl.as_slice()),
    ]));

    let path = temp_path("model.tgz");
    std::fs::write(&path, &payload).unwrap();

    let reader = Arc::new(LocalFileReader::new(&path).unwrap());
    let extractor = BundleExtractor::new(reader);
    let bundle = extractor.load().await.unwrap();

    let entries = bundle.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "robot.urdf");
    assert_eq!(entries[0].content, urdf);
    assert_eq!(entries[1].name, "parts/arm.stl");
    assert_eq!(entries[1].content, stl);

    // The consumer pattern: find the URDF, then resolve its mesh reference
    let primary = bundle.primary(DEFAULT_PRIMARY_SUFFIX).unwrap();
    let text = primary.text().unwrap();
    assert!(text.contains("parts/arm.stl"));
    assert_eq!(bundle.resolve("parts/arm.stl").unwrap().content, stl);

    // Loading the same payload again yields a value-equal bundle
    let again = extractor.load().await.unwrap();
    assert_eq!(bundle, again);

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn missing_local_file_fails_early() {
    assert!(LocalFileReader::new(&temp_path("does-not-exist.tgz")).is_err());
}

#[tokio::test]
async fn extract_entry_to_disk() {
    let payload = build_archive(&[("parts/arm.stl", b"solid arm".as_slice())]);
    let bundle = Bundle::from_bytes(&payload).unwrap();

    let dir = temp_path("extract");
    let output = dir.join("parts/arm.stl");
    bundle.entries()[0].write_to(&output).await.unwrap();

    assert_eq!(std::fs::read(&output).unwrap(), b"solid arm");
    std::fs::remove_dir_all(&dir).unwrap();
}
