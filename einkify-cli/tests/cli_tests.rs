//! Integration tests for the einkify CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Encode a solid-colour PNG page
fn png_page(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png)
        .expect("Failed to encode test image");
    bytes.into_inner()
}

/// Create a small comic archive with three pages
fn create_test_cbz(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    let file = fs::File::create(&path).expect("Failed to create test archive");
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for (entry, (w, h)) in [("001.png", (40, 60)), ("002.png", (30, 30)), ("003.png", (60, 40))] {
        zip.start_file(entry, options).unwrap();
        zip.write_all(&png_page(w, h)).unwrap();
    }
    zip.finish().unwrap();
    path
}

fn einkify() -> Command {
    Command::cargo_bin("einkify").unwrap()
}

fn read_entry(package: &Path, name: &str) -> String {
    let file = fs::File::open(package).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut text = String::new();
    std::io::Read::read_to_string(&mut entry, &mut text).unwrap();
    text
}

#[test]
fn test_help() {
    einkify()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("batch"));
}

#[test]
fn test_version() {
    einkify()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("einkify"));
}

#[test]
fn test_convert_help() {
    einkify()
        .args(["convert", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Convert a comic archive"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--profile"))
        .stdout(predicate::str::contains("--manga"));
}

#[test]
fn test_batch_help() {
    einkify()
        .args(["batch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Batch convert"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--jobs"));
}

#[test]
fn test_convert_missing_input() {
    einkify()
        .arg("convert")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_convert_nonexistent_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("output.epub");

    einkify()
        .args(["convert", "/nonexistent/file.cbz", "--output"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));

    assert!(!output.exists());
}

#[test]
fn test_convert_unsupported_extension() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("notes.txt");
    fs::write(&input, "not a comic").unwrap();

    einkify()
        .arg("convert")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to convert"));
}

#[test]
fn test_convert_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_cbz(&temp_dir, "comic.cbz");

    einkify()
        .arg("convert")
        .arg(&input)
        .args(["--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown output format"));
}

#[test]
fn test_convert_missing_profile() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_cbz(&temp_dir, "comic.cbz");

    einkify()
        .arg("convert")
        .arg(&input)
        .args(["--profile", "/nonexistent/profile.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load profile"));
}

#[test]
fn test_convert_default_output_name() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_cbz(&temp_dir, "My Comic.cbz");

    einkify()
        .current_dir(temp_dir.path())
        .arg("convert")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("My Comic.kepub.epub"));

    assert!(temp_dir.path().join("My Comic.kepub.epub").exists());
}

#[test]
fn test_convert_epub_flavor() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_cbz(&temp_dir, "vol1.cbz");

    einkify()
        .current_dir(temp_dir.path())
        .arg("convert")
        .arg(&input)
        .args(["-f", "epub"])
        .assert()
        .success();

    assert!(temp_dir.path().join("vol1.epub").exists());
}

#[test]
fn test_convert_then_info_and_validate() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_cbz(&temp_dir, "comic.cbz");
    let output = temp_dir.path().join("book.epub");

    einkify()
        .arg("convert")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--manga")
        .assert()
        .success();

    let mimetype = read_entry(&output, "mimetype");
    assert_eq!(mimetype, "application/epub+zip");

    let out = einkify()
        .arg("info")
        .arg(&output)
        .arg("--json")
        .output()
        .unwrap();
    assert!(out.status.success());

    let info: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(info["title"], "comic");
    assert_eq!(info["pages"], 3);
    assert_eq!(info["reading_direction"], "rtl");
    assert!(info["identifier"].as_str().unwrap().starts_with("urn:uuid:"));

    einkify()
        .arg("validate")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid package"));
}

#[test]
fn test_convert_with_profile() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_cbz(&temp_dir, "comic.cbz");
    let output = temp_dir.path().join("book.epub");
    let profile = temp_dir.path().join("profile.yaml");
    fs::write(&profile, "mono: true\ntype: png\nmax_width: 20\nmax_height: 20\n").unwrap();

    einkify()
        .arg("convert")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--profile")
        .arg(&profile)
        .assert()
        .success();

    let opf = read_entry(&output, "OEBPS/content.opf");
    assert!(opf.contains("Images/001.png"));
    assert!(opf.contains("image/png"));
    assert!(!opf.contains("image/jpeg"));
}

#[test]
fn test_info_nonexistent_file() {
    einkify()
        .args(["info", "/nonexistent/file.epub"])
        .assert()
        .failure();
}

#[test]
fn test_validate_nonexistent_file() {
    einkify()
        .args(["validate", "/nonexistent/file.epub"])
        .assert()
        .failure();
}

#[test]
fn test_validate_reports_issues() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.epub");

    let file = fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let deflated = SimpleFileOptions::default();
    zip.start_file("mimetype", deflated).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();
    zip.start_file("META-INF/container.xml", deflated).unwrap();
    zip.write_all(
        br#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
<rootfiles><rootfile full-path="content.opf" media-type="application/oebps-package+xml"/></rootfiles>
</container>"#,
    )
    .unwrap();
    zip.start_file("content.opf", deflated).unwrap();
    zip.write_all(
        br#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
<metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Broken</dc:title></metadata>
<manifest/>
<spine/>
</package>"#,
    )
    .unwrap();
    zip.finish().unwrap();

    einkify()
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_batch_missing_output_dir() {
    einkify()
        .args(["batch", "/some/input/dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output-dir"));
}

#[test]
fn test_batch_invalid_jobs() {
    einkify()
        .args([
            "batch",
            "/some/input/dir",
            "--output-dir",
            "/some/output/dir",
            "--jobs",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn test_batch_converts_directory() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    create_test_cbz(&input_dir, "vol1.cbz");
    create_test_cbz(&input_dir, "vol2.cbz");
    fs::write(input_dir.path().join("notes.txt"), "skip me").unwrap();

    einkify()
        .arg("batch")
        .arg(input_dir.path())
        .arg("--output-dir")
        .arg(output_dir.path())
        .args(["--jobs", "2", "--format", "epub"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 archives"))
        .stdout(predicate::str::contains("Success: 2"));

    assert!(output_dir.path().join("vol1.epub").exists());
    assert!(output_dir.path().join("vol2.epub").exists());
}

#[test]
fn test_batch_rejects_archives_sharing_an_output() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    let cbz = create_test_cbz(&input_dir, "vol1.cbz");
    fs::copy(&cbz, input_dir.path().join("vol1.cbr")).unwrap();

    einkify()
        .arg("batch")
        .arg(input_dir.path())
        .arg("--output-dir")
        .arg(output_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("would both write"))
        .stderr(predicate::str::contains("vol1.kepub.epub"));

    assert_eq!(fs::read_dir(output_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_batch_empty_directory() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    einkify()
        .arg("batch")
        .arg(input_dir.path())
        .arg("-o")
        .arg(output_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No comic archives found"));
}
