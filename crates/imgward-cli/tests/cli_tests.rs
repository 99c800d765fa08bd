//! Integration tests for imgward-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use imgward_core::test_utils::ExifBuilder;
use imgward_core::test_utils::write_jpeg_with_exif;
use imgward_core::test_utils::write_test_jpeg;
use imgward_core::test_utils::write_test_png;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

const MISSING_SCANNER: &str = "/nonexistent/imgward-test/clamscan";

fn imgward_cmd() -> Command {
    cargo_bin_cmd!("imgward")
}

/// Creates `images/` with one clean JPEG, one clean PNG and one text file
/// posing as a PNG. Returns the temp root, the input dir and the report path.
fn setup_images() -> (TempDir, PathBuf, PathBuf) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let images = temp.path().join("images");
    fs::create_dir(&images).unwrap();
    let _ = write_test_jpeg(&images, "cat.jpg", 16, 16);
    let _ = write_test_png(&images, "dog.png", 16, 16);
    fs::write(images.join("fake.png"), "definitely not an image").unwrap();
    let report = temp.path().join("reports").join("image_scan_report.md");
    (temp, images, report)
}

fn scan_cmd(images: &Path, report: &Path) -> Command {
    let mut cmd = imgward_cmd();
    cmd.arg("scan").arg(images).arg("--output").arg(report);
    cmd
}

/// Writes a shell script that answers like clamscan with the given verdict
/// suffix for every file. Run through `sh` so the script needs no exec bit.
#[cfg(unix)]
fn fake_scanner(dir: &Path, verdict: &str, exit_code: i32) -> PathBuf {
    let script = dir.join("fake-clamscan.sh");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\n\
             for target; do :; done\n\
             echo \"$target: {verdict}\"\n\
             echo\n\
             echo \"----------- SCAN SUMMARY -----------\"\n\
             exit {exit_code}\n"
        ),
    )
    .unwrap();
    script
}

#[test]
fn test_version_flag() {
    imgward_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("imgward"));
}

#[test]
fn test_help_flag() {
    imgward_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_scan_help() {
    imgward_cmd()
        .arg("scan")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-tag-length"))
        .stdout(predicate::str::contains("--clamscan"));
}

#[test]
fn test_scan_without_antivirus_still_writes_report() {
    let (_temp, images, report) = setup_images();

    scan_cmd(&images, &report)
        .arg("--clamscan")
        .arg(MISSING_SCANNER)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report generated:"))
        .stdout(predicate::str::contains("Files scanned:       3"))
        .stderr(predicate::str::contains("Antivirus could not scan 3 of 3 files"));

    let text = fs::read_to_string(&report).unwrap();
    assert!(text.starts_with("# Image Security Scan Report"));
    assert!(text.contains("| File | Header | Metadata/Stego Check | ClamAV |"));
    assert_eq!(text.matches("Error running ClamAV:").count(), 3);
    assert!(text.contains("| cat.jpg | JPEG | ✅ No obvious steganography |"));
    assert!(text.contains("| fake.png | ⚠️ Not a standard image header | ⚠️ Not a valid image:"));
}

#[cfg(unix)]
#[test]
fn test_scan_with_clean_scanner() {
    let (temp, images, report) = setup_images();
    let scanner = fake_scanner(temp.path(), "OK", 0);

    scan_cmd(&images, &report)
        .arg("--clamscan")
        .arg("sh")
        .arg("--clamscan-arg")
        .arg(&scanner)
        .assert()
        .success()
        .stdout(predicate::str::contains("Clean:               3"))
        .stderr(predicate::str::contains("Antivirus could not scan").not());

    let text = fs::read_to_string(&report).unwrap();
    assert_eq!(text.matches("✅ Clean").count(), 3);
}

#[cfg(unix)]
#[test]
fn test_strict_mode_fails_on_detection() {
    let (temp, images, report) = setup_images();
    fs::remove_file(images.join("fake.png")).unwrap();
    let scanner = fake_scanner(temp.path(), "Eicar-Test-Signature FOUND", 1);

    scan_cmd(&images, &report)
        .arg("--clamscan")
        .arg("sh")
        .arg("--clamscan-arg")
        .arg(&scanner)
        .arg("--strict")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("2 of 2 files flagged"));

    let text = fs::read_to_string(&report).unwrap();
    assert_eq!(text.matches("⚠️ Malicious (Eicar-Test-Signature)").count(), 2);
}

#[test]
fn test_findings_do_not_change_exit_status_by_default() {
    let (_temp, images, report) = setup_images();
    let tiff = ExifBuilder::new()
        .ascii(ExifBuilder::IMAGE_DESCRIPTION, "<script>alert(1)</script>")
        .build();
    let _ = write_jpeg_with_exif(&images, "xss.jpg", &tiff);

    scan_cmd(&images, &report)
        .arg("--clamscan")
        .arg(MISSING_SCANNER)
        .assert()
        .success();

    let text = fs::read_to_string(&report).unwrap();
    assert!(text.contains("Image ImageDescription: contains code"));
}

#[test]
fn test_strict_mode_fails_on_metadata_finding() {
    let (_temp, images, report) = setup_images();
    fs::remove_file(images.join("fake.png")).unwrap();
    let tiff = ExifBuilder::new()
        .ascii(ExifBuilder::SOFTWARE, "php -r 'system($_GET[0]);'")
        .build();
    let _ = write_jpeg_with_exif(&images, "shell.jpg", &tiff);

    scan_cmd(&images, &report)
        .arg("--clamscan")
        .arg(MISSING_SCANNER)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 3 files flagged"));
}

#[test]
fn test_scan_json_output() {
    let (_temp, images, report) = setup_images();

    let output = scan_cmd(&images, &report)
        .arg("--clamscan")
        .arg(MISSING_SCANNER)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(value["operation"], "scan");
    assert_eq!(value["status"], "warning");
    assert!(
        value["warnings"][0]
            .as_str()
            .unwrap()
            .contains("Antivirus could not scan 3 of 3 files")
    );
    assert_eq!(value["data"]["summary"]["total"], 3);
    assert_eq!(value["data"]["summary"]["av_errors"], 3);
    assert_eq!(value["data"]["summary"]["integrity_failures"], 1);

    let files = value["data"]["files"].as_array().unwrap();
    let fake = files.iter().find(|f| f["file"] == "fake.png").unwrap();
    assert_eq!(fake["header"], "unknown");
    assert_eq!(fake["integrity"]["valid"], false);
    assert_eq!(fake["flagged"], true);
}

#[test]
fn test_scan_json_strict_failure_is_one_document() {
    let (_temp, images, report) = setup_images();

    let output = scan_cmd(&images, &report)
        .arg("--clamscan")
        .arg(MISSING_SCANNER)
        .arg("--strict")
        .arg("--json")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"], "1 of 3 files flagged (--strict)");
    assert_eq!(value["warnings"].as_array().unwrap().len(), 1);
    assert_eq!(value["data"]["summary"]["flagged"], 1);
    assert!(report.exists());
}

#[cfg(unix)]
#[test]
fn test_scan_json_clean_run_has_no_warnings() {
    let (temp, images, report) = setup_images();
    fs::remove_file(images.join("fake.png")).unwrap();
    let scanner = fake_scanner(temp.path(), "OK", 0);

    let output = scan_cmd(&images, &report)
        .arg("--clamscan")
        .arg("sh")
        .arg("--clamscan-arg")
        .arg(&scanner)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "success");
    assert!(value.get("warnings").is_none());
    assert_eq!(value["data"]["summary"]["av_clean"], 2);
}

#[test]
fn test_check_json_strict_failure_is_one_document() {
    let (_temp, images, _report) = setup_images();

    let output = imgward_cmd()
        .arg("--json")
        .arg("check")
        .arg(images.join("fake.png"))
        .arg("--clamscan")
        .arg(MISSING_SCANNER)
        .arg("--strict")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["operation"], "check");
    assert_eq!(value["status"], "error");
    assert!(value["error"].as_str().unwrap().ends_with("flagged (--strict)"));
    assert_eq!(value["data"]["flagged"], true);
}

#[test]
fn test_scan_is_idempotent() {
    let (_temp, images, report) = setup_images();

    scan_cmd(&images, &report)
        .arg("--clamscan")
        .arg(MISSING_SCANNER)
        .assert()
        .success();
    let first = fs::read(&report).unwrap();

    scan_cmd(&images, &report)
        .arg("--clamscan")
        .arg(MISSING_SCANNER)
        .assert()
        .success();
    let second = fs::read(&report).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_quiet_suppresses_output() {
    let (_temp, images, report) = setup_images();

    scan_cmd(&images, &report)
        .arg("--clamscan")
        .arg(MISSING_SCANNER)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(report.exists());
}

#[test]
fn test_verbose_lists_every_file() {
    let (_temp, images, report) = setup_images();

    scan_cmd(&images, &report)
        .arg("--clamscan")
        .arg(MISSING_SCANNER)
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("cat.jpg"))
        .stdout(predicate::str::contains("dog.png"))
        .stdout(predicate::str::contains("[FLAGGED] fake.png"));
}

#[test]
fn test_missing_input_directory_is_fatal() {
    let temp = TempDir::new().unwrap();
    let report = temp.path().join("report.md");

    scan_cmd(&temp.path().join("no-such-dir"), &report)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read input directory"))
        .stderr(predicate::str::contains("HINT"));

    assert!(!report.exists());
}

#[test]
fn test_unwritable_report_location_is_fatal() {
    let (temp, images, _report) = setup_images();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "a file, not a directory").unwrap();

    scan_cmd(&images, &blocker.join("report.md"))
        .arg("--clamscan")
        .arg(MISSING_SCANNER)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot create report directory"))
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn test_empty_pattern_rejected() {
    let (_temp, images, report) = setup_images();

    scan_cmd(&images, &report)
        .arg("--pattern")
        .arg("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid code pattern list"));
}

#[test]
fn test_custom_pattern_replaces_defaults() {
    let (_temp, images, report) = setup_images();
    let tiff = ExifBuilder::new()
        .ascii(ExifBuilder::ARTIST, "powershell")
        .ascii(ExifBuilder::COPYRIGHT, "uses EVAL( here")
        .build();
    let _ = write_jpeg_with_exif(&images, "custom.jpg", &tiff);

    scan_cmd(&images, &report)
        .arg("--clamscan")
        .arg(MISSING_SCANNER)
        .arg("--pattern")
        .arg("eval(")
        .assert()
        .success();

    let text = fs::read_to_string(&report).unwrap();
    assert!(text.contains("Image Copyright: contains code"));
    assert!(!text.contains("Image Artist: contains code"));
}

#[test]
fn test_check_single_file() {
    let (_temp, images, _report) = setup_images();

    imgward_cmd()
        .arg("check")
        .arg(images.join("fake.png"))
        .arg("--clamscan")
        .arg(MISSING_SCANNER)
        .assert()
        .success()
        .stdout(predicate::str::contains("[FLAGGED]"))
        .stdout(predicate::str::contains("Not a standard image header"))
        .stdout(predicate::str::contains("Integrity: not a valid image"));
}

#[test]
fn test_check_json_clean_file() {
    let (_temp, images, _report) = setup_images();

    let output = imgward_cmd()
        .arg("check")
        .arg(images.join("cat.jpg"))
        .arg("--clamscan")
        .arg(MISSING_SCANNER)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["operation"], "check");
    assert_eq!(value["data"]["header"], "JPEG");
    assert_eq!(value["data"]["integrity"]["valid"], true);
    assert_eq!(value["data"]["antivirus"]["status"], "error");
    assert_eq!(value["data"]["flagged"], false);
}

#[test]
fn test_check_missing_file() {
    imgward_cmd()
        .arg("check")
        .arg("/nonexistent/imgward-test/cat.jpg")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a file"));
}

#[test]
fn test_json_error_envelope() {
    let temp = TempDir::new().unwrap();

    let output = imgward_cmd()
        .arg("--json")
        .arg("scan")
        .arg(temp.path().join("missing"))
        .output()
        .unwrap();
    assert!(!output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "error");
    assert!(value["error"].as_str().unwrap().contains("HINT"));
}

#[test]
fn test_completion_bash() {
    imgward_cmd()
        .arg("completion")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("imgward"));
}
