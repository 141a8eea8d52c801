use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::Server;
use predicates::prelude::*;
use std::io::Write;
use tempfile::tempdir;
use zip::write::SimpleFileOptions;

fn create_zip(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, content) in files {
        writer
            .start_file(
                *name,
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored),
            )
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn releases_body(url: &str) -> String {
    format!(
        r#"[
            {{
                "tag_name": "libvlc-3.0.20",
                "prerelease": false,
                "assets": []
            }},
            {{
                "tag_name": "libvlc-3.0.18",
                "prerelease": false,
                "assets": [
                    {{"name": "arm64-v8a.zip", "size": 1, "browser_download_url": "{0}/download/arm64-v8a.zip"}},
                    {{"name": "x86_64.zip", "size": 1, "browser_download_url": "{0}/download/x86_64.zip"}}
                ]
            }}
        ]"#,
        url
    )
}

fn abifetch(url: &str) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("abifetch"));
    cmd.arg("--api-url")
        .arg(url)
        .arg("--allow-insecure")
        .arg("--repo")
        .arg("owner/libs")
        .env_remove("ABIFETCH_API_URL")
        .env_remove("ABIFETCH_REPO");
    cmd
}

#[test]
fn test_end_to_end_download_and_extract() {
    let mut server = Server::new();
    let url = server.url();

    let _mock_releases = server
        .mock("GET", "/repos/owner/libs/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body(&url))
        .create();

    let zip_bytes = create_zip(&[("libvlc.so", "x86_64 build"), ("jni/libvlcjni.so", "jni")]);
    let mock_asset = server
        .mock("GET", "/download/x86_64.zip")
        .with_status(200)
        .with_body(&zip_bytes)
        .create();

    let dir = tempdir().unwrap();
    let output = dir.path().join("bundle.zip");
    let libs = dir.path().join("libs");

    abifetch(&url)
        .args(["--abi", "x86", "--abi", "x86_64", "download", "3.0.18", "-o"])
        .arg(&output)
        .arg("--extract")
        .arg(&libs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Downloaded libvlc-3.0.18 (x86_64.zip"))
        .stdout(predicate::str::contains("Extracted 2 files"));

    mock_asset.assert();
    assert_eq!(std::fs::read(&output).unwrap(), zip_bytes);
    assert_eq!(
        std::fs::read_to_string(libs.join("libvlc.so")).unwrap(),
        "x86_64 build"
    );
    assert!(libs.join("jni/libvlcjni.so").exists());
}

#[test]
fn test_download_prefers_arm64() {
    let mut server = Server::new();
    let url = server.url();

    let _mock_releases = server
        .mock("GET", "/repos/owner/libs/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body(&url))
        .create();

    let mock_arm = server
        .mock("GET", "/download/arm64-v8a.zip")
        .with_status(200)
        .with_body("arm")
        .create();
    let mock_x86 = server
        .mock("GET", "/download/x86_64.zip")
        .expect(0)
        .create();

    let dir = tempdir().unwrap();
    let output = dir.path().join("nested/dir/bundle.zip");

    abifetch(&url)
        .args(["--abi", "x86_64", "--abi", "arm64-v8a", "download", "3.0.18", "-o"])
        .arg(&output)
        .assert()
        .success();

    mock_arm.assert();
    mock_x86.assert();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "arm");
}

#[test]
fn test_download_unsupported_architecture() {
    let mut server = Server::new();
    let url = server.url();

    let _mock_releases = server
        .mock("GET", "/repos/owner/libs/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body(&url))
        .create();
    let mock_asset = server
        .mock("GET", mockito::Matcher::Regex("^/download/".to_string()))
        .expect(0)
        .create();

    let dir = tempdir().unwrap();
    let output = dir.path().join("bundle.zip");

    abifetch(&url)
        .args(["--abi", "mips", "download", "3.0.18", "-o"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No bundle is built for this device"));

    mock_asset.assert();
    assert!(!output.exists());
}

#[test]
fn test_download_asset_not_found() {
    let mut server = Server::new();
    let url = server.url();

    let _mock_releases = server
        .mock("GET", "/repos/owner/libs/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body(&url))
        .create();

    let dir = tempdir().unwrap();
    let output = dir.path().join("bundle.zip");

    abifetch(&url)
        .args(["--abi", "x86", "download", "3.0.18", "-o"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Release 'libvlc-3.0.18' has no asset named 'x86.zip'",
        ));

    assert!(!output.exists());
}

#[test]
fn test_download_unknown_version() {
    let mut server = Server::new();
    let url = server.url();

    let _mock_releases = server
        .mock("GET", "/repos/owner/libs/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body(&url))
        .create();

    let dir = tempdir().unwrap();

    abifetch(&url)
        .args(["--abi", "x86_64", "download", "9.9.9", "-o"])
        .arg(dir.path().join("bundle.zip"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No release tagged 'libvlc-9.9.9' has been published",
        ));
}

#[test]
fn test_download_asset_server_error() {
    let mut server = Server::new();
    let url = server.url();

    let _mock_releases = server
        .mock("GET", "/repos/owner/libs/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body(&url))
        .create();
    let _mock_asset = server
        .mock("GET", "/download/x86_64.zip")
        .with_status(503)
        .create();

    let dir = tempdir().unwrap();

    abifetch(&url)
        .args(["--abi", "x86_64", "download", "3.0.18", "-o"])
        .arg(dir.path().join("bundle.zip"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to download"));
}

#[test]
fn test_find_release() {
    let mut server = Server::new();
    let url = server.url();

    let _mock_releases = server
        .mock("GET", "/repos/owner/libs/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body(&url))
        .create();

    abifetch(&url)
        .args(["find", "3.0.18"])
        .assert()
        .success()
        .stdout(predicate::str::contains("libvlc-3.0.18"))
        .stdout(predicate::str::contains("arm64-v8a.zip"));

    abifetch(&url)
        .args(["find", "1.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No release tagged 'libvlc-1.0.0'"));
}

#[test]
fn test_list_releases() {
    let mut server = Server::new();
    let url = server.url();

    let _mock_releases = server
        .mock("GET", "/repos/owner/libs/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body(&url))
        .create();

    abifetch(&url)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("libvlc-3.0.20"))
        .stdout(predicate::str::contains(
            "libvlc-3.0.18\tarm64-v8a.zip, x86_64.zip",
        ));
}

#[test]
fn test_list_releases_server_error() {
    let mut server = Server::new();
    let url = server.url();

    let _mock_releases = server
        .mock("GET", "/repos/owner/libs/releases")
        .with_status(500)
        .create();

    abifetch(&url)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to list releases"));
}

#[test]
fn test_abi_command() {
    Command::new(cargo::cargo_bin!("abifetch"))
        .args(["--abi", "x86", "--abi", "armeabi-v7a", "abi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Supported ABIs: x86, armeabi-v7a"))
        .stdout(predicate::str::contains("Asset: armeabi-v7a.zip"));

    Command::new(cargo::cargo_bin!("abifetch"))
        .args(["--abi", "mips", "abi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Asset: unsupported"));
}
