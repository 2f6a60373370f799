use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{TempDir, tempdir};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("tstools")
        .join("metadata.txt")
}

/// Runs the binary with an empty config file so the host machine's settings
/// never leak into a test.
fn qgismeta(tmp: &TempDir) -> Result<Command, Box<dyn std::error::Error>> {
    let config = tmp.path().join("config.toml");
    if !config.exists() {
        fs::write(&config, "")?;
    }
    let mut cmd = Command::cargo_bin("qgismeta")?;
    cmd.env("QGISMETA_CONFIG", &config)
        .env_remove("QGISMETA_HOST_VERSION")
        .env_remove("QGISMETA_PLUGINS_DIR")
        .env_remove("QGISMETA_STRICT")
        .current_dir(tmp.path());
    Ok(cmd)
}

fn copy_fixture(tmp: &TempDir, folder: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = tmp.path().join(folder);
    fs::create_dir_all(&dir)?;
    let target = dir.join("metadata.txt");
    fs::copy(fixture(), &target)?;
    Ok(target)
}

#[test]
fn show_json_reports_tstools_fields() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let output = qgismeta(&tmp)?
        .arg("show")
        .arg(fixture())
        .arg("--json")
        .output()?;
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["name"], "TSTools");
    assert_eq!(json["version"], "1.1");
    assert_eq!(json["author"], "Chris Holden");
    assert_eq!(json["qgisMinimumVersion"], "2.0");
    assert_eq!(json["experimental"], true);
    assert_eq!(json["deprecated"], false);
    let tags: Vec<&str> = json["tags"]
        .as_array()
        .map(|a| a.iter().filter_map(|t| t.as_str()).collect())
        .unwrap_or_default();
    assert_eq!(
        tags,
        vec!["remote sensing", "time series", "visualization", "structural change"]
    );
    Ok(())
}

#[test]
fn missing_mandatory_field_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let text = fs::read_to_string(fixture())?.replace("email=ceholden@gmail.com\n", "");
    let path = tmp.path().join("metadata.txt");
    fs::write(&path, text)?;

    qgismeta(&tmp)?
        .arg("show")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing mandatory field `email`"));
    Ok(())
}

#[test]
fn lint_passes_with_warnings_and_fails_when_strict() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let path = copy_fixture(&tmp, "tstools")?;

    qgismeta(&tmp)?
        .arg("lint")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("icon"));

    qgismeta(&tmp)?
        .arg("lint")
        .arg(&path)
        .arg("--strict")
        .assert()
        .failure();

    fs::create_dir_all(tmp.path().join("tstools").join("media"))?;
    fs::write(
        tmp.path().join("tstools").join("media").join("tstools_icon.png"),
        b"png",
    )?;
    qgismeta(&tmp)?
        .arg("lint")
        .arg(tmp.path().join("tstools"))
        .arg("--strict")
        .assert()
        .success();
    Ok(())
}

#[test]
fn lint_checks_host_compatibility() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let path = copy_fixture(&tmp, "tstools")?;

    qgismeta(&tmp)?
        .arg("lint")
        .arg(&path)
        .arg("--host")
        .arg("3.28")
        .assert()
        .failure()
        .stdout(predicate::str::contains("outside the supported range"));

    qgismeta(&tmp)?
        .arg("lint")
        .arg(&path)
        .arg("--host")
        .arg("2.18")
        .assert()
        .success();

    fs::write(tmp.path().join("config.toml"), "host_version = \"3.28\"\n")?;
    qgismeta(&tmp)?.arg("lint").arg(&path).assert().failure();
    Ok(())
}

#[test]
fn render_output_reads_back_identically() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let rendered = qgismeta(&tmp)?.arg("render").arg(fixture()).output()?;
    assert!(rendered.status.success());
    let text = String::from_utf8(rendered.stdout)?;
    assert!(text.starts_with("[general]\nname=TSTools\n"));
    assert!(text.contains("tags=remote sensing, time series, visualization, structural change\n"));

    let path = tmp.path().join("rendered.txt");
    fs::write(&path, &text)?;

    let original = qgismeta(&tmp)?.args(["show", "--json"]).arg(fixture()).output()?;
    let again = qgismeta(&tmp)?.args(["show", "--json"]).arg(&path).output()?;
    let a: serde_json::Value = serde_json::from_slice(&original.stdout)?;
    let b: serde_json::Value = serde_json::from_slice(&again.stdout)?;
    assert_eq!(a, b);
    Ok(())
}

#[test]
fn bump_rewrites_only_the_version() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let path = copy_fixture(&tmp, "tstools")?;
    let before = fs::read_to_string(&path)?;

    qgismeta(&tmp)?
        .arg("bump")
        .arg(tmp.path().join("tstools"))
        .arg("minor")
        .assert()
        .success()
        .stdout(predicate::str::contains("1.1 -> 1.2"));

    let after = fs::read_to_string(&path)?;
    assert_eq!(after, before.replace("version=1.1\n", "version=1.2\n"));

    qgismeta(&tmp)?
        .arg("bump")
        .arg(&path)
        .arg("sideways")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn list_shows_valid_and_broken_plugins() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    copy_fixture(&tmp, "tstools")?;

    qgismeta(&tmp)?
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("TSTools  v1.1  (tstools)"));

    fs::create_dir_all(tmp.path().join("broken"))?;
    fs::write(tmp.path().join("broken").join("metadata.txt"), "[general]\nname=Broken\n")?;

    qgismeta(&tmp)?
        .arg("list")
        .assert()
        .failure()
        .stdout(predicate::str::contains("TSTools  v1.1  (tstools)"))
        .stdout(predicate::str::contains("broken is not a valid descriptor"))
        .stdout(predicate::str::contains("1 descriptor(s) failed to parse"));
    Ok(())
}

#[test]
fn init_writes_descriptor_without_prompting() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let dir = tmp.path().join("demo");

    qgismeta(&tmp)?
        .arg("init")
        .arg(&dir)
        .args(["--name", "Demo", "--description", "Demo plugin"])
        .args(["--plugin-version", "0.1", "--author", "Jane Doe"])
        .args(["--email", "jane@example.org", "--qgis-min", "3.0"])
        .args(["--tags", "raster, demo", "--yes"])
        .assert()
        .success();

    let text = fs::read_to_string(dir.join("metadata.txt"))?;
    assert!(text.contains("name=Demo\n"));
    assert!(text.contains("tags=raster, demo\n"));

    qgismeta(&tmp)?
        .arg("init")
        .arg(&dir)
        .args(["--name", "Demo", "--description", "Demo plugin"])
        .args(["--plugin-version", "0.1", "--author", "Jane Doe"])
        .args(["--email", "jane@example.org", "--qgis-min", "3.0", "--yes"])
        .assert()
        .failure();
    Ok(())
}
