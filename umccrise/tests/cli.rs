#![cfg(unix)]

use std::{error::Error, fs, os::unix::fs::PermissionsExt, path::PathBuf};

use assert_cmd::Command;
use assert_fs::{
    fixture::{ChildPath, FileTouch, FileWriteStr, PathChild, PathCreateDir},
    TempDir,
};
use predicates::prelude::*;
use pretty_assertions::assert_eq;

/// Stands in for snakemake: records each invocation as a line in
/// $FAKE_SNAKEMAKE_CALLS and exits with $UNLOCK_EXIT or $MAIN_EXIT.
const FAKE_SNAKEMAKE: &str = r#"#!/bin/sh
echo "$*" >> "$FAKE_SNAKEMAKE_CALLS"
case "$*" in
    *--unlock*) exit "${UNLOCK_EXIT:-0}" ;;
esac
exit "${MAIN_EXIT:-0}"
"#;

struct Fixture {
    temp_dir: TempDir,
    project: ChildPath,
    package: ChildPath,
    snakemake: ChildPath,
    calls: ChildPath,
}

impl Fixture {
    fn new() -> Result<Self, Box<dyn Error>> {
        let temp_dir = TempDir::new()?.into_persistent_if(std::env::var("TEST_PERSIST").is_ok());

        let project = temp_dir.child("bcbio_project/final");
        project.create_dir_all()?;

        let package = temp_dir.child("package");
        package.create_dir_all()?;
        package.child("Snakefile").touch()?;
        package.child("submit.py").touch()?;

        let snakemake = temp_dir.child("snakemake");
        snakemake.write_str(FAKE_SNAKEMAKE)?;
        fs::set_permissions(snakemake.path(), fs::Permissions::from_mode(0o755))?;

        let calls = temp_dir.child("calls.txt");
        Ok(Fixture {
            temp_dir,
            project,
            package,
            snakemake,
            calls,
        })
    }

    /// Default output directory, relative to the working directory of the
    /// run which has symlinks resolved.
    fn output_dir(&self) -> PathBuf {
        fs::canonicalize(self.temp_dir.path())
            .unwrap()
            .join("umccrised")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("umccrise").unwrap();
        cmd.current_dir(self.temp_dir.path())
            .env("FAKE_SNAKEMAKE_CALLS", self.calls.path())
            .env("UMCCRISE_HOME", self.package.path())
            .arg("--snakemake-path")
            .arg(self.snakemake.path())
            .arg(self.project.path());
        cmd
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.calls.path())
            .map(|s| s.lines().map(String::from).collect())
            .unwrap_or_default()
    }
}

#[test]
fn test_missing_project() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    let mut cmd = Command::cargo_bin("umccrise")?;
    cmd.current_dir(fixture.temp_dir.path())
        .env("FAKE_SNAKEMAKE_CALLS", fixture.calls.path())
        .arg("--snakemake-path")
        .arg(fixture.snakemake.path())
        .arg("no_such_project")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));

    assert!(!fixture.output_dir().exists());
    assert!(fixture.calls().is_empty());
    Ok(())
}

#[test]
fn test_default_run() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    fixture.cmd().assert().success();

    let output_dir = fixture.output_dir();
    assert!(output_dir.join("umccrise.log").exists());

    let calls = fixture.calls();
    assert_eq!(calls.len(), 1);
    let expected = format!(
        "--snakefile {} --printshellcmds --directory {} -j 1 --config run_dir={}",
        fixture.package.path().join("Snakefile").display(),
        output_dir.display(),
        fixture.project.path().display(),
    );
    assert_eq!(calls[0], expected);
    Ok(())
}

#[test]
fn test_filters_and_targets() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    let output_dir = fixture.temp_dir.child("custom/out");
    fixture
        .cmd()
        .args(["pcgr_download", "rmd"])
        .args(["-e", "s3", "-s", "s1,s2", "-b", "b1", "-j", "8"])
        .arg("-o")
        .arg(output_dir.path())
        .assert()
        .success();

    assert!(output_dir.child("umccrise.log").exists());
    let calls = fixture.calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert!(call.starts_with("pcgr_download rmd --snakefile"), "{call}");
    assert!(call.contains(" -j 8 "), "{call}");
    assert!(call.ends_with("sample=s1,s2 batch=b1 exclude=s3 pcgr_download=yes"), "{call}");
    assert!(!call.contains("--rerun-incomplete"), "{call}");
    Ok(())
}

#[test]
fn test_unique_id() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    fixture.cmd().args(["--uid", "abc 123"]).assert().success();

    let calls = fixture.calls();
    assert!(
        calls[0].ends_with("pcgr_download=yes unique_id=abc 123"),
        "{}",
        calls[0]
    );
    Ok(())
}

#[test]
fn test_unlock_then_run() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    fixture
        .cmd()
        .arg("--unlock")
        .env("UNLOCK_EXIT", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("* Unlocking previous run... *"))
        .stdout(predicate::str::contains("* Now rerunning *"));

    let calls = fixture.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].ends_with(" --unlock"), "{}", calls[0]);
    assert!(!calls[1].contains("--unlock"), "{}", calls[1]);
    assert!(calls[1].contains("--rerun-incomplete"), "{}", calls[1]);
    assert_eq!(calls[0], format!("{} --unlock", calls[1]));
    Ok(())
}

#[test]
fn test_unlock_main_failure_decides() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    fixture
        .cmd()
        .arg("--unlock")
        .env("MAIN_EXIT", "3")
        .assert()
        .code(3);
    assert_eq!(fixture.calls().len(), 2);
    Ok(())
}

#[test]
fn test_exit_code_propagated() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    fixture
        .cmd()
        .env("MAIN_EXIT", "2")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Error running Umccrise: snakemake returned a non-zero status.",
        ));
    Ok(())
}

#[test]
fn test_rerun_incomplete() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    fixture.cmd().arg("--rerun-incomplete").assert().success();
    let calls = fixture.calls();
    assert!(calls[0].contains(" --rerun-incomplete --config "), "{}", calls[0]);
    Ok(())
}

#[test]
fn test_previous_log_kept() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    fixture.cmd().assert().success();
    fixture.cmd().assert().success();

    let output_dir = fixture.output_dir();
    assert!(output_dir.join("umccrise.log").exists());
    assert!(output_dir.join("umccrise.log.1").exists());
    assert!(!output_dir.join("umccrise.log.2").exists());
    Ok(())
}

#[test]
fn test_cluster_cmd() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    fixture
        .cmd()
        .args(["-c", "--cluster-cmd", "qsub -V"])
        .env("HOSTNAME", "my-laptop")
        .assert()
        .success();

    let calls = fixture.calls();
    assert!(calls[0].contains(" --cluster qsub -V --config "), "{}", calls[0]);
    Ok(())
}

#[test]
fn test_cluster_auto_supported_host() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    fixture
        .cmd()
        .arg("--cluster-auto")
        .env("HOSTNAME", "spartan-login1")
        .assert()
        .success();

    let calls = fixture.calls();
    let expected = format!(
        " --cluster python {} --config ",
        fixture.package.path().join("submit.py").display()
    );
    assert!(calls[0].contains(&expected), "{}", calls[0]);
    Ok(())
}

#[test]
fn test_cluster_auto_unsupported_host() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    fixture
        .cmd()
        .arg("--cluster-auto")
        .env("HOSTNAME", "my-laptop")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Automatic cluster submission is not supported",
        ));
    assert!(fixture.calls().is_empty());
    Ok(())
}

#[test]
fn test_missing_snakefile() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    fs::remove_file(fixture.package.child("Snakefile").path())?;
    fixture
        .cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Snakefile"));
    assert!(fixture.calls().is_empty());
    Ok(())
}

#[test]
fn test_empty_options_ignored() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    fixture
        .cmd()
        .args(["-s", "", "-b", "", "-e", "", "--uid", "", "--cluster", ""])
        .assert()
        .success();

    let calls = fixture.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].contains("--cluster"), "{}", calls[0]);
    assert!(
        calls[0].ends_with(&format!("--config run_dir={}", fixture.project.path().display())),
        "{}",
        calls[0]
    );
    Ok(())
}

#[test]
fn test_commands_printed() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    let assert = fixture.cmd().arg("--unlock").arg("-q").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;

    let printed: Vec<&str> = stdout
        .lines()
        .filter(|line| line.contains("--snakefile"))
        .collect();
    assert_eq!(printed.len(), 2, "{stdout}");
    assert!(printed[0].ends_with(" --unlock"), "{stdout}");
    assert!(!printed[1].contains("--unlock"), "{stdout}");
    assert!(
        printed[1].starts_with(&fixture.snakemake.path().display().to_string()),
        "{stdout}"
    );
    Ok(())
}
