//! Helpers for driving the `bb` binary against a throwaway data dir.

use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::process::ExitStatus;

use assert_cmd::Command;
use tempfile::TempDir;

/// A temp root holding the data dir and an isolated user config dir.
pub struct BbWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub config_home: PathBuf,
}

impl BbWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        let data_dir = root.join("data");
        let config_home = root.join("config");
        fs::create_dir_all(&config_home).expect("config dir");
        Self {
            temp_dir,
            root,
            data_dir,
            config_home,
        }
    }

    pub fn bugs_file(&self) -> PathBuf {
        self.data_dir.join("bugs.json")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }

    pub fn read_bugs_json(&self) -> serde_json::Value {
        let text = fs::read_to_string(self.bugs_file()).expect("read bugs.json");
        serde_json::from_str(&text).expect("bugs.json is JSON")
    }
}

pub struct BbOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl BbOutput {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{}", self.stdout))
    }
}

fn command<I, S>(workspace: &BbWorkspace, args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::cargo_bin("bb").expect("bb binary");
    cmd.current_dir(&workspace.root)
        .args(args)
        .env("BUGBOOK_DIR", &workspace.data_dir)
        .env("XDG_CONFIG_HOME", &workspace.config_home)
        .env("HOME", &workspace.root)
        .env_remove("RUST_LOG");
    cmd
}

pub fn run_bb<I, S>(workspace: &BbWorkspace, args: I, label: &str) -> BbOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_bb_with_stdin(workspace, args, "", label)
}

pub fn run_bb_with_stdin<I, S>(workspace: &BbWorkspace, args: I, stdin: &str, label: &str) -> BbOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = command(workspace, args)
        .write_stdin(stdin)
        .output()
        .unwrap_or_else(|e| panic!("{label}: failed to run bb: {e}"));
    let result = BbOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    if !result.status.success() {
        eprintln!("[{label}] stderr:\n{}", result.stderr);
    }
    result
}

/// Create a bug and return its generated ID.
pub fn add_bug(workspace: &BbWorkspace, title: &str, extra: &[&str]) -> String {
    let mut args = vec!["add", title, "--json"];
    args.extend_from_slice(extra);
    let output = run_bb(workspace, args, "add");
    assert!(output.status.success(), "add failed: {}", output.stderr);
    output.json()["id"]
        .as_str()
        .expect("id in add output")
        .to_string()
}
