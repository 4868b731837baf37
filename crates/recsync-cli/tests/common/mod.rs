use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

/// An isolated HOME so each test gets its own profile.
pub struct TestEnv {
    home: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
        }
    }

    /// Directory the CLI keeps its profile in.
    pub fn data_dir(&self) -> PathBuf {
        self.home.path().join("data").join("recsync")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_recsync"));
        cmd.args(args);
        cmd.env("HOME", self.home.path());
        cmd.env("XDG_DATA_HOME", self.home.path().join("data"));
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("RECSYNC_API");
        cmd.env_remove("RECSYNC_TIMEOUT");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Run the CLI with arguments.
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute CLI")
    }

    /// Run the CLI off the async runtime so a mock server keeps serving.
    pub async fn run_async(&self, args: &[&str]) -> Output {
        let mut cmd = self.command(args);
        tokio::task::spawn_blocking(move || cmd.output().expect("Failed to execute CLI"))
            .await
            .unwrap()
    }

    /// Run the CLI and expect success.
    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
