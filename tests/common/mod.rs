//! Common test utilities for installer integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Installer configuration with no pacing and no existing-install markers
#[allow(dead_code)]
pub const FAST_CONFIG: &str = "\
existing_install_markers: []
pacing:
  prepare_ms: 0
  per_file_ms: 0
  secondary_tool_ms: 0
  finalize_tick_ms: 0
  finalize_ticks: 0
";

/// A scratch environment: payload, fake home directory and install destination
#[allow(dead_code)]
pub struct TestEnv {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    pub payload: PathBuf,
    pub home: PathBuf,
    pub dest: PathBuf,
    pub config: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create an environment with the standard payload and an empty `.bashrc`
    pub fn new() -> Self {
        Self::with_config(FAST_CONFIG)
    }

    pub fn with_config(config: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        let env = Self {
            payload: root.join("payload"),
            home: root.join("home"),
            dest: root.join("dest"),
            config: root.join("installer-test.yaml"),
            temp,
        };

        std::fs::create_dir_all(&env.home).expect("Failed to create home directory");
        std::fs::write(&env.config, config).expect("Failed to write config");
        env.write_payload("lib/libGooeyGUI.so", "\x7fELF");
        env.write_payload("lib/notes.txt", "not a library");
        env.write_payload("include/gooey.h", "#pragma once\n");
        env.write_payload("include/widgets/button.h", "#pragma once\n");
        env.write_payload("docs/index.html", "<html></html>\n");
        env.write_payload("examples/hello.c", "int main(void) { return 0; }\n");
        env.write_payload("examples/README.md", "# Examples\n");
        env.write_payload("examples/sub/Makefile", "all:\n");
        env
    }

    /// Write a file under the payload directory
    pub fn write_payload(&self, path: &str, content: &str) {
        write_file(&self.payload.join(path), content);
    }

    /// Write a file under the fake home directory
    pub fn write_home(&self, path: &str, content: &str) {
        write_file(&self.home.join(path), content);
    }

    pub fn read_home(&self, path: &str) -> String {
        std::fs::read_to_string(self.home.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists under the install destination
    pub fn installed(&self, path: &str) -> bool {
        self.dest.join(path).exists()
    }

    pub fn dest_arg(&self) -> String {
        self.dest.display().to_string()
    }

    pub fn payload_arg(&self) -> String {
        self.payload.display().to_string()
    }

    /// The installer binary, isolated from the real home directory
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(installer_bin());
        cmd.current_dir(self.temp.path())
            .env("HOME", &self.home)
            .env("GOOEY_INSTALLER_ALLOW_NONROOT", "1")
            .env("GOOEY_INSTALLER_CONFIG", &self.config)
            .env_remove("GOOEY_INSTALLER_LOG")
            .env_remove("SUDO_USER");
        cmd
    }

    /// `install --yes` from the payload into the destination
    pub fn install_cmd(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.args([
            "install",
            "--source",
            &self.payload_arg(),
            "--path",
            &self.dest_arg(),
            "--yes",
        ]);
        cmd
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Path to the installer binary
#[allow(dead_code)]
pub fn installer_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_gooey-installer"))
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}
