use assert_cmd::{cargo::cargo_bin_cmd, Command};
use chrono::{Duration, Local, SecondsFormat};
use std::fs;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

/// A scratch directory holding `app.log`, its store and an isolated config dir
pub struct Fixture {
    dir: TempDir,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("config")).unwrap();
        Fixture { dir }
    }

    /// Command with the environment scrubbed of user defaults
    pub fn ntlog(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("ntlog");
        cmd.current_dir(self.dir.path())
            .env("NTLOG_CONFIG_DIR", self.dir.path().join("config"))
            .env_remove("NTLOG_KEEP_FOR")
            .env_remove("NTLOG_MAX_ENTRIES")
            .env_remove("NTLOG_MIN_ENTRIES")
            .env_remove("NTLOG_LOG");
        cmd
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("app.log")
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("app.log.nt")
    }

    pub fn write_log(&self, text: &str) {
        fs::write(self.log_path(), text).unwrap();
    }

    pub fn write_store(&self, text: &str) {
        fs::write(self.store_path(), text).unwrap();
    }

    pub fn write_config(&self, text: &str) {
        fs::write(self.dir.path().join("config").join("config.toml"), text).unwrap();
    }

    pub fn read_store(&self) -> String {
        fs::read_to_string(self.store_path()).unwrap()
    }
}

/// Store key for an instant `hours` in the past
#[allow(dead_code)]
pub fn hours_ago(hours: i64) -> String {
    (Local::now() - Duration::hours(hours))
        .fixed_offset()
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Store document with one inline entry per age (in days), newest first
#[allow(dead_code)]
pub fn store_with_days(days: impl IntoIterator<Item = i64>) -> String {
    days.into_iter()
        .map(|day| format!("{}: entry {day}\n", hours_ago(day * 24)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of entries loaded from the fixture store by `entry N` marker
#[allow(dead_code)]
pub fn kept_days(store: &str) -> Vec<i64> {
    store
        .lines()
        .filter_map(|line| line.split_once(": entry "))
        .map(|(_, day)| day.trim().parse().unwrap())
        .collect()
}
