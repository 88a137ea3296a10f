#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};

pub fn run_gitus(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gitus").expect("Failed to find gitus binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn run_buildus(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("buildus").expect("Failed to find buildus binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn gitus_commit(dir: &Path, message: &str) -> Command {
    let author = random_author();
    run_gitus(dir, &["commit", message, &author])
}

pub fn random_author() -> String {
    use fake::Fake;
    use fake::faker::name::en::Name;

    Name().fake::<String>()
}

pub fn write_file(dir: &Path, relative_path: &str, content: &str) {
    let path = dir.join(relative_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

pub fn read_head(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(".git").join("HEAD")).expect("Failed to read HEAD")
}

pub fn top_commit_path(dir: &Path) -> PathBuf {
    dir.join(".git").join("TOPCOMMIT")
}

pub fn object_path(dir: &Path, oid: &str) -> PathBuf {
    let (fan_out, rest) = oid.split_at(2);
    dir.join(".git").join("objects").join(fan_out).join(rest)
}

pub fn read_object(dir: &Path, oid: &str) -> Vec<u8> {
    std::fs::read(object_path(dir, oid)).expect("Failed to read object")
}

pub fn assert_is_digest(candidate: &str) {
    assert_eq!(candidate.len(), 40, "not a digest: {candidate:?}");
    assert!(
        candidate
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
        "not a digest: {candidate:?}"
    );
}
