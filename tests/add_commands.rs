use assert_fs::fixture::{FileWriteStr, PathChild};
use fake::Fake;
use fake::faker::lorem::en::Words;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

mod common;

// `git hash-object` of a file containing "hello\n"
const HELLO_BLOB_SHA1: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

#[test]
fn add_writes_the_blob_and_one_index_line() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::run_gitus(dir.path(), &["init"]).assert().success();

    dir.child("letters.txt").write_str("hello\n")?;

    common::run_gitus(dir.path(), &["add", "letters.txt"])
        .assert()
        .success();

    // the index holds exactly one NUL-delimited record
    let index_content = std::fs::read_to_string(dir.path().join(".git/index"))?;
    assert_eq!(index_content, format!("letters.txt\0{HELLO_BLOB_SHA1}\n"));

    // the blob landed in the fan-out store, header-prefixed
    let stored = common::read_object(dir.path(), HELLO_BLOB_SHA1);
    assert_eq!(&stored[..], &b"blob 6\0hello\n"[..]);

    Ok(())
}

#[test]
fn add_stages_files_from_nested_directories() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::run_gitus(dir.path(), &["init"]).assert().success();

    let content = Words(5..10).fake::<Vec<String>>().join(" ");
    common::write_file(dir.path(), "testfolder1/letters.txt", &content);

    common::run_gitus(dir.path(), &["add", "testfolder1/letters.txt"])
        .assert()
        .success();

    let index_content = std::fs::read_to_string(dir.path().join(".git/index"))?;
    let (path, digest) = index_content
        .trim_end_matches('\n')
        .split_once('\0')
        .expect("index line has no separator");
    assert_eq!(path, "testfolder1/letters.txt");
    common::assert_is_digest(digest);

    // the staged digest names a stored object
    assert!(common::object_path(dir.path(), digest).is_file());

    Ok(())
}

#[test]
fn adding_the_same_path_twice_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::run_gitus(dir.path(), &["init"]).assert().success();

    dir.child("letters.txt").write_str("hello\n")?;

    common::run_gitus(dir.path(), &["add", "letters.txt"])
        .assert()
        .success();

    common::run_gitus(dir.path(), &["add", "letters.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already staged"));

    Ok(())
}

#[test]
fn adding_a_missing_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::run_gitus(dir.path(), &["init"]).assert().success();

    common::run_gitus(dir.path(), &["add", "ghost.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));

    Ok(())
}

#[test]
fn add_without_a_repository_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    dir.child("letters.txt").write_str("hello\n")?;

    common::run_gitus(dir.path(), &["add", "letters.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no repository"));

    Ok(())
}

#[test]
fn add_without_a_pathspec_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::run_gitus(dir.path(), &["init"]).assert().success();

    common::run_gitus(dir.path(), &["add"]).assert().failure();

    Ok(())
}
