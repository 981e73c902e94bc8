use crate::error::{Error, ExtractError};
use crate::extraction::shared::{is_format_error, strip_suffix_ignore_case};
use crate::extraction::*;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Gzip-compress `content` in memory
fn gzip_bytes(content: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content).unwrap();
    encoder.finish().unwrap()
}

/// Build a tar archive in memory from `(path, content)` pairs
fn tar_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = ::tar::Builder::new(Vec::new());
    for (name, content) in files {
        let mut header = ::tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap()
}

/// Build a tar archive holding one member whose stored name is used verbatim
///
/// `Builder::append_data` refuses `..` components, so the header name is
/// written by hand.
fn tar_bytes_raw_name(name: &[u8], content: &[u8]) -> Vec<u8> {
    let mut header = ::tar::Header::new_gnu();
    header.as_old_mut().name[..name.len()].copy_from_slice(name);
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_entry_type(::tar::EntryType::Regular);
    header.set_cksum();

    let mut builder = ::tar::Builder::new(Vec::new());
    builder.append(&header, content).unwrap();
    builder.into_inner().unwrap()
}

fn write_file(path: &Path, content: &[u8]) {
    std::fs::write(path, content).unwrap();
}

// ---------------------------------------------------------------------------
// Suffix handling
// ---------------------------------------------------------------------------

#[test]
fn test_strip_suffix_ignore_case() {
    assert_eq!(strip_suffix_ignore_case("a.POMDP.gz", ".gz"), Some("a.POMDP"));
    assert_eq!(strip_suffix_ignore_case("a.POMDP.GZ", ".gz"), Some("a.POMDP"));
    assert_eq!(strip_suffix_ignore_case("x.Tar", ".tar"), Some("x"));
    assert_eq!(strip_suffix_ignore_case(".gz", ".gz"), Some(""));
    assert_eq!(strip_suffix_ignore_case("gz", ".gz"), None);
    assert_eq!(strip_suffix_ignore_case("a.tgz", ".tar"), None);
    assert_eq!(strip_suffix_ignore_case("é", ".gz"), None);
    // split point would land inside a multi-byte character
    assert_eq!(strip_suffix_ignore_case("éab", ".gz"), None);
}

#[test]
fn test_detect_gzip_files_skips_directories_and_other_files() {
    let temp_dir = TempDir::new().unwrap();
    write_file(&temp_dir.path().join("a.POMDP.gz"), b"");
    write_file(&temp_dir.path().join("B.POMDP.GZ"), b"");
    write_file(&temp_dir.path().join("c.POMDP"), b"");
    write_file(&temp_dir.path().join(".gz"), b"");
    std::fs::create_dir(temp_dir.path().join("dir.gz")).unwrap();

    let found = GzipExtractor::detect_gzip_files(temp_dir.path()).unwrap();

    assert_eq!(
        found,
        vec![
            temp_dir.path().join("B.POMDP.GZ"),
            temp_dir.path().join("a.POMDP.gz"),
        ]
    );
}

#[test]
fn test_detect_tar_files_skips_gzipped_and_directories() {
    let temp_dir = TempDir::new().unwrap();
    write_file(&temp_dir.path().join("ejs.tar"), b"");
    write_file(&temp_dir.path().join("Other.TAR"), b"");
    write_file(&temp_dir.path().join("x.tar.gz"), b"");
    write_file(&temp_dir.path().join(".tar"), b"");
    std::fs::create_dir(temp_dir.path().join("dir.tar")).unwrap();

    let found = TarExtractor::detect_tar_files(temp_dir.path()).unwrap();

    assert_eq!(
        found,
        vec![
            temp_dir.path().join("Other.TAR"),
            temp_dir.path().join("ejs.tar"),
        ]
    );
}

#[test]
fn test_format_error_kinds() {
    use std::io::{Error as IoError, ErrorKind};

    assert!(is_format_error(&IoError::new(ErrorKind::InvalidData, "corrupt deflate stream")));
    assert!(is_format_error(&IoError::new(ErrorKind::InvalidInput, "invalid gzip header")));
    assert!(is_format_error(&IoError::new(ErrorKind::UnexpectedEof, "truncated")));
    assert!(is_format_error(&IoError::other("numeric field was not a number")));

    assert!(!is_format_error(&IoError::new(ErrorKind::PermissionDenied, "denied")));
    assert!(!is_format_error(&IoError::new(ErrorKind::NotFound, "missing")));
    assert!(!is_format_error(&IoError::new(ErrorKind::StorageFull, "disk full")));
}

// ---------------------------------------------------------------------------
// Gzip pass
// ---------------------------------------------------------------------------

#[test]
fn test_gzip_round_trip_removes_original() {
    let temp_dir = TempDir::new().unwrap();
    let original = b"discount: 0.95\nvalues: reward\nstates: 3\n".repeat(100);
    write_file(
        &temp_dir.path().join("hallway.POMDP.gz"),
        &gzip_bytes(&original),
    );

    let outputs = GzipExtractor::decompress_all(temp_dir.path()).unwrap();

    let expected = temp_dir.path().join("hallway.POMDP");
    assert_eq!(outputs, vec![expected.clone()]);
    assert_eq!(std::fs::read(&expected).unwrap(), original);
    assert!(!temp_dir.path().join("hallway.POMDP.gz").exists());
}

#[test]
fn test_gzip_uppercase_suffix() {
    let temp_dir = TempDir::new().unwrap();
    write_file(&temp_dir.path().join("TIGER.GZ"), &gzip_bytes(b"tiger"));

    GzipExtractor::decompress_all(temp_dir.path()).unwrap();

    assert_eq!(std::fs::read(temp_dir.path().join("TIGER")).unwrap(), b"tiger");
    assert!(!temp_dir.path().join("TIGER.GZ").exists());
}

#[test]
fn test_gzip_overwrites_existing_output() {
    let temp_dir = TempDir::new().unwrap();
    write_file(&temp_dir.path().join("mit.POMDP"), b"stale partial");
    write_file(&temp_dir.path().join("mit.POMDP.gz"), &gzip_bytes(b"fresh"));

    GzipExtractor::decompress_all(temp_dir.path()).unwrap();

    assert_eq!(std::fs::read(temp_dir.path().join("mit.POMDP")).unwrap(), b"fresh");
}

#[test]
fn test_gzip_multi_member_stream() {
    let temp_dir = TempDir::new().unwrap();
    let mut joined = gzip_bytes(b"first half, ");
    joined.extend(gzip_bytes(b"second half"));
    write_file(&temp_dir.path().join("joined.gz"), &joined);

    GzipExtractor::decompress_all(temp_dir.path()).unwrap();

    assert_eq!(
        std::fs::read(temp_dir.path().join("joined")).unwrap(),
        b"first half, second half"
    );
}

#[test]
fn test_corrupt_gzip_is_fatal_and_keeps_original() {
    let temp_dir = TempDir::new().unwrap();
    let archive = temp_dir.path().join("broken.POMDP.gz");
    write_file(&archive, b"this is definitely not a gzip stream");

    let err = GzipExtractor::decompress_all(temp_dir.path()).unwrap_err();

    match err {
        Error::Extract(ExtractError::Decompress { archive: path, .. }) => {
            assert_eq!(path, archive)
        }
        other => panic!("expected Decompress error, got {:?}", other),
    }
    assert!(!temp_dir.path().join("broken.POMDP").exists());
    // Only the archive remains; no staged output is left behind
    let names: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("broken.POMDP.gz")]);
}

// ---------------------------------------------------------------------------
// Tar pass
// ---------------------------------------------------------------------------

#[test]
fn test_tar_expansion_completeness() {
    let temp_dir = TempDir::new().unwrap();
    let members: &[(&str, &str)] = &[
        ("toy/one.POMDP", "one"),
        ("toy/two.POMDP", "two"),
        ("toy/deeper/three.POMDP", "three"),
        ("README", "toy problems"),
    ];
    write_file(&temp_dir.path().join("toy.tar"), &tar_bytes(members));

    let outputs = TarExtractor::unpack_all(temp_dir.path()).unwrap();

    assert_eq!(outputs.len(), members.len());
    for (name, content) in members {
        let path = temp_dir.path().join(name);
        assert!(path.is_file(), "{} should exist", name);
        assert_eq!(std::fs::read(&path).unwrap(), content.as_bytes());
    }
    assert!(!temp_dir.path().join("toy.tar").exists());
}

#[test]
fn test_tar_last_member_wins() {
    let temp_dir = TempDir::new().unwrap();
    write_file(&temp_dir.path().join("dup.POMDP"), b"pre-existing");
    write_file(
        &temp_dir.path().join("dups.tar"),
        &tar_bytes(&[("dup.POMDP", "first"), ("dup.POMDP", "second")]),
    );

    TarExtractor::unpack_all(temp_dir.path()).unwrap();

    assert_eq!(
        std::fs::read(temp_dir.path().join("dup.POMDP")).unwrap(),
        b"second"
    );
}

#[test]
fn test_tar_dot_prefixed_members_reported_relative() {
    let temp_dir = TempDir::new().unwrap();
    write_file(
        &temp_dir.path().join("dot.tar"),
        &tar_bytes(&[("./ejs/a.POMDP", "a")]),
    );

    let outputs = TarExtractor::unpack_all(temp_dir.path()).unwrap();

    assert_eq!(outputs, vec![temp_dir.path().join("ejs").join("a.POMDP")]);
    assert!(outputs[0].is_file());
}

#[test]
fn test_tar_parent_dir_member_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let dataset_dir = temp_dir.path().join("cassandra");
    std::fs::create_dir(&dataset_dir).unwrap();
    let archive = dataset_dir.join("escape.tar");
    write_file(&archive, &tar_bytes_raw_name(b"../escaped.POMDP", b"outside"));

    let outputs = TarExtractor::unpack_all(&dataset_dir).unwrap();

    assert!(outputs.is_empty());
    assert!(!temp_dir.path().join("escaped.POMDP").exists());
    assert!(!archive.exists());
    assert_eq!(std::fs::read_dir(&dataset_dir).unwrap().count(), 0);
}

#[test]
fn test_tar_unwritable_destination_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let archive = temp_dir.path().join("ejs.tar");
    write_file(&archive, &tar_bytes(&[("ejs/a.POMDP", "a")]));
    // a regular file where the destination directory should be
    let dest = temp_dir.path().join("not-a-dir");
    write_file(&dest, b"");

    let err = TarExtractor::unpack(&archive, &dest).unwrap_err();

    assert!(matches!(err, Error::Io { .. }), "got {:?}", err);
    assert!(archive.exists());
}

#[test]
fn test_malformed_tar_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let archive = temp_dir.path().join("junk.tar");
    write_file(&archive, &[0xAB; 1024]);

    let err = TarExtractor::unpack_all(temp_dir.path()).unwrap_err();

    match err {
        Error::Extract(ExtractError::MalformedArchive { archive: path, .. }) => {
            assert_eq!(path, archive)
        }
        other => panic!("expected MalformedArchive error, got {:?}", other),
    }
    assert!(archive.exists());
}

#[test]
fn test_tar_pass_ignores_gzipped_tar() {
    let temp_dir = TempDir::new().unwrap();
    write_file(
        &temp_dir.path().join("x.tar.gz"),
        &gzip_bytes(&tar_bytes(&[("member.POMDP", "m")])),
    );

    let outputs = TarExtractor::unpack_all(temp_dir.path()).unwrap();

    assert!(outputs.is_empty());
    assert!(temp_dir.path().join("x.tar.gz").exists());
}

// ---------------------------------------------------------------------------
// Both passes
// ---------------------------------------------------------------------------

#[test]
fn test_extract_all_runs_gzip_before_tar() {
    let temp_dir = TempDir::new().unwrap();
    write_file(
        &temp_dir.path().join("x.tar.gz"),
        &gzip_bytes(&tar_bytes(&[
            ("x/alpha.POMDP", "alpha"),
            ("x/beta.POMDP", "beta"),
        ])),
    );
    write_file(&temp_dir.path().join("plain.POMDP"), b"plain");

    let summary = extract_all(temp_dir.path()).unwrap();

    assert_eq!(summary.decompressed, vec![temp_dir.path().join("x.tar")]);
    assert_eq!(summary.unpacked.len(), 2);
    assert!(!temp_dir.path().join("x.tar.gz").exists());
    assert!(!temp_dir.path().join("x.tar").exists());
    assert_eq!(
        std::fs::read(temp_dir.path().join("x/alpha.POMDP")).unwrap(),
        b"alpha"
    );
    assert_eq!(
        std::fs::read(temp_dir.path().join("plain.POMDP")).unwrap(),
        b"plain"
    );
}

#[test]
fn test_extract_all_is_noop_on_extracted_tree() {
    let temp_dir = TempDir::new().unwrap();
    write_file(&temp_dir.path().join("a.POMDP"), b"a");
    std::fs::create_dir(temp_dir.path().join("sub")).unwrap();

    let summary = extract_all(temp_dir.path()).unwrap();

    assert_eq!(summary, ExtractSummary::default());
    assert_eq!(std::fs::read(temp_dir.path().join("a.POMDP")).unwrap(), b"a");
}

#[tokio::test]
async fn test_extract_all_blocking() {
    let temp_dir = TempDir::new().unwrap();
    write_file(&temp_dir.path().join("a.POMDP.gz"), &gzip_bytes(b"a"));

    let summary = extract_all_blocking(temp_dir.path().to_path_buf())
        .await
        .unwrap();

    assert_eq!(summary.decompressed, vec![temp_dir.path().join("a.POMDP")]);
    assert!(summary.unpacked.is_empty());
}

#[test]
fn test_missing_directory_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");

    let err = extract_all(&missing).unwrap_err();

    assert!(matches!(err, Error::Io { path, .. } if path == missing));
}
