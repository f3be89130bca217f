//! Tests for mapping request paths onto the web root

use std::fs;
use tempfile::TempDir;
use webroot::files::{FileError, LocationKind, PathResolver};

/// Lays out:
///
/// ```text
/// <tmp>/secret.txt
/// <tmp>/webroot/a_web_page.html
/// <tmp>/webroot/images/sample_1.png
/// ```
fn fixture() -> (TempDir, PathResolver) {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("secret.txt"), "top secret").unwrap();

    let root = tmp.path().join("webroot");
    fs::create_dir_all(root.join("images")).unwrap();
    fs::write(root.join("a_web_page.html"), "<html></html>").unwrap();
    fs::write(root.join("images").join("sample_1.png"), [0x89, b'P', b'N', b'G']).unwrap();

    let resolver = PathResolver::new(&root).unwrap();
    (tmp, resolver)
}

#[test]
fn test_resolver_rejects_missing_root() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(PathResolver::new(tmp.path().join("absent")).is_err());
}

#[test]
fn test_resolver_rejects_file_as_root() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("file.txt");
    fs::write(&file, "x").unwrap();

    assert!(PathResolver::new(&file).is_err());
}

#[test]
fn test_resolver_root_is_canonical() {
    let (tmp, resolver) = fixture();
    let expected = tmp.path().join("webroot").canonicalize().unwrap();

    assert_eq!(resolver.root(), expected.as_path());
}

#[tokio::test]
async fn test_resolve_file() {
    let (_tmp, resolver) = fixture();
    let location = resolver.resolve("/a_web_page.html").await.unwrap();

    assert_eq!(location.kind, LocationKind::File);
    assert_eq!(location.path, resolver.root().join("a_web_page.html"));
}

#[tokio::test]
async fn test_resolve_nested_file() {
    let (_tmp, resolver) = fixture();
    let location = resolver.resolve("/images/sample_1.png").await.unwrap();

    assert_eq!(location.kind, LocationKind::File);
    assert_eq!(location.path, resolver.root().join("images").join("sample_1.png"));
}

#[tokio::test]
async fn test_resolve_root_directory() {
    let (_tmp, resolver) = fixture();

    for path in ["/", ""] {
        let location = resolver.resolve(path).await.unwrap();
        assert_eq!(location.kind, LocationKind::Directory);
        assert_eq!(location.path, resolver.root());
    }
}

#[tokio::test]
async fn test_resolve_subdirectory() {
    let (_tmp, resolver) = fixture();
    let location = resolver.resolve("/images").await.unwrap();

    assert_eq!(location.kind, LocationKind::Directory);
}

#[tokio::test]
async fn test_resolve_without_leading_slash() {
    let (_tmp, resolver) = fixture();
    let location = resolver.resolve("a_web_page.html").await.unwrap();

    assert_eq!(location.kind, LocationKind::File);
}

#[tokio::test]
async fn test_resolve_missing_is_not_found() {
    let (_tmp, resolver) = fixture();
    let err = resolver.resolve("/missing.html").await.unwrap_err();

    assert!(matches!(err, FileError::NotFound));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_resolve_nul_byte_is_not_found() {
    let (_tmp, resolver) = fixture();
    let err = resolver.resolve("/a_web_page.html\0.png").await.unwrap_err();

    assert!(matches!(err, FileError::NotFound));
}

#[tokio::test]
async fn test_resolve_dot_segments_inside_root() {
    let (_tmp, resolver) = fixture();
    let location = resolver
        .resolve("/images/../a_web_page.html")
        .await
        .unwrap();

    assert_eq!(location.path, resolver.root().join("a_web_page.html"));
}

#[tokio::test]
async fn test_resolve_parent_traversal_to_existing_file_is_rejected() {
    let (_tmp, resolver) = fixture();

    for path in [
        "/../secret.txt",
        "../secret.txt",
        "/images/../../secret.txt",
        "/./../secret.txt",
    ] {
        let err = resolver.resolve(path).await.unwrap_err();
        assert!(matches!(err, FileError::OutsideRoot), "path {}", path);
        assert!(err.is_not_found());
    }
}

#[tokio::test]
async fn test_resolve_parent_of_root_is_rejected() {
    let (_tmp, resolver) = fixture();
    let err = resolver.resolve("/..").await.unwrap_err();

    assert!(matches!(err, FileError::OutsideRoot));
}

#[tokio::test]
async fn test_resolve_absolute_path_is_rejected() {
    let (tmp, resolver) = fixture();
    let secret = tmp.path().join("secret.txt").canonicalize().unwrap();

    // One leading slash is stripped, the next makes the remainder absolute
    let request_path = format!("/{}", secret.display());
    let err = resolver.resolve(&request_path).await.unwrap_err();

    assert!(matches!(err, FileError::OutsideRoot));
}

#[tokio::test]
async fn test_resolve_traversal_to_missing_file_is_not_found() {
    let (_tmp, resolver) = fixture();
    let err = resolver.resolve("/../does-not-exist.txt").await.unwrap_err();

    assert!(err.is_not_found());
}

#[cfg(unix)]
#[tokio::test]
async fn test_resolve_symlink_inside_root_is_followed() {
    let (_tmp, resolver) = fixture();
    std::os::unix::fs::symlink(
        resolver.root().join("a_web_page.html"),
        resolver.root().join("alias.html"),
    )
    .unwrap();

    let location = resolver.resolve("/alias.html").await.unwrap();

    assert_eq!(location.kind, LocationKind::File);
    assert_eq!(location.path, resolver.root().join("a_web_page.html"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_resolve_symlink_escaping_root_is_rejected() {
    let (tmp, resolver) = fixture();
    std::os::unix::fs::symlink(
        tmp.path().join("secret.txt"),
        resolver.root().join("leak.txt"),
    )
    .unwrap();

    let err = resolver.resolve("/leak.txt").await.unwrap_err();

    assert!(matches!(err, FileError::OutsideRoot));
}
