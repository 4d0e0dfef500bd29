//! Tests for request target resolution against a document root

use docroot::static_files::PathResolver;
use std::fs;
use tempfile::TempDir;

/// Layout:
/// ```text
/// <tmp>/secret.txt
/// <tmp>/www/index.html
/// <tmp>/www/base.css
/// <tmp>/www/app/index.html
/// <tmp>/www/empty/
/// ```
fn fixture() -> (TempDir, PathResolver) {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("www");
    fs::create_dir_all(root.join("app")).unwrap();
    fs::create_dir_all(root.join("empty")).unwrap();
    fs::write(root.join("index.html"), "<h1>hi</h1>").unwrap();
    fs::write(root.join("base.css"), "body {}").unwrap();
    fs::write(root.join("app").join("index.html"), "<p>app</p>").unwrap();
    fs::write(tmp.path().join("secret.txt"), "secret").unwrap();

    let resolver = PathResolver::new(root, "index.html");
    (tmp, resolver)
}

#[tokio::test]
async fn test_existing_file() {
    let (_tmp, resolver) = fixture();
    let resolved = resolver.resolve("/base.css").await;

    assert!(resolved.exists);
    assert!(!resolved.redirect);
    assert_eq!(resolved.path, resolver.root().join("base.css"));
}

#[tokio::test]
async fn test_root_serves_index() {
    let (_tmp, resolver) = fixture();
    let resolved = resolver.resolve("/").await;

    assert!(resolved.exists);
    assert!(!resolved.redirect);
    assert_eq!(resolved.path.file_name().unwrap(), "index.html");
    assert_eq!(fs::read_to_string(&resolved.path).unwrap(), "<h1>hi</h1>");
}

#[tokio::test]
async fn test_directory_with_trailing_slash_serves_index() {
    let (_tmp, resolver) = fixture();
    let resolved = resolver.resolve("/app/").await;

    assert!(resolved.exists);
    assert!(!resolved.redirect);
    assert_eq!(fs::read_to_string(&resolved.path).unwrap(), "<p>app</p>");
}

#[tokio::test]
async fn test_directory_without_trailing_slash_redirects() {
    let (_tmp, resolver) = fixture();

    assert!(resolver.resolve("/app").await.redirect);
    // Redirect depends on the directory, not on the index file.
    assert!(resolver.resolve("/empty").await.redirect);
}

#[tokio::test]
async fn test_directory_without_index() {
    let (_tmp, resolver) = fixture();
    let resolved = resolver.resolve("/empty/").await;

    assert!(!resolved.exists);
    assert!(!resolved.redirect);
}

#[tokio::test]
async fn test_missing_file_is_not_a_redirect() {
    let (_tmp, resolver) = fixture();
    let resolved = resolver.resolve("/missing.txt").await;

    assert!(!resolved.exists);
    assert!(!resolved.redirect);
}

#[tokio::test]
async fn test_file_with_trailing_slash_does_not_exist() {
    let (_tmp, resolver) = fixture();
    let resolved = resolver.resolve("/base.css/").await;

    assert!(!resolved.exists);
    assert!(!resolved.redirect);
    assert_eq!(resolved.path, resolver.root().join("base.css").join("index.html"));
}

#[test]
fn test_root_is_canonicalised_once() {
    let (tmp, resolver) = fixture();
    let expected = fs::canonicalize(tmp.path().join("www")).unwrap();
    assert_eq!(resolver.canonical_root(), Some(expected.as_path()));

    let indirect = PathResolver::new(tmp.path().join("www").join("app").join(".."), "index.html");
    assert_eq!(indirect.canonical_root(), Some(expected.as_path()));
}

#[tokio::test]
async fn test_query_string_is_ignored() {
    let (_tmp, resolver) = fixture();
    let resolved = resolver.resolve("/base.css?v=3").await;

    assert!(resolved.exists);
    assert_eq!(resolved.path, resolver.root().join("base.css"));
}

#[tokio::test]
async fn test_parent_segments_stay_inside_root() {
    let (_tmp, resolver) = fixture();

    assert!(!resolver.resolve("/../secret.txt").await.exists);
    assert!(!resolver.resolve("/app/../../secret.txt").await.exists);
    assert!(!resolver.resolve("/..%2Fsecret.txt").await.exists);

    let inside = resolver.resolve("/app/../base.css").await;
    assert!(inside.exists);
    assert_eq!(inside.path, resolver.root().join("base.css"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_out_of_root_is_rejected() {
    let (tmp, resolver) = fixture();
    std::os::unix::fs::symlink(tmp.path().join("secret.txt"), resolver.root().join("link.txt"))
        .unwrap();
    std::os::unix::fs::symlink(tmp.path(), resolver.root().join("up")).unwrap();

    assert!(!resolver.resolve("/link.txt").await.exists);
    assert!(!resolver.resolve("/up").await.redirect);
    assert!(!resolver.resolve("/up/secret.txt").await.exists);
}

#[tokio::test]
async fn test_missing_root() {
    let resolver = PathResolver::new("/definitely/not/a/real/root", "index.html");
    assert!(resolver.canonical_root().is_none());

    let resolved = resolver.resolve("/").await;

    assert!(!resolved.exists);
    assert!(!resolved.redirect);
}
