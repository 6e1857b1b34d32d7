use prefect_fs::{NormalizedPath, relative_to};
use rstest::rstest;
use std::path::Path;

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("foo\\bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("foo/bar");
    assert_eq!(base.join("baz").as_str(), "foo/bar/baz");
    assert_eq!(NormalizedPath::new("").join("baz").as_str(), "baz");
}

#[test]
fn test_parent() {
    let path = NormalizedPath::new("foo/bar/baz");
    assert_eq!(path.parent().unwrap().as_str(), "foo/bar");
    assert!(NormalizedPath::new("foo").parent().is_none());
}

#[rstest]
#[case("foo/bar/baz.txt", Some("baz.txt"), Some("baz"), Some("txt"))]
#[case("src/Bonsai.Core.csproj", Some("Bonsai.Core.csproj"), Some("Bonsai.Core"), Some("csproj"))]
#[case(".gitignore", Some(".gitignore"), Some(".gitignore"), None)]
#[case("LICENSE", Some("LICENSE"), Some("LICENSE"), None)]
fn test_name_components(
    #[case] input: &str,
    #[case] name: Option<&str>,
    #[case] stem: Option<&str>,
    #[case] extension: Option<&str>,
) {
    let path = NormalizedPath::new(input);
    assert_eq!(path.file_name(), name);
    assert_eq!(path.file_stem(), stem);
    assert_eq!(path.extension(), extension);
}

#[rstest]
#[case("src/foo.csproj", "src", true)]
#[case("src/foo.csproj", "src/", true)]
#[case("srcs/foo.csproj", "src", false)]
#[case("src", "src", false)]
#[case("anything", "", true)]
fn test_is_under(#[case] path: &str, #[case] prefix: &str, #[case] expected: bool) {
    assert_eq!(NormalizedPath::new(path).is_under(prefix), expected);
}

#[test]
fn test_relative_to() {
    let base = Path::new("/repo");
    let rel = relative_to(base, Path::new("/repo/build/Common.props")).unwrap();
    assert_eq!(rel, "build/Common.props");
}

#[test]
fn test_relative_to_outside_base_fails() {
    let result = relative_to(Path::new("/repo"), Path::new("/other/file"));
    assert!(matches!(result, Err(prefect_fs::Error::NotRelative { .. })));
}
