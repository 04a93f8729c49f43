use rstest::rstest;
use stash_fs::{NormalizedPath, validate_path_identifier};

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("stash\\Attachments\\guid");
    assert_eq!(path.as_str(), "stash/Attachments/guid");
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("stash/Attachments");
    assert_eq!(base.join("guid").join("0.chunk").as_str(), "stash/Attachments/guid/0.chunk");
}

#[test]
fn test_parent_and_file_name() {
    let path = NormalizedPath::new("/stash/Attachments/guid/12.chunk");
    assert_eq!(path.file_name(), Some("12.chunk"));
    assert_eq!(path.extension(), Some("chunk"));
    assert_eq!(path.parent().unwrap().as_str(), "/stash/Attachments/guid");
}

#[test]
fn test_hidden_file_has_no_extension() {
    let path = NormalizedPath::new("/stash/FCM/.hidden");
    assert_eq!(path.extension(), None);
}

#[test]
fn test_is_network_path_unc() {
    assert!(NormalizedPath::new("//server/share/stash").is_network_path());
    assert!(!NormalizedPath::new("/home/user/stash").is_network_path());
}

#[rstest]
#[case("a/../b", "b")]
#[case("../a", "../a")]
#[case("../../store", "../../store")]
#[case("a/../../b", "../b")]
#[case("/a/b/../../c", "/c")]
#[case("/../c", "/c")]
#[case("a\\..\\b", "b")]
#[case("a/./b//c", "a/b/c")]
fn test_dot_segment_resolution(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(input).as_str(), expected);
}

#[rstest]
#[case("IMG_0001.HEIC")]
#[case("5B7A3C2E-1D4F-4A8B-9C6D-0E1F2A3B4C5D")]
#[case(".hidden")]
#[case("name with spaces.pdf")]
fn test_valid_identifiers(#[case] name: &str) {
    assert!(validate_path_identifier(name).is_ok());
}

#[rstest]
#[case("")]
#[case(".")]
#[case("..")]
#[case("../escape")]
#[case("nested/name")]
#[case("nested\\name")]
#[case("nul\0byte")]
fn test_invalid_identifiers(#[case] name: &str) {
    assert!(validate_path_identifier(name).is_err());
}

#[test]
fn test_relative_parent_base_keeps_pointing_outside_cwd() {
    let base = NormalizedPath::new("../store");
    assert_eq!(base.as_str(), "../store");
    assert_eq!(base.join("Attachments").as_str(), "../store/Attachments");
    assert_eq!(base.to_native(), std::path::PathBuf::from("../store"));
}
