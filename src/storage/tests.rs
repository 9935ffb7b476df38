use chrono::Utc;

use super::blob_store::{FileReference, StoredBlob, generate_object_key};

#[test]
fn test_object_keys_are_unique() {
    let a = generate_object_key(None);
    let b = generate_object_key(None);
    assert_ne!(a, b);
}

#[test]
fn test_object_key_keeps_extension() {
    let key = generate_object_key(Some("png"));
    assert!(key.ends_with(".png"));
}

#[test]
fn test_object_key_tolerates_missing_extension() {
    assert!(!generate_object_key(None).contains('.'));
    assert!(!generate_object_key(Some("")).contains('.'));
}

#[test]
fn test_extension_of() {
    assert_eq!(FileReference::extension_of("report.txt"), Some("txt"));
    assert_eq!(FileReference::extension_of("archive.tar.gz"), Some("gz"));
    assert_eq!(FileReference::extension_of("noext"), None);
    assert_eq!(FileReference::extension_of("trailing."), None);
}

#[test]
fn test_file_reference_serialization_shape() {
    let expires_at = Utc::now();
    let reference = FileReference::new(
        "report.txt",
        "text/plain",
        StoredBlob {
            locator: "gs://bucket-a/abc.txt".to_string(),
            access_url: "https://storage.example.com/bucket-a/abc.txt?sig=x".to_string(),
            expires_at,
        },
    );

    let value = serde_json::to_value(&reference).unwrap();
    assert_eq!(value["filename"], "report.txt");
    assert_eq!(value["content_type"], "text/plain");
    assert_eq!(value["storage_path"], "gs://bucket-a/abc.txt");
    assert!(value["signed_url"].as_str().unwrap().starts_with("https://"));
    // chrono serializes the expiry as an RFC 3339 timestamp
    assert!(value["url_expiry"].as_str().unwrap().contains('T'));
}
