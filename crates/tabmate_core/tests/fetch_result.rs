use pretty_assertions::assert_eq;
use serde_json::json;
use tabmate_core::{FetchResult, TabRecord};

#[test]
fn success_serializes_as_bare_record() {
    let result = FetchResult::Success(
        TabRecord::new("abc", "Docs", "https://docs.example.com", "Technical Documentation")
            .with_favicon("https://docs.example.com/favicon.ico"),
    );

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "id": "abc",
            "title": "Docs",
            "url": "https://docs.example.com",
            "category": "Technical Documentation",
            "favicon": "https://docs.example.com/favicon.ico"
        })
    );
}

#[test]
fn record_without_favicon_omits_the_key() {
    let record = TabRecord::new("1", "t", "https://a.example", "Other");
    let value = serde_json::to_value(&record).unwrap();
    assert!(value.get("favicon").is_none());
}

#[test]
fn failure_serializes_with_error_status() {
    let result = FetchResult::failure("https://gone.example", "Request failed: http status 404");

    assert_eq!(result.url(), "https://gone.example");
    assert!(!result.is_success());
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "status": "error",
            "message": "Request failed: http status 404",
            "url": "https://gone.example"
        })
    );
}

#[test]
fn untagged_json_reads_back_into_the_right_variant() {
    let failure: FetchResult = serde_json::from_value(json!({
        "status": "error", "message": "boom", "url": "https://x.example"
    }))
    .unwrap();
    let success: FetchResult = serde_json::from_value(json!({
        "id": "1", "title": "t", "url": "https://y.example", "category": "Other"
    }))
    .unwrap();

    assert!(!failure.is_success());
    assert_eq!(success.as_record().map(|r| r.url.as_str()), Some("https://y.example"));
}
