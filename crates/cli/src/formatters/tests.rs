use std::collections::BTreeMap;

use super::*;

fn sample() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("db.host".to_string(), "localhost".to_string()),
        ("app.name".to_string(), "brewery".to_string()),
    ])
}

#[test]
fn test_output_format_parsing() {
    assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
    assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
    assert!(OutputFormat::from_str("xml").is_err());
}

#[test]
fn test_text_properties_are_sorted_key_value_lines() {
    let output = TextFormatter.format_properties(&sample()).unwrap();
    assert_eq!(output, "app.name=brewery\ndb.host=localhost\n");
}

#[test]
fn test_text_empty_file_list_is_human_message() {
    let output = TextFormatter.format_files(&[]).unwrap();
    assert_eq!(output, "No property files found.\n");
}

#[test]
fn test_text_file_list_is_tab_separated() {
    let files = vec![FileSummary {
        file: "app.properties".to_string(),
        keys: 3,
    }];
    let output = TextFormatter.format_files(&files).unwrap();
    assert_eq!(output, "FILE\tKEYS\napp.properties\t3\n");
}

#[test]
fn test_json_empty_results_are_valid() {
    let files: serde_json::Value =
        serde_json::from_str(&JsonFormatter.format_files(&[]).unwrap()).unwrap();
    assert_eq!(files, serde_json::json!([]));

    let props: serde_json::Value =
        serde_json::from_str(&JsonFormatter.format_properties(&BTreeMap::new()).unwrap()).unwrap();
    assert_eq!(props, serde_json::json!({}));
}

#[test]
fn test_json_value_names_key() {
    let output = JsonFormatter.format_value("db.host", "localhost").unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["key"], "db.host");
    assert_eq!(parsed["value"], "localhost");
}
