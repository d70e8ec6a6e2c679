use coda_cli::query::QueryOptions;

#[test]
fn test_empty_options_only_request_column_names() {
    assert_eq!(QueryOptions::new().to_qualifier(), "?useColumnNames=true");
}

#[test]
fn test_single_option_is_appended() {
    let options = QueryOptions::new().limit(5);
    assert_eq!(options.to_qualifier(), "?useColumnNames=true&limit=5");
}

#[test]
fn test_many_options_joined_without_trailing_separator() {
    let options: QueryOptions = vec![("a", 1), ("b", 2)].into_iter().collect();
    let qualifier = options.to_qualifier();
    assert_eq!(qualifier, "?useColumnNames=true&a=1&b=2");
    assert!(!qualifier.ends_with('&'));
    assert!(!qualifier.contains("&&"));
}

#[test]
fn test_setting_an_option_twice_keeps_the_last_value() {
    let options = QueryOptions::new().limit(5).set("query", "x").limit(10);
    assert_eq!(options.to_qualifier(), "?useColumnNames=true&limit=10&query=x");
    assert_eq!(options.get("limit"), Some("10"));
}

#[test]
fn test_optional_limit() {
    assert!(QueryOptions::new().with_limit(None).is_empty());
    assert_eq!(
        QueryOptions::new().with_limit(Some(3)).to_qualifier(),
        "?useColumnNames=true&limit=3"
    );
}
