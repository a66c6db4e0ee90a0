use learndot_api::{Error, SearchQuery};

fn pairs(query: &SearchQuery) -> Vec<(String, String)> {
    query.to_query_pairs()
}

fn pair(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}

#[test]
fn search_query_defaults() {
    let query = SearchQuery::default();
    assert_eq!(query.page, None);
    assert_eq!(pairs(&query), vec![pair("asc", "false"), pair("or", "false")]);
}

#[test]
fn search_query_with_page_and_flags() {
    let query = SearchQuery::default()
        .with_page(3)
        .with_asc(true)
        .with_or(true);
    assert_eq!(
        pairs(&query),
        vec![pair("asc", "true"), pair("or", "true"), pair("page", "3")]
    );
}

#[test]
fn search_query_extra_params_follow_typed_ones() {
    let query = SearchQuery::default()
        .with_param("orderBy", "name")
        .unwrap()
        .with_param("fields", "id,email")
        .unwrap();
    assert_eq!(
        pairs(&query),
        vec![
            pair("asc", "false"),
            pair("or", "false"),
            pair("orderBy", "name"),
            pair("fields", "id,email"),
        ]
    );
}

#[test]
fn reserved_params_update_typed_fields() {
    let query = SearchQuery::default()
        .with_param("page", "4")
        .unwrap()
        .with_param("asc", "true")
        .unwrap()
        .with_param("or", "true")
        .unwrap();
    assert_eq!(query.page, Some(4));
    assert!(query.asc);
    assert!(query.or);
    assert!(query.params.is_empty());
}

#[test]
fn unparseable_reserved_params_are_rejected() {
    for (key, value) in [("page", "last"), ("page", "0"), ("asc", "yes"), ("or", "1")] {
        let err = SearchQuery::default().with_param(key, value).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "{}={}", key, value);
    }
}

#[test]
fn at_most_one_page_pair_is_sent() {
    let mut query = SearchQuery::default().with_page(2);
    query.params.push(pair("page", "last"));
    query.params.push(pair("asc", "maybe"));

    let sent = pairs(&query);
    assert_eq!(sent.iter().filter(|(k, _)| k == "page").count(), 1);
    assert_eq!(sent.iter().filter(|(k, _)| k == "asc").count(), 1);
    assert!(sent.contains(&pair("page", "2")));
}
