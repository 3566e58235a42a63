use std::time::{SystemTime, UNIX_EPOCH};

use cardsearch_core::dataset::{fetch, parse_dataset, DatasetSource, LoadError};

#[test]
fn parses_item_array() {
    let dataset = parse_dataset(
        r#"[
            {"nome": "Anubis", "descricao": "God of the dead", "tags": ["death", "jackal"], "link": "https://x"},
            {"nome": "Bastet", "descricao": "Cat goddess", "tags": ["cat"], "link": "https://y"}
        ]"#,
    )
    .unwrap();

    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.items()[0].nome, "Anubis");
    assert_eq!(dataset.items()[1].tags, vec!["cat".to_string()]);
}

#[test]
fn missing_optional_fields_default_and_bad_records_are_skipped() {
    let dataset = parse_dataset(
        r#"[
            {"nome": "Sem descricao", "link": "https://a"},
            {"descricao": "no name", "tags": [], "link": "https://b"},
            {"nome": "No link", "descricao": "", "tags": []},
            {"nome": "Wrong tags", "descricao": "", "tags": "oops", "link": "https://c"},
            {"nome": "Ok", "descricao": "fine", "tags": ["t"], "link": "https://d"}
        ]"#,
    )
    .unwrap();

    let names: Vec<&str> = dataset.items().iter().map(|item| item.nome.as_str()).collect();
    assert_eq!(names, vec!["Sem descricao", "Ok"]);
    assert_eq!(dataset.items()[0].descricao, "");
    assert!(dataset.items()[0].tags.is_empty());
}

#[test]
fn accepts_json5_input() {
    let dataset = parse_dataset(
        "[\n  // sacred animals\n  {nome: 'Bastet', descricao: 'Cat goddess', tags: ['cat',], link: 'https://y',},\n]",
    )
    .unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.items()[0].nome, "Bastet");
}

#[test]
fn rejects_malformed_and_non_array_documents() {
    assert!(matches!(parse_dataset("{{{"), Err(LoadError::Malformed(_))));
    assert!(matches!(
        parse_dataset(r#"{"nome": "Anubis"}"#),
        Err(LoadError::NotAnArray)
    ));
}

#[tokio::test]
async fn fetches_from_file() {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = std::env::temp_dir().join(format!("cardsearch-data-{unique}.json"));
    std::fs::write(
        &path,
        r#"[{"nome": "Anubis", "descricao": "God of the dead", "tags": ["jackal"], "link": "x"}]"#,
    )
    .unwrap();

    let dataset = fetch(&DatasetSource::File(path.clone())).await.unwrap();
    assert_eq!(dataset.len(), 1);

    std::fs::remove_file(path).unwrap();
}

#[tokio::test]
async fn missing_file_is_a_load_error() {
    let path = std::env::temp_dir().join("cardsearch-does-not-exist.json");
    let result = fetch(&DatasetSource::File(path)).await;
    assert!(matches!(result, Err(LoadError::Io { .. })));
}
