use serde::Deserialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Raw shape of one dataset entry as it appears in the JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemRecord {
    pub nome: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub nome: String,
    pub descricao: String,
    pub tags: Vec<String>,
    pub link: String,
    normalized_nome: String,
    normalized_descricao: String,
    normalized_tags: Vec<String>,
}

impl Item {
    pub fn new(nome: &str, descricao: &str, tags: &[&str], link: &str) -> Self {
        Self::from_record(ItemRecord {
            nome: nome.to_string(),
            descricao: descricao.to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            link: link.to_string(),
        })
    }

    pub fn from_record(record: ItemRecord) -> Self {
        let normalized_nome = normalize_for_search(&record.nome);
        let normalized_descricao = normalize_for_search(&record.descricao);
        let normalized_tags = record
            .tags
            .iter()
            .map(|tag| normalize_for_search(tag))
            .collect();
        Self {
            nome: record.nome,
            descricao: record.descricao,
            tags: record.tags,
            link: record.link,
            normalized_nome,
            normalized_descricao,
            normalized_tags,
        }
    }

    pub fn normalized_nome(&self) -> &str {
        &self.normalized_nome
    }

    pub fn normalized_descricao(&self) -> &str {
        &self.normalized_descricao
    }

    pub fn normalized_tags(&self) -> &[String] {
        &self.normalized_tags
    }
}

/// Items in load order. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    items: Vec<Item>,
}

impl Dataset {
    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Lowercases, decomposes to NFD and drops every combining mark, so "Café"
/// and "cafe" compare equal.
pub fn normalize_for_search(input: &str) -> String {
    input
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}
