use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: usize,
    pub canonical_name: String,
    pub display_label: String,
}

impl Category {
    pub fn new(id: usize, canonical_name: &str, display_label: &str) -> Self {
        Self {
            id,
            canonical_name: canonical_name.to_string(),
            display_label: display_label.to_string(),
        }
    }

    /// Stand-in for an index the backend knows about but the table does not.
    pub fn placeholder(index: usize) -> Self {
        Self {
            id: index,
            canonical_name: format!("class_{}", index),
            display_label: format!("Class {}", index),
        }
    }

    pub fn translation_key(&self) -> String {
        format!("categories.{}", self.id)
    }
}

/// Fixed category enumeration, built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The seven PACS classes the LFME models are trained on.
    pub fn pacs() -> Self {
        Self::new(vec![
            Category::new(0, "dog", "🐕 dog"),
            Category::new(1, "elephant", "🐘 elephant"),
            Category::new(2, "giraffe", "🦒 giraffe"),
            Category::new(3, "guitar", "🎸 guitar"),
            Category::new(4, "horse", "🐎 horse"),
            Category::new(5, "house", "🏠 house"),
            Category::new(6, "person", "👤 person"),
        ])
    }

    pub fn get(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::pacs()
    }
}

/// The four PACS style domains a model can be evaluated against.
pub const PACS_DOMAINS: [&str; 4] = ["art_painting", "cartoon", "photo", "sketch"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacs_table_is_indexed_by_id() {
        let table = CategoryTable::pacs();
        assert_eq!(table.len(), 7);
        for (index, category) in table.iter().enumerate() {
            assert_eq!(category.id, index);
        }
        assert_eq!(table.get(4).map(|c| c.canonical_name.as_str()), Some("horse"));
        assert!(table.get(7).is_none());
    }

    #[test]
    fn placeholder_keeps_the_backend_index() {
        let placeholder = Category::placeholder(9);
        assert_eq!(placeholder.id, 9);
        assert_eq!(placeholder.display_label, "Class 9");
        assert_eq!(placeholder.translation_key(), "categories.9");
    }
}
