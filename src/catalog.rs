use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub name: String,
    pub section_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub solution: String,
    pub logic_explanation: String,
    pub topic_id: i64,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only content store, loaded once at startup from a JSON seed file.
/// Sections, topics and questions form a strict tree; writes happen through
/// administrative tooling outside this service.
#[derive(Debug, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    sections: Vec<Section>,
    #[serde(default)]
    topics: Vec<Topic>,
    #[serde(default)]
    questions: Vec<Question>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Catalog, CatalogError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Topics owned by `section_id`. An unknown id is not an error, just an
    /// empty list.
    pub fn topics_of(&self, section_id: i64) -> Vec<Topic> {
        self.topics
            .iter()
            .filter(|t| t.section_id == section_id)
            .cloned()
            .collect()
    }

    /// Questions owned by `topic_id`, same contract as [`topics_of`].
    ///
    /// [`topics_of`]: Catalog::topics_of
    pub fn questions_of(&self, topic_id: i64) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.topic_id == topic_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        serde_json::from_str(
            r#"{
                "sections": [
                    {"id": 1, "name": "Basics"},
                    {"id": 2, "name": "Collections"}
                ],
                "topics": [
                    {"id": 10, "name": "Loops", "section_id": 1},
                    {"id": 11, "name": "Branching", "section_id": 1},
                    {"id": 12, "name": "Lists", "section_id": 2}
                ],
                "questions": [
                    {
                        "id": 100,
                        "title": "Sum 1..n",
                        "description": "Print the sum of 1..n.",
                        "solution": "for loop",
                        "logic_explanation": "accumulate",
                        "topic_id": 10
                    },
                    {
                        "id": 101,
                        "title": "FizzBuzz",
                        "description": "The classic.",
                        "solution": "modulo",
                        "logic_explanation": "cycle of 15",
                        "topic_id": 10
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn lists_all_sections() {
        let catalog = sample();
        let names: Vec<_> = catalog.sections().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Basics", "Collections"]);
    }

    #[test]
    fn topics_are_filtered_by_section() {
        let catalog = sample();
        let topics = catalog.topics_of(1);
        assert_eq!(topics.len(), 2);
        assert!(topics.iter().all(|t| t.section_id == 1));
    }

    #[test]
    fn questions_are_filtered_by_topic() {
        let catalog = sample();
        let questions = catalog.questions_of(10);
        assert_eq!(questions.len(), 2);
        assert!(catalog.questions_of(12).is_empty());
    }

    #[test]
    fn unknown_parent_ids_yield_empty_lists() {
        let catalog = sample();
        assert!(catalog.topics_of(999).is_empty());
        assert!(catalog.questions_of(999).is_empty());
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let catalog: Catalog = serde_json::from_str("{}").unwrap();
        assert!(catalog.sections().is_empty());
        assert!(catalog.topics_of(1).is_empty());
    }
}
