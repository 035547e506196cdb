use serde_json::json;

use crate::{document::ContentKind, models::domain::GeneratedContent};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// Notes with a heading, a summary line and two body lines
    pub fn notes_record(user_id: &str) -> GeneratedContent {
        GeneratedContent::new(
            user_id,
            ContentKind::Notes,
            "Photosynthesis",
            Some("Biology"),
            "beginner",
            json!("Photosynthesis\nHow plants make food\nChlorophyll absorbs light.\nKey Terms"),
        )
    }

    /// A two-question quiz as the provider would return it, fenced
    pub fn quiz_record(user_id: &str) -> GeneratedContent {
        GeneratedContent::new(
            user_id,
            ContentKind::Quiz,
            "Fractions",
            Some("Math"),
            "beginner",
            json!("```json\n{\"questions\":[{\"question\":\"1/2 + 1/2?\",\"options\":[\"1\",\"2\"],\"correctAnswer\":0,\"explanation\":\"Halves add to a whole.\"},{\"question\":\"Half of 4?\",\"options\":[\"2\",\"3\"],\"correctAnswer\":0}]}\n```"),
        )
    }

    pub fn mind_map_record(user_id: &str) -> GeneratedContent {
        GeneratedContent::new(
            user_id,
            ContentKind::Mindmap,
            "Cells",
            None,
            "intermediate",
            json!({ "central": "Cells", "branches": [{ "title": "Organelles", "items": ["Nucleus", "Mitochondria"] }] }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::document::{ContentShape, ExportFormat};

    #[test]
    fn test_fixtures_normalize_to_expected_shapes() {
        assert!(matches!(
            notes_record("u").normalized().shape(),
            ContentShape::FreeText { .. }
        ));

        match quiz_record("u").normalized().shape() {
            ContentShape::Quiz { questions } => assert_eq!(questions.len(), 2),
            other => panic!("unexpected shape {}", other.variant_name()),
        }

        assert!(matches!(
            mind_map_record("u").normalized().shape(),
            ContentShape::MindMap { .. }
        ));
    }

    #[test]
    fn test_fixtures_export_in_every_format() {
        for record in [notes_record("u"), quiz_record("u"), mind_map_record("u")] {
            for format in [ExportFormat::Pdf, ExportFormat::Docx] {
                let document =
                    crate::document::export(&record.normalized(), &record.topic, format)
                        .expect("fixture exports");
                assert!(!document.bytes.is_empty());
            }
        }
    }
}
