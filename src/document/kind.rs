use std::{fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The four kinds of study material the generator produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Notes,
    Quiz,
    Mindmap,
    Handout,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Notes,
        ContentKind::Quiz,
        ContentKind::Mindmap,
        ContentKind::Handout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Notes => "notes",
            ContentKind::Quiz => "quiz",
            ContentKind::Mindmap => "mindmap",
            ContentKind::Handout => "handout",
        }
    }

    /// Notes and handouts are free text; quizzes and mind maps are JSON payloads.
    pub fn is_free_text(&self) -> bool {
        matches!(self, ContentKind::Notes | ContentKind::Handout)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "notes" => Ok(ContentKind::Notes),
            "quiz" => Ok(ContentKind::Quiz),
            "mindmap" | "mind_map" | "mind-map" => Ok(ContentKind::Mindmap),
            "handout" => Ok(ContentKind::Handout),
            other => Err(format!("Unknown content kind '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_kind_round_trip_serialization() {
        for kind in ContentKind::ALL {
            let json = serde_json::to_string(&kind).expect("kind should serialize");
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let parsed: ContentKind = serde_json::from_str(&json).expect("kind should deserialize");
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn content_kind_rejects_unknown_variant() {
        assert!(serde_json::from_str::<ContentKind>("\"essay\"").is_err());
        assert!("essay".parse::<ContentKind>().is_err());
    }

    #[test]
    fn content_kind_parses_loosely() {
        assert_eq!("  Quiz ".parse::<ContentKind>(), Ok(ContentKind::Quiz));
        assert_eq!("mind-map".parse::<ContentKind>(), Ok(ContentKind::Mindmap));
    }

    #[test]
    fn only_notes_and_handouts_are_free_text() {
        assert!(ContentKind::Notes.is_free_text());
        assert!(ContentKind::Handout.is_free_text());
        assert!(!ContentKind::Quiz.is_free_text());
        assert!(!ContentKind::Mindmap.is_free_text());
    }
}
