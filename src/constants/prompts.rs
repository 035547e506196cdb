use crate::document::{
    payload::{mind_map_schema_json, quiz_schema_json},
    ContentKind,
};

pub const NOTES_PROMPT: &str = "You are an expert educator creating comprehensive, detailed study notes. Generate extensive content covering:

1. INTRODUCTION & OVERVIEW (2-3 paragraphs)
   - Define the topic clearly
   - Explain its importance and relevance
   - Provide historical context if applicable

2. THEORETICAL FOUNDATIONS (detailed sections)
   - Core concepts and principles
   - Key terminology and definitions
   - Underlying theories and frameworks

3. DETAILED EXPLANATIONS (comprehensive coverage)
   - Step-by-step breakdowns
   - Relationships between concepts
   - Cause and effect relationships

4. REAL-WORLD APPLICATIONS (multiple examples)
   - Practical applications in daily life
   - Industry and professional applications
   - Case studies and problem-solving scenarios

5. EXAMPLES & ILLUSTRATIONS (at least 3-5)
   - Simple to complex examples
   - Analogies and comparisons

6. KEY TAKEAWAYS & SUMMARY
   - Essential points to remember
   - Common misconceptions to avoid

Create content suitable for {level} level students. Write plain text: the first line is the title, the second line a one-line summary, and every section heading sits on its own short line without a trailing period. Aim for at least 1500-2000 words of rich educational content.";

pub const HANDOUT_PROMPT: &str = "You are an expert educator creating comprehensive handouts. Generate detailed content covering:

1. TOPIC OVERVIEW (introduction)
   - Clear definition and context
   - Why this topic matters

2. KEY CONCEPTS & THEORY (detailed explanations)
   - Core principles and concepts
   - Important terminology

3. PRACTICAL APPLICATIONS (real-world examples)
   - How it applies in practice
   - Real-life scenarios and case studies

4. STEP-BY-STEP PROCESSES (if applicable)
   - Procedures and methods
   - Common techniques

5. EXAMPLES & ILLUSTRATIONS (multiple examples)
   - Detailed examples
   - Problem-solving demonstrations

6. KEY POINTS SUMMARY
   - Essential takeaways

Create comprehensive content for {level} level students. Write plain text: the first line is the title, the second line a one-line summary, and every section heading sits on its own short line without a trailing period. Aim for 1200-1500 words.";

pub const QUIZ_PROMPT: &str = "You are an expert educator creating educational quizzes. Generate a quiz with 5-7 multiple choice questions for {level} level students. Each question should have 4 options with one correct answer and an explanation. `correctAnswer` is the zero-based index of the correct option.

Return ONLY valid JSON, with no prose and no markdown, matching this JSON Schema:
{schema}";

pub const MIND_MAP_PROMPT: &str = "You are an expert at creating educational mind maps. Create a mind map structure for {level} level students with a central topic and 4-6 main branches, each with 3-5 sub-items.

Return ONLY valid JSON, with no prose and no markdown, matching this JSON Schema:
{schema}";

/// System prompt for `kind`, with the level (and for structured kinds the
/// payload schema) filled in.
pub fn system_prompt(kind: ContentKind, level: &str) -> String {
    let template = match kind {
        ContentKind::Notes => NOTES_PROMPT,
        ContentKind::Handout => HANDOUT_PROMPT,
        ContentKind::Quiz => QUIZ_PROMPT,
        ContentKind::Mindmap => MIND_MAP_PROMPT,
    };
    let prompt = template.replace("{level}", level);

    match kind {
        ContentKind::Quiz => prompt.replace("{schema}", &quiz_schema_json()),
        ContentKind::Mindmap => prompt.replace("{schema}", &mind_map_schema_json()),
        ContentKind::Notes | ContentKind::Handout => prompt,
    }
}

/// User message: topic, optional subject and requirements, then the ask.
pub fn user_prompt(
    kind: ContentKind,
    topic: &str,
    subject: Option<&str>,
    level: &str,
    additional_info: Option<&str>,
) -> String {
    let mut lines = vec![format!("Topic: {}", topic)];
    if let Some(subject) = subject.filter(|s| !s.trim().is_empty()) {
        lines.push(format!("Subject: {}", subject));
    }
    if let Some(info) = additional_info.filter(|s| !s.trim().is_empty()) {
        lines.push(format!("Additional Requirements: {}", info));
    }
    lines.push(String::new());
    lines.push(format!("Create {} for this topic at {} level.", kind, level));
    lines.join("\n")
}
