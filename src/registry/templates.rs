use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static SLOT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(.*?)\}\}").expect("slot pattern is a valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Slot(String),
}

/// A sentence with `{{slot}}` placeholders, split into literal text and slot names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct SentenceTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl SentenceTemplate {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut segments = Vec::new();
        let mut last_end = 0;

        for caps in SLOT_PATTERN.captures_iter(&source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last_end {
                segments.push(Segment::Text(source[last_end..whole.start()].to_string()));
            }
            segments.push(Segment::Slot(name.as_str().trim().to_string()));
            last_end = whole.end();
        }

        if last_end < source.len() {
            segments.push(Segment::Text(source[last_end..].to_string()));
        }

        Self { source, segments }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Slot names in placeholder order, repeats included
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Slot(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }
}

impl From<String> for SentenceTemplate {
    fn from(source: String) -> Self {
        Self::parse(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_template() {
        let template = SentenceTemplate::parse("{{subject}} {{verb}} things.");

        assert_eq!(
            template.segments(),
            &[
                Segment::Slot("subject".into()),
                Segment::Text(" ".into()),
                Segment::Slot("verb".into()),
                Segment::Text(" things.".into()),
            ]
        );
    }

    #[test]
    fn test_parse_without_placeholders() {
        let template = SentenceTemplate::parse("plain text.");

        assert_eq!(template.segments(), &[Segment::Text("plain text.".into())]);
        assert_eq!(template.slots().count(), 0);
    }

    #[test]
    fn test_parse_empty_template() {
        let template = SentenceTemplate::parse("");
        assert!(template.segments().is_empty());
    }

    #[test]
    fn test_slot_names_are_trimmed() {
        let template = SentenceTemplate::parse("At {{ time }}, go.");
        assert_eq!(template.slots().collect::<Vec<_>>(), vec!["time"]);
    }

    #[test]
    fn test_repeated_slots_are_kept_in_order() {
        let template = SentenceTemplate::parse("{{a}}{{b}}{{a}}");
        assert_eq!(template.slots().collect::<Vec<_>>(), vec!["a", "b", "a"]);
        assert_eq!(template.source(), "{{a}}{{b}}{{a}}");
    }

    #[test]
    fn test_deserialize_from_string() {
        let templates: Vec<SentenceTemplate> =
            serde_json::from_str(r#"["{{x}} runs.", "stop."]"#).unwrap();

        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].slots().collect::<Vec<_>>(), vec!["x"]);
    }
}
