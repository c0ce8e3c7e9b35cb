pub const DEFAULT_SUGGESTIONS: [&str; 4] = [
    "What documents do I need for my trip?",
    "How long does the visa application process take?",
    "Can I leave the airport during my layover?",
    "What are the entry requirements at my destination?",
];

const MAX_SUGGESTIONS: usize = 4;

fn is_follow_up_heading(line: &str) -> bool {
    let markup = |c: char| c == '#' || c == '*' || c == '_' || c.is_whitespace();
    let text = line.trim_matches(markup);
    let text = text.strip_suffix(':').unwrap_or(text).trim_matches(markup);

    let text = text.to_lowercase();
    text == "suggested follow-up questions" || text == "suggested follow up questions"
}

/// Splits a model answer into its body and the follow-up questions listed
/// under the last "Suggested follow-up questions:" heading.
///
/// Up to four dash-prefixed lines directly after the heading are taken and the
/// whole section is removed from the body. Without a heading, or without any
/// dash lines under it, the raw text is returned unchanged along with
/// [`DEFAULT_SUGGESTIONS`].
pub fn extract_suggestions(raw: &str) -> (String, Vec<String>) {
    let mut offset = 0;
    let mut heading = None;
    for line in raw.split_inclusive('\n') {
        if is_follow_up_heading(line) {
            heading = Some((offset, offset + line.len()));
        }
        offset += line.len();
    }

    let defaults = || DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect();

    let Some((start, end)) = heading else {
        return (raw.to_string(), defaults());
    };

    let mut suggestions = Vec::new();
    for line in raw[end..].lines().map(str::trim) {
        if line.is_empty() || line.chars().all(|c| c == '-') {
            continue;
        }
        let Some(question) = line.strip_prefix('-') else {
            break;
        };
        let question = question.trim().trim_matches('*').trim();
        if !question.is_empty() {
            suggestions.push(question.to_string());
        }
        if suggestions.len() == MAX_SUGGESTIONS {
            break;
        }
    }

    if suggestions.is_empty() {
        return (raw.to_string(), defaults());
    }

    (raw[..start].trim_end().to_string(), suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_the_section_and_collects_questions() {
        let raw = "No transit visa is needed.\n\nSuggested follow-up questions:\n- Can I leave the airport?\n- Which terminal do I land in?\n- Do I need travel insurance?\n";

        let (body, suggestions) = extract_suggestions(raw);
        assert_eq!(body, "No transit visa is needed.");
        assert_eq!(
            suggestions,
            vec![
                "Can I leave the airport?",
                "Which terminal do I land in?",
                "Do I need travel insurance?"
            ]
        );
    }

    #[test]
    fn tolerates_markdown_headings_and_caps_at_four() {
        let raw = "Body\n\n### **Suggested Follow-up Questions:**\n\n- one\n- **two**\n- three\n- four\n- five";

        let (body, suggestions) = extract_suggestions(raw);
        assert_eq!(body, "Body");
        assert_eq!(suggestions, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn horizontal_rules_are_not_questions() {
        let raw = "Body\n\nSuggested follow-up questions:\n---\n- Is a transit visa needed?\n---\n- Can I sleep airside?";

        let (body, suggestions) = extract_suggestions(raw);
        assert_eq!(body, "Body");
        assert_eq!(
            suggestions,
            vec!["Is a transit visa needed?", "Can I sleep airside?"]
        );
    }

    #[test]
    fn last_heading_wins() {
        let raw = "Suggested follow-up questions:\n- early\n\nMore text.\n\nSuggested follow-up questions:\n- late";

        let (body, suggestions) = extract_suggestions(raw);
        assert_eq!(suggestions, vec!["late"]);
        assert!(body.ends_with("More text."));
        assert!(body.contains("- early"));
    }

    #[test]
    fn no_section_returns_defaults_and_raw_text() {
        let raw = "Visa on arrival is available.";
        let (body, suggestions) = extract_suggestions(raw);
        assert_eq!(body, raw);
        assert_eq!(suggestions.len(), 4);
        assert_eq!(suggestions[0], DEFAULT_SUGGESTIONS[0]);
    }

    #[test]
    fn heading_without_questions_returns_defaults() {
        let raw = "Answer.\n\nSuggested follow-up questions:\nNone right now.";
        let (body, suggestions) = extract_suggestions(raw);
        assert_eq!(body, raw);
        assert_eq!(suggestions.len(), 4);
    }

    #[test]
    fn instruction_text_is_not_a_heading() {
        let raw = "Add a section titled \"Suggested follow-up questions:\" at the end.\n- not a suggestion";
        let (body, suggestions) = extract_suggestions(raw);
        assert_eq!(body, raw);
        assert_eq!(suggestions.len(), 4);
    }
}
