//! Plain-text rendering of backend results for the model

use std::fmt::Write as _;

use crate::backend::SearchResults;

pub const NO_NEWS: &str = "No news found.";
pub const NO_WIKIPEDIA_RESULT: &str = "No good Wikipedia Search Result was found";

/// Answer line first when present, then numbered hits
pub fn render_digest(query: &str, results: &SearchResults) -> String {
    if results.is_empty() {
        return format!("No results found for \"{query}\".");
    }

    let mut out = String::new();
    if let Some(answer) = results.answer.as_deref().filter(|a| !a.trim().is_empty()) {
        let _ = writeln!(out, "Answer: {}", answer.trim());
        if !results.hits.is_empty() {
            out.push('\n');
        }
    }

    for (i, hit) in results.hits.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, hit.title);
        if !hit.url.is_empty() {
            let _ = writeln!(out, "   {}", hit.url);
        }
        if !hit.snippet.trim().is_empty() {
            let _ = writeln!(out, "   {}", hit.snippet.trim());
        }
    }

    out.trim_end().to_string()
}

/// One `title: url` line per article
pub fn render_headlines(results: &SearchResults) -> String {
    if results.hits.is_empty() {
        return NO_NEWS.into();
    }

    results
        .hits
        .iter()
        .map(|hit| format!("{}: {}", hit.title, hit.url))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `Page:`/`Summary:` blocks separated by blank lines
pub fn render_encyclopedia(results: &SearchResults) -> String {
    if results.hits.is_empty() {
        return NO_WIKIPEDIA_RESULT.into();
    }

    results
        .hits
        .iter()
        .map(|hit| format!("Page: {}\nSummary: {}", hit.title, hit.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SearchHit;

    fn results(answer: Option<&str>, hits: &[(&str, &str, &str)]) -> SearchResults {
        SearchResults {
            answer: answer.map(str::to_string),
            hits: hits
                .iter()
                .map(|(t, u, s)| SearchHit::new(*t, *u, *s))
                .collect(),
        }
    }

    #[test]
    fn test_digest_with_answer() {
        let r = results(
            Some("It is sunny."),
            &[("Forecast", "https://weather.example", "Clear skies")],
        );
        assert_eq!(
            render_digest("weather", &r),
            "Answer: It is sunny.\n\n1. Forecast\n   https://weather.example\n   Clear skies"
        );
    }

    #[test]
    fn test_digest_without_answer_or_snippet() {
        let r = results(None, &[("A", "https://a", ""), ("B", "", "b text")]);
        assert_eq!(render_digest("q", &r), "1. A\n   https://a\n2. B\n   b text");
    }

    #[test]
    fn test_digest_empty() {
        assert_eq!(
            render_digest("nothing", &SearchResults::default()),
            "No results found for \"nothing\"."
        );
    }

    #[test]
    fn test_headlines() {
        let r = results(None, &[("One", "https://1", "x"), ("Two", "https://2", "")]);
        assert_eq!(render_headlines(&r), "One: https://1\nTwo: https://2");
        assert_eq!(render_headlines(&SearchResults::default()), NO_NEWS);
    }

    #[test]
    fn test_encyclopedia() {
        let r = results(None, &[("Rust", "", "A language."), ("Crab", "", "An animal.")]);
        assert_eq!(
            render_encyclopedia(&r),
            "Page: Rust\nSummary: A language.\n\nPage: Crab\nSummary: An animal."
        );
        assert_eq!(render_encyclopedia(&SearchResults::default()), NO_WIKIPEDIA_RESULT);
    }
}
