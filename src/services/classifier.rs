//! Relevance classification of posting titles.
//!
//! A title is relevant when it carries both an internship signal and a
//! backend topic signal. Matching is plain substring search over the
//! lowercased title, so "go" also matches inside "google" and "intern"
//! inside "international". Those overlaps are part of the observable
//! output and are kept as-is.

/// Terms signalling an internship or early-career role.
pub const INTERNSHIP_TERMS: &[&str] = &[
    "intern",
    "internship",
    "university graduate",
    "new grad",
    "student",
];

/// Terms signalling a backend / infrastructure topic.
pub const TOPIC_TERMS: &[&str] = &[
    "backend",
    "back-end",
    "java",
    "python",
    "go",
    "golang",
    "node",
    "nodejs",
    "spring",
    "django",
    "flask",
    "api",
    "microservice",
    "database",
    "sql",
    "nosql",
    "aws",
    "azure",
    "gcp",
    "cloud",
    "distributed",
    "server",
    "software engineer",
    "developer",
];

/// Whether `title` matches both an internship term and a topic term.
pub fn is_relevant(title: &str) -> bool {
    let text = title.to_lowercase();
    contains_any(&text, INTERNSHIP_TERMS) && contains_any(&text, TOPIC_TERMS)
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}
