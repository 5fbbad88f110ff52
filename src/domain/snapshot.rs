//! Point-in-time repository snapshot

use serde::{Deserialize, Serialize};

/// Observable fields of a repository at one point in time
///
/// Produced only by a fetcher and never mutated in place: a new poll
/// yields a new snapshot that replaces the stored one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSnapshot {
    /// Canonical `owner/repo` name as reported by the API
    pub full_name: String,
    pub description: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    /// Cosmetic; tracked but never diffed
    pub watchers: u64,
    /// Cosmetic; tracked but never diffed
    pub language: Option<String>,
    /// Opaque timestamp token, compared by exact string inequality only
    pub updated_at: String,
    pub url: String,
}

impl RepoSnapshot {
    /// Multi-line human-readable summary, used for one-shot lookups
    pub fn summary(&self) -> String {
        let mut out = format!("Repository: {}\n", self.full_name);
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("Description: {description}\n"));
        }
        out.push_str(&format!(
            "Stars: {} | Forks: {} | Issues: {}\n",
            self.stars, self.forks, self.open_issues
        ));
        if let Some(language) = self.language.as_deref().filter(|l| !l.is_empty()) {
            out.push_str(&format!("Language: {language}\n"));
        }
        out.push_str(&format!("Last updated: {}\n", self.updated_at));
        out.push_str(&format!("URL: {}", self.url));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> RepoSnapshot {
        RepoSnapshot {
            full_name: "acme/widgets".to_string(),
            description: Some("Widget factory".to_string()),
            stars: 10,
            forks: 2,
            open_issues: 1,
            watchers: 10,
            language: Some("Rust".to_string()),
            updated_at: "2026-08-01T12:00:00Z".to_string(),
            url: "https://github.com/acme/widgets".to_string(),
        }
    }

    #[test]
    fn test_summary_includes_all_fields() {
        let text = snapshot().summary();
        assert!(text.contains("Repository: acme/widgets"));
        assert!(text.contains("Description: Widget factory"));
        assert!(text.contains("Stars: 10 | Forks: 2 | Issues: 1"));
        assert!(text.contains("Language: Rust"));
        assert!(text.contains("Last updated: 2026-08-01T12:00:00Z"));
        assert!(text.ends_with("URL: https://github.com/acme/widgets"));
    }

    #[test]
    fn test_summary_skips_empty_optional_fields() {
        let mut s = snapshot();
        s.description = None;
        s.language = Some(String::new());
        let text = s.summary();
        assert!(!text.contains("Description:"));
        assert!(!text.contains("Language:"));
    }
}
