use std::collections::HashMap;

use chrono::NaiveDate;
use vm_core::ArticleRecord;

/// Date-range and title filter over stored records.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub title_keyword: Option<String>,
}

impl RecordFilter {
    /// Both bounds are inclusive. When a bound is set, records whose date
    /// cannot be parsed never match.
    pub fn matches(&self, record: &ArticleRecord) -> bool {
        if self.since.is_some() || self.until.is_some() {
            let Some(date) = record.reference.published_on() else {
                return false;
            };
            if self.since.is_some_and(|since| date < since) {
                return false;
            }
            if self.until.is_some_and(|until| date > until) {
                return false;
            }
        }
        match self.title_keyword.as_deref().filter(|k| !k.is_empty()) {
            Some(keyword) => record
                .reference
                .title
                .to_lowercase()
                .contains(&keyword.to_lowercase()),
            None => true,
        }
    }

    pub fn apply<'a>(&self, records: &'a [ArticleRecord]) -> Vec<&'a ArticleRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

/// The `n` most frequent tags, most frequent first, ties broken by name.
pub fn top_tags<'a, I>(records: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a ArticleRecord>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        for tag in record.content.tags.iter().flatten() {
            let tag = tag.trim();
            if !tag.is_empty() {
                *counts.entry(tag.to_string()).or_default() += 1;
            }
        }
    }
    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts.truncate(n);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use vm_core::{ArticleContent, ArticleReference};

    fn record(title: &str, date: &str, tags: Option<Vec<&str>>) -> ArticleRecord {
        ArticleRecord::new(
            ArticleReference::new(format!("https://www.eltiempo.com/{}", title), title, date, "eltiempo.com"),
            ArticleContent {
                body_text: Some("cuerpo".to_string()),
                comments: None,
                tags: tags.map(|t| t.into_iter().map(str::to_string).collect()),
            },
        )
    }

    #[test]
    fn test_filter_by_inclusive_date_range() {
        let records = vec![
            record("a", "10 enero de 2024", None),
            record("b", "20 febrero de 2024", None),
            record("c", "2024-03-01T00:00:00Z", None),
            record("d", "sin fecha", None),
        ];
        let filter = RecordFilter {
            since: NaiveDate::from_ymd_opt(2024, 1, 10),
            until: NaiveDate::from_ymd_opt(2024, 2, 20),
            title_keyword: None,
        };
        let titles: Vec<&str> = filter.apply(&records).iter().map(|r| r.reference.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn test_filter_by_title_keyword_ignores_case() {
        let records = vec![
            record("Migrantes en Bogotá", "2024-01-01", None),
            record("Economía", "2024-01-01", None),
        ];
        let filter = RecordFilter {
            title_keyword: Some("bogotá".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&records).len(), 1);
        assert_eq!(RecordFilter::default().apply(&records).len(), 2);
    }

    #[test]
    fn test_top_tags() {
        let records = vec![
            record("a", "", Some(vec!["Migración", " Venezuela", "Bogotá"])),
            record("b", "", Some(vec!["Venezuela", "Migración"])),
            record("c", "", Some(vec!["Venezuela", ""])),
            record("d", "", None),
        ];
        let tags = top_tags(&records, 2);
        assert_eq!(
            tags,
            vec![("Venezuela".to_string(), 3), ("Migración".to_string(), 2)]
        );
        assert_eq!(top_tags(&records, 10).len(), 3);
    }
}
