//! Filtering and paging over a resident dataset.

use crate::record::ToolRecord;

/// Number of records per page.
pub const PAGE_SIZE: usize = 12;

/// Filter and page selection for [`ToolQuery::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolQuery {
    /// Case-insensitive text matched against title and description.
    pub search: Option<String>,
    /// Substring matched against the record category.
    pub category: Option<String>,
    /// Offset of the first record of the page.
    pub offset: usize,
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolPage<'a> {
    pub records: Vec<&'a ToolRecord>,
    /// Offset of the next page, or `None` if this page was the last one.
    pub next_offset: Option<usize>,
    /// Number of records that matched before paging.
    pub total: usize,
}

impl ToolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Runs the query: published records only, filtered, featured first
    /// (stable otherwise), then sliced to one page.
    pub fn run<'a>(&self, records: &'a [ToolRecord]) -> ToolPage<'a> {
        let needle = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut matched: Vec<&ToolRecord> = records
            .iter()
            .filter(|r| r.is_published)
            .filter(|r| match &needle {
                Some(q) => {
                    r.title.to_lowercase().contains(q) || r.description.to_lowercase().contains(q)
                }
                None => true,
            })
            .filter(|r| match self.category.as_deref() {
                Some(c) if !c.is_empty() => r.category.contains(c),
                _ => true,
            })
            .collect();

        matched.sort_by_key(|r| !r.is_featured);

        let total = matched.len();
        let records: Vec<&ToolRecord> = matched
            .into_iter()
            .skip(self.offset)
            .take(PAGE_SIZE)
            .collect();
        let next_offset = (records.len() == PAGE_SIZE).then_some(self.offset + PAGE_SIZE);

        ToolPage {
            records,
            next_offset,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tool(id: &str, title: &str, category: &str, featured: bool) -> ToolRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "description": format!("{title} description"),
            "category": category,
            "is_featured": featured,
        }))
        .unwrap()
    }

    fn ids(page: &ToolPage<'_>) -> Vec<String> {
        page.records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn featured_records_come_first_in_stable_order() {
        let records = vec![
            tool("1", "A", "text", false),
            tool("2", "B", "text", true),
            tool("3", "C", "text", false),
            tool("4", "D", "text", true),
        ];

        let page = ToolQuery::new().run(&records);
        assert_eq!(ids(&page), vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn unpublished_records_are_hidden() {
        let mut hidden = tool("1", "Hidden", "text", true);
        hidden.is_published = false;
        let records = vec![hidden, tool("2", "Shown", "text", false)];

        let page = ToolQuery::new().run(&records);
        assert_eq!(ids(&page), vec!["2"]);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn search_is_trimmed_and_case_insensitive() {
        let records = vec![
            tool("1", "ChatGPT", "text", false),
            tool("2", "Midjourney", "images", false),
        ];

        let page = ToolQuery::new().search("  chatgpt ").run(&records);
        assert_eq!(ids(&page), vec!["1"]);

        let blank = ToolQuery::new().search("   ").run(&records);
        assert_eq!(blank.total, 2);
    }

    #[test]
    fn category_filter_matches_substring() {
        let records = vec![
            tool("1", "A", "توليد صور", false),
            tool("2", "B", "نصوص", false),
        ];

        let page = ToolQuery::new().category("صور").run(&records);
        assert_eq!(ids(&page), vec!["1"]);
    }

    #[test]
    fn pages_hold_twelve_records() {
        let records: Vec<ToolRecord> = (0..30)
            .map(|i| tool(&i.to_string(), "T", "text", false))
            .collect();

        let first = ToolQuery::new().run(&records);
        assert_eq!(first.records.len(), PAGE_SIZE);
        assert_eq!(first.next_offset, Some(12));

        let third = ToolQuery::new().offset(24).run(&records);
        assert_eq!(third.records.len(), 6);
        assert_eq!(third.next_offset, None);
        assert_eq!(third.total, 30);
    }
}
