use chrono::NaiveDate;

use crate::recurrence::parse_display_date;

/// How the list endpoint's `search` parameter is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Search {
    /// No search: every task, paged by offset.
    All,
    /// `DD.MM.YYYY` input: tasks on exactly this date.
    Date(NaiveDate),
    /// Anything else: case-sensitive substring of title or comment.
    Text(String),
}

impl Search {
    pub fn parse(search: &str) -> Self {
        if search.is_empty() {
            Search::All
        } else if let Some(date) = parse_display_date(search) {
            Search::Date(date)
        } else {
            Search::Text(search.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    pub search: Search,
    pub offset: u32,
    pub limit: u32,
}

impl TaskQuery {
    pub fn new(offset: u32, limit: u32, search: &str) -> Self {
        Self {
            search: Search::parse(search),
            offset,
            limit,
        }
    }

    /// Offset that actually applies: only unfiltered listings are paged.
    pub fn effective_offset(&self) -> u32 {
        match self.search {
            Search::All => self.offset,
            Search::Date(_) | Search::Text(_) => 0,
        }
    }
}
