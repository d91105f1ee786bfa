//! Browse filters for approved listings

use super::model::{Listing, SortOrder};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Filters, ordering and page for browsing.
///
/// Text filters equal to `all` (any case) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    /// Matches any category containing this text
    pub sport: Option<String>,
    /// Exact city, case-insensitive
    pub city: Option<String>,
    /// Exact state, case-insensitive
    pub state: Option<String>,
    pub sort: SortOrder,
    /// 1-based
    pub page: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            sport: None,
            city: None,
            state: None,
            sort: SortOrder::New,
            page: 1,
        }
    }
}

impl ListingQuery {
    pub fn sport(mut self, sport: impl Into<String>) -> Self {
        self.sport = Some(sport.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Whether an approved listing passes the text filters
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(sport) = active(&self.sport) {
            let sport = sport.to_lowercase();
            if !listing
                .categories
                .iter()
                .any(|c| c.to_lowercase().contains(&sport))
            {
                return false;
            }
        }
        if let Some(city) = active(&self.city) {
            if !listing.location.city.eq_ignore_ascii_case(city) {
                return false;
            }
        }
        if let Some(state) = active(&self.state) {
            if !listing.location.state.eq_ignore_ascii_case(state) {
                return false;
            }
        }
        true
    }

    /// Ordering for the selected sort
    pub fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        let newest = b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id));
        match self.sort {
            SortOrder::New => newest,
            SortOrder::Top => b.upvotes.cmp(&a.upvotes).then(newest),
        }
    }
}

fn active(filter: &Option<String>) -> Option<&str> {
    filter
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty() && !f.eq_ignore_ascii_case("all"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::model::fixtures;
    use crate::types::UserId;
    use chrono::Duration;

    #[test]
    fn test_sport_matches_substring() {
        let mut listing = fixtures::listing("Arena", UserId::new());
        listing.categories = vec!["Box Cricket".to_string()];

        assert!(ListingQuery::default().sport("cricket").matches(&listing));
        assert!(!ListingQuery::default().sport("tennis").matches(&listing));
        assert!(ListingQuery::default().sport("all").matches(&listing));
    }

    #[test]
    fn test_city_and_state_exact() {
        let listing = fixtures::listing("Arena", UserId::new());

        assert!(ListingQuery::default().city("bengaluru").matches(&listing));
        assert!(!ListingQuery::default().city("Bengal").matches(&listing));
        assert!(ListingQuery::default().state("KARNATAKA").matches(&listing));
        assert!(ListingQuery::default().city("All").matches(&listing));
    }

    #[test]
    fn test_top_sort_breaks_ties_by_recency() {
        let owner = UserId::new();
        let mut older = fixtures::listing("Older", owner);
        older.created_at = older.created_at - Duration::hours(1);
        older.upvotes = 5;
        let mut newer = fixtures::listing("Newer", owner);
        newer.upvotes = 5;
        let mut best = fixtures::listing("Best", owner);
        best.created_at = best.created_at - Duration::hours(2);
        best.upvotes = 9;

        let query = ListingQuery::default().sort(SortOrder::Top);
        let mut all = vec![&older, &newer, &best];
        all.sort_by(|a, b| query.compare(a, b));
        let titles: Vec<_> = all.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Best", "Newer", "Older"]);
    }
}
