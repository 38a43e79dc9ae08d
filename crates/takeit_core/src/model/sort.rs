//! Display-time ordering helpers.
//!
//! Storage keeps insertion order; consumers sort copies for presentation.

use super::event::Event;
use super::item::Item;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Returns items ordered by text, case-insensitively. Ties keep input order.
pub fn sort_items_by_text(items: &[Item], order: SortOrder) -> Vec<Item> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| order.apply(compare_text(&a.text, &b.text)));
    sorted
}

/// Returns events ordered by title, case-insensitively. Ties keep input order.
pub fn sort_events_by_title(events: &[Event], order: SortOrder) -> Vec<Event> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| order.apply(compare_text(&a.title, &b.title)));
    sorted
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::{sort_items_by_text, SortOrder};
    use crate::model::item::Item;

    #[test]
    fn sorts_case_insensitively_in_both_directions() {
        let items: Vec<Item> = ["bread", "Apples", "milk"]
            .iter()
            .filter_map(|text| Item::new(text))
            .collect();

        let asc = sort_items_by_text(&items, SortOrder::Asc);
        let texts: Vec<&str> = asc.iter().map(|item| item.text.as_str()).collect();
        assert_eq!(texts, vec!["Apples", "bread", "milk"]);

        let desc = sort_items_by_text(&items, SortOrder::Desc);
        assert_eq!(desc[0].text, "milk");
        assert_eq!(items[0].text, "bread");
    }
}
