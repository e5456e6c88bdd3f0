//! Listing projections over service requests.
//!
//! Everything here is pure: inputs are borrowed, results are fresh vectors,
//! and an empty result is an ordinary outcome.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use servicehub_core::{ServiceRequest, Urgency};

/// Listing predicates. Set fields are ANDed; unset or blank ones match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestFilter {
    pub category: Option<String>,
    pub urgency: Option<Urgency>,
    pub tag: Option<String>,
    pub search_text: Option<String>,
}

impl RequestFilter {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(urgency);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn matches(&self, request: &ServiceRequest) -> bool {
        if let Some(category) = non_blank(&self.category) {
            if request.category != category {
                return false;
            }
        }
        if let Some(urgency) = self.urgency {
            if request.urgency != urgency {
                return false;
            }
        }
        if let Some(tag) = non_blank(&self.tag) {
            if !request.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(text) = non_blank(&self.search_text) {
            let needle = text.trim().to_lowercase();
            let haystacks = [&request.service_title, &request.notes, &request.address];
            if !haystacks
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    PriceDesc,
    PriceAsc,
}

pub fn filter(requests: &[ServiceRequest], criteria: &RequestFilter) -> Vec<ServiceRequest> {
    requests
        .iter()
        .filter(|request| criteria.matches(request))
        .cloned()
        .collect()
}

/// Stable: equal keys keep their relative order.
pub fn sort(requests: &[ServiceRequest], key: SortKey) -> Vec<ServiceRequest> {
    let mut sorted = requests.to_vec();
    match key {
        SortKey::Newest => sorted.sort_by_key(|r| Reverse(r.created_at)),
        SortKey::Oldest => sorted.sort_by_key(|r| r.created_at),
        SortKey::PriceDesc => sorted.sort_by_key(|r| Reverse(r.total_amount)),
        SortKey::PriceAsc => sorted.sort_by_key(|r| r.total_amount),
    }
    sorted
}

pub fn browse(
    requests: &[ServiceRequest],
    criteria: &RequestFilter,
    key: SortKey,
) -> Vec<ServiceRequest> {
    sort(&filter(requests, criteria), key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use servicehub_core::RequestStatus;

    fn request(
        id: &str,
        category: &str,
        urgency: Urgency,
        notes: &str,
        price: i64,
        minutes: i64,
    ) -> ServiceRequest {
        let epoch = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        ServiceRequest {
            id: id.to_string(),
            service_id: format!("svc-{id}"),
            service_title: format!("{category} visit"),
            category: category.to_string(),
            customer_name: "Customer".to_string(),
            customer_phone: "9000000000".to_string(),
            address: "MG Road, Bengaluru".to_string(),
            preferred_date: String::new(),
            preferred_time: String::new(),
            notes: notes.to_string(),
            urgency,
            tags: vec![category.to_lowercase()],
            total_amount: Decimal::new(price, 0),
            status: RequestStatus::Pending,
            created_at: epoch + Duration::minutes(minutes),
            history: Vec::new(),
        }
    }

    fn fixtures() -> Vec<ServiceRequest> {
        vec![
            request("a", "Cleaning", Urgency::Normal, "Leaking tap in bathroom", 800, 0),
            request("b", "Healthcare", Urgency::Urgent, "Home nurse for 3 days", 4500, 30),
            request("c", "Cleaning", Urgency::Urgent, "Sofa shampoo", 1200, 10),
            request("d", "Education", Urgency::Low, "Physics tutor", 1200, 20),
        ]
    }

    fn ids(requests: &[ServiceRequest]) -> Vec<&str> {
        requests.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_filter_by_category() {
        let found = filter(&fixtures(), &RequestFilter::default().category("Cleaning"));
        assert_eq!(ids(&found), vec!["a", "c"]);
        assert!(found.iter().all(|r| r.category == "Cleaning"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let found = filter(&fixtures(), &RequestFilter::default().search("TAP"));
        assert_eq!(ids(&found), vec!["a"]);

        let by_location = filter(&fixtures(), &RequestFilter::default().search("bengaluru"));
        assert_eq!(by_location.len(), 4);
    }

    #[test]
    fn test_predicates_are_anded() {
        let criteria = RequestFilter::default()
            .category("Cleaning")
            .urgency(Urgency::Urgent);
        assert_eq!(ids(&filter(&fixtures(), &criteria)), vec!["c"]);

        let none = RequestFilter::default()
            .category("Healthcare")
            .search("sofa");
        assert!(filter(&fixtures(), &none).is_empty());
    }

    #[test]
    fn test_blank_filters_pass_everything() {
        let criteria = RequestFilter::default().category("  ").search("");
        assert_eq!(filter(&fixtures(), &criteria).len(), 4);
        assert_eq!(filter(&fixtures(), &RequestFilter::default()).len(), 4);
    }

    #[test]
    fn test_filter_by_tag() {
        let found = filter(&fixtures(), &RequestFilter::default().tag("education"));
        assert_eq!(ids(&found), vec!["d"]);
    }

    #[test]
    fn test_newest_first_and_idempotent() {
        let once = sort(&fixtures(), SortKey::Newest);
        assert_eq!(ids(&once), vec!["b", "d", "c", "a"]);
        assert_eq!(sort(&once, SortKey::Newest), once);
    }

    #[test]
    fn test_price_desc_is_stable() {
        let sorted = sort(&fixtures(), SortKey::PriceDesc);
        assert_eq!(ids(&sorted), vec!["b", "c", "d", "a"]);

        let sorted = sort(&fixtures(), SortKey::PriceAsc);
        assert_eq!(ids(&sorted), vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn test_sort_does_not_touch_input() {
        let input = fixtures();
        let _ = sort(&input, SortKey::Oldest);
        assert_eq!(ids(&input), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_browse_empty_result() {
        let criteria = RequestFilter::default().category("Rentals");
        assert!(browse(&fixtures(), &criteria, SortKey::Newest).is_empty());
    }
}
