//! List Queries
//!
//! Filter, sort and paginate an in-memory collection. Everything here is a
//! pure function of its inputs, so views can recompute it in a memo.

use std::cmp::Ordering;

use crate::lead::{Lead, LeadSource, LeadStatus};
use crate::stage::{Stage, StageCategory, StatusFilter};

// ========================
// Sorting
// ========================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// Current sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K: Copy + PartialEq> SortState<K> {
    pub fn new(key: K) -> Self {
        Self { key, direction: SortDirection::Asc }
    }

    /// Header click: same column flips direction, a new column starts ascending
    pub fn clicked(self, key: K) -> Self {
        if self.key == key {
            Self { key, direction: self.direction.toggled() }
        } else {
            Self::new(key)
        }
    }

    pub fn indicator(&self, key: K) -> &'static str {
        if self.key == key { self.direction.arrow() } else { "" }
    }
}

/// Comparable projection of one field
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
    /// Milliseconds since the epoch
    Date(i64),
}

impl SortValue {
    /// Missing numbers sort as zero
    pub fn number(value: Option<f64>) -> Self {
        SortValue::Number(value.unwrap_or(0.0))
    }

    pub fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => compare_text(a, b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Number(_) => 0,
            SortValue::Date(_) => 1,
            SortValue::Text(_) => 2,
        }
    }
}

/// Case-insensitive comparison, exact comparison as tie-break
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Records that can be sorted by a column key
pub trait Sortable<K> {
    fn sort_value(&self, key: K) -> SortValue;
}

/// Stable sort by the given state
pub fn sort_by<T: Sortable<K>, K: Copy>(items: &mut [T], sort: &SortState<K>) {
    items.sort_by(|a, b| {
        let ordering = a.sort_value(sort.key).compare(&b.sort_value(sort.key));
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

// ========================
// Pagination
// ========================

/// Zero-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub size: usize,
}

impl Page {
    pub fn first(size: usize) -> Self {
        Self { index: 0, size: size.max(1) }
    }
}

/// Display-ready slice of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<T> {
    pub items: Vec<T>,
    /// Matches before paging
    pub total: usize,
    /// Page actually shown (clamped)
    pub page: usize,
    pub page_count: usize,
}

impl<T> ListView<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.page_count
    }

    /// "11-20 of 42" style range, 1-based
    pub fn range_label(&self, page_size: usize) -> String {
        if self.total == 0 {
            return "0 of 0".to_string();
        }
        let start = self.page * page_size.max(1) + 1;
        let end = start + self.items.len() - 1;
        format!("{}-{} of {}", start, end, self.total)
    }
}

/// Filter, then sort, then cut the requested page.
pub fn derive_view<T, K, F>(items: &[T], keep: F, sort: Option<&SortState<K>>, page: Option<Page>) -> ListView<T>
where
    T: Clone + Sortable<K>,
    K: Copy,
    F: Fn(&T) -> bool,
{
    let mut matched: Vec<T> = items.iter().filter(|item| keep(item)).cloned().collect();
    if let Some(sort) = sort {
        sort_by(&mut matched, sort);
    }

    let total = matched.len();
    match page {
        None => ListView { items: matched, total, page: 0, page_count: 1 },
        Some(page) => {
            let size = page.size.max(1);
            let page_count = total.div_ceil(size).max(1);
            let index = page.index.min(page_count - 1);
            let items = matched.into_iter().skip(index * size).take(size).collect();
            ListView { items, total, page: index, page_count }
        }
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

// ========================
// Stages
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSortKey {
    Order,
    Name,
    Category,
    Probability,
}

impl Sortable<StageSortKey> for Stage {
    fn sort_value(&self, key: StageSortKey) -> SortValue {
        match key {
            StageSortKey::Order => SortValue::Number(self.order as f64),
            StageSortKey::Name => SortValue::Text(self.name.clone()),
            StageSortKey::Category => SortValue::Text(self.category.as_str().to_string()),
            StageSortKey::Probability => SortValue::Number(self.probability as f64),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageFilter {
    pub search: String,
    pub category: Option<StageCategory>,
    pub status: StatusFilter,
}

impl StageFilter {
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || self.category.is_some() || self.status != StatusFilter::All
    }

    pub fn matches(&self, stage: &Stage) -> bool {
        if let Some(category) = self.category {
            if stage.category != category {
                return false;
            }
        }
        if !self.status.matches(stage.is_active) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || contains_ci(&stage.name, &needle)
            || stage.description.as_deref().is_some_and(|d| contains_ci(d, &needle))
    }
}

/// Drag-and-drop is only meaningful when rows are shown in stored order
pub fn drag_enabled(sort: &SortState<StageSortKey>) -> bool {
    sort.key == StageSortKey::Order && sort.direction == SortDirection::Asc
}

// ========================
// Leads
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadSortKey {
    Name,
    Company,
    Status,
    Source,
    Score,
    Budget,
    CreatedAt,
}

impl Sortable<LeadSortKey> for Lead {
    fn sort_value(&self, key: LeadSortKey) -> SortValue {
        match key {
            LeadSortKey::Name => SortValue::Text(self.full_name()),
            LeadSortKey::Company => SortValue::Text(self.company.clone().unwrap_or_default()),
            LeadSortKey::Status => SortValue::Text(self.status.as_str().to_string()),
            LeadSortKey::Source => SortValue::Text(self.source.as_str().to_string()),
            LeadSortKey::Score => SortValue::number(self.score.map(f64::from)),
            LeadSortKey::Budget => SortValue::number(self.budget),
            LeadSortKey::CreatedAt => SortValue::Date(self.created_at.map_or(0, |t| t.timestamp_millis())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadFilter {
    pub search: String,
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
}

impl LeadFilter {
    pub fn matches(&self, lead: &Lead) -> bool {
        if self.status.is_some_and(|s| s != lead.status) {
            return false;
        }
        if self.source.is_some_and(|s| s != lead.source) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || contains_ci(&lead.full_name(), &needle)
            || contains_ci(&lead.email, &needle)
            || lead.company.as_deref().is_some_and(|c| contains_ci(c, &needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn stage(id: &str, order: i32, active: bool) -> Stage {
        let mut s = Stage::new(id, "c1", id.to_uppercase(), order);
        s.is_active = active;
        s
    }

    fn lead(id: &str, budget: Option<f64>) -> Lead {
        Lead {
            id: id.to_string(),
            company_id: "c1".to_string(),
            first_name: id.to_string(),
            last_name: String::new(),
            email: format!("{}@example.com", id),
            phone: None,
            company: None,
            status: LeadStatus::New,
            source: LeadSource::Website,
            score: None,
            budget,
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        }
    }

    fn ids<T: crate::Entity>(items: &[T]) -> Vec<&str> {
        items.iter().map(|i| i.id()).collect()
    }

    #[test]
    fn test_status_filter_active_preserves_order() {
        let stages = vec![stage("a", 0, true), stage("b", 1, false), stage("c", 2, true), stage("d", 3, false)];

        let all = StageFilter::default();
        let view = derive_view(&stages, |s| all.matches(s), None::<&SortState<StageSortKey>>, None);
        assert_eq!(ids(&view.items), vec!["a", "b", "c", "d"]);

        let active = StageFilter { status: StatusFilter::Active, ..Default::default() };
        let view = derive_view(&stages, |s| active.matches(s), None::<&SortState<StageSortKey>>, None);
        assert_eq!(ids(&view.items), vec!["a", "c"]);
        assert!(view.items.iter().all(|s| s.is_active));
    }

    #[test]
    fn test_stage_search_and_category() {
        let mut stages = vec![stage("a", 0, true), stage("b", 1, true)];
        stages[1].category = StageCategory::Won;
        stages[0].description = Some("First contact call".to_string());

        let filter = StageFilter { search: "CONTACT".to_string(), ..Default::default() };
        assert!(filter.matches(&stages[0]));
        assert!(!filter.matches(&stages[1]));

        let filter = StageFilter { category: Some(StageCategory::Won), ..Default::default() };
        assert!(!filter.matches(&stages[0]));
        assert!(filter.matches(&stages[1]));
        assert!(filter.is_active());
        assert!(!StageFilter::default().is_active());
    }

    #[test]
    fn test_budget_sort_treats_missing_as_zero() {
        let leads = vec![lead("x", None), lead("y", Some(500.0)), lead("z", Some(100.0))];
        let sort = SortState::new(LeadSortKey::Budget);
        let view = derive_view(&leads, |_| true, Some(&sort), None);
        assert_eq!(ids(&view.items), vec!["x", "z", "y"]);

        let sort = sort.clicked(LeadSortKey::Budget);
        assert_eq!(sort.direction, SortDirection::Desc);
        let view = derive_view(&leads, |_| true, Some(&sort), None);
        assert_eq!(ids(&view.items), vec!["y", "z", "x"]);
    }

    #[test]
    fn test_sort_click_semantics() {
        let sort = SortState::new(LeadSortKey::Name);
        let sort = sort.clicked(LeadSortKey::Name);
        assert_eq!(sort.direction, SortDirection::Desc);
        let sort = sort.clicked(LeadSortKey::Score);
        assert_eq!(sort, SortState { key: LeadSortKey::Score, direction: SortDirection::Asc });
        assert_eq!(sort.indicator(LeadSortKey::Score), "▲");
        assert_eq!(sort.indicator(LeadSortKey::Name), "");
    }

    #[test]
    fn test_text_sort_is_case_insensitive() {
        let mut leads = vec![lead("b", None), lead("A", None), lead("c", None)];
        sort_by(&mut leads, &SortState::new(LeadSortKey::Name));
        assert_eq!(ids(&leads), vec!["A", "b", "c"]);
    }

    #[test]
    fn test_date_sort() {
        let mut older = lead("old", None);
        older.created_at = Some(Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap());
        let leads = vec![lead("new", None), older];
        let view = derive_view(&leads, |_| true, Some(&SortState::new(LeadSortKey::CreatedAt)), None);
        assert_eq!(ids(&view.items), vec!["old", "new"]);
    }

    #[test]
    fn test_pagination() {
        let leads: Vec<Lead> = (0..25).map(|i| lead(&format!("l{:02}", i), None)).collect();
        let sort = SortState::new(LeadSortKey::Name);

        let view = derive_view(&leads, |_| true, Some(&sort), Some(Page { index: 2, size: 10 }));
        assert_eq!(view.total, 25);
        assert_eq!(view.page_count, 3);
        assert_eq!(ids(&view.items), vec!["l20", "l21", "l22", "l23", "l24"]);
        assert!(view.has_prev());
        assert!(!view.has_next());
        assert_eq!(view.range_label(10), "21-25 of 25");

        // Past the end clamps to the last page
        let view = derive_view(&leads, |_| true, Some(&sort), Some(Page { index: 9, size: 10 }));
        assert_eq!(view.page, 2);
    }

    #[test]
    fn test_empty_pagination() {
        let leads: Vec<Lead> = Vec::new();
        let view = derive_view(&leads, |_| true, None::<&SortState<LeadSortKey>>, Some(Page::first(10)));
        assert_eq!(view.page_count, 1);
        assert_eq!(view.page, 0);
        assert!(view.is_empty());
        assert_eq!(view.range_label(10), "0 of 0");
    }

    #[test]
    fn test_lead_filter() {
        let mut a = lead("ann", Some(1.0));
        a.company = Some("Acme Corp".to_string());
        a.status = LeadStatus::Qualified;
        let b = lead("bob", None);

        let filter = LeadFilter { search: "acme".to_string(), ..Default::default() };
        assert!(filter.matches(&a));
        assert!(!filter.matches(&b));

        let filter = LeadFilter { status: Some(LeadStatus::New), ..Default::default() };
        assert!(!filter.matches(&a));
        assert!(filter.matches(&b));

        let filter = LeadFilter { source: Some(LeadSource::Referral), ..Default::default() };
        assert!(!filter.matches(&b));
    }

    #[test]
    fn test_derive_view_is_idempotent() {
        let leads = vec![lead("x", None), lead("y", Some(500.0)), lead("z", Some(100.0))];
        let sort = SortState::new(LeadSortKey::Budget);
        let first = derive_view(&leads, |_| true, Some(&sort), Some(Page::first(2)));
        let second = derive_view(&leads, |_| true, Some(&sort), Some(Page::first(2)));
        assert_eq!(first, second);
    }

    #[test]
    fn test_drag_enabled_only_in_stored_order() {
        assert!(drag_enabled(&SortState::new(StageSortKey::Order)));
        assert!(!drag_enabled(&SortState::new(StageSortKey::Order).clicked(StageSortKey::Order)));
        assert!(!drag_enabled(&SortState::new(StageSortKey::Name)));
    }
}
