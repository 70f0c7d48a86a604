//! Statistics service (dashboard aggregation)

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;

use crate::{
    api::stats::{CategoryCount, PurgeResponse, StatsResponse, YearCount},
    error::AppResult,
    models::{Document, Loan},
    repository::{LibrarySnapshot, LibraryStore},
};

/// One calendar day in local time, both bounds inclusive:
/// `[day 00:00:00.000, day 23:59:59.999]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DayWindow {
    pub fn for_day(day: NaiveDate) -> Self {
        let start = day.and_time(NaiveTime::MIN);
        let end = start + Duration::days(1) - Duration::milliseconds(1);
        Self { start, end }
    }

    pub fn today() -> Self {
        Self::for_day(Local::now().date_naive())
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Count documents per category, keyed as stored, in first-appearance order
fn category_histogram(documents: &[Document]) -> Vec<CategoryCount> {
    let mut counts: IndexMap<Option<&str>, i64> = IndexMap::new();
    for document in documents {
        *counts.entry(document.category.as_deref()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.map(str::to_string),
            count,
        })
        .collect()
}

/// Count documents per publication year, ascending (unknown year first)
fn year_histogram(documents: &[Document]) -> Vec<YearCount> {
    let mut counts: BTreeMap<Option<i32>, i64> = BTreeMap::new();
    for document in documents {
        *counts.entry(document.year).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

fn count_within(loans: &[Loan], window: &DayWindow, date: impl Fn(&Loan) -> Option<NaiveDateTime>) -> i64 {
    loans
        .iter()
        .filter_map(date)
        .filter(|instant| window.contains(*instant))
        .count() as i64
}

/// Compute dashboard metrics over one snapshot of the collections
pub fn compute_stats(snapshot: &LibrarySnapshot, today: NaiveDate) -> StatsResponse {
    let window = DayWindow::for_day(today);

    StatsResponse {
        subscriber_count: snapshot.subscribers.len() as i64,
        document_count: snapshot.documents.len() as i64,
        loan_count: snapshot.loans.len() as i64,
        loans_today: count_within(&snapshot.loans, &window, |l| Some(l.loan_date)),
        returns_today: count_within(&snapshot.loans, &window, |l| l.return_date),
        category_histogram: category_histogram(&snapshot.documents),
        year_histogram: year_histogram(&snapshot.documents),
    }
}

#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn LibraryStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    /// Recompute every dashboard metric from a fresh snapshot
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let snapshot = self.store.snapshot().await?;
        let stats = compute_stats(&snapshot, Local::now().date_naive());
        tracing::debug!(
            "Stats: {} subscribers, {} documents, {} loans ({} today, {} returns today)",
            stats.subscriber_count,
            stats.document_count,
            stats.loan_count,
            stats.loans_today,
            stats.returns_today
        );
        Ok(stats)
    }

    /// Delete every loan returned today, then recompute the metrics
    pub async fn purge_returned_today(&self) -> AppResult<PurgeResponse> {
        let window = DayWindow::today();
        let deleted_count = self.store.purge_loans_returned_within(window).await?;
        tracing::info!(
            "Purged {} loan(s) returned on {}",
            deleted_count,
            window.start.date()
        );

        let stats = self.get_stats().await?;
        Ok(PurgeResponse { deleted_count, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::Subscriber, repository::MockLibraryStore, services::availability::AvailabilityPolicy};
    use std::sync::Mutex;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn subscriber(id: &str) -> Subscriber {
        Subscriber {
            id: id.into(),
            name: "Lovelace".into(),
            first_name: "Ada".into(),
            address: None,
            registration_date: None,
        }
    }

    fn document(id: &str, category: Option<&str>, year: Option<i32>) -> Document {
        Document {
            id: id.into(),
            title: format!("Title {}", id),
            author: "Author".into(),
            category: category.map(str::to_string),
            year,
        }
    }

    fn loan(id: &str, loan_date: NaiveDateTime, return_date: Option<NaiveDateTime>) -> Loan {
        Loan {
            id: id.into(),
            subscriber_id: "s1".into(),
            document_id: "d1".into(),
            loan_date,
            return_date,
        }
    }

    fn old_date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_empty_snapshot() {
        let stats = compute_stats(&LibrarySnapshot::default(), today());
        assert_eq!(stats.subscriber_count, 0);
        assert_eq!(stats.document_count, 0);
        assert_eq!(stats.loan_count, 0);
        assert_eq!(stats.loans_today, 0);
        assert_eq!(stats.returns_today, 0);
        assert!(stats.category_histogram.is_empty());
        assert!(stats.year_histogram.is_empty());
    }

    #[test]
    fn test_counts_match_collection_sizes() {
        for n in [1usize, 7] {
            let snapshot = LibrarySnapshot {
                subscribers: (0..n).map(|i| subscriber(&format!("s{}", i))).collect(),
                documents: (0..n).map(|i| document(&format!("d{}", i), Some("CD"), Some(2000))).collect(),
                loans: (0..n).map(|i| loan(&format!("l{}", i), old_date(), None)).collect(),
            };
            let stats = compute_stats(&snapshot, today());
            assert_eq!(stats.subscriber_count, n as i64);
            assert_eq!(stats.document_count, n as i64);
            assert_eq!(stats.loan_count, n as i64);
        }
    }

    #[test]
    fn test_histograms_partition_documents() {
        let snapshot = LibrarySnapshot {
            documents: vec![
                document("d1", Some("Book"), Some(2020)),
                document("d2", Some("DVD"), Some(2021)),
                document("d3", Some("Book"), None),
                document("d4", None, Some(2020)),
                document("d5", Some(""), Some(1999)),
            ],
            ..Default::default()
        };
        let stats = compute_stats(&snapshot, today());

        let category_total: i64 = stats.category_histogram.iter().map(|c| c.count).sum();
        let year_total: i64 = stats.year_histogram.iter().map(|y| y.count).sum();
        assert_eq!(category_total, stats.document_count);
        assert_eq!(year_total, stats.document_count);
    }

    #[test]
    fn test_category_histogram_keeps_unknown_and_order() {
        let documents = vec![
            document("d1", Some("DVD"), None),
            document("d2", Some("Book"), None),
            document("d3", None, None),
            document("d4", Some("DVD"), None),
            document("d5", Some(""), None),
            document("d6", Some("book"), None),
        ];
        let histogram = category_histogram(&documents);

        let pairs: Vec<(Option<&str>, i64)> = histogram
            .iter()
            .map(|c| (c.category.as_deref(), c.count))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (Some("DVD"), 2),
                (Some("Book"), 1),
                (None, 1),
                (Some(""), 1),
                (Some("book"), 1),
            ]
        );
    }

    #[test]
    fn test_year_histogram_sorted_with_unknown_bucket() {
        let documents = vec![
            document("d1", None, Some(2021)),
            document("d2", None, None),
            document("d3", None, Some(1999)),
            document("d4", None, Some(2021)),
        ];
        let histogram = year_histogram(&documents);

        let pairs: Vec<(Option<i32>, i64)> = histogram.iter().map(|y| (y.year, y.count)).collect();
        assert_eq!(pairs, vec![(None, 1), (Some(1999), 1), (Some(2021), 2)]);
    }

    #[test]
    fn test_today_window_bounds() {
        let window = DayWindow::for_day(today());
        let first = today().and_hms_opt(0, 0, 0).unwrap();
        let last = today().and_hms_milli_opt(23, 59, 59, 999).unwrap();
        let next_day = NaiveDate::from_ymd_opt(2024, 5, 11)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let previous = first - Duration::milliseconds(1);

        assert_eq!(window.start, first);
        assert_eq!(window.end, last);
        assert!(window.contains(first));
        assert!(window.contains(last));
        assert!(!window.contains(next_day));
        assert!(!window.contains(previous));

        let snapshot = LibrarySnapshot {
            loans: vec![
                loan("l1", first, Some(last)),
                loan("l2", last, Some(next_day)),
                loan("l3", next_day, None),
                loan("l4", previous, Some(first)),
            ],
            ..Default::default()
        };
        let stats = compute_stats(&snapshot, today());
        assert_eq!(stats.loans_today, 2);
        assert_eq!(stats.returns_today, 2);
    }

    #[test]
    fn test_same_day_loan_counts_in_both() {
        let snapshot = LibrarySnapshot {
            loans: vec![loan(
                "l1",
                today().and_hms_opt(9, 0, 0).unwrap(),
                Some(today().and_hms_opt(17, 0, 0).unwrap()),
            )],
            ..Default::default()
        };
        let stats = compute_stats(&snapshot, today());
        assert_eq!(stats.loans_today, 1);
        assert_eq!(stats.returns_today, 1);
    }

    #[test]
    fn test_scenario_two_books() {
        let snapshot = LibrarySnapshot {
            documents: vec![
                document("d1", Some("Book"), Some(2020)),
                document("d2", Some("Book"), Some(2021)),
            ],
            ..Default::default()
        };
        let stats = compute_stats(&snapshot, today());

        assert_eq!(stats.category_histogram.len(), 1);
        assert_eq!(stats.category_histogram[0].category.as_deref(), Some("Book"));
        assert_eq!(stats.category_histogram[0].count, 2);
        let years: Vec<(Option<i32>, i64)> = stats.year_histogram.iter().map(|y| (y.year, y.count)).collect();
        assert_eq!(years, vec![(Some(2020), 1), (Some(2021), 1)]);
        assert!(AvailabilityPolicy::Legacy.is_available(&snapshot.loans, &["d1"], today()));
    }

    #[test]
    fn test_scenario_loan_created_today() {
        let snapshot = LibrarySnapshot {
            documents: vec![document("d1", Some("Book"), Some(2020))],
            loans: vec![loan("l1", today().and_time(NaiveTime::MIN), None)],
            ..Default::default()
        };
        let stats = compute_stats(&snapshot, today());

        assert_eq!(stats.loans_today, 1);
        assert!(!AvailabilityPolicy::Legacy.is_available(&snapshot.loans, &["d1"], today()));
        assert!(!AvailabilityPolicy::OpenLoan.is_available(&snapshot.loans, &["d1"], today()));
    }

    #[tokio::test]
    async fn test_purge_then_stats_has_no_returns_today() {
        let now = Local::now().naive_local();
        let loans = Arc::new(Mutex::new(vec![
            loan("l1", old_date(), Some(now)),
            loan("l2", old_date(), None),
            loan("l3", old_date(), Some(old_date())),
        ]));

        let mut store = MockLibraryStore::new();
        let purged = loans.clone();
        store
            .expect_purge_loans_returned_within()
            .times(1)
            .returning(move |window| {
                let mut loans = purged.lock().unwrap();
                let before = loans.len();
                loans.retain(|l| !l.return_date.map_or(false, |d| window.contains(d)));
                Ok((before - loans.len()) as u64)
            });
        let snapshot_loans = loans.clone();
        store.expect_snapshot().returning(move || {
            Ok(LibrarySnapshot {
                loans: snapshot_loans.lock().unwrap().clone(),
                ..Default::default()
            })
        });

        let service = StatsService::new(Arc::new(store));
        let response = service.purge_returned_today().await.unwrap();

        assert_eq!(response.deleted_count, 1);
        assert_eq!(response.stats.returns_today, 0);
        assert_eq!(response.stats.loan_count, 2);
    }
}
