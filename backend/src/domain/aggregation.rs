//! Dashboard aggregation over a fetched record set.
//!
//! Everything here is a pure function of its inputs and is recomputed from
//! scratch on every call. Counts cover the whole input; the record list is
//! the subset matching the search term, in the original order.

use super::{Record, StatusBucket, UserId, Viewer};

/// Per-bucket record counts.
///
/// ## Invariants
/// - `total()` never exceeds the number of tallied records; it is equal iff
///   every record carries a known status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    counts: [usize; StatusBucket::ALL.len()],
}

impl StatusCounts {
    /// Count records per known bucket; unknown or missing statuses are skipped.
    ///
    /// # Examples
    /// ```
    /// use tracker::domain::{StatusBucket, StatusCounts};
    ///
    /// let counts = StatusCounts::tally(&[]);
    /// assert_eq!(counts.get(StatusBucket::Active), 0);
    /// assert_eq!(counts.total(), 0);
    /// ```
    pub fn tally(records: &[Record]) -> Self {
        let mut counts = Self::default();
        for bucket in records.iter().filter_map(|record| record.status.bucket()) {
            counts.counts[Self::slot(bucket)] += 1;
        }
        counts
    }

    /// Count for one bucket.
    pub fn get(&self, bucket: StatusBucket) -> usize {
        self.counts[Self::slot(bucket)]
    }

    /// Sum over all four buckets.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(bucket, count)` pairs in [`StatusBucket::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (StatusBucket, usize)> + '_ {
        StatusBucket::ALL
            .into_iter()
            .map(move |bucket| (bucket, self.get(bucket)))
    }

    const fn slot(bucket: StatusBucket) -> usize {
        match bucket {
            StatusBucket::Active => 0,
            StatusBucket::Completed => 1,
            StatusBucket::Inactive => 2,
            StatusBucket::Submitted => 3,
        }
    }
}

/// Lower-cased free-text search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Build a term from raw input. An empty string matches everything.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().to_lowercase())
    }

    /// Whether the term is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive substring match on name or website.
    ///
    /// Absent fields read as the empty string.
    pub fn matches(&self, record: &Record) -> bool {
        if self.is_empty() {
            return true;
        }
        [record.name.as_deref(), record.website.as_deref()]
            .into_iter()
            .any(|field| field.unwrap_or_default().to_lowercase().contains(&self.0))
    }
}

/// Records matching `term`, in their original order.
pub fn filter_records(records: &[Record], term: &SearchTerm) -> Vec<Record> {
    records
        .iter()
        .filter(|record| term.matches(record))
        .cloned()
        .collect()
}

/// Counts plus filtered records, as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOverview {
    /// Bucket counts over the whole input.
    pub counts: StatusCounts,
    /// Number of records in the whole input.
    pub total: usize,
    /// Records matching the search term.
    pub records: Vec<Record>,
}

/// Tally `records` and filter them by `term`.
///
/// # Examples
/// ```
/// use tracker::domain::{summarise, SearchTerm};
///
/// let overview = summarise(&[], &SearchTerm::new("tech"));
/// assert_eq!(overview.total, 0);
/// assert!(overview.records.is_empty());
/// ```
pub fn summarise(records: &[Record], term: &SearchTerm) -> RecordOverview {
    RecordOverview {
        counts: StatusCounts::tally(records),
        total: records.len(),
        records: filter_records(records, term),
    }
}

/// Tabs on the "my projects" page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectTab {
    /// Every record.
    #[default]
    All,
    /// Anything not yet completed, including unknown statuses.
    Active,
    /// Completed records only.
    Completed,
}

impl ProjectTab {
    /// Whether `record` belongs on this tab.
    pub fn includes(self, record: &Record) -> bool {
        let completed = record.status.bucket() == Some(StatusBucket::Completed);
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }

    /// Keep records belonging on this tab, preserving order.
    pub fn apply(self, records: Vec<Record>) -> Vec<Record> {
        records
            .into_iter()
            .filter(|record| self.includes(record))
            .collect()
    }
}

/// Which records a viewer may list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordScope {
    /// Every record.
    All,
    /// Records created by one user.
    OwnedBy(UserId),
}

impl RecordScope {
    /// Scope for `viewer`; `None` when nobody is signed in.
    pub fn for_viewer(viewer: &Viewer) -> Option<Self> {
        let identity = viewer.identity()?;
        if identity.is_admin() {
            Some(Self::All)
        } else {
            Some(Self::OwnedBy(identity.uid().clone()))
        }
    }

    /// Whether `record` is visible in this scope.
    pub fn includes(&self, record: &Record) -> bool {
        match self {
            Self::All => true,
            Self::OwnedBy(uid) => record.is_owned_by(uid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DisplayName, DocumentId, EmailAddress, Identity, Progress, RecordStatus, Role,
    };
    use rstest::rstest;

    fn record(id: &str, name: Option<&str>, website: Option<&str>, status: RecordStatus) -> Record {
        Record {
            id: DocumentId::new(id).expect("id"),
            name: name.map(str::to_owned),
            website: website.map(str::to_owned),
            status,
            created_by: None,
            progress: Progress::default(),
            history: Vec::new(),
            email: None,
            phone: None,
            description: None,
            requirements: None,
            notes: None,
            created_at: None,
        }
    }

    fn with_status(id: &str, status: StatusBucket) -> Record {
        record(id, None, None, status.into())
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_ref()).collect()
    }

    #[test]
    fn counts_cover_every_bucket() {
        let records = [
            with_status("a", StatusBucket::Active),
            with_status("b", StatusBucket::Active),
            with_status("c", StatusBucket::Submitted),
        ];
        let overview = summarise(&records, &SearchTerm::default());
        let counts: Vec<_> = overview.counts.iter().collect();
        assert_eq!(
            counts,
            vec![
                (StatusBucket::Active, 2),
                (StatusBucket::Completed, 0),
                (StatusBucket::Inactive, 0),
                (StatusBucket::Submitted, 1),
            ]
        );
        assert_eq!(overview.counts.total(), overview.total);
    }

    #[rstest]
    #[case("tech", vec!["tech"])]
    #[case("STUDIOS", vec!["creative"])]
    #[case(".org", vec!["creative"])]
    #[case("", vec!["tech", "creative"])]
    fn search_matches_name_or_website(#[case] term: &str, #[case] expected: Vec<&str>) {
        let records = [
            record(
                "tech",
                Some("Tech Solutions Inc."),
                Some("techsolutions.com"),
                StatusBucket::Active.into(),
            ),
            record(
                "creative",
                Some("Creative Studios"),
                Some("creativestudios.org"),
                StatusBucket::Active.into(),
            ),
        ];
        let overview = summarise(&records, &SearchTerm::new(term));
        assert_eq!(ids(&overview.records), expected);
        assert_eq!(overview.total, 2);
    }

    #[test]
    fn empty_input_yields_zero_counts_and_no_records() {
        let overview = summarise(&[], &SearchTerm::new("anything"));
        assert!(overview.counts.iter().all(|(_, count)| count == 0));
        assert!(overview.records.is_empty());
    }

    #[test]
    fn unknown_statuses_are_uncounted_but_listed() {
        let records = vec![
            with_status("a", StatusBucket::Active),
            record("b", Some("Global Retail"), None, RecordStatus::Unrecognised("In Progress".into())),
            record("c", None, None, RecordStatus::Missing),
        ];
        let overview = summarise(&records, &SearchTerm::default());
        assert_eq!(overview.counts.total(), 1);
        assert!(overview.counts.total() < overview.total);
        assert_eq!(ids(&overview.records), vec!["a", "b", "c"]);
    }

    #[rstest]
    #[case("TECH")]
    #[case("solutions")]
    #[case(".com")]
    fn search_is_case_insensitive_over_name_and_website(#[case] search: &str) {
        let filtered = filter_records(&two_named_records(), &SearchTerm::new(search));
        assert_eq!(ids(&filtered), vec!["tech"]);
    }

    #[test]
    fn absent_fields_only_match_the_empty_term() {
        let records = vec![record("blank", None, None, RecordStatus::Missing)];
        assert!(filter_records(&records, &SearchTerm::new("a")).is_empty());
        assert_eq!(filter_records(&records, &SearchTerm::new("")).len(), 1);
    }

    #[rstest]
    #[case("")]
    #[case("s")]
    #[case("studios")]
    fn filtering_is_idempotent(#[case] search: &str) {
        let term = SearchTerm::new(search);
        let once = filter_records(&two_named_records(), &term);
        let twice = filter_records(&once, &term);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_term_returns_input_unchanged() {
        let records = two_named_records();
        assert_eq!(filter_records(&records, &SearchTerm::new("")), records);
    }

    #[rstest]
    #[case(ProjectTab::All, vec!["a", "b", "c"])]
    #[case(ProjectTab::Active, vec!["a", "c"])]
    #[case(ProjectTab::Completed, vec!["b"])]
    fn project_tabs_split_on_completion(#[case] tab: ProjectTab, #[case] expected: Vec<&str>) {
        let records = vec![
            with_status("a", StatusBucket::Submitted),
            with_status("b", StatusBucket::Completed),
            record("c", None, None, RecordStatus::Unrecognised("Planning".into())),
        ];
        assert_eq!(ids(&tab.apply(records)), expected);
    }

    #[test]
    fn scope_limits_users_to_their_own_records() {
        let uid = UserId::new("owner").expect("uid");
        let identity = Identity::new(
            uid.clone(),
            DisplayName::new("Owner").expect("name"),
            EmailAddress::new("owner@example.com").expect("email"),
            Role::User,
        );
        let scope = RecordScope::for_viewer(&Viewer::SignedIn(identity)).expect("signed in");
        let mut mine = with_status("mine", StatusBucket::Active);
        mine.created_by = Some(uid);
        let theirs = with_status("theirs", StatusBucket::Active);
        assert!(scope.includes(&mine));
        assert!(!scope.includes(&theirs));
        assert!(RecordScope::for_viewer(&Viewer::Anonymous).is_none());
    }
}
