use crate::date_key::DateKey;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

type DayEntries = BTreeMap<DateKey, BTreeSet<String>>;

/// Sparse record of which task ids were completed on which day.
///
/// A date is present only while at least one task is recorded for it; ids of
/// deleted tasks may linger and are ignored by every projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DayEntries", into = "DayEntries")]
pub struct CompletionLog {
    days: DayEntries,
}

impl From<DayEntries> for CompletionLog {
    fn from(mut days: DayEntries) -> Self {
        days.retain(|_, ids| !ids.is_empty());
        Self { days }
    }
}

impl From<CompletionLog> for DayEntries {
    fn from(log: CompletionLog) -> Self {
        log.days
    }
}

impl CompletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the completion of `task_id` on `date` and returns whether it is
    /// now marked done.
    pub fn toggle(&mut self, date: DateKey, task_id: &str) -> bool {
        let ids = self.days.entry(date).or_default();
        let done = if ids.remove(task_id) {
            false
        } else {
            ids.insert(task_id.to_string());
            true
        };
        if ids.is_empty() {
            self.days.remove(&date);
        }
        done
    }

    pub fn is_done(&self, date: DateKey, task_id: &str) -> bool {
        self.days
            .get(&date)
            .is_some_and(|ids| ids.contains(task_id))
    }

    pub fn completed_on(&self, date: DateKey) -> Option<&BTreeSet<String>> {
        self.days.get(&date)
    }

    /// Dates on which `task_id` was completed, oldest first.
    pub fn done_dates<'a>(&'a self, task_id: &'a str) -> impl Iterator<Item = DateKey> + 'a {
        self.days
            .iter()
            .filter(move |(_, ids)| ids.contains(task_id))
            .map(|(date, _)| *date)
    }

    /// Number of days with at least one completion.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> DateKey {
        DateKey::from_ymd(2026, 3, d).unwrap()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut log = CompletionLog::new();
        assert!(log.toggle(day(1), "a"));
        assert!(log.is_done(day(1), "a"));
        assert!(!log.toggle(day(1), "a"));
        assert!(!log.is_done(day(1), "a"));
    }

    #[test]
    fn double_toggle_is_a_no_op() {
        let mut log = CompletionLog::new();
        log.toggle(day(1), "a");
        log.toggle(day(2), "b");
        let before = log.clone();

        for (date, id) in [(day(1), "a"), (day(1), "b"), (day(9), "c")] {
            log.toggle(date, id);
            log.toggle(date, id);
            assert_eq!(log, before);
        }
    }

    #[test]
    fn removing_last_id_prunes_the_day() {
        let mut log = CompletionLog::new();
        log.toggle(day(4), "a");
        log.toggle(day(4), "b");
        log.toggle(day(4), "a");
        assert_eq!(log.len(), 1);
        log.toggle(day(4), "b");
        assert!(log.is_empty());
        assert!(log.completed_on(day(4)).is_none());
        assert_eq!(log, CompletionLog::new());
    }

    #[test]
    fn done_dates_are_ascending_per_task() {
        let mut log = CompletionLog::new();
        log.toggle(day(7), "a");
        log.toggle(day(2), "a");
        log.toggle(day(5), "b");
        let dates: Vec<_> = log.done_dates("a").collect();
        assert_eq!(dates, vec![day(2), day(7)]);
    }

    #[test]
    fn deserializing_prunes_empty_days() {
        let log: CompletionLog =
            serde_json::from_str(r#"{"2026-03-01":["a","a"],"2026-03-02":[]}"#).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.completed_on(day(1)).map(|ids| ids.len()), Some(1));
        assert_eq!(
            serde_json::to_string(&log).unwrap(),
            r#"{"2026-03-01":["a"]}"#
        );
    }

    #[test]
    fn rejects_non_canonical_date_keys() {
        assert!(serde_json::from_str::<CompletionLog>(r#"{"3/1/2026":["a"]}"#).is_err());
    }
}
