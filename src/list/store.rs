//! Displayed row collection for a list view.

/// Records that carry a numeric identity; the store replaces rows by it.
pub trait Identified {
    fn id(&self) -> i64;
}

/// In-memory collection of displayed rows with a text filter.
///
/// Merge rules: a persisted create appends, a persisted edit replaces the
/// row with the same identity, a confirmed delete removes it. The filter
/// only affects `visible()`; the row set itself is never filtered away.
pub struct ListStore<T: Identified> {
    rows: Vec<T>,
    filter: String,
    matches: Box<dyn Fn(&T, &str) -> bool + Send + Sync>,
}

impl<T: Identified + Clone> ListStore<T> {
    pub fn new(matches: Box<dyn Fn(&T, &str) -> bool + Send + Sync>) -> Self {
        Self {
            rows: Vec::new(),
            filter: String::new(),
            matches,
        }
    }

    /// Replace the whole collection (a fresh fetch).
    pub fn replace_all(&mut self, rows: Vec<T>) {
        self.rows = rows;
    }

    /// Merge one persisted record: replace the row with the same identity,
    /// or append when none exists.
    pub fn upsert(&mut self, record: T) {
        match self.rows.iter_mut().find(|row| row.id() == record.id()) {
            Some(row) => *row = record,
            None => self.rows.push(record),
        }
    }

    /// Remove the row with `id`; returns whether one was present.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id() != id);
        self.rows.len() != before
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Rows matching the current filter (all rows when the filter is empty).
    pub fn visible(&self) -> Vec<T> {
        if self.filter.is_empty() {
            return self.rows.clone();
        }
        self.rows
            .iter()
            .filter(|row| (self.matches)(row, &self.filter))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
