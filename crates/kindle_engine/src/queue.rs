use chrono::{DateTime, Local};

/// Identity of a queued article, stable while it stays in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub id: EntryId,
    pub url: String,
    pub title: String,
    pub added_at: DateTime<Local>,
}

/// Articles waiting for a batch send, in insertion order.
#[derive(Debug, Default)]
pub struct ArticleQueue {
    entries: Vec<QueueEntry>,
    next_id: u64,
}

impl ArticleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an article and returns the new queue length.
    pub fn push(&mut self, url: impl Into<String>, title: impl Into<String>) -> usize {
        self.push_at(url, title, Local::now())
    }

    pub fn push_at(
        &mut self,
        url: impl Into<String>,
        title: impl Into<String>,
        added_at: DateTime<Local>,
    ) -> usize {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(QueueEntry {
            id,
            url: url.into(),
            title: title.into(),
            added_at,
        });
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Copy of the current entries, for work done without holding a lock.
    pub fn snapshot(&self) -> Vec<QueueEntry> {
        self.entries.clone()
    }

    /// Removes the entry with `id`. Returns false when it is already gone
    /// (e.g. the queue was cleared in the meantime).
    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_reports_length_and_keeps_order() {
        let mut queue = ArticleQueue::new();
        assert_eq!(queue.push("https://a.example", "A"), 1);
        assert_eq!(queue.push("https://b.example", "B"), 2);
        let titles: Vec<_> = queue.entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn remove_targets_one_entry_even_with_duplicate_urls() {
        let mut queue = ArticleQueue::new();
        queue.push("https://a.example", "A");
        queue.push("https://a.example", "A again");
        let first = queue.entries()[0].id;

        assert!(queue.remove(first));
        assert!(!queue.remove(first));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.entries()[0].title, "A again");
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let mut queue = ArticleQueue::new();
        queue.push("https://a.example", "A");
        let old = queue.snapshot();
        queue.clear();
        assert!(queue.is_empty());

        queue.push("https://b.example", "B");
        assert!(!queue.remove(old[0].id));
        assert_eq!(queue.len(), 1);
    }
}
