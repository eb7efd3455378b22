use crate::{Chapter, HistoryEntry, Id, Snapshot, Timestamp};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Placeholder shown for books without a title. Never stored.
pub const UNTITLED: &str = "Untitled Book";

/// A titled work made of ordered chapters, plus its own change history.
///
/// Every field tolerates being absent on decode (partially written records
/// from older versions of the editor exist in the wild), but a field of the
/// wrong JSON type fails the whole decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Book {
    pub id: Id,
    /// Stored exactly as the user left it; may be empty. `None` when the
    /// record has no `title` key at all, which is kept that way on save.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub last_edited: Timestamp,
    /// Reading order.
    pub chapters: Vec<Chapter>,
    /// Append order (oldest first).
    pub change_history: Vec<HistoryEntry>,
}
impl Book {
    /// A fresh, untitled book with a single blank chapter.
    pub fn new(id: Id, first_chapter: Id, now: Timestamp) -> Self {
        Self {
            id,
            title: Some(String::new()),
            last_edited: now,
            chapters: vec![Chapter::blank(first_chapter)],
            change_history: Vec::new(),
        }
    }

    /// The stored title, or `""` when the record has none.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Title for display: the stored title, or [`UNTITLED`] when it is blank.
    pub fn display_title(&self) -> &str {
        match self.title().trim().is_empty() {
            true => UNTITLED,
            false => self.title(),
        }
    }

    /// Records without an identifier, a title key or an edit time are
    /// skipped by listings.
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_empty() && self.title.is_some() && self.last_edited.is_set()
    }

    pub fn touch(&mut self, now: Timestamp) {
        self.last_edited = now;
    }

    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == id)
    }

    pub fn chapter_mut(&mut self, id: &str) -> Option<&mut Chapter> {
        self.chapters.iter_mut().find(|c| c.id == id)
    }

    /// Remove a chapter by id, keeping the relative order of the rest.
    pub fn remove_chapter(&mut self, id: &str) -> Option<Chapter> {
        let index = self.chapters.iter().position(|c| c.id == id)?;
        Some(self.chapters.remove(index))
    }

    /// Deep copy of the title and chapters.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot { title: self.title().to_string(), chapters: self.chapters.clone() }
    }

    /// Overwrite title and chapters with a deep copy of `snapshot`.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) {
        self.title = Some(snapshot.title.clone());
        self.chapters = snapshot.chapters.clone();
    }

    /// Append a history entry, then evict the oldest entries until at most
    /// `limit` remain. Returns whatever was evicted, oldest first.
    pub fn record(&mut self, entry: HistoryEntry, limit: usize) -> Vec<HistoryEntry> {
        self.change_history.push(entry);
        let excess = self.change_history.len().saturating_sub(limit);
        self.change_history.drain(..excess).collect()
    }

    pub fn history_entry(&self, id: &str) -> Option<&HistoryEntry> {
        self.change_history.iter().find(|e| e.id == id)
    }

    pub fn remove_history_entry(&mut self, id: &str) -> Option<HistoryEntry> {
        let index = self.change_history.iter().position(|e| e.id == id)?;
        Some(self.change_history.remove(index))
    }

    /// The most recently appended entry.
    pub fn latest_history_entry(&self) -> Option<&HistoryEntry> {
        self.change_history.last()
    }

    /// History for presentation: newest timestamp first. Entries sharing a
    /// timestamp are listed in reverse append order. The stored log is not
    /// reordered.
    pub fn history_newest_first(&self) -> Vec<&HistoryEntry> {
        let mut entries: Vec<&HistoryEntry> = self.change_history.iter().rev().collect();
        entries.sort_by_key(|e| Reverse(e.timestamp));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntryKind;
    use rstest::rstest;
    use serde_json::json;

    fn chapter(id: &str) -> Chapter {
        Chapter { id: Id::from(id), title: id.to_uppercase(), content: format!("content of {id}") }
    }

    fn entry(id: &str, millis: i64) -> HistoryEntry {
        HistoryEntry::new(Id::from(id), Timestamp::from_millis(millis), Snapshot::default(), EntryKind::Auto)
    }

    #[test]
    fn test_new_book_has_one_blank_chapter() {
        let book = Book::new(Id::from("b1"), Id::from("c1"), Timestamp::from_millis(5));
        assert_eq!(book.title(), "");
        assert_eq!(book.chapters, vec![Chapter::blank(Id::from("c1"))]);
        assert!(book.change_history.is_empty());
        assert!(book.is_well_formed());
    }

    #[rstest]
    #[case("", UNTITLED)]
    #[case("   ", UNTITLED)]
    #[case("My Novel", "My Novel")]
    fn test_display_title(#[case] stored: &str, #[case] expected: &str) {
        let book = Book { title: Some(stored.to_string()), ..Default::default() };
        assert_eq!(book.display_title(), expected);
        assert_eq!(book.title(), stored);
    }

    #[test]
    fn test_remove_chapter_preserves_order() {
        let mut book = Book { chapters: vec![chapter("a"), chapter("b"), chapter("c")], ..Default::default() };
        assert_eq!(book.remove_chapter("b"), Some(chapter("b")));
        let ids: Vec<_> = book.chapters.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(book.remove_chapter("missing"), None);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut book = Book { title: Some("T".to_string()), chapters: vec![chapter("a")], ..Default::default() };
        let snapshot = book.snapshot();
        book.chapter_mut("a").unwrap().content = "changed".to_string();
        book.set_title("T2");
        assert_eq!(snapshot.title, "T");
        assert_eq!(snapshot.chapters[0].content, "content of a");
        book.apply_snapshot(&snapshot);
        assert_eq!(book.chapters, vec![chapter("a")]);
        assert_eq!(book.title(), "T");
    }

    #[test]
    fn test_record_evicts_oldest() {
        let mut book = Book::default();
        let mut evicted = Vec::new();
        for i in 0..5 {
            evicted.extend(book.record(entry(&format!("h{i}"), i), 3));
        }
        let kept: Vec<_> = book.change_history.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(kept, ["h2", "h3", "h4"]);
        let gone: Vec<_> = evicted.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(gone, ["h0", "h1"]);
    }

    #[test]
    fn test_history_newest_first() {
        let book = Book {
            change_history: vec![entry("old", 10), entry("new", 30), entry("tie-a", 20), entry("tie-b", 20)],
            ..Default::default()
        };
        let order: Vec<_> = book.history_newest_first().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, ["new", "tie-b", "tie-a", "old"]);
        // Stored order untouched
        assert_eq!(book.change_history[0].id, "old");
        assert_eq!(book.latest_history_entry().unwrap().id, "tie-b");
    }

    #[test]
    fn test_wire_field_names() {
        let book = Book::new(Id::from("b1"), Id::from("c1"), Timestamp::from_millis(7));
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "b1",
                "title": "",
                "lastEdited": 7,
                "chapters": [{"id": "c1", "title": "", "content": ""}],
                "changeHistory": [],
            })
        );
    }

    #[test]
    fn test_partial_record_decodes() {
        let book: Book = serde_json::from_value(json!({"id": "b1", "title": "Old", "chapters": []})).unwrap();
        assert!(book.change_history.is_empty());
        assert!(!book.last_edited.is_set());
        assert!(!book.is_well_formed());
    }

    #[test]
    fn test_missing_title_is_not_listable_and_stays_missing() {
        let book: Book = serde_json::from_value(json!({"id": "b1", "lastEdited": 5, "chapters": []})).unwrap();
        assert_eq!(book.title, None);
        assert_eq!(book.display_title(), UNTITLED);
        assert!(!book.is_well_formed());
        assert!(serde_json::to_value(&book).unwrap().get("title").is_none());

        let titled: Book = serde_json::from_value(json!({"id": "b1", "title": "", "lastEdited": 5})).unwrap();
        assert!(titled.is_well_formed());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        assert!(serde_json::from_value::<Book>(json!({"id": "b1", "title": 12})).is_err());
        assert!(serde_json::from_value::<Book>(json!({"id": "b1", "chapters": "nope"})).is_err());
    }
}
