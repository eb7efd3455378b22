use crate::{Book, Id};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Every book the user has, keyed by book identifier.
///
/// This is the unit of persistence: it is always saved and loaded whole. Key
/// order has no meaning; the ordered map only keeps serialization stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library(BTreeMap<Id, Book>);
impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key a sequence of books by their identifiers.
    ///
    /// Books without an identifier are dropped. When two books share an
    /// identifier, the later one wins.
    pub fn from_books(books: impl IntoIterator<Item = Book>) -> Self {
        Self(books.into_iter().filter(|book| !book.id.is_empty()).map(|book| (book.id.clone(), book)).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.0.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Book> {
        self.0.get_mut(id)
    }

    /// Insert a book under its own identifier, returning any book it replaced.
    pub fn insert(&mut self, book: Book) -> Option<Book> {
        self.0.insert(book.id.clone(), book)
    }

    pub fn remove(&mut self, id: &str) -> Option<Book> {
        self.0.remove(id)
    }

    /// Books in key order.
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.0.values()
    }

    /// Well-formed books, most recently edited first.
    pub fn list(&self) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books().filter(|book| book.is_well_formed()).collect();
        books.sort_by_key(|book| Reverse(book.last_edited));
        books
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Timestamp;
    use serde_json::json;

    fn book(id: &str, edited: i64) -> Book {
        Book {
            id: Id::from(id),
            title: Some(String::new()),
            last_edited: Timestamp::from_millis(edited),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_books_drops_missing_ids() {
        let library = Library::from_books([book("a", 1), book("", 2), book("b", 3)]);
        assert_eq!(library.len(), 2);
        assert!(library.contains("a"));
        assert!(library.contains("b"));
    }

    #[test]
    fn test_from_books_later_duplicate_wins() {
        let library = Library::from_books([book("a", 1), book("a", 9)]);
        assert_eq!(library.len(), 1);
        assert_eq!(library.get("a").unwrap().last_edited, Timestamp::from_millis(9));
    }

    #[test]
    fn test_list_sorts_and_filters() {
        let mut library = Library::from_books([book("old", 10), book("new", 30), book("mid", 20)]);
        library.insert(Book { id: Id::from("never-edited"), ..Default::default() });
        library.insert(Book { title: None, ..book("no-title", 40) });
        let ids: Vec<_> = library.list().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["new", "mid", "old"]);
    }

    #[test]
    fn test_keyed_wire_shape() {
        let library = Library::from_books([book("b1", 1)]);
        let value = serde_json::to_value(&library).unwrap();
        assert_eq!(value["b1"]["lastEdited"], json!(1));
        let decoded: Library = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, library);
    }
}
