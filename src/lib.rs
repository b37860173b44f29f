pub mod config;
pub mod error;
pub mod importer;
pub mod model;
pub mod store;

use std::sync::{Arc, RwLock};

use rand::Rng;

use crate::store::ShelfStore;

// Re-export key types for convenience
pub use crate::config::{Config, ImportPolicy};
pub use crate::error::ShelfError;
pub use crate::importer::CatalogImporter;
pub use crate::model::{Author, Book, BookDraft};

/// Thread-safe shelf handle shared across request handlers
pub type SharedShelf = Arc<RwLock<Shelf>>;

/// Identifiers are decimal tokens drawn from this range
const ID_RANGE: u32 = 1_000_000;

/// Main interface over the book collection
///
/// Owns the store and assigns identifiers; all mutation and lookup
/// passes through here, behind the shared lock.
pub struct Shelf {
    store: ShelfStore,
}

impl Shelf {
    pub fn new() -> Self {
        Self {
            store: ShelfStore::new(),
        }
    }

    /// Wrap in Arc<RwLock<>> for shared access
    pub fn into_shared(self) -> SharedShelf {
        Arc::new(RwLock::new(self))
    }

    /// Snapshot of the full sequence, empty shelf is valid
    pub fn list(&self) -> Vec<Book> {
        self.store.list().to_vec()
    }

    /// Look up a book by id, `None` when absent
    pub fn get(&self, id: &str) -> Option<Book> {
        self.store.get(id).cloned()
    }

    /// Create a book from a draft with a fresh identifier
    pub fn create(&mut self, draft: BookDraft) -> Book {
        let book = Book {
            id: self.next_id(),
            title: draft.title,
            author: draft.author,
        };
        self.store.push(book.clone());
        book
    }

    /// Replace the book with matching id in place
    ///
    /// The stored id is forced to the argument, so a client-supplied id
    /// never wins. Absent ids are an error, not a silent no-op.
    pub fn replace(&mut self, id: &str, draft: BookDraft) -> Result<Book, ShelfError> {
        let book = Book {
            id: id.to_string(),
            title: draft.title,
            author: draft.author,
        };

        match self.store.replace(id, book.clone()) {
            Some(_) => Ok(book),
            None => Err(ShelfError::BookNotFound(id.to_string())),
        }
    }

    /// Remove a book by id and return the remaining sequence
    ///
    /// Idempotent: an unknown id leaves the shelf unchanged.
    pub fn remove(&mut self, id: &str) -> Vec<Book> {
        self.store.remove(id);
        self.list()
    }

    /// Clear the shelf and repopulate it from drafts in order
    pub fn restock(&mut self, drafts: Vec<BookDraft>) -> Vec<Book> {
        self.store.clear();
        drafts.into_iter().map(|draft| self.create(draft)).collect()
    }

    pub fn book_count(&self) -> usize {
        self.store.len()
    }

    /// Draw a decimal token not currently on the shelf
    fn next_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let candidate = rng.gen_range(0..ID_RANGE).to_string();
            if !self.store.contains(&candidate) {
                return candidate;
            }
        }
    }
}

impl Default for Shelf {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn draft(title: &str, firstname: &str, lastname: &str) -> BookDraft {
        BookDraft {
            title: title.to_string(),
            author: Author::new(firstname, lastname),
        }
    }

    #[test]
    fn test_create_then_get_round_trip() {
        let mut shelf = Shelf::new();

        let created = shelf.create(draft("1984", "George", "Orwell"));
        assert!(!created.id.is_empty());

        let fetched = shelf.get(&created.id).unwrap();
        assert_eq!(fetched.title, "1984");
        assert_eq!(fetched.author, Author::new("George", "Orwell"));
    }

    #[test]
    fn test_example_scenario() {
        let mut shelf = Shelf::new();
        assert!(shelf.list().is_empty());

        let book = shelf.create(draft("1984", "George", "Orwell"));
        assert!(!book.id.is_empty());
        assert_eq!(shelf.list(), vec![book.clone()]);

        shelf.remove(&book.id);
        assert!(shelf.list().is_empty());
    }

    #[test]
    fn test_remove_unknown_id_is_idempotent() {
        let mut shelf = Shelf::new();
        shelf.create(draft("Dune", "Frank", "Herbert"));
        shelf.create(draft("Solaris", "Stanisław", "Lem"));

        let before = shelf.list();
        let after = shelf.remove("no-such-id");

        assert_eq!(before, after);
        assert_eq!(shelf.list(), before);
    }

    #[test]
    fn test_replace_preserves_identifier() {
        let mut shelf = Shelf::new();
        let original = shelf.create(draft("Dune", "Frank", "Herbert"));

        let replaced = shelf
            .replace(&original.id, draft("Dune Messiah", "Frank", "Herbert"))
            .unwrap();

        assert_eq!(replaced.id, original.id);
        assert_eq!(shelf.get(&original.id).unwrap().title, "Dune Messiah");
        assert_eq!(shelf.book_count(), 1);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut shelf = Shelf::new();
        let a = shelf.create(draft("A", "", ""));
        let b = shelf.create(draft("B", "", ""));
        let c = shelf.create(draft("C", "", ""));

        shelf.replace(&b.id, draft("B2", "", "")).unwrap();

        let ids: Vec<String> = shelf.list().into_iter().map(|bk| bk.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn test_replace_unknown_id_is_error() {
        let mut shelf = Shelf::new();
        shelf.create(draft("Dune", "Frank", "Herbert"));

        let result = shelf.replace("no-such-id", draft("Ghost", "", ""));
        assert!(matches!(result, Err(ShelfError::BookNotFound(_))));
        assert_eq!(shelf.book_count(), 1);
    }

    #[test]
    fn test_restock_replaces_contents_in_order() {
        let mut shelf = Shelf::new();
        shelf.create(draft("Stale", "", ""));

        let drafts = vec![
            draft("Wuthering Heights", "Emily Brontë", ""),
            draft("Jane Eyre", "Charlotte Brontë", ""),
            draft("Middlemarch", "George Eliot", ""),
        ];
        let books = shelf.restock(drafts);

        assert_eq!(books.len(), 3);
        assert_eq!(shelf.book_count(), 3);

        let titles: Vec<String> = shelf.list().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["Wuthering Heights", "Jane Eyre", "Middlemarch"]);

        let ids: HashSet<String> = books.into_iter().map(|b| b.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_concurrent_creates_yield_distinct_ids() {
        let shelf = Shelf::new().into_shared();
        let mut handles = Vec::new();

        for i in 0..16 {
            let shelf = Arc::clone(&shelf);
            handles.push(std::thread::spawn(move || {
                let mut guard = shelf.write().unwrap();
                guard.create(BookDraft {
                    title: format!("book {i}"),
                    author: Author::default(),
                })
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.join().unwrap().id);
        }

        let guard = shelf.read().unwrap();
        assert_eq!(guard.book_count(), 16);
        assert_eq!(ids.len(), 16);
    }
}
