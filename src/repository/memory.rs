//! In-memory repository
//!
//! Mirrors the PostgreSQL schema: serial ids that are never reused, rows
//! ordered by id, unique lead emails and usernames, and the same cascades on
//! delete.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    users::USERNAME_TAKEN, AuthorsRepository, BooksRepository, LeadsRepository,
    LibrariesRepository, Repository, UsersRepository,
};
use crate::{
    error::{AppError, AppResult},
    models::{book::BookWrite, lead::NewLead, Author, Book, Lead, Library, User},
};

#[derive(Debug, Clone)]
struct BookRecord {
    id: i32,
    title: String,
    author_id: i32,
    library_ids: BTreeSet<i32>,
}

#[derive(Debug, Default)]
struct Sequences {
    libraries: i32,
    authors: i32,
    books: i32,
    leads: i32,
    users: i32,
}

fn next_id(sequence: &mut i32) -> i32 {
    *sequence += 1;
    *sequence
}

#[derive(Debug, Default)]
struct Store {
    libraries: BTreeMap<i32, Library>,
    authors: BTreeMap<i32, Author>,
    books: BTreeMap<i32, BookRecord>,
    leads: BTreeMap<i32, Lead>,
    users: BTreeMap<i32, User>,
    sequences: Sequences,
}

impl Store {
    fn hydrate(&self, record: &BookRecord) -> AppResult<Book> {
        let author = self.authors.get(&record.author_id).cloned().ok_or_else(|| {
            AppError::Internal(format!(
                "Book {} references missing author {}",
                record.id, record.author_id
            ))
        })?;

        let libraries = record
            .library_ids
            .iter()
            .filter_map(|id| self.libraries.get(id).cloned())
            .collect();

        Ok(Book {
            id: record.id,
            title: record.title.clone(),
            author,
            libraries,
        })
    }

    fn hydrate_all<'a>(&self, records: impl Iterator<Item = &'a BookRecord>) -> AppResult<Vec<Book>> {
        records.map(|record| self.hydrate(record)).collect()
    }

    // Foreign keys the database would enforce
    fn check_book_refs(&self, data: &BookWrite) -> AppResult<()> {
        if !self.authors.contains_key(&data.author_id) {
            return Err(AppError::Internal(format!(
                "Foreign key violation: author {} does not exist",
                data.author_id
            )));
        }
        if let Some(id) = data
            .library_ids
            .iter()
            .find(|id| !self.libraries.contains_key(id))
        {
            return Err(AppError::Internal(format!(
                "Foreign key violation: library {} does not exist",
                id
            )));
        }
        Ok(())
    }
}

/// Process-local repository guarded by a single lock
#[derive(Debug, Default)]
pub struct MemoryRepository {
    store: RwLock<Store>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LibrariesRepository for MemoryRepository {
    async fn libraries_list(&self) -> AppResult<Vec<Library>> {
        Ok(self.store.read().await.libraries.values().cloned().collect())
    }

    async fn libraries_find(&self, id: i32) -> AppResult<Option<Library>> {
        Ok(self.store.read().await.libraries.get(&id).cloned())
    }

    async fn libraries_existing_ids(&self, ids: &[i32]) -> AppResult<Vec<i32>> {
        let store = self.store.read().await;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| store.libraries.contains_key(id))
            .collect())
    }

    async fn libraries_create(&self, name: &str) -> AppResult<Library> {
        let mut store = self.store.write().await;
        let library = Library {
            id: next_id(&mut store.sequences.libraries),
            name: name.to_string(),
        };
        store.libraries.insert(library.id, library.clone());
        Ok(library)
    }

    async fn libraries_update_name(&self, id: i32, name: &str) -> AppResult<Option<Library>> {
        let mut store = self.store.write().await;
        Ok(store.libraries.get_mut(&id).map(|library| {
            library.name = name.to_string();
            library.clone()
        }))
    }

    async fn libraries_delete(&self, id: i32) -> AppResult<bool> {
        let mut store = self.store.write().await;
        if store.libraries.remove(&id).is_none() {
            return Ok(false);
        }
        for book in store.books.values_mut() {
            book.library_ids.remove(&id);
        }
        store.leads.retain(|_, lead| lead.library_id != id);
        Ok(true)
    }
}

#[async_trait]
impl AuthorsRepository for MemoryRepository {
    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        Ok(self.store.read().await.authors.values().cloned().collect())
    }

    async fn authors_find(&self, id: i32) -> AppResult<Option<Author>> {
        Ok(self.store.read().await.authors.get(&id).cloned())
    }

    async fn authors_create(&self, first_name: &str, last_name: &str) -> AppResult<Author> {
        let mut store = self.store.write().await;
        let author = Author {
            id: next_id(&mut store.sequences.authors),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        };
        store.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn authors_update(
        &self,
        id: i32,
        first_name: &str,
        last_name: &str,
    ) -> AppResult<Option<Author>> {
        let mut store = self.store.write().await;
        Ok(store.authors.get_mut(&id).map(|author| {
            author.first_name = first_name.to_string();
            author.last_name = last_name.to_string();
            author.clone()
        }))
    }

    async fn authors_delete(&self, id: i32) -> AppResult<bool> {
        let mut store = self.store.write().await;
        if store.authors.remove(&id).is_none() {
            return Ok(false);
        }
        store.books.retain(|_, book| book.author_id != id);
        Ok(true)
    }
}

#[async_trait]
impl BooksRepository for MemoryRepository {
    async fn books_list(&self) -> AppResult<Vec<Book>> {
        let store = self.store.read().await;
        store.hydrate_all(store.books.values())
    }

    async fn books_find(&self, id: i32) -> AppResult<Option<Book>> {
        let store = self.store.read().await;
        store.books.get(&id).map(|record| store.hydrate(record)).transpose()
    }

    async fn books_find_in_library(&self, library_id: i32, book_id: i32) -> AppResult<Option<Book>> {
        let store = self.store.read().await;
        store
            .books
            .get(&book_id)
            .filter(|record| record.library_ids.contains(&library_id))
            .map(|record| store.hydrate(record))
            .transpose()
    }

    async fn books_search_title(&self, text: &str) -> AppResult<Vec<Book>> {
        let needle = text.to_lowercase();
        let store = self.store.read().await;
        store.hydrate_all(
            store
                .books
                .values()
                .filter(|record| record.title.to_lowercase().contains(&needle)),
        )
    }

    async fn books_create(&self, data: &BookWrite) -> AppResult<Book> {
        let mut store = self.store.write().await;
        store.check_book_refs(data)?;

        let record = BookRecord {
            id: next_id(&mut store.sequences.books),
            title: data.title.clone(),
            author_id: data.author_id,
            library_ids: data.library_ids.iter().copied().collect(),
        };
        let book = store.hydrate(&record)?;
        store.books.insert(record.id, record);
        Ok(book)
    }

    async fn books_update(&self, id: i32, data: &BookWrite) -> AppResult<Option<Book>> {
        let mut store = self.store.write().await;
        if !store.books.contains_key(&id) {
            return Ok(None);
        }
        store.check_book_refs(data)?;

        let record = BookRecord {
            id,
            title: data.title.clone(),
            author_id: data.author_id,
            library_ids: data.library_ids.iter().copied().collect(),
        };
        let book = store.hydrate(&record)?;
        store.books.insert(id, record);
        Ok(Some(book))
    }

    async fn books_delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.store.write().await.books.remove(&id).is_some())
    }
}

#[async_trait]
impl LeadsRepository for MemoryRepository {
    async fn leads_email_exists(&self, email: &str) -> AppResult<bool> {
        let store = self.store.read().await;
        Ok(store.leads.values().any(|lead| lead.email == email))
    }

    async fn leads_create(&self, data: &NewLead) -> AppResult<Lead> {
        let mut store = self.store.write().await;
        if store.leads.values().any(|lead| lead.email == data.email) {
            return Err(AppError::Conflict(format!(
                "Lead with email: {} already exists",
                data.email
            )));
        }
        if !store.libraries.contains_key(&data.library_id) {
            return Err(AppError::Internal(format!(
                "Foreign key violation: library {} does not exist",
                data.library_id
            )));
        }

        let lead = Lead {
            id: next_id(&mut store.sequences.leads),
            email: data.email.clone(),
            fullname: data.fullname.clone(),
            phone: data.phone.clone(),
            library_id: data.library_id,
        };
        store.leads.insert(lead.id, lead.clone());
        Ok(lead)
    }
}

#[async_trait]
impl UsersRepository for MemoryRepository {
    async fn users_find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn users_username_exists(&self, username: &str) -> AppResult<bool> {
        let store = self.store.read().await;
        Ok(store.users.values().any(|user| user.username == username))
    }

    async fn users_email_exists(&self, email: &str) -> AppResult<bool> {
        let email = email.to_lowercase();
        let store = self.store.read().await;
        Ok(store
            .users
            .values()
            .any(|user| user.email.to_lowercase() == email))
    }

    async fn users_create(
        &self,
        username: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> AppResult<User> {
        let mut store = self.store.write().await;
        if store.users.values().any(|user| user.username == username) {
            return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
        }

        let user = User {
            id: next_id(&mut store.sequences.users),
            username: username.to_string(),
            email: email.to_string(),
            password: password_hash.map(str::to_string),
        };
        store.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (MemoryRepository, Library, Library, Author) {
        let repo = MemoryRepository::new();
        let crecer = repo.libraries_create("Crecer").await.unwrap();
        let lotus = repo.libraries_create("Lotus").await.unwrap();
        let author = repo.authors_create("José", "Brizuela").await.unwrap();
        (repo, crecer, lotus, author)
    }

    fn write(title: &str, author_id: i32, library_ids: Vec<i32>) -> BookWrite {
        BookWrite {
            title: title.to_string(),
            author_id,
            library_ids,
        }
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let repo = MemoryRepository::new();
        let first = repo.libraries_create("A").await.unwrap();
        assert!(repo.libraries_delete(first.id).await.unwrap());
        let second = repo.libraries_create("B").await.unwrap();
        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test]
    async fn test_book_update_replaces_library_set() {
        let (repo, crecer, lotus, author) = seeded().await;
        let book = repo
            .books_create(&write("Oil idea detail up.", author.id, vec![crecer.id, lotus.id]))
            .await
            .unwrap();
        assert_eq!(book.libraries.len(), 2);

        let updated = repo
            .books_update(book.id, &write("Oil idea detail up.", author.id, vec![]))
            .await
            .unwrap()
            .unwrap();
        assert!(updated.libraries.is_empty());
        assert!(repo
            .books_find_in_library(crecer.id, book.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_library_delete_cascades() {
        let (repo, crecer, lotus, author) = seeded().await;
        let book = repo
            .books_create(&write("Leg challenge", author.id, vec![crecer.id, lotus.id]))
            .await
            .unwrap();
        repo.leads_create(&NewLead {
            email: "lead@test.com".to_string(),
            fullname: "Lead".to_string(),
            phone: "123".to_string(),
            library_id: crecer.id,
        })
        .await
        .unwrap();

        assert!(repo.libraries_delete(crecer.id).await.unwrap());

        let book = repo.books_find(book.id).await.unwrap().unwrap();
        assert_eq!(book.libraries, vec![lotus]);
        assert!(!repo.leads_email_exists("lead@test.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_author_delete_cascades_to_books() {
        let (repo, crecer, _, author) = seeded().await;
        let book = repo
            .books_create(&write("Trade agent", author.id, vec![crecer.id]))
            .await
            .unwrap();

        assert!(repo.authors_delete(author.id).await.unwrap());
        assert!(repo.books_find(book.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (repo, _, _, author) = seeded().await;
        repo.books_create(&write("Save control throughout card", author.id, vec![]))
            .await
            .unwrap();
        repo.books_create(&write("Oil idea", author.id, vec![]))
            .await
            .unwrap();

        let found = repo.books_search_title("THROUGHOUT").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Save control throughout card");
        assert!(repo.books_search_title("nowhere").await.unwrap().is_empty());
        assert_eq!(repo.books_search_title("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts_at_insert() {
        let repo = MemoryRepository::new();
        repo.users_create("test_user", "a@mail.com", None)
            .await
            .unwrap();
        match repo.users_create("test_user", "b@mail.com", None).await {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, USERNAME_TAKEN),
            other => panic!("unexpected: {:?}", other.map(|u| u.id)),
        }
    }

    #[tokio::test]
    async fn test_duplicate_lead_email_conflicts() {
        let (repo, crecer, _, _) = seeded().await;
        let lead = NewLead {
            email: "test@test.com".to_string(),
            fullname: "test test".to_string(),
            phone: "123456".to_string(),
            library_id: crecer.id,
        };
        repo.leads_create(&lead).await.unwrap();
        assert!(matches!(
            repo.leads_create(&lead).await,
            Err(AppError::Conflict(_))
        ));
    }
}
