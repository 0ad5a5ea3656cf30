use hashbrown::HashSet;
use proptest::prelude::*;

use booklib::{
    book::{is_valid, BookRecord},
    core::store::{BookStore, StoreError},
    types::BookId,
};

#[derive(Debug, Clone)]
enum Action {
    Add { title: String, author: String },
    Update { target: u8, title: String, author: String },
    Remove { target: u8 },
}

fn field_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[A-Za-z][A-Za-z ]{0,8}",
        1 => Just(String::new()),
        1 => Just("   ".to_string()),
    ]
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (field_strategy(), field_strategy()).prop_map(|(title, author)| Action::Add { title, author }),
        (0u8..32, field_strategy(), field_strategy())
            .prop_map(|(target, title, author)| Action::Update { target, title, author }),
        (0u8..32).prop_map(|target| Action::Remove { target }),
    ]
}

fn pick(store: &BookStore, target: u8) -> BookId {
    let ids = store.ordered_ids();
    if ids.is_empty() {
        // Nothing held: aim at an id that cannot exist.
        return BookId::MAX;
    }
    ids[usize::from(target) % ids.len()]
}

fn records(store: &BookStore) -> Vec<BookRecord> {
    store.books().cloned().collect()
}

proptest! {
    #[test]
    fn random_sequences_hold_store_invariants(actions in prop::collection::vec(action_strategy(), 1..120)) {
        let mut store = BookStore::new();
        let mut issued = HashSet::<BookId>::new();

        for action in actions {
            let before = records(&store);
            match action {
                Action::Add { title, author } => {
                    match store.add(&title, &author) {
                        Some(book) => {
                            prop_assert!(is_valid(&title, &author));
                            prop_assert!(issued.insert(book.id), "id {} reissued", book.id);
                            prop_assert_eq!(store.len(), before.len() + 1);
                            prop_assert_eq!(store.books().next(), Some(&book));
                        }
                        None => {
                            prop_assert!(!is_valid(&title, &author));
                            prop_assert_eq!(records(&store), before);
                        }
                    }
                }
                Action::Update { target, title, author } => {
                    let id = pick(&store, target);
                    let pos = store.ordered_ids().iter().position(|x| *x == id);
                    if store.update(id, &title, &author) {
                        let rec = store.get(id).cloned().unwrap();
                        prop_assert_eq!(rec.title.as_str(), title.trim());
                        prop_assert_eq!(rec.author.as_str(), author.trim());
                        prop_assert_eq!(store.ordered_ids().iter().position(|x| *x == id), pos);
                    } else {
                        prop_assert_eq!(records(&store), before);
                    }
                }
                Action::Remove { target } => {
                    let id = pick(&store, target);
                    store.remove(id);
                    prop_assert!(store.get(id).is_none());
                    prop_assert!(store.query("").iter().all(|b| b.id != id));
                    let again = records(&store);
                    prop_assert!(!store.remove(id));
                    prop_assert_eq!(records(&store), again);
                }
            }

            let ids: HashSet<BookId> = store.ordered_ids().iter().copied().collect();
            prop_assert_eq!(ids.len(), store.len());
            for rec in store.books() {
                prop_assert!(!rec.title.is_empty() && rec.title.trim() == rec.title);
                prop_assert!(!rec.author.is_empty() && rec.author.trim() == rec.author);
            }
        }

        let target = records(&store);
        loop {
            match store.undo() {
                Ok(_) => {},
                Err(StoreError::NothingToUndo) => break,
                Err(other) => prop_assert!(false, "unexpected undo error: {other:?}"),
            }
        }

        loop {
            match store.redo() {
                Ok(_) => {},
                Err(StoreError::NothingToRedo) => break,
                Err(other) => prop_assert!(false, "unexpected redo error: {other:?}"),
            }
        }

        prop_assert_eq!(records(&store), target);
    }

    #[test]
    fn query_matches_case_folded_scan(
        books in prop::collection::vec(("[a-zA-Z]{1,6}", "[a-zA-Z]{1,6}"), 0..30),
        needle in "[a-zA-Z]{0,3}",
    ) {
        let mut store = BookStore::new();
        for (title, author) in &books {
            store.add(title, author);
        }

        let lower = needle.to_lowercase();
        let expected: Vec<BookId> = store
            .books()
            .filter(|b| b.title.to_lowercase().contains(&lower) || b.author.to_lowercase().contains(&lower))
            .map(|b| b.id)
            .collect();
        let got: Vec<BookId> = store.query(&needle.to_uppercase()).iter().map(|b| b.id).collect();
        prop_assert_eq!(got, expected);
    }
}
