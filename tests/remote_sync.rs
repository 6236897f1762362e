use wallet_core::core::book::BudgetBook;
use wallet_core::core::events::BudgetEvent;
use wallet_core::domain::{default_categories, NewTransaction, TransactionKind};
use wallet_core::storage::memory::MemoryDocumentStore;
use wallet_core::storage::remote::{
    DocumentStore, RemoteStore, CATEGORIES_COLLECTION, TRANSACTIONS_COLLECTION,
};

const USER: &str = "family-1";

fn open_remote_book(store: &MemoryDocumentStore) -> BudgetBook {
    let remote = RemoteStore::new(Box::new(store.clone()), USER);
    BudgetBook::open(Box::new(remote)).expect("initialize book")
}

fn expense(amount: f64, category_id: &str) -> NewTransaction {
    NewTransaction {
        kind: TransactionKind::Expense,
        amount,
        who: category_id.to_uppercase(),
        note: String::new(),
        category_id: category_id.into(),
        from_category_id: None,
    }
}

#[test]
fn first_sign_in_seeds_category_documents_only() {
    let store = MemoryDocumentStore::new();
    let book = open_remote_book(&store);

    assert_eq!(book.categories().len(), default_categories().len());
    assert_eq!(
        store.collection_len(USER, CATEGORIES_COLLECTION),
        default_categories().len()
    );
    assert_eq!(store.collection_len(USER, TRANSACTIONS_COLLECTION), 0);
}

#[test]
fn second_device_adopts_the_existing_state() {
    let store = MemoryDocumentStore::new();
    let mut first = open_remote_book(&store);
    first.update_category_balance("everyday", 80.0);
    first.add_transactions(vec![expense(30.0, "everyday")]);

    let second = open_remote_book(&store);
    assert_eq!(second.category("everyday").unwrap().balance, 50.0);
    assert_eq!(second.transactions().len(), 1);
    // A fresh session starts with a clean history.
    assert!(!second.can_undo());
    assert_eq!(
        store.collection_len(USER, CATEGORIES_COLLECTION),
        default_categories().len(),
        "no re-seeding once documents exist"
    );
}

#[test]
fn one_mutation_lands_as_one_commit() {
    let store = MemoryDocumentStore::new();
    let mut book = open_remote_book(&store);
    book.add_transactions(vec![expense(10.0, "everyday"), expense(5.0, "fuel")]);

    assert_eq!(store.collection_len(USER, TRANSACTIONS_COLLECTION), 2);
    let docs = store.fetch(USER, CATEGORIES_COLLECTION).unwrap();
    let everyday = docs.iter().find(|doc| doc.id == "everyday").unwrap();
    assert_eq!(everyday.data["balance"], -10.0);
}

#[test]
fn refresh_applies_changes_from_another_device() {
    let store = MemoryDocumentStore::new();
    let mut writer = open_remote_book(&store);
    let mut reader = open_remote_book(&store);

    // The initial subscription snapshot matches the loaded state.
    assert!(!reader.refresh());

    let events = reader.subscribe();
    writer.add_transactions(vec![expense(25.0, "groceries")]);

    assert!(reader.refresh());
    assert_eq!(reader.transactions().len(), 1);
    assert_eq!(reader.category("groceries").unwrap().balance, -25.0);
    assert_eq!(events.try_recv().unwrap(), BudgetEvent::Refreshed);
    // Adopted remote state cannot be undone locally.
    assert!(!reader.can_undo());
}

#[test]
fn own_echoes_leave_history_untouched() {
    let store = MemoryDocumentStore::new();
    let mut book = open_remote_book(&store);
    book.add_transactions(vec![expense(10.0, "everyday")]);
    assert!(book.can_undo());

    assert!(!book.refresh(), "a device's own writes echo back unchanged");
    assert!(book.can_undo());
}

#[test]
fn undo_deletes_documents_for_every_device() {
    let store = MemoryDocumentStore::new();
    let mut writer = open_remote_book(&store);
    let mut reader = open_remote_book(&store);

    writer.add_transactions(vec![expense(40.0, "shopping")]);
    assert!(reader.refresh());
    assert_eq!(reader.transactions().len(), 1);

    assert!(writer.undo());
    assert_eq!(store.collection_len(USER, TRANSACTIONS_COLLECTION), 0);

    assert!(reader.refresh());
    assert!(reader.transactions().is_empty());
    assert_eq!(reader.category("shopping").unwrap().balance, 0.0);
}

#[test]
fn detached_session_never_touches_the_store() {
    let store = MemoryDocumentStore::new();
    let mut book = BudgetBook::detached();
    book.initialize().unwrap();
    assert!(book.categories().is_empty());

    book.add_transactions(vec![expense(10.0, "anywhere")]);
    assert_eq!(book.transactions().len(), 1);
    assert_eq!(store.collection_len(USER, TRANSACTIONS_COLLECTION), 0);
    assert_eq!(store.collection_len(USER, CATEGORIES_COLLECTION), 0);
}
