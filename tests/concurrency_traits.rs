use sc_atomic::{AtomicInteger, AtomicReference};
use std::cell::Cell;
use std::sync::Arc;

fn assert_send<T: Send>() {}
fn assert_sync<T: Sync>() {}

#[test]
fn atomic_integer_is_send_and_sync() {
    assert_send::<AtomicInteger>();
    assert_sync::<AtomicInteger>();
}

#[test]
fn atomic_reference_send_sync_follows_t_bounds() {
    // `String` is Send + Sync, so the cell is too.
    assert_send::<AtomicReference<String>>();
    assert_sync::<AtomicReference<String>>();

    // A cell of cells is still shareable.
    assert_sync::<AtomicReference<AtomicInteger>>();
}

#[test]
fn atomic_reference_shares_across_threads() {
    let cell = Arc::new(AtomicReference::new(Some(Arc::new(String::from("hello")))));
    let handle = {
        let cell = Arc::clone(&cell);
        std::thread::spawn(move || cell.get_and_set(Some(Arc::new(String::from("bye")))))
    };
    let prev = handle.join().unwrap();
    assert_eq!(prev.as_deref().map(String::as_str), Some("hello"));
    assert_eq!(cell.get().as_deref().map(String::as_str), Some("bye"));

    // `Cell<u8>` is not Sync: the cell is then single-threaded but still works.
    let local = AtomicReference::new(Some(Arc::new(Cell::new(1u8))));
    local.get().unwrap().set(2);
    assert_eq!(local.get().unwrap().get(), 2);
}
