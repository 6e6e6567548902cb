//! Single-writer publication: one thread publishes snapshots, readers pick up
//! whatever is current without locking.

use sc_atomic::{AtomicInteger, AtomicReference};
use std::sync::Arc;
use std::thread;

#[derive(Debug)]
struct Config {
    generation: u32,
    name: String,
}

fn main() {
    let current = AtomicReference::new(Some(Arc::new(Config {
        generation: 0,
        name: "initial".into(),
    })));
    let reads = AtomicInteger::new(0);

    thread::scope(|s| {
        s.spawn(|| {
            for generation in 1..=5 {
                current.set(Some(Arc::new(Config {
                    generation,
                    name: format!("gen-{generation}"),
                })));
            }
        });

        for _ in 0..3 {
            s.spawn(|| {
                for _ in 0..100 {
                    if let Some(config) = current.get() {
                        assert!(config.generation <= 5);
                        reads.add_and_get(1);
                    }
                }
            });
        }
    });

    println!("{current:?} after {reads} reads");
}
