//! Wraps a small in-memory store, times its lookups and prints the report.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use call_profiler::{CapabilitySet, Profiler};

struct Store {
    items: HashMap<String, u32>,
}

impl Store {
    fn lookup(&self, key: &str) -> Option<u32> {
        thread::sleep(Duration::from_millis(20));
        self.items.get(key).copied()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

fn main() {
    let store = Store {
        items: [("apple".to_string(), 3), ("pear".to_string(), 5)]
            .into_iter()
            .collect(),
    };

    let profiler = Profiler::new();
    let handle = profiler
        .wrap(
            CapabilitySet::of::<Store>()
                .profiled("lookup")
                .unprofiled("len"),
            &store,
        )
        .expect("the store declares a profiled operation");

    for key in ["apple", "pear", "plum"] {
        let found = handle
            .invoke("lookup", |s| s.lookup(key))
            .expect("lookup is declared");
        println!("{key}: {found:?}");
    }

    let len = handle.invoke("len", Store::len).expect("len is declared");
    println!("{len} items");

    print!("{profiler}");
}
