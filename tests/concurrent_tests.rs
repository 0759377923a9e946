// Concurrent Access Tests
// One immutable block shared by many threads, each with its own iterator

mod common;

use aidb_block::{collect_entries, Block, KvIterator, Options};
use common::{build_block, numbered_entries};
use std::sync::{Arc, Barrier};
use std::thread;

/// Test concurrent scans over one owned block
#[test]
fn test_concurrent_iterators_owned_block() {
    let expected = numbered_entries(1000);
    let block = Arc::new(Block::new(build_block(&expected, 16)));
    let expected = Arc::new(expected);

    let num_threads = 8;
    let barrier = Arc::new(Barrier::new(num_threads));
    let mut handles = vec![];

    for thread_id in 0..num_threads {
        let block = Arc::clone(&block);
        let expected = Arc::clone(&expected);
        let barrier = Arc::clone(&barrier);
        let handle = thread::spawn(move || {
            barrier.wait();
            let mut iter = block.iter(&Options::default());

            if thread_id % 2 == 0 {
                assert_eq!(collect_entries(&mut iter).unwrap(), *expected);
            } else {
                for (key, value) in expected.iter().skip(thread_id).step_by(num_threads) {
                    iter.seek(key);
                    assert_eq!(iter.key(), key.as_slice());
                    assert_eq!(iter.value(), value.as_slice());
                }
            }
        });
        handles.push(handle);
    }

    // Wait for all threads to complete
    for handle in handles {
        handle.join().unwrap();
    }
}

/// Test scoped threads borrowing a block over a borrowed buffer
#[test]
fn test_concurrent_iterators_borrowed_block() {
    let expected = numbered_entries(500);
    let data = build_block(&expected, 8);
    let block = Block::new(data.as_slice());

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let mut iter = block.iter(&Options::default());
                iter.seek_to_last();
                let mut count = 0;
                while iter.valid() {
                    assert_eq!(iter.key(), expected[expected.len() - 1 - count].0.as_slice());
                    count += 1;
                    iter.prev();
                }
                assert_eq!(count, expected.len());
            });
        }
    });
}
