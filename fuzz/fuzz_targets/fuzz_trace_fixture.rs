#![no_main]

use chaincheck::{FixtureStore, ReplicaId, TraceSource};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as every fixture kind. Loading may fail, but only
    // with an error, never a panic.
    let dir = tempfile::tempdir().expect("temp dir");
    for name in ["1.chain", "0.trx", "0.trx_count"] {
        std::fs::write(dir.path().join(name), data).expect("write fixture");
    }

    let store = FixtureStore::new(dir.path());
    if let Ok(trace) = store.chain(ReplicaId::new(1)) {
        assert_eq!(trace.replica(), ReplicaId::new(1));
    }

    if let Ok(trace) = store.transactions(ReplicaId::new(0)) {
        assert!(trace.unique_transaction_count() <= trace.transaction_count());
    }

    let _ = store.transaction_count(ReplicaId::new(0));
});
