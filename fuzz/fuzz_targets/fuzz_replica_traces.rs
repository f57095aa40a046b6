#![no_main]

use arbitrary::Arbitrary;
use chaincheck::{
    Block, MemorySource, ReplicaId, StructuralCheck, TransactionalCheck, TxId, run_check,
};
use libfuzzer_sys::fuzz_target;

/// Block layout over a small token alphabet so replicas collide often.
#[derive(Debug, Arbitrary)]
struct FuzzReplica {
    blocks: Vec<Vec<u8>>,
    count_skew: i8,
}

impl FuzzReplica {
    fn layout(&self) -> Vec<Block> {
        self.blocks
            .iter()
            .map(|b| b.iter().map(|t| TxId::new((t % 8).to_string())).collect())
            .collect()
    }

    fn counted(&self) -> u64 {
        self.blocks.iter().map(|b| b.len() as u64).sum()
    }

    fn recorded(&self) -> u64 {
        self.counted().saturating_add_signed(i64::from(self.count_skew))
    }
}

fuzz_target!(|replicas: Vec<FuzzReplica>| {
    let replicas = &replicas[..replicas.len().min(6)];
    if replicas.is_empty() {
        return;
    }

    let mut source = MemorySource::new();
    for (index, replica) in (0u32..).zip(replicas) {
        source = source
            .with_chain(ReplicaId::new(index + 1), replica.layout())
            .with_transactions(ReplicaId::new(index), replica.layout(), replica.recorded());
    }
    let n = u32::try_from(replicas.len()).expect("at most six replicas");

    let report = run_check(&StructuralCheck::default(), &source, n).expect("structural check");
    assert!(report.metrics.common_prefix <= report.metrics.min_length);
    assert!(report.metrics.min_length <= report.metrics.max_length);

    // Either judged, or rejected by an accounting invariant.
    match run_check(&TransactionalCheck::default(), &source, n) {
        Ok(report) => {
            assert!(replicas.iter().all(|r| r.recorded() == r.counted()));
            assert!((0.0..=1.0).contains(&report.metrics.min_unique_fraction));
            assert!(report.metrics.min_trx_per_block >= 0.0);
        }
        Err(err) => assert!(err.is_invariant_violation(), "unexpected error: {err}"),
    }
});
