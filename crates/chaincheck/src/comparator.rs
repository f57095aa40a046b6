//! Cross-replica agreement checks.
//!
//! Two granularities are offered:
//!
//! - [`common_prefix_len`]: longest prefix on which every replica agrees,
//!   under a caller-supplied equality predicate.
//! - [`anchors_agree`]: every replica has the same anchor transaction (first
//!   transaction of the first block after genesis). This is a deliberately
//!   weaker check used for transactional traces.

use std::borrow::Borrow;

use crate::trace::{Block, Trace};

/// Length of the longest prefix on which all `traces` agree.
///
/// Index `i` is compared between the first trace and every other trace with
/// `same`; the walk stops at the first disagreement or at the length of the
/// shortest trace. An empty slice yields 0.
pub fn common_prefix_len<T, F>(traces: &[&[T]], same: F) -> usize
where
    F: Fn(&T, &T) -> bool,
{
    let Some((reference, others)) = traces.split_first() else {
        return 0;
    };
    let min_len = traces.iter().map(|t| t.len()).min().unwrap_or(0);

    let mut index = 0;
    while index < min_len {
        let expected = &reference[index];
        if !others.iter().all(|other| same(expected, &other[index])) {
            break;
        }
        index += 1;
    }
    index
}

/// Common prefix length of whole-block-equal traces.
pub fn common_block_prefix(traces: &[Trace]) -> usize {
    let blocks: Vec<&[Block]> = traces.iter().map(Trace::blocks).collect();
    let prefix = common_prefix_len(&blocks, Block::eq);

    if let Some(divergent) = traces.iter().find(|t| t.len() > prefix) {
        tracing::debug!(
            prefix,
            first_longer = %divergent.replica(),
            "replicas stop agreeing after common prefix"
        );
    }
    prefix
}

/// Returns true if every trace has the same anchor as the first one.
///
/// Traces without an anchor agree only with each other.
pub fn anchors_agree<T: Borrow<Trace>>(traces: &[T]) -> bool {
    let Some((reference, others)) = traces.split_first() else {
        return true;
    };
    let reference: &Trace = reference.borrow();
    let expected = reference.anchor();

    for other in others {
        let other: &Trace = other.borrow();
        if other.anchor() != expected {
            tracing::warn!(
                reference = %reference.replica(),
                replica = %other.replica(),
                expected = ?expected.map(ToString::to_string),
                found = ?other.anchor().map(ToString::to_string),
                "anchor transaction disagrees"
            );
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::ReplicaId;

    fn trace(replica: u32, blocks: &[&[&str]]) -> Trace {
        Trace::new(
            ReplicaId::new(replica),
            blocks
                .iter()
                .map(|b| b.iter().copied().collect())
                .collect(),
        )
    }

    #[test]
    fn empty_input_has_empty_prefix() {
        let traces: [&[u8]; 0] = [];
        assert_eq!(common_prefix_len(&traces, u8::eq), 0);
    }

    #[test]
    fn single_trace_is_its_own_prefix() {
        let only: &[u8] = &[1, 2, 3, 4];
        assert_eq!(common_prefix_len(&[only], u8::eq), 4);
    }

    #[test]
    fn prefix_bounded_by_shortest_trace() {
        let a: &[u8] = &[1, 2, 3, 4, 5];
        let b: &[u8] = &[1, 2, 3];
        assert_eq!(common_prefix_len(&[a, b], u8::eq), 3);
    }

    #[test]
    fn prefix_stops_at_earliest_disagreement_of_any_replica() {
        let a: &[u8] = &[1, 2, 3, 4, 5];
        let b: &[u8] = &[1, 2, 3, 9, 5];
        let c: &[u8] = &[1, 7, 3, 4, 5];
        assert_eq!(common_prefix_len(&[a, b, c], u8::eq), 1);
    }

    #[test]
    fn custom_predicate_controls_equality() {
        let a: &[u32] = &[10, 20, 31];
        let b: &[u32] = &[11, 21, 45];
        let same_decade = |x: &u32, y: &u32| x / 10 == y / 10;
        assert_eq!(common_prefix_len(&[a, b], same_decade), 2);
    }

    #[test]
    fn block_prefix_compares_whole_blocks() {
        let a = trace(1, &[&["g"], &["a", "b"], &["c"]]);
        let b = trace(2, &[&["g"], &["a", "b"], &["c", "d"]]);
        let c = trace(3, &[&["g"], &["a", "b"]]);

        assert_eq!(common_block_prefix(&[a.clone(), b]), 2);
        assert_eq!(common_block_prefix(&[a, c]), 2);
    }

    #[test]
    fn block_order_matters() {
        let a = trace(1, &[&["g"], &["a", "b"]]);
        let b = trace(2, &[&["g"], &["b", "a"]]);
        assert_eq!(common_block_prefix(&[a, b]), 1);
    }

    #[test]
    fn integer_and_text_blocks_differ() {
        let numeric = Trace::new(
            ReplicaId::new(1),
            vec![Block::default(), [7u64].into_iter().collect()],
        );
        let text = trace(2, &[&[], &["7"]]);
        assert_eq!(common_block_prefix(&[numeric, text]), 1);
    }

    #[test]
    fn anchors_agree_on_first_post_genesis_transaction() {
        let a = trace(0, &[&[], &["x", "y"], &["z"]]);
        let b = trace(1, &[&[], &["x"], &["q"]]);
        assert!(anchors_agree(&[a, b]));
    }

    #[test]
    fn anchors_ignore_later_divergence_but_not_anchor_divergence() {
        let a = trace(0, &[&[], &["x"], &["z"]]);
        let b = trace(1, &[&[], &["w"], &["z"]]);
        assert!(!anchors_agree(&[a, b]));
    }

    #[test]
    fn missing_anchor_disagrees_with_present_anchor() {
        let a = trace(0, &[&[], &["x"]]);
        let genesis_only = trace(1, &[&[]]);
        assert!(!anchors_agree(&[a, genesis_only.clone()]));
        assert!(anchors_agree(&[genesis_only.clone(), genesis_only]));
    }

    #[test]
    fn single_replica_always_agrees() {
        assert!(anchors_agree(&[trace(0, &[&[]])]));
        assert!(anchors_agree::<Trace>(&[]));
    }
}
