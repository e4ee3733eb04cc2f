//! Work split between the two agents.

/// Initial partition sizes `(odd, even)` for a ring of `network_size` nodes.
///
/// The home node is excluded, so the two shares always add up to
/// `network_size - 1`. The first agent to start takes `odd`.
pub fn initial_shares(network_size: u32) -> (u64, u64) {
    let others = u64::from(network_size).saturating_sub(1);
    let odd = others / 2;
    (odd, others - odd)
}

/// Share taken over from a stalled partner after walking `num_done` nodes
/// of the ring without meeting its frontier.
pub fn rebalanced_share(network_size: u64, num_done: u64) -> u64 {
    network_size.saturating_sub(num_done) / 2
}
