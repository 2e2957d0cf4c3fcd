//! Reconstructing chain order from previous-hash linkage
//!
//! File order is not canonical. Each block names its predecessor by hash;
//! the blocks form a forest whose roots are blocks with no predecessor in
//! the dataset. Linkage is resolved over indices into the decoded set, so a
//! dangling or cyclic reference is simply "no match".

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet};

use log::{debug, warn};

use crate::config::OrderingPolicy;
use crate::error::DecodeError;
use crate::hash::hash_hex;
use crate::types::*;

/// Blocks in canonical order with their linkage
#[derive(Debug, Clone, Default)]
pub struct OrderedChain {
    pub blocks: Vec<Block>,
    /// Position of each block's predecessor in `blocks`
    pub predecessors: Vec<Option<usize>>,
    /// Positions of segment roots
    pub roots: Vec<usize>,
    /// Distance from each block's segment root
    pub heights: Vec<u64>,
    /// `AmbiguousOrdering` reports; ordering still completed
    pub ambiguities: Vec<DecodeError>,
}

impl OrderedChain {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn predecessor(&self, position: usize) -> Option<&Block> {
        self.predecessors
            .get(position)
            .copied()
            .flatten()
            .map(|p| &self.blocks[p])
    }

    /// One root and every block links to the one before it
    pub fn is_linear(&self) -> bool {
        self.roots.len() <= 1
            && self
                .predecessors
                .iter()
                .enumerate()
                .skip(1)
                .all(|(i, p)| *p == Some(i - 1))
    }
}

/// OrderBlocks: 𝔹* → 𝔹*
///
/// 1. Index blocks by hash; a block's parent is the block whose hash equals
///    its previous-block hash (both compared in display order)
/// 2. Topologically sort the forest: a block becomes ready once its parent
///    is placed, and the ready block with the smallest (timestamp, input
///    position) goes next
/// 3. Under `OrderingPolicy::Timestamp`, re-sort by timestamp keeping the
///    linkage order among equal timestamps
/// 4. Report every pair sharing a timestamp where neither block descends
///    from the other
pub fn order_blocks(blocks: Vec<Block>, policy: OrderingPolicy) -> OrderedChain {
    let n = blocks.len();
    if n == 0 {
        return OrderedChain::default();
    }

    let mut by_hash: HashMap<Hash, usize> = HashMap::with_capacity(n);
    for (i, block) in blocks.iter().enumerate() {
        if let Some(&first) = by_hash.get(&block.hash) {
            warn!(
                "duplicate block {} at positions {} and {}",
                hash_hex(&block.hash),
                first,
                i
            );
            continue;
        }
        by_hash.insert(block.hash, i);
    }

    let parents: Vec<Option<usize>> = blocks
        .iter()
        .enumerate()
        .map(|(i, block)| {
            by_hash
                .get(&block.header.prev_block_hash_display())
                .copied()
                .filter(|&p| p != i)
        })
        .collect();

    let key = |i: usize| (blocks[i].header.timestamp, i);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, parent) in parents.iter().enumerate() {
        if let Some(p) = parent {
            children[*p].push(i);
        }
    }

    let forest = sort_forest(&blocks, &parents, &children, key);

    let mut order = forest.order.clone();
    if policy == OrderingPolicy::Timestamp {
        let mut rank = vec![0usize; n];
        for (pos, &i) in order.iter().enumerate() {
            rank[i] = pos;
        }
        order.sort_by_key(|&i| (blocks[i].header.timestamp, rank[i]));
    }

    let mut position = vec![0usize; n];
    for (pos, &i) in order.iter().enumerate() {
        position[i] = pos;
    }

    let intervals = Intervals::new(&forest);
    let ambiguities = find_ambiguities(&blocks, &order, &intervals);

    let predecessors: Vec<Option<usize>> = order
        .iter()
        .map(|&i| forest.parent[i].map(|p| position[p]))
        .collect();
    let misordered = predecessors
        .iter()
        .enumerate()
        .filter(|(pos, p)| matches!(p, Some(p) if p > pos))
        .count();
    if misordered > 0 {
        warn!("{} blocks are placed before their predecessor by timestamp", misordered);
    }

    let heights: Vec<u64> = order.iter().map(|&i| forest.depth[i]).collect();
    let root_positions: Vec<usize> = (0..n).filter(|&pos| predecessors[pos].is_none()).collect();

    let mut slots: Vec<Option<Block>> = blocks.into_iter().map(Some).collect();
    let ordered: Vec<Block> = order.iter().filter_map(|&i| slots[i].take()).collect();

    debug!(
        "ordered {} blocks into {} segment(s), {} ambiguous pair(s)",
        ordered.len(),
        root_positions.len(),
        ambiguities.len()
    );

    OrderedChain {
        blocks: ordered,
        predecessors,
        roots: root_positions,
        heights,
        ambiguities,
    }
}

/// Linkage order plus the parent and depth each block was placed with.
/// A cycle entry has no parent here even though its hash link points
/// back into the cycle.
struct Forest {
    order: Vec<usize>,
    parent: Vec<Option<usize>>,
    depth: Vec<u64>,
    children: Vec<Vec<usize>>,
}

fn sort_forest(
    blocks: &[Block],
    parents: &[Option<usize>],
    children: &[Vec<usize>],
    key: impl Fn(usize) -> (u32, usize),
) -> Forest {
    let n = blocks.len();
    let mut forest = Forest {
        order: Vec::with_capacity(n),
        parent: vec![None; n],
        depth: vec![0; n],
        children: vec![Vec::new(); n],
    };
    let mut placed = vec![false; n];

    let mut ready: BinaryHeap<Reverse<(u32, usize)>> = (0..n)
        .filter(|&i| parents[i].is_none())
        .map(|i| Reverse(key(i)))
        .collect();

    // Fallback scan for cycle entries, earliest first
    let mut by_key: Vec<usize> = (0..n).collect();
    by_key.sort_by_key(|&i| key(i));
    let mut scan = 0;

    while forest.order.len() < n {
        let Some(Reverse((_, node))) = ready.pop() else {
            while placed[by_key[scan]] {
                scan += 1;
            }
            let entry = cycle_entry(by_key[scan], parents, &key);
            warn!(
                "blocks starting at {} link in a cycle, breaking it there",
                hash_hex(&blocks[entry].hash)
            );
            ready.push(Reverse(key(entry)));
            continue;
        };
        if placed[node] {
            continue;
        }
        placed[node] = true;
        forest.order.push(node);

        // only a cycle entry is placed ahead of its parent
        if let Some(p) = parents[node].filter(|&p| placed[p]) {
            forest.parent[node] = Some(p);
            forest.depth[node] = forest.depth[p] + 1;
            forest.children[p].push(node);
        }

        for &child in &children[node] {
            if !placed[child] {
                ready.push(Reverse(key(child)));
            }
        }
    }
    forest
}

/// The earliest block on the cycle that `start` hangs from. Every ancestor
/// of an unplaced block is unplaced, so following parents must loop.
fn cycle_entry(
    start: usize,
    parents: &[Option<usize>],
    key: &impl Fn(usize) -> (u32, usize),
) -> usize {
    let mut seen = HashSet::new();
    let mut current = start;
    while seen.insert(current) {
        match parents[current] {
            Some(p) => current = p,
            None => return current,
        }
    }
    let mut entry = current;
    let mut member = current;
    while let Some(p) = parents[member] {
        if p == current {
            break;
        }
        if key(p) < key(entry) {
            entry = p;
        }
        member = p;
    }
    entry
}

/// Entry and exit times of a depth-first walk over the placed forest;
/// `a` descends from `b` exactly when `b`'s interval encloses `a`'s
struct Intervals {
    enter: Vec<usize>,
    exit: Vec<usize>,
}

impl Intervals {
    fn new(forest: &Forest) -> Self {
        let n = forest.order.len();
        let mut intervals = Intervals {
            enter: vec![0; n],
            exit: vec![0; n],
        };
        let mut clock = 0;
        for &root in forest.order.iter().filter(|&&i| forest.parent[i].is_none()) {
            intervals.enter[root] = clock;
            clock += 1;
            let mut stack = vec![(root, 0usize)];
            loop {
                let (node, next) = match stack.last_mut() {
                    Some(top) => {
                        let next = forest.children[top.0].get(top.1).copied();
                        top.1 += 1;
                        (top.0, next)
                    }
                    None => break,
                };
                match next {
                    Some(child) => {
                        intervals.enter[child] = clock;
                        clock += 1;
                        stack.push((child, 0));
                    }
                    None => {
                        intervals.exit[node] = clock;
                        clock += 1;
                        stack.pop();
                    }
                }
            }
        }
        intervals
    }

    fn descends_from(&self, node: usize, ancestor: usize) -> bool {
        self.enter[ancestor] < self.enter[node] && self.exit[node] < self.exit[ancestor]
    }
}

fn find_ambiguities(blocks: &[Block], order: &[usize], intervals: &Intervals) -> Vec<DecodeError> {
    let mut by_timestamp: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for &i in order {
        by_timestamp.entry(blocks[i].header.timestamp).or_default().push(i);
    }

    let mut ambiguities = Vec::new();
    for (timestamp, group) in by_timestamp.iter().filter(|(_, g)| g.len() > 1) {
        for (k, &a) in group.iter().enumerate() {
            for &b in &group[k + 1..] {
                if intervals.descends_from(a, b) || intervals.descends_from(b, a) {
                    continue;
                }
                let err = DecodeError::AmbiguousOrdering {
                    first: hash_hex(&blocks[a].hash),
                    second: hash_hex(&blocks[b].hash),
                    timestamp: *timestamp,
                };
                warn!("{}", err);
                ambiguities.push(err);
            }
        }
    }
    ambiguities
}
