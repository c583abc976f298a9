//! Queue of tile coordinates shared by the render threads. The list is
//! fixed at creation; workers claim the next tile through an atomic
//! counter, so tiles are handed out in Morton order and every tile is
//! handed out exactly once.

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// others
use log::warn;

pub struct BlockQueue {
    blocks: Vec<(u32, u32)>,
    next: AtomicUsize,
}

impl BlockQueue {
    /// Queue for a grid of `n_tiles.0` by `n_tiles.1` tiles. Partial
    /// tiles at the image border are the caller's business.
    pub fn new(n_tiles: (u32, u32)) -> BlockQueue {
        let mut blocks: Vec<(u32, u32)> = (0..n_tiles.0 * n_tiles.1)
            .map(|i| (i % n_tiles.0, i / n_tiles.0))
            .collect();
        blocks.sort_by_key(|b| morton2(*b));
        if blocks.is_empty() {
            warn!("block queue for {:?} tiles is empty", n_tiles);
        }
        BlockQueue {
            blocks,
            next: AtomicUsize::new(0),
        }
    }
    pub fn iter(&self) -> BlockQueueIterator {
        BlockQueueIterator { queue: self }
    }
    /// `None` once every tile has been claimed.
    pub fn next(&self) -> Option<(u32, u32)> {
        let i = self.next.fetch_add(1, Ordering::AcqRel);
        self.blocks.get(i).copied()
    }
    pub fn len(&self) -> usize {
        self.blocks.len()
    }
    /// True when no unclaimed tile remains.
    pub fn is_empty(&self) -> bool {
        self.next.load(Ordering::Acquire) >= self.blocks.len()
    }
}

pub struct BlockQueueIterator<'a> {
    queue: &'a BlockQueue,
}

impl<'a> Iterator for BlockQueueIterator<'a> {
    type Item = (u32, u32);
    fn next(&mut self) -> Option<(u32, u32)> {
        self.queue.next()
    }
}

/// Spread the low 16 bits of x to the even bit positions.
fn part1_by1(mut x: u32) -> u32 {
    x &= 0x0000_ffff;
    x = (x ^ (x << 8)) & 0x00ff_00ff;
    x = (x ^ (x << 4)) & 0x0f0f_0f0f;
    x = (x ^ (x << 2)) & 0x3333_3333;
    (x ^ (x << 1)) & 0x5555_5555
}

fn morton2(p: (u32, u32)) -> u32 {
    (part1_by1(p.1) << 1) + part1_by1(p.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn morton_interleaves_bits() {
        assert_eq!(morton2((0, 0)), 0);
        assert_eq!(morton2((1, 0)), 1);
        assert_eq!(morton2((0, 1)), 2);
        assert_eq!(morton2((1, 1)), 3);
        assert_eq!(morton2((2, 0)), 4);
        assert_eq!(morton2((3, 3)), 15);
    }

    #[test]
    fn tiles_come_out_in_morton_order() {
        let queue: BlockQueue = BlockQueue::new((2, 2));
        let order: Vec<(u32, u32)> = queue.iter().collect();
        assert_eq!(order, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert!(queue.is_empty());
        assert_eq!(queue.next(), None);
    }

    #[test]
    fn every_tile_exactly_once() {
        let queue: BlockQueue = BlockQueue::new((5, 3));
        assert_eq!(queue.len(), 15);
        let seen: Vec<(u32, u32)> = queue.iter().collect();
        let unique: HashSet<(u32, u32)> = seen.iter().copied().collect();
        assert_eq!(seen.len(), 15);
        assert_eq!(unique.len(), 15);
    }

    #[test]
    fn empty_grid() {
        let queue: BlockQueue = BlockQueue::new((0, 4));
        assert_eq!(queue.len(), 0);
        assert!(queue.is_empty());
    }
}
