use std::cmp::Ordering;
use std::fmt::{Debug, Display, Error as FmtError, Formatter};
use std::iter::FusedIterator;

use rand::rngs::StdRng;
use rand::{Rng, RngCore};
use tracing::{debug, trace};

use crate::comparator::{Comparator, Natural};
use crate::config::Config;
use crate::error::{Error, Result};

/// Index of a node in the list's arena.
pub(crate) type NodeId = usize;

/// Probability that a node reaching one level also reaches the next.
const FRACTION: f64 = 0.5;

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    // One link per level; the length is the node's height and never changes.
    pub(crate) forward: Box<[Option<NodeId>]>,
}

impl<T> Node<T> {
    pub(crate) fn height(&self) -> usize {
        self.forward.len()
    }
}

/// A position in the list: the head sentinel or a real node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Head,
    Node(NodeId),
}

/// Where `locate` stops relative to nodes equal to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    /// Stop before the first node that is not less than the target.
    Before,
    /// Stop before the first node that is greater than the target.
    After,
}

/// Sample the height of a node about to join a list that holds `count`
/// values.
///
/// Heights follow the geometric distribution of Pugh's skip list, truncated
/// to `[1, ceil(log2(count + 1))]` so no node climbs higher than the list
/// size warrants. The result depends only on `rng` and `count`; a seeded
/// generator always reproduces the same sequence.
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use skipset::sample_height;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// assert_eq!(sample_height(&mut rng, 0), 1);
/// assert!((1..=4).contains(&sample_height(&mut rng, 10)));
/// ```
pub fn sample_height<R: Rng + ?Sized>(rng: &mut R, count: usize) -> usize {
    let max = max_height(count);
    let mut r: f64 = rng.gen();
    let mut level = 0;
    for i in 0..max {
        if r > FRACTION {
            break;
        }
        level = i;
        r /= FRACTION;
    }
    (level + 1).min(max)
}

/// `ceil(log2(count + 1))`, but never less than one.
fn max_height(count: usize) -> usize {
    let ceil_log2 = count
        .checked_add(1)
        .and_then(usize::checked_next_power_of_two)
        .map_or(usize::BITS, usize::trailing_zeros);
    (ceil_log2 as usize).max(1)
}

/// `SkipList` is an ordered collection implementing the skip list data
/// structure described in William Pugh's 1990 paper
/// ["Skip Lists: A Probabilistic Alternative to Balanced Trees"].
///
/// Values are kept in ascending order under the comparator `C`. Equal values
/// are allowed: a new value is placed after every value it compares equal to,
/// and [`SkipList::remove`] takes out the first equal value in ascending
/// order. Node heights are drawn from the random source `R`.
///
/// Nodes live in an arena owned by the list and link to each other by index.
/// Slots freed by [`SkipList::remove`] are reused by later insertions.
///
/// ["Skip Lists: A Probabilistic Alternative to Balanced Trees"]: https://15721.courses.cs.cmu.edu/spring2018/papers/08-oltpindexes1/pugh-skiplists-cacm1990.pdf
#[derive(Clone)]
pub struct SkipList<T, C = Natural, R = StdRng> {
    // Links out of the head sentinel; its length is the list height.
    pub(crate) head: Box<[Option<NodeId>]>,
    pub(crate) nodes: Vec<Option<Node<T>>>,
    pub(crate) free: Vec<NodeId>,
    pub(crate) len: usize,
    comparator: C,
    rng: R,
}

impl<T: Ord> SkipList<T> {
    /// Create an empty list ordered by `T`'s [`Ord`], with heights drawn from
    /// system entropy.
    pub fn new() -> SkipList<T> {
        SkipList::with_config(Natural, Config::default())
    }

    /// Create an empty list ordered by `T`'s [`Ord`], with heights drawn from
    /// a generator seeded with `seed`.
    pub fn with_seed(seed: u64) -> SkipList<T> {
        SkipList::with_config(Natural, Config::default().seed(seed))
    }
}

impl<T, C> SkipList<T, C>
where
    C: Comparator<T>,
{
    /// Create an empty list ordered by `comparator`, with heights drawn from
    /// system entropy.
    pub fn with_comparator(comparator: C) -> SkipList<T, C> {
        SkipList::with_config(comparator, Config::default())
    }

    /// Create an empty list ordered by `comparator` and configured by
    /// `config`.
    pub fn with_config(comparator: C, config: Config) -> SkipList<T, C> {
        SkipList::with_rng(comparator, config.rng())
    }
}

impl<T, C, R> SkipList<T, C, R>
where
    C: Comparator<T>,
    R: RngCore,
{
    /// Create an empty list ordered by `comparator` that samples node heights
    /// from `rng`.
    pub fn with_rng(comparator: C, rng: R) -> SkipList<T, C, R> {
        SkipList {
            head: vec![None].into_boxed_slice(),
            nodes: Vec::new(),
            free: Vec::new(),
            len: 0,
            comparator,
            rng,
        }
    }

    /// Add a value to the list.
    ///
    /// This never fails. Duplicates are kept, and the new value lands after
    /// every value that compares equal to it.
    pub fn add(&mut self, value: T) {
        let height = sample_height(&mut self.rng, self.len);
        if height > self.head.len() {
            self.grow_head(height);
        }

        let predecessors = self.locate(&value, Bound::After);
        let forward: Box<[Option<NodeId>]> = predecessors
            .iter()
            .take(height)
            .enumerate()
            .map(|(level, &predecessor)| self.forward(predecessor, level))
            .collect();
        let id = self.alloc(Node { value, forward });
        for (level, predecessor) in predecessors.into_iter().take(height).enumerate() {
            self.set_forward(predecessor, level, Some(id));
        }

        self.len += 1;
        trace!(height, len = self.len, "added value");
    }

    /// Remove one value comparing equal to `value`.
    ///
    /// When several stored values compare equal, the first one in ascending
    /// order is removed.
    ///
    /// # Returns
    ///
    /// True if a value was removed, false if none matched.
    pub fn remove(&mut self, value: &T) -> bool {
        let predecessors = self.locate(value, Bound::Before);
        let target = match self.forward(predecessors[0], 0) {
            Some(id) if self.comparator.compare(&self.node(id).value, value) == Ordering::Equal => {
                id
            }
            _ => {
                trace!(len = self.len, "value to remove not found");
                return false;
            }
        };

        let node = self.release(target);
        // Predecessors above the node's height never linked to it.
        for (level, predecessor) in predecessors.into_iter().take(node.height()).enumerate() {
            debug_assert_eq!(self.forward(predecessor, level), Some(target));
            self.set_forward(predecessor, level, node.forward[level]);
        }

        self.len -= 1;
        trace!(height = node.height(), len = self.len, "removed value");
        true
    }

    /// Check if the list holds a value comparing equal to `value`.
    pub fn contains(&self, value: &T) -> bool {
        let mut current = Cursor::Head;
        for level in (0..self.head.len()).rev() {
            while let Some(next) = self.forward(current, level) {
                match self.comparator.compare(&self.node(next).value, value) {
                    Ordering::Less => current = Cursor::Node(next),
                    Ordering::Equal => return true,
                    Ordering::Greater => break,
                }
            }
        }
        false
    }
}

impl<T, C, R> SkipList<T, C, R> {
    /// Drop every value and shrink the head back to a single level.
    pub fn clear(&mut self) {
        debug!(len = self.len, height = self.head.len(), "clearing list");
        self.nodes.clear();
        self.free.clear();
        self.head = vec![None].into_boxed_slice();
        self.len = 0;
    }

    /// Number of values stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current height of the list, which is the height of its head.
    pub fn height(&self) -> usize {
        self.head.len()
    }

    /// The comparator ordering this list.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Heights of the stored nodes, in ascending value order.
    pub fn heights(&self) -> impl Iterator<Item = usize> + '_ {
        self.walk().map(Node::height)
    }

    /// Get an iterator over the values in ascending order.
    ///
    /// The iterator borrows the list, so the list cannot be modified while
    /// the iterator is alive.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            walk: self.walk(),
            first: self.head[0],
            total: self.len,
            remaining: self.len,
        }
    }

    /// Copy every value, in ascending order, into `dest` starting at
    /// `dest[start]`.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientCapacity`] if fewer than [`SkipList::len`] slots
    /// follow `start`. A `start` past the end of `dest` leaves zero slots.
    /// `dest` is left untouched on error.
    pub fn copy_to(&self, dest: &mut [T], start: usize) -> Result<()>
    where
        T: Clone,
    {
        let available = dest.len().saturating_sub(start);
        if available < self.len {
            return Err(Error::InsufficientCapacity {
                needed: self.len,
                available,
            });
        }
        for (slot, value) in dest.iter_mut().skip(start).zip(self.iter()) {
            *slot = value.clone();
        }
        Ok(())
    }

    fn walk(&self) -> Walk<'_, T> {
        Walk {
            nodes: &self.nodes,
            next: self.head[0],
        }
    }

    fn node(&self, id: NodeId) -> &Node<T> {
        match &self.nodes[id] {
            Some(node) => node,
            None => unreachable!("link to vacant slot {id}"),
        }
    }

    fn forward(&self, cursor: Cursor, level: usize) -> Option<NodeId> {
        match cursor {
            Cursor::Head => self.head[level],
            Cursor::Node(id) => self.node(id).forward[level],
        }
    }

    fn set_forward(&mut self, cursor: Cursor, level: usize, link: Option<NodeId>) {
        match cursor {
            Cursor::Head => self.head[level] = link,
            Cursor::Node(id) => match &mut self.nodes[id] {
                Some(node) => node.forward[level] = link,
                None => unreachable!("link to vacant slot {id}"),
            },
        }
    }

    fn alloc(&mut self, node: Node<T>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                debug_assert!(self.nodes[id].is_none());
                self.nodes[id] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Node<T> {
        match self.nodes[id].take() {
            Some(node) => {
                self.free.push(id);
                node
            }
            None => unreachable!("release of vacant slot {id}"),
        }
    }

    /// Replace the head with a taller one. Existing links are kept and the
    /// new levels start out empty.
    fn grow_head(&mut self, height: usize) {
        debug_assert!(height > self.head.len());
        debug!(from = self.head.len(), to = height, "growing head");
        let mut head = vec![None; height].into_boxed_slice();
        head[..self.head.len()].copy_from_slice(&self.head);
        self.head = head;
    }
}

impl<T, C, R> SkipList<T, C, R>
where
    C: Comparator<T>,
{
    /// Walk from the top of the head down to level 0 and return, for every
    /// level, the last position visited before descending.
    fn locate(&self, value: &T, bound: Bound) -> Vec<Cursor> {
        let mut predecessors = vec![Cursor::Head; self.head.len()];
        let mut current = Cursor::Head;
        for level in (0..self.head.len()).rev() {
            while let Some(next) = self.forward(current, level) {
                let ordering = self.comparator.compare(&self.node(next).value, value);
                let advance = match bound {
                    Bound::Before => ordering == Ordering::Less,
                    Bound::After => ordering != Ordering::Greater,
                };
                if !advance {
                    break;
                }
                current = Cursor::Node(next);
            }
            predecessors[level] = current;
        }
        predecessors
    }
}

impl<T: Ord> Default for SkipList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C, R> Debug for SkipList<T, C, R>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter) -> std::result::Result<(), FmtError> {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Lists every value with the height of its node, e.g. `[12 (h1), 41 (h2)]`.
/// Meant for diagnostics; the format is not stable.
impl<T, C, R> Display for SkipList<T, C, R>
where
    T: Display,
{
    fn fmt(&self, f: &mut Formatter) -> std::result::Result<(), FmtError> {
        write!(f, "[")?;
        for (i, node) in self.walk().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} (h{})", node.value, node.height())?;
        }
        write!(f, "]")
    }
}

impl<T, C, R> Extend<T> for SkipList<T, C, R>
where
    C: Comparator<T>,
    R: RngCore,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for SkipList<T> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut skip_list = Self::new();
        skip_list.extend(iter);
        skip_list
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for SkipList<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<'a, T, C, R> IntoIterator for &'a SkipList<T, C, R> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C, R> IntoIterator for SkipList<T, C, R> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            next: self.head[0],
            nodes: self.nodes,
            remaining: self.len,
        }
    }
}

/// Follows level-0 links from a starting node.
struct Walk<'a, T> {
    nodes: &'a [Option<Node<T>>],
    next: Option<NodeId>,
}

impl<T> Clone for Walk<'_, T> {
    fn clone(&self) -> Self {
        Walk {
            nodes: self.nodes,
            next: self.next,
        }
    }
}

impl<'a, T> Iterator for Walk<'a, T> {
    type Item = &'a Node<T>;
    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = nodes[self.next?].as_ref()?;
        self.next = node.forward[0];
        Some(node)
    }
}

/// Borrowing iterator over a [`SkipList`] in ascending order, created by
/// [`SkipList::iter`].
///
/// The iterator starts before the first value and can be sent back there
/// with [`Iter::reset`].
pub struct Iter<'a, T> {
    walk: Walk<'a, T>,
    first: Option<NodeId>,
    total: usize,
    remaining: usize,
}

impl<T> Iter<'_, T> {
    /// Move back to the position before the first value.
    pub fn reset(&mut self) {
        self.walk.next = self.first;
        self.remaining = self.total;
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            walk: self.walk.clone(),
            first: self.first,
            total: self.total,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.walk.next()?;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut Formatter) -> std::result::Result<(), FmtError> {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// Owning iterator over a [`SkipList`] in ascending order.
pub struct IntoIter<T> {
    nodes: Vec<Option<Node<T>>>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    fn next(&mut self) -> Option<Self::Item> {
        let Node { value, forward } = self.nodes[self.next?].take()?;
        self.next = forward[0];
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
