//! The A* core shared by every [Pathfinder](crate::Pathfinder) query.
//! Nodes live in an index map acting as an arena; each entry records the arena index of its
//! parent together with the cost of the step from it, so path reconstruction and score
//! derivation never need back-pointers inside the nodes themselves.
use fxhash::{FxBuildHasher, FxHashSet};
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use num_traits::Zero;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

struct SmallestCostHolder<K> {
    estimated_cost: K,
    cost: K,
    index: usize,
}

impl<K: PartialEq> Eq for SmallestCostHolder<K> {}

impl<K: PartialEq> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.cost.eq(&other.cost)
    }
}

impl<K: Ord> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // First orders per estimated cost, then creates subordering
        // based on cost, favoring exploration of the deepest nodes first
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => self.cost.cmp(&other.cost),
            s => s,
        }
    }
}

/// Per-node scores. `g` and `f` are memoized and cleared whenever the parent changes, `h` is
/// fixed at insertion since it only depends on the node and the goal.
#[derive(Clone, Debug)]
struct Scores<C> {
    /// Arena index of the parent and the cost of the step from it.
    parent: Option<(usize, C)>,
    g: Option<C>,
    h: C,
    f: Option<C>,
}

/// Frontier ordered by ascending `f`. Updating a member pushes a fresh heap entry; the
/// superseded entry is dropped when it surfaces because the node is no longer a member.
struct OpenSet<C> {
    heap: BinaryHeap<SmallestCostHolder<C>>,
    members: FxHashSet<usize>,
}

impl<C: Ord> OpenSet<C> {
    fn new() -> OpenSet<C> {
        OpenSet {
            heap: BinaryHeap::new(),
            members: FxHashSet::default(),
        }
    }

    fn push(&mut self, index: usize, f: C, g: C) {
        self.members.insert(index);
        self.heap.push(SmallestCostHolder {
            estimated_cost: f,
            cost: g,
            index,
        });
    }

    fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    fn pop(&mut self) -> Option<usize> {
        while let Some(SmallestCostHolder { index, .. }) = self.heap.pop() {
            if self.members.remove(&index) {
                return Some(index);
            }
        }
        None
    }

    fn clear(&mut self) {
        self.heap.clear();
        self.members.clear();
    }
}

/// Scratch state for A*, cleared at the start of every search so its allocations can be reused.
pub struct SearchContext<N, C> {
    nodes: FxIndexMap<N, Scores<C>>,
    open: OpenSet<C>,
    closed: FxHashSet<usize>,
    chain: Vec<usize>,
}

impl<N, C: Ord> Default for SearchContext<N, C> {
    fn default() -> Self {
        SearchContext::new()
    }
}

impl<N, C: Ord> SearchContext<N, C> {
    pub fn new() -> SearchContext<N, C> {
        SearchContext {
            nodes: FxIndexMap::default(),
            open: OpenSet::new(),
            closed: FxHashSet::default(),
            chain: Vec::new(),
        }
    }

    /// Number of nodes finalized by the last search.
    pub fn expanded(&self) -> usize {
        self.closed.len()
    }

    /// Number of distinct nodes the last search scored.
    pub fn discovered(&self) -> usize {
        self.nodes.len()
    }
}

impl<N, C> SearchContext<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
{
    fn reset(&mut self) {
        self.nodes.clear();
        self.open.clear();
        self.closed.clear();
        self.chain.clear();
    }

    fn set_parent(&mut self, index: usize, parent: usize, step: C) {
        let scores = &mut self.nodes[index];
        scores.parent = Some((parent, step));
        scores.g = None;
        scores.f = None;
    }

    /// Exact cost from the start, derived from the parent chain if it was invalidated.
    fn g(&mut self, index: usize) -> C {
        let mut ix = index;
        let mut g = loop {
            let (g, parent) = {
                let scores = &self.nodes[ix];
                (scores.g, scores.parent)
            };
            match (g, parent) {
                (Some(g), _) => break g,
                (None, Some((parent, _))) => {
                    self.chain.push(ix);
                    ix = parent;
                }
                (None, None) => {
                    self.nodes[ix].g = Some(C::zero());
                    break C::zero();
                }
            }
        };
        while let Some(child) = self.chain.pop() {
            let scores = &mut self.nodes[child];
            if let Some((_, step)) = scores.parent {
                g = g + step;
            }
            scores.g = Some(g);
        }
        g
    }

    fn f(&mut self, index: usize) -> C {
        if let Some(f) = self.nodes[index].f {
            return f;
        }
        let f = self.g(index) + self.nodes[index].h;
        self.nodes[index].f = Some(f);
        f
    }

    fn reverse_path(&self, index: usize) -> Vec<N> {
        let mut path: Vec<N> = std::iter::successors(Some(index), |&i| {
            self.nodes[i].parent.map(|(p, _)| p)
        })
        .filter_map(|i| self.nodes.get_index(i).map(|(node, _)| node.clone()))
        .collect();
        path.reverse();
        path
    }

    /// Runs A* from `start` until `success` accepts a popped node. Successors are generated
    /// together with the cost of the step to them; anything the caller considers blocked must
    /// already be filtered out. Returns the path from `start` to the accepted node and its cost.
    pub fn astar<FN, IN, FH, FS>(
        &mut self,
        start: &N,
        mut successors: FN,
        mut heuristic: FH,
        mut success: FS,
    ) -> Option<(Vec<N>, C)>
    where
        FN: FnMut(&N) -> IN,
        IN: IntoIterator<Item = (N, C)>,
        FH: FnMut(&N) -> C,
        FS: FnMut(&N) -> bool,
    {
        self.reset();
        let h = heuristic(start);
        let (start_index, _) = self.nodes.insert_full(
            start.clone(),
            Scores {
                parent: None,
                g: Some(C::zero()),
                h,
                f: Some(h),
            },
        );
        self.open.push(start_index, h, C::zero());

        while let Some(index) = self.open.pop() {
            let node = match self.nodes.get_index(index) {
                Some((node, _)) => node.clone(),
                None => continue,
            };
            if success(&node) {
                let cost = self.g(index);
                return Some((self.reverse_path(index), cost));
            }
            self.closed.insert(index);
            let g = self.g(index);

            for (successor, move_cost) in successors(&node) {
                let (n, fresh) = match self.nodes.entry(successor) {
                    Vacant(e) => {
                        let n = e.index();
                        let h = heuristic(e.key());
                        e.insert(Scores {
                            parent: Some((index, move_cost)),
                            g: None,
                            h,
                            f: None,
                        });
                        (n, true)
                    }
                    Occupied(e) => (e.index(), false),
                };
                if fresh {
                    let f = self.f(n);
                    let g_n = self.g(n);
                    self.open.push(n, f, g_n);
                } else if self.closed.contains(&n) {
                    continue;
                } else if self.open.contains(n) && g + move_cost < self.g(n) {
                    self.set_parent(n, index, move_cost);
                    let f = self.f(n);
                    let g_n = self.g(n);
                    self.open.push(n, f, g_n);
                }
            }
        }
        None
    }
}
