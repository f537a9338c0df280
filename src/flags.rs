//! The two capabilities a caller plugs into a search: a collision predicate ([Flags]) and a
//! sink for flood fill discoveries ([FillResult]).
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fxhash::FxHashSet;

use crate::loc::Node;

/// Collision predicate over locations of type `L`.
///
/// Implementations may have side effects. The flood fills rely on this: once a cell has been
/// reported to the [FillResult], `blocked` must return `true` for it, otherwise a fill never
/// terminates. [Visited] packages that bookkeeping.
pub trait Flags<L: ?Sized> {
    fn blocked(&self, loc: &L) -> bool;
}

impl<L: ?Sized, T: Flags<L> + ?Sized> Flags<L> for &T {
    fn blocked(&self, loc: &L) -> bool {
        (**self).blocked(loc)
    }
}

impl<L: ?Sized, T: Flags<L> + ?Sized> Flags<L> for Box<T> {
    fn blocked(&self, loc: &L) -> bool {
        (**self).blocked(loc)
    }
}

impl<L: ?Sized, T: Flags<L> + ?Sized> Flags<L> for Arc<T> {
    fn blocked(&self, loc: &L) -> bool {
        (**self).blocked(loc)
    }
}

/// [Flags] backed by a closure. Built with [from_fn].
#[derive(Clone, Copy, Debug)]
pub struct FromFn<F>(F);

/// Wraps a closure as a collision predicate.
pub fn from_fn<L, F>(f: F) -> FromFn<F>
where
    L: ?Sized,
    F: Fn(&L) -> bool,
{
    FromFn(f)
}

impl<L: ?Sized, F: Fn(&L) -> bool> Flags<L> for FromFn<F> {
    fn blocked(&self, loc: &L) -> bool {
        (self.0)(loc)
    }
}

/// Receives each open cell discovered by a flood fill, once per cell, in discovery order.
pub trait FillResult {
    fn location_found(&mut self, loc: Node);
}

impl<F: FnMut(Node)> FillResult for F {
    fn location_found(&mut self, loc: Node) {
        self(loc)
    }
}

/// Adds visit tracking on top of a base predicate: a cell is blocked if the base says so or if
/// it was [marked](Visited::mark). Feed discoveries through [recorder](Visited::recorder) to
/// satisfy the flood fill termination contract.
#[derive(Debug, Default)]
pub struct Visited<F> {
    flags: F,
    seen: Mutex<FxHashSet<Node>>,
}

impl<F> Visited<F> {
    pub fn new(flags: F) -> Visited<F> {
        Visited {
            flags,
            seen: Mutex::new(FxHashSet::default()),
        }
    }

    fn seen(&self) -> MutexGuard<'_, FxHashSet<Node>> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks a cell as handled. Returns `false` if it was already marked.
    pub fn mark(&self, node: Node) -> bool {
        self.seen().insert(node)
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.seen().contains(node)
    }

    pub fn len(&self) -> usize {
        self.seen().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen().is_empty()
    }

    /// Forgets every mark.
    pub fn clear(&self) {
        self.seen().clear();
    }

    pub fn inner(&self) -> &F {
        &self.flags
    }

    /// A sink that marks each found cell, then forwards it to `sink`.
    pub fn recorder<'a, S>(&'a self, sink: &'a mut S) -> Recorder<'a, F, S>
    where
        S: FillResult + ?Sized,
    {
        Recorder {
            visited: self,
            sink,
        }
    }

    pub fn into_marked(self) -> FxHashSet<Node> {
        self.seen.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<F: Flags<Node>> Flags<Node> for Visited<F> {
    fn blocked(&self, loc: &Node) -> bool {
        self.contains(loc) || self.flags.blocked(loc)
    }
}

/// See [Visited::recorder].
pub struct Recorder<'a, F, S: ?Sized> {
    visited: &'a Visited<F>,
    sink: &'a mut S,
}

impl<F, S: FillResult + ?Sized> FillResult for Recorder<'_, F, S> {
    fn location_found(&mut self, loc: Node) {
        self.visited.mark(loc);
        self.sink.location_found(loc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_flags() {
        let flags = from_fn(|n: &Node| n.x < 0);
        assert!(flags.blocked(&Node::new(-1, 0)));
        assert!(!(&flags).blocked(&Node::new(0, 0)));
        let boxed: Box<dyn Flags<Node>> = Box::new(flags);
        assert!(boxed.blocked(&Node::new(-5, 2)));
    }

    #[test]
    fn recorder_marks_before_forwarding() {
        let visited = Visited::new(from_fn(|n: &Node| n.y != 0));
        let mut found = Vec::new();
        let mut sink = |n: Node| found.push(n);
        {
            let mut recorder = visited.recorder(&mut sink);
            assert!(!visited.blocked(&Node::new(1, 0)));
            recorder.location_found(Node::new(1, 0));
        }
        assert!(visited.blocked(&Node::new(1, 0)));
        assert!(visited.blocked(&Node::new(1, 1)));
        assert!(!visited.blocked(&Node::new(2, 0)));
        assert_eq!(visited.len(), 1);
        drop(sink);
        assert_eq!(found, vec![Node::new(1, 0)]);
        visited.clear();
        assert!(visited.is_empty());
    }
}
