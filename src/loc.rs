//! Integer grid locations with structural equality.
//!
//! Every search structure in this crate (open and closed sets, the node arena, fill bookkeeping)
//! is keyed by coordinate value, so two [Node]s at the same `(x, y)` are the same location no
//! matter where they were created.
use core::fmt;
use std::cmp::Ordering;

use grid_util::point::Point;

/// An `(x, y)` position on an integer grid. North is `y - 1`.
pub trait Locatable {
    fn x(&self) -> i32;
    fn y(&self) -> i32;
}

/// A [Locatable] with a depth component.
pub trait Locatable3D: Locatable {
    fn z(&self) -> i32;
}

/// A [Locatable] that knows the location it was reached from.
pub trait PLocatable: Locatable {
    /// The location this one was reached from, or [None] for the first location of a chain.
    fn parent(&self) -> Option<Node>;
}

/// A [Locatable3D] that knows the location it was reached from.
pub trait PLocatable3D: Locatable3D {
    fn parent(&self) -> Option<Node3D>;
}

/// Whether two locations differ on both axes.
pub fn is_diagonal<A, B>(a: &A, b: &B) -> bool
where
    A: Locatable + ?Sized,
    B: Locatable + ?Sized,
{
    a.x() != b.x() && a.y() != b.y()
}

/// A 2D grid coordinate. Equality and hashing are by value; ordering is row-major.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Node {
    pub x: i32,
    pub y: i32,
}

impl Node {
    pub const fn new(x: i32, y: i32) -> Node {
        Node { x, y }
    }

    /// Copies the coordinates of any [Locatable].
    pub fn from_loc<L: Locatable + ?Sized>(loc: &L) -> Node {
        Node::new(loc.x(), loc.y())
    }

    /// A new node displaced by `(dx, dy)`.
    pub const fn offset(&self, dx: i32, dy: i32) -> Node {
        Node::new(self.x + dx, self.y + dy)
    }
}

impl Locatable for Node {
    fn x(&self) -> i32 {
        self.x
    }
    fn y(&self) -> i32 {
        self.y
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Node({},{})", self.x, self.y)
    }
}

impl From<Point> for Node {
    fn from(p: Point) -> Node {
        Node::new(p.x, p.y)
    }
}

impl From<Node> for Point {
    fn from(n: Node) -> Point {
        Point::new(n.x, n.y)
    }
}

impl Locatable for Point {
    fn x(&self) -> i32 {
        self.x
    }
    fn y(&self) -> i32 {
        self.y
    }
}

/// A 3D grid coordinate. Searches run in the plane; `z` only survives until [flatten](Node3D::flatten).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node3D {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Node3D {
    pub const fn new(x: i32, y: i32, z: i32) -> Node3D {
        Node3D { x, y, z }
    }

    pub fn from_loc<L: Locatable3D + ?Sized>(loc: &L) -> Node3D {
        Node3D::new(loc.x(), loc.y(), loc.z())
    }

    pub const fn offset(&self, dx: i32, dy: i32, dz: i32) -> Node3D {
        Node3D::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Drops the depth component.
    pub const fn flatten(&self) -> Node {
        Node::new(self.x, self.y)
    }
}

impl Locatable for Node3D {
    fn x(&self) -> i32 {
        self.x
    }
    fn y(&self) -> i32 {
        self.y
    }
}

impl Locatable3D for Node3D {
    fn z(&self) -> i32 {
        self.z
    }
}

impl fmt::Display for Node3D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Node3D({},{},{})", self.x, self.y, self.z)
    }
}
