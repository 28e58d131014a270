//! Box repository: arena storage for the box genealogy.
//!
//! Every box ever created lives here and is addressed by a [`BoxId`]. Boxes
//! are never removed; only their level, split record and second function
//! value change after creation.
//!
//! # Layout
//!
//! - `boxes[id]`: the [`McsBox`] record for handle `id` (0-based; the root is `BoxId(0)`)
//! - `parent`: owning box, `None` for the root
//! - `level`: refinement level, `0` once the box is split or handed to the basket
//! - `role`: which child of its parent the box is
//! - `split`: how the box was split, set when it stops being a leaf
//! - `f[0]`: objective value at the base vertex, `f[1]` the value at the regular split point
//! - `z`: the two coordinates bounding a regular split
//!
//! Growth happens in fixed chunks of [`BOX_CHUNK`] records.

use std::fmt;

/// Initial capacity of the box arena.
pub const INITIAL_BOX_CAPACITY: usize = 10_000;

/// Number of records added to the arena each time it fills up.
pub const BOX_CHUNK: usize = 1_000;

/// Opaque handle of a box in [`BoxStorage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoxId(pub(crate) usize);

impl BoxId {
    /// Position of the box in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Child produced by a regular split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegularChild {
    /// Box keeping the parent's base vertex.
    First,
    /// Box whose base vertex is the new split point.
    Second,
    /// Box between the split point and the opposite vertex.
    Third,
}

/// Which child of its parent a box is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildRole {
    /// The box covering the whole domain.
    Root,
    /// Child of an initialization-list split. `ordinal` counts the parent's
    /// children from 1 in creation order, boundary boxes included.
    InitList { ordinal: usize },
    /// Child of a regular split.
    Regular(RegularChild),
}

/// How a box was split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    /// Fanned out over the initialization list of `dim`, using value column
    /// `column` of the initialization table.
    InitList { dim: usize, column: usize },
    /// Split along `dim` at the coordinates stored in the box's `z`.
    Regular { dim: usize },
}

impl Split {
    /// Dimension the split was performed along.
    pub fn dim(&self) -> usize {
        match *self {
            Split::InitList { dim, .. } | Split::Regular { dim } => dim,
        }
    }
}

/// A single box record.
#[derive(Debug, Clone, PartialEq)]
pub struct McsBox {
    pub parent: Option<BoxId>,
    pub level: usize,
    pub role: ChildRole,
    pub split: Option<Split>,
    pub f: [f64; 2],
    pub z: [f64; 2],
    /// Set once the expected-gain heuristic found no improving split.
    pub no_gain: bool,
}

impl McsBox {
    /// Whether the box is still a sweep candidate.
    pub fn is_active(&self) -> bool {
        self.level > 0
    }
}

/// Append-only arena of boxes.
#[derive(Debug, Clone)]
pub struct BoxStorage {
    boxes: Vec<McsBox>,
    chunk: usize,
}

impl Default for BoxStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxStorage {
    /// Create an empty repository with the default capacity and chunk size.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_BOX_CAPACITY, BOX_CHUNK)
    }

    /// Create an empty repository with an explicit initial capacity and growth chunk.
    pub fn with_capacity(capacity: usize, chunk: usize) -> Self {
        Self {
            boxes: Vec::with_capacity(capacity),
            chunk: chunk.max(1),
        }
    }

    /// Append a new box and return its handle.
    ///
    /// The second function value and the split coordinates start at zero.
    pub fn create(
        &mut self,
        parent: Option<BoxId>,
        level: usize,
        role: ChildRole,
        f0: f64,
    ) -> BoxId {
        if self.boxes.len() == self.boxes.capacity() {
            self.boxes.reserve_exact(self.chunk);
        }
        let id = BoxId(self.boxes.len());
        self.boxes.push(McsBox {
            parent,
            level,
            role,
            split: None,
            f: [f0, 0.0],
            z: [0.0, 0.0],
            no_gain: false,
        });
        tracing::trace!(box_id = id.0, level, f0, "box created");
        id
    }

    /// Number of boxes created so far.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Returns true if no box has been created.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Current arena capacity.
    pub fn capacity(&self) -> usize {
        self.boxes.capacity()
    }

    pub fn get(&self, id: BoxId) -> &McsBox {
        &self.boxes[id.0]
    }

    pub fn get_mut(&mut self, id: BoxId) -> &mut McsBox {
        &mut self.boxes[id.0]
    }

    /// Mark `id` as split along `split`, removing it from the sweep candidates.
    pub fn mark_split(&mut self, id: BoxId, split: Split) {
        let b = &mut self.boxes[id.0];
        b.level = 0;
        b.split = Some(split);
    }

    /// Iterate over `(handle, box)` pairs in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (BoxId, &McsBox)> {
        self.boxes.iter().enumerate().map(|(i, b)| (BoxId(i), b))
    }

    /// Iterate over the children of `parent` in creation order.
    pub fn children(&self, parent: BoxId) -> impl Iterator<Item = (BoxId, &McsBox)> {
        self.iter().filter(move |(_, b)| b.parent == Some(parent))
    }

    /// Number of active (level > 0) boxes.
    pub fn active_count(&self) -> usize {
        self.boxes.iter().filter(|b| b.is_active()).count()
    }
}
