//! Path algebra for addressing items and sections in nested layouts.
//!
//! Two path shapes exist:
//!
//! - [`ItemPath`]: root-to-leaf sequence of `(section_index, item_index)`
//!   pairs. The last pair addresses the target item; every earlier pair names
//!   the nested-layout item one must descend through.
//! - [`SectionPath`]: an optional parent [`ItemPath`] locating the layout
//!   that directly contains the target section, plus the section's index.
//!
//! Paths are plain values. Serialized keys are canonical: two paths serialize
//! to the same key iff they are equal, which makes the keys safe to use for
//! memoization maps elsewhere in the system.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// One descent step: a section index and an item index inside that section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub section_index: usize,
    pub item_index: usize,
}

impl Coordinate {
    /// Build a coordinate pair.
    #[must_use]
    pub const fn new(section_index: usize, item_index: usize) -> Self {
        Self {
            section_index,
            item_index,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.section_index, self.item_index)
    }
}

/// Root-to-leaf address of one item in a nested layout.
///
/// An empty path is a representable but unresolvable address; operations that
/// need a target fail with [`LayoutError::EmptyPath`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemPath(Vec<Coordinate>);

impl ItemPath {
    /// Path to an item in a root-level section.
    #[must_use]
    pub fn root(section_index: usize, item_index: usize) -> Self {
        Self(vec![Coordinate::new(section_index, item_index)])
    }

    /// Append one descent step, addressing an item inside this item's
    /// nested layout.
    #[must_use]
    pub fn descend(&self, section_index: usize, item_index: usize) -> Self {
        let mut coords = self.0.clone();
        coords.push(Coordinate::new(section_index, item_index));
        Self(coords)
    }

    /// Build an item path from a section path plus the item's index inside
    /// that section.
    #[must_use]
    pub fn from_section_path(section_path: &SectionPath, item_index: usize) -> Self {
        let mut coords = section_path
            .parent
            .as_ref()
            .map(|parent| parent.0.clone())
            .unwrap_or_default();
        coords.push(Coordinate::new(section_path.section_index, item_index));
        Self(coords)
    }

    /// Borrow the raw coordinate pairs, root first.
    #[must_use]
    pub fn coords(&self) -> &[Coordinate] {
        &self.0
    }

    /// Nesting depth (number of coordinate pairs).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the path holds no coordinates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Leaf item index, or [`LayoutError::EmptyPath`].
    pub fn item_index(&self) -> Result<usize, LayoutError> {
        self.leaf().map(|coord| coord.item_index)
    }

    /// Leaf section index, or [`LayoutError::EmptyPath`].
    pub fn section_index(&self) -> Result<usize, LayoutError> {
        self.leaf().map(|coord| coord.section_index)
    }

    /// Path to the immediately enclosing item, or `None` at root depth.
    #[must_use]
    pub fn parent(&self) -> Option<ItemPath> {
        match self.0.split_last() {
            Some((_, ancestors)) if !ancestors.is_empty() => Some(Self(ancestors.to_vec())),
            _ => None,
        }
    }

    /// Copy of this path with the leaf item index replaced.
    pub fn with_item_index(&self, item_index: usize) -> Result<Self, LayoutError> {
        let mut coords = self.0.clone();
        let leaf = coords.last_mut().ok_or(LayoutError::EmptyPath)?;
        leaf.item_index = item_index;
        Ok(Self(coords))
    }

    /// Copy of this path with both leaf indices replaced.
    pub fn with_indexes(
        &self,
        section_index: usize,
        item_index: usize,
    ) -> Result<Self, LayoutError> {
        let mut coords = self.0.clone();
        let leaf = coords.last_mut().ok_or(LayoutError::EmptyPath)?;
        *leaf = Coordinate::new(section_index, item_index);
        Ok(Self(coords))
    }

    /// Split into the containing section's path, dropping the leaf item index.
    pub fn to_section_path(&self) -> Result<SectionPath, LayoutError> {
        let (leaf, ancestors) = self.0.split_last().ok_or(LayoutError::EmptyPath)?;
        let parent = if ancestors.is_empty() {
            None
        } else {
            Some(Self(ancestors.to_vec()))
        };
        Ok(SectionPath {
            parent,
            section_index: leaf.section_index,
        })
    }

    /// Canonical string key: pairs rendered `section_item`, joined by `-`,
    /// root pair first. An empty path renders as `"undefined"`.
    #[must_use]
    pub fn serialize_key(&self) -> String {
        serialize_coords(&self.0)
    }

    fn leaf(&self) -> Result<Coordinate, LayoutError> {
        self.0.last().copied().ok_or(LayoutError::EmptyPath)
    }
}

impl From<Vec<Coordinate>> for ItemPath {
    fn from(coords: Vec<Coordinate>) -> Self {
        Self(coords)
    }
}

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize_key())
    }
}

/// Address of one section: the path of the item whose nested layout contains
/// it (`None` for the root layout), plus its index in that layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionPath {
    #[serde(default)]
    pub parent: Option<ItemPath>,
    pub section_index: usize,
}

impl SectionPath {
    /// Path to a root-level section.
    #[must_use]
    pub const fn root(section_index: usize) -> Self {
        Self {
            parent: None,
            section_index,
        }
    }

    /// Path to a section nested under the given item.
    #[must_use]
    pub fn nested(parent: ItemPath, section_index: usize) -> Self {
        Self {
            parent: Some(parent),
            section_index,
        }
    }

    /// Copy of this path with the section index replaced.
    #[must_use]
    pub fn with_section_index(&self, section_index: usize) -> Self {
        Self {
            parent: self.parent.clone(),
            section_index,
        }
    }

    /// Ancestor coordinates of the containing layout, root first. Empty for
    /// a root-level section.
    #[must_use]
    pub fn parent_coords(&self) -> &[Coordinate] {
        self.parent.as_ref().map_or(&[], |parent| parent.coords())
    }

    /// Canonical string key: parent pairs then the bare section index.
    /// A root-level section renders as just its index.
    #[must_use]
    pub fn serialize_key(&self) -> String {
        let parent = self.parent_coords();
        if parent.is_empty() {
            return self.section_index.to_string();
        }
        format!("{}-{}", serialize_coords(parent), self.section_index)
    }
}

impl fmt::Display for SectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize_key())
    }
}

/// Borrowed either-shape path, accepted by operations that resolve both
/// item and section addresses.
#[derive(Debug, Clone, Copy)]
pub enum PathRef<'a> {
    Item(&'a ItemPath),
    Section(&'a SectionPath),
}

impl<'a> From<&'a ItemPath> for PathRef<'a> {
    fn from(path: &'a ItemPath) -> Self {
        Self::Item(path)
    }
}

impl<'a> From<&'a SectionPath> for PathRef<'a> {
    fn from(path: &'a SectionPath) -> Self {
        Self::Section(path)
    }
}

/// Leaf section index of either path shape.
///
/// Fails only for an empty item path; a section path always carries one.
pub fn leaf_section_index<'a>(path: impl Into<PathRef<'a>>) -> Result<usize, LayoutError> {
    match path.into() {
        PathRef::Item(item) => item.section_index(),
        PathRef::Section(section) => Ok(section.section_index),
    }
}

/// Path to the item enclosing either path shape, or `None` at root depth.
#[must_use]
pub fn parent_path<'a>(path: impl Into<PathRef<'a>>) -> Option<ItemPath> {
    match path.into() {
        PathRef::Item(item) => item.parent(),
        PathRef::Section(section) => section
            .parent
            .as_ref()
            .filter(|parent| !parent.is_empty())
            .cloned(),
    }
}

/// Deep, ordered, length-sensitive item path equality.
///
/// `None` and the empty path denote the same "no address" value and are equal
/// to each other; neither equals any non-empty path.
#[must_use]
pub fn item_paths_equal(a: Option<&ItemPath>, b: Option<&ItemPath>) -> bool {
    normalized(a) == normalized(b)
}

/// Deep section path equality; `parent: None` and an empty parent are
/// interchangeable.
#[must_use]
pub fn section_paths_equal(a: Option<&SectionPath>, b: Option<&SectionPath>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.section_index == b.section_index && a.parent_coords() == b.parent_coords()
        }
        _ => false,
    }
}

/// True when both paths address direct children of the same section at the
/// same nesting depth. Both `None`, empty, or of unequal depth compare false.
#[must_use]
pub fn in_same_section(a: Option<&ItemPath>, b: Option<&ItemPath>) -> bool {
    let (a, b) = (normalized(a), normalized(b));
    let (Some((a_leaf, a_ancestors)), Some((b_leaf, b_ancestors))) =
        (a.split_last(), b.split_last())
    else {
        return false;
    };
    a_ancestors == b_ancestors && a_leaf.section_index == b_leaf.section_index
}

/// True iff the section addressed by `section_path` is exactly the direct
/// parent section of the item addressed by `item_path`.
#[must_use]
pub fn is_item_within_section(item_path: &ItemPath, section_path: &SectionPath) -> bool {
    let Some((leaf, ancestors)) = item_path.coords().split_last() else {
        return false;
    };
    ancestors == section_path.parent_coords() && leaf.section_index == section_path.section_index
}

/// Longest shared leading subsequence of two item paths. Empty when they
/// diverge at the first pair or either is empty.
#[must_use]
pub fn common_prefix(a: &ItemPath, b: &ItemPath) -> ItemPath {
    let coords: Vec<Coordinate> = a
        .coords()
        .iter()
        .zip(b.coords())
        .take_while(|(left, right)| left == right)
        .map(|(left, _)| *left)
        .collect();
    ItemPath(coords)
}

/// Canonical key for an optional item path; `None` and the empty path both
/// render as the literal `"undefined"`.
#[must_use]
pub fn serialize_item_path(path: Option<&ItemPath>) -> String {
    serialize_coords(normalized(path))
}

/// Canonical key for an optional section path; `None` renders as the literal
/// `"undefined"`.
#[must_use]
pub fn serialize_section_path(path: Option<&SectionPath>) -> String {
    match path {
        Some(section) => section.serialize_key(),
        None => "undefined".to_string(),
    }
}

/// Render a coordinate run root-first; the key format shared by both path
/// shapes.
pub(crate) fn serialize_coords(coords: &[Coordinate]) -> String {
    if coords.is_empty() {
        return "undefined".to_string();
    }
    let parts: Vec<String> = coords.iter().map(Coordinate::to_string).collect();
    parts.join("-")
}

fn normalized(path: Option<&ItemPath>) -> &[Coordinate] {
    path.map_or(&[], |p| p.coords())
}
