#![forbid(unsafe_code)]

//! Addressing, navigation, and atomic mutation engine for nested dashboard
//! layouts.
//!
//! A layout is a tree: sections hold items, and an item holds either an
//! opaque widget or another layout. Positions in the tree are named by value
//! paths ([`ItemPath`], [`SectionPath`]) rather than by node identity, so a
//! path survives serialization and can be compared, serialized to a
//! canonical map key, and re-resolved later.
//!
//! The crate splits into:
//!
//! - [`model`]: the tree schema, generic over the widget payload.
//! - [`path`]: the path algebra (equality, serialization, conversions).
//! - [`navigate`]: strict read-side resolution of paths to tree nodes.
//! - [`builder`]: [`LayoutBuilder`], the mutation engine. Each edit
//!   validates against a cloned working tree and swaps it in atomically,
//!   returning [`LayoutEvent`] records describing exactly what changed.
//! - [`stash`]: a side table for items detached from the tree, so a removal
//!   and a later re-insertion can hand items across edits.
//!
//! Sections never stay empty: any edit that drains a section's last item
//! also removes the section, and the emitted events say so.

pub mod builder;
pub mod error;
pub mod event;
pub mod model;
pub mod navigate;
pub mod path;
pub mod stash;

pub use builder::LayoutBuilder;
pub use error::LayoutError;
pub use event::LayoutEvent;
pub use model::{
    ContainerDirection, Item, ItemContent, ItemSize, Layout, ScreenSize, Section, SectionHeader,
    SizeSpec,
};
pub use navigate::{find_item, find_section, find_sections};
pub use path::{
    Coordinate, ItemPath, PathRef, SectionPath, common_prefix, in_same_section,
    is_item_within_section, item_paths_equal, leaf_section_index, parent_path,
    section_paths_equal, serialize_item_path, serialize_section_path,
};
pub use stash::{Stash, StashId};
