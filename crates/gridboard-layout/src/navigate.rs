//! Read-side tree navigation.
//!
//! Resolution is strict: every step of a path must name an existing section
//! and item, and every intermediate item must be a nested-layout container.
//! The single exception is [`find_sections`] with a section path, whose leaf
//! index is not bounds-checked so callers can ask about insert positions.

use crate::error::LayoutError;
use crate::model::{Item, Layout, Section};
use crate::path::{Coordinate, ItemPath, PathRef, SectionPath, serialize_coords};

/// Resolve an item path to the item it addresses.
pub fn find_item<'a, W>(layout: &'a Layout<W>, path: &ItemPath) -> Result<&'a Item<W>, LayoutError> {
    let (leaf, ancestors) = path.coords().split_last().ok_or(LayoutError::EmptyPath)?;
    let parent = descend(layout, ancestors)?;
    let section = section_at(parent, path.coords(), leaf.section_index)?;
    item_at(section, path.coords(), leaf.item_index)
}

/// Resolve either path shape to a section.
///
/// An item path resolves to the section directly containing its leaf item;
/// a section path resolves to the section it names.
pub fn find_section<'a, 'p, W>(
    layout: &'a Layout<W>,
    path: impl Into<PathRef<'p>>,
) -> Result<&'a Section<W>, LayoutError> {
    match path.into() {
        PathRef::Item(item_path) => {
            let (leaf, ancestors) = item_path
                .coords()
                .split_last()
                .ok_or(LayoutError::EmptyPath)?;
            let parent = descend(layout, ancestors)?;
            section_at(parent, item_path.coords(), leaf.section_index)
        }
        PathRef::Section(section_path) => {
            let coords = section_path.parent_coords();
            let parent = descend(layout, coords)?;
            parent
                .sections
                .get(section_path.section_index)
                .ok_or_else(|| LayoutError::SectionOutOfRange {
                    path: section_path.serialize_key(),
                    section_index: section_path.section_index,
                    section_count: parent.sections.len(),
                })
        }
    }
}

/// Resolve either path shape to the ordered section list of the layout that
/// directly contains the addressed section.
///
/// With a section path the leaf index is tolerated out of range (the list is
/// what matters, and an insert position may equal its length); intermediate
/// steps still resolve strictly. With an item path the leaf section must
/// exist.
pub fn find_sections<'a, 'p, W>(
    layout: &'a Layout<W>,
    path: impl Into<PathRef<'p>>,
) -> Result<&'a [Section<W>], LayoutError> {
    match path.into() {
        PathRef::Item(item_path) => {
            let (leaf, ancestors) = item_path
                .coords()
                .split_last()
                .ok_or(LayoutError::EmptyPath)?;
            let parent = descend(layout, ancestors)?;
            section_at(parent, item_path.coords(), leaf.section_index)?;
            Ok(&parent.sections)
        }
        PathRef::Section(section_path) => {
            let parent = descend(layout, section_path.parent_coords())?;
            Ok(&parent.sections)
        }
    }
}

pub(crate) fn find_item_mut<'a, W>(
    layout: &'a mut Layout<W>,
    path: &ItemPath,
) -> Result<&'a mut Item<W>, LayoutError> {
    let (leaf, ancestors) = path.coords().split_last().ok_or(LayoutError::EmptyPath)?;
    let parent = descend_mut(layout, ancestors)?;
    let section_count = parent.sections.len();
    let section = parent
        .sections
        .get_mut(leaf.section_index)
        .ok_or_else(|| LayoutError::SectionOutOfRange {
            path: serialize_coords(path.coords()),
            section_index: leaf.section_index,
            section_count,
        })?;
    let item_count = section.items.len();
    section
        .items
        .get_mut(leaf.item_index)
        .ok_or_else(|| LayoutError::ItemOutOfRange {
            path: serialize_coords(path.coords()),
            item_index: leaf.item_index,
            item_count,
        })
}

pub(crate) fn find_section_mut<'a, W>(
    layout: &'a mut Layout<W>,
    path: &SectionPath,
) -> Result<&'a mut Section<W>, LayoutError> {
    let parent = descend_mut(layout, path.parent_coords())?;
    let section_count = parent.sections.len();
    parent
        .sections
        .get_mut(path.section_index)
        .ok_or_else(|| LayoutError::SectionOutOfRange {
            path: path.serialize_key(),
            section_index: path.section_index,
            section_count,
        })
}

/// Mutable handle on the layout whose direct sections a section path names.
pub(crate) fn find_layout_mut<'a, W>(
    layout: &'a mut Layout<W>,
    parent: Option<&ItemPath>,
) -> Result<&'a mut Layout<W>, LayoutError> {
    descend_mut(layout, parent.map_or(&[], ItemPath::coords))
}

fn descend<'a, W>(
    mut layout: &'a Layout<W>,
    coords: &[Coordinate],
) -> Result<&'a Layout<W>, LayoutError> {
    for (depth, coord) in coords.iter().enumerate() {
        let section = section_at(layout, &coords[..=depth], coord.section_index)?;
        let item = item_at(section, &coords[..=depth], coord.item_index)?;
        layout = item
            .content
            .nested()
            .ok_or_else(|| LayoutError::NotAContainer {
                path: serialize_coords(&coords[..=depth]),
            })?;
    }
    Ok(layout)
}

fn descend_mut<'a, W>(
    mut layout: &'a mut Layout<W>,
    coords: &[Coordinate],
) -> Result<&'a mut Layout<W>, LayoutError> {
    for (depth, coord) in coords.iter().enumerate() {
        let section_count = layout.sections.len();
        let section = layout
            .sections
            .get_mut(coord.section_index)
            .ok_or_else(|| LayoutError::SectionOutOfRange {
                path: serialize_coords(&coords[..=depth]),
                section_index: coord.section_index,
                section_count,
            })?;
        let item_count = section.items.len();
        let item =
            section
                .items
                .get_mut(coord.item_index)
                .ok_or_else(|| LayoutError::ItemOutOfRange {
                    path: serialize_coords(&coords[..=depth]),
                    item_index: coord.item_index,
                    item_count,
                })?;
        layout = item
            .content
            .nested_mut()
            .ok_or_else(|| LayoutError::NotAContainer {
                path: serialize_coords(&coords[..=depth]),
            })?;
    }
    Ok(layout)
}

fn section_at<'a, W>(
    layout: &'a Layout<W>,
    resolved: &[Coordinate],
    section_index: usize,
) -> Result<&'a Section<W>, LayoutError> {
    layout
        .sections
        .get(section_index)
        .ok_or_else(|| LayoutError::SectionOutOfRange {
            path: serialize_coords(resolved),
            section_index,
            section_count: layout.sections.len(),
        })
}

fn item_at<'a, W>(
    section: &'a Section<W>,
    resolved: &[Coordinate],
    item_index: usize,
) -> Result<&'a Item<W>, LayoutError> {
    section
        .items
        .get(item_index)
        .ok_or_else(|| LayoutError::ItemOutOfRange {
            path: serialize_coords(resolved),
            item_index,
            item_count: section.items.len(),
        })
}
