//! Mutation engine over a layout tree and its stash.
//!
//! Every operation validates and edits a cloned working copy of the tree
//! (and stash) and swaps it in only when the whole edit succeeds. On error
//! the builder is left exactly as it was, so a failed call can never leave a
//! half-applied move or a drained stash behind.
//!
//! Structural changes that leave a section empty remove that section in the
//! same edit. The policy lives in one place, `prune_section_if_empty`, and
//! every emptying operation routes through it.

use crate::error::LayoutError;
use crate::event::LayoutEvent;
use crate::model::{ContainerDirection, Item, ItemSize, Layout, Section, SectionHeader};
use crate::navigate::{find_item_mut, find_layout_mut, find_section_mut};
use crate::path::{ItemPath, SectionPath, serialize_item_path};
use crate::stash::{Stash, StashId};

/// Stateful editor owning a layout tree and a stash of detached items.
#[derive(Debug, Clone)]
pub struct LayoutBuilder<W> {
    layout: Layout<W>,
    stash: Stash<W>,
}

impl<W: Clone> LayoutBuilder<W> {
    /// Builder over the given tree with an empty stash.
    #[must_use]
    pub fn new(layout: Layout<W>) -> Self {
        Self {
            layout,
            stash: Stash::new(),
        }
    }

    /// Builder over the given tree and a pre-populated stash.
    #[must_use]
    pub fn with_stash(layout: Layout<W>, stash: Stash<W>) -> Self {
        Self { layout, stash }
    }

    /// Current tree.
    #[must_use]
    pub fn layout(&self) -> &Layout<W> {
        &self.layout
    }

    /// Current stash.
    #[must_use]
    pub fn stash(&self) -> &Stash<W> {
        &self.stash
    }

    /// Independent copy of the current tree; later edits leave it untouched.
    #[must_use]
    pub fn snapshot(&self) -> Layout<W> {
        self.layout.clone()
    }

    /// Consume the builder, keeping the tree.
    #[must_use]
    pub fn into_layout(self) -> Layout<W> {
        self.layout
    }

    /// Insert a section at the given position (index may equal the section
    /// count). A consumed stash bucket's items are appended to the new
    /// section's own items inside the same edit.
    pub fn add_section(
        &mut self,
        path: &SectionPath,
        section: Section<W>,
        stash_to_consume: Option<&StashId>,
    ) -> Result<Vec<LayoutEvent<W>>, LayoutError> {
        self.commit("add_section", |layout, stash| {
            let mut section = section;
            let stashes_used = consume_stash(stash, stash_to_consume, &mut section.items);

            let parent = find_layout_mut(layout, path.parent.as_ref())?;
            if path.section_index > parent.sections.len() {
                return Err(LayoutError::SectionOutOfRange {
                    path: path.serialize_key(),
                    section_index: path.section_index,
                    section_count: parent.sections.len(),
                });
            }
            parent.sections.insert(path.section_index, section.clone());
            Ok(vec![LayoutEvent::SectionAdded {
                path: path.clone(),
                section,
                stashes_used,
            }])
        })
    }

    /// Remove a section and re-insert it at the destination, atomically. The
    /// destination is interpreted against the tree *after* the removal.
    pub fn move_section(
        &mut self,
        from: &SectionPath,
        to: &SectionPath,
    ) -> Result<Vec<LayoutEvent<W>>, LayoutError> {
        self.commit("move_section", |layout, _stash| {
            let section = remove_section_at(layout, from)?;

            let dest = find_layout_mut(layout, to.parent.as_ref())?;
            if to.section_index > dest.sections.len() {
                return Err(LayoutError::SectionOutOfRange {
                    path: to.serialize_key(),
                    section_index: to.section_index,
                    section_count: dest.sections.len(),
                });
            }
            dest.sections.insert(to.section_index, section);
            Ok(vec![LayoutEvent::SectionMoved {
                from: from.clone(),
                to: to.clone(),
            }])
        })
    }

    /// Remove a section, optionally parking its items in the stash.
    pub fn remove_section(
        &mut self,
        path: &SectionPath,
        stash_as: Option<StashId>,
    ) -> Result<Vec<LayoutEvent<W>>, LayoutError> {
        self.commit("remove_section", |layout, stash| {
            let section = remove_section_at(layout, path)?;
            if let Some(id) = &stash_as {
                stash.stash(id.clone(), section.items.clone());
            }
            Ok(vec![LayoutEvent::SectionRemoved {
                path: path.clone(),
                section,
                stash_id: stash_as,
                eagerly: false,
            }])
        })
    }

    /// Replace a section's header; `None` clears it.
    pub fn set_section_header(
        &mut self,
        path: &SectionPath,
        header: Option<SectionHeader>,
    ) -> Result<Vec<LayoutEvent<W>>, LayoutError> {
        self.commit("set_section_header", |layout, _stash| {
            let section = find_section_mut(layout, path)?;
            section.header = header.clone();
            Ok(vec![LayoutEvent::SectionHeaderChanged {
                path: path.clone(),
                header,
            }])
        })
    }

    /// Set the rendering direction of the root layout (`None`) or of the
    /// nested layout held by the addressed item.
    pub fn set_container_direction(
        &mut self,
        path: Option<&ItemPath>,
        direction: ContainerDirection,
    ) -> Result<Vec<LayoutEvent<W>>, LayoutError> {
        self.commit("set_container_direction", |layout, _stash| {
            let target = match path {
                None => layout,
                Some(item_path) => {
                    let item = find_item_mut(layout, item_path)?;
                    item.content
                        .nested_mut()
                        .ok_or_else(|| LayoutError::NotANestedLayout {
                            path: serialize_item_path(Some(item_path)),
                        })?
                }
            };
            target.direction = Some(direction);
            Ok(vec![LayoutEvent::DirectionChanged {
                path: path.cloned(),
                direction,
            }])
        })
    }

    /// Insert items into a section at the leaf item index (index may equal
    /// the item count). Unstashed items are appended after the explicit
    /// batch; the consumed bucket is cleared in the same edit.
    pub fn add_items(
        &mut self,
        path: &ItemPath,
        items: Vec<Item<W>>,
        stash_to_consume: Option<&StashId>,
    ) -> Result<Vec<LayoutEvent<W>>, LayoutError> {
        self.commit("add_items", |layout, stash| {
            let mut batch = items;
            let stashes_used = consume_stash(stash, stash_to_consume, &mut batch);

            let section_path = path.to_section_path()?;
            let item_index = path.item_index()?;
            let section = find_section_mut(layout, &section_path)?;
            if item_index > section.items.len() {
                return Err(LayoutError::ItemOutOfRange {
                    path: serialize_item_path(Some(path)),
                    item_index,
                    item_count: section.items.len(),
                });
            }
            section
                .items
                .splice(item_index..item_index, batch.iter().cloned());
            Ok(vec![LayoutEvent::ItemsAdded {
                path: path.clone(),
                items: batch,
                stashes_used,
            }])
        })
    }

    /// Move one item between positions, within or across sections. The
    /// destination is interpreted against the tree *after* the source item
    /// has been removed. A source section emptied by the move is removed in
    /// the same edit; the event's `to` path reflects any index shift that
    /// removal causes.
    pub fn move_item(
        &mut self,
        from: &ItemPath,
        to: &ItemPath,
    ) -> Result<Vec<LayoutEvent<W>>, LayoutError> {
        self.commit("move_item", |layout, _stash| {
            let moved = move_item_inner(layout, from, to)?;
            Ok(vec![LayoutEvent::ItemMoved {
                from: from.clone(),
                to: moved.final_path,
                item: moved.item,
                original_section_removed: moved.pruned.is_some(),
            }])
        })
    }

    /// Create an empty section at the destination and move the item into it
    /// at index 0.
    pub fn move_item_to_new_section(
        &mut self,
        from: &ItemPath,
        to: &SectionPath,
    ) -> Result<Vec<LayoutEvent<W>>, LayoutError> {
        self.commit("move_item_to_new_section", |layout, _stash| {
            let parent = find_layout_mut(layout, to.parent.as_ref())?;
            if to.section_index > parent.sections.len() {
                return Err(LayoutError::SectionOutOfRange {
                    path: to.serialize_key(),
                    section_index: to.section_index,
                    section_count: parent.sections.len(),
                });
            }
            parent.sections.insert(to.section_index, Section::empty());

            // the insertion may have shifted the source coordinates
            let source = shift_for_inserted_section(from, to);
            let dest = ItemPath::from_section_path(to, 0);
            let moved = move_item_inner(layout, &source, &dest)?;

            Ok(vec![
                LayoutEvent::SectionAdded {
                    path: to.clone(),
                    section: Section::empty(),
                    stashes_used: Vec::new(),
                },
                LayoutEvent::ItemMoved {
                    from: from.clone(),
                    to: moved.final_path,
                    item: moved.item,
                    original_section_removed: moved.pruned.is_some(),
                },
            ])
        })
    }

    /// Replace one item with zero or more items, optionally parking the
    /// evicted item in the stash. Replacing with an empty batch may empty
    /// the section, which is then removed in the same edit.
    pub fn replace_item(
        &mut self,
        path: &ItemPath,
        new_items: Vec<Item<W>>,
        stash_evicted: Option<StashId>,
    ) -> Result<Vec<LayoutEvent<W>>, LayoutError> {
        self.commit("replace_item", |layout, stash| {
            let section_path = path.to_section_path()?;
            let item_index = path.item_index()?;
            let section = find_section_mut(layout, &section_path)?;
            if item_index >= section.items.len() {
                return Err(LayoutError::ItemOutOfRange {
                    path: serialize_item_path(Some(path)),
                    item_index,
                    item_count: section.items.len(),
                });
            }
            let previous = section.items.remove(item_index);
            section
                .items
                .splice(item_index..item_index, new_items.iter().cloned());
            if let Some(id) = &stash_evicted {
                stash.stash(id.clone(), vec![previous.clone()]);
            }

            let mut events = vec![LayoutEvent::ItemReplaced {
                path: path.clone(),
                new_items,
                previous,
                stash_id: stash_evicted,
            }];
            if let Some((pruned_path, pruned)) = prune_section_if_empty(layout, &section_path)? {
                events.push(LayoutEvent::SectionRemoved {
                    path: pruned_path,
                    section: pruned,
                    stash_id: None,
                    eagerly: true,
                });
            }
            Ok(events)
        })
    }

    /// Remove one item, optionally parking it in the stash. A section
    /// emptied by the removal is removed in the same edit.
    pub fn remove_item(
        &mut self,
        path: &ItemPath,
        stash_as: Option<StashId>,
    ) -> Result<Vec<LayoutEvent<W>>, LayoutError> {
        self.commit("remove_item", |layout, stash| {
            let section_path = path.to_section_path()?;
            let item_index = path.item_index()?;
            let section = find_section_mut(layout, &section_path)?;
            if item_index >= section.items.len() {
                return Err(LayoutError::ItemOutOfRange {
                    path: serialize_item_path(Some(path)),
                    item_index,
                    item_count: section.items.len(),
                });
            }
            let item = section.items.remove(item_index);
            if let Some(id) = &stash_as {
                stash.stash(id.clone(), vec![item.clone()]);
            }

            let pruned = prune_section_if_empty(layout, &section_path)?;
            let mut events = vec![LayoutEvent::ItemRemoved {
                path: path.clone(),
                item,
                stash_id: stash_as,
                section_removed: pruned.is_some(),
            }];
            if let Some((pruned_path, section)) = pruned {
                events.push(LayoutEvent::SectionRemoved {
                    path: pruned_path,
                    section,
                    stash_id: None,
                    eagerly: true,
                });
            }
            Ok(events)
        })
    }

    /// Replace an item's whole per-breakpoint size record.
    pub fn resize_item(
        &mut self,
        path: &ItemPath,
        size: ItemSize,
    ) -> Result<Vec<LayoutEvent<W>>, LayoutError> {
        self.commit("resize_item", |layout, _stash| {
            let item = find_item_mut(layout, path)?;
            item.size = size;
            Ok(vec![LayoutEvent::ItemResized {
                path: path.clone(),
                size,
            }])
        })
    }

    /// Set the baseline height of several items of one section. All indexes
    /// are validated before any item is touched.
    pub fn resize_items(
        &mut self,
        path: &SectionPath,
        item_indexes: &[usize],
        new_height: u32,
    ) -> Result<Vec<LayoutEvent<W>>, LayoutError> {
        self.commit("resize_items", |layout, _stash| {
            let section = find_section_mut(layout, path)?;
            let item_count = section.items.len();
            if let Some(&bad) = item_indexes.iter().find(|&&index| index >= item_count) {
                return Err(LayoutError::ItemOutOfRange {
                    path: path.serialize_key(),
                    item_index: bad,
                    item_count,
                });
            }
            for &index in item_indexes {
                section.items[index].size.xl.height = Some(new_height);
            }
            Ok(vec![LayoutEvent::ItemsResized {
                path: path.clone(),
                item_indexes: item_indexes.to_vec(),
                height: new_height,
            }])
        })
    }

    /// Set an item's baseline width.
    pub fn set_item_width(
        &mut self,
        path: &ItemPath,
        new_width: u32,
    ) -> Result<Vec<LayoutEvent<W>>, LayoutError> {
        self.commit("set_item_width", |layout, _stash| {
            let item = find_item_mut(layout, path)?;
            item.size.xl.width = new_width;
            Ok(vec![LayoutEvent::ItemWidthChanged {
                path: path.clone(),
                width: new_width,
            }])
        })
    }

    /// Remove every directly-empty section of the root layout. Each event's
    /// path is valid against the tree as it stands when that event fires.
    pub fn remove_empty_sections(&mut self) -> Result<Vec<LayoutEvent<W>>, LayoutError> {
        self.commit("remove_empty_sections", |layout, _stash| {
            let mut events = Vec::new();
            let mut index = 0;
            while index < layout.sections.len() {
                if layout.sections[index].is_empty() {
                    let section = layout.sections.remove(index);
                    events.push(LayoutEvent::SectionRemoved {
                        path: SectionPath::root(index),
                        section,
                        stash_id: None,
                        eagerly: false,
                    });
                } else {
                    index += 1;
                }
            }
            Ok(events)
        })
    }

    /// Run one edit against cloned working copies and swap them in on
    /// success. The working copies are dropped on error, leaving the
    /// builder untouched.
    fn commit<F>(&mut self, op: &'static str, edit: F) -> Result<Vec<LayoutEvent<W>>, LayoutError>
    where
        F: FnOnce(&mut Layout<W>, &mut Stash<W>) -> Result<Vec<LayoutEvent<W>>, LayoutError>,
    {
        let mut layout = self.layout.clone();
        let mut stash = self.stash.clone();
        let events = edit(&mut layout, &mut stash)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(op, events = events.len(), "layout edit applied");
        #[cfg(not(feature = "tracing"))]
        let _ = op;
        self.layout = layout;
        self.stash = stash;
        Ok(events)
    }
}

struct MovedItem<W> {
    final_path: ItemPath,
    item: Item<W>,
    pruned: Option<(SectionPath, Section<W>)>,
}

fn move_item_inner<W: Clone>(
    layout: &mut Layout<W>,
    from: &ItemPath,
    to: &ItemPath,
) -> Result<MovedItem<W>, LayoutError> {
    let from_section_path = from.to_section_path()?;
    let from_index = from.item_index()?;
    let source = find_section_mut(layout, &from_section_path)?;
    if from_index >= source.items.len() {
        return Err(LayoutError::ItemOutOfRange {
            path: serialize_item_path(Some(from)),
            item_index: from_index,
            item_count: source.items.len(),
        });
    }
    let item = source.items.remove(from_index);

    let to_section_path = to.to_section_path()?;
    let to_index = to.item_index()?;
    let dest = find_section_mut(layout, &to_section_path)?;
    if to_index > dest.items.len() {
        return Err(LayoutError::ItemOutOfRange {
            path: serialize_item_path(Some(to)),
            item_index: to_index,
            item_count: dest.items.len(),
        });
    }
    dest.items.insert(to_index, item.clone());

    let pruned = prune_section_if_empty(layout, &from_section_path)?;
    let final_path = match &pruned {
        Some((removed, _)) => shift_for_removed_section(to, removed),
        None => to.clone(),
    };
    Ok(MovedItem {
        final_path,
        item,
        pruned,
    })
}

/// Remove the section iff the edit that just ran left it empty.
fn prune_section_if_empty<W>(
    layout: &mut Layout<W>,
    path: &SectionPath,
) -> Result<Option<(SectionPath, Section<W>)>, LayoutError> {
    let parent = find_layout_mut(layout, path.parent.as_ref())?;
    match parent.sections.get(path.section_index) {
        Some(section) if section.is_empty() => {
            let removed = parent.sections.remove(path.section_index);
            Ok(Some((path.clone(), removed)))
        }
        _ => Ok(None),
    }
}

fn remove_section_at<W>(
    layout: &mut Layout<W>,
    path: &SectionPath,
) -> Result<Section<W>, LayoutError> {
    let parent = find_layout_mut(layout, path.parent.as_ref())?;
    if path.section_index >= parent.sections.len() {
        return Err(LayoutError::SectionOutOfRange {
            path: path.serialize_key(),
            section_index: path.section_index,
            section_count: parent.sections.len(),
        });
    }
    Ok(parent.sections.remove(path.section_index))
}

/// Drain the named bucket into `batch`, reporting the id when the bucket
/// existed.
fn consume_stash<W>(
    stash: &mut Stash<W>,
    id: Option<&StashId>,
    batch: &mut Vec<Item<W>>,
) -> Vec<StashId> {
    let Some(id) = id else {
        return Vec::new();
    };
    if stash.peek(id).is_none() {
        return Vec::new();
    }
    batch.extend(stash.unstash(id));
    vec![id.clone()]
}

/// Decrement the path coordinate that passed through the removed section's
/// layout at a higher sibling index, if any.
fn shift_for_removed_section(path: &ItemPath, removed: &SectionPath) -> ItemPath {
    let depth = removed.parent_coords().len();
    let coords = path.coords();
    if coords.len() > depth
        && coords[..depth] == *removed.parent_coords()
        && coords[depth].section_index > removed.section_index
    {
        let mut shifted = coords.to_vec();
        shifted[depth].section_index -= 1;
        return ItemPath::from(shifted);
    }
    path.clone()
}

/// Increment the path coordinate that passes through the inserted section's
/// layout at or past the insertion index, if any.
fn shift_for_inserted_section(path: &ItemPath, inserted: &SectionPath) -> ItemPath {
    let depth = inserted.parent_coords().len();
    let coords = path.coords();
    if coords.len() > depth
        && coords[..depth] == *inserted.parent_coords()
        && coords[depth].section_index >= inserted.section_index
    {
        let mut shifted = coords.to_vec();
        shifted[depth].section_index += 1;
        return ItemPath::from(shifted);
    }
    path.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemContent, SizeSpec};
    use crate::navigate::{find_item, find_section};
    use proptest::prelude::*;

    fn w(id: u32) -> Item<u32> {
        Item::widget(ItemSize::xl(SizeSpec::width(6)), id)
    }

    fn widget_id(item: &Item<u32>) -> u32 {
        match item.content {
            ItemContent::Widget(id) => id,
            ItemContent::Nested(_) => panic!("expected widget"),
        }
    }

    fn section_ids(section: &Section<u32>) -> Vec<u32> {
        section.items.iter().map(widget_id).collect()
    }

    fn path(pairs: &[(usize, usize)]) -> ItemPath {
        ItemPath::from(
            pairs
                .iter()
                .map(|&(s, i)| crate::path::Coordinate::new(s, i))
                .collect::<Vec<_>>(),
        )
    }

    /// Three root sections: [1, 2], [3], [4, 5].
    fn builder() -> LayoutBuilder<u32> {
        LayoutBuilder::new(Layout::new(vec![
            Section::new(vec![w(1), w(2)]),
            Section::new(vec![w(3)]),
            Section::new(vec![w(4), w(5)]),
        ]))
    }

    // ---- add_section ----

    #[test]
    fn adds_section_at_position() {
        let mut b = builder();
        let events = b
            .add_section(&SectionPath::root(1), Section::new(vec![w(9)]), None)
            .unwrap();
        assert_eq!(b.layout().sections.len(), 4);
        assert_eq!(section_ids(&b.layout().sections[1]), vec![9]);
        assert!(matches!(
            &events[0],
            LayoutEvent::SectionAdded { path, stashes_used, .. }
                if path.section_index == 1 && stashes_used.is_empty()
        ));
    }

    #[test]
    fn adds_section_at_the_end() {
        let mut b = builder();
        b.add_section(&SectionPath::root(3), Section::empty(), None)
            .unwrap();
        assert_eq!(b.layout().sections.len(), 4);
        assert!(b.layout().sections[3].is_empty());
    }

    #[test]
    fn add_section_past_the_end_fails() {
        let mut b = builder();
        let err = b
            .add_section(&SectionPath::root(4), Section::empty(), None)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::SectionOutOfRange {
                path: "4".to_string(),
                section_index: 4,
                section_count: 3,
            }
        );
        assert_eq!(b.layout().sections.len(), 3);
    }

    #[test]
    fn add_section_consumes_a_stash() {
        let mut b = builder();
        b.remove_item(&path(&[(1, 0)]), Some(StashId::from("parked")))
            .unwrap();
        let events = b
            .add_section(
                &SectionPath::root(0),
                Section::new(vec![w(8)]),
                Some(&StashId::from("parked")),
            )
            .unwrap();
        assert_eq!(section_ids(&b.layout().sections[0]), vec![8, 3]);
        assert!(b.stash().is_empty());
        assert!(matches!(
            &events[0],
            LayoutEvent::SectionAdded { stashes_used, .. }
                if stashes_used == &[StashId::from("parked")]
        ));
    }

    #[test]
    fn unknown_stash_id_is_not_reported_as_used() {
        let mut b = builder();
        let events = b
            .add_section(
                &SectionPath::root(0),
                Section::empty(),
                Some(&StashId::from("never-stashed")),
            )
            .unwrap();
        assert!(matches!(
            &events[0],
            LayoutEvent::SectionAdded { stashes_used, .. } if stashes_used.is_empty()
        ));
    }

    // ---- move_section ----

    #[test]
    fn moves_section_forward_against_post_removal_indices() {
        let mut b = builder();
        b.move_section(&SectionPath::root(0), &SectionPath::root(2))
            .unwrap();
        let ids: Vec<Vec<u32>> = b.layout().sections.iter().map(section_ids).collect();
        assert_eq!(ids, vec![vec![3], vec![4, 5], vec![1, 2]]);
    }

    #[test]
    fn moves_section_backward() {
        let mut b = builder();
        b.move_section(&SectionPath::root(2), &SectionPath::root(0))
            .unwrap();
        let ids: Vec<Vec<u32>> = b.layout().sections.iter().map(section_ids).collect();
        assert_eq!(ids, vec![vec![4, 5], vec![1, 2], vec![3]]);
    }

    #[test]
    fn move_section_to_invalid_destination_restores_nothing() {
        let mut b = builder();
        let before = b.snapshot();
        let err = b
            .move_section(&SectionPath::root(0), &SectionPath::root(3))
            .unwrap_err();
        // after removal only two sections remain, so index 3 is out of range
        assert!(matches!(err, LayoutError::SectionOutOfRange { section_count: 2, .. }));
        assert_eq!(b.layout(), &before);
    }

    // ---- remove_section ----

    #[test]
    fn removes_section_and_stashes_items() {
        let mut b = builder();
        let events = b
            .remove_section(&SectionPath::root(2), Some(StashId::from("parked")))
            .unwrap();
        assert_eq!(b.layout().sections.len(), 2);
        assert_eq!(
            b.stash().peek(&StashId::from("parked")).map(<[_]>::len),
            Some(2)
        );
        assert!(matches!(
            &events[0],
            LayoutEvent::SectionRemoved { eagerly: false, stash_id: Some(_), .. }
        ));
    }

    // ---- headers and direction ----

    #[test]
    fn sets_and_clears_section_header() {
        let mut b = builder();
        let header = SectionHeader::titled("kpis");
        b.set_section_header(&SectionPath::root(0), Some(header.clone()))
            .unwrap();
        assert_eq!(b.layout().sections[0].header, Some(header));
        b.set_section_header(&SectionPath::root(0), None).unwrap();
        assert_eq!(b.layout().sections[0].header, None);
    }

    #[test]
    fn sets_root_direction() {
        let mut b = builder();
        b.set_container_direction(None, ContainerDirection::Column)
            .unwrap();
        assert_eq!(b.layout().direction, Some(ContainerDirection::Column));
    }

    #[test]
    fn sets_nested_container_direction() {
        let mut b = LayoutBuilder::new(Layout::new(vec![Section::new(vec![Item::nested(
            ItemSize::xl(SizeSpec::width(12)),
            Layout::new(vec![Section::new(vec![w(1)])]),
        )])]));
        let container = path(&[(0, 0)]);
        b.set_container_direction(Some(&container), ContainerDirection::Row)
            .unwrap();
        let item = find_item(b.layout(), &container).unwrap();
        assert_eq!(
            item.content.nested().unwrap().direction,
            Some(ContainerDirection::Row)
        );
    }

    #[test]
    fn direction_on_widget_item_fails() {
        let mut b = builder();
        let err = b
            .set_container_direction(Some(&path(&[(0, 0)])), ContainerDirection::Row)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::NotANestedLayout {
                path: "0_0".to_string(),
            }
        );
    }

    // ---- add_items ----

    #[test]
    fn inserts_items_at_the_leaf_index() {
        let mut b = builder();
        b.add_items(&path(&[(0, 1)]), vec![w(8), w(9)], None).unwrap();
        assert_eq!(section_ids(&b.layout().sections[0]), vec![1, 8, 9, 2]);
    }

    #[test]
    fn appends_items_at_item_count() {
        let mut b = builder();
        b.add_items(&path(&[(1, 1)]), vec![w(8)], None).unwrap();
        assert_eq!(section_ids(&b.layout().sections[1]), vec![3, 8]);
    }

    #[test]
    fn add_items_past_the_end_fails() {
        let mut b = builder();
        let err = b.add_items(&path(&[(1, 2)]), vec![w(8)], None).unwrap_err();
        assert_eq!(
            err,
            LayoutError::ItemOutOfRange {
                path: "1_2".to_string(),
                item_index: 2,
                item_count: 1,
            }
        );
    }

    #[test]
    fn unstashed_items_follow_the_explicit_batch() {
        let mut b = builder();
        b.remove_section(&SectionPath::root(2), Some(StashId::from("parked")))
            .unwrap();
        let events = b
            .add_items(
                &path(&[(0, 0)]),
                vec![w(9)],
                Some(&StashId::from("parked")),
            )
            .unwrap();
        assert_eq!(section_ids(&b.layout().sections[0]), vec![9, 4, 5, 1, 2]);
        assert!(b.stash().is_empty());
        assert!(matches!(
            &events[0],
            LayoutEvent::ItemsAdded { items, stashes_used, .. }
                if items.len() == 3 && stashes_used.len() == 1
        ));
    }

    // ---- move_item ----

    #[test]
    fn moves_item_within_a_section() {
        let mut b = builder();
        let events = b.move_item(&path(&[(0, 0)]), &path(&[(0, 1)])).unwrap();
        assert_eq!(section_ids(&b.layout().sections[0]), vec![2, 1]);
        assert!(matches!(
            &events[0],
            LayoutEvent::ItemMoved { original_section_removed: false, .. }
        ));
    }

    #[test]
    fn moves_item_across_sections() {
        let mut b = builder();
        b.move_item(&path(&[(0, 1)]), &path(&[(2, 0)])).unwrap();
        assert_eq!(section_ids(&b.layout().sections[0]), vec![1]);
        assert_eq!(section_ids(&b.layout().sections[2]), vec![2, 4, 5]);
    }

    #[test]
    fn move_emptying_the_source_prunes_it_and_adjusts_the_path() {
        let mut b = builder();
        let events = b.move_item(&path(&[(1, 0)]), &path(&[(2, 2)])).unwrap();
        // section 1 emptied and removed; old section 2 is now section 1
        let ids: Vec<Vec<u32>> = b.layout().sections.iter().map(section_ids).collect();
        assert_eq!(ids, vec![vec![1, 2], vec![4, 5, 3]]);
        match &events[0] {
            LayoutEvent::ItemMoved {
                to,
                original_section_removed,
                ..
            } => {
                assert!(original_section_removed);
                assert_eq!(to, &path(&[(1, 2)]));
                assert_eq!(widget_id(find_item(b.layout(), to).unwrap()), 3);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn move_to_lower_sibling_needs_no_adjustment() {
        let mut b = builder();
        let events = b.move_item(&path(&[(1, 0)]), &path(&[(0, 0)])).unwrap();
        let ids: Vec<Vec<u32>> = b.layout().sections.iter().map(section_ids).collect();
        assert_eq!(ids, vec![vec![3, 1, 2], vec![4, 5]]);
        assert!(matches!(
            &events[0],
            LayoutEvent::ItemMoved { to, original_section_removed: true, .. }
                if to == &path(&[(0, 0)])
        ));
    }

    #[test]
    fn move_destination_resolves_after_source_removal() {
        // moving within a section: index 2 is valid only on the shrunk list
        let mut b = builder();
        b.move_item(&path(&[(2, 0)]), &path(&[(2, 1)])).unwrap();
        assert_eq!(section_ids(&b.layout().sections[2]), vec![5, 4]);
    }

    #[test]
    fn move_out_of_nested_layout() {
        let nested = Layout::new(vec![Section::new(vec![w(10)])]);
        let mut b = LayoutBuilder::new(Layout::new(vec![
            Section::new(vec![Item::nested(ItemSize::xl(SizeSpec::width(12)), nested), w(1)]),
            Section::new(vec![w(2)]),
        ]));
        let events = b
            .move_item(&path(&[(0, 0), (0, 0)]), &path(&[(1, 1)]))
            .unwrap();
        assert_eq!(section_ids(&b.layout().sections[1]), vec![2, 10]);
        // nested layout lost its only section
        let container = find_item(b.layout(), &path(&[(0, 0)])).unwrap();
        assert!(container.content.nested().unwrap().sections.is_empty());
        assert!(matches!(
            &events[0],
            LayoutEvent::ItemMoved { original_section_removed: true, .. }
        ));
    }

    // ---- move_item_to_new_section ----

    #[test]
    fn moves_item_into_a_fresh_section() {
        let mut b = builder();
        let events = b
            .move_item_to_new_section(&path(&[(0, 1)]), &SectionPath::root(3))
            .unwrap();
        let ids: Vec<Vec<u32>> = b.layout().sections.iter().map(section_ids).collect();
        assert_eq!(ids, vec![vec![1], vec![3], vec![4, 5], vec![2]]);
        assert!(matches!(&events[0], LayoutEvent::SectionAdded { .. }));
        assert!(matches!(
            &events[1],
            LayoutEvent::ItemMoved { to, original_section_removed: false, .. }
                if to == &path(&[(3, 0)])
        ));
    }

    #[test]
    fn insertion_before_the_source_shifts_the_source_path() {
        let mut b = builder();
        b.move_item_to_new_section(&path(&[(1, 0)]), &SectionPath::root(0))
            .unwrap();
        // section inserted at 0, item 3 moved into it, old section 1 pruned
        let ids: Vec<Vec<u32>> = b.layout().sections.iter().map(section_ids).collect();
        assert_eq!(ids, vec![vec![3], vec![1, 2], vec![4, 5]]);
    }

    #[test]
    fn pruned_source_shifts_the_new_section_back() {
        let mut b = builder();
        let events = b
            .move_item_to_new_section(&path(&[(1, 0)]), &SectionPath::root(3))
            .unwrap();
        let ids: Vec<Vec<u32>> = b.layout().sections.iter().map(section_ids).collect();
        assert_eq!(ids, vec![vec![1, 2], vec![4, 5], vec![3]]);
        assert!(matches!(
            &events[1],
            LayoutEvent::ItemMoved { to, original_section_removed: true, .. }
                if to == &path(&[(2, 0)])
        ));
    }

    // ---- replace_item ----

    #[test]
    fn replaces_one_item_with_many() {
        let mut b = builder();
        let events = b
            .replace_item(&path(&[(0, 0)]), vec![w(8), w(9)], None)
            .unwrap();
        assert_eq!(section_ids(&b.layout().sections[0]), vec![8, 9, 2]);
        assert!(matches!(
            &events[0],
            LayoutEvent::ItemReplaced { previous, .. } if widget_id(previous) == 1
        ));
    }

    #[test]
    fn replace_can_stash_the_evicted_item() {
        let mut b = builder();
        b.replace_item(&path(&[(1, 0)]), vec![w(8)], Some(StashId::from("old")))
            .unwrap();
        let parked = b.stash().peek(&StashId::from("old")).unwrap();
        assert_eq!(parked.len(), 1);
        assert_eq!(widget_id(&parked[0]), 3);
    }

    #[test]
    fn replace_with_empty_batch_prunes_the_section() {
        let mut b = builder();
        let events = b.replace_item(&path(&[(1, 0)]), Vec::new(), None).unwrap();
        assert_eq!(b.layout().sections.len(), 2);
        assert!(matches!(&events[0], LayoutEvent::ItemReplaced { .. }));
        assert!(matches!(
            &events[1],
            LayoutEvent::SectionRemoved { eagerly: true, .. }
        ));
    }

    // ---- remove_item ----

    #[test]
    fn removes_item_without_pruning_a_populated_section() {
        let mut b = builder();
        let events = b.remove_item(&path(&[(0, 0)]), None).unwrap();
        assert_eq!(section_ids(&b.layout().sections[0]), vec![2]);
        assert!(matches!(
            &events[0],
            LayoutEvent::ItemRemoved { section_removed: false, .. }
        ));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn removing_the_last_item_prunes_the_section() {
        let mut b = builder();
        let events = b
            .remove_item(&path(&[(1, 0)]), Some(StashId::from("parked")))
            .unwrap();
        assert_eq!(b.layout().sections.len(), 2);
        assert!(matches!(
            &events[0],
            LayoutEvent::ItemRemoved { section_removed: true, stash_id: Some(_), .. }
        ));
        assert!(matches!(
            &events[1],
            LayoutEvent::SectionRemoved { eagerly: true, .. }
        ));
        assert_eq!(
            b.stash().peek(&StashId::from("parked")).map(<[_]>::len),
            Some(1)
        );
    }

    // ---- sizing ----

    #[test]
    fn resize_item_replaces_the_whole_size() {
        let mut b = builder();
        let size = ItemSize::xl(SizeSpec::fixed(4, 10));
        b.resize_item(&path(&[(0, 1)]), size).unwrap();
        assert_eq!(find_item(b.layout(), &path(&[(0, 1)])).unwrap().size, size);
    }

    #[test]
    fn resize_items_sets_heights_for_listed_indexes() {
        let mut b = builder();
        b.resize_items(&SectionPath::root(2), &[0, 1], 14).unwrap();
        let section = find_section(b.layout(), &SectionPath::root(2)).unwrap();
        assert!(
            section
                .items
                .iter()
                .all(|item| item.size.xl.height == Some(14))
        );
    }

    #[test]
    fn resize_items_validates_before_mutating() {
        let mut b = builder();
        let before = b.snapshot();
        let err = b
            .resize_items(&SectionPath::root(2), &[0, 5], 14)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::ItemOutOfRange {
                path: "2".to_string(),
                item_index: 5,
                item_count: 2,
            }
        );
        assert_eq!(b.layout(), &before);
    }

    #[test]
    fn set_item_width_touches_only_the_baseline_width() {
        let mut b = builder();
        b.set_item_width(&path(&[(1, 0)]), 12).unwrap();
        let item = find_item(b.layout(), &path(&[(1, 0)])).unwrap();
        assert_eq!(item.size.xl.width, 12);
        assert_eq!(item.size.xl.height, None);
    }

    // ---- remove_empty_sections ----

    #[test]
    fn removes_every_empty_root_section() {
        let mut b = LayoutBuilder::new(Layout::new(vec![
            Section::empty(),
            Section::new(vec![w(1)]),
            Section::empty(),
            Section::empty(),
            Section::new(vec![w(2)]),
        ]));
        let events = b.remove_empty_sections().unwrap();
        assert_eq!(b.layout().sections.len(), 2);
        // paths are valid at the moment each event fires
        let indexes: Vec<usize> = events
            .iter()
            .map(|event| match event {
                LayoutEvent::SectionRemoved { path, .. } => path.section_index,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(indexes, vec![0, 1, 1]);
    }

    #[test]
    fn remove_empty_sections_is_a_no_op_on_full_layouts() {
        let mut b = builder();
        assert!(b.remove_empty_sections().unwrap().is_empty());
        assert_eq!(b.layout().sections.len(), 3);
    }

    // ---- atomicity ----

    #[test]
    fn failed_edit_leaves_layout_and_stash_untouched() {
        let mut b = builder();
        b.remove_item(&path(&[(0, 0)]), Some(StashId::from("parked")))
            .unwrap();
        let layout_before = b.snapshot();
        let stash_before = b.stash().clone();

        let err = b
            .add_items(
                &path(&[(9, 0)]),
                vec![w(8)],
                Some(&StashId::from("parked")),
            )
            .unwrap_err();
        assert!(matches!(err, LayoutError::SectionOutOfRange { .. }));
        assert_eq!(b.layout(), &layout_before);
        assert_eq!(b.stash(), &stash_before);
    }

    #[test]
    fn snapshot_is_unaffected_by_later_edits() {
        let mut b = builder();
        let snapshot = b.snapshot();
        b.remove_section(&SectionPath::root(0), None).unwrap();
        assert_eq!(snapshot.sections.len(), 3);
        assert_eq!(b.layout().sections.len(), 2);
    }

    // ---- properties ----

    proptest! {
        #[test]
        fn moving_preserves_item_count(
            from_s in 0usize..3,
            from_i in 0usize..3,
            to_s in 0usize..3,
            to_i in 0usize..3,
        ) {
            let mut b = LayoutBuilder::new(Layout::new(vec![
                Section::new(vec![w(0), w(1), w(2)]),
                Section::new(vec![w(3), w(4), w(5)]),
                Section::new(vec![w(6), w(7), w(8)]),
            ]));
            // destination index <= 2 is always a valid insert position here,
            // even when source and destination share a section
            b.move_item(&path(&[(from_s, from_i)]), &path(&[(to_s, to_i)]))
                .unwrap();
            prop_assert_eq!(b.layout().count_items(), 9);
        }

        #[test]
        fn stash_round_trip_preserves_order(ids in prop::collection::vec(0u32..100, 1..6)) {
            let mut b = LayoutBuilder::new(Layout::new(vec![
                Section::new(ids.iter().copied().map(w).collect()),
                Section::new(vec![w(200)]),
            ]));
            b.remove_section(&SectionPath::root(0), Some(StashId::from("parked"))).unwrap();
            b.add_items(&path(&[(0, 1)]), Vec::new(), Some(&StashId::from("parked"))).unwrap();
            let got = section_ids(&b.layout().sections[0]);
            let mut expected = vec![200];
            expected.extend(&ids);
            prop_assert_eq!(got, expected);
            prop_assert!(b.stash().is_empty());
        }
    }
}
