//! Change events emitted by completed builder edits.
//!
//! Events are immutable value records. Each one carries everything a
//! dispatcher needs to mirror the edit elsewhere; consumers never have to
//! re-derive facts from the tree.

use serde::{Deserialize, Serialize};

use crate::model::{ContainerDirection, Item, ItemSize, Section, SectionHeader};
use crate::path::{ItemPath, SectionPath};
use crate::stash::StashId;

/// One completed structural change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutEvent<W> {
    SectionAdded {
        path: SectionPath,
        section: Section<W>,
        stashes_used: Vec<StashId>,
    },
    SectionMoved {
        from: SectionPath,
        to: SectionPath,
    },
    SectionRemoved {
        path: SectionPath,
        section: Section<W>,
        stash_id: Option<StashId>,
        /// True when the removal was a side effect of another edit emptying
        /// the section, rather than an explicit `remove_section` call.
        eagerly: bool,
    },
    SectionHeaderChanged {
        path: SectionPath,
        header: Option<SectionHeader>,
    },
    DirectionChanged {
        /// `None` addresses the root layout.
        path: Option<ItemPath>,
        direction: ContainerDirection,
    },
    ItemsAdded {
        path: ItemPath,
        items: Vec<Item<W>>,
        stashes_used: Vec<StashId>,
    },
    ItemMoved {
        from: ItemPath,
        /// Final coordinates of the item, after any eager source-section
        /// removal has shifted sibling indices.
        to: ItemPath,
        item: Item<W>,
        original_section_removed: bool,
    },
    ItemReplaced {
        path: ItemPath,
        new_items: Vec<Item<W>>,
        previous: Item<W>,
        stash_id: Option<StashId>,
    },
    ItemRemoved {
        path: ItemPath,
        item: Item<W>,
        stash_id: Option<StashId>,
        section_removed: bool,
    },
    ItemResized {
        path: ItemPath,
        size: ItemSize,
    },
    ItemsResized {
        path: SectionPath,
        item_indexes: Vec<usize>,
        height: u32,
    },
    ItemWidthChanged {
        path: ItemPath,
        width: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SizeSpec;

    #[test]
    fn events_are_tagged_snake_case() {
        let event: LayoutEvent<u32> = LayoutEvent::SectionMoved {
            from: SectionPath::root(0),
            to: SectionPath::root(2),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "section_moved");
        assert_eq!(json["from"]["section_index"], 0);
        assert_eq!(json["to"]["section_index"], 2);
    }

    #[test]
    fn item_removed_round_trips() {
        let event: LayoutEvent<u32> = LayoutEvent::ItemRemoved {
            path: ItemPath::root(1, 0),
            item: Item::widget(ItemSize::xl(SizeSpec::width(6)), 42),
            stash_id: Some(StashId::from("parked")),
            section_removed: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: LayoutEvent<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn direction_changed_serializes_root_target_as_null() {
        let event: LayoutEvent<u32> = LayoutEvent::DirectionChanged {
            path: None,
            direction: ContainerDirection::Column,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "direction_changed");
        assert!(json["path"].is_null());
        assert_eq!(json["direction"], "column");
    }
}
