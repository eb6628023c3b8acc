//! Layout tree schema.
//!
//! A [`Layout`] is an ordered list of sections; a [`Section`] is an ordered
//! list of items; an [`Item`] holds either an opaque widget payload or a
//! nested layout. The widget type `W` is generic and never inspected by the
//! engine, which keeps the tree algebra independent of any widget catalog.

use serde::{Deserialize, Serialize};

use crate::path::ItemPath;

/// Rendering direction of a layout container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerDirection {
    Row,
    Column,
}

/// Responsive breakpoint used as a size lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenSize {
    #[serde(rename = "xl")]
    XLarge,
    #[serde(rename = "lg")]
    Large,
    #[serde(rename = "md")]
    Medium,
    #[serde(rename = "sm")]
    Small,
    #[serde(rename = "xs")]
    XSmall,
}

/// Size of one item at one breakpoint, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeSpec {
    pub width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_as_ratio: Option<u32>,
}

impl SizeSpec {
    /// Width-only spec; height falls back to content-driven sizing.
    #[must_use]
    pub const fn width(width: u32) -> Self {
        Self {
            width,
            height: None,
            height_as_ratio: None,
        }
    }

    /// Fixed width and height in grid units.
    #[must_use]
    pub const fn fixed(width: u32, height: u32) -> Self {
        Self {
            width,
            height: Some(height),
            height_as_ratio: None,
        }
    }
}

/// Per-breakpoint sizes of one item. The `xl` spec is the baseline and is
/// always present; smaller breakpoints fall back to it when unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSize {
    pub xl: SizeSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lg: Option<SizeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md: Option<SizeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sm: Option<SizeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xs: Option<SizeSpec>,
}

impl ItemSize {
    /// Size defined for the baseline breakpoint only.
    #[must_use]
    pub const fn xl(spec: SizeSpec) -> Self {
        Self {
            xl: spec,
            lg: None,
            md: None,
            sm: None,
            xs: None,
        }
    }

    /// Spec for the given breakpoint, falling back to `xl` when the
    /// breakpoint has no explicit spec.
    #[must_use]
    pub fn for_screen(&self, screen: ScreenSize) -> SizeSpec {
        let explicit = match screen {
            ScreenSize::XLarge => Some(self.xl),
            ScreenSize::Large => self.lg,
            ScreenSize::Medium => self.md,
            ScreenSize::Small => self.sm,
            ScreenSize::XSmall => self.xs,
        };
        explicit.unwrap_or(self.xl)
    }
}

/// Optional title and description rendered above a section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SectionHeader {
    /// Header with a title only.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }
}

/// Payload of one item: an opaque widget or a nested layout container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ItemContent<W> {
    Widget(W),
    Nested(Layout<W>),
}

impl<W> ItemContent<W> {
    /// True when descent through this item is possible.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Nested(_))
    }

    /// The nested layout, if this item is a container.
    #[must_use]
    pub const fn nested(&self) -> Option<&Layout<W>> {
        match self {
            Self::Nested(layout) => Some(layout),
            Self::Widget(_) => None,
        }
    }

    pub(crate) const fn nested_mut(&mut self) -> Option<&mut Layout<W>> {
        match self {
            Self::Nested(layout) => Some(layout),
            Self::Widget(_) => None,
        }
    }
}

/// One positioned cell of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item<W> {
    pub size: ItemSize,
    pub content: ItemContent<W>,
}

impl<W> Item<W> {
    /// Widget item with the given baseline size.
    #[must_use]
    pub const fn widget(size: ItemSize, widget: W) -> Self {
        Self {
            size,
            content: ItemContent::Widget(widget),
        }
    }

    /// Container item holding a nested layout.
    #[must_use]
    pub const fn nested(size: ItemSize, layout: Layout<W>) -> Self {
        Self {
            size,
            content: ItemContent::Nested(layout),
        }
    }
}

/// One ordered row of items, with an optional header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section<W> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<SectionHeader>,
    pub items: Vec<Item<W>>,
}

impl<W> Section<W> {
    /// Headerless section with the given items.
    #[must_use]
    pub const fn new(items: Vec<Item<W>>) -> Self {
        Self {
            header: None,
            items,
        }
    }

    /// Empty, headerless section.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// True when the section holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<W> Default for Section<W> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Ordered list of sections; the nesting unit of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout<W> {
    pub sections: Vec<Section<W>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<ContainerDirection>,
}

impl<W> Layout<W> {
    /// Layout with the given sections and no explicit direction.
    #[must_use]
    pub const fn new(sections: Vec<Section<W>>) -> Self {
        Self {
            sections,
            direction: None,
        }
    }

    /// Empty layout.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Total item count, including items inside nested layouts.
    #[must_use]
    pub fn count_items(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|section| &section.items)
            .map(|item| {
                1 + item
                    .content
                    .nested()
                    .map_or(0, |nested| nested.count_items())
            })
            .sum()
    }

    /// Depth-first walk over every item, yielding its full path. Container
    /// items are yielded before their nested contents.
    pub fn iter_items(&self) -> impl Iterator<Item = (ItemPath, &Item<W>)> {
        let mut out = Vec::new();
        collect_items(self, &ItemPath::default(), &mut out);
        out.into_iter()
    }
}

impl<W> Default for Layout<W> {
    fn default() -> Self {
        Self::empty()
    }
}

fn collect_items<'a, W>(
    layout: &'a Layout<W>,
    prefix: &ItemPath,
    out: &mut Vec<(ItemPath, &'a Item<W>)>,
) {
    for (section_index, section) in layout.sections.iter().enumerate() {
        for (item_index, item) in section.items.iter().enumerate() {
            let path = prefix.descend(section_index, item_index);
            out.push((path.clone(), item));
            if let Some(nested) = item.content.nested() {
                collect_items(nested, &path, out);
            }
        }
    }
}
