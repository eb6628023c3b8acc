//! Structural failure model for path resolution and layout edits.
//!
//! Every variant carries the serialized path prefix that failed to resolve
//! plus the offending indices, so an error message alone is enough to locate
//! the stale coordinate. Unresolvable paths are upstream logic bugs; the
//! engine never catches or retries its own errors.

use std::fmt;

/// Structural error raised by path resolution and layout edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// An operation required a non-empty item path.
    EmptyPath,
    /// A section index did not resolve inside the addressed layout.
    SectionOutOfRange {
        path: String,
        section_index: usize,
        section_count: usize,
    },
    /// An item index did not resolve inside the addressed section.
    ItemOutOfRange {
        path: String,
        item_index: usize,
        item_count: usize,
    },
    /// Descent tried to continue through an item that holds widget content.
    NotAContainer { path: String },
    /// A direction change targeted an item that is not a nested layout.
    NotANestedLayout { path: String },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "path must address at least one item"),
            Self::SectionOutOfRange {
                path,
                section_index,
                section_count,
            } => write!(
                f,
                "section {section_index} at {path} out of range for layout with {section_count} section(s)"
            ),
            Self::ItemOutOfRange {
                path,
                item_index,
                item_count,
            } => write!(
                f,
                "item {item_index} at {path} out of range for section with {item_count} item(s)"
            ),
            Self::NotAContainer { path } => {
                write!(f, "item at {path} holds widget content, cannot descend")
            }
            Self::NotANestedLayout { path } => {
                write!(f, "item at {path} is not a nested layout")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_indices() {
        let err = LayoutError::SectionOutOfRange {
            path: "3_2".to_string(),
            section_index: 3,
            section_count: 2,
        };
        let msg = format!("{err}");
        assert!(msg.contains("section 3"));
        assert!(msg.contains("3_2"));
        assert!(msg.contains("2 section(s)"));
    }

    #[test]
    fn display_item_out_of_range() {
        let err = LayoutError::ItemOutOfRange {
            path: "0_4".to_string(),
            item_index: 4,
            item_count: 2,
        };
        let msg = format!("{err}");
        assert!(msg.contains("item 4"));
        assert!(msg.contains("2 item(s)"));
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(LayoutError::EmptyPath);
        assert!(err.source().is_none());
    }
}
