//! Tag decoration table.
//!
//! Tags decorate listing entries with icons, colors and tooltips. Like
//! the tool registry this is immutable configuration; unknown tags fall
//! back to a bare entry carrying just the name.

/// Synthetic tag applied to directories that never had a file added
/// beneath them (they exist client-side only until then).
pub const VIRTUAL_TAG: &str = "virtual";

/// Display details for a single tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl Tag {
    /// A bare tag with no display details beyond its name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            title: None,
            description: None,
            icon: None,
            color: None,
        }
    }
}

/// Immutable lookup table of known tags.
#[derive(Debug, Clone)]
pub struct TagRegistry {
    tags: Vec<Tag>,
}

impl Default for TagRegistry {
    /// Carries the builtin virtual-folder entry.
    fn default() -> Self {
        Self {
            tags: vec![Tag {
                name: VIRTUAL_TAG.to_string(),
                title: Some("Is it alive or dead?".to_string()),
                description: Some(
                    "A virtual folder only exists in your browser as long as you do not \
                     refresh the page. To persist the folder, add a file on it."
                        .to_string(),
                ),
                icon: Some("bx bxs-cat".to_string()),
                color: Some("var(--color-yellow)".to_string()),
            }],
        }
    }
}

impl TagRegistry {
    pub fn new(tags: Vec<Tag>) -> Self {
        Self { tags }
    }

    /// Known tag details, or a bare tag when the name is not registered.
    pub fn find(&self, name: &str) -> Tag {
        self.tags
            .iter()
            .find(|tag| tag.name == name)
            .cloned()
            .unwrap_or_else(|| Tag::new(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_builtin_virtual_tag() {
        let registry = TagRegistry::default();
        let tag = registry.find(VIRTUAL_TAG);
        assert_eq!(tag.name, VIRTUAL_TAG);
        assert!(tag.icon.is_some());
    }

    #[test]
    fn test_find_unknown_tag_keeps_name() {
        let registry = TagRegistry::default();
        let tag = registry.find("drafts");
        assert_eq!(tag, Tag::new("drafts"));
    }
}
