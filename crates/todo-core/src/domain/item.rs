//! Item Entity
//!
//! A single to-do entry owned by one identity.

use serde::{Deserialize, Serialize};

use super::identity::UserId;

/// Store-assigned document id
pub type ItemId = String;

/// A to-do entry as stored in the `todos` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Document id assigned by the store
    pub id: ItemId,
    /// Id of the identity that created the item
    pub owner: UserId,
    pub content: String,
    pub completed: bool,
}

/// Fields written when an item is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub owner: UserId,
    pub content: String,
    pub completed: bool,
}

impl NewItem {
    /// New items always start incomplete
    pub fn new(owner: UserId, content: impl Into<String>) -> Self {
        Self {
            owner,
            content: content.into(),
            completed: false,
        }
    }

    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            owner: self.owner,
            content: self.content,
            completed: self.completed,
        }
    }
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl ItemPatch {
    pub fn completed(value: bool) -> Self {
        Self {
            completed: Some(value),
            ..Default::default()
        }
    }

    pub fn content(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.completed.is_none()
    }

    /// Names of the fields this patch writes, in a stable order
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::new();
        if self.content.is_some() {
            paths.push("content");
        }
        if self.completed.is_some() {
            paths.push("completed");
        }
        paths
    }

    pub fn apply(&self, item: &mut Item) {
        if let Some(content) = &self.content {
            item.content = content.clone();
        }
        if let Some(completed) = self.completed {
            item.completed = completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_starts_incomplete() {
        let item = NewItem::new(UserId::new("u1"), "Buy milk").into_item("doc-1".into());
        assert_eq!(item.owner.as_str(), "u1");
        assert_eq!(item.content, "Buy milk");
        assert!(!item.completed);
    }

    #[test]
    fn patch_only_touches_set_fields() {
        let mut item = NewItem::new(UserId::new("u1"), "Buy milk").into_item("doc-1".into());

        ItemPatch::completed(true).apply(&mut item);
        assert!(item.completed);
        assert_eq!(item.content, "Buy milk");

        ItemPatch::content("Buy oat milk").apply(&mut item);
        assert_eq!(item.content, "Buy oat milk");
        assert!(item.completed);
    }

    #[test]
    fn field_paths_follow_set_fields() {
        assert!(ItemPatch::default().is_empty());
        assert_eq!(ItemPatch::completed(false).field_paths(), vec!["completed"]);
        let both = ItemPatch {
            content: Some("x".into()),
            completed: Some(true),
        };
        assert_eq!(both.field_paths(), vec!["content", "completed"]);
    }
}
