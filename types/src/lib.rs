//! Core domain types for bulletin.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the
//! application: the records decoded from the blog API, the id newtypes the
//! rest of the workspace treats opaquely, the document tree handed to the
//! renderer, and the selector entries derived from users.

mod document;
mod ids;
mod records;

pub use document::{CommentVisibility, Fragment, Node, Tag};
pub use ids::{CommentId, PostId, UserId};
pub use records::{Comment, Company, Post, User};

/// One selectable entry in the user selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: UserId,
    pub label: String,
}

/// Map user records to selector entries, order preserved.
///
/// Absent input yields an absent result: "no data yet" is distinct from
/// "zero users", which maps to an empty list.
#[must_use]
pub fn select_options(users: Option<&[User]>) -> Option<Vec<SelectOption>> {
    let users = users?;
    Some(
        users
            .iter()
            .map(|user| SelectOption {
                value: user.id,
                label: user.name.clone(),
            })
            .collect(),
    )
}
