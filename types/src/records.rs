//! Externally-sourced records, decoded verbatim from the blog API.
//!
//! These are transient: fetched, rendered once, and discarded on the next
//! refresh. Nothing here is mutated locally or persisted.

use serde::{Deserialize, Serialize};

use crate::ids::{CommentId, PostId, UserId};

/// A user record, including the nested company used for author attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub company: Company,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(rename = "catchPhrase")]
    pub catch_phrase: String,
}

/// A post owned by a user. Fetched fresh on each selection, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub title: String,
    pub body: String,
}

/// A comment on a post. `name` is the comment author's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    #[serde(rename = "postId")]
    pub post_id: PostId,
    pub name: String,
    pub email: String,
    pub body: String,
}
