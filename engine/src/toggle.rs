//! Comment toggle controller.
//!
//! A single delegated handler resolves the target post at interaction time,
//! so there are no per-post listeners to attach or detach across refreshes.

use bulletin_types::{CommentVisibility, PostId};

use crate::render::RenderedPost;

/// Result of a toggle attempt with a present post id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The post's comments flipped to this visibility.
    Toggled(CommentVisibility),
    /// No rendered post carries the given id. Nothing was changed.
    NotFound,
}

/// Flip the comment visibility of the post with the given id.
///
/// Absent id: absent result (input-validation failure, distinct from the
/// lookup miss reported as [`ToggleOutcome::NotFound`]). The toggle label
/// and section visibility both derive from the flipped enum, so they
/// change together by construction.
pub fn toggle_comments(
    posts: &mut [RenderedPost],
    post_id: Option<PostId>,
) -> Option<ToggleOutcome> {
    let post_id = post_id?;
    let Some(post) = posts.iter_mut().find(|post| post.id == post_id) else {
        return Some(ToggleOutcome::NotFound);
    };
    post.visibility = post.visibility.toggled();
    Some(ToggleOutcome::Toggled(post.visibility))
}
