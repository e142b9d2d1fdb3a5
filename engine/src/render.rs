//! Builds the document tree for posts and comments.
//!
//! The entry point is [`post_fragment`]: given the posts for one user, it
//! fetches each post's author and comments, then assembles one
//! [`RenderedPost`] per input post. Fetches for different posts run
//! concurrently, but assembly commits strictly in input order, so the
//! rendered output always matches the order of the post list. Any fetch
//! failure aborts the whole render; no partially-built post survives.

use bulletin_api::{ApiClient, ApiError};
use bulletin_types::{Comment, CommentVisibility, Fragment, Node, Post, PostId, Tag, User};
use futures_util::future::try_join_all;

/// Shown while no post data has been requested yet.
pub const PLACEHOLDER_TEXT: &str = "Select an Employee to display their posts.";

/// Class carried by the placeholder node.
pub const PLACEHOLDER_CLASS: &str = "default-text";

/// Class carried by every comment section node.
pub const COMMENTS_CLASS: &str = "comments";

/// One post's render record.
///
/// The comment toggle label and the section's hidden state both derive
/// from [`CommentVisibility`], so they flip in lockstep and cannot desync.
#[derive(Debug, Clone)]
pub struct RenderedPost {
    pub id: PostId,
    /// Title, body, post-id line, author attribution, catchphrase.
    pub body: Fragment,
    /// The comment section: tagged with the post id, children are one
    /// article per comment.
    pub section: Node,
    pub visibility: CommentVisibility,
}

impl RenderedPost {
    #[must_use]
    pub fn button_label(&self) -> &'static str {
        self.visibility.button_label()
    }

    #[must_use]
    pub fn comments_hidden(&self) -> bool {
        self.visibility.is_hidden()
    }
}

/// The placeholder node for a page where no posts were requested at all.
#[must_use]
pub fn placeholder() -> Node {
    Node::element(None, Some(PLACEHOLDER_TEXT), Some(PLACEHOLDER_CLASS))
}

/// Map comment records to one article node each: author-name heading,
/// body, then a "From: {email}" line. Absent input yields an absent result.
#[must_use]
pub fn comment_fragment(comments: Option<&[Comment]>) -> Option<Fragment> {
    let comments = comments?;
    Some(
        comments
            .iter()
            .map(|comment| {
                Node::element(Some(Tag::Article), None, None).with_children(vec![
                    Node::element(Some(Tag::Subheading), Some(&comment.name), None),
                    Node::element(None, Some(&comment.body), None),
                    Node::element(None, Some(&format!("From: {}", comment.email)), None),
                ])
            })
            .collect(),
    )
}

/// Fetch a post's comments and wrap them in a section node tagged with the
/// post id. Absent id: absent result, no fetch.
pub async fn comment_section(
    api: &ApiClient,
    post_id: Option<PostId>,
) -> Result<Option<Node>, ApiError> {
    let Some(post_id) = post_id else {
        return Ok(None);
    };
    let comments = api.post_comments(Some(post_id)).await?;
    let children = comment_fragment(comments.as_deref()).unwrap_or_default();
    Ok(Some(
        Node::element(Some(Tag::Section), None, Some(COMMENTS_CLASS))
            .with_post_id(post_id)
            .with_children(children.into_nodes()),
    ))
}

/// Render the given posts. Absent input yields an absent result.
///
/// Author and comment fetches for different posts run concurrently; the
/// results are committed in input order.
pub async fn post_fragment(
    api: &ApiClient,
    posts: Option<&[Post]>,
) -> Result<Option<Vec<RenderedPost>>, ApiError> {
    let Some(posts) = posts else {
        return Ok(None);
    };

    let parts = try_join_all(posts.iter().map(|post| fetch_post_parts(api, post))).await?;

    let rendered = posts
        .iter()
        .zip(parts)
        .map(|(post, (author, section))| assemble_post(post, author.as_ref(), section))
        .collect();
    Ok(Some(rendered))
}

async fn fetch_post_parts(
    api: &ApiClient,
    post: &Post,
) -> Result<(Option<User>, Option<Node>), ApiError> {
    let author = api.user(Some(post.user_id)).await?;
    let section = comment_section(api, Some(post.id)).await?;
    Ok((author, section))
}

fn assemble_post(post: &Post, author: Option<&User>, section: Option<Node>) -> RenderedPost {
    let mut body = Fragment::new();
    body.push(Node::element(Some(Tag::Heading), Some(&post.title), None));
    body.push(Node::element(None, Some(&post.body), None));
    body.push(Node::element(None, Some(&format!("Post ID: {}", post.id)), None));

    // Every post carries an owner id, so the author is present whenever the
    // fetch succeeded.
    if let Some(author) = author {
        body.push(Node::element(
            None,
            Some(&format!(
                "Author: {} with {}",
                author.name, author.company.name
            )),
            None,
        ));
        body.push(Node::element(None, Some(&author.company.catch_phrase), None));
    }

    let section = section.unwrap_or_else(|| {
        Node::element(Some(Tag::Section), None, Some(COMMENTS_CLASS)).with_post_id(post.id)
    });

    RenderedPost {
        id: post.id,
        body,
        section,
        visibility: CommentVisibility::Collapsed,
    }
}
