//! Page state machine and orchestration for bulletin.
//!
//! [`App`] owns the page: the user selector, the rendered post content,
//! and the fetch lifecycle. Fetches run on spawned tasks and report back
//! as [`PageEvent`]s over an mpsc channel; the frame loop drains them via
//! [`App::process_events`] between renders, so all state mutation happens
//! on the UI thread.
//!
//! # State machine
//!
//! ```text
//! Uninitialized -> LoadingUsers -> Idle(selected: None)
//!                                     |  selection
//!                                     v
//!                              LoadingPosts(user) -> Idle(selected: user)
//!                                     ^                  | re-selection
//!                                     +------------------+
//! ```
//!
//! A selection disables the selector and starts a refresh; a successful
//! refresh clears the previous content, commits the new articles, and
//! re-enables the selector. A failed refresh logs the error and leaves the
//! selector disabled. Known limitation: there is no re-enable path after a
//! failure, so the selector stays dead until restart.

pub mod render;
pub mod toggle;

use tokio::sync::mpsc;

use bulletin_api::ApiClient;
use bulletin_types::{PostId, SelectOption, User, UserId, select_options};

pub use bulletin_types;
pub use render::{PLACEHOLDER_TEXT, RenderedPost, placeholder};
pub use toggle::ToggleOutcome;

/// Used when a selection fires while the selector has no value.
pub const FALLBACK_USER_ID: UserId = UserId::new(1);

/// Where the page is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Uninitialized,
    LoadingUsers,
    Idle { selected: Option<UserId> },
    LoadingPosts { selected: UserId },
}

impl PageState {
    #[must_use]
    pub fn is_loading(self) -> bool {
        matches!(self, Self::LoadingUsers | Self::LoadingPosts { .. })
    }
}

/// Which pane owns keyboard input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pane {
    #[default]
    Selector,
    Posts,
}

impl Pane {
    #[must_use]
    pub fn cycled(self) -> Self {
        match self {
            Self::Selector => Self::Posts,
            Self::Posts => Self::Selector,
        }
    }
}

/// Completion events from spawned fetch tasks.
#[derive(Debug)]
pub enum PageEvent {
    UsersLoaded(Vec<User>),
    UsersFailed(String),
    PostsLoaded {
        user: UserId,
        posts: Vec<RenderedPost>,
    },
    PostsFailed {
        user: UserId,
        error: String,
    },
}

/// The page controller.
pub struct App {
    api: ApiClient,
    state: PageState,
    options: Vec<SelectOption>,
    cursor: usize,
    selector_disabled: bool,
    /// `None` until the first refresh commits; a committed empty list is a
    /// successful refresh with zero posts, not "no data yet".
    content: Option<Vec<RenderedPost>>,
    focused_post: usize,
    focus: Pane,
    last_error: Option<String>,
    events_tx: mpsc::UnboundedSender<PageEvent>,
    events_rx: mpsc::UnboundedReceiver<PageEvent>,
}

impl App {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            state: PageState::Uninitialized,
            options: Vec::new(),
            cursor: 0,
            selector_disabled: false,
            content: None,
            focused_post: 0,
            focus: Pane::default(),
            last_error: None,
            events_tx,
            events_rx,
        }
    }

    /// Start the initial user fetch. A no-op unless the page is fresh.
    pub fn init(&mut self) {
        if self.state != PageState::Uninitialized {
            return;
        }
        self.state = PageState::LoadingUsers;
        tracing::info!("loading users");

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = match api.users().await {
                Ok(users) => PageEvent::UsersLoaded(users),
                Err(e) => PageEvent::UsersFailed(e.to_string()),
            };
            let _ = tx.send(event);
        });
    }

    /// Drain completed fetch events. Called once per frame.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: PageEvent) {
        match event {
            PageEvent::UsersLoaded(users) => {
                self.options = select_options(Some(&users)).unwrap_or_default();
                self.state = PageState::Idle { selected: None };
                tracing::info!(count = self.options.len(), "selector populated");
            }
            PageEvent::UsersFailed(error) => {
                // Terminal: the page never leaves LoadingUsers.
                tracing::error!(%error, "user fetch failed");
                self.last_error = Some(error);
            }
            PageEvent::PostsLoaded { user, posts } => {
                tracing::info!(%user, count = posts.len(), "posts rendered");
                // Clear and commit in one step; stale content never mixes
                // with the new set.
                self.content = Some(posts);
                self.focused_post = 0;
                self.selector_disabled = false;
                self.state = PageState::Idle {
                    selected: Some(user),
                };
            }
            PageEvent::PostsFailed { user, error } => {
                // The selector stays in whatever enabled state it held
                // before the failing step; here that means disabled.
                tracing::error!(%user, %error, "post refresh failed");
                self.last_error = Some(error);
                self.state = PageState::Idle {
                    selected: Some(user),
                };
            }
        }
    }

    /// Handle a selector change: start a refresh for the option at `index`,
    /// falling back to [`FALLBACK_USER_ID`] when there is no value.
    ///
    /// Returns the user the refresh targets, or `None` when the selection
    /// was refused (selector disabled, refresh in flight, or page not
    /// ready).
    pub fn select_user(&mut self, index: Option<usize>) -> Option<UserId> {
        if self.selector_disabled || !matches!(self.state, PageState::Idle { .. }) {
            tracing::debug!("selection ignored: selector unavailable");
            return None;
        }

        let user = index
            .and_then(|i| self.options.get(i))
            .map_or(FALLBACK_USER_ID, |option| option.value);

        self.selector_disabled = true;
        self.state = PageState::LoadingPosts { selected: user };
        self.last_error = None;
        tracing::info!(%user, "loading posts");

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = async {
                let posts = api.user_posts(Some(user)).await?;
                render::post_fragment(&api, posts.as_deref()).await
            }
            .await;
            let event = match result {
                Ok(posts) => PageEvent::PostsLoaded {
                    user,
                    posts: posts.unwrap_or_default(),
                },
                Err(e) => PageEvent::PostsFailed {
                    user,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(event);
        });

        Some(user)
    }

    /// Select whichever option the cursor rests on.
    pub fn select_at_cursor(&mut self) -> Option<UserId> {
        let index = (!self.options.is_empty()).then_some(self.cursor);
        self.select_user(index)
    }

    /// Flip comment visibility for the given post id. Delegated entry
    /// point used by the content pane's key handler.
    pub fn toggle_comments(&mut self, post_id: Option<PostId>) -> Option<ToggleOutcome> {
        match self.content.as_deref_mut() {
            Some(posts) => toggle::toggle_comments(posts, post_id),
            None => {
                post_id?;
                Some(ToggleOutcome::NotFound)
            }
        }
    }

    /// Toggle the focused post's comments.
    pub fn toggle_focused_comments(&mut self) -> Option<ToggleOutcome> {
        let id = self
            .content
            .as_deref()
            .and_then(|posts| posts.get(self.focused_post))
            .map(|post| post.id);
        self.toggle_comments(id)
    }

    pub fn move_cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor + 1 < self.options.len() {
            self.cursor += 1;
        }
    }

    pub fn focus_previous_post(&mut self) {
        self.focused_post = self.focused_post.saturating_sub(1);
    }

    pub fn focus_next_post(&mut self) {
        let count = self.content.as_deref().map_or(0, <[RenderedPost]>::len);
        if self.focused_post + 1 < count {
            self.focused_post += 1;
        }
    }

    #[must_use]
    pub fn state(&self) -> PageState {
        self.state
    }

    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn selector_disabled(&self) -> bool {
        self.selector_disabled
    }

    /// Rendered posts, or `None` while no refresh has ever committed.
    #[must_use]
    pub fn content(&self) -> Option<&[RenderedPost]> {
        self.content.as_deref()
    }

    #[must_use]
    pub fn focused_post(&self) -> usize {
        self.focused_post
    }

    #[must_use]
    pub fn focus(&self) -> Pane {
        self.focus
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.cycled();
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn users_body() -> serde_json::Value {
        serde_json::json!([
            { "id": 1, "name": "A", "company": { "name": "A Co", "catchPhrase": "a" } },
            { "id": 2, "name": "B", "company": { "name": "B Co", "catchPhrase": "b" } }
        ])
    }

    async fn mount_users(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
            .mount(server)
            .await;
    }

    async fn drain_until(app: &mut App, pred: impl Fn(&App) -> bool) {
        for _ in 0..200 {
            app.process_events();
            if pred(app) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("page never reached the expected state");
    }

    async fn ready_app(server: &MockServer) -> App {
        let mut app = App::new(ApiClient::new(server.uri()));
        app.init();
        drain_until(&mut app, |app| {
            matches!(app.state(), PageState::Idle { selected: None })
        })
        .await;
        app
    }

    #[tokio::test]
    async fn init_populates_the_selector_in_order() {
        let server = MockServer::start().await;
        mount_users(&server).await;

        let app = ready_app(&server).await;
        let options = app.options();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].value, UserId::new(1));
        assert_eq!(options[0].label, "A");
        assert_eq!(options[1].value, UserId::new(2));
        assert_eq!(options[1].label, "B");
        assert!(!app.selector_disabled());
        assert!(app.content().is_none());
    }

    #[tokio::test]
    async fn failed_user_fetch_is_terminal_and_logged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut app = App::new(ApiClient::new(server.uri()));
        app.init();
        drain_until(&mut app, |app| app.last_error().is_some()).await;
        assert_eq!(app.state(), PageState::LoadingUsers);
    }

    #[tokio::test]
    async fn zero_posts_commit_as_an_empty_pane_not_the_placeholder() {
        let server = MockServer::start().await;
        mount_users(&server).await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("userId", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let mut app = ready_app(&server).await;
        app.move_cursor_down();
        let chosen = app.select_at_cursor();
        assert_eq!(chosen, Some(UserId::new(2)));
        assert!(app.selector_disabled());

        drain_until(&mut app, |app| !app.state().is_loading()).await;
        let content = app.content().expect("refresh committed");
        assert!(content.is_empty());
        assert!(!app.selector_disabled());
        assert_eq!(
            app.state(),
            PageState::Idle {
                selected: Some(UserId::new(2))
            }
        );
    }

    #[tokio::test]
    async fn empty_selection_falls_back_to_the_first_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("userId", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = App::new(ApiClient::new(server.uri()));
        app.init();
        drain_until(&mut app, |app| {
            matches!(app.state(), PageState::Idle { selected: None })
        })
        .await;

        // No options at all, so the selector has no value to offer.
        let chosen = app.select_user(None);
        assert_eq!(chosen, Some(FALLBACK_USER_ID));
        drain_until(&mut app, |app| !app.state().is_loading()).await;
        server.verify().await;
    }

    #[tokio::test]
    async fn a_failed_refresh_leaves_the_selector_disabled() {
        let server = MockServer::start().await;
        mount_users(&server).await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut app = ready_app(&server).await;
        app.select_at_cursor();
        drain_until(&mut app, |app| app.last_error().is_some()).await;

        // There is no re-enable path after a failure; the selector stays
        // disabled until restart.
        assert!(app.selector_disabled());
        assert!(app.content().is_none());
        assert_eq!(
            app.state(),
            PageState::Idle {
                selected: Some(UserId::new(1))
            }
        );
    }

    #[tokio::test]
    async fn selections_are_refused_while_a_refresh_is_in_flight() {
        let server = MockServer::start().await;
        mount_users(&server).await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let mut app = ready_app(&server).await;
        assert!(app.select_at_cursor().is_some());
        // Second change lands while the first refresh is still in flight.
        assert!(app.select_at_cursor().is_none());

        drain_until(&mut app, |app| !app.state().is_loading()).await;
        assert!(app.content().is_some());
    }

    #[tokio::test]
    async fn toggling_without_content_reports_not_found() {
        let server = MockServer::start().await;
        mount_users(&server).await;

        let mut app = ready_app(&server).await;
        assert_eq!(app.toggle_comments(None), None);
        assert_eq!(
            app.toggle_comments(Some(PostId::new(1))),
            Some(ToggleOutcome::NotFound)
        );
    }
}
