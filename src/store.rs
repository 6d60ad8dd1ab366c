use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::capability::Permit;
use crate::model::{Comment, CommentId, NewComment, Post, PostDraft, PostId, User};
use crate::policy::Action;
use crate::request::UserId;

/// Error returned when the storage collaborator refuses an operation.
///
/// # Examples
///
/// ```
/// use blog_policy::{StoreError, StoreErrorKind};
///
/// let error = StoreError::new(StoreErrorKind::DuplicateTitle);
/// assert_eq!(error.kind(), StoreErrorKind::DuplicateTitle);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    kind: StoreErrorKind,
    message: Option<String>,
}

impl StoreError {
    /// Creates a new store error with the specified kind.
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Creates a new store error with a custom message.
    pub fn with_message(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    /// Returns the error message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub(crate) fn missing_post(id: PostId) -> Self {
        Self::with_message(StoreErrorKind::NotFound, format!("post {} does not exist", id))
    }

    pub(crate) fn missing_comment(id: CommentId) -> Self {
        Self::with_message(
            StoreErrorKind::NotFound,
            format!("comment {} does not exist", id),
        )
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(msg) = &self.message {
            write!(f, "store error ({}): {}", self.kind, msg)
        } else {
            write!(f, "store error ({})", self.kind)
        }
    }
}

impl std::error::Error for StoreError {}

/// Kind of store error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The referenced row does not exist.
    NotFound,
    /// Another post already uses this title.
    DuplicateTitle,
    /// Another user already registered this email.
    DuplicateEmail,
    /// The permit was minted for a different action.
    PermitMismatch,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::DuplicateTitle => write!(f, "duplicate title"),
            Self::DuplicateEmail => write!(f, "duplicate email"),
            Self::PermitMismatch => write!(f, "permit mismatch"),
        }
    }
}

/// The storage collaborator.
///
/// Reads need nothing. Writes need a [`Permit`] minted for the matching
/// action and take only verified values, so a write cannot happen unless
/// the gate allowed it and the sanitizer ran.
pub trait BlogStore {
    /// Looks up a user.
    fn user(&self, id: UserId) -> Option<User>;

    /// All posts, oldest first.
    fn list_posts(&self) -> Vec<Post>;

    /// Looks up a post.
    fn post(&self, id: PostId) -> Option<Post>;

    /// Looks up a comment.
    fn comment(&self, id: CommentId) -> Option<Comment>;

    /// The comments under a post, oldest first.
    fn comments_for_post(&self, id: PostId) -> Vec<Comment>;

    /// Stores a new post authored by the permit holder.
    ///
    /// # Errors
    ///
    /// `PermitMismatch` for a permit not minted for [`Action::CreatePost`],
    /// `DuplicateTitle` if the title is taken.
    fn insert_post(
        &self,
        permit: &Permit,
        draft: PostDraft,
        date: NaiveDate,
    ) -> Result<PostId, StoreError>;

    /// Replaces title, subtitle, body and image of a post. Author and date
    /// are kept.
    ///
    /// # Errors
    ///
    /// `PermitMismatch`, `NotFound`, or `DuplicateTitle` if another post
    /// already uses the new title.
    fn update_post(&self, permit: &Permit, id: PostId, draft: PostDraft) -> Result<(), StoreError>;

    /// Permanently removes a post and its comments.
    ///
    /// # Errors
    ///
    /// `PermitMismatch` or `NotFound`.
    fn delete_post(&self, permit: &Permit, id: PostId) -> Result<(), StoreError>;

    /// Stores a comment authored by the permit holder.
    ///
    /// # Errors
    ///
    /// `PermitMismatch`, or `NotFound` if the parent post does not exist.
    fn insert_comment(&self, permit: &Permit, comment: NewComment) -> Result<CommentId, StoreError>;

    /// Permanently removes a comment and returns its parent post.
    ///
    /// # Errors
    ///
    /// `PermitMismatch` or `NotFound`.
    fn delete_comment(&self, permit: &Permit, id: CommentId) -> Result<PostId, StoreError>;
}

fn require(permit: &Permit, action: Action) -> Result<UserId, StoreError> {
    if !permit.allows(action) {
        return Err(StoreError::with_message(
            StoreErrorKind::PermitMismatch,
            format!("permit for '{}' used for '{}'", permit.action(), action),
        ));
    }
    permit.user().ok_or_else(|| {
        StoreError::with_message(StoreErrorKind::PermitMismatch, "permit has no user")
    })
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    next_user: i64,
    next_post: i64,
    next_comment: i64,
}

impl Tables {
    fn title_taken(&self, title: &str, except: Option<PostId>) -> bool {
        self.posts
            .values()
            .any(|p| p.title == title && Some(p.id) != except)
    }
}

/// In-memory [`BlogStore`] with the constraints of the relational schema:
/// unique post titles, comments tied to existing posts.
///
/// Ids start at 1 and are never reused, so the first registered user is the
/// administrator.
///
/// # Examples
///
/// ```
/// use blog_policy::{BlogStore, MemoryStore, UserId};
///
/// let store = MemoryStore::new();
/// let admin = store.add_user("Admin", "admin@example.com").unwrap();
/// assert_eq!(admin, UserId(1));
/// assert!(store.list_posts().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user. Registration itself belongs to the session layer;
    /// this only seeds the `users` table.
    ///
    /// Emails are unique: a second registration with the same address fails
    /// with [`StoreErrorKind::DuplicateEmail`].
    pub fn add_user(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<UserId, StoreError> {
        let email = email.into();
        let mut tables = self.tables.lock();
        if tables.users.values().any(|u| u.email == email) {
            return Err(StoreError::with_message(
                StoreErrorKind::DuplicateEmail,
                "A user with that email already exists",
            ));
        }

        tables.next_user += 1;
        let id = UserId(tables.next_user);
        tables.users.insert(
            id,
            User {
                id,
                name: name.into(),
                email,
            },
        );
        Ok(id)
    }

    /// Number of stored comments across all posts.
    pub fn comment_count(&self) -> usize {
        self.tables.lock().comments.len()
    }
}

impl BlogStore for MemoryStore {
    fn user(&self, id: UserId) -> Option<User> {
        self.tables.lock().users.get(&id).cloned()
    }

    fn list_posts(&self) -> Vec<Post> {
        self.tables.lock().posts.values().cloned().collect()
    }

    fn post(&self, id: PostId) -> Option<Post> {
        self.tables.lock().posts.get(&id).cloned()
    }

    fn comment(&self, id: CommentId) -> Option<Comment> {
        self.tables.lock().comments.get(&id).cloned()
    }

    fn comments_for_post(&self, id: PostId) -> Vec<Comment> {
        self.tables
            .lock()
            .comments
            .values()
            .filter(|c| c.post_id == id)
            .cloned()
            .collect()
    }

    fn insert_post(
        &self,
        permit: &Permit,
        draft: PostDraft,
        date: NaiveDate,
    ) -> Result<PostId, StoreError> {
        let author_id = require(permit, Action::CreatePost)?;
        let mut tables = self.tables.lock();

        if tables.title_taken(draft.title.as_ref(), None) {
            return Err(StoreError::new(StoreErrorKind::DuplicateTitle));
        }

        tables.next_post += 1;
        let id = PostId(tables.next_post);
        tables.posts.insert(
            id,
            Post {
                id,
                author_id,
                title: draft.title.into_inner(),
                subtitle: draft.subtitle.map(|s| s.into_inner()),
                body: draft.body.into_inner(),
                img_url: draft.img_url.map(|s| s.into_inner()),
                date,
            },
        );
        Ok(id)
    }

    fn update_post(&self, permit: &Permit, id: PostId, draft: PostDraft) -> Result<(), StoreError> {
        require(permit, Action::EditPost)?;
        let mut tables = self.tables.lock();

        if !tables.posts.contains_key(&id) {
            return Err(StoreError::missing_post(id));
        }
        if tables.title_taken(draft.title.as_ref(), Some(id)) {
            return Err(StoreError::new(StoreErrorKind::DuplicateTitle));
        }

        if let Some(post) = tables.posts.get_mut(&id) {
            post.title = draft.title.into_inner();
            post.subtitle = draft.subtitle.map(|s| s.into_inner());
            post.body = draft.body.into_inner();
            post.img_url = draft.img_url.map(|s| s.into_inner());
        }
        Ok(())
    }

    fn delete_post(&self, permit: &Permit, id: PostId) -> Result<(), StoreError> {
        require(permit, Action::DeletePost)?;
        let mut tables = self.tables.lock();

        if tables.posts.remove(&id).is_none() {
            return Err(StoreError::missing_post(id));
        }
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }

    fn insert_comment(&self, permit: &Permit, comment: NewComment) -> Result<CommentId, StoreError> {
        let author_id = require(permit, Action::CommentOnPost)?;
        let mut tables = self.tables.lock();

        if !tables.posts.contains_key(&comment.post_id) {
            return Err(StoreError::missing_post(comment.post_id));
        }

        tables.next_comment += 1;
        let id = CommentId(tables.next_comment);
        tables.comments.insert(
            id,
            Comment {
                id,
                author_id,
                post_id: comment.post_id,
                text: comment.text.into_inner(),
            },
        );
        Ok(id)
    }

    fn delete_comment(&self, permit: &Permit, id: CommentId) -> Result<PostId, StoreError> {
        require(permit, Action::DeleteComment)?;
        self.tables
            .lock()
            .comments
            .remove(&id)
            .map(|c| c.post_id)
            .ok_or_else(|| StoreError::missing_comment(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PostForm;
    use crate::{HtmlSanitizer, PolicyGate, Principal, Tainted};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn draft(title: &str) -> PostDraft {
        PostForm {
            title: Tainted::new(title.to_string()),
            subtitle: Tainted::new(String::new()),
            body: Tainted::new("<p>body</p>".to_string()),
            img_url: Tainted::new(String::new()),
        }
        .verify(&HtmlSanitizer::new())
        .unwrap()
    }

    fn permit(user: UserId, action: Action) -> Permit {
        PolicyGate::default()
            .permit(&Principal::user(user), action)
            .unwrap()
    }

    fn seeded() -> (MemoryStore, UserId, UserId) {
        let store = MemoryStore::new();
        let admin = store.add_user("Admin", "admin@example.com").unwrap();
        let reader = store.add_user("Reader", "reader@example.com").unwrap();
        (store, admin, reader)
    }

    #[test]
    fn insert_post_records_author_and_date() {
        let (store, admin, _) = seeded();
        let id = store
            .insert_post(&permit(admin, Action::CreatePost), draft("Hello"), day())
            .unwrap();

        let post = store.post(id).unwrap();
        assert_eq!(post.author_id, admin);
        assert_eq!(post.title, "Hello");
        assert_eq!(post.date, day());
        assert_eq!(store.list_posts().len(), 1);
    }

    #[test]
    fn duplicate_titles_are_rejected() {
        let (store, admin, _) = seeded();
        let p = permit(admin, Action::CreatePost);
        store.insert_post(&p, draft("Same"), day()).unwrap();

        let err = store.insert_post(&p, draft("Same"), day()).unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::DuplicateTitle);
        assert_eq!(store.list_posts().len(), 1);
    }

    #[test]
    fn update_keeps_own_title_but_rejects_others() {
        let (store, admin, _) = seeded();
        let create = permit(admin, Action::CreatePost);
        let first = store.insert_post(&create, draft("One"), day()).unwrap();
        store.insert_post(&create, draft("Two"), day()).unwrap();

        let edit = permit(admin, Action::EditPost);
        store.update_post(&edit, first, draft("One")).unwrap();

        let err = store.update_post(&edit, first, draft("Two")).unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::DuplicateTitle);
    }

    #[test]
    fn permit_for_wrong_action_is_refused() {
        let (store, admin, _) = seeded();
        let err = store
            .insert_post(&permit(admin, Action::DeletePost), draft("x"), day())
            .unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::PermitMismatch);
    }

    #[test]
    fn delete_post_cascades_to_comments() {
        let (store, admin, reader) = seeded();
        let post = store
            .insert_post(&permit(admin, Action::CreatePost), draft("P"), day())
            .unwrap();
        let comment = NewComment::verify(
            post,
            Tainted::new("hi".to_string()),
            &HtmlSanitizer::new(),
        )
        .unwrap();
        store
            .insert_comment(&permit(reader, Action::CommentOnPost), comment)
            .unwrap();
        assert_eq!(store.comment_count(), 1);

        store
            .delete_post(&permit(admin, Action::DeletePost), post)
            .unwrap();
        assert!(store.post(post).is_none());
        assert_eq!(store.comment_count(), 0);
    }

    #[test]
    fn comment_on_missing_post_is_not_found() {
        let (store, _, reader) = seeded();
        let comment = NewComment::verify(
            PostId(99),
            Tainted::new("hi".to_string()),
            &HtmlSanitizer::new(),
        )
        .unwrap();
        let err = store
            .insert_comment(&permit(reader, Action::CommentOnPost), comment)
            .unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::NotFound);
    }

    #[test]
    fn delete_comment_returns_parent_post() {
        let (store, admin, reader) = seeded();
        let post = store
            .insert_post(&permit(admin, Action::CreatePost), draft("P"), day())
            .unwrap();
        let comment = NewComment::verify(post, Tainted::new("hi".to_string()), &HtmlSanitizer::new())
            .unwrap();
        let id = store
            .insert_comment(&permit(reader, Action::CommentOnPost), comment)
            .unwrap();

        let parent = store
            .delete_comment(&permit(reader, Action::DeleteComment), id)
            .unwrap();
        assert_eq!(parent, post);

        let err = store
            .delete_comment(&permit(reader, Action::DeleteComment), id)
            .unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::NotFound);
    }

    #[test]
    fn comments_are_scoped_to_their_post() {
        let (store, admin, reader) = seeded();
        let create = permit(admin, Action::CreatePost);
        let a = store.insert_post(&create, draft("A"), day()).unwrap();
        let b = store.insert_post(&create, draft("B"), day()).unwrap();

        let comment = NewComment::verify(a, Tainted::new("on a".to_string()), &HtmlSanitizer::new())
            .unwrap();
        store
            .insert_comment(&permit(reader, Action::CommentOnPost), comment)
            .unwrap();

        assert_eq!(store.comments_for_post(a).len(), 1);
        assert!(store.comments_for_post(b).is_empty());
    }

    #[test]
    fn users_are_numbered_from_one() {
        let (store, admin, reader) = seeded();
        assert_eq!(admin, UserId(1));
        assert_eq!(reader, UserId(2));
        assert_eq!(store.user(reader).unwrap().name, "Reader");
    }

    #[test]
    fn duplicate_email_is_refused() {
        let (store, _, _) = seeded();

        let err = store.add_user("Impostor", "admin@example.com").unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::DuplicateEmail);
        assert_eq!(err.message(), Some("A user with that email already exists"));
        assert!(store.user(UserId(3)).is_none());

        // The refused registration does not use up an id
        let next = store.add_user("Third", "third@example.com").unwrap();
        assert_eq!(next, UserId(3));
    }
}
