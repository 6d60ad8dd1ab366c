//! Blog request handlers.
//!
//! Each handler runs the same pipeline: the gate mints a [`Permit`] or the
//! visitor is turned away, submitted fields are validated and rich text is
//! sanitized, and only then does the store see the write.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::audit::{self, AuditEvent, AuditOutcome, AuditTrail};
use crate::capability::Permit;
use crate::config::Config;
use crate::error::{Error, Violation};
use crate::gate::{DenyReason, PolicyGate};
use crate::logging::RequestLog;
use crate::model::{CommentId, NewComment, PostId};
use crate::policy::Action;
use crate::sanitizer::HtmlSanitizer;
use crate::store::{BlogStore, StoreError, StoreErrorKind};

use super::outcome::{Notice, Outcome, Route, View, ADMIN_ONLY_NOTICE, LOGIN_TO_COMMENT_NOTICE};
use super::{ExtractTaintedInputs, Method, RequestAdapter};

/// Notice for a post title that is already in use.
pub const DUPLICATE_TITLE_NOTICE: &str = "A post with that title already exists";

/// The blog: gate, sanitizer and store wired together.
///
/// # Examples
///
/// ```
/// use blog_policy::web::{Blog, Method, Outcome, RequestAdapter, Route};
/// use blog_policy::{MemoryStore, Principal};
///
/// let blog = Blog::new(MemoryStore::new());
/// let admin = blog.store().add_user("Admin", "admin@example.com").unwrap();
///
/// let mut req = RequestAdapter::new("req-1", Method::Post, "/post/new");
/// req.set_principal(Principal::user(admin));
/// req.add_form_field("title", "Hello");
/// req.add_form_field("body", "<p>Hi <script>x()</script></p>");
///
/// let today = chrono::NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// assert_eq!(blog.create_post(&req, today), Outcome::redirect(Route::Index));
/// ```
#[derive(Debug)]
pub struct Blog<S> {
    gate: PolicyGate,
    sanitizer: HtmlSanitizer,
    store: S,
    trail: Option<Arc<AuditTrail>>,
}

impl<S: BlogStore> Blog<S> {
    /// Wires `store` to the default gate (administrator `1`).
    pub fn new(store: S) -> Self {
        Self {
            gate: PolicyGate::default(),
            sanitizer: HtmlSanitizer::new(),
            store,
            trail: None,
        }
    }

    /// Wires `store` to the gate described by `config`.
    pub fn from_config(config: &Config, store: S) -> Self {
        Self::new(store).with_gate(config.gate())
    }

    /// Replaces the gate.
    pub fn with_gate(mut self, gate: PolicyGate) -> Self {
        self.gate = gate;
        self
    }

    /// Records every gate decision to `trail` as well as the log.
    pub fn with_audit_trail(mut self, trail: Arc<AuditTrail>) -> Self {
        self.trail = Some(trail);
        self
    }

    /// The storage collaborator.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The gate.
    pub fn gate(&self) -> &PolicyGate {
        &self.gate
    }

    /// `GET /`: every post.
    pub fn index(&self, req: &RequestAdapter) -> Outcome {
        self.handle(req, Action::Browse, None, |_| {
            Ok(Outcome::Render(View::Index {
                posts: self.store.list_posts(),
            }))
        })
    }

    /// `/post/<id>`: shows the post on `GET`, adds a comment on `POST`.
    pub fn post_detail(&self, req: &RequestAdapter, id: PostId) -> Outcome {
        if req.method() == Method::Post {
            return self.add_comment(req, id);
        }
        self.handle(req, Action::Browse, Some(post_resource(id)), |_| {
            let post = self.store.post(id).ok_or_else(|| StoreError::missing_post(id))?;
            let comments = self.store.comments_for_post(id);
            Ok(Outcome::Render(View::PostDetail { post, comments }))
        })
    }

    /// Adds the submitted `body` field as a comment under `post_id`.
    ///
    /// Anonymous visitors are sent to the login page with
    /// [`LOGIN_TO_COMMENT_NOTICE`].
    pub fn add_comment(&self, req: &RequestAdapter, post_id: PostId) -> Outcome {
        self.handle(req, Action::CommentOnPost, Some(post_resource(post_id)), |permit| {
            let text = req.extract_tainted_inputs().field("body");
            let comment = match NewComment::verify(post_id, text, &self.sanitizer) {
                Ok(comment) => comment,
                Err(err) => {
                    return Ok(Outcome::redirect_with(
                        Route::PostDetail(post_id),
                        notice_for(&Error::from(err)),
                    ))
                }
            };
            let id = self.store.insert_comment(&permit, comment)?;
            RequestLog::new(req.request_id())
                .info(format_args!("comment {} added to post {}", id, post_id));
            Ok(Outcome::redirect(Route::PostDetail(post_id)))
        })
    }

    /// `/post/new`: the form on `GET`, stores the post on `POST`.
    pub fn create_post(&self, req: &RequestAdapter, today: NaiveDate) -> Outcome {
        self.handle(req, Action::CreatePost, None, |permit| match req.method() {
            Method::Get => Ok(Outcome::Render(View::PostForm { notice: None })),
            Method::Post => {
                let saved = req
                    .extract_tainted_inputs()
                    .post_form()
                    .verify(&self.sanitizer)
                    .map_err(Error::from)
                    .and_then(|draft| Ok(self.store.insert_post(&permit, draft, today)?));
                match saved {
                    Ok(id) => {
                        RequestLog::new(req.request_id()).info(format_args!("post {} created", id));
                        Ok(Outcome::redirect(Route::Index))
                    }
                    Err(err) if rejects_form(&err) => Ok(Outcome::Render(View::PostForm {
                        notice: Some(notice_for(&err)),
                    })),
                    Err(err) => Err(err),
                }
            }
        })
    }

    /// `/edit-post/<id>`: the pre-filled form on `GET`, saves on `POST`.
    ///
    /// The body is sanitized again on every save.
    pub fn edit_post(&self, req: &RequestAdapter, id: PostId) -> Outcome {
        self.handle(req, Action::EditPost, Some(post_resource(id)), |permit| {
            let post = self.store.post(id).ok_or_else(|| StoreError::missing_post(id))?;
            match req.method() {
                Method::Get => Ok(Outcome::Render(View::EditPostForm { post, notice: None })),
                Method::Post => {
                    let saved = req
                        .extract_tainted_inputs()
                        .post_form()
                        .verify(&self.sanitizer)
                        .map_err(Error::from)
                        .and_then(|draft| Ok(self.store.update_post(&permit, id, draft)?));
                    match saved {
                        Ok(()) => {
                            RequestLog::new(req.request_id()).info(format_args!("post {} updated", id));
                            Ok(Outcome::redirect(Route::PostDetail(id)))
                        }
                        Err(err) if rejects_form(&err) => Ok(Outcome::Render(View::EditPostForm {
                            post,
                            notice: Some(notice_for(&err)),
                        })),
                        Err(err) => Err(err),
                    }
                }
            }
        })
    }

    /// `/delete/post/<id>`: confirmation on `GET`, deletes on `POST`.
    pub fn delete_post(&self, req: &RequestAdapter, id: PostId) -> Outcome {
        self.handle(req, Action::DeletePost, Some(post_resource(id)), |permit| match req.method() {
            Method::Get => {
                let post = self.store.post(id).ok_or_else(|| StoreError::missing_post(id))?;
                Ok(Outcome::Render(View::ConfirmDeletePost { post_id: post.id }))
            }
            Method::Post => {
                self.store.delete_post(&permit, id)?;
                RequestLog::new(req.request_id()).info(format_args!("post {} deleted", id));
                Ok(Outcome::redirect(Route::Index))
            }
        })
    }

    /// `/delete/comment/<id>`: confirmation on `GET`, deletes on `POST` and
    /// returns to the parent post.
    ///
    /// Any signed-in user may delete any comment.
    pub fn delete_comment(&self, req: &RequestAdapter, id: CommentId) -> Outcome {
        self.handle(req, Action::DeleteComment, Some(comment_resource(id)), |permit| match req.method() {
            Method::Get => {
                let comment = self
                    .store
                    .comment(id)
                    .ok_or_else(|| StoreError::missing_comment(id))?;
                Ok(Outcome::Render(View::ConfirmDeleteComment {
                    comment_id: id,
                    post_id: comment.post_id,
                }))
            }
            Method::Post => {
                let post_id = self.store.delete_comment(&permit, id)?;
                RequestLog::new(req.request_id()).info(format_args!("comment {} deleted", id));
                Ok(Outcome::redirect(Route::PostDetail(post_id)))
            }
        })
    }

    fn handle<F>(&self, req: &RequestAdapter, action: Action, resource: Option<String>, run: F) -> Outcome
    where
        F: FnOnce(Permit) -> Result<Outcome, Error>,
    {
        let log = RequestLog::new(req.request_id());
        let permit = match self.gate.permit(req.principal(), action) {
            Ok(permit) => permit,
            Err(violation) => {
                log.info(format_args!("{} refused: {}", action, violation));
                self.audit(req, action, AuditOutcome::Denied(violation.reason()), resource);
                return denied(req, &violation);
            }
        };
        self.audit(req, action, AuditOutcome::Allowed, resource.clone());

        match run(permit) {
            Ok(outcome) => outcome,
            Err(err) => {
                log.warn(format_args!("{} failed: {}", action, err));
                self.audit(req, action, AuditOutcome::Failed, resource);
                Outcome::redirect_with(Route::Index, notice_for(&err))
            }
        }
    }

    fn audit(&self, req: &RequestAdapter, action: Action, outcome: AuditOutcome, resource: Option<String>) {
        let mut event = AuditEvent::new(req.request_id(), req.principal().id, action, outcome);
        if let Some(resource) = resource {
            event = event.with_resource(resource);
        }
        audit::emit(event, self.trail.as_deref());
    }
}

fn denied(req: &RequestAdapter, violation: &Violation) -> Outcome {
    match (violation.reason(), violation.action()) {
        (DenyReason::AuthenticationRequired, Action::CommentOnPost) => Outcome::redirect_with(
            Route::Login { next: None },
            Notice::error(LOGIN_TO_COMMENT_NOTICE),
        ),
        (DenyReason::AuthenticationRequired, _) => Outcome::redirect(Route::Login {
            next: Some(req.url().to_string()),
        }),
        (DenyReason::AdministratorOnly, _) => {
            Outcome::redirect_with(Route::Index, Notice::error(ADMIN_ONLY_NOTICE))
        }
    }
}

// Errors the visitor can fix by resubmitting the form.
fn rejects_form(err: &Error) -> bool {
    match err {
        Error::Validation(_) => true,
        Error::Store(e) => e.kind() == StoreErrorKind::DuplicateTitle,
        _ => false,
    }
}

fn notice_for(err: &Error) -> Notice {
    match err {
        Error::Validation(e) => Notice::error(format!("{}: {}", e.field(), e.message())),
        Error::Store(e) if e.kind() == StoreErrorKind::DuplicateTitle => {
            Notice::error(DUPLICATE_TITLE_NOTICE)
        }
        Error::Store(e) => Notice::error(e.message().unwrap_or("not found").to_string()),
        other => Notice::error(other.to_string()),
    }
}

fn post_resource(id: PostId) -> String {
    format!("post:{}", id)
}

fn comment_resource(id: CommentId) -> String {
    format!("comment:{}", id)
}
