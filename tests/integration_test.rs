use std::sync::Arc;

use blog_policy::audit::{AuditOutcome, AuditTrail};
use blog_policy::{
    BlogStore, Config, DenyReason, HtmlSanitizer, MemoryStore, NewComment, PolicyGate, PostForm,
    Principal, Sanitizer, Secret, StoreErrorKind, Tainted, UserId,
};
use chrono::NaiveDate;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn form(title: &str, body: &str) -> PostForm {
    PostForm {
        title: Tainted::new(title.to_string()),
        subtitle: Tainted::new("A subtitle".to_string()),
        body: Tainted::new(body.to_string()),
        img_url: Tainted::new(String::new()),
    }
}

#[test]
fn secret_is_fully_redacted() {
    let key = Secret::new("signing-key-123".to_string());

    let debug_out = format!("{:?}", key);
    assert_eq!(debug_out, "[REDACTED]");
    assert!(!debug_out.contains("signing"));
    assert!(!debug_out.contains("String"));

    assert_eq!(format!("{}", key), "[REDACTED]");
}

#[test]
fn tainted_input_leaves_only_through_the_sanitizer() {
    let body = Tainted::new("<script>steal()</script><b>hi</b>".to_string());
    assert!(format!("{:?}", body).starts_with("Tainted"));

    let clean = HtmlSanitizer::new().sanitize(body).into_inner();
    assert_eq!(clean, "steal()<b>hi</b>");
}

#[test]
fn permits_come_only_from_an_allowing_gate() {
    let gate = PolicyGate::default();

    let refused = gate
        .permit(&Principal::anonymous(), blog_policy::Action::CreatePost)
        .unwrap_err();
    assert_eq!(refused.reason(), DenyReason::AuthenticationRequired);

    let permit = gate
        .permit(&Principal::user(UserId(1)), blog_policy::Action::CreatePost)
        .unwrap();
    assert_eq!(permit.action(), blog_policy::Action::CreatePost);
    assert_eq!(permit.user(), Some(UserId(1)));
}

#[test]
fn pipeline_gate_sanitize_store() {
    let config = Config::from_lookup(|key| match key {
        "SECRET_KEY" => Some("hush".to_string()),
        _ => None,
    })
    .unwrap();
    let gate = config.gate();
    let sanitizer = HtmlSanitizer::new();
    let store = MemoryStore::new();
    let admin = store.add_user("Admin", "admin@example.com").unwrap();
    let reader = store.add_user("Reader", "reader@example.com").unwrap();

    // Admin publishes
    let permit = gate.permit(&Principal::user(admin), blog_policy::Action::CreatePost).unwrap();
    let draft = form("First", r#"<p>Hello <script>alert(1)</script> <b>world</b></p>"#)
        .verify(&sanitizer)
        .unwrap();
    let post_id = store.insert_post(&permit, draft, day()).unwrap();

    let post = store.post(post_id).unwrap();
    assert_eq!(post.body, "<p>Hello alert(1) <b>world</b></p>");
    assert_eq!(post.subtitle.as_deref(), Some("A subtitle"));
    assert_eq!(post.img_url, None);

    // Reader comments
    let permit = gate
        .permit(&Principal::user(reader), blog_policy::Action::CommentOnPost)
        .unwrap();
    let comment = NewComment::verify(
        post_id,
        Tainted::new(r#"<a href="http://x.com" onclick="evil()">link</a>"#.to_string()),
        &sanitizer,
    )
    .unwrap();
    let comment_id = store.insert_comment(&permit, comment).unwrap();
    assert_eq!(
        store.comment(comment_id).unwrap().text,
        r#"<a href="http://x.com">link</a>"#
    );

    // Reader cannot publish
    let violation = gate
        .permit(&Principal::user(reader), blog_policy::Action::CreatePost)
        .unwrap_err();
    assert_eq!(violation.reason(), DenyReason::AdministratorOnly);
}

#[test]
fn permit_for_one_action_cannot_be_spent_on_another() {
    let gate = PolicyGate::default();
    let sanitizer = HtmlSanitizer::new();
    let store = MemoryStore::new();
    let admin = store.add_user("Admin", "admin@example.com").unwrap();

    let comment_permit = gate
        .permit(&Principal::user(admin), blog_policy::Action::CommentOnPost)
        .unwrap();
    let draft = form("Sneaky", "<p>x</p>").verify(&sanitizer).unwrap();

    let err = store.insert_post(&comment_permit, draft, day()).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::PermitMismatch);
    assert!(store.list_posts().is_empty());
}

#[test]
fn sanitizer_trait_object_works_with_forms() {
    let sanitizer: Box<dyn Sanitizer<String>> = Box::new(HtmlSanitizer::new());
    let clean = sanitizer.sanitize(Tainted::new("<em>hi</em><font>x</font>".to_string()));
    assert_eq!(clean.as_ref(), "<em>hi</em>x");
}

#[test]
fn decisions_reach_log_and_trail() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let trail = Arc::new(AuditTrail::new());
        let blog = blog_policy::web::Blog::new(MemoryStore::new()).with_audit_trail(Arc::clone(&trail));

        let req = blog_policy::web::RequestAdapter::new(
            "req-log",
            blog_policy::web::Method::Get,
            "/post/new",
        );
        blog.create_post(&req, day());

        let events = trail.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].request_id(), "req-log");
        assert_eq!(events[0].user(), None::<UserId>);
        assert_eq!(
            events[0].outcome(),
            AuditOutcome::Denied(DenyReason::AuthenticationRequired)
        );
    });
}
