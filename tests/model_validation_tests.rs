use chrono::{NaiveDate, Utc};
use culture_cms::{
    AppError,
    models::{Blog, BlogChanges, EventChanges, NewsChanges, Review, ReviewDraft},
    resources::{Mutation, Resource, Validate, is_url_safe_slug},
};
use uuid::Uuid;

fn blog(slug: &str) -> Blog {
    let now = Utc::now();
    Blog {
        id: Uuid::new_v4(),
        title: "Title".to_string(),
        slug: slug.to_string(),
        content: "Body".to_string(),
        cover_image: None,
        created_at: now,
        updated_at: now,
    }
}

// --- Partial update payloads ---

#[test]
fn test_changes_distinguish_absent_from_null() {
    let absent: BlogChanges = serde_json::from_str(r#"{ "title": "New" }"#).unwrap();
    assert_eq!(absent.title.as_deref(), Some("New"));
    assert_eq!(absent.cover_image, None);

    let cleared: BlogChanges = serde_json::from_str(r#"{ "coverImage": null }"#).unwrap();
    assert_eq!(cleared.cover_image, Some(None));

    let replaced: BlogChanges =
        serde_json::from_str(r#"{ "coverImage": "uploads/new.png" }"#).unwrap();
    assert_eq!(replaced.cover_image, Some(Some("uploads/new.png".to_string())));

    let news: NewsChanges = serde_json::from_str(r#"{ "eventDate": "2025-06-01" }"#).unwrap();
    assert_eq!(news.event_date, Some(NaiveDate::from_ymd_opt(2025, 6, 1)));

    let event: EventChanges = serde_json::from_str(r#"{ "image": null }"#).unwrap();
    assert_eq!(event.image, Some(None));
    assert!(event.validate().is_ok());
}

#[test]
fn test_null_is_rejected_for_fields_that_cannot_be_cleared() {
    for body in [r#"{ "title": null }"#, r#"{ "slug": null }"#, r#"{ "content": null }"#] {
        let err = serde_json::from_str::<BlogChanges>(body).unwrap_err();
        assert!(err.to_string().contains("must not be null"), "{body}");
    }

    assert!(serde_json::from_str::<NewsChanges>(r#"{ "content": null }"#).is_err());
    assert!(serde_json::from_str::<EventChanges>(r#"{ "date": null }"#).is_err());
    assert!(serde_json::from_str::<EventChanges>(r#"{ "time": null }"#).is_err());

    let absent: EventChanges = serde_json::from_str("{}").unwrap();
    assert_eq!(absent.date, None);
}

#[test]
fn test_partial_update_serialization_omits_absent_fields() {
    let partial = BlogChanges {
        title: Some("New Title Only".to_string()),
        ..BlogChanges::default()
    };

    let json_output = serde_json::to_string(&partial).unwrap();
    assert!(json_output.contains(r#""title":"New Title Only""#));
    assert!(!json_output.contains("coverImage"));
}

// --- Drafts ---

#[test]
fn test_review_draft_ignores_client_approval() {
    let draft: ReviewDraft = serde_json::from_str(
        r#"{ "name": "Ada", "star": 4, "email": "a@b.c", "phone": "1", "message": "Hi", "approved": true }"#,
    )
    .unwrap();
    assert!(draft.validate().is_ok());

    let review = Review::from_draft(draft, Uuid::new_v4(), Utc::now());
    assert!(!review.approved);
    assert!(!review.is_public());
}

#[test]
fn test_review_draft_rules() {
    let valid = ReviewDraft {
        name: "Ada".to_string(),
        star: 1,
        email: "ada@example.com".to_string(),
        phone: "0123".to_string(),
        message: "Great".to_string(),
    };
    assert!(valid.validate().is_ok());

    let bad_email = ReviewDraft {
        email: "not-an-email".to_string(),
        ..valid.clone()
    };
    assert!(matches!(bad_email.validate(), Err(AppError::Validation(_))));

    let no_name = ReviewDraft {
        name: String::new(),
        ..valid.clone()
    };
    assert!(matches!(no_name.validate(), Err(AppError::Validation(_))));

    let too_many_stars = ReviewDraft { star: 6, ..valid };
    match too_many_stars.validate() {
        Err(AppError::Validation(msg)) => {
            assert_eq!(msg, "star rating must be between 1 and 5")
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_slug_rules() {
    assert!(is_url_safe_slug("autumn-festival-2025"));
    assert!(is_url_safe_slug("a"));

    assert!(!is_url_safe_slug(""));
    assert!(!is_url_safe_slug("Autumn"));
    assert!(!is_url_safe_slug("-leading"));
    assert!(!is_url_safe_slug("trailing-"));
    assert!(!is_url_safe_slug("double--hyphen"));
    assert!(!is_url_safe_slug("with space"));
    assert!(!is_url_safe_slug("ümlaut"));
}

// --- Stale pages ---

#[test]
fn test_blog_stale_paths_use_slug() {
    let post = blog("spring-gala");

    assert_eq!(post.stale_paths(Mutation::Created), vec!["/", "/blogs"]);
    assert_eq!(
        post.stale_paths(Mutation::Updated),
        vec!["/", "/blogs", "/blogs/spring-gala"]
    );
    assert_eq!(post.stale_paths(Mutation::Deleted), vec!["/", "/blogs"]);
}

#[test]
fn test_review_stale_paths_skip_submissions() {
    let draft = ReviewDraft {
        name: "Ada".to_string(),
        star: 5,
        email: "ada@example.com".to_string(),
        phone: "0123".to_string(),
        message: "Great".to_string(),
    };
    let review = Review::from_draft(draft, Uuid::new_v4(), Utc::now());

    assert!(review.stale_paths(Mutation::Created).is_empty());
    assert_eq!(review.stale_paths(Mutation::Updated), vec!["/", "/reviews"]);
    assert_eq!(review.stale_paths(Mutation::Deleted), vec!["/", "/reviews"]);
}

#[test]
fn test_apply_keeps_identity_and_creation_time() {
    let mut post = blog("keep-me");
    let original = post.clone();
    let later = original.created_at + chrono::Duration::minutes(5);

    post.apply(
        BlogChanges {
            content: Some("Rewritten".to_string()),
            cover_image: Some(Some("uploads/c.png".to_string())),
            ..BlogChanges::default()
        },
        later,
    );

    assert_eq!(post.id, original.id);
    assert_eq!(post.created_at, original.created_at);
    assert_eq!(post.updated_at, later);
    assert_eq!(post.slug, "keep-me");
    assert_eq!(post.content, "Rewritten");
    assert_eq!(post.cover_image.as_deref(), Some("uploads/c.png"));
}
