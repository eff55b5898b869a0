mod common;

use common::*;
use greenroom::db::queries;
use greenroom::error::AppError;
use greenroom::models::*;

#[test]
fn episode_create_and_get() {
    let pool = test_pool();
    let conn = pool.get().unwrap();

    let episode = create_test_episode(&conn, "S01E01");
    assert!(episode.id.starts_with("gr_ep_"));

    let fetched = queries::get_episode_by_id(&conn, &episode.id)
        .unwrap()
        .unwrap();
    assert_eq!(fetched.title, "Episode S01E01");
    assert_eq!(fetched.genres, vec!["drama"]);
    assert_eq!(fetched.visibility, Visibility::Locked);
    assert_eq!(fetched.passphrase.as_deref(), Some("swordfish"));
}

#[test]
fn episode_duplicate_external_id_conflicts() {
    let pool = test_pool();
    let conn = pool.get().unwrap();

    create_test_episode(&conn, "S01E01");
    let err = queries::create_episode(
        &conn,
        &CreateEpisode {
            external_id: "S01E01".to_string(),
            title: "Duplicate".to_string(),
            description: None,
            runtime_minutes: None,
            genres: vec![],
            tags: vec![],
            visibility: Visibility::Available,
            access_level: AccessLevel::Free,
            passphrase: None,
            video_url: None,
            thumbnail_url: None,
            status: EpisodeStatus::Draft,
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[test]
fn episode_update_patches_only_provided_fields() {
    let pool = test_pool();
    let conn = pool.get().unwrap();

    let episode = create_test_episode(&conn, "S01E02");
    let updated = queries::update_episode(
        &conn,
        &episode.id,
        &UpdateEpisode {
            title: Some("Renamed".to_string()),
            visibility: Some(Visibility::Available),
            ..Default::default()
        },
    )
    .unwrap()
    .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.visibility, Visibility::Available);
    // untouched fields survive
    assert_eq!(updated.passphrase.as_deref(), Some("swordfish"));
    assert_eq!(updated.external_id, "S01E02");
}

#[test]
fn episode_list_filters_by_status_and_visibility() {
    let pool = test_pool();
    let conn = pool.get().unwrap();

    create_test_episode(&conn, "S01E01"); // locked, published
    queries::create_episode(
        &conn,
        &CreateEpisode {
            external_id: "S01E02".to_string(),
            title: "Draft one".to_string(),
            description: None,
            runtime_minutes: None,
            genres: vec![],
            tags: vec![],
            visibility: Visibility::Draft,
            access_level: AccessLevel::Free,
            passphrase: None,
            video_url: None,
            thumbnail_url: None,
            status: EpisodeStatus::Draft,
        },
    )
    .unwrap();

    let published =
        queries::list_episodes(&conn, Some(EpisodeStatus::Published), None).unwrap();
    assert_eq!(published.len(), 1);

    let locked =
        queries::list_episodes(&conn, Some(EpisodeStatus::Published), Some(Visibility::Locked))
            .unwrap();
    assert_eq!(locked.len(), 1);

    let available =
        queries::list_episodes(&conn, Some(EpisodeStatus::Published), Some(Visibility::Available))
            .unwrap();
    assert!(available.is_empty());
}

#[test]
fn episode_delete_cascades_to_polls() {
    let pool = test_pool();
    let mut conn = pool.get().unwrap();

    let episode = create_test_episode(&conn, "S01E03");
    let poll = create_test_poll(&mut conn, &episode.id, PollStatus::Live);

    assert!(queries::delete_episode(&conn, &episode.id).unwrap());

    assert!(queries::get_poll_by_id(&conn, &poll.poll.id)
        .unwrap()
        .is_none());
    assert_eq!(count_rows(&conn, "poll_options"), 0);
}

#[test]
fn poll_requires_two_options() {
    let pool = test_pool();
    let mut conn = pool.get().unwrap();

    let episode = create_test_episode(&conn, "S01E04");
    let err = queries::create_poll(
        &mut conn,
        &CreatePoll {
            episode_id: episode.id.clone(),
            title: "One option".to_string(),
            description: None,
            status: None,
            duration_days: None,
            options: vec!["Only one".to_string()],
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(count_rows(&conn, "polls"), 0);
}

#[test]
fn poll_duration_out_of_range_is_rejected() {
    let pool = test_pool();
    let mut conn = pool.get().unwrap();

    let episode = create_test_episode(&conn, "S01E04");
    let err = queries::create_poll(
        &mut conn,
        &CreatePoll {
            episode_id: episode.id.clone(),
            title: "Forever poll".to_string(),
            description: None,
            status: None,
            duration_days: Some(i64::MAX),
            options: vec!["Yes".to_string(), "No".to_string()],
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(count_rows(&conn, "polls"), 0);
}

#[test]
fn poll_options_keep_display_order() {
    let pool = test_pool();
    let mut conn = pool.get().unwrap();

    let episode = create_test_episode(&conn, "S01E05");
    let poll = create_test_poll(&mut conn, &episode.id, PollStatus::Live);

    let options = queries::get_poll_options(&conn, &poll.poll.id).unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].name, "Option A");
    assert_eq!(options[0].display_order, 0);
    assert_eq!(options[1].display_order, 1);
    assert!(options.iter().all(|o| o.vote_count == 0));
}

#[test]
fn customer_upsert_by_email() {
    let pool = test_pool();
    let conn = pool.get().unwrap();

    let first = queries::upsert_customer(&conn, "Fan@Example.com", None).unwrap();
    let second =
        queries::upsert_customer(&conn, "fan@example.com", Some("Named Fan")).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.email, "fan@example.com");
    assert_eq!(second.name.as_deref(), Some("Named Fan"));
    assert_eq!(count_rows(&conn, "customers"), 1);
}

#[test]
fn order_lookup_by_session_and_number() {
    let pool = test_pool();
    let mut conn = pool.get().unwrap();

    let created = create_pending_order(&mut conn, "cs_lookup_1");

    let by_session = queries::get_order_by_session(&conn, "cs_lookup_1")
        .unwrap()
        .unwrap();
    assert_eq!(by_session.id, created.order.id);

    let by_number = queries::get_order_by_number(&conn, "GR-TEST1234")
        .unwrap()
        .unwrap();
    assert_eq!(by_number.id, created.order.id);

    let items = queries::get_order_items(&conn, &created.order.id).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].total_amount_cents, 2499);
}

#[test]
fn signup_duplicate_email_conflicts() {
    let pool = test_pool();
    let conn = pool.get().unwrap();

    queries::create_signup(&conn, "fan@example.com").unwrap();
    let err = queries::create_signup(&conn, "  FAN@example.com ").unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(count_rows(&conn, "signups"), 1);
}

#[test]
fn blog_list_hides_future_posts() {
    let pool = test_pool();
    let conn = pool.get().unwrap();

    queries::create_blog_post(
        &conn,
        &CreateBlogPost {
            slug: "live-now".to_string(),
            title: "Live".to_string(),
            excerpt: None,
            body: None,
            cover_image_url: None,
            published_at: None,
        },
    )
    .unwrap();
    queries::create_blog_post(
        &conn,
        &CreateBlogPost {
            slug: "scheduled".to_string(),
            title: "Later".to_string(),
            excerpt: None,
            body: None,
            cover_image_url: None,
            published_at: Some(chrono::Utc::now().timestamp() + 86400),
        },
    )
    .unwrap();

    let posts = queries::list_published_posts(&conn).unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug, "live-now");
}

#[test]
fn social_click_increments_atomically() {
    let pool = test_pool();
    let conn = pool.get().unwrap();

    let first = queries::record_social_click(&conn, "instagram").unwrap();
    assert_eq!(first.click_count, 1);
    let second = queries::record_social_click(&conn, "instagram").unwrap();
    assert_eq!(second.click_count, 2);
    let other = queries::record_social_click(&conn, "youtube").unwrap();
    assert_eq!(other.click_count, 1);
}
