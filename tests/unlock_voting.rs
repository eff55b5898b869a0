mod common;

use common::*;
use greenroom::db::queries;
use greenroom::models::PollStatus;

#[test]
fn correct_passphrase_unlocks() {
    let pool = test_pool();
    let conn = pool.get().unwrap();
    let episode = create_test_episode(&conn, "S01E01");

    let result = queries::verify_episode_passphrase(&conn, &episode.id, "swordfish").unwrap();
    assert_eq!(result, Some(true));
}

#[test]
fn wrong_passphrase_fails_without_mutation() {
    let pool = test_pool();
    let conn = pool.get().unwrap();
    let episode = create_test_episode(&conn, "S01E01");

    for guess in ["Swordfish", "swordfis", "swordfish ", ""] {
        let result = queries::verify_episode_passphrase(&conn, &episode.id, guess).unwrap();
        assert_eq!(result, Some(false), "guess {:?} should fail", guess);
    }

    // the episode row is untouched either way
    let after = queries::get_episode_by_id(&conn, &episode.id)
        .unwrap()
        .unwrap();
    assert_eq!(after.updated_at, episode.updated_at);
    assert_eq!(after.passphrase, episode.passphrase);
}

#[test]
fn episode_without_passphrase_never_unlocks() {
    let pool = test_pool();
    let conn = pool.get().unwrap();

    let open = queries::create_episode(
        &conn,
        &greenroom::models::CreateEpisode {
            external_id: "S01E99".to_string(),
            title: "Open".to_string(),
            description: None,
            runtime_minutes: None,
            genres: vec![],
            tags: vec![],
            visibility: greenroom::models::Visibility::Available,
            access_level: greenroom::models::AccessLevel::Free,
            passphrase: None,
            video_url: None,
            thumbnail_url: None,
            status: greenroom::models::EpisodeStatus::Published,
        },
    )
    .unwrap();

    let result = queries::verify_episode_passphrase(&conn, &open.id, "anything").unwrap();
    assert_eq!(result, Some(false));
}

#[test]
fn unknown_episode_is_none() {
    let pool = test_pool();
    let conn = pool.get().unwrap();
    let result = queries::verify_episode_passphrase(&conn, "gr_ep_missing", "x").unwrap();
    assert_eq!(result, None);
}

#[test]
fn vote_increments_by_one() {
    let pool = test_pool();
    let mut conn = pool.get().unwrap();
    let episode = create_test_episode(&conn, "S01E01");
    let poll = create_test_poll(&mut conn, &episode.id, PollStatus::Live);

    let option = &poll.options[0];
    let updated = queries::increment_vote(&conn, &poll.poll.id, &option.id)
        .unwrap()
        .unwrap();
    assert_eq!(updated.vote_count, 1);

    let again = queries::increment_vote(&conn, &poll.poll.id, &option.id)
        .unwrap()
        .unwrap();
    assert_eq!(again.vote_count, 2);

    // the other option is untouched
    let options = queries::get_poll_options(&conn, &poll.poll.id).unwrap();
    assert_eq!(options[1].vote_count, 0);
}

#[test]
fn vote_rejects_option_from_another_poll() {
    let pool = test_pool();
    let mut conn = pool.get().unwrap();
    let episode = create_test_episode(&conn, "S01E01");
    let poll_a = create_test_poll(&mut conn, &episode.id, PollStatus::Live);
    let poll_b = create_test_poll(&mut conn, &episode.id, PollStatus::Live);

    let foreign_option = &poll_b.options[0];
    let result = queries::increment_vote(&conn, &poll_a.poll.id, &foreign_option.id).unwrap();
    assert!(result.is_none());

    // no counter moved anywhere
    let options_b = queries::get_poll_options(&conn, &poll_b.poll.id).unwrap();
    assert!(options_b.iter().all(|o| o.vote_count == 0));
}

#[test]
fn latest_live_poll_wins() {
    let pool = test_pool();
    let mut conn = pool.get().unwrap();
    let episode = create_test_episode(&conn, "S01E01");
    let _older = create_test_poll(&mut conn, &episode.id, PollStatus::Live);
    let _draft = create_test_poll(&mut conn, &episode.id, PollStatus::Draft);
    let newest_live = create_test_poll(&mut conn, &episode.id, PollStatus::Live);

    let found = queries::get_latest_live_poll(&conn, &episode.id)
        .unwrap()
        .unwrap();
    assert_eq!(found.id, newest_live.poll.id);
}

#[test]
fn no_live_poll_is_none() {
    let pool = test_pool();
    let mut conn = pool.get().unwrap();
    let episode = create_test_episode(&conn, "S01E01");
    create_test_poll(&mut conn, &episode.id, PollStatus::Ended);

    assert!(queries::get_latest_live_poll(&conn, &episode.id)
        .unwrap()
        .is_none());
}
