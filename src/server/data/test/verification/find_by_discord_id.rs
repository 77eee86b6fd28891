use super::*;

use test_utils::factory::verification_log::VerificationLogFactory;

/// Tests that lookups are scoped to the requested user, newest first.
///
/// Expected: Ok with only the user's rows, most recent row first
#[tokio::test]
async fn returns_only_matching_rows_newest_first() {
    let test = TestBuilder::new()
        .with_table(entity::prelude::VerificationLog)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    VerificationLogFactory::new(db)
        .discord_id("1")
        .external_username("FirstName")
        .build()
        .await
        .unwrap();
    VerificationLogFactory::new(db)
        .discord_id("1")
        .external_username("SecondName")
        .build()
        .await
        .unwrap();
    VerificationLogFactory::new(db)
        .discord_id("2")
        .external_username("SomeoneElse")
        .build()
        .await
        .unwrap();

    let repo = VerificationLogRepository::new(db);
    let records = repo.find_by_discord_id(1).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].external_username, "SecondName");
    assert_eq!(records[1].external_username, "FirstName");
}

/// Tests that a user with no rows gets an empty list.
///
/// Expected: Ok with an empty vector
#[tokio::test]
async fn unknown_user_has_no_records() {
    let test = TestBuilder::new()
        .with_table(entity::prelude::VerificationLog)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = VerificationLogRepository::new(db);
    assert!(repo.find_by_discord_id(99).await.unwrap().is_empty());
}
