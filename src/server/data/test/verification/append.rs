use super::*;

/// Tests appending a verification log row.
///
/// Expected: Ok with the row readable back with all fields intact
#[tokio::test]
async fn appends_row() {
    let test = TestBuilder::new()
        .with_table(entity::prelude::VerificationLog)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = VerificationLogRepository::new(db);
    repo.append(NewVerificationLogParam {
        discord_id: 1,
        discord_name: "alice".to_string(),
        external_username: "BuilderBob".to_string(),
        external_id: "9001".to_string(),
        method: "Game Entry".to_string(),
    })
    .await
    .unwrap();

    let records = repo.find_by_discord_id(1).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].discord_name, "alice");
    assert_eq!(records[0].external_username, "BuilderBob");
    assert_eq!(records[0].external_id, "9001");
    assert_eq!(records[0].method, "Game Entry");
}

/// Tests that an unresolved identity is stored with an empty external ID.
///
/// Expected: Ok with an empty external_id column
#[tokio::test]
async fn appends_row_with_empty_external_id() {
    let test = TestBuilder::new()
        .with_table(entity::prelude::VerificationLog)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = VerificationLogRepository::new(db);
    repo.append(NewVerificationLogParam {
        discord_id: 2,
        discord_name: "bob".to_string(),
        external_username: "GhostUser".to_string(),
        external_id: String::new(),
        method: "Description".to_string(),
    })
    .await
    .unwrap();

    let records = repo.find_by_discord_id(2).await.unwrap();
    assert_eq!(records[0].external_id, "");
}
