use super::*;

use test_utils::factory::ticket::TicketFactory;

/// Tests finding an existing ticket row.
///
/// Expected: Ok with the converted domain model
#[tokio::test]
async fn finds_existing_row() {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Ticket)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = TicketFactory::new(db)
        .owner_discord_id("11")
        .owner_name("alice")
        .kind("report")
        .channel_id("500")
        .build()
        .await
        .unwrap();

    let repo = TicketRepository::new(db);
    let found = repo.find_by_id(row.id).await.unwrap().unwrap();

    assert_eq!(found.id, row.id);
    assert_eq!(found.owner_id, 11);
    assert_eq!(found.kind, TicketKind::Report);
    assert_eq!(found.channel_id, Some(500));
}

/// Tests that a missing row reports None.
///
/// Expected: Ok(None)
#[tokio::test]
async fn missing_row_is_none() {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Ticket)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TicketRepository::new(db);
    assert!(repo.find_by_id(99).await.unwrap().is_none());
}

/// Tests that a claimed row converts with its claimant.
///
/// Expected: Ok with status Claimed carrying the claimant ID
#[tokio::test]
async fn converts_claimed_row() {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Ticket)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = TicketFactory::new(db)
        .status("Claimed")
        .claimed_by("42", "staff-y")
        .build()
        .await
        .unwrap();

    let repo = TicketRepository::new(db);
    let found = repo.find_by_id(row.id).await.unwrap().unwrap();

    assert_eq!(found.status, TicketStatus::Claimed { by: 42 });
    assert_eq!(found.claimed_by_name.as_deref(), Some("staff-y"));
}
