use super::*;

/// Tests mirroring a claim transition.
///
/// Expected: Ok with status Claimed and claimant identity recorded
#[tokio::test]
async fn records_claimant() {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Ticket)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TicketRepository::new(db);
    let id = repo
        .create(NewTicketParam {
            owner_id: 11,
            owner_name: "alice".to_string(),
            kind: TicketKind::Order,
        })
        .await
        .unwrap();

    repo.mark_claimed(id, 42, "staff-y").await.unwrap();

    let row = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(row.status, TicketStatus::Claimed { by: 42 });
    assert_eq!(row.claimed_by_name.as_deref(), Some("staff-y"));
}

/// Tests mirroring an unclaim transition.
///
/// Verifies that `mark_open` clears both claimant columns together with the
/// status, so the store never shows a claimant on an Open row.
///
/// Expected: Ok with status Open and no claimant
#[tokio::test]
async fn mark_open_clears_claimant() {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Ticket)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TicketRepository::new(db);
    let id = repo
        .create(NewTicketParam {
            owner_id: 11,
            owner_name: "alice".to_string(),
            kind: TicketKind::Order,
        })
        .await
        .unwrap();

    repo.mark_claimed(id, 42, "staff-y").await.unwrap();
    repo.mark_open(id).await.unwrap();

    let row = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(row.status, TicketStatus::Open);
    assert_eq!(row.claimed_by_name, None);
}
