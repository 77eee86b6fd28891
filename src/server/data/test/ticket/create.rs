use super::*;

/// Tests creating the initial ticket row.
///
/// Verifies that the row starts Open with the owner identity recorded and no
/// channel or claimant attached yet.
///
/// Expected: Ok with an allocated ID and Open status
#[tokio::test]
async fn creates_open_row() {
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

    let row = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(row.status, TicketStatus::Open);
    assert_eq!(row.owner_id, 11);
    assert_eq!(row.owner_name, "alice");
    assert_eq!(row.kind, TicketKind::Order);
    assert_eq!(row.channel_id, None);
    assert_eq!(row.claimed_by_name, None);
}

/// Tests that the store allocates distinct sequential IDs.
///
/// Two creates never share an ID; the display format pads the first IDs to
/// three digits.
///
/// Expected: Ok with IDs 1 and 2
#[tokio::test]
async fn allocates_distinct_ids() {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Ticket)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TicketRepository::new(db);
    let first = repo
        .create(NewTicketParam {
            owner_id: 11,
            owner_name: "alice".to_string(),
            kind: TicketKind::Order,
        })
        .await
        .unwrap();
    let second = repo
        .create(NewTicketParam {
            owner_id: 12,
            owner_name: "bob".to_string(),
            kind: TicketKind::Qna,
        })
        .await
        .unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 2);
    assert_eq!(
        crate::server::model::ticket::format_display_id(first),
        "001"
    );
}
