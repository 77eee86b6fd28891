use super::*;

/// Tests attaching the channel to a row.
///
/// Expected: Ok with the channel ID stored
#[tokio::test]
async fn attaches_channel() {
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

    repo.set_channel(id, 500).await.unwrap();

    let row = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(row.channel_id, Some(500));
}
