use super::*;

/// Tests writing the closure record.
///
/// Verifies that one update sets the terminal status together with the
/// transcript, rating, reason, comment and close timestamp.
///
/// Expected: Ok with the full record on the row
#[tokio::test]
async fn writes_full_closure_record() {
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

    let closed_at = Utc::now();
    repo.record_close(
        id,
        &CloseRecordParam {
            satisfaction: 5,
            reason: CloseReason::Done,
            comment: Some("great service".to_string()),
            transcript: "[2026-08-03 17:00] alice#0: hello".to_string(),
            closed_at,
        },
    )
    .await
    .unwrap();

    let row = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(row.status, TicketStatus::Closed);
    assert_eq!(row.satisfaction, Some(5));
    assert_eq!(row.close_reason, Some(CloseReason::Done));
    assert_eq!(row.comment.as_deref(), Some("great service"));
    assert_eq!(
        row.transcript.as_deref(),
        Some("[2026-08-03 17:00] alice#0: hello")
    );
    assert!(row.closed_at.is_some());
}

/// Tests that the comment column stays empty when none was given.
///
/// Expected: Ok with no comment on the row
#[tokio::test]
async fn close_without_comment() {
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
            kind: TicketKind::Qna,
        })
        .await
        .unwrap();

    repo.record_close(
        id,
        &CloseRecordParam {
            satisfaction: 2,
            reason: CloseReason::NotPossible,
            comment: None,
            transcript: String::new(),
            closed_at: Utc::now(),
        },
    )
    .await
    .unwrap();

    let row = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(row.status, TicketStatus::Closed);
    assert_eq!(row.comment, None);
    assert_eq!(row.close_reason, Some(CloseReason::NotPossible));
}
