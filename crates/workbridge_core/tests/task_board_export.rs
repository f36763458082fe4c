mod common;

use common::{seed_meeting, seed_team, Call, RecordingClient};
use rusqlite::Connection;
use workbridge_core::db::open_db_in_memory;
use workbridge_core::repo::meeting_repo::{MeetingRepository, SqliteMeetingRepository};
use workbridge_core::repo::task_row_repo::{SqliteTaskRowRepository, TaskRowRepository};
use workbridge_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use workbridge_core::repo::work_item_repo::{SqliteWorkItemRepository, WorkItemRepository};
use workbridge_core::{
    BoardRow, ExportError, ExportService, ExportStep, MeetingId, SkillDomain, TaskRow, TaskStatus,
    User, WorkItem,
};

fn seed_rows(conn: &Connection, meeting_id: MeetingId, descriptions: &[&str]) -> Vec<TaskRow> {
    let repo = SqliteTaskRowRepository::try_new(conn).unwrap();
    descriptions
        .iter()
        .map(|description| {
            let row = TaskRow::new(meeting_id, *description);
            repo.create_task_row(&row).unwrap();
            row
        })
        .collect()
}

fn board_row(description: &str, assignee: &str, status: TaskStatus) -> BoardRow {
    BoardRow {
        description: description.to_string(),
        assignee: assignee.to_string(),
        status,
    }
}

#[test]
fn first_export_creates_board_and_inserts_rows() {
    let conn = open_db_in_memory().unwrap();
    let team = seed_team(&conn);
    let meeting = seed_meeting(&conn, &team, "");
    let rows = seed_rows(&conn, meeting.id, &["Write API", "Review UI"]);
    let client = RecordingClient::new();
    let service = ExportService::try_new(&conn, &client).unwrap();

    let report = service.export_task_board(meeting.id).unwrap();

    assert!(report.container_created);
    assert_eq!(report.container_ref, "board-1");
    assert_eq!(report.inserted, 2);
    assert_eq!(report.refreshed, 0);
    assert_eq!(
        client.calls(),
        vec![
            Call::CreateContainer {
                parent_ref: "workspace-root".to_string(),
                title: "Sprint review tasks".to_string(),
            },
            Call::InsertRow {
                container_ref: "board-1".to_string(),
                row: board_row("Write API", "", TaskStatus::Pending),
            },
            Call::InsertRow {
                container_ref: "board-1".to_string(),
                row: board_row("Review UI", "", TaskStatus::Pending),
            },
        ]
    );

    let stored = SqliteMeetingRepository::try_new(&conn)
        .unwrap()
        .get_meeting(meeting.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.board_ref.as_deref(), Some("board-1"));

    let stored_rows = SqliteTaskRowRepository::try_new(&conn)
        .unwrap()
        .list_by_meeting(meeting.id)
        .unwrap();
    assert_eq!(stored_rows[0].id, rows[0].id);
    assert_eq!(stored_rows[0].external_ref.as_deref(), Some("row-2"));
    assert_eq!(stored_rows[1].external_ref.as_deref(), Some("row-3"));
}

#[test]
fn rows_carry_assignee_names_and_status() {
    let conn = open_db_in_memory().unwrap();
    let team = seed_team(&conn);
    let meeting = seed_meeting(&conn, &team, "");

    let user = User::new("Mina", SkillDomain::Backend);
    SqliteUserRepository::try_new(&conn)
        .unwrap()
        .create_user(&user)
        .unwrap();
    let mut assigned = WorkItem::new("Write API", SkillDomain::Backend, 1);
    assigned.assignee = Some(user.id);
    let open = WorkItem::new("Deploy", SkillDomain::Cloud, 2);
    let work_items = SqliteWorkItemRepository::try_new(&conn).unwrap();
    work_items.create_work_item(&assigned).unwrap();
    work_items.create_work_item(&open).unwrap();

    let task_rows = SqliteTaskRowRepository::try_new(&conn).unwrap();
    let mut first = TaskRow::new(meeting.id, "Write API");
    first.work_item_id = Some(assigned.id);
    first.status = TaskStatus::InProgress;
    let mut second = TaskRow::new(meeting.id, "Deploy");
    second.work_item_id = Some(open.id);
    second.status = TaskStatus::Done;
    task_rows.create_task_row(&first).unwrap();
    task_rows.create_task_row(&second).unwrap();

    let client = RecordingClient::new();
    ExportService::try_new(&conn, &client)
        .unwrap()
        .export_task_board(meeting.id)
        .unwrap();

    let inserted: Vec<BoardRow> = client
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::InsertRow { row, .. } => Some(row),
            _ => None,
        })
        .collect();
    assert_eq!(
        inserted,
        vec![
            board_row("Write API", "Mina", TaskStatus::InProgress),
            board_row("Deploy", "", TaskStatus::Done),
        ]
    );
}

#[test]
fn second_export_refreshes_existing_rows() {
    let conn = open_db_in_memory().unwrap();
    let team = seed_team(&conn);
    let meeting = seed_meeting(&conn, &team, "");
    seed_rows(&conn, meeting.id, &["Write API"]);

    let first = RecordingClient::new();
    ExportService::try_new(&conn, &first)
        .unwrap()
        .export_task_board(meeting.id)
        .unwrap();

    seed_rows(&conn, meeting.id, &["Add alerts"]);
    let second = RecordingClient::new();
    let report = ExportService::try_new(&conn, &second)
        .unwrap()
        .export_task_board(meeting.id)
        .unwrap();

    assert!(!report.container_created);
    assert_eq!(report.container_ref, "board-1");
    assert_eq!(report.refreshed, 1);
    assert_eq!(report.inserted, 1);
    assert_eq!(
        second.calls(),
        vec![
            Call::UpdateRow {
                row_ref: "row-2".to_string(),
                row: board_row("Write API", "", TaskStatus::Pending),
            },
            Call::InsertRow {
                container_ref: "board-1".to_string(),
                row: board_row("Add alerts", "", TaskStatus::Pending),
            },
        ]
    );
}

#[test]
fn failed_insert_keeps_earlier_references_and_stops() {
    let conn = open_db_in_memory().unwrap();
    let team = seed_team(&conn);
    let meeting = seed_meeting(&conn, &team, "");
    let rows = seed_rows(&conn, meeting.id, &["one", "two", "three"]);
    // create, insert one, insert two (fails)
    let client = RecordingClient::failing_on(3);
    let service = ExportService::try_new(&conn, &client).unwrap();

    let err = service.export_task_board(meeting.id).unwrap_err();

    match &err {
        ExportError::External { step, .. } => assert_eq!(*step, ExportStep::InsertRow(rows[1].id)),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(client.calls().len(), 3);

    let stored = SqliteTaskRowRepository::try_new(&conn)
        .unwrap()
        .list_by_meeting(meeting.id)
        .unwrap();
    assert_eq!(stored[0].external_ref.as_deref(), Some("row-2"));
    assert!(stored[1].external_ref.is_none());
    assert!(stored[2].external_ref.is_none());

    let board_ref = SqliteMeetingRepository::try_new(&conn)
        .unwrap()
        .get_meeting(meeting.id)
        .unwrap()
        .unwrap()
        .board_ref;
    assert_eq!(board_ref.as_deref(), Some("board-1"));
}

#[test]
fn failed_board_creation_persists_nothing() {
    let conn = open_db_in_memory().unwrap();
    let team = seed_team(&conn);
    let meeting = seed_meeting(&conn, &team, "");
    seed_rows(&conn, meeting.id, &["one"]);
    let client = RecordingClient::failing_on(1);
    let service = ExportService::try_new(&conn, &client).unwrap();

    let err = service.export_task_board(meeting.id).unwrap_err();

    assert!(matches!(
        err,
        ExportError::External {
            step: ExportStep::CreateContainer,
            ..
        }
    ));
    assert_eq!(client.calls().len(), 1);
    let stored = SqliteMeetingRepository::try_new(&conn)
        .unwrap()
        .get_meeting(meeting.id)
        .unwrap()
        .unwrap();
    assert!(stored.board_ref.is_none());
}

#[test]
fn unrecorded_board_reference_stops_before_rows() {
    let conn = open_db_in_memory().unwrap();
    let team = seed_team(&conn);
    let meeting = seed_meeting(&conn, &team, "");
    seed_rows(&conn, meeting.id, &["one", "two"]);
    conn.execute_batch(
        "CREATE TRIGGER lock_board_ref BEFORE UPDATE OF board_ref ON meetings
         BEGIN SELECT RAISE(ABORT, 'board_ref locked'); END;",
    )
    .unwrap();
    let client = RecordingClient::new();
    let service = ExportService::try_new(&conn, &client).unwrap();

    let err = service.export_task_board(meeting.id).unwrap_err();

    assert!(matches!(err, ExportError::Store(_)));
    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0], Call::CreateContainer { .. }));
}

#[test]
fn existing_board_is_reused() {
    let conn = open_db_in_memory().unwrap();
    let team = seed_team(&conn);
    let meeting = seed_meeting(&conn, &team, "");
    SqliteMeetingRepository::try_new(&conn)
        .unwrap()
        .set_board_ref(meeting.id, "board-existing")
        .unwrap();
    seed_rows(&conn, meeting.id, &["one"]);
    let client = RecordingClient::new();

    let report = ExportService::try_new(&conn, &client)
        .unwrap()
        .export_task_board(meeting.id)
        .unwrap();

    assert!(!report.container_created);
    assert_eq!(
        client.calls(),
        vec![Call::InsertRow {
            container_ref: "board-existing".to_string(),
            row: board_row("one", "", TaskStatus::Pending),
        }]
    );
}

#[test]
fn missing_base_location_is_rejected_without_calls() {
    let conn = open_db_in_memory().unwrap();
    let mut team = seed_team(&conn);
    conn.execute(
        "UPDATE teams SET base_ref = NULL WHERE uuid = ?1;",
        [team.id.to_string()],
    )
    .unwrap();
    team.base_ref = None;
    let meeting = seed_meeting(&conn, &team, "");
    seed_rows(&conn, meeting.id, &["one"]);
    let client = RecordingClient::new();

    let err = ExportService::try_new(&conn, &client)
        .unwrap()
        .export_task_board(meeting.id)
        .unwrap_err();

    assert!(matches!(err, ExportError::Validation(_)));
    assert!(client.calls().is_empty());
}

#[test]
fn empty_meeting_still_gets_a_board() {
    let conn = open_db_in_memory().unwrap();
    let team = seed_team(&conn);
    let meeting = seed_meeting(&conn, &team, "");
    let client = RecordingClient::new();

    let report = ExportService::try_new(&conn, &client)
        .unwrap()
        .export_task_board(meeting.id)
        .unwrap();

    assert!(report.container_created);
    assert_eq!(report.inserted, 0);
    assert_eq!(client.calls().len(), 1);
}
