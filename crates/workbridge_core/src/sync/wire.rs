//! JSON payloads of the document-service protocol.
//!
//! Shapes follow the service's block and database objects:
//! `{"object":"block","type":"heading_1","heading_1":{"rich_text":[...]}}`.

use crate::model::block::{Block, TextRun};
use crate::model::task::{BoardRow, TaskStatus};
use serde_json::{json, Map, Value};

pub const TITLE_PROPERTY: &str = "Task";
pub const ASSIGNEE_PROPERTY: &str = "Assignee";
pub const DUE_PROPERTY: &str = "Due";
pub const STATUS_PROPERTY: &str = "Status";

/// Body of a page title update.
pub fn title_update_body(title: &str) -> Value {
    json!({
        "properties": {
            "title": [{ "text": { "content": title } }]
        }
    })
}

/// Body of a document creation call under a parent page.
pub fn new_page_body(parent_ref: &str, title: &str) -> Value {
    json!({
        "parent": { "page_id": parent_ref },
        "properties": {
            "title": [{ "text": { "content": title } }]
        }
    })
}

/// Body of one append-children call.
pub fn append_children_body(blocks: &[Block]) -> Value {
    json!({ "children": blocks.iter().map(block_to_json).collect::<Vec<_>>() })
}

pub fn block_to_json(block: &Block) -> Value {
    match block {
        Block::Heading { level, runs } => {
            let kind = format!("heading_{}", level.depth());
            let mut object = Map::new();
            object.insert("object".to_string(), json!("block"));
            object.insert("type".to_string(), json!(kind));
            object.insert(kind, json!({ "rich_text": rich_text(runs) }));
            Value::Object(object)
        }
        Block::Divider => json!({
            "object": "block",
            "type": "divider",
            "divider": {}
        }),
        Block::Paragraph { runs } => json!({
            "object": "block",
            "type": "paragraph",
            "paragraph": { "rich_text": rich_text(runs) }
        }),
    }
}

fn rich_text(runs: &[TextRun]) -> Vec<Value> {
    runs.iter()
        .map(|run| {
            let mut value = json!({
                "type": "text",
                "text": { "content": run.text }
            });
            if run.bold {
                value["annotations"] = json!({ "bold": true });
            }
            value
        })
        .collect()
}

/// Body of the task board container creation call.
///
/// The due-date column is part of the schema but never populated.
pub fn board_schema_body(parent_ref: &str, title: &str) -> Value {
    let options: Vec<Value> = TaskStatus::ALL
        .iter()
        .map(|status| json!({ "name": status.board_label(), "color": status.board_color() }))
        .collect();

    json!({
        "parent": { "page_id": parent_ref },
        "title": [{ "text": { "content": title } }],
        "properties": {
            TITLE_PROPERTY: { "title": {} },
            ASSIGNEE_PROPERTY: { "rich_text": {} },
            DUE_PROPERTY: { "date": {} },
            STATUS_PROPERTY: { "select": { "options": options } }
        }
    })
}

/// Row field values shared by insert and update calls.
pub fn row_properties(row: &BoardRow) -> Value {
    json!({
        TITLE_PROPERTY: { "title": [{ "text": { "content": row.description } }] },
        ASSIGNEE_PROPERTY: { "rich_text": [{ "text": { "content": row.assignee } }] },
        STATUS_PROPERTY: { "select": { "name": row.status.board_label() } }
    })
}

pub fn insert_row_body(container_ref: &str, row: &BoardRow) -> Value {
    json!({
        "parent": { "database_id": container_ref },
        "properties": row_properties(row)
    })
}

pub fn update_row_body(row: &BoardRow) -> Value {
    json!({ "properties": row_properties(row) })
}

/// Extracts the `id` of a created object.
pub fn created_id(response: &Value) -> Option<String> {
    response
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
}
