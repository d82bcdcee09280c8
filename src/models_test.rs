use serde_json::json;

use super::*;

#[test]
fn response_serializes_camel_case_roles() {
    let response = SummaryResponse {
        summary: "S".into(),
        milestones: vec![Milestone { task: "A".into(), deadline: "B".into() }],
        action_items_by_role: ActionItemsByRole { pm: vec!["x".into()], ..ActionItemsByRole::default() },
    };
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(
        value,
        json!({
            "summary": "S",
            "milestones": [{ "task": "A", "deadline": "B" }],
            "actionItemsByRole": { "PM": ["x"], "PD": [], "FE": [], "BE": [], "AI": [], "ALL": [] }
        })
    );
}

#[test]
fn response_deserialize_defaults_missing_roles_and_fields() {
    let response: SummaryResponse = serde_json::from_value(json!({ "actionItemsByRole": { "FE": ["ui"] } })).unwrap();
    assert_eq!(response.summary, "");
    assert!(response.milestones.is_empty());
    assert_eq!(response.action_items_by_role.fe, vec!["ui".to_string()]);
    assert!(response.action_items_by_role.all.is_empty());
}

#[test]
fn response_deserialize_accepts_snake_case_alias() {
    let response: SummaryResponse =
        serde_json::from_value(json!({ "summary": "s", "action_items_by_role": { "ALL": ["a"] } })).unwrap();
    assert_eq!(response.action_items_by_role.all, vec!["a".to_string()]);
}

#[test]
fn response_deserialize_requires_action_items() {
    let result = serde_json::from_value::<SummaryResponse>(json!({ "summary": "s", "milestones": [] }));
    assert!(result.is_err());
}

#[test]
fn request_provider_is_optional() {
    let req: SummaryRequest = serde_json::from_value(json!({ "meeting_content": "notes" })).unwrap();
    assert_eq!(req.meeting_content, "notes");
    assert!(req.provider.is_none());
}

#[test]
fn role_mut_covers_every_role_key() {
    let mut items = ActionItemsByRole::default();
    for key in ROLE_KEYS {
        items.role_mut(key).unwrap().push(key.to_string());
    }
    assert_eq!(items.pm, vec!["PM".to_string()]);
    assert_eq!(items.all, vec!["ALL".to_string()]);
    assert!(items.role_mut("QA").is_none());
}

#[test]
fn schema_requires_all_roles() {
    let schema = summary_output_schema();
    assert_eq!(schema.name, "meeting_summary");
    let roles = &schema.schema["properties"]["actionItemsByRole"];
    assert_eq!(roles["required"], json!(["PM", "PD", "FE", "BE", "AI", "ALL"]));
    for key in ROLE_KEYS {
        assert_eq!(roles["properties"][key]["type"], "array");
    }
    assert_eq!(schema.schema["properties"]["milestones"]["items"]["required"], json!(["task", "deadline"]));
}
