use serde_json::json;

use super::*;

// =============================================================================
// strip_code_fences
// =============================================================================

#[test]
fn strips_json_tagged_fence() {
    assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
}

#[test]
fn strips_untagged_fence() {
    assert_eq!(strip_code_fences("  ```\n{\"a\":1}\n```  \n"), "{\"a\":1}");
}

#[test]
fn leaves_bare_json_alone() {
    assert_eq!(strip_code_fences(" {\"a\":1} "), "{\"a\":1}");
}

#[test]
fn strips_closing_fence_without_opening() {
    assert_eq!(strip_code_fences("{\"a\":1}\n```"), "{\"a\":1}");
}

// =============================================================================
// parse_reply
// =============================================================================

#[test]
fn fenced_reply_parses_like_bare_reply() {
    let bare = r#"{"summary":"S","milestones":[]}"#;
    let fenced = format!("```json\n{bare}\n```");
    assert_eq!(parse_reply(&fenced).unwrap(), parse_reply(bare).unwrap());
}

#[test]
fn invalid_json_keeps_preview() {
    let err = parse_reply("Sure! Here is your summary: {oops").unwrap_err();
    let ResponseParseError::InvalidJson { preview, .. } = &err else {
        panic!("expected InvalidJson");
    };
    assert_eq!(preview, "Sure! Here is your summary: {oops");
    assert!(err.to_string().contains("Sure! Here is your summary"));
}

#[test]
fn preview_is_truncated_to_limit() {
    let long = "x".repeat(PREVIEW_CHARS * 2);
    let Err(ResponseParseError::InvalidJson { preview, .. }) = parse_reply(&long) else {
        panic!("expected InvalidJson");
    };
    assert_eq!(preview.chars().count(), PREVIEW_CHARS);
}

#[test]
fn preview_counts_characters_not_bytes() {
    let text = "가".repeat(PREVIEW_CHARS + 10);
    assert_eq!(preview(&text).chars().count(), PREVIEW_CHARS);
}

#[test]
fn empty_and_whitespace_replies_are_parse_errors() {
    assert!(matches!(parse_reply(""), Err(ResponseParseError::InvalidJson { .. })));
    assert!(matches!(parse_reply("   \n "), Err(ResponseParseError::InvalidJson { .. })));
    assert!(matches!(parse_reply("```json\n```"), Err(ResponseParseError::InvalidJson { .. })));
}

// =============================================================================
// lenient_decode
// =============================================================================

#[test]
fn decode_full_example() {
    let data = json!({
        "milestones": [{ "task": "A", "deadline": "B" }],
        "actionItemsByRole": { "PM": ["x"] },
        "summary": "S"
    });
    let response = lenient_decode(data).unwrap();
    assert_eq!(response.summary, "S");
    assert_eq!(response.milestones, vec![Milestone { task: "A".into(), deadline: "B".into() }]);
    assert_eq!(
        response.action_items_by_role,
        ActionItemsByRole { pm: vec!["x".into()], ..ActionItemsByRole::default() }
    );
}

#[test]
fn decode_empty_object_defaults_everything() {
    let response = lenient_decode(json!({})).unwrap();
    assert_eq!(response.summary, "");
    assert!(response.milestones.is_empty());
    assert_eq!(response.action_items_by_role, ActionItemsByRole::default());
}

#[test]
fn decode_null_fields_default() {
    let data = json!({ "summary": null, "milestones": null, "actionItemsByRole": { "BE": null } });
    let response = lenient_decode(data).unwrap();
    assert_eq!(response.summary, "");
    assert!(response.milestones.is_empty());
    assert!(response.action_items_by_role.be.is_empty());
}

#[test]
fn decode_accepts_snake_case_roles_key() {
    let response = lenient_decode(json!({ "action_items_by_role": { "AI": ["tune"] } })).unwrap();
    assert_eq!(response.action_items_by_role.ai, vec!["tune".to_string()]);
}

#[test]
fn decode_ignores_unknown_roles_and_fields() {
    let data = json!({ "title": "x", "actionItemsByRole": { "QA": ["test"], "ALL": ["sync"] } });
    let response = lenient_decode(data).unwrap();
    assert_eq!(response.action_items_by_role.all, vec!["sync".to_string()]);
}

#[test]
fn decode_milestone_missing_deadline_carries_data() {
    let data = json!({ "milestones": [{ "task": "A" }] });
    let err = lenient_decode(data.clone()).unwrap_err();
    let ResponseParseError::Conversion { reason, data: carried } = &err else {
        panic!("expected Conversion");
    };
    assert!(reason.contains("milestones[0]: missing field 'deadline'"));
    assert_eq!(carried, &data);
}

#[test]
fn decode_non_object_root_fails() {
    let err = lenient_decode(json!([1, 2])).unwrap_err();
    assert!(err.to_string().contains("expected a JSON object, got array"));
}

#[test]
fn decode_mistyped_fields_fail() {
    assert!(lenient_decode(json!({ "summary": 3 })).is_err());
    assert!(lenient_decode(json!({ "milestones": {} })).is_err());
    assert!(lenient_decode(json!({ "actionItemsByRole": [] })).is_err());
    assert!(lenient_decode(json!({ "actionItemsByRole": { "PM": "x" } })).is_err());
    assert!(lenient_decode(json!({ "actionItemsByRole": { "PM": [1] } })).is_err());
    assert!(lenient_decode(json!({ "milestones": [{ "task": 1, "deadline": "B" }] })).is_err());
}
