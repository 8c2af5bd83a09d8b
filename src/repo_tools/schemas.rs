use serde_json::{json, Value};

pub fn status_schema() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

pub fn auto_commit_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "custom_message": {
                "type": "string",
                "description": "Commit message to use instead of the generated one (optional)"
            }
        },
        "required": []
    })
}

pub fn commit_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "message": {
                "type": "string",
                "description": "Commit message"
            },
            "push": {
                "type": "boolean",
                "description": "Push to the remote after committing (default: true)",
                "default": true
            }
        },
        "required": ["message"]
    })
}

pub fn diff_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "file": {
                "type": "string",
                "description": "Repository-relative file path (optional, whole tree when omitted)"
            }
        },
        "required": []
    })
}
