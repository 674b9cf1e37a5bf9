//! Structural merge of the remote analysis result into a cached
//! project snapshot.
//!
//! The remote service assigns its own file identifiers. Records are
//! matched by display name; every `fileId` / `relatedFileIds` reference
//! inside the summary tree is rewritten into the local identifier
//! space. Unmapped identifiers pass through unchanged.

use std::collections::HashMap;

use serde_json::Value;

use crate::models::ProjectSnapshot;

/// Merge the remote result into the snapshot. Returns the number of
/// remote→local id mappings established.
pub fn merge_remote_result(snapshot: &mut ProjectSnapshot, remote: &Value) -> usize {
    // A non-empty remote project name wins over the folder-derived one.
    if let Some(name) = remote.get("name").and_then(Value::as_str) {
        if !name.is_empty() {
            snapshot.name = name.to_string();
        }
    }

    let remote_files = index_remote_files(remote);
    let mut id_map: HashMap<String, String> = HashMap::new();

    for record in &mut snapshot.files {
        let Some(remote_record) = remote_files.get(record.name.as_str()) else {
            continue;
        };
        if let Some(remote_id) = remote_record.get("id").and_then(Value::as_str) {
            id_map.insert(remote_id.to_string(), record.id.clone());
        }
        if let Some(summary) = remote_record.get("summary").and_then(Value::as_str) {
            if !summary.is_empty() {
                record.summary = summary.to_string();
            }
        }
        if let Some(keywords) = string_list(remote_record.get("keywords")) {
            if !keywords.is_empty() {
                record.keywords = keywords;
            }
        }
        if let Some(parties) = string_list(remote_record.get("parties")) {
            if !parties.is_empty() {
                record.parties = parties;
            }
        }
    }

    let mut summary = remote
        .get("summary")
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()));
    if !id_map.is_empty() {
        remap_file_ids(&mut summary, &id_map);
    }
    snapshot.summary = Some(summary);

    id_map.len()
}

/// Build a name → record index over the remote file tree. Remote
/// results may nest records one level under folder groupings.
fn index_remote_files(remote: &Value) -> HashMap<&str, &Value> {
    let mut index = HashMap::new();
    let Some(folders) = remote.get("files").and_then(Value::as_array) else {
        return index;
    };
    for folder in folders {
        if let Some(children) = folder.get("children").and_then(Value::as_array) {
            for child in children {
                if let Some(name) = child.get("name").and_then(Value::as_str) {
                    index.insert(name, child);
                }
            }
        } else if let Some(name) = folder.get("name").and_then(Value::as_str) {
            index.insert(name, folder);
        }
    }
    index
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

/// Rewrite `fileId` scalars and `relatedFileIds` list entries at any
/// nesting depth. Ids without a mapping are left as-is.
fn remap_file_ids(value: &mut Value, id_map: &HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(file_id)) = map.get_mut("fileId") {
                if let Some(local) = id_map.get(file_id.as_str()) {
                    *file_id = local.clone();
                }
            }
            if let Some(Value::Array(related)) = map.get_mut("relatedFileIds") {
                for entry in related.iter_mut() {
                    if let Value::String(file_id) = entry {
                        if let Some(local) = id_map.get(file_id.as_str()) {
                            *file_id = local.clone();
                        }
                    }
                }
            }
            for (_, nested) in map.iter_mut() {
                remap_file_ids(nested, id_map);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                remap_file_ids(item, id_map);
            }
        }
        _ => {}
    }
}
