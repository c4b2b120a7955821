//! Writing values into the output document

use super::path::{parse_output_path, PathSegment};
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Largest number of `null` holes a single write may add to an array
pub const MAX_ARRAY_GAP: usize = 1 << 16;

/// Set `value` at the dotted `path` inside `document`
///
/// Missing containers are created on the way down: an array when the
/// segment is numeric, an object otherwise. A container of the wrong kind
/// (or a scalar) in the way is replaced by a fresh one. Arrays grow to
/// reach the requested position and the gap is filled with `null`. An
/// empty path replaces the whole document.
///
/// Fails with [`Error::InvalidTarget`] when an index lies more than
/// [`MAX_ARRAY_GAP`] positions past the end of its array.
pub fn assign(document: &mut Value, path: &str, value: Value) -> Result<()> {
    let mut slot = document;
    for segment in parse_output_path(path) {
        slot = match segment {
            PathSegment::Key(key) => ensure_object(slot)
                .entry(key.to_string())
                .or_insert(Value::Null),
            PathSegment::Index(index) => {
                let array = ensure_array(slot);
                if array.len() <= index {
                    let new_len = grown_len(array.len(), index).ok_or_else(|| {
                        Error::invalid_target(
                            path,
                            format!(
                                "index {} is more than {} past the end of an array of length {}",
                                index,
                                MAX_ARRAY_GAP,
                                array.len()
                            ),
                        )
                    })?;
                    array.resize(new_len, Value::Null);
                }
                &mut array[index]
            }
        };
    }
    *slot = value;
    Ok(())
}

/// Array length needed to hold `index`, if within the gap limit
fn grown_len(len: usize, index: usize) -> Option<usize> {
    let new_len = index.checked_add(1)?;
    (new_len - len <= MAX_ARRAY_GAP).then_some(new_len)
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced by an object"),
    }
}

fn ensure_array(node: &mut Value) -> &mut Vec<Value> {
    if !node.is_array() {
        *node = Value::Array(Vec::new());
    }
    match node {
        Value::Array(array) => array,
        _ => unreachable!("node was just replaced by an array"),
    }
}
