/*
 * The contents of this file are subject to the terms of the
 * Common Development and Distribution License, Version 1.0 only
 * (the "License").  You may not use this file except in compliance
 * with the License.
 *
 * See the file LICENSE in this distribution for details.
 * A copy of the CDDL is also available via the Internet at
 * http://www.opensource.org/licenses/cddl1.txt
 *
 * When distributing Covered Code, include this CDDL HEADER in each
 * file and include the contents of the LICENSE file from this
 * distribution.
 */

// Yet Another Channel Lister
// - walker.rs file -

// YouTube's internal JSON has no stable schema. Every lookup in it goes
// through this module: paths that used to work are kept as fallbacks, new
// ones are prepended, and a miss is always "absent", never an error.

use serde_json::Value;

// One step into the object graph.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    // Descend into a mapping by key.
    Key(&'static str),
    // Descend into the first element of a sequence.
    First,
}

// Walks <path> into <value>. Returns None as soon as a step does not apply.
pub fn resolve<'a>(value: &'a Value, path: &[Step]) -> Option<&'a Value> {
    let mut current = value;
    for step in path {
        current = match step {
            Step::Key(key) => current.get(key)?,
            Step::First => current.get(0)?,
        };
    }
    Some(current)
}

// Tries every candidate path in order; the first one that resolves wins.
pub fn find_first<'a>(value: &'a Value, candidates: &[&[Step]]) -> Option<&'a Value> {
    candidates
        .iter()
        .find_map(|path| resolve(value, path))
}

// Depth-first search for <key> anywhere below <value>. Used where YouTube
// moves a renderer around between schema versions and the exact nesting
// cannot be relied on.
pub fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => {
            if let Some(found) = map.get(key) {
                return Some(found);
            }
            map.values().find_map(|child| find_key(child, key))
        }
        Value::Array(items) => items.iter().find_map(|child| find_key(child, key)),
        _ => None,
    }
}

// Flattens YouTube's text objects. These come in two shapes:
//   {"simpleText": "3 weeks ago"}
//   {"runs": [{"text": "Some"}, {"text": " title"}]}
pub fn text_of(value: &Value) -> Option<String> {
    if let Some(text) = value.as_str() {
        return Some(text.to_string());
    }
    if let Some(simple) = value.get("simpleText").and_then(Value::as_str) {
        return Some(simple.to_string());
    }
    if let Some(runs) = value.get("runs").and_then(Value::as_array) {
        let joined: String = runs
            .iter()
            .filter_map(|run| run.get("text").and_then(Value::as_str))
            .collect();
        return Some(joined);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_descends_keys_and_sequences() {
        let value = json!({"a": {"b": [{"c": 42}]}});
        let path = [Step::Key("a"), Step::Key("b"), Step::First, Step::Key("c")];
        assert_eq!(resolve(&value, &path), Some(&json!(42)));
    }

    #[test]
    fn resolve_is_absent_on_any_missing_step() {
        let value = json!({"a": {"b": []}});
        assert_eq!(resolve(&value, &[Step::Key("a"), Step::Key("x")]), None);
        assert_eq!(
            resolve(&value, &[Step::Key("a"), Step::Key("b"), Step::First]),
            None
        );
    }

    #[test]
    fn find_first_falls_through_to_later_candidates() {
        // Only the second of three candidate paths matches.
        let value = json!({"newShape": {"token": "tok"}});
        let candidates: &[&[Step]] = &[
            &[Step::Key("oldShape"), Step::Key("token")],
            &[Step::Key("newShape"), Step::Key("token")],
            &[Step::Key("evenNewerShape")],
        ];
        assert_eq!(find_first(&value, candidates), Some(&json!("tok")));
    }

    #[test]
    fn find_first_is_absent_when_nothing_matches() {
        let value = json!({"unrelated": true});
        let candidates: &[&[Step]] = &[&[Step::Key("a")], &[Step::Key("b"), Step::First]];
        assert_eq!(find_first(&value, candidates), None);
    }

    #[test]
    fn find_key_searches_nested_objects_and_arrays() {
        let value = json!({
            "outer": [{"middle": {"richGridRenderer": {"contents": []}}}]
        });
        assert_eq!(
            find_key(&value, "richGridRenderer"),
            Some(&json!({"contents": []}))
        );
        assert_eq!(find_key(&value, "absent"), None);
    }

    #[test]
    fn text_of_handles_both_text_shapes() {
        assert_eq!(
            text_of(&json!({"simpleText": "3 weeks ago"})),
            Some("3 weeks ago".to_string())
        );
        assert_eq!(
            text_of(&json!({"runs": [{"text": "Some"}, {"text": " title"}]})),
            Some("Some title".to_string())
        );
        assert_eq!(text_of(&json!("plain")), Some("plain".to_string()));
        assert_eq!(text_of(&json!({"neither": 1})), None);
    }
}
