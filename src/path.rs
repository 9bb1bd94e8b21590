//! Property-path access into untyped translation records.
//!
//! Typed items address their fields through [`EntitySchema`](crate::EntitySchema)
//! accessors; records (`serde_json::Value` objects) are addressed with a
//! property path instead. Both `.` and `[...]` notation resolve object keys,
//! so `"lang"`, `"[lang]"` and `"attributes.lang"` are all valid paths. A
//! bracket segment made of digits resolves as an index when the value it is
//! applied to is an array.

use serde_json::{
    Map,
    Value,
};

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("Property path is empty")]
    Empty,

    #[error("Unclosed '[' in property path '{path}'")]
    UnclosedBracket { path: String },

    #[error("Empty segment in property path '{path}'")]
    EmptySegment { path: String },

    #[error("Segment '{segment}' of property path '{path}' does not resolve")]
    Unresolved { path: String, segment: String },

    #[error("Segment '{segment}' of property path '{path}' addresses a non-container value")]
    NotAContainer { path: String, segment: String },
}

/// A parsed property path, reusable across many get/set calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    raw: String,
    segments: Vec<String>,
}

impl PropertyPath {
    /// Parses a property path such as `"lang"`, `"[lang]"` or `"meta.tags[0]"`.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = Vec::new();
        let mut rest = path;

        loop {
            if let Some(after_bracket) = rest.strip_prefix('[') {
                let Some((segment, remainder)) = after_bracket.split_once(']') else {
                    return Err(PathError::UnclosedBracket { path: path.to_string() });
                };
                if segment.is_empty() {
                    return Err(PathError::EmptySegment { path: path.to_string() });
                }
                segments.push(segment.to_string());
                rest = remainder;
            } else {
                let split_at = rest.find(['.', '[']).unwrap_or(rest.len());
                let (segment, remainder) = rest.split_at(split_at);
                if segment.is_empty() {
                    return Err(PathError::EmptySegment { path: path.to_string() });
                }
                segments.push(segment.to_string());
                rest = remainder;
            }

            if rest.is_empty() {
                break;
            }

            // A '.' separates the next segment; a '[' starts one directly.
            if let Some(remainder) = rest.strip_prefix('.') {
                if remainder.is_empty() {
                    return Err(PathError::EmptySegment { path: path.to_string() });
                }
                rest = remainder;
            }
        }

        Ok(Self { raw: path.to_string(), segments })
    }

    /// The path string this value was parsed from.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Resolves the path against a value.
    pub fn get<'a>(&self, value: &'a Value) -> Result<&'a Value, PathError> {
        let mut node = value;
        for segment in &self.segments {
            node = match node {
                Value::Object(map) => map.get(segment).ok_or_else(|| self.unresolved(segment))?,
                Value::Array(items) => {
                    let index = self.array_index(segment)?;
                    items.get(index).ok_or_else(|| self.unresolved(segment))?
                }
                _ => return Err(self.not_a_container(segment)),
            };
        }
        Ok(node)
    }

    /// Writes a value at the path.
    ///
    /// Missing intermediate object keys are created along the way, so a locale
    /// can be written into a fresh empty record. Array indexes are never
    /// created, only overwritten.
    pub fn set(&self, value: &mut Value, new_value: Value) -> Result<(), PathError> {
        let Some((last, parents)) = self.segments.split_last() else {
            return Err(PathError::Empty);
        };

        let mut node = value;
        for segment in parents {
            node = match node {
                Value::Object(map) => map
                    .entry(segment.clone())
                    .or_insert_with(|| Value::Object(Map::new())),
                Value::Array(items) => {
                    let index = self.array_index(segment)?;
                    items.get_mut(index).ok_or_else(|| self.unresolved(segment))?
                }
                _ => return Err(self.not_a_container(segment)),
            };
        }

        match node {
            Value::Object(map) => {
                map.insert(last.clone(), new_value);
                Ok(())
            }
            Value::Array(items) => {
                let index = self.array_index(last)?;
                let slot = items.get_mut(index).ok_or_else(|| self.unresolved(last))?;
                *slot = new_value;
                Ok(())
            }
            _ => Err(self.not_a_container(last)),
        }
    }

    /// Interprets a segment as an array index.
    fn array_index(&self, segment: &str) -> Result<usize, PathError> {
        segment.parse().map_err(|_| self.unresolved(segment))
    }

    /// Builds an [`PathError::Unresolved`] for a segment of this path.
    fn unresolved(&self, segment: &str) -> PathError {
        PathError::Unresolved { path: self.raw.clone(), segment: segment.to_string() }
    }

    /// Builds an [`PathError::NotAContainer`] for a segment of this path.
    fn not_a_container(&self, segment: &str) -> PathError {
        PathError::NotAContainer { path: self.raw.clone(), segment: segment.to_string() }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case::plain("lang", vec!["lang"])]
    #[case::bracket("[lang]", vec!["lang"])]
    #[case::dotted("attributes.lang", vec!["attributes", "lang"])]
    #[case::mixed("meta.tags[0]", vec!["meta", "tags", "0"])]
    #[case::bracket_chain("[meta][lang]", vec!["meta", "lang"])]
    fn parse_segments(#[case] path: &str, #[case] expected: Vec<&str>) {
        let parsed = PropertyPath::parse(path).unwrap();

        assert_that!(parsed.segments, eq(&expected.into_iter().map(String::from).collect::<Vec<_>>()));
        assert_that!(parsed.raw(), eq(path));
    }

    #[rstest]
    fn parse_empty_path() {
        assert_that!(PropertyPath::parse(""), err(matches_pattern!(PathError::Empty)));
    }

    #[rstest]
    fn parse_unclosed_bracket() {
        assert_that!(
            PropertyPath::parse("meta[lang"),
            err(matches_pattern!(PathError::UnclosedBracket { .. }))
        );
    }

    #[rstest]
    #[case::empty_bracket("meta[]")]
    #[case::trailing_dot("meta.")]
    #[case::leading_dot(".lang")]
    fn parse_empty_segment(#[case] path: &str) {
        assert_that!(
            PropertyPath::parse(path),
            err(matches_pattern!(PathError::EmptySegment { .. }))
        );
    }

    #[rstest]
    fn get_object_key() {
        let record = json!({"lang": "en", "title": "Hello"});
        let path = PropertyPath::parse("lang").unwrap();

        assert_that!(path.get(&record).unwrap(), eq(&json!("en")));
    }

    #[rstest]
    fn get_nested_array_element() {
        let record = json!({"meta": {"tags": ["a", "b"]}});
        let path = PropertyPath::parse("meta.tags[1]").unwrap();

        assert_that!(path.get(&record).unwrap(), eq(&json!("b")));
    }

    #[rstest]
    fn get_missing_key_is_unresolved() {
        let record = json!({"title": "Hello"});
        let path = PropertyPath::parse("lang").unwrap();

        assert_that!(
            path.get(&record),
            err(matches_pattern!(PathError::Unresolved { segment: eq("lang"), .. }))
        );
    }

    #[rstest]
    fn get_through_scalar_is_not_a_container() {
        let record = json!({"lang": "en"});
        let path = PropertyPath::parse("lang.region").unwrap();

        assert_that!(
            path.get(&record),
            err(matches_pattern!(PathError::NotAContainer { segment: eq("region"), .. }))
        );
    }

    #[rstest]
    fn set_creates_key_on_empty_record() {
        let mut record = json!({});
        let path = PropertyPath::parse("lang").unwrap();

        path.set(&mut record, json!("lt")).unwrap();

        assert_that!(record, eq(&json!({"lang": "lt"})));
    }

    #[rstest]
    fn set_creates_intermediate_objects() {
        let mut record = json!({});
        let path = PropertyPath::parse("attributes.lang").unwrap();

        path.set(&mut record, json!("en")).unwrap();

        assert_that!(record, eq(&json!({"attributes": {"lang": "en"}})));
    }

    #[rstest]
    fn set_overwrites_array_element() {
        let mut record = json!({"tags": ["a", "b"]});
        let path = PropertyPath::parse("tags[0]").unwrap();

        path.set(&mut record, json!("c")).unwrap();

        assert_that!(record, eq(&json!({"tags": ["c", "b"]})));
    }

    #[rstest]
    fn set_out_of_bounds_index_is_unresolved() {
        let mut record = json!({"tags": ["a"]});
        let path = PropertyPath::parse("tags[5]").unwrap();

        assert_that!(
            path.set(&mut record, json!("x")),
            err(matches_pattern!(PathError::Unresolved { segment: eq("5"), .. }))
        );
    }
}
