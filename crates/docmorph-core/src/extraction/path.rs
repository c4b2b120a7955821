//! Output path construction and parsing

use crate::types::{Rule, Segment};

/// One step of a dotted output path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'p> {
    /// Object member
    Key(&'p str),
    /// Array position
    Index(usize),
}

/// Build the concrete output path for a match at `location`
///
/// The last `retain_path_depth` location segments are appended to the
/// rule's target, so `$.a.*.x` with depth 2 writes `a.b.x` under `z` as
/// `z.b.x`.
pub fn build_target_path(rule: &Rule, location: &[Segment]) -> String {
    let depth = rule.retain_path_depth.unwrap_or(0);
    if depth == 0 || location.is_empty() {
        return rule.target.clone();
    }

    let start = location.len().saturating_sub(depth);
    let suffix = location[start..]
        .iter()
        .map(Segment::to_string)
        .collect::<Vec<_>>()
        .join(".");

    if rule.target.is_empty() {
        suffix
    } else {
        format!("{}.{}", rule.target, suffix)
    }
}

/// Split a dotted output path into segments
///
/// A segment made only of ASCII digits addresses an array position; any
/// other segment, including an empty one, is an object key.
pub fn parse_output_path(path: &str) -> Vec<PathSegment<'_>> {
    if path.is_empty() {
        return Vec::new();
    }

    path.split('.')
        .map(|segment| {
            let numeric = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
            match segment.parse::<usize>() {
                Ok(index) if numeric => PathSegment::Index(index),
                _ => PathSegment::Key(segment),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(parts: &[&str]) -> Vec<Segment> {
        parts
            .iter()
            .map(|p| match p.parse::<usize>() {
                Ok(i) => Segment::Index(i),
                Err(_) => Segment::Key(p.to_string()),
            })
            .collect()
    }

    #[test]
    fn test_depth_absent_or_zero() {
        let loc = location(&["a", "b", "x"]);
        assert_eq!(build_target_path(&Rule::new("$.a.*.x", "z"), &loc), "z");
        assert_eq!(
            build_target_path(&Rule::new("$.a.*.x", "z").with_retain_path_depth(0), &loc),
            "z"
        );
    }

    #[test]
    fn test_depth_takes_trailing_segments() {
        let loc = location(&["a", "b", "x"]);
        let rule = Rule::new("$.a.*.x", "z").with_retain_path_depth(2);
        assert_eq!(build_target_path(&rule, &loc), "z.b.x");
    }

    #[test]
    fn test_depth_longer_than_location() {
        let loc = location(&["users", "0"]);
        let rule = Rule::new("$.users[0]", "out").with_retain_path_depth(10);
        assert_eq!(build_target_path(&rule, &loc), "out.users.0");
    }

    #[test]
    fn test_empty_location_keeps_target() {
        let rule = Rule::new("$", "whole").with_retain_path_depth(3);
        assert_eq!(build_target_path(&rule, &[]), "whole");
    }

    #[test]
    fn test_empty_target_uses_suffix() {
        let rule = Rule::new("$.a.*", "").with_retain_path_depth(1);
        assert_eq!(build_target_path(&rule, &location(&["a", "k"])), "k");
    }

    #[test]
    fn test_parse_output_path() {
        assert_eq!(
            parse_output_path("c.b.1"),
            vec![PathSegment::Key("c"), PathSegment::Key("b"), PathSegment::Index(1)]
        );
        assert_eq!(
            parse_output_path("a..-1"),
            vec![PathSegment::Key("a"), PathSegment::Key(""), PathSegment::Key("-1")]
        );
        assert_eq!(
            parse_output_path("x.1e3.+2"),
            vec![PathSegment::Key("x"), PathSegment::Key("1e3"), PathSegment::Key("+2")]
        );
        assert!(parse_output_path("").is_empty());
    }
}
