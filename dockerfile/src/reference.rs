//! Image reference parsing.
//!
//! Splits image paths like `example.com:8080/team/app:1.2.3` into structured
//! components and renders them back. Unlike a registry client, no defaults
//! are filled in: whatever was not written is left empty, so rendering a
//! parsed reference reproduces the text it came from.

use dfpatch_core::error::{DfError, Result};
use serde::{Deserialize, Serialize};

/// Parsed image reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    /// Registry hostname (only recognized together with a port)
    pub registry: Option<String>,
    /// Registry port (e.g., "5000")
    pub port: Option<String>,
    /// Namespace or username (e.g., "library", "myorg")
    pub namespace: Option<String>,
    /// Repository name; may contain `/` for deeper paths
    pub repository: String,
    /// Tag (e.g., "1.2.3"); anything after the first colon of the name
    pub tag: Option<String>,
    /// Opaque content-addressed identifier; overrides every other field
    pub id: Option<String>,
}

/// The final part of a path: either `repository[:tag]` or a bare id.
#[derive(Debug, PartialEq, Eq)]
enum Body<'a> {
    Named {
        repository: &'a str,
        tag: Option<&'a str>,
    },
    Id(&'a str),
}

impl ImageReference {
    /// Parse an image path.
    ///
    /// Grammar, tried left to right with the first full match winning:
    /// - optional `host:port/` (host excludes `:` and `/`, port is digits)
    /// - optional `namespace/` (excludes `/`)
    /// - `repository[:tag]` (repository excludes `:`, tag excludes `/`),
    ///   or else a bare `id` (excludes `/`)
    ///
    /// A `host/` without a port is read as a namespace, and the repository
    /// keeps any further slashes: `ghcr.io/org/app` has namespace `ghcr.io`
    /// and repository `org/app`.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(DfError::InvalidImageReference(
                "empty image path".to_string(),
            ));
        }

        let mut candidates = Vec::with_capacity(2);
        if let Some((host, port, rest)) = split_host_port(path) {
            candidates.push((Some((host, port)), rest));
        }
        candidates.push((None, path));

        for (host, rest) in candidates {
            if let Some((namespace, body)) = split_namespace(rest) {
                if let Some(body) = match_body(body) {
                    return Ok(Self::assemble(host, Some(namespace), body));
                }
            }
            if let Some(body) = match_body(rest) {
                return Ok(Self::assemble(host, None, body));
            }
        }

        Err(DfError::InvalidImageReference(format!(
            "'{}' does not match [host:port/][namespace/]repository[:tag]",
            path
        )))
    }

    fn assemble(host: Option<(&str, &str)>, namespace: Option<&str>, body: Body<'_>) -> Self {
        let (registry, port) = match host {
            Some((h, p)) => (Some(h.to_string()), Some(p.to_string())),
            None => (None, None),
        };
        let namespace = namespace.map(str::to_string);

        match body {
            Body::Named { repository, tag } => ImageReference {
                registry,
                port,
                namespace,
                repository: repository.to_string(),
                tag: tag.map(str::to_string),
                id: None,
            },
            Body::Id(id) => ImageReference {
                registry,
                port,
                namespace,
                repository: String::new(),
                tag: None,
                id: Some(id.to_string()),
            },
        }
    }

    /// Render the reference back to path text.
    ///
    /// A non-empty `id` is returned verbatim. Otherwise fields are written
    /// in order, skipping empty ones; a port without a registry is dropped.
    pub fn render(&self) -> String {
        if let Some(id) = non_empty(&self.id) {
            return id.to_string();
        }

        let mut s = String::new();
        if let Some(registry) = non_empty(&self.registry) {
            s.push_str(registry);
            if let Some(port) = non_empty(&self.port) {
                s.push(':');
                s.push_str(port);
            }
            s.push('/');
        }
        if let Some(namespace) = non_empty(&self.namespace) {
            s.push_str(namespace);
            s.push('/');
        }
        s.push_str(&self.repository);
        if let Some(tag) = non_empty(&self.tag) {
            s.push(':');
            s.push_str(tag);
        }
        s
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl std::str::FromStr for ImageReference {
    type Err = DfError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Split a leading `host:port/`. Host and port are both required.
fn split_host_port(path: &str) -> Option<(&str, &str, &str)> {
    let sep = path.find([':', '/'])?;
    if sep == 0 || !path[sep..].starts_with(':') {
        return None;
    }
    let host = &path[..sep];
    let after = &path[sep + 1..];

    let digits = after.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || !after[digits..].starts_with('/') {
        return None;
    }
    Some((host, &after[..digits], &after[digits + 1..]))
}

/// Split a leading `namespace/`.
fn split_namespace(path: &str) -> Option<(&str, &str)> {
    match path.find('/') {
        Some(0) | None => None,
        Some(pos) => Some((&path[..pos], &path[pos + 1..])),
    }
}

/// Match the remainder as `repository[:tag]`, falling back to a bare id.
fn match_body(body: &str) -> Option<Body<'_>> {
    if body.is_empty() {
        return None;
    }

    match body.find(':') {
        None => {
            return Some(Body::Named {
                repository: body,
                tag: None,
            })
        }
        Some(pos) if pos > 0 => {
            let tag = &body[pos + 1..];
            if !tag.is_empty() && !tag.contains('/') {
                return Some(Body::Named {
                    repository: &body[..pos],
                    tag: Some(tag),
                });
            }
        }
        Some(_) => {}
    }

    if body.contains('/') {
        None
    } else {
        Some(Body::Id(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_parse_full_path() {
        let r = ImageReference::parse("example.com:8080/myusername/myrepository:mytag").unwrap();
        assert_eq!(
            r,
            ImageReference {
                registry: some("example.com"),
                port: some("8080"),
                namespace: some("myusername"),
                repository: "myrepository".to_string(),
                tag: some("mytag"),
                id: None,
            }
        );
    }

    #[test]
    fn test_parse_empty() {
        let err = ImageReference::parse("").unwrap_err();
        assert!(matches!(err, DfError::InvalidImageReference(_)));
    }

    #[test]
    fn test_parse_simple_name() {
        let r = ImageReference::parse("alpine").unwrap();
        assert_eq!(r.repository, "alpine");
        assert_eq!(r.tag, None);
        assert_eq!(r.registry, None);
        assert_eq!(r.namespace, None);
        assert_eq!(r.id, None);
    }

    #[test]
    fn test_parse_name_with_tag() {
        let r = ImageReference::parse("base-image:1.2.3").unwrap();
        assert_eq!(r.repository, "base-image");
        assert_eq!(r.tag, some("1.2.3"));
    }

    #[test]
    fn test_parse_stage_alias_stays_in_tag() {
        let r = ImageReference::parse("my-image:1.2.3 as something").unwrap();
        assert_eq!(r.repository, "my-image");
        assert_eq!(r.tag, some("1.2.3 as something"));
    }

    #[test]
    fn test_parse_registry_without_port_is_namespace() {
        let r = ImageReference::parse("ghcr.io/kdwils/dockerfile:1.2.3").unwrap();
        assert_eq!(r.registry, None);
        assert_eq!(r.namespace, some("ghcr.io"));
        assert_eq!(r.repository, "kdwils/dockerfile");
        assert_eq!(r.tag, some("1.2.3"));
        assert_eq!(r.render(), "ghcr.io/kdwils/dockerfile:1.2.3");
    }

    #[test]
    fn test_parse_registry_with_port_no_namespace() {
        let r = ImageReference::parse("localhost:5000/app:v1").unwrap();
        assert_eq!(r.registry, some("localhost"));
        assert_eq!(r.port, some("5000"));
        assert_eq!(r.namespace, None);
        assert_eq!(r.repository, "app");
        assert_eq!(r.tag, some("v1"));
    }

    #[test]
    fn test_parse_port_must_be_numeric() {
        // "a:b/" cannot be host:port, so it becomes the namespace
        let r = ImageReference::parse("a:b/c").unwrap();
        assert_eq!(r.registry, None);
        assert_eq!(r.namespace, some("a:b"));
        assert_eq!(r.repository, "c");
    }

    #[test]
    fn test_parse_name_port_like_tag() {
        let r = ImageReference::parse("app:5000").unwrap();
        assert_eq!(r.registry, None);
        assert_eq!(r.repository, "app");
        assert_eq!(r.tag, some("5000"));
    }

    #[test]
    fn test_parse_tag_splits_at_first_colon() {
        let r = ImageReference::parse("app:1.0:extra").unwrap();
        assert_eq!(r.repository, "app");
        assert_eq!(r.tag, some("1.0:extra"));
    }

    #[test]
    fn test_parse_leading_colon_is_id() {
        let r = ImageReference::parse(":abc123").unwrap();
        assert_eq!(r.id, some(":abc123"));
        assert_eq!(r.repository, "");
    }

    #[test]
    fn test_parse_trailing_colon_is_id() {
        let r = ImageReference::parse("app:").unwrap();
        assert_eq!(r.id, some("app:"));
    }

    #[test]
    fn test_parse_tag_with_slash_fails() {
        assert!(ImageReference::parse("a/b:c/d").is_err());
    }

    #[test]
    fn test_parse_trailing_slash_kept_in_repository() {
        let r = ImageReference::parse("myorg/").unwrap();
        assert_eq!(r.namespace, None);
        assert_eq!(r.repository, "myorg/");
    }

    #[test]
    fn test_parse_only_slash_fails() {
        assert!(ImageReference::parse("/:x/").is_err());
    }

    #[test]
    fn test_from_str() {
        let r: ImageReference = "nginx:1.25".parse().unwrap();
        assert_eq!(r.repository, "nginx");
        assert_eq!(r.tag, some("1.25"));
    }

    #[test]
    fn test_render_id_overrides_everything() {
        let r = ImageReference {
            id: some("my-id"),
            registry: some("example.com"),
            repository: "ignored".to_string(),
            tag: some("ignored"),
            ..Default::default()
        };
        assert_eq!(r.render(), "my-id");
    }

    #[test]
    fn test_render_all_fields() {
        let r = ImageReference {
            registry: some("ghcr.io"),
            namespace: some("kdwils"),
            repository: "dockerfile".to_string(),
            tag: some("1.2.3"),
            ..Default::default()
        };
        assert_eq!(r.render(), "ghcr.io/kdwils/dockerfile:1.2.3");
    }

    #[test]
    fn test_render_port_without_registry_is_dropped() {
        let r = ImageReference {
            port: some("5000"),
            repository: "app".to_string(),
            ..Default::default()
        };
        assert_eq!(r.render(), "app");
    }

    #[test]
    fn test_render_empty_strings_are_skipped() {
        let r = ImageReference {
            registry: some(""),
            namespace: some(""),
            repository: "app".to_string(),
            tag: some(""),
            id: some(""),
            ..Default::default()
        };
        assert_eq!(r.render(), "app");
    }

    #[test]
    fn test_display() {
        let r = ImageReference::parse("localhost:5000/team/app:v2").unwrap();
        assert_eq!(format!("{}", r), "localhost:5000/team/app:v2");
    }

    #[test]
    fn test_json_uses_null_for_missing_fields() {
        let reference = ImageReference::parse("localhost:5000/team/app:1.0").unwrap();
        let json = serde_json::to_string(&reference).unwrap();
        assert_eq!(
            json,
            r#"{"registry":"localhost","port":"5000","namespace":"team","repository":"app","tag":"1.0","id":null}"#
        );

        let parsed: ImageReference = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reference);
        assert_eq!(parsed.render(), "localhost:5000/team/app:1.0");
    }

    #[test]
    fn test_json_id_reference() {
        let json = r#"{"registry":null,"port":null,"namespace":null,"repository":"","tag":null,"id":"app:"}"#;
        let parsed: ImageReference = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, ImageReference::parse("app:").unwrap());
        assert_eq!(parsed.to_string(), "app:");
    }

    #[test]
    fn test_reparse_is_stable() {
        let refs = [
            ImageReference {
                registry: some("example.com"),
                port: some("8080"),
                namespace: some("user"),
                repository: "repo".to_string(),
                tag: some("tag"),
                id: None,
            },
            ImageReference {
                registry: some("example.com"),
                repository: "repo".to_string(),
                ..Default::default()
            },
            ImageReference {
                namespace: some("org"),
                repository: "sub/app".to_string(),
                tag: some("v1"),
                ..Default::default()
            },
            ImageReference {
                id: some("deadbeef"),
                ..Default::default()
            },
        ];

        for r in refs {
            let rendered = r.render();
            let reparsed = ImageReference::parse(&rendered).unwrap();
            assert_eq!(reparsed.render(), rendered);
        }
    }
}
