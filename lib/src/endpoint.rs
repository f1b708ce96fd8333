//! Mapping of a [`TransferRequest`] onto the daemon API.

use url::form_urlencoded;

use crate::error::Result;
use crate::mode::TransferMode;
use crate::reference::{parse_repository_tag, validate_repository_name, validate_tag};
use crate::request::{Direction, TransferRequest};
use crate::transport::Method;

/// Query parameter carrying the import source.
pub(crate) const FROM_SRC: &str = "fromSrc";

/// A request target on the daemon: method, path and query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Read or write.
    pub method: Method,
    /// Path relative to the daemon API root, without a query.
    pub path: String,
    /// Query parameters in the order they are sent; keys may repeat.
    pub params: Vec<(String, String)>,
}

impl Endpoint {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, key: &str, value: impl Into<String>) {
        self.params.push((key.to_string(), value.into()));
    }

    /// Resolve the endpoint for a request.
    ///
    /// For full imports the destination repository is validated here, so
    /// that a bad name never reaches the network.
    pub fn for_request(request: &TransferRequest) -> Result<Self> {
        match request.direction {
            Direction::Export => Ok(Self::export(request)),
            Direction::Import => Self::import(request),
        }
    }

    fn export(request: &TransferRequest) -> Self {
        let verb = match request.mode {
            TransferMode::Full => "export",
            TransferMode::Diff => "diff",
            TransferMode::Metadata => "metadata",
        };
        Self::new(
            Method::Get,
            format!("containers/{}/{verb}", path_segment(&request.target)),
        )
    }

    fn import(request: &TransferRequest) -> Result<Self> {
        let source = request.source.as_deref().unwrap_or("-");
        let r = match request.mode {
            TransferMode::Diff => {
                let mut r = Self::new(Method::Post, "containers/diff");
                r.push_param("container", request.target.as_str());
                r.push_param(FROM_SRC, source);
                r
            }
            TransferMode::Metadata => Self::new(Method::Post, "containers/metadata"),
            TransferMode::Full => {
                let mut r = Self::new(Method::Post, "images/create");
                r.push_param(FROM_SRC, source);
                let mut tag = request.tag.as_deref();
                if !request.target.is_empty() {
                    let (repo, t) = parse_repository_tag(&request.target);
                    validate_repository_name(repo)?;
                    r.push_param("repo", repo);
                    tag = tag.or(t);
                }
                if let Some(tag) = tag {
                    validate_tag(tag)?;
                }
                if let Some(message) = request.message.as_deref() {
                    r.push_param("message", message);
                }
                for change in request.changes.iter() {
                    r.push_param("changes", change.as_str());
                }
                if let Some(tag) = tag {
                    r.push_param("tag", tag);
                }
                r
            }
        };
        Ok(r)
    }

    /// Replace the value of an existing parameter, keeping its position.
    /// Returns `false` if the parameter is not part of this endpoint.
    pub fn replace_param(&mut self, key: &str, value: &str) -> bool {
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => {
                *v = value.to_string();
                true
            }
            None => false,
        }
    }

    /// The path plus the percent-encoded query string, as sent on the wire.
    pub fn request_path(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish();
        format!("{}?{query}", self.path)
    }
}

/// Percent-encode `segment` so that it stays one segment of a URL path.
fn path_segment(segment: &str) -> String {
    // byte_serialize has already escaped any literal '+'
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::reference::InvalidRepositoryName;

    fn import_request(
        repository: Option<&str>,
        diff: &str,
        metadata: bool,
    ) -> TransferRequest {
        TransferRequest::import("-", repository.map(Into::into), diff, metadata, &[], None)
            .unwrap()
    }

    #[test]
    fn test_export_endpoints() {
        for (diff, metadata, path) in [
            (false, false, "containers/c1/export"),
            (true, false, "containers/c1/diff"),
            (false, true, "containers/c1/metadata"),
        ] {
            let req = TransferRequest::export("c1", diff, metadata).unwrap();
            let e = Endpoint::for_request(&req).unwrap();
            assert_eq!(e.method, Method::Get);
            assert_eq!(e.request_path(), path);
        }
    }

    #[test]
    fn test_export_container_is_one_segment() {
        for (container, path) in [
            ("a?b", "containers/a%3Fb/export"),
            ("a#b", "containers/a%23b/export"),
            ("a/b", "containers/a%2Fb/export"),
            ("../b", "containers/..%2Fb/export"),
            ("a b+c", "containers/a%20b%2Bc/export"),
            ("a%2Fb", "containers/a%252Fb/export"),
            ("web_1.db-2", "containers/web_1.db-2/export"),
        ] {
            let req = TransferRequest::export(container, false, false).unwrap();
            assert_eq!(Endpoint::for_request(&req).unwrap().request_path(), path);
        }
        for container in [".", ".."] {
            assert!(matches!(
                TransferRequest::export(container, false, false),
                Err(Error::InvalidArguments(_))
            ));
        }
    }

    #[test]
    fn test_import_legacy_tag() {
        let dest = crate::request::Destination {
            repository: "myrepo:v1".into(),
            tag: Some("v2".into()),
        };
        let req = TransferRequest::import("-", Some(dest), "", false, &[], None).unwrap();
        let e = Endpoint::for_request(&req).unwrap();
        assert_eq!(e.request_path(), "images/create?fromSrc=-&repo=myrepo&tag=v2");

        let dest = crate::request::Destination {
            repository: "myrepo".into(),
            tag: Some("-bad".into()),
        };
        let req = TransferRequest::import("-", Some(dest), "", false, &[], None).unwrap();
        assert!(matches!(
            Endpoint::for_request(&req),
            Err(Error::InvalidRepositoryName(InvalidRepositoryName::Tag(_)))
        ));
    }

    #[test]
    fn test_import_scenario() {
        let e = Endpoint::for_request(&import_request(Some("myrepo:latest"), "", false)).unwrap();
        assert_eq!(e.method, Method::Post);
        assert_eq!(
            e.request_path(),
            "images/create?fromSrc=-&repo=myrepo&tag=latest"
        );
    }

    #[test]
    fn test_import_full_params() {
        let changes = vec!["ENV A=1".to_string(), "CMD [\"/bin/sh\"]".to_string()];
        let req = TransferRequest::import(
            "https://example.com/rootfs.tar",
            Some("team/app".into()),
            "",
            false,
            &changes,
            Some("initial import"),
        )
        .unwrap();
        let e = Endpoint::for_request(&req).unwrap();
        assert_eq!(
            e.request_path(),
            "images/create?fromSrc=https%3A%2F%2Fexample.com%2Frootfs.tar&repo=team%2Fapp&message=initial+import&changes=ENV+A%3D1&changes=CMD+%5B%22%2Fbin%2Fsh%22%5D"
        );
        let e = Endpoint::for_request(&import_request(None, "", false)).unwrap();
        assert_eq!(e.request_path(), "images/create?fromSrc=-");
    }

    #[test]
    fn test_import_diff_metadata() {
        let e = Endpoint::for_request(&import_request(None, "c1", false)).unwrap();
        assert_eq!(e.request_path(), "containers/diff?container=c1&fromSrc=-");
        let e = Endpoint::for_request(&import_request(Some("myrepo"), "", true)).unwrap();
        assert_eq!(e.request_path(), "containers/metadata");
        // The repository is not consulted outside of full imports
        let e = Endpoint::for_request(&import_request(Some("Bad Name"), "c1", false)).unwrap();
        assert_eq!(e.path, "containers/diff");
    }

    #[test]
    fn test_import_invalid_repository() {
        match Endpoint::for_request(&import_request(Some("scratch"), "", false)) {
            Err(Error::InvalidRepositoryName(InvalidRepositoryName::Reserved)) => {}
            o => panic!("Expected invalid repository, not {o:?}"),
        }
        match Endpoint::for_request(&import_request(Some("myrepo:-bad"), "", false)) {
            Err(Error::InvalidRepositoryName(InvalidRepositoryName::Tag(t))) => {
                assert_eq!(t, "-bad")
            }
            o => panic!("Expected invalid tag, not {o:?}"),
        }
    }

    #[test]
    fn test_replace_param() {
        let mut e = Endpoint::for_request(&import_request(Some("r"), "", false)).unwrap();
        assert!(e.replace_param(FROM_SRC, "-"));
        assert!(!e.replace_param("container", "x"));
        assert_eq!(e.request_path(), "images/create?fromSrc=-&repo=r");
    }
}
