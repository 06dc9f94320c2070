use crate::error::FetchError;
use std::fmt;
use std::str::FromStr;

/// The GitHub object kinds that can be named in a transfer source, mapped to
/// their v3 API endpoints by [`GithubObject::endpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GithubObject {
    Commits,
    CommitComments,
    IssueComments,
    Issues,
    Members,
    Organizations,
    PullRequests,
    Repositories,
}

impl GithubObject {
    /// Whether this object kind is addressed per-repository (as opposed to
    /// per-organization or per-user).
    pub fn requires_repo(&self) -> bool {
        !matches!(
            self,
            GithubObject::Members | GithubObject::Organizations | GithubObject::Repositories
        )
    }

    /// The v3 API path for this object kind.  Fails with
    /// [`FetchError::InvalidRequest`] if the kind is repo-scoped and no repo
    /// was given.
    pub fn endpoint(&self, org: &str, repo: Option<&str>) -> Result<String, FetchError> {
        if self.requires_repo() && repo.is_none() {
            return Err(FetchError::InvalidRequest(format!(
                "github object {} requires a repository",
                self
            )));
        }
        let repo = repo.unwrap_or_default();
        Ok(match self {
            GithubObject::Commits => format!("repos/{}/{}/commits", org, repo),
            GithubObject::CommitComments => format!("repos/{}/{}/comments", org, repo),
            GithubObject::IssueComments => format!("repos/{}/{}/issues/comments", org, repo),
            GithubObject::Issues => format!("repos/{}/{}/issues", org, repo),
            GithubObject::Members => format!("orgs/{}/members", org),
            GithubObject::Organizations => "user/organizations".to_string(),
            GithubObject::PullRequests => format!("repos/{}/{}/pulls", org, repo),
            GithubObject::Repositories => format!("orgs/{}/repos", org),
        })
    }
}

impl fmt::Display for GithubObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            GithubObject::Commits => "commits",
            GithubObject::CommitComments => "commit_comments",
            GithubObject::IssueComments => "issue_comments",
            GithubObject::Issues => "issues",
            GithubObject::Members => "members",
            GithubObject::Organizations => "organizations",
            GithubObject::PullRequests => "pull_requests",
            GithubObject::Repositories => "repositories",
        })
    }
}

impl FromStr for GithubObject {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "commits" => GithubObject::Commits,
            "commit_comments" => GithubObject::CommitComments,
            "issue_comments" => GithubObject::IssueComments,
            "issues" => GithubObject::Issues,
            "members" => GithubObject::Members,
            "organizations" => GithubObject::Organizations,
            "pull_requests" => GithubObject::PullRequests,
            "repositories" => GithubObject::Repositories,
            _ => {
                return Err(FetchError::InvalidRequest(format!(
                    "unsupported github object {:?}",
                    s
                )))
            }
        })
    }
}

/// Resolve a transfer source to an API path.  Two forms are accepted:
///
/// * a raw API path, passed through unchanged, e.g.
///   `repos/octocat/hello-world/contents/README.md`; or
/// * the `kind:org[/repo]` shorthand, e.g. `commits:octocat/hello-world`,
///   resolved through [`GithubObject::endpoint`].
///
/// This performs no network calls, so a malformed source is rejected before
/// any fetch is attempted.
pub fn source_path(src: &str) -> Result<String, FetchError> {
    if src.is_empty() {
        return Err(FetchError::InvalidRequest(
            "source identifier must be non-empty".to_string(),
        ));
    }
    if src.starts_with('/') {
        return Err(FetchError::InvalidRequest(
            "source identifier must not begin with `/`".to_string(),
        ));
    }

    let (kind, rest) = match src.split_once(':') {
        Some(parts) => parts,
        None => return Ok(src.to_string()),
    };

    let object: GithubObject = kind.parse()?;
    let (org, repo) = match rest.split_once('/') {
        Some((org, repo)) => (org, Some(repo)),
        None => (rest, None),
    };
    if org.is_empty() {
        return Err(FetchError::InvalidRequest(format!(
            "source {:?} does not name an organization",
            src
        )));
    }
    object.endpoint(org, repo)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! endpoint_tests {
        ($($name:ident: $object:expr, $org:expr, $repo:expr, $path:expr,)*) => {
        $(
            #[test]
            fn $name() {
                assert_eq!(&$object.endpoint($org, $repo).unwrap(), $path);
            }
        )*
        }
    }

    endpoint_tests! {
        commits: GithubObject::Commits, "octocat", Some("hello-world"), "repos/octocat/hello-world/commits",
        commit_comments: GithubObject::CommitComments, "octocat", Some("hello-world"), "repos/octocat/hello-world/comments",
        issue_comments: GithubObject::IssueComments, "octocat", Some("hello-world"), "repos/octocat/hello-world/issues/comments",
        issues: GithubObject::Issues, "octocat", Some("hello-world"), "repos/octocat/hello-world/issues",
        members: GithubObject::Members, "octocat", None, "orgs/octocat/members",
        organizations: GithubObject::Organizations, "octocat", None, "user/organizations",
        pull_requests: GithubObject::PullRequests, "octocat", Some("hello-world"), "repos/octocat/hello-world/pulls",
        repositories: GithubObject::Repositories, "octocat", None, "orgs/octocat/repos",
    }

    #[test]
    fn endpoint_missing_repo() {
        assert!(matches!(
            GithubObject::Commits.endpoint("octocat", None),
            Err(FetchError::InvalidRequest(_))
        ));
    }

    #[test]
    fn parse_unsupported_object() {
        assert!(matches!(
            "gists".parse::<GithubObject>(),
            Err(FetchError::InvalidRequest(_))
        ));
    }

    #[test]
    fn source_path_raw_passthrough() {
        assert_eq!(
            source_path("repos/octocat/hello-world/contents/README.md").unwrap(),
            "repos/octocat/hello-world/contents/README.md"
        );
    }

    #[test]
    fn source_path_shorthand_repo_scoped() {
        assert_eq!(
            source_path("commits:octocat/hello-world").unwrap(),
            "repos/octocat/hello-world/commits"
        );
    }

    #[test]
    fn source_path_shorthand_org_scoped() {
        assert_eq!(source_path("members:my-org").unwrap(), "orgs/my-org/members");
    }

    #[test]
    fn source_path_shorthand_missing_repo() {
        assert!(matches!(
            source_path("issues:octocat"),
            Err(FetchError::InvalidRequest(_))
        ));
    }

    #[test]
    fn source_path_shorthand_missing_org() {
        assert!(matches!(
            source_path("repositories:"),
            Err(FetchError::InvalidRequest(_))
        ));
    }

    #[test]
    fn source_path_empty() {
        assert!(matches!(
            source_path(""),
            Err(FetchError::InvalidRequest(_))
        ));
    }

    #[test]
    fn source_path_leading_slash() {
        assert!(matches!(
            source_path("/absolute/path"),
            Err(FetchError::InvalidRequest(_))
        ));
    }
}
