/*!
# Octostore GitHub Client

This crate is a thin, authenticated client for fetching a single object from
the GitHub REST API.  It is a convenience wrapper around `reqwest` that adds
credential resolution by connection id and a typed error taxonomy that the
`octostore-operator` crate propagates to its host scheduler.

## Credentials

Credentials are never read from ambient global state.  Instead, a
[`CredentialsResolver`] is injected wherever credentials are needed, and
resolution happens at call time rather than at client construction, so that
credentials rotated between scheduled runs are picked up.  Two resolvers are
provided:

* [`StaticResolver`] -- a fixed map of connection ids to [`Connection`]s,
  for hosts that have already resolved their credentials; and
* [`EnvResolver`] -- reads `OCTOSTORE_CONN_<ID>_URL` and
  `OCTOSTORE_CONN_<ID>_TOKEN` from the environment.

## Fetching

[`Github`] exposes a single capability: perform a GET for a given API path,
returning the raw payload or a [`FetchError`].  Identifiers may also be given
in the `kind:org[/repo]` shorthand understood by
[`source_path`](crate::source_path), which maps the supported GitHub object
kinds to their v3 API endpoints.
 */
mod credentials;
mod error;
mod github;
mod object;

pub use credentials::{Connection, CredentialsError, CredentialsResolver, EnvResolver, StaticResolver};
pub use error::FetchError;
pub use github::{FetchResult, Github, GithubBuilder};
pub use object::{source_path, GithubObject};
