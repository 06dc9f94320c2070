/*! Support for writing objects to Google Cloud Storage.

This crate provides [`GcsStore`], an object writer with a single capability:
write a byte payload to a bucket key, optionally gzip-compressing it in
memory first.  The write always overwrites any existing object at that key;
that unconditional overwrite is what makes a retried transfer idempotent, so
no conflict detection or versioning is performed here.

Credentials are resolved through an injected
[`CredentialsResolver`](octostore::CredentialsResolver) at write time, the
same arrangement as the fetch side.  An optional delegation subject may be
set on the store, in which case every write is performed on behalf of that
identity rather than the connection's default identity.
 */
mod error;
mod gcs;

pub use error::WriteError;
pub use gcs::{GcsStore, GcsStoreBuilder};
