//! Shallow clone of a single branch, with the credential resolution order
//! already used for outbound clones elsewhere in this codebase: explicit
//! SSH key path, on-disk fallback key, ssh-agent, then libgit2 default
//! credentials; HTTPS token from environment.

use std::path::Path;

use git2::{Cred, CredentialType, FetchOptions, RemoteCallbacks, build::RepoBuilder};
use tracing::{debug, info, instrument, warn};

use crate::error::{FetchError, Result};

#[instrument(skip(dest), fields(url = %url, branch = %branch))]
pub fn clone_branch(url: &str, branch: &str, dest: &Path) -> Result<()> {
    info!("starting shallow clone");

    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(credentials_callback);

    let mut fetch_opts = FetchOptions::new();
    fetch_opts.depth(1);
    fetch_opts.remote_callbacks(callbacks);

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_opts);
    builder.branch(branch);

    match builder.clone(url, dest) {
        Ok(_) => {
            info!(path = %dest.display(), "clone completed");
            Ok(())
        }
        Err(e) => {
            let msg = e.message().to_lowercase();
            if msg.contains("reference") || msg.contains("branch") || msg.contains("not found") {
                warn!(%branch, "branch not found on remote");
                Err(FetchError::BranchNotFound(branch.to_string()))
            } else {
                Err(e.into())
            }
        }
    }
}

fn credentials_callback(
    url_str: &str,
    username_from_url: Option<&str>,
    allowed: CredentialType,
) -> std::result::Result<Cred, git2::Error> {
    let user = username_from_url.unwrap_or("git");

    if url_str.starts_with("http") {
        if let Ok(token) = std::env::var("GIT_HTTP_TOKEN") {
            let http_user = std::env::var("GIT_HTTP_USER").unwrap_or_else(|_| "oauth2".into());
            return Cred::userpass_plaintext(&http_user, &token);
        }
    }

    if allowed.contains(CredentialType::SSH_KEY) {
        if let Ok(key) = std::env::var("SSH_KEY_PATH") {
            let key_path = Path::new(&key);
            if key_path.exists() {
                let pass = std::env::var("SSH_KEY_PASSPHRASE").ok();
                debug!(path = %key_path.display(), "using explicit SSH key");
                return Cred::ssh_key(user, None, key_path, pass.as_deref());
            }
        }
        let fallback = Path::new("ssh_keys/bot_key");
        if fallback.exists() {
            let pass = std::env::var("SSH_KEY_PASSPHRASE").ok();
            return Cred::ssh_key(user, None, fallback, pass.as_deref());
        }
        if let Ok(cred) = Cred::ssh_key_from_agent(user) {
            return Ok(cred);
        }
    }

    if allowed.contains(CredentialType::DEFAULT) {
        if let Ok(cred) = Cred::default() {
            return Ok(cred);
        }
    }

    if allowed.contains(CredentialType::USERNAME) {
        return Cred::username(user);
    }

    Err(git2::Error::from_str("no usable credentials"))
}
