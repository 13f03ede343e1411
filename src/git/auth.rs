//! Credentials for remote git operations
//!
//! Authentication is delegated to what git itself would use:
//! - default credentials (public remotes, Kerberos)
//! - ssh-agent, then the usual keys under ~/.ssh/
//! - git credential helpers for HTTPS

use git2::{Cred, CredentialType, Error, ErrorClass, ErrorCode, FetchOptions, RemoteCallbacks};

use super::url::is_local_url;

const SSH_KEY_NAMES: &[&str] = &["id_ed25519", "id_rsa", "id_ecdsa"];

fn auth_failed(message: &str) -> Error {
    Error::new(ErrorCode::Auth, ErrorClass::Http, message)
}

fn ssh_key_from_disk(username: &str) -> Result<Cred, Error> {
    let ssh_dir = dirs::home_dir().unwrap_or_default().join(".ssh");

    SSH_KEY_NAMES
        .iter()
        .map(|name| (ssh_dir.join(name), ssh_dir.join(format!("{name}.pub"))))
        .filter(|(private_key, _)| private_key.exists())
        .find_map(|(private_key, public_key)| {
            let public_key = public_key.exists().then_some(public_key.as_path());
            Cred::ssh_key(username, public_key, &private_key, None).ok()
        })
        .ok_or_else(|| auth_failed("no usable SSH key found"))
}

fn user_pass(url: &str, username_from_url: Option<&str>) -> Result<Cred, Error> {
    if let Ok(config) = git2::Config::open_default() {
        if let Ok(cred) = Cred::credential_helper(&config, url, username_from_url) {
            return Ok(cred);
        }
    }

    // Anonymous HTTPS: let the server answer with its real error
    Cred::userpass_plaintext(username_from_url.unwrap_or(""), "")
}

/// Remote callbacks carrying the credential chain
///
/// libgit2 calls back repeatedly while a method keeps failing, so each
/// credential type is offered at most once per operation.
pub fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    let mut tried = CredentialType::empty();

    callbacks.credentials(move |url, username_from_url, allowed_types| {
        if allowed_types.contains(CredentialType::DEFAULT)
            && !tried.contains(CredentialType::DEFAULT)
        {
            tried |= CredentialType::DEFAULT;
            return Cred::default();
        }

        if allowed_types.contains(CredentialType::SSH_KEY)
            && !tried.contains(CredentialType::SSH_KEY)
        {
            tried |= CredentialType::SSH_KEY;
            let username = username_from_url.unwrap_or("git");
            return Cred::ssh_key_from_agent(username).or_else(|_| ssh_key_from_disk(username));
        }

        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT)
            && !tried.contains(CredentialType::USER_PASS_PLAINTEXT)
        {
            tried |= CredentialType::USER_PASS_PLAINTEXT;
            return user_pass(url, username_from_url);
        }

        Err(auth_failed("authentication failed"))
    });

    callbacks
}

/// Whether talking to `url` goes through the credential chain
///
/// Local paths and `file://` URLs never authenticate.
pub fn needs_credentials(url: &str) -> bool {
    !is_local_url(url)
}

/// Fetch options for `url`, with credential callbacks for non-local remotes
pub fn fetch_options<'a>(url: &str) -> FetchOptions<'a> {
    let mut options = FetchOptions::new();
    if needs_credentials(url) {
        options.remote_callbacks(remote_callbacks());
    }
    options
}
