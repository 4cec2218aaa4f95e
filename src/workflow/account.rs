use tracing::{info, warn};

use super::require_text;
use crate::api::types::{LoginRequest, RegisterRequest};
use crate::api::Backend;
use crate::error::ClientResult;
use crate::session::{user_id_from_token, Session, SessionStore};
use crate::storage::KeyValueStorage;

pub async fn register<B: Backend + ?Sized>(
    backend: &B,
    full_name: &str,
    email: &str,
    password: &str,
) -> ClientResult<()> {
    require_text("full_name", full_name, "Please enter your full name.")?;
    require_text("email", email, "Please enter your email address.")?;
    require_text("password", password, "Please choose a password.")?;

    info!("Registering new account");
    backend
        .register(&RegisterRequest {
            full_name: full_name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        })
        .await
}

/// Logs in and stores the session. The display name is looked up from the
/// token's `sub` claim; failing that lookup leaves the name empty but keeps
/// the login.
pub async fn login<B: Backend + ?Sized, S: KeyValueStorage>(
    backend: &B,
    session: &SessionStore<S>,
    email: &str,
    password: &str,
) -> ClientResult<Session> {
    require_text("email", email, "Please enter your email address.")?;
    require_text("password", password, "Please enter your password.")?;

    let resp = backend
        .login(&LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        })
        .await?;
    session.set_session(&resp.access_token, "")?;
    info!("Logged in");

    let display_name = match fetch_display_name(backend, &resp.access_token).await {
        Ok(name) => name,
        Err(e) => {
            warn!("Could not load user profile: {}", e);
            String::new()
        }
    };
    if !display_name.is_empty() {
        session.set_display_name(&display_name)?;
    }

    Ok(Session {
        token: resp.access_token,
        display_name,
    })
}

async fn fetch_display_name<B: Backend + ?Sized>(backend: &B, token: &str) -> ClientResult<String> {
    let user_id = user_id_from_token(token)?;
    let user = backend.fetch_user(&user_id).await?;
    Ok(user.full_name.unwrap_or_default())
}
