use tokio_util::sync::CancellationToken;

use crate::{
    cli::{check, open_session, session_config, spinner, transport},
    error,
    error::Error,
    info,
    tidal::{Session, users},
    success, warning,
};

/// Runs the device-code flow and stores the credentials.
///
/// Opens the verification link in the browser when possible and polls
/// until the user authorizes the device. Ctrl-C cancels the polling.
pub async fn login() {
    let config = session_config();
    let transport = transport(&config);
    let mut session = Session::new(config, transport);

    let code = match session.create_login_code().await {
        Ok(c) => c,
        Err(e) => error!("Cannot request a login code. Err: {}", e),
    };

    let link = code.link();
    info!("Open {} and enter the code {}", link, code.user_code);
    if webbrowser::open(&link).is_err() {
        warning!("Cannot open a browser, please open the link manually.");
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let pb = spinner("Waiting for authorization...");
    let result = session.authorize(&code, &cancel).await;
    pb.finish_and_clear();

    match result {
        Ok(_) => match session.credentials().user_id {
            Some(id) => success!("Logged in as user {}.", id),
            None => success!("Logged in."),
        },
        Err(Error::Cancelled) => warning!("Login cancelled."),
        Err(e) => error!("Login failed. Err: {}", e),
    }
}

/// Invalidates the token server-side and removes the credential file.
pub async fn logout() {
    let mut session = open_session(false).await;
    let path = session.config().persistent_file.clone();

    if let Err(e) = session.logout().await {
        warning!("Server-side logout failed. Err: {}", e);
    }

    match async_fs::remove_file(&path).await {
        Ok(_) => success!("Logged out."),
        Err(e) => warning!("Cannot remove {}. Err: {}", path.display(), e),
    }
}

pub async fn whoami() {
    let mut session = open_session(false).await;

    let content = match users::get_user(&mut session).await {
        Ok(c) => c,
        Err(e) => error!("Cannot load the user profile. Err: {}", e),
    };

    if check(&content) {
        if let Some(user) = content.user() {
            let name = [user.first_name.as_deref(), user.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            info!("User:     {} ({})", user.username.as_deref().unwrap_or("-"), user.id);
            if !name.is_empty() {
                info!("Name:     {}", name);
            }
        }
    }
    if let Ok(subscription) = users::get_user_subscription(&mut session).await {
        if let Some(plan) = subscription.subscription().and_then(|s| s.plan.as_ref()) {
            info!("Plan:     {}", plan.kind.as_deref().unwrap_or("-"));
        }
    }

    let credentials = session.credentials();
    info!("Country:  {}", credentials.country_code);
    info!("Audio:    {}", credentials.audio_quality);
    info!("Video:    {}", credentials.video_quality);
    if let Some(token) = &credentials.token {
        info!("Expires:  {}", format_expiry(token.expires_at));
    }
}

fn format_expiry(expires_at: i64) -> String {
    chrono::DateTime::from_timestamp(expires_at, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| expires_at.to_string())
}
