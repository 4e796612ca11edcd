use crate::{
    error::Result,
    management::ContentAggregate,
    tidal::{
        fetch::{self, api},
        session::Session,
        status::RequestContext,
        transport::Method,
    },
    types::{Subscription, User},
};

/// Retrieves the profile of the logged-in user.
///
/// # Arguments
///
/// * `session` - Session with a user login; refreshed first if the token expires soon
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The profile in [`ContentAggregate::user`] on success, or the
///   domain status and message of the failed call
/// - `Err(Error::Auth)` - Demo or unauthenticated session, or a rejected refresh
/// - `Err(Error::Transport)` / `Err(Error::Parse)` - No exchange, or an unreadable answer
///
/// # Example
///
/// ```rust,ignore
/// let content = users::get_user(&mut session).await?;
/// if let Some(user) = content.user() {
///     println!("{}", user.username.as_deref().unwrap_or("-"));
/// }
/// ```
pub async fn get_user(session: &mut Session) -> Result<ContentAggregate> {
    let user_id = session.user_id()?;
    let request = api(session, Method::Get, &format!("users/{}", user_id));

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &user_id.to_string(),
        |content, document| {
            content.set_user(fetch::decode::<User>(document)?);
            Ok(())
        },
    )
    .await
}

/// Retrieves the subscription of the logged-in user.
///
/// The subscription decides the highest audio quality a stream can be
/// requested at.
///
/// # Arguments
///
/// * `session` - Session with a user login
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The subscription in [`ContentAggregate::subscription`] on
///   success, or the domain status and message of the failed call
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let content = users::get_user_subscription(&mut session).await?;
/// if let Some(subscription) = content.subscription() {
///     println!("{:?}", subscription.highest_sound_quality);
/// }
/// ```
pub async fn get_user_subscription(session: &mut Session) -> Result<ContentAggregate> {
    let user_id = session.user_id()?;
    let request = api(session, Method::Get, &format!("users/{}/subscription", user_id));

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &user_id.to_string(),
        |content, document| {
            content.set_subscription(fetch::decode::<Subscription>(document)?);
            Ok(())
        },
    )
    .await
}
