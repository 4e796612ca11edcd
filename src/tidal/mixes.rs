use serde_json::Value;

use crate::{
    error::Result,
    management::ContentAggregate,
    tidal::{
        fetch::{self, Nesting, api},
        session::Session,
        status::RequestContext,
        transport::Method,
    },
    types::{Item, Mix},
};

/// Retrieves the tracks and videos of a mix.
///
/// Mixes are generated server-side and are not paged; the whole list comes
/// back in one answer. Entries without an item are skipped.
///
/// # Arguments
///
/// * `session` - Session used for the request (demo sessions work)
/// * `mix_id` - Id of the mix, e.g. from [`get_user_mixes`] or an artist mix
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The items in the item container, or the domain
///   status and message of the failed call
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let content = mixes::get_mix_items(&mut session, "0123456789abcdef").await?;
/// for item in content.items() {
///     println!("{}", item.title);
/// }
/// ```
pub async fn get_mix_items(session: &mut Session, mix_id: &str) -> Result<ContentAggregate> {
    let request = api(session, Method::Get, &format!("mixes/{}/items", mix_id));

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        mix_id,
        |content, document| fetch::push_page::<Item>(content, document, "items", Nesting::Under("item")),
    )
    .await
}

/// Retrieves the mixes generated for the logged-in user.
///
/// The mixes come from the "My Mixes" page of the user's collection. The
/// first module of the page that carries a paged list supplies the records
/// and the paging fields.
///
/// # Arguments
///
/// * `session` - Session with a user login
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ContentAggregate)` - The mixes in the mix container, or the domain
///   status and message of the failed call
/// - `Err(Error)` - Authentication, transport or parse failure
///
/// # Example
///
/// ```rust,ignore
/// let content = mixes::get_user_mixes(&mut session).await?;
/// for mix in content.mixes() {
///     println!("{} {}", mix.id, mix.title.as_deref().unwrap_or(""));
/// }
/// ```
pub async fn get_user_mixes(session: &mut Session) -> Result<ContentAggregate> {
    let user_id = session.user_id()?;
    let request = api(session, Method::Get, "pages/my_collection_my_mixes").query("deviceType", "BROWSER");

    fetch::fetch(
        session,
        request,
        RequestContext::General,
        &user_id.to_string(),
        |content, document| match paged_list(document) {
            Some(list) => fetch::push_page::<Mix>(content, list, "items", Nesting::Flat),
            None => Ok(()),
        },
    )
    .await
}

/// First `pagedList` found in the rows and modules of a page document.
fn paged_list(page: &Value) -> Option<&Value> {
    page["rows"]
        .as_array()?
        .iter()
        .filter_map(|row| row["modules"].as_array())
        .flatten()
        .map(|module| &module["pagedList"])
        .find(|list| list.is_object())
}
