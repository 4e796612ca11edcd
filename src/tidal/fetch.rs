use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{Error, Result},
    management::{ContentAggregate, INITIAL_CAPACITY, Record},
    tidal::{
        session::Session,
        status::{self, DomainStatus, ErrorBody, Outcome, RequestContext},
        transport::{Method, RawResponse, Request},
    },
};

/// Where the records of a list response live inside each array element.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Nesting {
    /// The element is the record.
    Flat,
    /// The record sits under this key, e.g. `{"item": {...}}`.
    Under(&'static str),
}

/// Request for `path` below the API root, scoped to the session's country.
pub(crate) fn api(session: &Session, method: Method, path: &str) -> Request {
    Request::new(method, format!("{}/{}", session.api_url().trim_end_matches('/'), path))
        .query("countryCode", session.country_code())
}

/// Adds `limit` and `offset` to a listing request.
pub(crate) fn paged(request: Request, limit: u64, offset: u64) -> Request {
    request.query("limit", limit).query("offset", offset)
}

/// Performs `request` and builds an aggregate from the answer.
///
/// Transport, authentication and parse failures are returned as `Err`.
/// Every completed HTTP exchange yields `Ok` with its domain status; on
/// success `populate` fills the containers from the parsed document, which
/// the aggregate then owns.
pub(crate) async fn fetch<F>(
    session: &mut Session,
    request: Request,
    context: RequestContext,
    resource_id: &str,
    populate: F,
) -> Result<ContentAggregate>
where
    F: FnOnce(&mut ContentAggregate, &Value) -> Result<()>,
{
    let response = session.execute(request).await?;

    let error_body = if (200..300).contains(&response.status) {
        None
    } else {
        ErrorBody::parse(&response.body)
    };
    let status = status::classify(Outcome::Completed(response.status), context, error_body.as_ref());
    if !status.is_success() {
        return Ok(failed(&response, status, error_body.as_ref(), resource_id));
    }

    let mut content = ContentAggregate::new();
    let document = parse_document(&response)?;
    populate(&mut content, &document)?;
    content.attach_document(document);
    content.set_status(status);
    Ok(content)
}

/// Performs `request` when only the status matters (mutations).
pub(crate) async fn fetch_status(
    session: &mut Session,
    request: Request,
    context: RequestContext,
    resource_id: &str,
) -> Result<DomainStatus> {
    let response = session.execute(request).await?;
    let body = ErrorBody::parse(&response.body);
    let status = status::classify(Outcome::Completed(response.status), context, body.as_ref());

    if !status.is_success() {
        debug!(
            message = %status::describe(status, Some(resource_id), body.as_ref()),
            "request failed"
        );
    }
    Ok(status)
}

fn failed(
    response: &RawResponse,
    status: DomainStatus,
    body: Option<&ErrorBody>,
    resource_id: &str,
) -> ContentAggregate {
    let mut content = ContentAggregate::with_status(status);
    content.set_message(status::describe(status, Some(resource_id), body));
    debug!(code = status.code(), message = ?content.message(), "request failed");

    if let Ok(document) = serde_json::from_slice::<Value>(&response.body) {
        content.attach_document(document);
    }
    content
}

pub(crate) fn parse_document(response: &RawResponse) -> Result<Value> {
    if response.body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&response.body).map_err(|e| Error::Parse(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| Error::Parse(format!("{}: {}", std::any::type_name::<T>(), e)))
}

/// Appends the single record the document describes.
pub(crate) fn push_single<T>(content: &mut ContentAggregate, document: &Value) -> Result<()>
where
    T: Record + DeserializeOwned,
{
    content.allocate::<T>(1);
    content.append(decode::<T>(document)?)?;
    Ok(())
}

/// Appends every record of `document[key]` and records the paging fields.
pub(crate) fn push_page<T>(
    content: &mut ContentAggregate,
    document: &Value,
    key: &str,
    nesting: Nesting,
) -> Result<()>
where
    T: Record + DeserializeOwned,
{
    push_list::<T>(content, &document[key], nesting)?;
    content.limit = document["limit"].as_u64();
    content.offset = document["offset"].as_u64();
    content.total_number_of_items = document["totalNumberOfItems"].as_u64();
    Ok(())
}

/// Appends every record of a JSON array. Elements whose nested record is
/// missing (e.g. a video inside a track-only view) are skipped.
pub(crate) fn push_list<T>(content: &mut ContentAggregate, array: &Value, nesting: Nesting) -> Result<()>
where
    T: Record + DeserializeOwned,
{
    let elements = match array {
        Value::Array(elements) => elements,
        Value::Null => return Ok(()),
        _ => return Err(Error::Parse(format!("expected an array of {}", T::KIND))),
    };

    content.allocate::<T>(INITIAL_CAPACITY);
    for element in elements {
        let record = match nesting {
            Nesting::Flat => element,
            Nesting::Under(key) => match element.get(key) {
                Some(inner) if !inner.is_null() => inner,
                _ => continue,
            },
        };
        content.append(decode::<T>(record)?)?;
    }
    Ok(())
}
