pub mod albums;
pub mod artists;
pub mod auth;
pub mod favorites;
pub mod mixes;
pub mod playlists;
pub mod search;
pub mod tracks;
pub mod users;
pub mod videos;

mod fetch;
mod session;
mod status;
mod transport;

pub use favorites::FavoriteKind;
pub use playlists::OnDuplicates;
pub use session::{Session, SessionConfig, SessionState};
pub use status::{DomainStatus, ErrorBody, Outcome, RequestContext, classify, describe};
pub use transport::{HttpTransport, Method, RawResponse, Request, Transport};
