use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::{
    error::Result,
    management::container::{INITIAL_CAPACITY, ResultContainer},
    tidal::DomainStatus,
    types::{
        Album, Artist, Contributor, Credit, Item, Link, Mix, Playlist, Stream, Subscription, User,
    },
};

/// The entity kinds a [`ContentAggregate`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Album,
    Item,
    Artist,
    Playlist,
    Mix,
    Contributor,
    Credit,
    Link,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Album => "albums",
            ContentKind::Item => "items",
            ContentKind::Artist => "artists",
            ContentKind::Playlist => "playlists",
            ContentKind::Mix => "mixes",
            ContentKind::Contributor => "contributors",
            ContentKind::Credit => "credits",
            ContentKind::Link => "links",
        };
        f.write_str(name)
    }
}

/// A record type stored in its own slot of a [`ContentAggregate`].
///
/// The slot is chosen by the type, so a record can never land in the
/// container of another kind.
pub trait Record: Sized {
    const KIND: ContentKind;

    fn slot(content: &ContentAggregate) -> &Option<ResultContainer<Self>>;
    fn slot_mut(content: &mut ContentAggregate) -> &mut Option<ResultContainer<Self>>;
}

macro_rules! record_slot {
    ($ty:ty, $kind:ident, $field:ident) => {
        impl Record for $ty {
            const KIND: ContentKind = ContentKind::$kind;

            fn slot(content: &ContentAggregate) -> &Option<ResultContainer<Self>> {
                &content.$field
            }

            fn slot_mut(content: &mut ContentAggregate) -> &mut Option<ResultContainer<Self>> {
                &mut content.$field
            }
        }
    };
}

record_slot!(Album, Album, albums);
record_slot!(Item, Item, items);
record_slot!(Artist, Artist, artists);
record_slot!(Playlist, Playlist, playlists);
record_slot!(Mix, Mix, mixes);
record_slot!(Contributor, Contributor, contributors);
record_slot!(Credit, Credit, credits);
record_slot!(Link, Link, links);

/// Everything one API call produced: typed containers, the parsed
/// document(s) they were read from, and the domain status.
///
/// Read the containers only when [`status`](Self::status) is
/// [`DomainStatus::Success`].
#[derive(Debug, Default)]
pub struct ContentAggregate {
    albums: Option<ResultContainer<Album>>,
    items: Option<ResultContainer<Item>>,
    artists: Option<ResultContainer<Artist>>,
    playlists: Option<ResultContainer<Playlist>>,
    mixes: Option<ResultContainer<Mix>>,
    contributors: Option<ResultContainer<Contributor>>,
    credits: Option<ResultContainer<Credit>>,
    links: Option<ResultContainer<Link>>,

    stream: Option<Stream>,
    user: Option<User>,
    subscription: Option<Subscription>,
    document: Option<Value>,
    manifest_document: Option<Value>,

    status: DomainStatus,
    message: Option<String>,

    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub total_number_of_items: Option<u64>,
}

impl ContentAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(status: DomainStatus) -> Self {
        ContentAggregate {
            status,
            ..Self::default()
        }
    }

    pub fn status(&self) -> DomainStatus {
        self.status
    }

    pub fn set_status(&mut self, status: DomainStatus) {
        self.status = status;
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Diagnostic recorded for a failed call (requested id, server message).
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: String) {
        self.message = Some(message);
    }

    /// Makes sure the container for `T` exists, sized for `capacity` records.
    pub fn allocate<T: Record>(&mut self, capacity: usize) -> &mut ResultContainer<T> {
        T::slot_mut(self).get_or_insert_with(|| {
            debug!(kind = %T::KIND, capacity, "allocated result container");
            ResultContainer::with_capacity(capacity)
        })
    }

    /// Appends a record to the container of its kind, creating it on first use.
    pub fn append<T: Record>(&mut self, record: T) -> Result<usize> {
        self.allocate::<T>(INITIAL_CAPACITY).append(record)
    }

    pub fn container<T: Record>(&self) -> Option<&ResultContainer<T>> {
        T::slot(self).as_ref()
    }

    /// All records of kind `T`, empty if none were stored.
    pub fn records<T: Record>(&self) -> &[T] {
        T::slot(self)
            .as_ref()
            .map(ResultContainer::as_slice)
            .unwrap_or(&[])
    }

    pub fn first<T: Record>(&self) -> Option<&T> {
        self.records::<T>().first()
    }

    /// Kinds with a container, in declaration order.
    pub fn kinds(&self) -> Vec<ContentKind> {
        let mut kinds = Vec::new();
        if self.albums.is_some() {
            kinds.push(ContentKind::Album);
        }
        if self.items.is_some() {
            kinds.push(ContentKind::Item);
        }
        if self.artists.is_some() {
            kinds.push(ContentKind::Artist);
        }
        if self.playlists.is_some() {
            kinds.push(ContentKind::Playlist);
        }
        if self.mixes.is_some() {
            kinds.push(ContentKind::Mix);
        }
        if self.contributors.is_some() {
            kinds.push(ContentKind::Contributor);
        }
        if self.credits.is_some() {
            kinds.push(ContentKind::Credit);
        }
        if self.links.is_some() {
            kinds.push(ContentKind::Link);
        }
        kinds
    }

    pub fn albums(&self) -> &[Album] {
        self.records()
    }

    pub fn items(&self) -> &[Item] {
        self.records()
    }

    pub fn artists(&self) -> &[Artist] {
        self.records()
    }

    pub fn playlists(&self) -> &[Playlist] {
        self.records()
    }

    pub fn mixes(&self) -> &[Mix] {
        self.records()
    }

    pub fn contributors(&self) -> &[Contributor] {
        self.records()
    }

    pub fn credits(&self) -> &[Credit] {
        self.records()
    }

    pub fn links(&self) -> &[Link] {
        self.records()
    }

    pub fn stream(&self) -> Option<&Stream> {
        self.stream.as_ref()
    }

    pub fn set_stream(&mut self, stream: Stream) {
        self.stream = Some(stream);
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn subscription(&self) -> Option<&Subscription> {
        self.subscription.as_ref()
    }

    pub fn set_subscription(&mut self, subscription: Subscription) {
        self.subscription = Some(subscription);
    }

    /// Hands the parsed response document to the aggregate, which owns it
    /// until [`destroy`](Self::destroy) or drop.
    pub fn attach_document(&mut self, document: Value) {
        self.document = Some(document);
    }

    pub fn document(&self) -> Option<&Value> {
        self.document.as_ref()
    }

    pub fn attach_manifest(&mut self, manifest: Value) {
        self.manifest_document = Some(manifest);
    }

    pub fn manifest(&self) -> Option<&Value> {
        self.manifest_document.as_ref()
    }

    /// Releases every container, their records and the owned documents.
    ///
    /// The status and message survive so the caller can still report them.
    pub fn destroy(&mut self) {
        self.albums = None;
        self.items = None;
        self.artists = None;
        self.playlists = None;
        self.mixes = None;
        self.contributors = None;
        self.credits = None;
        self.links = None;
        self.stream = None;
        self.user = None;
        self.subscription = None;
        self.document = None;
        self.manifest_document = None;
        debug!("released content aggregate");
    }
}
