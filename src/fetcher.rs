//! Fetch stage: authorized GETs, response normalization and fan-out.
//!
//! A [`Fetcher`] never caches; every call goes to the backend. Sub-requests
//! of a fan-out run concurrently and are merged back by source index.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::conf;
use crate::erx::{Erx, ResultE};
use crate::model::envelope::{self, Shape};
use crate::web::client::{Client, ClientBuilder};
use crate::web::session::{Session, SessionSource};
use crate::web::url::with_query;

/// Who may call an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any signed-in user.
    Bearer,
    /// Signed in with the admin role.
    Admin,
}

/// A backend GET with its access level and accepted list shape.
#[derive(Debug, Clone)]
pub struct Endpoint {
    path: String,
    access: Access,
    query: Vec<(String, String)>,
    shape: Shape,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, access: Access) -> Self {
        Self { path: path.into(), access, query: Vec::new(), shape: Shape::LIST }
    }

    pub fn public(path: impl Into<String>) -> Self {
        Self::new(path, Access::Public)
    }

    pub fn bearer(path: impl Into<String>) -> Self {
        Self::new(path, Access::Bearer)
    }

    pub fn admin(path: impl Into<String>) -> Self {
        Self::new(path, Access::Admin)
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn access(&self) -> Access {
        self.access
    }

    /// Path plus encoded query, relative to the client base.
    pub fn path(&self) -> String {
        with_query(&self.path, &self.query)
    }
}

#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    sessions: Arc<dyn SessionSource>,
}

impl Fetcher {
    pub fn new(client: Client, sessions: Arc<dyn SessionSource>) -> Self {
        Self { client, sessions }
    }

    /// Client built from the `api` settings.
    pub fn from_settings(sessions: Arc<dyn SessionSource>) -> ResultE<Self> {
        let settings = conf::settings_snapshot();
        let client = ClientBuilder::from_settings(&settings.api).build()?;
        Ok(Self::new(client, sessions))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn session(&self) -> Option<Session> {
        self.sessions.session()
    }

    /// Token to send for `access`. Fails without issuing anything when the
    /// session is missing or lacks the admin role.
    pub fn authorize(&self, access: Access) -> ResultE<Option<String>> {
        if access == Access::Public {
            return Ok(None);
        }

        let session = self.session().ok_or_else(|| Erx::auth("Please log in to continue."))?;
        if access == Access::Admin && !session.is_admin() {
            return Err(Erx::auth("Administrator access required."));
        }
        Ok(Some(session.token))
    }

    /// Raw JSON body of `endpoint`.
    pub async fn value(&self, endpoint: &Endpoint) -> ResultE<Value> {
        let token = self.authorize(endpoint.access)?;
        let path = endpoint.path();
        let value = self.client.get_valued(&path, token.as_deref()).await.map_err(|e| {
            debug!("GET {} failed: {}", path, e);
            e
        })?;
        Ok(value)
    }

    /// List body of `endpoint`, normalized by its shape.
    pub async fn list<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> ResultE<Vec<T>> {
        let value = self.value(endpoint).await?;
        envelope::normalize(value, endpoint.shape)
    }

    /// A count: array length or `{ count }`.
    pub async fn count(&self, endpoint: &Endpoint) -> ResultE<usize> {
        let value = self.value(endpoint).await?;
        envelope::count(&value)
    }

    /// Run `f` for every item concurrently; results line up with `items`.
    pub async fn fan_out<I, F, Fut, S>(items: I, f: F) -> Vec<ResultE<S>>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Fut,
        Fut: Future<Output = ResultE<S>>,
    {
        join_all(items.into_iter().map(f)).await
    }

    /// Like [`Fetcher::fan_out`], with every failure replaced by a clone of
    /// `default` and logged as a partial result.
    pub async fn fan_out_or<I, F, Fut, S>(items: I, default: S, f: F) -> Vec<S>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Fut,
        Fut: Future<Output = ResultE<S>>,
        S: Clone,
    {
        Self::fan_out(items, f)
            .await
            .into_iter()
            .enumerate()
            .map(|(index, result)| match result {
                Ok(value) => value,
                Err(e) => {
                    warn!("{}", Erx::partial(&format!("sub-fetch {}", index), &e));
                    default.clone()
                },
            })
            .collect()
    }
}
