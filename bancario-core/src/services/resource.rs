//! Generic CRUD service over one backend collection
//!
//! Each entity implements [`Resource`] to name its collection endpoint and
//! payload types; `ResourceService<R>` supplies list/get/create/update/delete.
//! Entity-specific look-ups live in `impl ResourceService<Entity>` blocks in
//! the per-entity modules.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::domain::audit::{Created, Edited};
use crate::domain::result::{Error, Result};
use crate::domain::{Page, Validate};
use crate::ports::ApiRequest;

use super::gateway::ApiGateway;

/// A backend collection
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    /// Collection path. Used verbatim for list and create, so a trailing
    /// slash here is sent as-is.
    const ENDPOINT: &'static str;
    /// Human-readable singular name for messages
    const NAME: &'static str;

    type Create: Serialize + Validate + Send + Sync;
    type Update: Serialize + Validate + Send + Sync;

    fn id(&self) -> &str;
}

pub struct ResourceService<R: Resource> {
    pub(crate) gateway: ApiGateway,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self::new(self.gateway.clone())
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            _resource: PhantomData,
        }
    }

    /// `{ENDPOINT}/{segment}/...`, each segment percent-encoded
    pub(crate) fn path(segment: &str) -> String {
        Self::nested(&[segment])
    }

    pub(crate) fn nested(segments: &[&str]) -> String {
        let mut path = R::ENDPOINT.trim_end_matches('/').to_string();
        for segment in segments {
            path.push('/');
            path.push_str(&encode_segment(segment));
        }
        path
    }

    /// Id of the logged-in user, required before any write
    pub(crate) fn require_user_id(&self) -> Result<String> {
        self.gateway
            .session()
            .current_user_id()
            .ok_or_else(|| Error::auth("no authenticated user"))
    }

    pub async fn list(&self, page: Page) -> Result<Vec<R>> {
        self.gateway.get(R::ENDPOINT, page.to_params()).await
    }

    pub async fn get(&self, id: &str) -> Result<R> {
        self.gateway
            .get(&Self::path(id), Vec::new())
            .await
            .map_err(|e| match e {
                Error::NotFound(_) => Error::not_found(format!("{} '{}' not found", R::NAME, id)),
                other => other,
            })
    }

    pub async fn create(&self, input: &R::Create) -> Result<R> {
        input.validate().into_result()?;
        let user_id = self.require_user_id()?;
        debug!(entity = R::NAME, "create");

        let body = Created {
            body: input,
            id_usuario_creacion: &user_id,
        };
        let created: R = self.gateway.post(R::ENDPOINT, &body).await?;
        debug!(entity = R::NAME, id = created.id(), "created");
        Ok(created)
    }

    pub async fn update(&self, id: &str, changes: &R::Update) -> Result<R> {
        changes.validate().into_result()?;
        let user_id = self.require_user_id()?;
        debug!(entity = R::NAME, id, "update");

        let body = Edited {
            body: changes,
            id_usuario_edicion: &user_id,
        };
        self.gateway.put(&Self::path(id), &body).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        debug!(entity = R::NAME, id, "delete");
        self.gateway.delete(&Self::path(id)).await
    }

    /// Raw request against this collection, for look-ups outside the CRUD set
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.gateway.send(request).await
    }
}

/// Percent-encode one path segment (`/`, `?`, `#`, spaces...)
pub(crate) fn encode_segment(segment: &str) -> String {
    let Ok(mut scratch) = Url::parse("http://localhost/") else {
        return segment.to_string();
    };
    if let Ok(mut segments) = scratch.path_segments_mut() {
        segments.clear().push(segment);
    }
    scratch.path().trim_start_matches('/').to_string()
}
