//! Request-scoped context
//!
//! A `Context` is built once per inbound request and handed to every
//! repository, service and store call made on behalf of that request. It is
//! never cached or shared between requests.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::auth::Principal;

#[derive(Debug, Clone)]
pub struct Context {
    request_id: Uuid,
    principal: Option<Principal>,
}

impl Context {
    pub fn new(principal: Option<Principal>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            principal,
        }
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }

    pub fn for_user(eperson_id: Uuid) -> Self {
        Self::new(Some(Principal::new(eperson_id)))
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn current_user(&self) -> Option<Uuid> {
        self.principal.as_ref().map(|p| p.eperson_id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// Same request, evaluated as another eperson. Used when checking
    /// authorizations on behalf of a user other than the caller.
    pub fn as_user(&self, eperson_id: Option<Uuid>) -> Self {
        Self {
            request_id: self.request_id,
            principal: eperson_id.map(Principal::new),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts.extensions.get::<Principal>().cloned();
        Ok(Context::new(principal))
    }
}
