//! The server-side action layer.
//!
//! One operation per user-facing intent. Mutating actions share a uniform
//! shape: resolve the caller -> validate the submission -> optional blob
//! upload -> exactly one store mutation -> stale-path signal -> message or
//! redirect. Every fault is converted to an [`ActionResult::Error`] at this
//! boundary; redirects pass through to the presentation layer untouched.

pub mod favorite;
pub mod profile;
pub mod property;
pub mod review;

use std::sync::Arc;

use crate::blob::ObjectStore;
use crate::cache::Revalidator;
use crate::identity::{Identity, IdentityProvider, Session};
use crate::store::Store;

pub const HOME_ROUTE: &str = "/";
pub const PROFILE_ROUTE: &str = "/profile";
pub const PROFILE_CREATE_ROUTE: &str = "/profile/create";
pub const REVIEWS_ROUTE: &str = "/reviews";

/// Everything an action needs, threaded explicitly rather than held in
/// ambient request state.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn Store>,
    pub identity: Arc<dyn IdentityProvider>,
    pub blobs: Arc<dyn ObjectStore>,
    pub cache: Arc<dyn Revalidator>,
}

/// Tagged outcome of an action. Redirects are ordinary values here, not
/// control-flow exits; callers match on the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    Success(T),
    Error { message: String },
    Redirect(String),
}

impl<T> ActionResult<T> {
    pub fn error(err: impl std::fmt::Display) -> Self {
        ActionResult::Error {
            message: err.to_string(),
        }
    }

    pub fn is_redirect_to(&self, route: &str) -> bool {
        matches!(self, ActionResult::Redirect(r) if r == route)
    }

    /// The error message, if this is the error variant.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ActionResult::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// Why the identity gate turned a caller away.
#[derive(Debug)]
pub(crate) enum Gate {
    Unauthenticated,
    Redirect(String),
    Failed(String),
}

impl Gate {
    pub(crate) fn resolve<T>(self) -> ActionResult<T> {
        match self {
            Gate::Unauthenticated => ActionResult::Error {
                message: "You must be logged in to access this route".to_string(),
            },
            Gate::Redirect(route) => ActionResult::Redirect(route),
            Gate::Failed(message) => ActionResult::Error { message },
        }
    }
}

/// The identity gate. No identity fails the action; an identity that has
/// not finished onboarding is sent to profile creation before anything
/// else runs.
pub(crate) async fn require_user(ctx: &AppContext, session: &Session) -> Result<Identity, Gate> {
    match ctx.identity.current_user(session).await {
        Ok(Some(user)) if user.has_profile => Ok(user),
        Ok(Some(_)) => Err(Gate::Redirect(PROFILE_CREATE_ROUTE.to_string())),
        Ok(None) => Err(Gate::Unauthenticated),
        Err(e) => Err(Gate::Failed(e.to_string())),
    }
}
