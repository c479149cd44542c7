use std::future::Future;

use super::types::{ActRecord, ActSummary, UserContext};
use crate::sso::Profile;
use crate::types::{ActId, NationalId, UserId};

/// Error type for consumer-provided stores.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Consumer-provided identity provisioning.
///
/// Called during the OAuth callback to find or create the local user for a
/// verified external identity, and on authenticated requests to resolve the
/// user's authorization context.
///
/// # Example
///
/// ```rust,ignore
/// impl UserStore for MyAppState {
///     async fn find_or_create(
///         &self,
///         national_id: &NationalId,
///         profile: &Profile,
///     ) -> Result<UserId, StoreError> {
///         match self.repo.find_by_national_id(national_id).await? {
///             Some(user) => Ok(user.id),
///             None => Ok(self.repo.create(national_id, profile).await?.id),
///         }
///     }
/// }
/// ```
pub trait UserStore: Send + Sync + 'static {
    /// Find the existing user for `national_id` or create one from `profile`.
    ///
    /// Idempotent by national id: a second login for the same identity must
    /// return the same user. Implementations must back this with a uniqueness
    /// constraint (or equivalent lock) so that two concurrent first-logins
    /// cannot create two rows; a duplicate-key violation is resolved by
    /// returning the row that won, never surfaced to the caller.
    ///
    /// `profile` is transient provider data — use it to populate the new row,
    /// not as a persisted snapshot of the external identity.
    fn find_or_create(
        &self,
        national_id: &NationalId,
        profile: &Profile,
    ) -> impl Future<Output = Result<UserId, StoreError>> + Send;

    /// Resolve the company/organization and permission set for a user.
    fn context(
        &self,
        national_id: &NationalId,
    ) -> impl Future<Output = Result<UserContext, StoreError>> + Send;
}

/// Consumer-provided Act lookup.
///
/// Acts are owned by the persistence collaborator; the middleware only needs
/// an ordered candidate list and an ownership check. The session binding
/// itself lives in an encrypted cookie, so choosing an act writes nothing
/// through this trait.
pub trait ActStore: Send + Sync + 'static {
    /// List the acts a user may operate under, in presentation order.
    fn candidates(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<ActSummary>, StoreError>> + Send;

    /// Look up one act with its owner. `None` if it does not exist.
    fn find(
        &self,
        act_id: &ActId,
    ) -> impl Future<Output = Result<Option<ActRecord>, StoreError>> + Send;
}
