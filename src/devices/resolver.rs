//! Two-tier device resolution: turn context first, shared cache second

use std::sync::Arc;
use std::time::Duration;

use super::{Device, DeviceCache, DiscoverySnapshot, NameMatcher};
use crate::player::PlayerApi;
use crate::session::TurnContext;
use crate::{Error, Result};

/// Cache key for a user's device snapshot
#[must_use]
pub fn cache_key(user_id: &str) -> String {
    format!("{user_id}:devices")
}

/// Resolves spoken device references against the user's latest snapshot
///
/// Lookups never fail: upstream errors are recorded as a status code on the
/// turn context and resolve to an empty device list.
pub struct DeviceResolver {
    api: Arc<dyn PlayerApi>,
    cache: Arc<dyn DeviceCache>,
    cache_ttl: Duration,
    matcher: NameMatcher,
}

impl DeviceResolver {
    /// Create a resolver
    ///
    /// # Arguments
    ///
    /// * `api` - Player API used for device listings
    /// * `cache` - Cross-turn snapshot store
    /// * `cache_ttl` - How long a stored snapshot stays usable
    /// * `matcher` - Name matcher carrying the acceptance threshold
    #[must_use]
    pub fn new(
        api: Arc<dyn PlayerApi>,
        cache: Arc<dyn DeviceCache>,
        cache_ttl: Duration,
        matcher: NameMatcher,
    ) -> Self {
        Self {
            api,
            cache,
            cache_ttl,
            matcher,
        }
    }

    /// Devices known for the current user
    ///
    /// A continuing conversation uses the snapshot stored on the turn. A new
    /// conversation falls back to the shared cache, and on a cache miss fetches
    /// a fresh listing once.
    pub async fn devices<T>(&self, ctx: &mut T) -> DiscoverySnapshot
    where
        T: TurnContext + ?Sized,
    {
        if !ctx.is_new() {
            return ctx.devices().unwrap_or_default();
        }

        let key = cache_key(ctx.user_id());
        if let Some(snapshot) = self.cache.get(&key) {
            tracing::debug!(user_id = ctx.user_id(), count = snapshot.len(), "device cache hit");
            return snapshot;
        }

        tracing::debug!(user_id = ctx.user_id(), "device cache miss, listing devices");
        match self.refresh(ctx).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(user_id = ctx.user_id(), error = %e, "device listing failed");
                ctx.record_status(e.status_code());
                DiscoverySnapshot::default()
            }
        }
    }

    /// Fetch a fresh listing and store it on the turn and in the cache
    ///
    /// # Errors
    ///
    /// Returns error if the account is not linked or the listing call fails
    pub async fn refresh<T>(&self, ctx: &mut T) -> Result<DiscoverySnapshot>
    where
        T: TurnContext + ?Sized,
    {
        let token = ctx.access_token().ok_or(Error::AccountNotLinked)?;
        let listed = self.api.list_devices(token).await?;
        let snapshot = DiscoverySnapshot::from_listing(listed);

        ctx.store_devices(&snapshot);
        self.cache
            .set(&cache_key(ctx.user_id()), snapshot.clone(), self.cache_ttl);

        tracing::debug!(user_id = ctx.user_id(), count = snapshot.len(), "stored device snapshot");
        Ok(snapshot)
    }

    /// Resolve a device by the number it was announced with
    ///
    /// The number is expected to be range-checked by the caller.
    pub async fn find_by_number<T>(&self, ctx: &mut T, number: u32) -> Option<Device>
    where
        T: TurnContext + ?Sized,
    {
        self.devices(ctx).await.by_number(number).cloned()
    }

    /// Resolve a device by approximate name
    pub async fn find_by_name<T>(&self, ctx: &mut T, query: &str) -> Option<Device>
    where
        T: TurnContext + ?Sized,
    {
        let snapshot = self.devices(ctx).await;
        self.matcher.best_match(query, &snapshot).cloned()
    }
}
