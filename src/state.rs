use crate::identity::Identity;
use crate::models::TrackerData;
use crate::storage::{ScopedStore, Store};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;

type Profile = Arc<Mutex<TrackerData>>;

/// Idle profiles kept in memory before unlocked ones are dropped. Everything
/// cached has already been persisted, so eviction only costs a reload.
const PROFILE_CACHE_LIMIT: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub default_identity: Identity,
    profiles: Arc<Mutex<HashMap<Identity, Profile>>>,
}

impl AppState {
    pub fn new(store: Store, default_identity: Identity) -> Self {
        Self {
            store,
            default_identity,
            profiles: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Locks the data for `identity`, loading it from the store on first use.
    /// Mutations for one identity are serialized by holding this guard.
    pub async fn profile(&self, identity: &Identity) -> OwnedMutexGuard<TrackerData> {
        let profile = {
            let mut profiles = self.profiles.lock().await;
            match profiles.get(identity) {
                Some(profile) => Arc::clone(profile),
                None => {
                    let data = self.store.scoped(identity).load().await;
                    info!(
                        identity = %identity,
                        tasks = data.tasks.len(),
                        logged_days = data.log.len(),
                        "loaded profile"
                    );
                    if profiles.len() >= PROFILE_CACHE_LIMIT {
                        profiles.retain(|_, cached| Arc::strong_count(cached) > 1);
                    }
                    let profile = Arc::new(Mutex::new(data));
                    profiles.insert(identity.clone(), Arc::clone(&profile));
                    profile
                }
            }
        };
        profile.lock_owned().await
    }

    pub fn scoped_store(&self, identity: &Identity) -> ScopedStore {
        self.store.scoped(identity)
    }
}
