use chrono::NaiveDate;
use rentcar_core::document::DocumentStore;
use rentcar_core::repository::{BlogRepository, BookingRepository, CarRepository, ProfileRepository};
use rentcar_shared::DomainEvent;
use rentcar_store::app_config::{AuthConfig, BusinessRules, StorageConfig};
use rentcar_store::{MemoryStore, RedisClient};
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AppState {
    pub cars: Arc<dyn CarRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub blog: Arc<dyn BlogRepository>,
    pub documents: Arc<dyn DocumentStore>,
    /// Rate limiting is off when unset
    pub redis: Option<Arc<RedisClient>>,
    pub events: broadcast::Sender<DomainEvent>,
    pub auth: AuthConfig,
    pub business_rules: BusinessRules,
    pub storage: StorageConfig,
}

impl AppState {
    /// State backed entirely by one process-local store.
    pub fn in_memory(
        store: Arc<MemoryStore>,
        documents: Arc<dyn DocumentStore>,
        auth: AuthConfig,
        business_rules: BusinessRules,
        storage: StorageConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(100);
        Self {
            cars: store.clone(),
            bookings: store.clone(),
            profiles: store.clone(),
            blog: store,
            documents,
            redis: None,
            events,
            auth,
            business_rules,
            storage,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.business_rules.today()
    }

    /// Fan out to SSE subscribers. Having none is not an error.
    pub fn publish(&self, event: DomainEvent) {
        let name = event.name();
        match self.events.send(event) {
            Ok(receivers) => tracing::debug!("Published {} to {} subscribers", name, receivers),
            Err(_) => tracing::debug!("Published {} with no subscribers", name),
        }
    }
}
