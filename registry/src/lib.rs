use std::sync::Arc;

use adapter::{
    database::ConnectionPool,
    gateway::payment::HttpPaymentGateway,
    memory::MemoryStore,
    repository::{
        booking::BookingRepositoryImpl, health::HealthCheckRepositoryImpl,
        schedule::ScheduleRepositoryImpl,
    },
};
use kernel::{
    gateway::PaymentGateway,
    model::time_slot::TimeSlotCatalog,
    repository::{
        booking::BookingRepository, health::HealthCheckRepository,
        schedule::ScheduleRepository,
    },
    service::{
        availability::AvailabilityFilter, booking_ledger::BookingLedger,
        mentor_activity::MentorActivityView, schedule_store::ScheduleStore,
    },
};
use shared::{
    config::{AppConfig, BookingConfig, PaymentConfig},
    error::AppResult,
};

// 各リポジトリと外部ゲートウェイをまとめて保持する
pub struct RegistryParts {
    pub catalog: Arc<TimeSlotCatalog>,
    pub schedule_repository: Arc<dyn ScheduleRepository>,
    pub booking_repository: Arc<dyn BookingRepository>,
    pub health_check_repository: Arc<dyn HealthCheckRepository>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
}

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    schedule_store: Arc<ScheduleStore>,
    availability_filter: Arc<AvailabilityFilter>,
    booking_ledger: Arc<BookingLedger>,
    mentor_activity_view: Arc<MentorActivityView>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: &AppConfig) -> AppResult<Self> {
        let catalog = Arc::new(TimeSlotCatalog::standard());
        let parts = RegistryParts {
            schedule_repository: Arc::new(ScheduleRepositoryImpl::new(
                pool.clone(),
                catalog.clone(),
            )),
            booking_repository: Arc::new(BookingRepositoryImpl::new(
                pool.clone(),
                catalog.clone(),
            )),
            health_check_repository: Arc::new(HealthCheckRepositoryImpl::new(pool)),
            payment_gateway: Arc::new(HttpPaymentGateway::new(&app_config.payment)?),
            catalog,
        };
        Ok(Self::from_parts(parts, app_config.booking, &app_config.payment))
    }

    pub fn in_memory(app_config: &AppConfig) -> AppResult<Self> {
        let gateway = Arc::new(HttpPaymentGateway::new(&app_config.payment)?);
        Ok(Self::in_memory_with_gateway(
            gateway,
            app_config.booking,
            &app_config.payment,
        ))
    }

    pub fn in_memory_with_gateway(
        payment_gateway: Arc<dyn PaymentGateway>,
        booking: BookingConfig,
        payment: &PaymentConfig,
    ) -> Self {
        let store = Arc::new(MemoryStore::new());
        let parts = RegistryParts {
            catalog: Arc::new(TimeSlotCatalog::standard()),
            schedule_repository: store.clone(),
            booking_repository: store.clone(),
            health_check_repository: store,
            payment_gateway,
        };
        Self::from_parts(parts, booking, payment)
    }

    pub fn from_parts(
        parts: RegistryParts,
        booking: BookingConfig,
        payment: &PaymentConfig,
    ) -> Self {
        let RegistryParts {
            catalog,
            schedule_repository,
            booking_repository,
            health_check_repository,
            payment_gateway,
        } = parts;
        let lead_time = chrono::Duration::hours(booking.lead_time_hours);

        Self {
            health_check_repository,
            schedule_store: Arc::new(ScheduleStore::new(catalog, schedule_repository.clone())),
            availability_filter: Arc::new(AvailabilityFilter::new(
                schedule_repository.clone(),
                lead_time,
            )),
            booking_ledger: Arc::new(BookingLedger::new(
                schedule_repository,
                booking_repository.clone(),
                payment_gateway,
                lead_time,
                payment.timeout,
            )),
            mentor_activity_view: Arc::new(MentorActivityView::new(booking_repository)),
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn schedule_store(&self) -> Arc<ScheduleStore> {
        self.schedule_store.clone()
    }

    pub fn availability_filter(&self) -> Arc<AvailabilityFilter> {
        self.availability_filter.clone()
    }

    pub fn booking_ledger(&self) -> Arc<BookingLedger> {
        self.booking_ledger.clone()
    }

    pub fn mentor_activity_view(&self) -> Arc<MentorActivityView> {
        self.mentor_activity_view.clone()
    }
}
