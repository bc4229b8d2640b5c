#![allow(dead_code)]

use std::{collections::VecDeque, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use kernel::{
    gateway::{PaymentGateway, PaymentHandle},
    model::{
        booking::{
            event::{ReserveSchedule, TransitionBooking},
            Booking, BookingStatus, ServiceCategory,
        },
        id::{BookingId, ScheduleId, TimeSlotId, UserId},
        role::{Actor, Role},
        schedule::{event::CreateSchedule, Schedule},
    },
};
use parking_lot::Mutex;
use registry::AppRegistry;
use rust_decimal::Decimal;
use shared::{
    config::{BookingConfig, PaymentConfig},
    error::{AppError, AppResult},
};

pub const PAYMENT_TIMEOUT: Duration = Duration::from_millis(200);

// 2026-10-17 09:00
pub fn now() -> NaiveDateTime {
    today().and_hms_opt(9, 0, 0).unwrap()
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

pub fn tomorrow() -> NaiveDate {
    today().succ_opt().unwrap()
}

pub fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0).unwrap()
}

pub fn price(amount: i64) -> Decimal {
    Decimal::new(amount, 0)
}

#[derive(Debug, Clone, Copy)]
pub enum GatewayReply {
    Accept,
    Reject,
    Hang,
}

/// Payment gateway double answering from a script, accepting once the script runs out.
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<VecDeque<GatewayReply>>,
    calls: Mutex<Vec<(BookingId, Decimal)>>,
}

impl ScriptedGateway {
    pub fn with_script(replies: impl IntoIterator<Item = GatewayReply>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self) -> Vec<(BookingId, Decimal)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn initiate_payment(&self, booking_id: BookingId, amount: Decimal) -> AppResult<PaymentHandle> {
        self.calls.lock().push((booking_id, amount));
        let reply = self.script.lock().pop_front().unwrap_or(GatewayReply::Accept);
        match reply {
            GatewayReply::Accept => Ok(PaymentHandle {
                payment_id: format!("pay_{booking_id}"),
                redirect_url: format!("https://pay.example/checkout/{booking_id}"),
            }),
            GatewayReply::Reject => Err(AppError::UpstreamError("card declined".into())),
            GatewayReply::Hang => {
                tokio::time::sleep(PAYMENT_TIMEOUT * 10).await;
                Err(AppError::UpstreamError("should have timed out".into()))
            }
        }
    }
}

pub struct Harness {
    pub registry: AppRegistry,
    pub gateway: Arc<ScriptedGateway>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_gateway(ScriptedGateway::default())
    }

    pub fn with_gateway(gateway: ScriptedGateway) -> Self {
        let gateway = Arc::new(gateway);
        let registry = AppRegistry::in_memory_with_gateway(
            gateway.clone(),
            BookingConfig { lead_time_hours: 3 },
            &PaymentConfig {
                timeout: PAYMENT_TIMEOUT,
                ..PaymentConfig::default()
            },
        );
        Self { registry, gateway }
    }

    pub async fn open_schedule(&self, mentor_id: UserId, date: NaiveDate, slot_ids: &[i32]) -> Schedule {
        self.registry
            .schedule_store()
            .create(CreateSchedule::new(
                mentor_id,
                date,
                price(500_000),
                slot_ids.iter().copied().map(TimeSlotId::new).collect(),
                now(),
            ))
            .await
            .unwrap()
    }

    pub async fn reserve(&self, schedule_id: ScheduleId, mentee_id: UserId) -> AppResult<Booking> {
        self.registry
            .booking_ledger()
            .reserve(ReserveSchedule::new(
                schedule_id,
                mentee_id,
                "I want to discuss visa options".into(),
                ServiceCategory::Procedures,
                now(),
            ))
            .await
            .map(|reservation| reservation.booking)
    }

    pub async fn transition(
        &self,
        booking_id: BookingId,
        actor: Actor,
        target: BookingStatus,
        reason: Option<&str>,
    ) -> AppResult<Booking> {
        self.registry
            .booking_ledger()
            .transition(TransitionBooking::new(
                booking_id,
                actor,
                target,
                reason.map(str::to_string),
                now(),
            ))
            .await
    }

    pub async fn is_booked(&self, schedule_id: ScheduleId) -> bool {
        self.registry
            .schedule_store()
            .get_by_id(schedule_id)
            .await
            .unwrap()
            .is_booked
    }
}

pub fn mentor(user_id: UserId) -> Actor {
    Actor::new(user_id, Role::Mentor)
}

pub fn mentee(user_id: UserId) -> Actor {
    Actor::new(user_id, Role::Mentee)
}
