//! Wire types shared with the GraphQL backends.
//!
//! Field names follow the backends' camelCase schema; the gateway reads and
//! re-emits them unchanged in the dashboard response.

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Processing,
    Ready,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// An order still moving through the shop. COMPLETED and CANCELLED are
    /// the exhaustive complement.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            BookingStatus::Pending
                | BookingStatus::Confirmed
                | BookingStatus::Processing
                | BookingStatus::Ready
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub user_name: String,
    /// Aliased from the backend's `serviceLabel` in the gateway query.
    pub service_name: Option<String>,
    pub weight: f64,
    pub total_price: f64,
    pub status: BookingStatus,
    pub check_in_date: Option<String>,
    pub created_at: Option<String>,
}

impl Booking {
    /// Creation time parsed from the backend's RFC 3339 string; `None` when
    /// absent or unparseable, which sorts after any dated booking.
    pub fn created_at_ts(&self) -> Option<OffsetDateTime> {
        self.created_at
            .as_deref()
            .and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub amount: f64,
    pub status: PaymentStatus,
}

/// The composed dashboard response. Request-scoped; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub stores: Vec<Store>,
    pub active_orders: usize,
    pub total_revenue: f64,
    pub recent_bookings: Vec<Booking>,
}

impl DashboardSummary {
    /// The zeroed summary returned when the seller owns no stores.
    pub fn empty() -> Self {
        Self {
            stores: Vec::new(),
            active_orders: 0,
            total_revenue: 0.0,
            recent_bookings: Vec::new(),
        }
    }
}
