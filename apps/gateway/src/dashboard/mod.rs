//! Seller dashboard aggregation.
//!
//! One protected endpoint composes a seller's view of their business from
//! three independent backends: stores from the store service, bookings per
//! store from the booking service (fanned out concurrently), and payments
//! across all owned stores from the payment service. The join is
//! all-or-nothing: one failing branch fails the request with no partial
//! data. Tenant isolation is implicit — bookings and payments are only ever
//! queried by the caller's own store ids.

pub mod model;

use futures_util::future::try_join_all;
use serde::Deserialize;
use tracing::debug;

use crate::config::upstreams::Upstream;
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::upstream::graphql;

use model::{Booking, DashboardSummary, Payment, PaymentStatus, Store};

const MY_STORES_QUERY: &str = r"
  query MyStores($ownerId: ID!) {
    myStores(ownerId: $ownerId) {
      id
      name
      address
      rating
      reviewCount
    }
  }
";

const STORE_BOOKINGS_QUERY: &str = r"
  query StoreBookings($storeId: String!) {
    storeBookings(storeId: $storeId) {
      id
      userName
      serviceName: serviceLabel
      weight
      totalPrice
      status
      checkInDate
      createdAt
    }
  }
";

const PAYMENTS_BY_STORES_QUERY: &str = r"
  query PaymentsByStores($storeIds: [String!]!) {
    paymentsByStores(storeIds: $storeIds) {
      id
      amount
      status
    }
  }
";

#[derive(Deserialize)]
struct MyStoresData {
    #[serde(rename = "myStores", default)]
    my_stores: Vec<Store>,
}

#[derive(Deserialize)]
struct StoreBookingsData {
    #[serde(rename = "storeBookings", default)]
    store_bookings: Vec<Booking>,
}

#[derive(Deserialize)]
struct PaymentsByStoresData {
    #[serde(rename = "paymentsByStores", default)]
    payments_by_stores: Vec<Payment>,
}

/// Build the dashboard summary for the seller identified by `owner_id`.
///
/// `authorization` is the caller's original Authorization header value,
/// replayed to each backend.
pub async fn assemble(
    state: &AppState,
    owner_id: i64,
    authorization: &str,
) -> Result<DashboardSummary, AppError> {
    let stores = graphql::execute::<MyStoresData>(
        state,
        Upstream::Stores,
        MY_STORES_QUERY,
        serde_json::json!({ "ownerId": owner_id }),
        authorization,
    )
    .await?
    .my_stores;

    // A seller without stores has nothing to aggregate; skip the other
    // two services entirely.
    if stores.is_empty() {
        return Ok(DashboardSummary::empty());
    }

    let store_ids: Vec<String> = stores.iter().map(|s| s.id.clone()).collect();

    let booking_queries = store_ids.iter().map(|store_id| {
        graphql::execute::<StoreBookingsData>(
            state,
            Upstream::Bookings,
            STORE_BOOKINGS_QUERY,
            serde_json::json!({ "storeId": store_id }),
            authorization,
        )
    });
    let bookings: Vec<Booking> = try_join_all(booking_queries)
        .await?
        .into_iter()
        .flat_map(|data| data.store_bookings)
        .collect();

    let payments = graphql::execute::<PaymentsByStoresData>(
        state,
        Upstream::Payments,
        PAYMENTS_BY_STORES_QUERY,
        serde_json::json!({ "storeIds": store_ids }),
        authorization,
    )
    .await?
    .payments_by_stores;

    debug!(
        stores = stores.len(),
        bookings = bookings.len(),
        payments = payments.len(),
        "dashboard aggregation complete"
    );

    let active_orders = bookings.iter().filter(|b| b.status.is_active()).count();
    let total_revenue = paid_revenue(&payments);
    let recent_bookings = recent(bookings);

    Ok(DashboardSummary {
        stores,
        active_orders,
        total_revenue,
        recent_bookings,
    })
}

/// Most recent bookings first, capped at 5.
fn recent(mut bookings: Vec<Booking>) -> Vec<Booking> {
    bookings.sort_by(|a, b| b.created_at_ts().cmp(&a.created_at_ts()));
    bookings.truncate(5);
    bookings
}

/// Revenue counts settled money only: PAID payments, nothing else.
fn paid_revenue(payments: &[Payment]) -> f64 {
    payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Paid)
        .map(|p| p.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::model::{Booking, BookingStatus, Payment, PaymentStatus};
    use super::{paid_revenue, recent};

    fn booking(id: &str, status: BookingStatus, created_at: Option<&str>) -> Booking {
        Booking {
            id: id.to_string(),
            user_name: "Customer".to_string(),
            service_name: Some("Wash & Fold".to_string()),
            weight: 3.0,
            total_price: 45_000.0,
            status,
            check_in_date: None,
            created_at: created_at.map(str::to_string),
        }
    }

    fn payment(amount: f64, status: PaymentStatus) -> Payment {
        Payment {
            id: "p".to_string(),
            amount,
            status,
        }
    }

    #[test]
    fn active_statuses_classified() {
        let bookings = [
            booking("1", BookingStatus::Pending, None),
            booking("2", BookingStatus::Completed, None),
            booking("3", BookingStatus::Cancelled, None),
            booking("4", BookingStatus::Ready, None),
        ];
        let active = bookings.iter().filter(|b| b.status.is_active()).count();
        assert_eq!(active, 2);
    }

    #[test]
    fn recent_sorts_newest_first_and_caps_at_five() {
        let mut bookings = Vec::new();
        for day in 1..=7 {
            bookings.push(booking(
                &format!("b{day}"),
                BookingStatus::Pending,
                Some(&format!("2026-03-{day:02}T10:00:00Z")),
            ));
        }

        let recent = recent(bookings);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].id, "b7");
        assert_eq!(recent[4].id, "b3");
    }

    #[test]
    fn recent_tolerates_missing_timestamps() {
        let bookings = vec![
            booking("dated", BookingStatus::Pending, Some("2026-03-01T10:00:00Z")),
            booking("undated", BookingStatus::Pending, None),
        ];

        let recent = recent(bookings);
        assert_eq!(recent[0].id, "dated");
        assert_eq!(recent[1].id, "undated");
    }

    #[test]
    fn revenue_counts_only_paid() {
        let payments = [
            payment(50_000.0, PaymentStatus::Paid),
            payment(25_000.0, PaymentStatus::Pending),
            payment(10_000.0, PaymentStatus::Refunded),
            payment(30_000.0, PaymentStatus::Paid),
        ];
        assert_eq!(paid_revenue(&payments), 80_000.0);
    }
}
