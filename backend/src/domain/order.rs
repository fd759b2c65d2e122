//! Gateway order handles.
//!
//! Orders live at the payment gateway; nothing here is persisted locally.

use serde::{Deserialize, Serialize};

use super::{CourseId, Price, UserId};

/// Currency used for every course purchase.
pub const CURRENCY: &str = "INR";

/// Settlement state reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order exists; no payment attempted.
    Created,
    /// A payment was attempted but not captured.
    Attempted,
    /// Payment captured.
    Paid,
}

impl OrderStatus {
    /// Only `paid` unlocks an enrollment.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// Parameters for a new gateway order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// Amount in minor units.
    pub amount: u64,
    /// ISO currency code.
    pub currency: String,
    /// Merchant reference tying the order to a course.
    pub receipt: String,
    /// User the order is raised for, recorded in the order notes.
    pub payer: String,
}

impl OrderRequest {
    /// Order for `payer` buying `course_id` at `price`.
    #[must_use]
    pub fn for_course(course_id: &CourseId, price: Price, payer: &UserId) -> Self {
        Self {
            amount: price.to_minor_units(),
            currency: CURRENCY.to_owned(),
            receipt: receipt_for(course_id),
            payer: payer.as_uuid().to_string(),
        }
    }
}

/// Receipt string recorded on orders for `course_id`.
#[must_use]
pub fn receipt_for(course_id: &CourseId) -> String {
    course_id.as_uuid().to_string()
}

/// Order as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOrder {
    /// Gateway order id.
    pub id: String,
    /// Amount in minor units.
    pub amount: u64,
    /// ISO currency code.
    pub currency: String,
    /// Merchant reference.
    pub receipt: String,
    /// Settlement state.
    pub status: OrderStatus,
    /// Payer recorded in the order notes. Absent for orders raised elsewhere.
    pub payer: Option<String>,
}

impl GatewayOrder {
    /// Whether the order was raised for `course_id`.
    #[must_use]
    pub fn is_for_course(&self, course_id: &CourseId) -> bool {
        self.receipt == receipt_for(course_id)
    }

    /// Whether the order was raised for `user_id`. Orders without a payer
    /// note belong to nobody.
    #[must_use]
    pub fn is_paid_by(&self, user_id: &UserId) -> bool {
        self.payer
            .as_deref()
            .and_then(|raw| UserId::new(raw).ok())
            .is_some_and(|payer| &payer == user_id)
    }
}
