//! DTOs for the Razorpay orders API.
//!
//! The adapter decodes into these transport DTOs first, then maps into
//! [`GatewayOrder`] in one pass.

use serde::{Deserialize, Serialize};

use crate::domain::{GatewayOrder, OrderRequest, OrderStatus};

/// Body of `POST /v1/orders`.
#[derive(Debug, Serialize)]
pub(super) struct CreateOrderDto<'a> {
    pub(super) amount: u64,
    pub(super) currency: &'a str,
    pub(super) receipt: &'a str,
    pub(super) notes: NotesDto<'a>,
}

impl<'a> From<&'a OrderRequest> for CreateOrderDto<'a> {
    fn from(request: &'a OrderRequest) -> Self {
        Self {
            amount: request.amount,
            currency: &request.currency,
            receipt: &request.receipt,
            notes: NotesDto {
                user_id: &request.payer,
            },
        }
    }
}

/// Key-value notes attached to an order on creation.
#[derive(Debug, Serialize)]
pub(super) struct NotesDto<'a> {
    pub(super) user_id: &'a str,
}

/// Notes as read back. Razorpay returns `[]` when an order has none.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
pub(super) enum ReturnedNotesDto {
    Keyed {
        #[serde(default)]
        user_id: Option<String>,
    },
    #[default]
    Empty,
    Other(serde_json::Value),
}

impl ReturnedNotesDto {
    fn into_payer(self) -> Option<String> {
        match self {
            Self::Keyed { user_id } => user_id,
            Self::Empty | Self::Other(_) => None,
        }
    }
}

/// Order entity returned by create and fetch.
#[derive(Debug, Deserialize)]
pub(super) struct OrderDto {
    pub(super) id: String,
    pub(super) amount: u64,
    pub(super) currency: String,
    #[serde(default)]
    pub(super) receipt: Option<String>,
    pub(super) status: OrderStatus,
    #[serde(default)]
    pub(super) notes: ReturnedNotesDto,
}

impl From<OrderDto> for GatewayOrder {
    fn from(dto: OrderDto) -> Self {
        Self {
            id: dto.id,
            amount: dto.amount,
            currency: dto.currency,
            receipt: dto.receipt.unwrap_or_default(),
            status: dto.status,
            payer: dto.notes.into_payer(),
        }
    }
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    pub(super) error: ErrorDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorDto {
    #[serde(default)]
    pub(super) code: Option<String>,
    #[serde(default)]
    pub(super) description: Option<String>,
}
