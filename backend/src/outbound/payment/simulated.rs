//! In-process payment gateway.
//!
//! Orders start as `created` and only become `paid` through
//! [`SimulatedGateway::settle`], which stands in for the customer completing
//! checkout. Used when no gateway credentials are configured.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::ports::{PaymentGateway, PaymentGatewayError};
use crate::domain::{GatewayOrder, OrderRequest, OrderStatus};

const ORDER_ID_SUFFIX_LEN: usize = 14;

/// Gateway double that keeps orders in memory. Cloning shares the orders.
#[derive(Debug, Default, Clone)]
pub struct SimulatedGateway {
    orders: Arc<RwLock<HashMap<String, GatewayOrder>>>,
}

impl SimulatedGateway {
    /// Create a gateway with no orders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an order as paid. Returns `false` for unknown ids.
    pub async fn settle(&self, order_id: &str) -> bool {
        self.set_status(order_id, OrderStatus::Paid).await
    }

    /// Record a failed payment attempt. Returns `false` for unknown ids.
    pub async fn attempt(&self, order_id: &str) -> bool {
        self.set_status(order_id, OrderStatus::Attempted).await
    }

    async fn set_status(&self, order_id: &str, status: OrderStatus) -> bool {
        let mut orders = self.orders.write().await;
        match orders.get_mut(order_id) {
            Some(order) => {
                order.status = status;
                info!(%order_id, ?status, "simulated order updated");
                true
            }
            None => false,
        }
    }
}

fn new_order_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ORDER_ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("order_{suffix}")
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn create_order(
        &self,
        request: &OrderRequest,
    ) -> Result<GatewayOrder, PaymentGatewayError> {
        if request.amount == 0 {
            return Err(PaymentGatewayError::invalid_request(
                "amount must be at least one minor unit",
            ));
        }
        let order = GatewayOrder {
            id: new_order_id(),
            amount: request.amount,
            currency: request.currency.clone(),
            receipt: request.receipt.clone(),
            status: OrderStatus::Created,
            payer: Some(request.payer.clone()),
        };
        self.orders
            .write()
            .await
            .insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, PaymentGatewayError> {
        self.orders
            .read()
            .await
            .get(order_id)
            .cloned()
            .ok_or_else(|| {
                PaymentGatewayError::invalid_request(format!("order {order_id} does not exist"))
            })
    }
}
