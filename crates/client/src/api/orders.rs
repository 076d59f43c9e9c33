//! Order lookup (admin scope).

use storeprobe_core::{Order, OrderId};
use tracing::instrument;

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Fetch an order by entity id.
    ///
    /// # Errors
    ///
    /// Returns error if the order does not exist (404) or the token is not admin.
    #[instrument(skip(self, id), fields(order_id = %id))]
    pub async fn order(&self, id: OrderId) -> Result<Order, ApiError> {
        let url = self.endpoints().admin(["orders".to_string(), id.to_string()]);
        self.get(url).await
    }
}
