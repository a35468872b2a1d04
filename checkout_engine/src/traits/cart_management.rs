use crate::traits::OrderGatewayError;

#[allow(async_fn_in_trait)]
pub trait CartManagement {
    /// Empties the buyer's cart. Only called after every sub-order of a checkout has been confirmed.
    async fn clear_cart(&self) -> Result<(), OrderGatewayError>;
}
