//! Manual trade pre-flight validation.

use std::collections::BTreeSet;

use crate::domain::{ManualTradeDraft, ManualTradeRequest, OrderSide, OrderType};
use crate::error::ValidationError;

/// Turn operator input into a wire request, or say why it cannot be sent.
///
/// Checks run in a fixed order and the first failure wins: quantity,
/// symbol presence, symbol membership, side, order type.
pub fn validate_manual_trade(
    draft: &ManualTradeDraft,
    allowed_symbols: &BTreeSet<String>,
) -> Result<ManualTradeRequest, ValidationError> {
    if draft.quantity.is_zero() || draft.quantity.is_sign_negative() {
        return Err(ValidationError::NonPositiveQuantity);
    }

    let symbol = draft.symbol.trim().to_lowercase();
    if symbol.is_empty() {
        return Err(ValidationError::EmptySymbol);
    }
    if !allowed_symbols.contains(&symbol) {
        return Err(ValidationError::UnknownSymbol { symbol });
    }

    let side: OrderSide = draft
        .side
        .parse()
        .map_err(|()| ValidationError::InvalidSide {
            side: draft.side.clone(),
        })?;

    let order_type = draft
        .order_type
        .parse::<OrderType>()
        .ok()
        .filter(|t| t.is_manual())
        .ok_or_else(|| ValidationError::InvalidOrderType {
            order_type: draft.order_type.clone(),
        })?;

    Ok(ManualTradeRequest {
        symbol,
        side,
        quantity: draft.quantity,
        order_type,
    })
}
