//! Cart operations against the session-scoped checkout API.
//!
//! A cart is an Ecwid checkout. Every call after creation authenticates
//! with the checkout's session token and is never cached. Ecwid mutates one
//! cart item per call, so batches are reduced to their first line.

use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::{CacheTag, EcwidClient, EcwidRequest, STOREFRONT_LANG};
use crate::ecwid::EcwidError;
use crate::ecwid::api::{
    AddCartItemPayload, CartItemIdentifierPayload, EcwidCheckout, EcwidCheckoutSession, EcwidNode,
    EcwidOptionSelection, LangPayload, NewCartItem, RemoveCartItemPayload,
};
use crate::ecwid::reshape::{empty_cart, reshape_order};
use crate::ecwid::types::{Cart, CartLineInput, CartLineUpdateInput, VariantId};

/// First entry of a batch; extra entries are logged and dropped.
fn first_line<'a, T>(lines: &'a [T], operation: &str) -> Result<&'a T, EcwidError> {
    if lines.len() > 1 {
        warn!(
            operation,
            ignored = lines.len() - 1,
            "Ecwid mutates one cart item per call, ignoring extra lines"
        );
    }
    lines
        .first()
        .ok_or_else(|| EcwidError::MissingPrecondition(format!("{operation}: no cart lines")))
}

/// `selectedOptions` map for a cart item identifier.
///
/// Each option of the id is sent with the type the product declares for
/// it; options the product does not declare are dropped. `None` when
/// nothing remains.
fn selected_options_payload(
    id: &VariantId,
    product: Option<&EcwidNode>,
) -> Result<Option<Map<String, Value>>, EcwidError> {
    let mut selected = Map::new();

    for option in id.options() {
        let declared = product.and_then(|p| p.options.iter().find(|o| o.name == option.name));
        let Some(declared) = declared else {
            debug!(option = %option.name, "Dropping option the product does not declare");
            continue;
        };

        let selection = EcwidOptionSelection {
            option_type: declared.option_type.clone(),
            choice: option.value.clone(),
        };
        selected.insert(option.name.clone(), serde_json::to_value(selection)?);
    }

    Ok((!selected.is_empty()).then_some(selected))
}

fn numeric_product_id(id: &VariantId) -> Result<u64, EcwidError> {
    id.product_id()
        .parse::<u64>()
        .map_err(|_| EcwidError::NotFound(format!("Product not found: {}", id.product_id())))
}

impl EcwidClient {
    /// Storefront API request authenticated with a cart session token.
    fn session_request(path: &str, session_token: &str) -> EcwidRequest {
        EcwidRequest::storefront_post(path)
            .bearer(session_token)
            .tag(CacheTag::Cart)
            .no_store()
    }

    /// POST a session-scoped checkout call and reshape the returned order.
    async fn checkout_call(&self, request: EcwidRequest) -> Result<Cart, EcwidError> {
        let checkout: EcwidCheckout = self
            .fetch(request)
            .await?
            .ok_or_else(|| EcwidError::NotFound("Checkout not found".to_string()))?;

        Ok(reshape_order(&checkout.checkout, &self.currency_code()))
    }

    /// Build the identifier Ecwid uses to address a cart item.
    async fn cart_item_identifier(
        &self,
        merchandise_id: &str,
    ) -> Result<CartItemIdentifierPayload, EcwidError> {
        let id = VariantId::parse(merchandise_id)?;
        let product_id = numeric_product_id(&id)?;

        let product = if id.options().is_empty() {
            None
        } else {
            let node = self.get_product_node(id.product_id()).await?;
            if node.is_none() {
                warn!(product_id, "Product not found, sending no options");
            }
            node
        };

        Ok(CartItemIdentifierPayload {
            product_id,
            selected_options: selected_options_payload(&id, product.as_ref())?,
        })
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Start a new checkout session.
    ///
    /// The returned cart is empty and carries the session token every later
    /// cart call needs.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Ecwid returns no session.
    #[instrument(skip(self))]
    pub async fn create_cart(&self) -> Result<Cart, EcwidError> {
        let request = EcwidRequest::storefront_post("/checkout/create")
            .tag(CacheTag::Cart)
            .no_store()
            .json(serde_json::to_value(LangPayload {
                lang: STOREFRONT_LANG,
            })?);

        let session: EcwidCheckoutSession = self
            .fetch(request)
            .await?
            .ok_or_else(|| EcwidError::NotFound("Checkout session not created".to_string()))?;

        Ok(empty_cart(
            session.checkout_id,
            session.session_token,
            &self.currency_code(),
        ))
    }

    /// Read the cart behind a session token.
    ///
    /// Returns `Ok(None)` without calling Ecwid when there is no token, and
    /// when Ecwid returns no checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session_token))]
    pub async fn get_cart(&self, session_token: Option<&str>) -> Result<Option<Cart>, EcwidError> {
        let Some(token) = session_token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let request = Self::session_request("/checkout", token).json(serde_json::to_value(
            LangPayload {
                lang: STOREFRONT_LANG,
            },
        )?);

        let checkout: Option<EcwidCheckout> = self.fetch(request).await?;

        Ok(checkout.map(|c| reshape_order(&c.checkout, &self.currency_code())))
    }

    /// Add the first line to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if `lines` is empty, the merchandise id is invalid,
    /// or an API request fails.
    #[instrument(skip(self, session_token, lines))]
    pub async fn add_to_cart(
        &self,
        session_token: &str,
        lines: &[CartLineInput],
    ) -> Result<Cart, EcwidError> {
        let line = first_line(lines, "add_to_cart")?;
        let identifier = self.cart_item_identifier(&line.merchandise_id).await?;

        let payload = AddCartItemPayload {
            lang: STOREFRONT_LANG,
            new_cart_item: NewCartItem {
                identifier,
                quantity: line.quantity.max(1),
                category_id: 0,
                is_preorder: false,
            },
        };

        let request = Self::session_request("/checkout/add-cart-item", session_token)
            .json(serde_json::to_value(payload)?);

        self.checkout_call(request).await
    }

    /// Remove the first line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if `line_ids` is empty, the line id is invalid, or
    /// an API request fails.
    #[instrument(skip(self, session_token, line_ids))]
    pub async fn remove_from_cart(
        &self,
        session_token: &str,
        line_ids: &[String],
    ) -> Result<Cart, EcwidError> {
        let line_id = first_line(line_ids, "remove_from_cart")?;
        let identifier = self.cart_item_identifier(line_id).await?;

        let payload = RemoveCartItemPayload {
            lang: STOREFRONT_LANG,
            cart_item_identifier: identifier,
        };

        let request = Self::session_request("/checkout/remove-cart-item", session_token)
            .json(serde_json::to_value(payload)?);

        self.checkout_call(request).await
    }

    /// Set the quantity of the first line.
    ///
    /// Quantity 0 removes the line. Any other quantity removes the line and
    /// adds it back with the new quantity; Ecwid has no update call, so a
    /// failure between the two leaves the line removed.
    ///
    /// # Errors
    ///
    /// Returns an error if `lines` is empty, an id is invalid, or an API
    /// request fails.
    #[instrument(skip(self, session_token, lines))]
    pub async fn update_cart(
        &self,
        session_token: &str,
        lines: &[CartLineUpdateInput],
    ) -> Result<Cart, EcwidError> {
        let line = first_line(lines, "update_cart")?;
        let merchandise_id = if line.merchandise_id.is_empty() {
            &line.id
        } else {
            &line.merchandise_id
        };

        let removed = self
            .remove_from_cart(session_token, std::slice::from_ref(merchandise_id))
            .await?;

        if line.quantity == 0 {
            return Ok(removed);
        }

        let add = [CartLineInput {
            merchandise_id: merchandise_id.clone(),
            quantity: line.quantity,
        }];

        self.add_to_cart(session_token, &add).await.inspect_err(|e| {
            tracing::error!(
                error = %e,
                merchandise_id = %merchandise_id,
                "Re-adding cart line failed after removal"
            );
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shirt() -> EcwidNode {
        serde_json::from_value(json!({
            "id": 100,
            "options": [
                {"type": "SIZE", "name": "Size", "choices": [{"text": "L"}]},
                {"type": "RADIO", "name": "Color", "choices": [{"text": "Blue"}]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_selected_options_use_declared_types() {
        let id = VariantId::parse("100|Size:L|Color:Blue").unwrap();
        let selected = selected_options_payload(&id, Some(&shirt())).unwrap().unwrap();

        assert_eq!(
            Value::Object(selected),
            json!({
                "Size": {"type": "SIZE", "choice": "L"},
                "Color": {"type": "RADIO", "choice": "Blue"}
            })
        );
    }

    #[test]
    fn test_undeclared_options_are_dropped() {
        let id = VariantId::parse("100|Size:L|Engraving:Yes").unwrap();
        let selected = selected_options_payload(&id, Some(&shirt())).unwrap().unwrap();
        assert_eq!(selected.len(), 1);
        assert!(selected.contains_key("Size"));
    }

    #[test]
    fn test_no_options_sends_none() {
        let id = VariantId::parse("100").unwrap();
        assert!(selected_options_payload(&id, Some(&shirt())).unwrap().is_none());

        let id = VariantId::parse("100|Size:L").unwrap();
        assert!(selected_options_payload(&id, None).unwrap().is_none());
    }

    #[test]
    fn test_first_line_requires_a_line() {
        let empty: [CartLineInput; 0] = [];
        assert!(matches!(
            first_line(&empty, "add_to_cart"),
            Err(EcwidError::MissingPrecondition(_))
        ));

        let lines = ["a".to_string(), "b".to_string()];
        assert_eq!(first_line(&lines, "remove_from_cart").unwrap(), "a");
    }

    #[test]
    fn test_numeric_product_id() {
        assert_eq!(
            numeric_product_id(&VariantId::parse("42|Size:L").unwrap()).unwrap(),
            42
        );
        assert!(numeric_product_id(&VariantId::parse("abc").unwrap()).is_err());
    }
}
