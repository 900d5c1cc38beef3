//! Order lifecycle: placement, payment confirmation, admin edits and
//! customer-facing views.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::db::IdKind;
use crate::domain::customer::NewAddress;
use crate::domain::order::{NewOrder, Order, OrderPatch, OrderStatus, PaymentType};
use crate::domain::product::StockAdjustment;
use crate::error::{ApiError, ApiResult};
use crate::notify::Event;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_order))
        .route("/gpay/payment/details", post(record_payment))
        .route("/get/all/orders", get(all_orders))
        .route("/get/order/:id", get(order_by_id))
        .route("/edit/:id", put(admin_edit_order))
        .route("/user/get/:id", get(orders_for_user))
        .route("/user/cancel/:id", put(cancel_order))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOrderRequest {
    pub product_id: Uuid,
    pub customer_id: Uuid,
    pub payment_type: Option<String>,
    pub address_id: Option<Uuid>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub landmark: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub save_address: bool,
    pub qty: i32,
    pub size: Option<String>,
}

/// Places an order. No stock is reserved here; stock only moves once payment
/// is confirmed or an admin edits the order.
async fn add_order(
    State(s): State<AppState>,
    Json(req): Json<AddOrderRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let mut address_id = req.address_id;

    // A missing address id or an explicit save request both persist the
    // shipping address from the request body.
    if req.address_id.is_none() || req.save_address {
        let created = s
            .orders
            .insert_address(&NewAddress {
                customer_id: req.customer_id,
                name: req.name.clone().unwrap_or_default(),
                address: req.address.clone().unwrap_or_default(),
                city: req.city.clone().unwrap_or_default(),
                landmark: req.landmark.clone(),
                district: req.district.clone(),
                state: req.state.clone().unwrap_or_default(),
                zip_code: req.zip_code.clone().unwrap_or_default(),
                phone: req.phone.clone().unwrap_or_default(),
                is_saved: req.save_address,
            })
            .await?;
        address_id = req.address_id.or(Some(created.id));
    }

    let order_no = s.ids.next(IdKind::Order).await?;
    s.orders
        .insert_order(&NewOrder {
            order_no: order_no.clone(),
            customer_id: req.customer_id,
            product_id: req.product_id,
            payment_type: req.payment_type,
            address_id,
            size: req.size.unwrap_or_default(),
            qty: req.qty,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Order placed successfully", "orderID": order_no })),
    ))
}

/// A stock movement or notification triggered by a lifecycle transition.
/// Each entry of a plan is applied exactly once per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SideEffect {
    Deduct,
    Restock,
    Notify(Event),
}

/// Side effects of a payment confirmation. Both payment paths deduct stock
/// exactly once; UPI additionally reports the payment itself.
fn payment_effects(payment: PaymentType) -> Vec<SideEffect> {
    match payment {
        PaymentType::Upi => vec![
            SideEffect::Notify(Event::OrderProcessing),
            SideEffect::Notify(Event::OrderPayment),
            SideEffect::Deduct,
        ],
        PaymentType::Cod => vec![
            SideEffect::Notify(Event::OrderProcessing),
            SideEffect::Deduct,
        ],
    }
}

/// Side effects of an admin status edit. Processing deducts and Cancelled
/// restocks on every call, repeats included; Confirmed announces dispatch.
fn edit_effects(new_status: Option<OrderStatus>) -> Vec<SideEffect> {
    match new_status {
        Some(OrderStatus::Processing) => vec![SideEffect::Deduct],
        Some(OrderStatus::Cancelled) => vec![SideEffect::Restock],
        Some(OrderStatus::Confirmed) => vec![SideEffect::Notify(Event::ProductDispatched)],
        _ => vec![],
    }
}

async fn apply_effects(s: &AppState, order: &Order, effects: &[SideEffect]) -> ApiResult<()> {
    for effect in effects {
        match effect {
            SideEffect::Deduct => {
                s.catalog
                    .adjust_quantity(order.product_id, StockAdjustment::Deduct, order.qty)
                    .await?;
            }
            SideEffect::Restock => {
                s.catalog
                    .adjust_quantity(order.product_id, StockAdjustment::Add, order.qty)
                    .await?;
            }
            SideEffect::Notify(event) => {
                let payload = match event {
                    Event::ProductDispatched => json!({ "orderId": order.order_no }),
                    _ => json!({ "orderId": order.order_no, "qty": order.qty }),
                };
                s.notifier.send(*event, payload);
            }
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailsRequest {
    pub order_id: String,
    pub screenshot_base64: Option<String>,
    pub screenshot_name: Option<String>,
    pub payment_type: String,
}

/// Records payment confirmation for an order, keyed by its display id.
/// UPI keeps the screenshot; both paths complete the order and deduct stock.
async fn record_payment(
    State(s): State<AppState>,
    Json(req): Json<PaymentDetailsRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let order = s
        .orders
        .order_by_no(&req.order_id)
        .await?
        .ok_or(ApiError::NotFound("Order not found"))?;

    let payment = PaymentType::parse(&req.payment_type).ok_or_else(|| {
        ApiError::Validation(format!("Unknown payment type: {}", req.payment_type))
    })?;

    if payment == PaymentType::Upi {
        s.orders
            .insert_upi_payment(
                order.id,
                req.screenshot_base64.as_deref().unwrap_or_default(),
                req.screenshot_name.as_deref().unwrap_or_default(),
            )
            .await?;
    }
    s.orders.confirm_payment(order.id, payment.as_str()).await?;
    apply_effects(&s, &order, &payment_effects(payment)).await?;

    let message = match payment {
        PaymentType::Upi => "Payment request completed successfully",
        PaymentType::Cod => "Order requested",
    };
    Ok(Json(json!({ "message": message })))
}

async fn all_orders(State(s): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let orders = s.orders.completed_orders().await?;
    Ok(Json(json!(orders)))
}

async fn order_by_id(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let order = s
        .orders
        .order_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Order not found"))?;
    Ok(Json(json!({ "order": order })))
}

/// Admin edit. Transitions into Processing deduct stock on every call and
/// Cancelled restocks on every call, repeats included; Confirmed triggers a
/// dispatch notification.
async fn admin_edit_order(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<OrderPatch>,
) -> ApiResult<Json<serde_json::Value>> {
    let order = s
        .orders
        .order_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Order not found"))?;

    let new_status = match &patch.order_status {
        Some(raw) => Some(
            OrderStatus::parse(raw)
                .ok_or_else(|| ApiError::Validation(format!("Unknown order status: {raw}")))?,
        ),
        None => None,
    };

    // An empty patch skips the no-op UPDATE but still answers 200.
    if !patch.is_empty() {
        s.orders.apply_patch(id, &patch).await?;
    }
    apply_effects(&s, &order, &edit_effects(new_status)).await?;

    Ok(Json(json!({ "message": "Status changed successfully" })))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserOrderView {
    id: Uuid,
    order_id: String,
    order_date: DateTime<Utc>,
    status: String,
    track_id: String,
    expected_delivery_date: String,
    product: OrderedProduct,
}

#[derive(Debug, Serialize)]
struct OrderedProduct {
    name: String,
    brand: String,
    image: String,
    price: i64,
    quantity: i32,
    size: String,
}

/// A customer's completed orders, keyed by display id, each with a summary of
/// the ordered product and its representative image.
async fn orders_for_user(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    s.orders
        .customer_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Invalid ID"))?;

    let orders = s.orders.completed_orders_for(id).await?;
    if orders.is_empty() {
        return Ok(Json(json!({ "orders": {} })));
    }

    let product_ids: Vec<Uuid> = orders.iter().map(|o| o.product_id).collect();
    let products = s.catalog.products_by_ids(&product_ids).await?;
    let images = s.catalog.representative_images(&product_ids).await?;
    let by_id: HashMap<Uuid, _> = products.into_iter().map(|p| (p.id, p)).collect();

    let mut views: HashMap<String, UserOrderView> = HashMap::new();
    for order in orders {
        let product = by_id.get(&order.product_id);
        let image = images.get(&order.product_id).cloned().unwrap_or_default();
        views.insert(
            order.order_no.clone(),
            UserOrderView {
                id: order.id,
                order_id: order.order_no.clone(),
                order_date: order.order_date,
                status: order.order_status.clone(),
                track_id: order.track_id.clone(),
                expected_delivery_date: order.delivered_date.clone(),
                product: OrderedProduct {
                    name: product.map(|p| p.name.clone()).unwrap_or_else(|| "N/A".into()),
                    brand: product
                        .map(|p| p.collection_name.clone())
                        .unwrap_or_else(|| "N/A".into()),
                    image,
                    price: product.and_then(|p| p.offer_price).unwrap_or(0),
                    quantity: order.qty,
                    size: order.size.clone(),
                },
            },
        );
    }

    Ok(Json(json!({ "orders": views })))
}

#[derive(Debug, Deserialize)]
pub struct CancelOrderRequest {
    pub reason: Option<String>,
}

/// Customer cancellation records the reason but does not restock; only the
/// admin edit path moves stock back.
async fn cancel_order(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CancelOrderRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    s.orders
        .order_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Order not found"))?;

    s.orders
        .cancel(id, req.reason.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(json!({ "message": "Order cancelled" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_order_request_from_wire() {
        let req: AddOrderRequest = serde_json::from_value(json!({
            "productId": "0191c8a2-1111-7000-8000-000000000001",
            "customerId": "0191c8a2-2222-7000-8000-000000000002",
            "paymentType": "cod",
            "qty": 2,
            "size": "M",
            "name": "A Customer",
            "address": "12 High St",
            "city": "Kochi",
            "state": "Kerala",
            "zipCode": "682001",
            "phone": "9999999999",
            "saveAddress": true
        }))
        .unwrap();
        assert_eq!(req.qty, 2);
        assert!(req.save_address);
        assert!(req.address_id.is_none());
    }

    #[test]
    fn test_payment_confirmation_deducts_exactly_once() {
        for payment in [PaymentType::Upi, PaymentType::Cod] {
            let effects = payment_effects(payment);
            let deductions = effects
                .iter()
                .filter(|e| **e == SideEffect::Deduct)
                .count();
            assert_eq!(deductions, 1);
            assert!(!effects.contains(&SideEffect::Restock));
        }
        assert!(payment_effects(PaymentType::Upi)
            .contains(&SideEffect::Notify(Event::OrderPayment)));
        assert!(!payment_effects(PaymentType::Cod)
            .contains(&SideEffect::Notify(Event::OrderPayment)));
    }

    #[test]
    fn test_cancel_edit_restocks_exactly_once_per_call() {
        assert_eq!(edit_effects(Some(OrderStatus::Cancelled)), vec![SideEffect::Restock]);
        // A second identical edit restocks again: stock moves once per call,
        // not once per order.
        assert_eq!(edit_effects(Some(OrderStatus::Cancelled)), vec![SideEffect::Restock]);
        assert_eq!(edit_effects(Some(OrderStatus::Processing)), vec![SideEffect::Deduct]);
        assert_eq!(
            edit_effects(Some(OrderStatus::Confirmed)),
            vec![SideEffect::Notify(Event::ProductDispatched)]
        );
        assert_eq!(edit_effects(Some(OrderStatus::Shipped)), Vec::new());
        assert_eq!(edit_effects(None), Vec::new());
    }

    #[test]
    fn test_order_view_serializes_wire_keys() {
        let view = UserOrderView {
            id: Uuid::nil(),
            order_id: "RAYA/2025/ORD/0001".into(),
            order_date: Utc::now(),
            status: "Processing".into(),
            track_id: String::new(),
            expected_delivery_date: String::new(),
            product: OrderedProduct {
                name: "Kurta".into(),
                brand: "Summer".into(),
                image: String::new(),
                price: 129900,
                quantity: 1,
                size: "M".into(),
            },
        };
        let value = serde_json::to_value(&view).unwrap();
        assert!(value.get("orderId").is_some());
        assert!(value.get("expectedDeliveryDate").is_some());
        assert_eq!(value["product"]["brand"], "Summer");
    }
}
