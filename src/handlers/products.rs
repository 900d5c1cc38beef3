//! Catalog: product creation, listings, comments and image management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::db::IdKind;
use crate::domain::product::{clamp_rating, default_avatar, Image, NewComment, NewProduct, Product};
use crate::error::{ApiError, ApiResult};
use crate::notify::Event;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_product))
        .route("/get/all", get(all_products))
        .route("/get/random/product", get(random_products))
        .route("/get/collection/product/:id", get(products_by_collection))
        .route("/get/product/comments/:id", get(comments_for_product))
        .route("/get/:id", get(product_by_id))
        .route("/post/product", post(post_comment))
        .route("/change/image/:id", put(change_product_image))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub collection: Option<String>,
    pub actual_price: Option<i64>,
    pub normal_price: Option<i64>,
    pub offer_price: Option<i64>,
    pub quantity: Option<i32>,
    pub material: Option<String>,
    pub size: Option<String>,
    pub images: Option<Vec<String>>,
}

async fn create_product(
    State(s): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let (Some(name), Some(collection), Some(normal_price), Some(quantity)) = (
        req.product_name.filter(|n| !n.is_empty()),
        req.collection.filter(|c| !c.is_empty()),
        req.normal_price,
        req.quantity,
    ) else {
        return Err(ApiError::Validation("Please fill all required fields".into()));
    };
    let images = req.images.unwrap_or_default();
    if images.is_empty() {
        return Err(ApiError::Validation("At least one image is required".into()));
    }

    let product_no = s.ids.next(IdKind::Product).await?;
    let product = s
        .catalog
        .insert_product(
            &product_no,
            &NewProduct {
                name,
                description: req.description.unwrap_or_default(),
                collection_name: collection,
                actual_price: req.actual_price,
                normal_price,
                offer_price: req.offer_price,
                quantity,
                material: req.material,
                size: req.size,
            },
        )
        .await?;

    for url in &images {
        s.catalog.insert_image(product.id, url).await?;
    }

    s.notifier.send(
        Event::ProductAdded,
        json!({
            "productId": product.product_no,
            "productName": product.name,
            "qty": product.quantity,
            "price": product.offer_price,
        }),
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Product created successfully",
            "productId": product.product_no,
        })),
    ))
}

#[derive(Debug, Serialize)]
struct ProductListing {
    #[serde(flatten)]
    product: Product,
    #[serde(rename = "imageUrl")]
    image_url: Option<String>,
}

async fn with_representative_images(
    s: &AppState,
    products: Vec<Product>,
) -> ApiResult<Vec<ProductListing>> {
    let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
    let mut images = s.catalog.representative_images(&ids).await?;
    Ok(products
        .into_iter()
        .map(|product| {
            let image_url = images.remove(&product.id);
            ProductListing { product, image_url }
        })
        .collect())
}

async fn all_products(State(s): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let products = s.catalog.all_products().await?;
    let listings = with_representative_images(&s, products).await?;
    Ok(Json(json!({ "products": listings })))
}

async fn random_products(State(s): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let products = s.catalog.random_products(6).await?;
    let listings = with_representative_images(&s, products).await?;
    Ok(Json(json!({ "products": listings })))
}

async fn product_by_id(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let product = s
        .catalog
        .product_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Product not found"))?;
    let images = s.catalog.images_for(id).await?;
    Ok(Json(json!({ "product": product, "images": images })))
}

#[derive(Debug, Serialize)]
struct ProductWithImages {
    #[serde(flatten)]
    product: Product,
    images: Vec<Image>,
}

async fn products_by_collection(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let collection = s
        .catalog
        .collection_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Collection not found"))?;

    let products = s.catalog.products_in_collection(&collection.name).await?;
    let mut with_images = Vec::with_capacity(products.len());
    for product in products {
        let images = s.catalog.images_for(product.id).await?;
        with_images.push(ProductWithImages { product, images });
    }

    Ok(Json(json!({
        "collection": collection.name,
        "products": with_images,
    })))
}

#[derive(Debug, Deserialize)]
pub struct PostCommentRequest {
    #[serde(rename = "UserId")]
    pub user_id: Option<String>,
    #[serde(rename = "ProductId")]
    pub product_id: Option<Uuid>,
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
    #[serde(rename = "Rating", default)]
    pub rating: serde_json::Value,
    #[serde(rename = "Avatar")]
    pub avatar: Option<String>,
}

async fn post_comment(
    State(s): State<AppState>,
    Json(req): Json<PostCommentRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let user_id = req
        .user_id
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::Validation("User ID is required".into()))?;
    let product_id = req
        .product_id
        .ok_or_else(|| ApiError::Validation("Product ID is required".into()))?;
    let body = req
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::Validation("Comment text is required".into()))?;

    let avatar = req
        .avatar
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| default_avatar(&user_id));

    let comment = s
        .catalog
        .insert_comment(&NewComment {
            product_id,
            user_id: user_id.clone(),
            rating: clamp_rating(&req.rating),
            body,
            avatar,
        })
        .await?;

    match s.catalog.product_by_id(product_id).await? {
        Some(product) => s.notifier.send(
            Event::CommentPosted,
            json!({ "userId": user_id, "productId": product.product_no }),
        ),
        None => tracing::warn!(%product_id, "comment posted for unknown product"),
    }

    Ok(Json(json!({
        "success": true,
        "message": "Comment posted successfully",
        "comment": comment,
    })))
}

/// Gates a comment lookup on product existence: when the product is missing,
/// NotFound comes back and `fetch` never runs.
fn gate_on_product<T>(product_exists: bool, fetch: impl FnOnce() -> T) -> ApiResult<T> {
    if !product_exists {
        return Err(ApiError::NotFound("Product not found"));
    }
    Ok(fetch())
}

/// Comments for a product, newest first.
async fn comments_for_product(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let exists = s.catalog.product_exists(id).await?;
    let comments = gate_on_product(exists, || s.catalog.comments_for(id))?.await?;
    Ok(Json(json!({ "comments": comments })))
}

#[derive(Debug, Deserialize)]
pub struct ChangeImageRequest {
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

async fn change_product_image(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangeImageRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if !s.catalog.product_exists(id).await? {
        return Err(ApiError::NotFound("Product not found"));
    }
    s.catalog.insert_image(id, &req.image_url).await?;
    Ok(Json(json!({ "message": "Image updated" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_request_wire_keys_are_pascal_case() {
        let req: PostCommentRequest = serde_json::from_value(json!({
            "UserId": "u-1",
            "ProductId": "0191c8a2-1111-7000-8000-000000000001",
            "Comment": "  lovely fabric  ",
            "Rating": "7",
            "Avatar": ""
        }))
        .unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u-1"));
        assert_eq!(clamp_rating(&req.rating), 5);
    }

    #[test]
    fn test_missing_product_skips_comment_query() {
        let mut queried = false;
        let err = gate_on_product(false, || queried = true).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(!queried);

        gate_on_product(true, || queried = true).unwrap();
        assert!(queried);
    }

    #[test]
    fn test_rating_defaults_to_null_when_absent() {
        let req: PostCommentRequest = serde_json::from_value(json!({
            "UserId": "u-1",
            "ProductId": "0191c8a2-1111-7000-8000-000000000001",
            "Comment": "ok"
        }))
        .unwrap();
        assert_eq!(clamp_rating(&req.rating), 1);
    }
}
