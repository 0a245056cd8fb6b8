#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::models::{
    cart::{CartCreate, CartItem, CartItemCreate, CartItemDetail, CartItemResponse, CartItemUpdate,
        CartResponse},
    catalog::{Category, CategoryCreate, CategoryUpdate, Product, ProductCreate, ProductResponse,
        ProductUpdate, StockStatus},
    order::{OrderItemResponse, OrderResponse, OrderStatus},
    user::{
        LoginRequest, LoginResponse, MessageResponse, PasswordResetCompleteRequest,
        PasswordResetRequest, RegisterRequest, TokenRefreshRequest, TokenRefreshResponse,
        UserResponse,
    },
    PageQuery, PaginatedResponse,
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        register_doc,
        login_doc,
        refresh_doc,
        password_reset_request_doc,
        password_reset_complete_doc,
        list_products_doc,
        create_product_doc,
        update_product_doc,
        delete_product_doc,
        list_categories_doc,
        create_category_doc,
        update_category_doc,
        delete_category_doc,
        list_carts_doc,
        create_cart_doc,
        delete_cart_doc,
        add_cart_item_doc,
        update_cart_item_doc,
        delete_cart_item_doc,
        list_orders_doc,
        create_order_doc,
        delete_order_doc
    ),
    components(
        schemas(
            // accounts
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            TokenRefreshRequest,
            TokenRefreshResponse,
            PasswordResetRequest,
            PasswordResetCompleteRequest,
            MessageResponse,
            UserResponse,
            // catalog
            Category,
            CategoryCreate,
            CategoryUpdate,
            Product,
            ProductCreate,
            ProductUpdate,
            ProductResponse,
            StockStatus,
            // cart
            CartCreate,
            CartItem,
            CartItemCreate,
            CartItemUpdate,
            CartItemResponse,
            CartItemDetail,
            CartResponse,
            // orders
            OrderStatus,
            OrderItemResponse,
            OrderResponse,
            // page envelopes
            PaginatedResponse<ProductResponse>,
            PaginatedResponse<Category>,
            PaginatedResponse<CartResponse>,
            PaginatedResponse<OrderResponse>
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "accounts", description = "Registration, login, tokens, password reset"),
        (name = "products", description = "Product and category catalog"),
        (name = "cart", description = "Shopping carts and cart items"),
        (name = "orders", description = "Orders and cart-to-order conversion")
    ),
    security(("BearerAuth" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());

        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/accounts/register/",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered")
    ),
    tag = "accounts",
    security(())
)]
fn register_doc() {}

#[utoipa::path(
    post,
    path = "/api/v1/accounts/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid email or password"),
        (status = 403, description = "Account not activated")
    ),
    tag = "accounts",
    security(())
)]
fn login_doc() {}

#[utoipa::path(
    post,
    path = "/api/v1/accounts/refresh/",
    request_body = TokenRefreshRequest,
    responses(
        (status = 200, description = "New access token", body = TokenRefreshResponse),
        (status = 400, description = "Invalid or expired refresh token"),
        (status = 401, description = "Refresh token not found"),
        (status = 404, description = "User no longer exists")
    ),
    tag = "accounts",
    security(())
)]
fn refresh_doc() {}

#[utoipa::path(
    post,
    path = "/api/v1/accounts/password-reset/request/",
    request_body = PasswordResetRequest,
    responses((status = 200, description = "Generic acknowledgement", body = MessageResponse)),
    tag = "accounts",
    security(())
)]
fn password_reset_request_doc() {}

#[utoipa::path(
    post,
    path = "/api/v1/accounts/password-reset/complete/",
    request_body = PasswordResetCompleteRequest,
    responses(
        (status = 200, description = "Password replaced", body = MessageResponse),
        (status = 400, description = "Invalid user or inactive account")
    ),
    tag = "accounts",
    security(())
)]
fn password_reset_complete_doc() {}

#[utoipa::path(
    get,
    path = "/api/v1/products/",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated products", body = PaginatedResponse<ProductResponse>),
        (status = 404, description = "No products found")
    ),
    tag = "products"
)]
fn list_products_doc() {}

#[utoipa::path(
    post,
    path = "/api/v1/products/",
    request_body = ProductCreate,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid input or duplicate name"),
        (status = 404, description = "Category not found")
    ),
    tag = "products"
)]
fn create_product_doc() {}

#[utoipa::path(
    put,
    path = "/api/v1/products/{product_id}",
    params(("product_id" = i64, Path, description = "Product id")),
    request_body = ProductUpdate,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 404, description = "Product or category not found")
    ),
    tag = "products"
)]
fn update_product_doc() {}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{product_id}",
    params(("product_id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product referenced by existing orders")
    ),
    tag = "products"
)]
fn delete_product_doc() {}

#[utoipa::path(
    get,
    path = "/api/v1/category/",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated categories", body = PaginatedResponse<Category>),
        (status = 404, description = "No categories found")
    ),
    tag = "products"
)]
fn list_categories_doc() {}

#[utoipa::path(
    post,
    path = "/api/v1/category/",
    request_body = CategoryCreate,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid input or duplicate name")
    ),
    tag = "products"
)]
fn create_category_doc() {}

#[utoipa::path(
    patch,
    path = "/api/v1/category/{category_id}",
    params(("category_id" = i64, Path, description = "Category id")),
    request_body = CategoryUpdate,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 404, description = "Category not found")
    ),
    tag = "products"
)]
fn update_category_doc() {}

#[utoipa::path(
    delete,
    path = "/api/v1/category/{category_id}",
    params(("category_id" = i64, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category has products referenced by orders")
    ),
    tag = "products"
)]
fn delete_category_doc() {}

#[utoipa::path(
    get,
    path = "/api/v1/cart/",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated carts for the current user", body = PaginatedResponse<CartResponse>),
        (status = 404, description = "No carts found")
    ),
    tag = "cart"
)]
fn list_carts_doc() {}

#[utoipa::path(
    post,
    path = "/api/v1/cart/",
    request_body = CartCreate,
    responses(
        (status = 201, description = "Cart created", body = CartResponse),
        (status = 400, description = "Unknown product id or invalid quantity")
    ),
    tag = "cart"
)]
fn create_cart_doc() {}

#[utoipa::path(
    delete,
    path = "/api/v1/cart/{cart_id}",
    params(("cart_id" = i64, Path, description = "Cart id")),
    responses(
        (status = 204, description = "Cart deleted"),
        (status = 403, description = "Cart belongs to another user"),
        (status = 404, description = "Cart not found")
    ),
    tag = "cart"
)]
fn delete_cart_doc() {}

#[utoipa::path(
    post,
    path = "/api/v1/cart/items/",
    request_body = CartItemCreate,
    responses(
        (status = 201, description = "Item added or quantity incremented", body = CartItemResponse),
        (status = 404, description = "Cart or product not found")
    ),
    tag = "cart"
)]
fn add_cart_item_doc() {}

#[utoipa::path(
    put,
    path = "/api/v1/cart/items/{item_id}",
    params(("item_id" = i64, Path, description = "Cart item id")),
    request_body = CartItemUpdate,
    responses(
        (status = 200, description = "Quantity updated", body = CartItemResponse),
        (status = 403, description = "Item belongs to another user's cart"),
        (status = 404, description = "Cart item not found")
    ),
    tag = "cart"
)]
fn update_cart_item_doc() {}

#[utoipa::path(
    delete,
    path = "/api/v1/cart/items/{item_id}",
    params(("item_id" = i64, Path, description = "Cart item id")),
    responses(
        (status = 204, description = "Item removed"),
        (status = 403, description = "Item belongs to another user's cart"),
        (status = 404, description = "Cart item not found")
    ),
    tag = "cart"
)]
fn delete_cart_item_doc() {}

#[utoipa::path(
    get,
    path = "/api/v1/orders/",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated orders for the current user", body = PaginatedResponse<OrderResponse>),
        (status = 404, description = "No orders found")
    ),
    tag = "orders"
)]
fn list_orders_doc() {}

#[utoipa::path(
    post,
    path = "/api/v1/orders/",
    responses(
        (status = 201, description = "Order created from the current cart", body = OrderResponse),
        (status = 400, description = "Empty cart, invalid quantity, or non-positive total"),
        (status = 404, description = "Product referenced by the cart no longer exists")
    ),
    tag = "orders"
)]
fn create_order_doc() {}

#[utoipa::path(
    delete,
    path = "/api/v1/orders/{order_id}/",
    params(("order_id" = i64, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
fn delete_order_doc() {}
