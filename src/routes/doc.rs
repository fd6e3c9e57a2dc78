use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{CourierLoginRequest, LoginRequest, LoginResponse, PrincipalKind, RegisterRequest},
        couriers::{CourierList, CreateCourierRequest, UpdateCourierRequest},
        farms::{CreateFarmRequest, UpdateFarmRequest},
        orders::{
            CartItem, CreateOrderRequest, CreateOrderResponse, DeleteOrderRequest, FarmOrderGroup,
            FarmOrderList, FarmOrderProduct, InvoiceLine, InvoiceWithLines, OrderDeleted,
            OrderStatusUpdated, ProofOfTransferUploaded, ShipmentDraft, UpdateOrderStatusRequest,
            UserOrderGroup, UserOrderHistory, UserOrderProduct,
        },
        products::{CreateProductRequest, ProductList, TariffList, UpdateProductRequest},
        profile::{ProfileDeleted, ProfileImageForm, UpdateProfileRequest},
        shipments::{CreateShipmentRequest, ShipmentList, UpdateShipmentForm},
    },
    error::ErrorBody,
    models::{Account, Courier, Farm, GeoPoint, Invoice, Product, ShipmentProcess, ShippingTariff},
    response::{ApiResponse, Meta},
    routes::{auth, couriers, farms, health, orders, params, products, profile, shipments},
    status::{OrderStatus, ShipmentStatus},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::courier_login,
        profile::get_profile,
        profile::update_profile,
        profile::delete_profile,
        profile::upload_image,
        profile::remove_image,
        farms::create_farm,
        farms::my_farm,
        farms::update_farm,
        farms::delete_farm,
        products::list_products,
        products::list_my_products,
        products::list_farm_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::list_tariffs,
        couriers::create_courier,
        couriers::list_couriers,
        couriers::get_courier,
        couriers::update_courier,
        couriers::delete_courier,
        orders::create_order,
        orders::update_order_status,
        orders::delete_order,
        orders::upload_proof_of_transfer,
        orders::get_order_by_invoice,
        orders::list_user_orders,
        orders::list_farm_orders,
        shipments::create_shipment,
        shipments::list_for_buyer,
        shipments::list_for_farm,
        shipments::list_for_courier,
        shipments::get_shipment,
        shipments::update_shipment
    ),
    components(
        schemas(
            Account,
            Farm,
            Product,
            ShippingTariff,
            Courier,
            Invoice,
            ShipmentProcess,
            GeoPoint,
            OrderStatus,
            ShipmentStatus,
            PrincipalKind,
            RegisterRequest,
            LoginRequest,
            CourierLoginRequest,
            LoginResponse,
            UpdateProfileRequest,
            ProfileDeleted,
            ProfileImageForm,
            CreateFarmRequest,
            UpdateFarmRequest,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            TariffList,
            CreateCourierRequest,
            UpdateCourierRequest,
            CourierList,
            CartItem,
            ShipmentDraft,
            CreateOrderRequest,
            CreateOrderResponse,
            UpdateOrderStatusRequest,
            OrderStatusUpdated,
            DeleteOrderRequest,
            OrderDeleted,
            ProofOfTransferUploaded,
            InvoiceLine,
            InvoiceWithLines,
            UserOrderProduct,
            UserOrderGroup,
            UserOrderHistory,
            FarmOrderProduct,
            FarmOrderGroup,
            FarmOrderList,
            CreateShipmentRequest,
            ShipmentList,
            UpdateShipmentForm,
            params::SortOrder,
            params::ProductSortBy,
            ErrorBody,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CreateOrderResponse>,
            ApiResponse<InvoiceWithLines>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Account and courier authentication"),
        (name = "Profile", description = "The caller's own account"),
        (name = "Farms", description = "Farm registration and upkeep"),
        (name = "Products", description = "Farm products and shipping tariffs"),
        (name = "Couriers", description = "Couriers of a farm"),
        (name = "Orders", description = "Orders, invoices and proof of transfer"),
        (name = "Shipments", description = "Shipment process tracking"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
