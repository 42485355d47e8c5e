//! Test helpers.

use std::sync::Arc;

use jiff::{Timestamp, ToSpan};
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use bazaar::{
    carts::{Cart, CartLine},
    money::Percentage,
    orders::{
        Order, OrderId, OrderLine, OrderNumber, OrderNumberError, OrderStatus, PaymentMethod,
        PaymentStatus, ShippingAddress,
    },
    products::{Catalog, Product, ProductId},
    promotions::{Promotion, PromotionId, PromotionStatus},
    users::{Role, User, UserId},
};
use bazaar_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        carts::{MockCartsService, data::EnrichedCart},
        orders::MockOrdersService,
        products::MockProductsService,
        promotions::{
            MockPromotionsService,
            data::{ProductSummary, PromotionView},
        },
    },
};

use crate::{extensions::*, state::State};

/// One mock per service. Unset expectations fail the test on any call.
pub(crate) struct Mocks {
    pub products: MockProductsService,
    pub promotions: MockPromotionsService,
    pub carts: MockCartsService,
    pub orders: MockOrdersService,
    pub auth: MockAuthService,
}

impl Default for Mocks {
    fn default() -> Self {
        Self {
            products: MockProductsService::new(),
            promotions: MockPromotionsService::new(),
            carts: MockCartsService::new(),
            orders: MockOrdersService::new(),
            auth: MockAuthService::new(),
        }
    }
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            products: Arc::new(self.products),
            promotions: Arc::new(self.promotions),
            carts: Arc::new(self.carts),
            orders: Arc::new(self.orders),
            auth: Arc::new(self.auth),
        })
    }
}

pub(crate) fn customer() -> User {
    User {
        id: UserId::from_uuid(Uuid::from_u128(1)),
        username: "alice".to_string(),
        role: Role::User,
    }
}

pub(crate) fn admin() -> User {
    User {
        id: UserId::from_uuid(Uuid::from_u128(2)),
        username: "root".to_string(),
        role: Role::Admin,
    }
}

pub(crate) fn make_product(id: ProductId) -> Product {
    Product {
        id,
        name: "Laptop Dell XPS 15".to_string(),
        price: Decimal::new(129_999, 2),
        category: "Electronics".to_string(),
        description: None,
        stock: 50,
        brand: Some("Dell".to_string()),
        image_url: None,
        specifications: Default::default(),
        rating: Decimal::ZERO,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A 25% promotion running from an hour before `now` to an hour after.
pub(crate) fn make_promotion(id: PromotionId, now: Timestamp) -> Promotion {
    Promotion {
        id,
        name: "Summer Sale".to_string(),
        description: None,
        discount: Percentage::new(Decimal::from(25)).unwrap_or(Percentage::ZERO),
        starts_at: now.checked_sub(1.hour()).unwrap_or(now),
        ends_at: now.checked_add(1.hour()).unwrap_or(now),
        applicable_products: Default::default(),
        status: PromotionStatus::Active,
        status_synced_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// [`make_promotion`] on the laptop, with the laptop's catalog fields resolved.
pub(crate) fn make_promotion_view(id: PromotionId, now: Timestamp) -> PromotionView {
    let laptop = make_product(ProductId::from_uuid(Uuid::from_u128(100)));
    let mut promotion = make_promotion(id, now);
    promotion.applicable_products.push(laptop.id);

    PromotionView {
        promotion,
        products: vec![ProductSummary::from(&laptop)],
    }
}

/// `user`'s cart holding two laptops, priced without promotions.
pub(crate) fn make_cart(user: UserId) -> EnrichedCart {
    let now = Timestamp::UNIX_EPOCH;
    let product = make_product(ProductId::from_uuid(Uuid::from_u128(100)));
    let mut cart = Cart::new(user, now);

    cart.lines.push(CartLine {
        product_id: product.id,
        snapshot: product.cart_snapshot(),
        quantity: 2,
        added_at: now,
    });

    let catalog: Catalog = std::iter::once(product).collect();
    let view = cart.enrich(&catalog, &[], now);

    EnrichedCart { cart, view }
}

/// A pending single-line order for two laptops, owned by `user`.
pub(crate) fn make_order(id: OrderId, user: UserId) -> Result<Order, OrderNumberError> {
    let now = Timestamp::UNIX_EPOCH;
    let product = make_product(ProductId::from_uuid(Uuid::from_u128(100)));
    let subtotal = product.price * Decimal::from(2);

    Ok(Order {
        id,
        order_number: OrderNumber::next(OrderNumber::date_of(now), None)?,
        user_id: user,
        lines: vec![OrderLine {
            product_id: product.id,
            snapshot: product.purchase_snapshot(),
            quantity: 2,
            price_at_purchase: product.price,
            applied_promotion: None,
            subtotal,
        }],
        total_amount: subtotal,
        total_discount: Decimal::ZERO,
        final_amount: subtotal,
        status: OrderStatus::Pending,
        shipping_address: ShippingAddress {
            full_name: "Alice Nguyen".to_string(),
            phone: "0900000000".to_string(),
            address: "1 Le Loi".to_string(),
            city: "Hanoi".to_string(),
            ..ShippingAddress::default()
        },
        payment_method: PaymentMethod::Cash,
        payment_status: PaymentStatus::Pending,
        notes: None,
        created_at: now,
        updated_at: now,
        delivered_at: None,
    })
}

/// Stands in for the auth middleware with a fixed principal.
#[derive(Debug)]
pub(crate) struct InjectPrincipal(pub User);

#[handler]
impl InjectPrincipal {
    async fn handle(&self, req: &mut Request, depot: &mut Depot, res: &mut Response, ctrl: &mut FlowCtrl) {
        depot.insert_principal(self.0.clone());
        ctrl.call_next(req, depot, res).await;
    }
}

/// Serve `route` with the mocked services and no principal.
pub(crate) fn anonymous_service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
}

/// Serve `route` with the mocked services as `user`.
pub(crate) fn service_as(user: User, mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(InjectPrincipal(user))
            .push(route),
    )
}
