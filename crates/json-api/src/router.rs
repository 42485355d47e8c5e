//! App Router
//!
//! Catalog and promotion reads are public. Carts and orders need a bearer
//! token. Catalog writes, promotion writes and order administration need an
//! admin token.

use salvo::Router;

use crate::{auth, carts, orders, products, promotions};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(public_router())
        .push(customer_router())
        .push(admin_router())
}

fn public_router() -> Router {
    Router::new()
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("categories/list").get(products::categories::handler))
                .push(Router::with_path("{id}").get(products::get::handler)),
        )
        .push(
            Router::with_path("promotions")
                .get(promotions::index::handler)
                .push(Router::with_path("active/list").get(promotions::active::handler))
                .push(Router::with_path("{id}").get(promotions::get::handler)),
        )
}

fn customer_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .push(Router::with_path("add").post(carts::add::handler))
                .push(Router::with_path("update").put(carts::update::handler))
                .push(Router::with_path("remove/{product_id}").delete(carts::remove::handler))
                .push(Router::with_path("clear").delete(carts::clear::handler))
                .push(Router::with_path("validate").get(carts::validate::handler))
                .push(Router::with_path("unavailable").delete(carts::unavailable::handler))
                .push(Router::with_path("checkout").post(carts::checkout::handler)),
        )
        .push(
            Router::with_path("orders")
                .post(orders::create::handler)
                .push(Router::with_path("my-orders").get(orders::mine::handler))
                .push(Router::with_path("my-stats").get(orders::stats::handler))
                .push(
                    Router::with_path("{id}")
                        .get(orders::get::handler)
                        .push(Router::with_path("status").patch(orders::status::handler)),
                ),
        )
}

fn admin_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .hoop(auth::middleware::require_admin)
        .push(
            Router::with_path("products")
                .post(products::create::handler)
                .push(
                    Router::with_path("{id}")
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
        .push(
            Router::with_path("promotions")
                .post(promotions::create::handler)
                .push(
                    Router::with_path("{id}")
                        .put(promotions::update::handler)
                        .delete(promotions::delete::handler)
                        .push(Router::with_path("status").patch(promotions::status::handler)),
                ),
        )
        .push(
            Router::with_path("orders")
                .push(Router::with_path("admin/all").get(orders::all::handler))
                .push(Router::with_path("{id}").delete(orders::delete::handler)),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{
        http::{StatusCode, header::AUTHORIZATION},
        test::TestClient,
    };
    use serde_json::json;
    use testresult::TestResult;

    use bazaar_app::domain::pagination::Page;

    use crate::test_helpers::{Mocks, admin, anonymous_service, customer};

    use super::*;

    #[tokio::test]
    async fn catalog_reads_are_public() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.auth.expect_authenticate_bearer().never();
        mocks
            .products
            .expect_list_categories()
            .once()
            .return_once(|| Ok(vec!["Electronics".to_string()]));

        let res = TestClient::get("http://example.com/products/categories/list")
            .send(&anonymous_service(mocks, app_router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn catalog_writes_need_a_token() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.products.expect_create_product().never();

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Mouse", "price": "10", "category": "Misc" }))
            .send(&anonymous_service(mocks, app_router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn catalog_writes_need_an_admin() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .return_once(|_| Ok(customer()));
        mocks.products.expect_create_product().never();

        let res = TestClient::post("http://example.com/products")
            .add_header(AUTHORIZATION, "Bearer customer-token", true)
            .json(&json!({ "name": "Mouse", "price": "10", "category": "Misc" }))
            .send(&anonymous_service(mocks, app_router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn carts_need_a_token() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.carts.expect_get_cart().never();

        let res = TestClient::get("http://example.com/cart")
            .send(&anonymous_service(mocks, app_router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn my_orders_is_not_an_order_id() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .return_once(|_| Ok(customer()));
        mocks.orders.expect_get_order().never();
        mocks
            .orders
            .expect_list_user_orders()
            .once()
            .return_once(|_, _, page| Ok(Page::new(vec![], 0, page)));

        let res = TestClient::get("http://example.com/orders/my-orders")
            .add_header(AUTHORIZATION, "Bearer customer-token", true)
            .send(&anonymous_service(mocks, app_router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn admins_list_every_order() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .times(1..)
            .returning(|_| Ok(admin()));
        mocks
            .orders
            .expect_list_all_orders()
            .once()
            .return_once(|filter| {
                Ok(bazaar_app::domain::orders::data::OrderListing {
                    orders: Page::new(vec![], 0, filter.page),
                    totals: Default::default(),
                })
            });

        let res = TestClient::get("http://example.com/orders/admin/all")
            .add_header(AUTHORIZATION, "Bearer admin-token", true)
            .send(&anonymous_service(mocks, app_router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
