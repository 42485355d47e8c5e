//! Auth middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};

use bazaar_app::auth::AuthServiceError;

use crate::{extensions::*, response::ApiError, state::State};

/// Resolve the bearer token to a user and store it in the depot.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(ApiError::unauthorized(
            "Missing or invalid Authorization header",
        ));
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => state,
        Err(error) => {
            res.render(error);
            ctrl.skip_rest();

            return;
        }
    };

    let user = match state.app.auth.authenticate_bearer(token).await {
        Ok(user) => user,
        Err(AuthServiceError::NotFound | AuthServiceError::UnknownUser) => {
            res.render(ApiError::unauthorized("Invalid API token"));
            ctrl.skip_rest();

            return;
        }
        Err(AuthServiceError::Token(source)) => {
            tracing::debug!("rejected malformed api token: {source}");

            res.render(ApiError::unauthorized("Invalid API token"));
            ctrl.skip_rest();

            return;
        }
        Err(error @ (AuthServiceError::Sql(_) | AuthServiceError::UsernameTaken)) => {
            res.render(ApiError::internal("failed to validate api token", &error));
            ctrl.skip_rest();

            return;
        }
    };

    tracing::Span::current().record("user_id", tracing::field::display(user.id));

    depot.insert_principal(user);

    ctrl.call_next(req, depot, res).await;
}

/// Reject authenticated users without the admin role.
#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if let Err(error) = depot.admin_or_403() {
        res.render(error);
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use bazaar::users::User;
    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use serde_json::Value;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, admin, customer};

    use super::*;

    #[salvo::handler]
    async fn echo_user(depot: &mut Depot, res: &mut Response) {
        let name = depot
            .principal_or_401()
            .map_or_else(|_ignored| "missing".to_string(), |user: User| user.username);

        res.render(name);
    }

    fn make_service(mocks: Mocks) -> Service {
        let router = Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(handler)
            .push(Router::new().get(echo_user))
            .push(Router::with_path("admin").hoop(require_admin).get(echo_user));

        Service::new(router)
    }

    #[tokio::test]
    async fn test_missing_authorization_header_returns_401() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.auth.expect_authenticate_bearer().never();

        let mut res = TestClient::get("http://example.com")
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(body["success"], Value::Bool(false));

        Ok(())
    }

    #[tokio::test]
    async fn test_non_bearer_authorization_header_returns_401() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Basic abc123", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_token_returns_401() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .withf(|token| token == "abc123")
            .return_once(|_| Err(AuthServiceError::NotFound));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_valid_token_injects_principal() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .withf(|token| token == "abc123")
            .return_once(|_| Ok(customer()));

        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "alice");

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_routes_reject_customers() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .return_once(|_| Ok(customer()));

        let res = TestClient::get("http://example.com/admin")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_routes_admit_admins() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .return_once(|_| Ok(admin()));

        let mut res = TestClient::get("http://example.com/admin")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "root");

        Ok(())
    }
}
