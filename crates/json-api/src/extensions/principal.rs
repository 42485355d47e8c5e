//! Authenticated principal stored in the depot.

use salvo::prelude::Depot;

use bazaar::users::User;

use crate::response::ApiError;

/// Access to the user the auth middleware resolved.
pub(crate) trait PrincipalExt {
    fn insert_principal(&mut self, user: User);

    fn principal_or_401(&self) -> Result<User, ApiError>;

    fn admin_or_403(&self) -> Result<User, ApiError>;
}

impl PrincipalExt for Depot {
    fn insert_principal(&mut self, user: User) {
        self.inject(user);
    }

    fn principal_or_401(&self) -> Result<User, ApiError> {
        self.obtain::<User>()
            .cloned()
            .map_err(|_ignored| ApiError::unauthorized("Authentication required"))
    }

    fn admin_or_403(&self) -> Result<User, ApiError> {
        let user = self.principal_or_401()?;

        if !user.is_admin() {
            return Err(ApiError::forbidden());
        }

        Ok(user)
    }
}
