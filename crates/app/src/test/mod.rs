//! Service-level test infrastructure backed by a throwaway `PostgreSQL`.

mod db;
pub(crate) mod helpers;

pub(crate) use context::TestContext;
