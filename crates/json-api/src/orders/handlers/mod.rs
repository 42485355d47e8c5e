//! Order Handlers

pub(crate) mod all;
pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod mine;
pub(crate) mod stats;
pub(crate) mod status;
