//! Extension traits

mod depot;
mod point_in_time;
mod principal;
mod result;
mod sort_order;

pub(crate) use depot::DepotExt as _;
pub(crate) use point_in_time::PointInTimeExt as _;
pub(crate) use principal::PrincipalExt as _;
pub(crate) use result::ResultExt as _;
pub(crate) use sort_order::SortOrderExt as _;
