//! Composable builder objects for every statement kind in spec.md §3: Create, Insert, Select,
//! Update, Remove, Alter, Drop, and the transaction triple. Each one carries its
//! [`crate::TableScheme`] by `&'static` reference plus kind-specific fields; none hold a generic
//! parameter themselves so that [`crate::dialect::QueryStringBuilder`] can take them as plain
//! `&T` arguments on a `dyn`-safe trait.

mod alter;
mod common;
mod create;
mod drop;
mod insert;
mod remove;
mod select;
mod update;

pub use alter::Alter;
pub use common::{Direction, Join, OrderBy, Query, ResultLimit, Transaction};
pub use create::{Create, CreateSource};
pub use drop::Drop;
pub use insert::Insert;
pub use remove::Remove;
pub use select::Select;
pub use update::Update;
