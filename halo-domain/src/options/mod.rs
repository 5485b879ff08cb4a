//! Reactive shell options.
//!
//! - [`cell`]: [`Opt<T>`], a single observable value with a default.
//! - [`tree`]: [`OptionsTree`], cells built from a nested JSON schema.
//! - [`paths`]: [`OptionPath`], segment-wise option addressing.
//! - [`dispatcher`]: [`set_handler`], one callback for a set of dependencies.
//! - [`store`]: [`OptionsStore`], the persisted override document.
//! - [`rows`]: settings rows bound to cells.
//! - [`schema`]: the compiled-in defaults.

pub mod cell;
pub mod dispatcher;
pub mod errors;
pub mod paths;
pub mod rows;
pub mod schema;
pub mod store;
pub mod tree;

pub use cell::{Opt, Subscription, WeakOpt};
pub use dispatcher::{set_handler, HandlerSubscription};
pub use errors::OptionsError;
pub use paths::OptionPath;
pub use rows::{bind_row, bind_rows, BoundRow, RowBinding, RowKind, RowSpec};
pub use store::{OptionsDocument, OptionsStore};
pub use tree::{OptionNode, OptionsTree};
