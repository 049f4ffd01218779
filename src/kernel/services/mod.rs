//! Services layer (ports + adapters).
//!
//! - `ports`: contracts/types shared by the core and the backends.
//! - `adapters`: storage backends and settings discovery (IO/async).

pub mod adapters;
pub mod bus;
pub mod host;
pub mod ports;

pub use bus::{PanelBus, PanelEvent};
pub use host::PanelContext;
