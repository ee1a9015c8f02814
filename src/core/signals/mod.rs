pub mod data_update;
pub mod observers;
pub mod redraw;

pub use data_update::{DataUpdate, DataUpdateNotifier};
pub use observers::{EventCallback, EventObservers, SubscriptionId};
pub use redraw::{RedrawCallback, RedrawSignal};
