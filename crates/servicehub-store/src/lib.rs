pub mod bus;
pub mod profiles;
pub mod requests;

pub use bus::{DEFAULT_EVENT_CAPACITY, EventBus};
pub use profiles::{InMemoryKeyValueStore, ProfileStore};
pub use requests::InMemoryRequestStore;
