mod negotiation;
mod registry;
mod room;
mod room_event;
mod room_manager;

pub use negotiation::{NegotiationState, PeerNegotiation};
pub use registry::ConnectionRegistry;
pub use room::{Room, RoomHandle};
pub use room_event::RoomEvent;
pub use room_manager::RoomManager;
