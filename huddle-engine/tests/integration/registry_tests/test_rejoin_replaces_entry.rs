use huddle_core::model::ParticipantId;
use huddle_engine::NegotiationState;

use crate::integration::{create_test_room, joined};
use crate::utils::MediaCall;

#[tokio::test]
async fn test_rejoin_replaces_stale_connection() {
    let mut t = create_test_room("local");
    let peer = ParticipantId::from("5");

    t.room.handle_event(joined("5")).await;
    t.room.handle_event(joined("5")).await;

    // The second join means the peer restarted before we saw it leave:
    // one fresh entry, the stale connection closed.
    assert_eq!(t.room.registry().len(), 1);
    assert_eq!(t.factory.created_count(), 2);
    assert!(t.factory.calls_for(&peer).await.contains(&MediaCall::Close));

    let entry = t.room.registry().get(&peer).unwrap();
    assert_eq!(entry.state, NegotiationState::OfferSent);
    assert!(!entry.remote_description_set());
    assert_eq!(t.transport.offers_to(&peer).await.len(), 2);
}
