use huddle_core::model::{ParticipantId, SignalMessage};

use crate::integration::{candidate, create_test_room, joined, left, message};
use crate::utils::MediaCall;

#[tokio::test]
async fn test_late_messages_after_leave_dropped() {
    let mut t = create_test_room("local");
    let peer = ParticipantId::from("42");

    t.room.handle_event(joined("42")).await;
    t.room.handle_event(left("42")).await;

    assert!(t.room.registry().is_empty());
    assert_eq!(t.observer.disconnected().await, vec![peer.clone()]);
    assert!(t.factory.calls_for(&peer).await.contains(&MediaCall::Close));

    // A late candidate and a late answer reference a peer we no longer
    // know: both are dropped, nothing reaches the closed connection.
    t.room
        .handle_event(message(
            "42",
            &SignalMessage::Candidate(candidate("candidate:late")),
        ))
        .await;
    t.room
        .handle_event(message(
            "42",
            &SignalMessage::Answer {
                sdp: "late".to_string(),
            },
        ))
        .await;

    assert!(t.room.registry().is_empty());
    assert_eq!(
        t.factory.calls_for(&peer).await.last(),
        Some(&MediaCall::Close)
    );

    // Other peers keep negotiating as if nothing happened.
    t.room.handle_event(joined("43")).await;
    assert_eq!(
        t.transport.offers_to(&ParticipantId::from("43")).await.len(),
        1
    );
}

#[tokio::test]
async fn test_member_left_without_entry_is_noop() {
    let mut t = create_test_room("local");

    t.room.handle_event(left("404")).await;

    assert!(t.room.registry().is_empty());
    assert!(t.observer.disconnected().await.is_empty());
}
