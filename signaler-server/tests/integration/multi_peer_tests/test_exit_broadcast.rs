use signaler_core::{PeerId, SignalMessage};

use crate::integration::{create_test_service, init_tracing};
use crate::utils::TestClient;

#[tokio::test]
async fn test_each_remaining_member_gets_one_exit() {
    init_tracing();
    let service = create_test_service();

    let (mut alice, _) = TestClient::connect(&service, "T", "R", "alice").await.unwrap();
    let (mut bob, _) = TestClient::connect(&service, "T", "R", "bob").await.unwrap();
    let (mut carol, _) = TestClient::connect(&service, "T", "R", "carol").await.unwrap();

    carol.stop_reading();
    let (dave, _) = TestClient::connect(&service, "T", "R", "dave").await.unwrap();
    dave.disconnect().await.unwrap();

    let exit = SignalMessage::exit(PeerId::from("dave"));
    assert_eq!(alice.recv().await.unwrap(), exit);
    assert_eq!(bob.recv().await.unwrap(), exit);

    alice.expect_silence().await.expect("alice gets exactly one exit");
    bob.expect_silence().await.expect("bob gets exactly one exit");

    // A member whose transport is broken does not stop delivery to the others.
    assert!(carol.members().await.is_err());
}

#[tokio::test]
async fn test_last_peer_leaving_clears_registry() {
    init_tracing();
    let service = create_test_service();

    let (alice, _) = TestClient::connect(&service, "T", "R", "alice").await.unwrap();
    let (bob, _) = TestClient::connect(&service, "T", "R", "bob").await.unwrap();

    alice.disconnect().await.unwrap();
    assert!(service.registry().has_room(&"T".into(), &"R".into()));

    bob.disconnect().await.unwrap();
    assert!(!service.registry().has_tenant(&"T".into()));
    assert!(service.registry().is_consistent());
}
