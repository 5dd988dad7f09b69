use signaler_core::{PeerId, SignalMessage};
use signaler_server::{CloseReason, TransportError};

use crate::integration::{create_test_service, init_tracing};
use crate::utils::TestClient;

#[tokio::test]
async fn test_read_error_tears_down_once() {
    init_tracing();
    let service = create_test_service();
    let (mut alice, _) = TestClient::connect(&service, "T", "R", "alice").await.unwrap();
    let (bob, _) = TestClient::connect(&service, "T", "R", "bob").await.unwrap();

    bob.inject_read_error(TransportError::NonUtf8).unwrap();

    let reason = bob.finish().await.unwrap();
    assert!(matches!(reason, CloseReason::ReaderStopped));

    assert_eq!(
        alice.recv().await.unwrap(),
        SignalMessage::exit(PeerId::from("bob"))
    );
    alice.expect_silence().await.expect("exactly one exit notice");
}
