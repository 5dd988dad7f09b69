use signaler_core::{PeerId, RoomId, TenantId};
use signaler_server::CloseReason;

use crate::integration::{create_test_service, init_tracing};
use crate::utils::TestClient;

#[tokio::test]
async fn test_single_peer_joins_room() {
    init_tracing();
    let service = create_test_service();
    let tenant = TenantId::from("T");
    let room = RoomId::from("R");

    let (client, members) = TestClient::connect(&service, "T", "R", "alice")
        .await
        .expect("alice should connect");

    assert!(members.is_empty(), "first peer sees an empty room");
    assert!(
        service
            .registry()
            .lookup_session(&tenant, &room, &PeerId::from("alice"))
            .is_some()
    );

    let reason = client.disconnect().await.expect("connection should end");
    assert!(matches!(reason, CloseReason::ReaderStopped));

    assert!(service.registry().lookup_room(&tenant, &room).is_none());
    assert_eq!(service.registry().tenant_count(), 0);
}

#[tokio::test]
async fn test_pong_is_accepted_silently() {
    init_tracing();
    let service = create_test_service();

    let (mut client, _) = TestClient::connect(&service, "T", "R", "alice").await.unwrap();

    client.send_raw(r#"{"method":"pong","args":{}}"#).unwrap();
    client.send_raw(r#"{"method":"pong"}"#).unwrap();
    client.expect_silence().await.expect("pong gets no reply");

    assert!(client.members().await.unwrap().is_empty());
}
