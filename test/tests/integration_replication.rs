/// Server/client round trips: forwarding from proxies, replication of the
/// resulting state, and proxy-side diffing
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use slotsync_client::ClientError;
use slotsync_server::{ServerConfig, ServerError};
use slotsync_shared::{
    transport::{PacketChannel, PacketReceiver, PacketSender},
    ContainerConfig, ContainerKey, ContainerRequest, ContainerRequestMessage, ElementKind,
    ReplicationMessage,
};
use slotsync_test::{init_logging, HookEvent, Shield, Sword, TestEntity, TestPair};

fn pair_with_container(slot_count: u16) -> (TestPair, ContainerKey) {
    init_logging();
    let mut pair = TestPair::new(ServerConfig::default());
    let key = pair
        .server
        .spawn_container(&mut pair.server_world, &ContainerConfig::new(slot_count))
        .unwrap();
    assert_eq!(pair.replicate(), 1);
    (pair, key)
}

#[test]
fn spawn_creates_matching_proxy() {
    let (pair, key) = pair_with_container(3);

    let proxy = pair.client.container(&key).unwrap();
    assert_eq!(proxy.slot_count(), 3);
    assert_eq!(proxy.elements(), vec![None, None, None]);
    assert_eq!(pair.client.container_keys(), vec![key]);
}

#[test]
fn proxy_mutation_only_lands_after_round_trip() {
    let (mut pair, key) = pair_with_container(3);
    let e1 = pair.insert_mirrored(1, ElementKind::of::<Sword>());

    pair.client
        .container_mut(&key)
        .unwrap()
        .try_add_element(&mut pair.client_world, e1, None);

    // forwarded, not applied locally
    assert!(!pair.client.container(&key).unwrap().has_element(&e1));
    assert!(pair.client_world.take_hooks().is_empty());
    assert!(!pair.server.container(&key).unwrap().has_element(&e1));

    assert_eq!(pair.deliver_requests(), 1);
    assert_eq!(pair.server.container(&key).unwrap().element_index(&e1), Some(0));
    assert_eq!(
        pair.server_world.take_hooks(),
        vec![HookEvent::Added { element: e1, container: key }]
    );

    pair.replicate();
    assert_eq!(pair.client.container(&key).unwrap().element_index(&e1), Some(0));
    assert_eq!(
        pair.client_world.take_hooks(),
        vec![HookEvent::Added { element: e1, container: key }]
    );
}

#[test]
fn rejected_request_changes_nothing_anywhere() {
    let (mut pair, key) = pair_with_container(2);
    let e1 = pair.insert_mirrored(1, ElementKind::of::<Sword>());
    pair.server
        .container_mut(&key)
        .unwrap()
        .try_add_element(&mut pair.server_world, e1, Some(0));
    pair.replicate();
    pair.server_world.take_hooks();
    pair.client_world.take_hooks();

    pair.client
        .container_mut(&key)
        .unwrap()
        .try_remove_element(&mut pair.client_world, e1, 1);
    pair.round_trip();

    assert_eq!(
        pair.client.container(&key).unwrap().elements(),
        vec![Some(e1), None]
    );
    assert!(!pair.server.container(&key).unwrap().is_dirty());
    assert!(pair.server_world.take_hooks().is_empty());
    assert!(pair.client_world.take_hooks().is_empty());
}

#[test]
fn requests_apply_in_order_sent() {
    let (mut pair, key) = pair_with_container(2);
    let e1 = pair.insert_mirrored(1, ElementKind::of::<Sword>());
    let e2 = pair.insert_mirrored(2, ElementKind::of::<Shield>());

    let proxy = pair.client.container_mut(&key).unwrap();
    proxy.try_add_element(&mut pair.client_world, e1, None);
    proxy.try_add_element(&mut pair.client_world, e2, None);
    proxy.try_swap_element(&mut pair.client_world, 0, 1);
    assert_eq!(pair.deliver_requests(), 3);

    assert_eq!(
        pair.server.container(&key).unwrap().elements(),
        vec![Some(e2), Some(e1)]
    );
}

#[test]
fn proxy_diff_covers_whole_update() {
    let (mut pair, key) = pair_with_container(3);
    let e1 = pair.insert_mirrored(1, ElementKind::of::<Sword>());
    let e2 = pair.insert_mirrored(2, ElementKind::of::<Shield>());
    let e3 = pair.insert_mirrored(3, ElementKind::of::<Sword>());

    let server_container = pair.server.container_mut(&key).unwrap();
    server_container.try_add_element(&mut pair.server_world, e1, Some(0));
    server_container.try_add_element(&mut pair.server_world, e2, Some(1));
    pair.replicate();
    pair.client_world.take_hooks();

    let updates = Arc::new(AtomicUsize::new(0));
    let counter = updates.clone();
    pair.client.container_mut(&key).unwrap().subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    // several authority passes, replicated as one update
    let server_container = pair.server.container_mut(&key).unwrap();
    server_container.try_remove_element_by_index(&mut pair.server_world, 0);
    server_container.try_add_element(&mut pair.server_world, e3, Some(0));
    server_container.try_swap_element(&mut pair.server_world, 0, 1);
    pair.replicate();

    assert_eq!(
        pair.client.container(&key).unwrap().elements(),
        vec![Some(e2), Some(e3), None]
    );
    assert_eq!(
        pair.client_world.take_hooks(),
        vec![
            HookEvent::Removed { element: e1, container: key },
            HookEvent::Added { element: e3, container: key },
        ]
    );
    assert_eq!(updates.load(Ordering::SeqCst), 1);
}

#[test]
fn slot_count_change_replicates() {
    let (mut pair, key) = pair_with_container(3);
    let e1 = pair.insert_mirrored(1, ElementKind::of::<Sword>());
    pair.server
        .container_mut(&key)
        .unwrap()
        .try_add_element(&mut pair.server_world, e1, Some(2));
    pair.replicate();
    pair.client_world.take_hooks();

    pair.client
        .container_mut(&key)
        .unwrap()
        .try_set_slot_count(&mut pair.client_world, 1);
    pair.round_trip();

    let proxy = pair.client.container(&key).unwrap();
    assert_eq!(proxy.slot_count(), 1);
    assert_eq!(proxy.elements(), vec![None]);
    assert_eq!(
        pair.client_world.take_hooks(),
        vec![HookEvent::Removed { element: e1, container: key }]
    );

    pair.server
        .container_mut(&key)
        .unwrap()
        .try_set_slot_count(&mut pair.server_world, 4);
    pair.replicate();
    assert_eq!(pair.client.container(&key).unwrap().slot_count(), 4);
    assert!(pair.client_world.take_hooks().is_empty());
}

#[test]
fn defaults_reach_proxy_in_spawn() {
    init_logging();
    let mut pair = TestPair::new(ServerConfig::default());
    let config = ContainerConfig::new(2).with_default_element(ElementKind::of::<Sword>());
    let key = pair
        .server
        .spawn_container(&mut pair.server_world, &config)
        .unwrap();
    assert!(!pair.server.container(&key).unwrap().is_dirty());

    pair.replicate();

    let proxy = pair.client.container(&key).unwrap();
    assert!(proxy.element(0).is_some());
    assert_eq!(proxy.element(1), None);
    assert!(!proxy.owns_element(&proxy.element(0).unwrap()));
}

#[test]
fn despawn_drops_proxy_and_owned_defaults() {
    init_logging();
    let mut pair = TestPair::new(ServerConfig::default());
    let config = ContainerConfig::new(2).with_default_element(ElementKind::of::<Sword>());
    let key = pair
        .server
        .spawn_container(&mut pair.server_world, &config)
        .unwrap();
    pair.replicate();
    let default = pair.server.container(&key).unwrap().element(0).unwrap();

    pair.server
        .despawn_container(&mut pair.server_world, &key)
        .unwrap();
    pair.replicate();

    assert!(pair.server.container(&key).is_none());
    assert!(pair.client.container(&key).is_none());
    assert_eq!(pair.server_world.despawned(), &[default]);
    assert_eq!(
        pair.server.despawn_container(&mut pair.server_world, &key),
        Err(ServerError::ContainerNotFound { container: key })
    );
}

#[test]
fn late_proxy_receives_existing_containers() {
    init_logging();
    let mut pair = TestPair::new(ServerConfig::default());
    let e1 = pair.insert_mirrored(1, ElementKind::of::<Sword>());
    let key = pair
        .server
        .spawn_container(&mut pair.server_world, &ContainerConfig::new(2))
        .unwrap();
    pair.server
        .container_mut(&key)
        .unwrap()
        .try_add_element(&mut pair.server_world, e1, None);

    let (to_client_sender, mut to_client_receiver) = PacketChannel::unbounded();
    let (_to_server_sender, to_server_receiver) = PacketChannel::unbounded();
    pair.server
        .connect_proxy(to_client_sender, to_server_receiver)
        .unwrap();

    let payload = to_client_receiver.receive().unwrap().unwrap().to_vec();
    assert_eq!(
        ReplicationMessage::<TestEntity>::from_bytes(&payload).unwrap(),
        ReplicationMessage::Spawn {
            container: key,
            slots: vec![Some(e1), None],
        }
    );
    assert_eq!(pair.server.proxy_keys().len(), 2);
}

#[test]
fn spawns_on_connect_can_be_disabled() {
    init_logging();
    let config = ServerConfig {
        send_spawns_on_connect: false,
        ..ServerConfig::default()
    };
    let mut pair = TestPair::new(config);
    pair.server
        .spawn_default_container(&mut pair.server_world)
        .unwrap();

    let (to_client_sender, mut to_client_receiver) = PacketChannel::unbounded();
    let (_to_server_sender, to_server_receiver) = PacketChannel::unbounded();
    pair.server
        .connect_proxy(to_client_sender, to_server_receiver)
        .unwrap();

    assert_eq!(to_client_receiver.receive().unwrap(), None);
}

#[test]
fn malformed_and_misaddressed_requests_are_reported() {
    init_logging();
    let mut pair = TestPair::new(ServerConfig::default());
    let (to_client_sender, _to_client_receiver) = PacketChannel::unbounded();
    let (to_server_sender, to_server_receiver) = PacketChannel::unbounded();
    let proxy = pair
        .server
        .connect_proxy(to_client_sender, to_server_receiver)
        .unwrap();

    to_server_sender.send(&[0xff]).unwrap();
    let orphan = ContainerRequestMessage::<TestEntity>::new(
        ContainerKey::new(42),
        ContainerRequest::RemoveElementByIndex { index: 0 },
    );
    to_server_sender.send(&orphan.to_bytes()).unwrap();

    assert_eq!(pair.deliver_requests(), 0);
    let errors = pair.server.take_errors();
    assert_eq!(errors.len(), 2);
    assert!(matches!(
        errors[0],
        ServerError::MalformedRequest { proxy: p } if p == proxy
    ));
    assert_eq!(
        errors[1],
        ServerError::ContainerNotFound {
            container: ContainerKey::new(42)
        }
    );
}

#[test]
fn closed_proxy_channel_disconnects() {
    init_logging();
    let mut pair = TestPair::new(ServerConfig::default());
    let (to_client_sender, _to_client_receiver) = PacketChannel::unbounded();
    let (to_server_sender, to_server_receiver) = PacketChannel::unbounded();
    let proxy = pair
        .server
        .connect_proxy(to_client_sender, to_server_receiver)
        .unwrap();
    drop(to_server_sender);

    pair.deliver_requests();

    assert_eq!(
        pair.server.take_errors(),
        vec![ServerError::ProxyChannelClosed { proxy }]
    );
    assert_eq!(pair.server.proxy_keys(), vec![pair.proxy_key]);
}

#[test]
fn client_reports_updates_for_unknown_containers() {
    init_logging();
    let mut pair = TestPair::new(ServerConfig {
        send_spawns_on_connect: false,
        ..ServerConfig::default()
    });

    // connect a second client after the container exists, skipping its spawn
    let key = pair
        .server
        .spawn_container(&mut pair.server_world, &ContainerConfig::new(1))
        .unwrap();
    let (to_client_sender, to_client_receiver) = PacketChannel::unbounded();
    let (to_server_sender, to_server_receiver) = PacketChannel::unbounded();
    pair.server
        .connect_proxy(to_client_sender, to_server_receiver)
        .unwrap();
    let mut late_client =
        slotsync_client::ContainerClient::<TestEntity>::new(to_server_sender, to_client_receiver);

    let e1 = pair.server_world.insert(1, ElementKind::of::<Sword>());
    pair.server
        .container_mut(&key)
        .unwrap()
        .try_add_element(&mut pair.server_world, e1, None);
    pair.server.send_all_updates();

    let mut late_world = slotsync_test::TestWorld::new();
    assert_eq!(late_client.receive_all_updates(&mut late_world), 0);
    assert_eq!(
        late_client.take_errors(),
        vec![ClientError::ContainerNotFound { container: key }]
    );
}

#[test]
fn proxy_keys_are_never_reused_while_connected() {
    let mut pair = TestPair::new(ServerConfig::default());

    // the pair's own proxy holds key 0
    for _ in 1..=u16::MAX {
        let (to_client_sender, _) = PacketChannel::unbounded();
        let (_, to_server_receiver) = PacketChannel::unbounded();
        pair.server
            .connect_proxy(to_client_sender, to_server_receiver)
            .unwrap();
    }

    let (to_client_sender, _) = PacketChannel::unbounded();
    let (_, to_server_receiver) = PacketChannel::unbounded();
    assert_eq!(
        pair.server
            .connect_proxy(to_client_sender, to_server_receiver)
            .err(),
        Some(ServerError::ProxyKeysExhausted)
    );
    assert_eq!(pair.server.proxy_keys().len(), usize::from(u16::MAX) + 1);
    assert_eq!(pair.server.proxy_keys()[0], pair.proxy_key);
}
