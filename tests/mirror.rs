use openttd_admin::mirror::{StateMirror, SPECTATOR_COMPANY_ID};
use openttd_admin::observation::Observation;
use openttd_admin::protocol::types::{CompanyRemoveReason, Landscape};
use openttd_admin::protocol::ServerPacket;

#[test]
fn s4_company_lifecycle_end_to_end() {
    let mut mirror = StateMirror::new();

    mirror.apply(&ServerPacket::Welcome {
        name: "Test Server".into(),
        version: "1.9.0".into(),
        dedicated: true,
        map_name: "Flat Land".into(),
        seed: 1,
        landscape: Landscape::Temperate,
        start_date: 714_271,
        map_x: 256,
        map_y: 256,
    });
    assert_eq!(mirror.companies.len(), 1); // only the synthetic Spectators entry

    mirror.apply(&ServerPacket::CompanyInfo {
        company_id: 1,
        name: "Acme Transport".into(),
        manager_name: "J. Doe".into(),
        color: 2,
        password_protected: false,
        start_year: 1950,
        is_ai: false,
        bankruptcy_counter: 0,
        shareholders: [0; 4],
    });
    assert_eq!(mirror.companies[&1].name, "Acme Transport");

    let obs = mirror.apply(&ServerPacket::CompanyUpdate {
        company_id: 1,
        name: "Renamed".into(),
        manager_name: "J. Doe".into(),
        color: 2,
        password_protected: false,
        bankrupt_quarters: 0,
        shareholders: [0; 4],
    });
    assert_eq!(mirror.companies[&1].name, "Renamed");
    assert!(matches!(obs.as_slice(), [Observation::CompanyUpdated(c)] if c.name == "Renamed"));

    mirror.apply(&ServerPacket::CompanyRemove {
        company_id: 1,
        reason: CompanyRemoveReason::Manual,
    });
    assert!(!mirror.companies.contains_key(&1));
    assert!(mirror.companies.contains_key(&SPECTATOR_COMPANY_ID));
}

#[test]
fn client_join_then_quit_leaves_no_record() {
    let mut mirror = StateMirror::new();

    mirror.apply(&ServerPacket::ClientInfo {
        client_id: 42,
        hostname: "203.0.113.1".into(),
        name: "Alice".into(),
        language: 0,
        join_date: 714_271,
        play_as: SPECTATOR_COMPANY_ID,
    });
    assert!(mirror.clients.contains_key(&42));

    mirror.apply(&ServerPacket::ClientQuit { client_id: 42 });
    assert!(!mirror.clients.contains_key(&42));
}

#[test]
fn shutdown_observation_does_not_itself_clear_companies() {
    // Clearing the mirror on Shutdown/NewGame is the connection state
    // machine's job (it replaces the mirror outright); `StateMirror::apply`
    // in isolation only reports the observation.
    let mut mirror = StateMirror::new();
    mirror.apply(&ServerPacket::CompanyNew { company_id: 0 });
    assert_eq!(mirror.companies.len(), 2);

    let obs = mirror.apply(&ServerPacket::Shutdown);
    assert!(matches!(obs.as_slice(), [Observation::Shutdown]));
    assert_eq!(mirror.companies.len(), 2);
}
