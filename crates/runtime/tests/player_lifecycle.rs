use std::sync::Arc;

use cultivation_core::{Fields, Player, PlayerId, spirit_root};
use runtime::{
    CultivationListener, EventBus, PlayerController, PlayerRepository, PlayerService,
    RuntimeConfig, Store, StorePlayerRepository, Topic,
};
use serde_json::json;
use tempfile::TempDir;

struct Sect {
    store: Arc<Store>,
    events: EventBus,
    controller: PlayerController,
}

fn open_sect(path: &std::path::Path) -> Sect {
    let store = Arc::new(Store::open(path).expect("store should open"));
    let repository: Arc<dyn PlayerRepository> =
        Arc::new(StorePlayerRepository::new(Arc::clone(&store)).expect("players table"));
    let events = EventBus::new();
    events.subscribe(
        Topic::TimePass,
        Arc::new(CultivationListener::new(
            Arc::clone(&repository),
            events.clone(),
        )),
    );
    let service = PlayerService::new(repository, events.clone());
    let controller = PlayerController::new(service, &RuntimeConfig::default());
    Sect {
        store,
        events,
        controller,
    }
}

fn id_of(data: &serde_json::Value) -> PlayerId {
    PlayerId(data["id"].as_i64().expect("id column"))
}

/// End-to-end sect scenario
///
/// 1. The master is rolled and founds the sect
/// 2. Disciples and family are recruited
/// 3. Relations are queried through the controller
/// 4. Time passes and everyone cultivates
/// 5. A disciple leaves (soft delete) and vanishes from every read
/// 6. The store is reopened from disk and the sect is intact
#[test]
fn sect_lifecycle_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sect.json");

    // ================================================================
    // PHASE 1: Found the sect
    // ================================================================
    let sect = open_sect(&path);
    let master = sect.controller.init_master();
    assert!(master.success, "{}", master.message);
    let master_row = master.data.unwrap();
    let root = master_row["root"].as_str().unwrap().to_string();
    assert!(spirit_root::is_legal(&root));

    let mut founder = Player::new("掌门");
    founder.is_master = true;
    founder.root = root;
    let created = sect.controller.create_player(founder);
    assert!(created.success);
    let master_id = id_of(created.data.as_ref().unwrap());

    // ================================================================
    // PHASE 2: Recruit disciples and family
    // ================================================================
    let mut disciple_ids = Vec::new();
    for name in ["大师兄", "二师姐", "小师弟"] {
        let mut disciple = Player::new(name);
        disciple.teacher_id = Some(master_id);
        disciple.father_id = Some(master_id);
        let response = sect.controller.create_player(disciple);
        assert!(response.success);
        disciple_ids.push(id_of(response.data.as_ref().unwrap()));
    }

    let mut patch = Fields::new();
    patch.insert("companion_id".into(), json!(disciple_ids[1].0));
    let updated = sect.controller.update_player(disciple_ids[0], &patch);
    assert!(updated.success, "{}", updated.message);

    // ================================================================
    // PHASE 3: Relations
    // ================================================================
    let details = sect.controller.get_master_details();
    assert_eq!(details.data.as_ref().unwrap()[0]["disciple_count"], json!(3));

    let with_companion = sect.controller.get_player_with_companion(disciple_ids[0]);
    assert_eq!(
        with_companion.data.as_ref().unwrap()["companion"]["name"],
        json!("二师姐")
    );

    let children = sect.controller.get_children(master_id, true);
    assert_eq!(children.data.unwrap().as_array().unwrap().len(), 3);
    let disciples = sect.controller.get_disciples(master_id);
    assert_eq!(disciples.data.unwrap().as_array().unwrap().len(), 3);

    // ================================================================
    // PHASE 4: Time passes
    // ================================================================
    let results = sect.events.publish(&runtime::Event::TimePass { years: 5 });
    assert_eq!(results.len(), 1);
    let summary = results[0].as_ref().expect("cultivation succeeded");
    assert_eq!(summary["cultivated"], json!(4));

    let list = sect.controller.get_player_list();
    for row in list.data.unwrap().as_array().unwrap() {
        assert_eq!(row["age"], json!(5));
        assert!(row["current_exp"].as_f64().unwrap() >= 50.0);
    }

    // ================================================================
    // PHASE 5: A disciple leaves
    // ================================================================
    let leaving = disciple_ids[2];
    assert!(sect.controller.delete_player(leaving).success);
    assert!(!sect.controller.delete_player(leaving).success);
    assert!(!sect.controller.get_player_with_companion(leaving).success);

    let details = sect.controller.get_master_details();
    assert_eq!(details.data.as_ref().unwrap()[0]["disciple_count"], json!(2));

    sect.store.close().unwrap();
    let closed = sect.controller.get_player_list();
    assert!(!closed.success);
    assert!(closed.message.starts_with("系统错误"));

    // ================================================================
    // PHASE 6: Reopen from disk
    // ================================================================
    let sect = open_sect(&path);
    let list = sect.controller.get_player_list();
    let rows = list.data.unwrap();
    let names: Vec<_> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["掌门", "大师兄", "二师姐"]);
}

#[test]
fn update_preserves_absent_fields() {
    let dir = TempDir::new().unwrap();
    let sect = open_sect(&dir.path().join("sect.json"));

    let mut player = Player::new("韩立");
    player.age = 17;
    player.attribute = "谨慎".into();
    player.root = "木水火土_普通".into();
    let id = id_of(sect.controller.create_player(player).data.as_ref().unwrap());

    let mut patch = Fields::new();
    patch.insert("age".into(), json!(18));
    patch.insert("realm_level".into(), json!(2));
    let data = sect.controller.update_player(id, &patch).data.unwrap();

    assert_eq!(data["age"], json!(18));
    assert_eq!(data["realm_level"], json!(2));
    assert_eq!(data["name"], json!("韩立"));
    assert_eq!(data["attribute"], json!("谨慎"));
    assert_eq!(data["root"], json!("木水火土_普通"));
    assert_eq!(data["id"], json!(id.0));
}
