use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cultivation_core::{Fields, Player, PlayerId};
use runtime::{
    CultivationListener, EventBus, PlayerController, PlayerRepository, PlayerService,
    RuntimeConfig, Store, StorePlayerRepository, TimeTicker, Topic,
};
use serde_json::json;
use tempfile::TempDir;

const EDITS: usize = 30;

/// Time ticker and foreground requests share one store
///
/// 1. Three immortal disciples are recruited
/// 2. The ticker cultivates them in the background while the foreground
///    keeps renaming their styles
/// 3. After the ticker stops, every foreground edit and every tick is visible
#[test]
fn ticker_and_foreground_edits_do_not_clobber_each_other() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(Store::open(dir.path().join("sect.json")).unwrap());
    let repository: Arc<dyn PlayerRepository> =
        Arc::new(StorePlayerRepository::new(Arc::clone(&store)).unwrap());
    let events = EventBus::new();
    events.subscribe(
        Topic::TimePass,
        Arc::new(CultivationListener::seeded(
            Arc::clone(&repository),
            events.clone(),
            11,
        )),
    );
    let controller = PlayerController::new(
        PlayerService::new(Arc::clone(&repository), events.clone()),
        &RuntimeConfig::default(),
    );

    // ================================================================
    // PHASE 1: Recruit
    // ================================================================
    let ids: Vec<PlayerId> = ["韩立", "南宫婉", "厉飞雨"]
        .into_iter()
        .map(|name| {
            let mut player = Player::new(name);
            // the last realm has no lifespan and nothing to break through to
            player.realm_level = 9;
            player.root = "金_普通".into();
            let data = controller.create_player(player).data.unwrap();
            PlayerId(data["id"].as_i64().unwrap())
        })
        .collect();

    // ================================================================
    // PHASE 2: Tick in the background, edit in the foreground
    // ================================================================
    let ticker = TimeTicker::spawn(events.clone(), Duration::from_millis(1), 1);

    for round in 0..EDITS {
        for &id in &ids {
            let mut patch = Fields::new();
            patch.insert("attribute".into(), json!(format!("第{round}式")));
            let response = controller.update_player(id, &patch);
            assert!(response.success, "{}", response.message);
        }
        thread::sleep(Duration::from_millis(1));
    }

    let deadline = Instant::now() + Duration::from_secs(5);
    while repository.get_by_id(ids[0]).unwrap().unwrap().age < 3 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    let ticks = ticker.stop();
    assert!(ticks >= 3, "ticker only ran {ticks} times");

    // ================================================================
    // PHASE 3: Nothing was lost
    // ================================================================
    let last = json!(format!("第{}式", EDITS - 1));
    for &id in &ids {
        let player = repository.get_by_id(id).unwrap().unwrap();
        assert_eq!(json!(player.attribute), last, "edit lost for {id}");
        assert_eq!(u64::from(player.age), ticks, "tick lost for {id}");
        assert!((player.current_exp - ticks as f64 * 10.0).abs() < 1e-6);
    }
}

#[test]
fn rejected_recruits_leave_the_sect_readable() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(Store::open(dir.path().join("sect.json")).unwrap());
    let repository: Arc<dyn PlayerRepository> =
        Arc::new(StorePlayerRepository::new(Arc::clone(&store)).unwrap());
    let events = EventBus::new();
    events.subscribe(
        Topic::TimePass,
        Arc::new(CultivationListener::seeded(
            Arc::clone(&repository),
            events.clone(),
            3,
        )),
    );
    let controller = PlayerController::new(
        PlayerService::new(repository, events.clone()),
        &RuntimeConfig::default(),
    );

    let mut master = Player::new("掌门");
    master.is_master = true;
    assert!(controller.create_player(master).success);

    let mut illegal_root = Player::new("妖修");
    illegal_root.root = "abc_xyz".into();
    let mut reckless = Player::new("狂徒");
    reckless.base_breakup_probability = Some(5.0);
    for player in [illegal_root, reckless] {
        assert!(!controller.create_player(player).success);
    }

    assert!(controller.get_player_list().success);
    assert!(controller.get_master_details().success);
    let results = events.publish(&runtime::Event::TimePass { years: 1 });
    assert_eq!(results[0].as_ref().unwrap()["cultivated"], json!(1));
}
