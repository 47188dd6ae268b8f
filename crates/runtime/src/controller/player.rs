//! Player request handling.
//!
//! Every operation returns a [`Response`] envelope; no error escapes. Missing
//! players and rejected input produce the operation's failure message, while
//! store failures are reported with a generic system-error prefix.

use cultivation_core::{
    Fields, Player, PlayerId, Rarity, Record, SpiritRoot, SpiritRootError, SpiritRootGenerator,
    spirit_root,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{error, warn};

use super::response::Response;
use crate::config::RuntimeConfig;
use crate::error::ServiceError;
use crate::service::PlayerService;

/// Valuation of one spirit root text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootReport {
    pub root: String,
    pub value: u64,
    pub coefficient: f64,
    pub rarity: Rarity,
    pub rarity_label: &'static str,
    pub display: String,
}

impl RootReport {
    pub fn from_text(text: &str) -> Result<Self, SpiritRootError> {
        let rarity = spirit_root::rarity(text)?;
        Ok(Self {
            root: text.to_string(),
            value: spirit_root::value(text)?,
            coefficient: spirit_root::coefficient(text)?,
            rarity,
            rarity_label: rarity.label(),
            display: spirit_root::display(text)?,
        })
    }

    pub fn from_root(root: &SpiritRoot) -> Self {
        let rarity = root.rarity();
        Self {
            root: root.to_string(),
            value: root.value(),
            coefficient: root.coefficient(),
            rarity,
            rarity_label: rarity.label(),
            display: root.display_name(),
        }
    }
}

pub struct PlayerController {
    service: PlayerService,
    generator: SpiritRootGenerator,
    master_root_target: u64,
}

impl PlayerController {
    pub fn new(service: PlayerService, config: &RuntimeConfig) -> Self {
        Self {
            service,
            generator: SpiritRootGenerator::new().with_max_attempts(config.max_root_attempts),
            master_root_target: config.master_root_target,
        }
    }

    pub fn service(&self) -> &PlayerService {
        &self.service
    }

    /// Builds the player-controlled master with a modest spirit root.
    ///
    /// Nothing is persisted; the caller decides whether to create it.
    pub fn init_master(&self) -> Response {
        let root = match self
            .generator
            .generate_near(self.master_root_target, &mut rand::thread_rng())
        {
            Ok(root) => root,
            Err(err) => return self.failure("init_master", "初始化掌门失败", err.into()),
        };
        Response::ok("初始化掌门成功", row(&Player::master(&root)))
    }

    /// Persists `player`, rolling a spirit root first if it has none.
    pub fn create_player(&self, mut player: Player) -> Response {
        if !player.has_root() {
            let root = self.generator.generate(&mut rand::thread_rng());
            player = player.with_root(&root);
        }
        match self.service.create_player(player) {
            Ok(player) => Response::ok("创建玩家成功", row(&player)),
            Err(err) => self.failure("create_player", "创建玩家失败", err),
        }
    }

    pub fn delete_player(&self, id: PlayerId) -> Response {
        match self.service.delete_player(id) {
            Ok(()) => Response::done("删除玩家成功"),
            Err(err) => self.failure("delete_player", "删除玩家失败", err),
        }
    }

    pub fn get_player_list(&self) -> Response {
        match self.service.get_all_players() {
            Ok(players) => Response::ok("获取玩家列表成功", rows(&players)),
            Err(err) => self.failure("get_player_list", "获取玩家列表失败", err),
        }
    }

    pub fn get_master_details(&self) -> Response {
        match self.service.get_master_details() {
            Ok(details) => Response::ok("获取掌门详情成功", Value::Array(details)),
            Err(err) => self.failure("get_master_details", "获取掌门详情失败", err),
        }
    }

    pub fn update_player(&self, id: PlayerId, patch: &Fields) -> Response {
        match self.service.update_player(id, patch) {
            Ok(player) => Response::ok("更新玩家成功", row(&player)),
            Err(err) => self.failure("update_player", "更新玩家失败", err),
        }
    }

    pub fn get_player_with_companion(&self, id: PlayerId) -> Response {
        match self.service.get_player_with_companion(id) {
            Ok(value) => Response::ok("获取玩家及伴侣信息成功", value),
            Err(err) => self.failure("get_player_with_companion", "未找到玩家信息", err),
        }
    }

    pub fn get_children(&self, parent_id: PlayerId, is_father: bool) -> Response {
        match self.service.get_children(parent_id, is_father) {
            Ok(children) => Response::ok("获取子女列表成功", rows(&children)),
            Err(err) => self.failure("get_children", "获取子女列表失败", err),
        }
    }

    pub fn get_disciples(&self, teacher_id: PlayerId) -> Response {
        match self.service.get_disciples(teacher_id) {
            Ok(disciples) => Response::ok("获取徒弟列表成功", rows(&disciples)),
            Err(err) => self.failure("get_disciples", "获取徒弟列表失败", err),
        }
    }

    pub fn get_realm_progress(&self, id: PlayerId) -> Response {
        match self.service.get_realm_progress(id) {
            Ok(progress) => Response::ok("获取境界信息成功", json!(progress)),
            Err(err) => self.failure("get_realm_progress", "获取境界信息失败", err),
        }
    }

    /// Values a spirit root text without touching the store.
    pub fn spirit_root_report(&self, text: &str) -> Response {
        match RootReport::from_text(text) {
            Ok(report) => Response::ok("灵根鉴定成功", report_value(&report)),
            Err(err) => self.failure("spirit_root_report", "灵根鉴定失败", err.into()),
        }
    }

    /// Rolls `count` fresh spirit roots and reports on each.
    pub fn roll_spirit_roots(&self, count: usize) -> Response {
        let mut rng = rand::thread_rng();
        let reports: Vec<Value> = (0..count)
            .map(|_| RootReport::from_root(&self.generator.generate(&mut rng)))
            .map(|report| report_value(&report))
            .collect();
        Response::ok("生成灵根成功", Value::Array(reports))
    }

    fn failure(&self, operation: &'static str, message: &str, err: ServiceError) -> Response {
        if err.is_system() {
            error!(target: "runtime::controller", operation, error = %err, "request failed");
            return Response::fail(format!("系统错误: {err}"));
        }

        warn!(target: "runtime::controller", operation, error = %err, "request rejected");
        match err {
            ServiceError::NotFound { .. } => Response::fail(message),
            other => Response::fail(format!("{message}: {other}")),
        }
    }
}

fn row(player: &Player) -> Value {
    Value::Object(player.to_fields())
}

fn rows(players: &[Player]) -> Value {
    Value::Array(players.iter().map(row).collect())
}

fn report_value(report: &RootReport) -> Value {
    json!(report)
}
