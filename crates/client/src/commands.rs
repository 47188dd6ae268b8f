//! Subcommands of the `sect` binary.
//!
//! Every command calls one controller operation and hands its envelope back
//! to `main` for printing.
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use client_bootstrap::AppSetup;
use cultivation_core::{Fields, Player, PlayerId, Record, Sex};
use runtime::{Event, Response};
use serde_json::{Value, json};

#[derive(Parser, Debug)]
pub enum Command {
    /// Roll fresh spirit roots
    Roll {
        #[arg(default_value_t = 1)]
        count: usize,
    },

    /// Value a spirit root text, e.g. `金木_天`
    Inspect { root: String },

    /// Prepare a master with a low-value root
    InitMaster {
        /// Persist the prepared master
        #[arg(long)]
        found: bool,
    },

    /// Recruit a new player
    Create(CreateArgs),

    /// List every living player
    List,

    /// Show a player together with their companion
    Show { id: i64 },

    /// Show a player's current and next realm
    Realm { id: i64 },

    /// Patch a player with a JSON object, e.g. `'{"age": 30}'`
    Update { id: i64, patch: String },

    /// Soft-delete a player
    Delete { id: i64 },

    /// List masters with their disciple counts
    Masters,

    /// List the children of a player
    Children {
        id: i64,
        /// Follow the mother link instead of the father link
        #[arg(long)]
        mother: bool,
    },

    /// List the disciples of a teacher
    Disciples { id: i64 },

    /// Let time pass for everyone
    Simulate(SimulateArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SexArg {
    Female,
    Male,
}

impl From<SexArg> for Sex {
    fn from(sex: SexArg) -> Self {
        match sex {
            SexArg::Female => Sex::Female,
            SexArg::Male => Sex::Male,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, default_value_t = 0)]
    pub age: u32,

    #[arg(long, value_enum, default_value_t = SexArg::Female)]
    pub sex: SexArg,

    /// Spirit root text; rolled when omitted
    #[arg(long)]
    pub root: Option<String>,

    #[arg(long)]
    pub attribute: Option<String>,

    #[arg(long)]
    pub father: Option<i64>,

    #[arg(long)]
    pub mother: Option<i64>,

    #[arg(long)]
    pub teacher: Option<i64>,

    #[arg(long)]
    pub companion: Option<i64>,

    /// Breakthrough probability overriding the realm's
    #[arg(long)]
    pub breakup: Option<f64>,

    #[arg(long)]
    pub master: bool,
}

impl CreateArgs {
    fn into_player(self) -> Player {
        let mut player = match self.name {
            Some(name) => Player::new(name),
            None => Player::default(),
        };
        player.age = self.age;
        player.sex = self.sex.into();
        player.is_master = self.master;
        player.root = self.root.unwrap_or_default();
        player.attribute = self.attribute.unwrap_or_default();
        player.father_id = self.father.map(PlayerId);
        player.mother_id = self.mother.map(PlayerId);
        player.teacher_id = self.teacher.map(PlayerId);
        player.companion_id = self.companion.map(PlayerId);
        player.base_breakup_probability = self.breakup;
        player
    }
}

#[derive(Parser, Debug)]
pub struct SimulateArgs {
    /// Years per time step (default: the configured years per tick)
    #[arg(long)]
    pub years: Option<u32>,

    /// Number of time steps
    #[arg(long, default_value_t = 1)]
    pub ticks: u32,

    /// Run the background ticker for this many seconds instead of stepping
    #[arg(long, conflicts_with = "ticks")]
    pub watch: Option<u64>,
}

impl Command {
    pub fn execute(self, setup: &AppSetup) -> Result<Response> {
        let controller = &setup.controller;
        let response = match self {
            Command::Roll { count } => controller.roll_spirit_roots(count),
            Command::Inspect { root } => controller.spirit_root_report(&root),
            Command::InitMaster { found } => {
                let prepared = controller.init_master();
                let Some(row) = prepared.data.as_ref().filter(|_| found) else {
                    return Ok(prepared);
                };
                let fields = row.as_object().context("master row is not an object")?;
                controller.create_player(Player::from_fields(fields)?)
            }
            Command::Create(args) => controller.create_player(args.into_player()),
            Command::List => controller.get_player_list(),
            Command::Show { id } => controller.get_player_with_companion(PlayerId(id)),
            Command::Realm { id } => controller.get_realm_progress(PlayerId(id)),
            Command::Update { id, patch } => {
                let patch = parse_patch(&patch)?;
                controller.update_player(PlayerId(id), &patch)
            }
            Command::Delete { id } => controller.delete_player(PlayerId(id)),
            Command::Masters => controller.get_master_details(),
            Command::Children { id, mother } => controller.get_children(PlayerId(id), !mother),
            Command::Disciples { id } => controller.get_disciples(PlayerId(id)),
            Command::Simulate(args) => simulate(setup, args),
        };
        Ok(response)
    }
}

fn parse_patch(text: &str) -> Result<Fields> {
    match serde_json::from_str::<Value>(text).context("patch is not valid JSON")? {
        Value::Object(fields) => Ok(fields),
        other => bail!("patch must be a JSON object, got {other}"),
    }
}

fn simulate(setup: &AppSetup, args: SimulateArgs) -> Response {
    let years = args.years.unwrap_or(setup.config.runtime.years_per_tick);

    if let Some(seconds) = args.watch {
        let ticker = setup.spawn_ticker(Some(years));
        thread::sleep(Duration::from_secs(seconds));
        let ticks = ticker.stop();
        return Response::ok("模拟完成", json!({ "ticks": ticks, "years": years }));
    }

    let summaries: Vec<Value> = (0..args.ticks)
        .flat_map(|_| setup.events.publish(&Event::TimePass { years }))
        .map(|summary| summary.unwrap_or(Value::Null))
        .collect();
    Response::ok("模拟完成", Value::Array(summaries))
}
