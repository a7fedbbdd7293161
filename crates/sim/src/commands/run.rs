//! Grant a set of abilities to one actor and play a cast script.

use std::path::PathBuf;
use std::sync::Arc;

use ability_content::{CatalogLoader, ConfigLoader, ContentFactory, starter_definitions};
use ability_core::{
    AbilityDefinition, AbilityEvent, AbilityId, AbilityManager, ActorId, CastContext, CastOutcome,
    CastTarget, EngineConfig, FormulaRegistry, Rejection, StaticEnv, TargetMode,
};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use crate::config::SimConfig;

const HERO: ActorId = ActorId(1);
const DUMMY: ActorId = ActorId(2);

/// Run a cast script against a catalog
#[derive(Parser)]
pub struct Run {
    /// Data directory containing abilities.ron and optionally config.toml
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Ability catalog (RON); overrides the data directory's catalog
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Engine configuration (TOML); overrides the data directory's config
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ability ids to cast, in order (defaults to every granted ability)
    #[arg(long = "cast", value_name = "ID", num_args = 1..)]
    casts: Vec<String>,

    /// Maximum steps to simulate (overrides ABILITY_TICKS)
    #[arg(long, value_name = "N")]
    ticks: Option<u32>,

    /// Steps per second (overrides ABILITY_TICK_RATE)
    #[arg(long, value_name = "HZ")]
    tick_rate: Option<f64>,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

impl Run {
    pub fn execute(self) -> Result<()> {
        let mut sim = SimConfig::from_env();
        if let Some(ticks) = self.ticks {
            sim.ticks = ticks.max(1);
        }
        if let Some(rate) = self.tick_rate {
            sim.tick_rate = rate;
        }

        let (definitions, mut engine) = self.load_content()?;
        if let Some(gcd) = sim.global_cooldown {
            engine.global_cooldown = gcd;
        }

        let registry = Arc::new(FormulaRegistry::with_builtins());
        let mut manager = AbilityManager::new(HERO, registry, engine);
        for def in definitions {
            manager.grant(def)?;
        }

        let script: Vec<AbilityId> = if self.casts.is_empty() {
            manager.abilities().map(|a| a.id().clone()).collect()
        } else {
            self.casts.iter().map(|id| AbilityId::new(id.as_str())).collect()
        };

        info!(
            abilities = manager.abilities().count(),
            casts = script.len(),
            dt = sim.dt(),
            "starting simulation"
        );

        let timeline = play(&mut manager, &arena(), &script, &sim)?;
        for (time, event) in &timeline {
            if self.json {
                println!("{}", serde_json::to_string(&(time, event))?);
            } else {
                println!(
                    "{:>7.2}s  {:<16} {:<16} {}",
                    time,
                    event.kind(),
                    event.ability(),
                    describe(event)
                );
            }
        }
        Ok(())
    }

    fn load_content(&self) -> Result<(Vec<AbilityDefinition>, EngineConfig)> {
        let factory = self.data_dir.as_ref().map(ContentFactory::new);

        let definitions = match (&self.catalog, &factory) {
            (Some(path), _) => CatalogLoader::load(path)?.abilities,
            (None, Some(factory)) => factory.load_catalog()?.abilities,
            (None, None) => starter_definitions(),
        };

        let config = match (&self.config, &factory) {
            (Some(path), _) => ConfigLoader::load(path)?,
            (None, Some(factory)) => factory.load_config()?,
            (None, None) => EngineConfig::default(),
        };

        Ok((definitions, config))
    }
}

/// World the hero casts in: a live training dummy five units away.
fn arena() -> StaticEnv {
    let mut env = StaticEnv::new();
    env.set_position(HERO, 0.0, 0.0);
    env.set_position(DUMMY, 5.0, 0.0);
    env.set_attribute(HERO, "mana", 100.0);
    env
}

fn context_for(manager: &AbilityManager, id: &AbilityId) -> Result<CastContext> {
    let context = CastContext::new(HERO);
    let mode = manager
        .ability(id)
        .with_context(|| format!("unknown ability in cast script: {id}"))?
        .target_mode();
    Ok(match mode {
        TargetMode::None => context,
        TargetMode::Actor => context.with_target(CastTarget::Actor(DUMMY)),
        TargetMode::Point => context.with_target(CastTarget::Point { x: 5.0, y: 0.0 }),
    })
}

/// Steps the manager, submitting the next scripted cast whenever the actor is
/// idle. Casts blocked by cooldowns are retried; other rejections skip ahead.
///
/// Returns every event with the simulated time it was observed at.
pub fn play(
    manager: &mut AbilityManager,
    env: &StaticEnv,
    script: &[AbilityId],
    sim: &SimConfig,
) -> Result<Vec<(f64, AbilityEvent)>> {
    let dt = sim.dt();
    let mut timeline = Vec::new();
    let mut next = 0;

    for step in 0..sim.ticks {
        let time = f64::from(step) * dt;

        if next < script.len() && !manager.is_casting() && manager.queued_ability().is_none() {
            let id = &script[next];
            let context = context_for(manager, id)?;
            match manager.try_cast(id, context, env)? {
                CastOutcome::Started | CastOutcome::Queued => next += 1,
                CastOutcome::Rejected(Rejection::GlobalCooldown | Rejection::NoCharges) => {}
                CastOutcome::Rejected(rejection) => {
                    warn!(ability = %id, %rejection, "scripted cast skipped");
                    next += 1;
                }
            }
        }

        manager.tick(dt, env);
        timeline.extend(manager.drain_events().into_iter().map(|event| (time, event)));

        if next >= script.len() && !manager.is_casting() && manager.queued_ability().is_none() {
            break;
        }
    }
    Ok(timeline)
}

fn describe(event: &AbilityEvent) -> String {
    match event {
        AbilityEvent::CastRejected { reason, .. } => reason.to_string(),
        AbilityEvent::CastStarted { duration, .. } => format!("duration {duration:.2}s"),
        AbilityEvent::ChannelTick { tick, .. } => format!("tick {tick}"),
        AbilityEvent::CastCancelled { reason, .. } => reason.to_string(),
        AbilityEvent::ChargeConsumed {
            charge, cooldown, ..
        } => format!("charge {charge}, cooldown {cooldown:.2}s"),
        _ => String::new(),
    }
}
