//! Side-effect components and the notifications they receive.
//!
//! Gameplay effects (damage, resource costs, projectiles, sounds) live outside
//! the engine. An ability calls its components at each phase boundary, in
//! registration order, and records the same notification as an
//! [`AbilityEvent`] so a driver can observe everything without installing a
//! component.

use crate::env::ActorId;

use super::state::{AbilityId, CancelReason, CastTarget, Rejection};

/// Read-only description of the cast a notification belongs to.
#[derive(Clone, Copy, Debug)]
pub struct CastInfo<'a> {
    pub ability: &'a AbilityId,
    pub actor: ActorId,
    pub target: Option<&'a CastTarget>,
    pub level: u32,
}

/// Receiver of cast notifications.
///
/// Every method defaults to a no-op; implement only what the effect needs.
pub trait AbilityComponent {
    /// The cast passed its start checks and entered Targeting.
    fn on_use(&mut self, _info: &CastInfo<'_>) {}

    /// Casting began; `duration` is zero for instant casts.
    fn on_cast_started(&mut self, _info: &CastInfo<'_>, _duration: f64) {}

    /// A channel boundary was crossed. `tick` counts from 1.
    fn on_channel_tick(&mut self, _info: &CastInfo<'_>, _tick: u32) {}

    /// Completion requirements passed; fires before the charge is consumed.
    fn on_cast_completed(&mut self, _info: &CastInfo<'_>) {}

    fn on_cast_cancelled(&mut self, _info: &CastInfo<'_>, _reason: &CancelReason) {}

    fn on_cast_interrupted(&mut self, _info: &CastInfo<'_>) {}

    fn on_charge_consumed(&mut self, _info: &CastInfo<'_>, _charge: usize, _cooldown: f64) {}
}

/// Recorded notification.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityEvent {
    Used {
        ability: AbilityId,
    },
    CastRejected {
        ability: AbilityId,
        reason: Rejection,
    },
    CastStarted {
        ability: AbilityId,
        duration: f64,
    },
    ChannelTick {
        ability: AbilityId,
        tick: u32,
    },
    CastCompleted {
        ability: AbilityId,
    },
    CastCancelled {
        ability: AbilityId,
        reason: CancelReason,
    },
    CastInterrupted {
        ability: AbilityId,
    },
    ChargeConsumed {
        ability: AbilityId,
        charge: usize,
        cooldown: f64,
    },
}

impl AbilityEvent {
    pub fn ability(&self) -> &AbilityId {
        match self {
            Self::Used { ability }
            | Self::CastRejected { ability, .. }
            | Self::CastStarted { ability, .. }
            | Self::ChannelTick { ability, .. }
            | Self::CastCompleted { ability }
            | Self::CastCancelled { ability, .. }
            | Self::CastInterrupted { ability }
            | Self::ChargeConsumed { ability, .. } => ability,
        }
    }

    /// Short name for logs and the sim output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Used { .. } => "used",
            Self::CastRejected { .. } => "rejected",
            Self::CastStarted { .. } => "started",
            Self::ChannelTick { .. } => "channel_tick",
            Self::CastCompleted { .. } => "completed",
            Self::CastCancelled { .. } => "cancelled",
            Self::CastInterrupted { .. } => "interrupted",
            Self::ChargeConsumed { .. } => "charge_consumed",
        }
    }

    /// Delivers this notification to `component`.
    ///
    /// Rejections have no component callback; they only reach the event log.
    pub fn dispatch(&self, component: &mut dyn AbilityComponent, info: &CastInfo<'_>) {
        match self {
            Self::Used { .. } => component.on_use(info),
            Self::CastRejected { .. } => {}
            Self::CastStarted { duration, .. } => component.on_cast_started(info, *duration),
            Self::ChannelTick { tick, .. } => component.on_channel_tick(info, *tick),
            Self::CastCompleted { .. } => component.on_cast_completed(info),
            Self::CastCancelled { reason, .. } => component.on_cast_cancelled(info, reason),
            Self::CastInterrupted { .. } => component.on_cast_interrupted(info),
            Self::ChargeConsumed {
                charge, cooldown, ..
            } => component.on_charge_consumed(info, *charge, *cooldown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl AbilityComponent for Recorder {
        fn on_channel_tick(&mut self, info: &CastInfo<'_>, tick: u32) {
            self.0.push(format!("{}:{tick}", info.ability));
        }

        fn on_charge_consumed(&mut self, _info: &CastInfo<'_>, charge: usize, cooldown: f64) {
            self.0.push(format!("charge {charge} {cooldown}"));
        }
    }

    #[test]
    fn dispatch_routes_to_matching_callback() {
        let id = AbilityId::new("drain");
        let info = CastInfo {
            ability: &id,
            actor: ActorId(1),
            target: None,
            level: 1,
        };
        let mut recorder = Recorder::default();

        for event in [
            AbilityEvent::Used { ability: id.clone() },
            AbilityEvent::ChannelTick {
                ability: id.clone(),
                tick: 2,
            },
            AbilityEvent::ChargeConsumed {
                ability: id.clone(),
                charge: 0,
                cooldown: 4.0,
            },
        ] {
            event.dispatch(&mut recorder, &info);
        }

        assert_eq!(recorder.0, vec!["drain:2", "charge 0 4"]);
    }

    #[test]
    fn event_reports_owner_and_kind() {
        let event = AbilityEvent::CastCancelled {
            ability: AbilityId::new("bolt"),
            reason: CancelReason::Requested,
        };
        assert_eq!(event.ability().as_str(), "bolt");
        assert_eq!(event.kind(), "cancelled");
    }
}
