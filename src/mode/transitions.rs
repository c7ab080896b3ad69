//! Timed tweens driven by the frame tick
//!
//! Each tween runs on a channel. Starting a new tween on a busy channel
//! cancels the running one outright: it never reports completion.

use serde::{Deserialize, Serialize};

use crate::core::types::{Seconds, TransitionId};

/// Easing curve applied to normalized time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    OutBack,
}

impl Ease {
    /// Map `t` in [0, 1] to eased progress. `OutBack` overshoots past 1
    /// before settling.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::InQuad => t * t,
            Ease::OutQuad => t * (2.0 - t),
            Ease::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Ease::OutBack => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                let u = t - 1.0;
                1.0 + C3 * u * u * u + C1 * u * u
            }
        }
    }
}

/// What a tween animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    CameraFov,
    HolderHeight,
}

#[derive(Debug, Clone)]
struct Tween {
    id: TransitionId,
    channel: Channel,
    from: f32,
    to: f32,
    duration: Seconds,
    elapsed: Seconds,
    ease: Ease,
}

impl Tween {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    fn value(&self) -> f32 {
        self.from + (self.to - self.from) * self.ease.apply(self.progress())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transitions {
    next_id: u64,
    active: Vec<Tween>,
    /// Last settled value per channel
    settled: Vec<(Channel, f32)>,
}

impl Transitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a tween, superseding whatever was running on `channel`
    pub fn play(&mut self, channel: Channel, from: f32, to: f32, duration: Seconds, ease: Ease) -> TransitionId {
        if let Some(old) = self.cancel(channel) {
            tracing::debug!(?channel, superseded = ?old, "Transition superseded");
        }
        self.next_id += 1;
        let id = TransitionId(self.next_id);
        self.active.push(Tween {
            id,
            channel,
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            ease,
        });
        id
    }

    /// Drop the tween on `channel` without completing it
    pub fn cancel(&mut self, channel: Channel) -> Option<TransitionId> {
        let index = self.active.iter().position(|t| t.channel == channel)?;
        Some(self.active.remove(index).id)
    }

    pub fn is_running(&self, id: TransitionId) -> bool {
        self.active.iter().any(|t| t.id == id)
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// Current value on `channel`: the running tween's eased value, or
    /// where the last one finished
    pub fn value(&self, channel: Channel) -> Option<f32> {
        self.active
            .iter()
            .find(|t| t.channel == channel)
            .map(Tween::value)
            .or_else(|| self.settled.iter().find(|(c, _)| *c == channel).map(|(_, v)| *v))
    }

    /// Advance every tween by `dt`; returns the ids that finished, each
    /// exactly once, in start order.
    pub fn tick(&mut self, dt: Seconds) -> Vec<TransitionId> {
        let mut finished = Vec::new();
        for tween in &mut self.active {
            tween.elapsed += dt;
        }

        let mut index = 0;
        while index < self.active.len() {
            if self.active[index].progress() >= 1.0 {
                let tween = self.active.remove(index);
                self.settle(tween.channel, tween.to);
                finished.push(tween.id);
            } else {
                index += 1;
            }
        }
        finished
    }

    fn settle(&mut self, channel: Channel, value: f32) {
        match self.settled.iter_mut().find(|(c, _)| *c == channel) {
            Some(entry) => entry.1 = value,
            None => self.settled.push((channel, value)),
        }
    }
}
