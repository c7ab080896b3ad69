//! Serializable snapshot of a session, for reports and the headless binary

use serde::{Deserialize, Serialize};

use super::GameSession;
use crate::color::{ColorEntry, ColorType};
use crate::core::types::{PaintableId, PaintingId, Rgba};
use crate::mode::GameMode;
use crate::npc::NpcStateKind;
use crate::painting::{PaintPhase, PaintingWorld};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub mode: GameMode,
    pub inventory: Vec<ColorEntry>,
    pub paintings: Vec<PaintingSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaintingSummary {
    pub id: PaintingId,
    pub name: String,
    pub phase: PaintPhase,
    pub paintables: Vec<PaintableSummary>,
    pub npcs_alive: usize,
    pub npcs_dead: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaintableSummary {
    pub id: PaintableId,
    pub position: [f32; 2],
    pub colors: Vec<ColorType>,
    pub tint: Option<Rgba>,
    pub locked: bool,
    pub blocking: bool,
}

impl SessionSummary {
    pub fn capture(session: &GameSession) -> Self {
        Self {
            mode: session.mode(),
            inventory: session.inventory().snapshot(),
            paintings: session.worlds().iter().map(PaintingSummary::capture).collect(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn to_text(&self) -> String {
        let mut out = format!("Mode: {}\nInventory:", self.mode);
        for entry in &self.inventory {
            out.push_str(&format!(" {}x{}", entry.color, entry.count));
        }
        for painting in &self.paintings {
            out.push_str(&format!(
                "\n[{}] {} ({:?}): {} NPCs alive, {} dead",
                painting.id.0, painting.name, painting.phase, painting.npcs_alive, painting.npcs_dead
            ));
            for p in &painting.paintables {
                let colors: Vec<String> = p.colors.iter().map(ToString::to_string).collect();
                out.push_str(&format!(
                    "\n  sprite {} at ({:.2}, {:.2}) [{}]{}{}",
                    p.id.0,
                    p.position[0],
                    p.position[1],
                    colors.join(", "),
                    if p.locked { " locked" } else { "" },
                    if p.blocking { " solid" } else { "" },
                ));
            }
        }
        out
    }
}

impl PaintingSummary {
    fn capture(world: &PaintingWorld) -> Self {
        let dead = world
            .npcs()
            .iter()
            .filter(|n| n.state_kind() == NpcStateKind::Dead)
            .count();
        Self {
            id: world.id(),
            name: world.name().to_string(),
            phase: world.phase(),
            paintables: world
                .paintables()
                .iter()
                .map(|p| PaintableSummary {
                    id: p.id(),
                    position: p.position().to_array(),
                    colors: p.assigned_colors(),
                    tint: p.tint(),
                    locked: p.is_locked(),
                    blocking: p.is_blocking(),
                })
                .collect(),
            npcs_alive: world.npcs().len() - dead,
            npcs_dead: dead,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;

    #[test]
    fn test_summary_reflects_painting() {
        let mut session = GameSession::new(GameConfig::default()).unwrap();
        session.enter_painting(PaintingId(1)).unwrap();
        session.select_color(ColorType::Green);
        session.paint(glam::Vec2::new(-2.0, 0.0));
        session.lock_in();

        let summary = session.summary();
        assert_eq!(summary.mode, GameMode::Painting);
        let painting = &summary.paintings[0];
        assert_eq!(painting.phase, PaintPhase::Chaos);
        assert_eq!(painting.npcs_alive, 2);
        assert!(painting.paintables[0].blocking);

        let json = summary.to_json();
        assert!(json.contains("\"phase\": \"chaos\""));
        assert!(summary.to_text().contains("locked solid"));
    }
}
