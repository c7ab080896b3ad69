//! Game configuration loaded once at startup
//!
//! Everything here is immutable after load: per-color effect data, NPC and
//! player tuning, camera framing, and the painting definitions themselves.
//! `Default` carries the tuned values the game shipped with.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::{ColorEffectDescriptor, ColorEntry, ColorType};
use crate::core::error::{GalleryError, Result};
use crate::core::types::{Bounds, PaintableId, PaintingId, Rgba};
use crate::mode::transitions::Ease;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub session: SessionConfig,
    pub npc: NpcTuning,
    pub player: PlayerTuning,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
    pub colors: Vec<ColorEffectDescriptor>,
    pub paintings: Vec<PaintingDef>,
}

/// Whether collected colors survive from one painting to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InventoryPolicy {
    /// One ledger for the whole play session
    #[default]
    Persist,
    /// Ledger is restored to the starting colors on every painting entry
    ResetPerPainting,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub inventory_policy: InventoryPolicy,
    /// Seed for the session RNG (NPC waits and roam targets)
    pub seed: u64,
    pub starting_colors: Vec<ColorEntry>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inventory_policy: InventoryPolicy::Persist,
            seed: 12345,
            starting_colors: ColorType::ALL
                .iter()
                .map(|color| ColorEntry { color: *color, count: 1 })
                .collect(),
        }
    }
}

/// NPC behavior tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcTuning {
    /// Base walking speed (world units per second)
    pub move_speed: f32,
    /// Roam targets are picked within this radius of the spawn point
    pub roam_radius: f32,
    /// Idle wait is drawn uniformly from [min_wait, max_wait]
    pub min_wait: f32,
    pub max_wait: f32,
    pub max_health: u32,
    /// Distance at which a roam target counts as reached
    pub arrival_threshold: f32,
    /// Seconds between death and removal
    pub despawn_delay: f32,
}

impl Default for NpcTuning {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            roam_radius: 3.0,
            min_wait: 0.5,
            max_wait: 2.0,
            max_health: 3,
            arrival_threshold: 0.15,
            despawn_delay: 2.0,
        }
    }
}

/// Player's 2D avatar tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub move_speed_2d: f32,
    /// Vertical distance from the sprite pivot down to its feet
    pub foot_offset: f32,
    pub max_health: u32,
    pub affected_by_color_effects: bool,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            move_speed_2d: 3.0,
            foot_offset: -0.5,
            max_health: 3,
            affected_by_color_effects: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub default_fov: f32,
    pub zoom_in_duration: f32,
    pub zoom_in_ease: Ease,
    pub zoom_out_duration: f32,
    pub zoom_out_ease: Ease,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            default_fov: 80.0,
            zoom_in_duration: 0.5,
            zoom_in_ease: Ease::InOutQuad,
            zoom_out_duration: 0.5,
            zoom_out_ease: Ease::InOutQuad,
        }
    }
}

/// Camera framing used when zooming into one painting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintingFraming {
    /// Where the player stands to look at the painting (height ignored)
    pub look_position: [f32; 3],
    /// Height of the camera holder while framed
    pub holder_height: f32,
    pub zoom_fov: f32,
}

impl Default for PaintingFraming {
    fn default() -> Self {
        Self {
            look_position: [0.0, 0.0, 0.0],
            holder_height: 1.6,
            zoom_fov: 30.0,
        }
    }
}

/// Iris-wipe scene transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub duration: f32,
    /// Iris scale when fully open (covers the screen)
    pub open_scale: f32,
    pub close_ease: Ease,
    pub open_ease: Ease,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            duration: 0.4,
            open_scale: 1.5,
            close_ease: Ease::InQuad,
            open_ease: Ease::OutQuad,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionDef {
    pub direction: [f32; 2],
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintableDef {
    pub id: PaintableId,
    pub position: [f32; 2],
    pub half_extents: [f32; 2],
    /// Sprites with motion start moving once colors are locked in
    #[serde(default)]
    pub motion: Option<MotionDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcSpawnDef {
    pub position: [f32; 2],
}

/// Something the player can use from inside a painting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteZoneDef {
    pub key: u32,
    pub zone: Bounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintingDef {
    pub id: PaintingId,
    pub name: String,
    /// Walkable outline, at least three vertices
    pub area: Vec<[f32; 2]>,
    pub spawn_point: [f32; 2],
    #[serde(default)]
    pub framing: PaintingFraming,
    #[serde(default)]
    pub paintables: Vec<PaintableDef>,
    #[serde(default)]
    pub npcs: Vec<NpcSpawnDef>,
    /// Gallery floor zone (x/z plane) from which the painting can be entered
    #[serde(default = "default_portal")]
    pub portal: Bounds,
    #[serde(default)]
    pub interactables: Vec<SpriteZoneDef>,
}

fn default_portal() -> Bounds {
    Bounds {
        center: [0.0, -2.5],
        half_extents: [1.5, 1.5],
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            npc: NpcTuning::default(),
            player: PlayerTuning::default(),
            camera: CameraConfig::default(),
            scene: SceneConfig::default(),
            colors: default_color_descriptors(),
            paintings: vec![default_painting()],
        }
    }
}

/// Descriptor set for all five colors
pub fn default_color_descriptors() -> Vec<ColorEffectDescriptor> {
    vec![
        ColorEffectDescriptor {
            damage: 1,
            ..ColorEffectDescriptor::new(ColorType::Red, Rgba::opaque(0.85, 0.1, 0.1))
        },
        ColorEffectDescriptor::new(ColorType::Green, Rgba::opaque(0.15, 0.7, 0.2)),
        ColorEffectDescriptor {
            slow_factor: 0.5,
            ..ColorEffectDescriptor::new(ColorType::Blue, Rgba::opaque(0.15, 0.3, 0.9))
        },
        ColorEffectDescriptor {
            instant_kill: true,
            ..ColorEffectDescriptor::new(ColorType::Black, Rgba::opaque(0.05, 0.05, 0.05))
        },
        ColorEffectDescriptor {
            knockback_force: 1.5,
            ..ColorEffectDescriptor::new(ColorType::Yellow, Rgba::opaque(0.95, 0.85, 0.1))
        },
    ]
}

fn default_painting() -> PaintingDef {
    PaintingDef {
        id: PaintingId(1),
        name: "The Final Painting".into(),
        area: vec![[-6.0, -3.0], [6.0, -3.0], [6.0, 3.0], [-6.0, 3.0]],
        spawn_point: [-5.0, 0.0],
        framing: PaintingFraming {
            look_position: [0.0, 0.0, -2.5],
            holder_height: 1.6,
            zoom_fov: 30.0,
        },
        paintables: vec![
            PaintableDef {
                id: PaintableId(1),
                position: [-2.0, 0.0],
                half_extents: [0.75, 0.75],
                motion: None,
            },
            PaintableDef {
                id: PaintableId(2),
                position: [2.0, 1.0],
                half_extents: [0.75, 0.75],
                motion: Some(MotionDef {
                    direction: [1.0, 0.0],
                    speed: 3.0,
                }),
            },
            PaintableDef {
                id: PaintableId(3),
                position: [0.0, -1.5],
                half_extents: [1.0, 0.5],
                motion: None,
            },
        ],
        npcs: vec![
            NpcSpawnDef { position: [-1.0, 0.5] },
            NpcSpawnDef { position: [3.0, -1.0] },
        ],
        portal: default_portal(),
        interactables: vec![SpriteZoneDef {
            key: 1,
            zone: Bounds {
                center: [5.0, 0.0],
                half_extents: [0.75, 1.0],
            },
        }],
    }
}

impl GameConfig {
    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn painting(&self, id: PaintingId) -> Option<&PaintingDef> {
        self.paintings.iter().find(|p| p.id == id)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let npc = &self.npc;
        if npc.move_speed <= 0.0 {
            return Err(invalid("npc.move_speed must be positive"));
        }
        if npc.min_wait < 0.0 || npc.min_wait > npc.max_wait {
            return Err(invalid(format!(
                "npc wait range is inverted or negative ({} .. {})",
                npc.min_wait, npc.max_wait
            )));
        }
        if npc.max_health == 0 {
            return Err(invalid("npc.max_health must be at least 1"));
        }
        if npc.arrival_threshold <= 0.0 {
            return Err(invalid("npc.arrival_threshold must be positive"));
        }

        if self.player.max_health == 0 {
            return Err(invalid("player.max_health must be at least 1"));
        }

        for descriptor in &self.colors {
            if descriptor.color.is_none() {
                return Err(invalid("color descriptor registered for the None color"));
            }
            if !(0.0..=1.0).contains(&descriptor.slow_factor) {
                return Err(invalid(format!(
                    "{} slow_factor {} outside [0, 1]",
                    descriptor.color, descriptor.slow_factor
                )));
            }
        }

        if self.session.starting_colors.iter().any(|e| e.color.is_none()) {
            return Err(invalid("starting_colors may not contain the None color"));
        }

        let mut seen = ahash::AHashSet::new();
        for painting in &self.paintings {
            if !seen.insert(painting.id) {
                return Err(invalid(format!("duplicate painting id {:?}", painting.id)));
            }
            if painting.area.len() < 3 {
                return Err(GalleryError::DegeneratePolygon {
                    vertices: painting.area.len(),
                });
            }
            let mut paintable_ids = ahash::AHashSet::new();
            for paintable in &painting.paintables {
                if !paintable_ids.insert(paintable.id) {
                    return Err(invalid(format!(
                        "painting {:?} has duplicate paintable id {:?}",
                        painting.id, paintable.id
                    )));
                }
            }
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> GalleryError {
    GalleryError::InvalidConfig(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = GameConfig::from_toml_str("").unwrap();
        assert_eq!(config.npc, NpcTuning::default());
        assert_eq!(config.colors.len(), 5);
    }

    #[test]
    fn test_parses_sections() {
        let toml = r#"
            [session]
            inventory_policy = "reset_per_painting"
            seed = 7
            starting_colors = [{ color = "red", count = 2 }]

            [npc]
            move_speed = 4.0
            min_wait = 1.0
            max_wait = 1.0

            [[colors]]
            color = "blue"
            display_color = { r = 0.0, g = 0.0, b = 1.0, a = 1.0 }
            slow_factor = 0.25

            [[paintings]]
            id = 9
            name = "Harbor"
            area = [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0]]
            spawn_point = [1.0, 1.0]

            [[paintings.paintables]]
            id = 1
            position = [2.0, 1.0]
            half_extents = [0.5, 0.5]

            [[paintings.npcs]]
            position = [1.0, 2.0]
        "#;
        let config = GameConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.session.inventory_policy, InventoryPolicy::ResetPerPainting);
        assert_eq!(config.session.starting_colors, vec![ColorEntry { color: ColorType::Red, count: 2 }]);
        assert_eq!(config.npc.move_speed, 4.0);
        assert_eq!(config.npc.roam_radius, 3.0, "Unset fields keep their defaults");
        assert_eq!(config.colors.len(), 1);
        assert_eq!(config.colors[0].slow_factor, 0.25);

        let painting = config.painting(PaintingId(9)).unwrap();
        assert_eq!(painting.paintables.len(), 1);
        assert_eq!(painting.npcs.len(), 1);
        assert!(painting.paintables[0].motion.is_none());
    }

    #[test]
    fn test_rejects_inverted_wait_range() {
        let mut config = GameConfig::default();
        config.npc.min_wait = 3.0;
        config.npc.max_wait = 1.0;
        assert!(matches!(config.validate(), Err(GalleryError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_out_of_range_slow() {
        let mut config = GameConfig::default();
        config.colors[2].slow_factor = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_degenerate_painting_area() {
        let mut config = GameConfig::default();
        config.paintings[0].area.truncate(2);
        assert!(matches!(config.validate(), Err(GalleryError::DegeneratePolygon { vertices: 2 })));
    }

    #[test]
    fn test_rejects_duplicate_paintable_ids() {
        let mut config = GameConfig::default();
        let dup = config.paintings[0].paintables[0].clone();
        config.paintings[0].paintables.push(dup);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_gallery_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/gallery.toml");
        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.paintings.len(), 2);
        assert_eq!(config.scene.open_ease, Ease::OutBack);
        let harbor = config.painting(PaintingId(2)).unwrap();
        assert_eq!(harbor.area.len(), 6);
        assert_eq!(harbor.portal.center, [6.0, -2.5]);
        assert!(harbor.interactables.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = GameConfig::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(GalleryError::IoError(_))));
    }
}
