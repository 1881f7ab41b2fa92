//! Movement domain: tuning and input resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::physics::{BodyTuning, ColliderTuning, LedgeProbe, SensorLayout};

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    pub body: BodyTuning,
    pub collider: ColliderTuning,
    pub locomotion: LocomotionTuning,
    pub jump: JumpTuning,
    pub crouch: CrouchTuning,
    pub climb: ClimbTuning,
    pub hold: HoldTuning,
    pub sensors: SensorLayout,
    /// Delay before the respawn notification follows a death.
    pub respawn_delay: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            body: BodyTuning::default(),
            collider: ColliderTuning::default(),
            locomotion: LocomotionTuning::default(),
            jump: JumpTuning::default(),
            crouch: CrouchTuning::default(),
            climb: ClimbTuning::default(),
            hold: HoldTuning::default(),
            sensors: SensorLayout::default(),
            respawn_delay: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionTuning {
    pub max_speed: f32,
    pub walk_multiplier: f32,
    pub run_multiplier: f32,
    pub crouch_multiplier: f32,
    pub accel: f32,
    pub decel: f32,
    /// Sprite offset from the collider center, authored for facing right.
    pub visual_offset_x: f32,
    pub visual_offset_y: f32,
}

impl Default for LocomotionTuning {
    fn default() -> Self {
        Self {
            max_speed: 320.0,
            walk_multiplier: 0.5,
            run_multiplier: 1.0,
            crouch_multiplier: 0.35,
            accel: 3000.0,
            decel: 3600.0,
            visual_offset_x: 2.0,
            visual_offset_y: 0.0,
        }
    }
}

impl LocomotionTuning {
    pub fn visual_offset(&self) -> Vec2 {
        Vec2::new(self.visual_offset_x, self.visual_offset_y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpTuning {
    pub takeoff_speed: f32,
    pub jump_modifier: f32,
    /// Share of launch energy sent upward; the rest goes forward.
    pub balance: f32,
    /// Factor applied to upward velocity when jump is released early.
    pub deceleration: f32,
    pub jump_buffer_time: f32,
    pub coyote_time: f32,
    /// Maximum air jumps (0 = no double jump, 1 = double jump, 2 = triple, etc.)
    pub max_air_jumps: u8,
}

impl Default for JumpTuning {
    fn default() -> Self {
        Self {
            takeoff_speed: 640.0,
            jump_modifier: 1.0,
            balance: 1.0,
            deceleration: 0.5,
            jump_buffer_time: 0.2,
            coyote_time: 0.12,
            max_air_jumps: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrouchTuning {
    pub crouch_height_ratio: f32,
    /// Horizontal speed above which crouching starts a slide.
    pub slide_threshold: f32,
    pub slide_floor_speed: f32,
    pub slide_duration: f32,
    pub slide_cooldown: f32,
    /// Interval between stand-up attempts while the standing shape is blocked.
    pub stand_retry_interval: f32,
}

impl Default for CrouchTuning {
    fn default() -> Self {
        Self {
            crouch_height_ratio: 0.5,
            slide_threshold: 240.0,
            slide_floor_speed: 60.0,
            slide_duration: 0.45,
            slide_cooldown: 0.4,
            stand_retry_interval: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbTuning {
    pub climb_speed: f32,
    /// Constant downward drift while attached with no vertical input.
    pub slide_speed: f32,
    /// Gap left between the collider and the wall when attaching.
    pub attach_gap: f32,
    /// How far past the leading edge the attach probe looks for the wall.
    pub attach_reach: f32,
    pub jump_away_horizontal: f32,
    pub jump_away_vertical: f32,
}

impl Default for ClimbTuning {
    fn default() -> Self {
        Self {
            climb_speed: 140.0,
            slide_speed: 30.0,
            attach_gap: 0.5,
            attach_reach: 8.0,
            jump_away_horizontal: 360.0,
            jump_away_vertical: 520.0,
        }
    }
}

/// Named ledge-hold variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HoldPreset {
    /// Hang with the head just under the corner.
    #[default]
    Corner,
    /// Hands level with the corner, shorter climb.
    Grip,
}

/// Snap and finish offsets for a ledge hold, for a character facing right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldOffsets {
    pub snap_x: f32,
    pub snap_y: f32,
    pub finish_x: f32,
    pub finish_y: f32,
}

impl HoldPreset {
    pub fn offsets(self) -> HoldOffsets {
        match self {
            HoldPreset::Corner => HoldOffsets {
                snap_x: 0.5,
                snap_y: 4.0,
                finish_x: 25.0,
                finish_y: 52.5,
            },
            HoldPreset::Grip => HoldOffsets {
                snap_x: 0.5,
                snap_y: 0.0,
                finish_x: 25.0,
                finish_y: 48.5,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldTuning {
    pub preset: HoldPreset,
    /// Overrides the preset offsets when set.
    pub offsets: Option<HoldOffsets>,
    pub probe: LedgeProbe,
    /// Ledges are ignored while solid ground is this close below the feet.
    pub min_ground_clearance: f32,
    pub regrab_cooldown: f32,
}

impl Default for HoldTuning {
    fn default() -> Self {
        Self {
            preset: HoldPreset::Corner,
            offsets: None,
            probe: LedgeProbe::default(),
            min_ground_clearance: 8.0,
            regrab_cooldown: 0.3,
        }
    }
}

impl HoldTuning {
    pub fn offsets(&self) -> HoldOffsets {
        self.offsets.unwrap_or_else(|| self.preset.offsets())
    }
}

/// Edge-detected state of one input button for the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Button {
    pub just_pressed: bool,
    pub held: bool,
    pub just_released: bool,
}

impl Button {
    pub fn pressed() -> Self {
        Self {
            just_pressed: true,
            held: true,
            just_released: false,
        }
    }

    pub fn held() -> Self {
        Self {
            just_pressed: false,
            held: true,
            just_released: false,
        }
    }

    pub fn released() -> Self {
        Self {
            just_pressed: false,
            held: false,
            just_released: true,
        }
    }
}

/// Movement intent sampled once per tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementInput {
    /// Horizontal and vertical axes, each in [-1, 1].
    pub axis: Vec2,
    pub jump: Button,
    pub crouch: Button,
    pub walk: Button,
    pub climb: Button,
    pub up: Button,
}
