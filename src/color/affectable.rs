use glam::Vec2;

/// Anything a color effect can act on (NPCs, the player's 2D avatar)
pub trait ColorAffectable {
    fn take_damage(&mut self, amount: u32);

    fn instant_kill(&mut self);

    /// Push one slow stack; `factor` multiplies base speed (0..=1)
    fn apply_slow(&mut self, factor: f32);

    /// Pop one slow stack; full speed returns only when none remain
    fn remove_slow(&mut self);

    /// Displace away from `source` by `force` world units
    fn apply_knockback(&mut self, source: Vec2, force: f32);

    fn position(&self) -> Vec2;
}
