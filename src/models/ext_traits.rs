use super::*;
use easy_ext::ext;

/// Helper trait to get direction of movement based on camera transform
#[ext(MovementDirection)]
impl Transform {
    pub fn movement_direction(&self, input: Vec2) -> Vec3 {
        let forward = self.forward();
        let forward_flat = Vec3::new(forward.x, 0.0, forward.z);
        let right = forward_flat.cross(Vec3::Y).normalize();
        let direction = (right * input.x) + (forward_flat * input.y);
        direction.normalize_or_zero()
    }
}
