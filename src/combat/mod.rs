use crate::models::*;
use crate::*;

mod attack;
mod combo;
mod components;
mod damage;
mod enemy;
pub mod events;
mod floaters;
mod hit_feedback;
mod shield;
mod super_gauge;

pub use attack::{cone_hit_check, swing_timing};
pub use combo::*;
pub use components::*;
pub use damage::*;
pub use events::*;
pub use hit_feedback::*;
pub use shield::*;
pub use super_gauge::*;

pub fn plugin(app: &mut App) {
    app.add_plugins((
        components::plugin,
        attack::plugin,
        combo::plugin,
        damage::plugin,
        enemy::plugin,
        floaters::plugin,
        hit_feedback::plugin,
        shield::plugin,
        super_gauge::plugin,
    ));
}
