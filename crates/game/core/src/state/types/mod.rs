mod common;
mod hit_points;
mod record;

pub use common::{Location, Token};
pub use hit_points::HitPoints;
pub use record::PlayerRecord;
