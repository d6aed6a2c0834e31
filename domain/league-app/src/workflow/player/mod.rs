use crate::domain::player::Player;

pub mod add;
pub mod list;
pub mod migrate_names;
pub mod toggle;

#[derive(Clone, Debug)]
pub struct RosterView {
    pub active: Vec<Player>,
    pub inactive: Vec<Player>,
}
