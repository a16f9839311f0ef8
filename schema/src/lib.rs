// Battle Frontier Schema - Shared data definitions
// This crate holds the static vocabulary (types, base stats, species and move
// records, items) that the facilities and the data tables agree on.

pub use items::*;
pub use move_data::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod items;
pub mod move_data;
pub mod pokemon_types;
pub mod species_data;
