use crate::errors::{DataError, DataResult};
use schema::MoveRecord;
use std::collections::HashMap;
use std::sync::LazyLock;

const MOVES_RON: &str = include_str!("../data/moves.ron");

// Global move table - parsed once on first use
static MOVES: LazyLock<HashMap<String, MoveRecord>> = LazyLock::new(|| {
    let records: Vec<MoveRecord> = match ron::from_str(MOVES_RON) {
        Ok(records) => records,
        Err(err) => {
            tracing::error!(target: "frontier.data", %err, "move table failed to load");
            Vec::new()
        }
    };
    records
        .into_iter()
        .map(|r| (r.name.to_lowercase(), r))
        .collect()
});

/// Get move data by name, ignoring case.
pub fn get_move(name: &str) -> DataResult<&'static MoveRecord> {
    MOVES
        .get(&name.to_lowercase())
        .ok_or_else(|| DataError::MoveNotFound(name.to_string()))
}

/// Max PP for a move, 0 if the move is unknown.
pub fn max_pp(name: &str) -> u8 {
    get_move(name).map(|m| m.pp).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{MoveCategory, PokemonType};

    #[test]
    fn test_move_lookup() {
        let record = get_move("thunderbolt").map(|m| (m.move_type, m.category, m.power));
        assert_eq!(record, Ok((PokemonType::Electric, MoveCategory::Special, 90)));
        assert_eq!(max_pp("Stone Edge"), 5);
        assert_eq!(max_pp("Splash"), 0);
    }

    #[test]
    fn test_protective_moves_are_flagged() {
        assert!(get_move("Protect").map(|m| m.protective).unwrap_or(false));
        assert!(get_move("Detect").map(|m| m.protective).unwrap_or(false));
        assert!(!get_move("Tackle").map(|m| m.protective).unwrap_or(true));
    }
}
