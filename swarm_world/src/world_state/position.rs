//! Room names, positions and range queries.

use serde::{Deserialize, Serialize};

/// Width and height of every room, in tiles.
pub const ROOM_SIZE: u8 = 50;

/// Name of a room, e.g. `W8N3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomName(pub String);

impl RoomName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// A tile inside a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub room: RoomName,
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub fn new(room: impl Into<RoomName>, x: u8, y: u8) -> Self {
        Self {
            room: room.into(),
            x,
            y,
        }
    }

    pub fn in_same_room(&self, other: &Position) -> bool {
        self.room == other.room
    }

    /// Chebyshev distance; `u32::MAX` across rooms.
    pub fn range_to(&self, other: &Position) -> u32 {
        if !self.in_same_room(other) {
            return u32::MAX;
        }
        let dx = (self.x as i32 - other.x as i32).unsigned_abs();
        let dy = (self.y as i32 - other.y as i32).unsigned_abs();
        dx.max(dy)
    }

    pub fn in_range_to(&self, other: &Position, range: u32) -> bool {
        self.range_to(other) <= range
    }

    pub fn is_near_to(&self, other: &Position) -> bool {
        self.in_range_to(other, 1)
    }

    /// Distance to the closest room edge; 0 means standing on an exit tile.
    pub fn range_to_edge(&self) -> u8 {
        let far = ROOM_SIZE - 1;
        self.x
            .min(self.y)
            .min(far.saturating_sub(self.x))
            .min(far.saturating_sub(self.y))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {},{}]", self.room, self.x, self.y)
    }
}

/// Pick the candidate closest to `origin` among those in the same room.
pub fn find_closest_by_range<T, F>(
    origin: &Position,
    candidates: impl IntoIterator<Item = T>,
    pos_of: F,
) -> Option<T>
where
    F: Fn(&T) -> &Position,
{
    candidates
        .into_iter()
        .filter(|c| pos_of(c).in_same_room(origin))
        .min_by_key(|c| origin.range_to(pos_of(c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_chebyshev() {
        let a = Position::new("W1N1", 10, 10);
        let b = Position::new("W1N1", 13, 11);
        assert_eq!(a.range_to(&b), 3);
        assert!(a.in_range_to(&b, 3));
        assert!(!a.is_near_to(&b));
    }

    #[test]
    fn test_range_across_rooms() {
        let a = Position::new("W1N1", 10, 10);
        let b = Position::new("W2N1", 10, 10);
        assert_eq!(a.range_to(&b), u32::MAX);
        assert!(!a.in_range_to(&b, 50));
    }

    #[test]
    fn test_range_to_edge() {
        assert_eq!(Position::new("W1N1", 0, 25).range_to_edge(), 0);
        assert_eq!(Position::new("W1N1", 49, 25).range_to_edge(), 0);
        assert_eq!(Position::new("W1N1", 3, 47).range_to_edge(), 2);
        assert_eq!(Position::new("W1N1", 25, 25).range_to_edge(), 24);
    }

    #[test]
    fn test_find_closest_skips_other_rooms() {
        let origin = Position::new("W1N1", 10, 10);
        let candidates = vec![
            Position::new("W2N1", 10, 11),
            Position::new("W1N1", 20, 20),
            Position::new("W1N1", 12, 12),
        ];
        let closest = find_closest_by_range(&origin, candidates.iter(), |p| *p);
        assert_eq!(closest, Some(&Position::new("W1N1", 12, 12)));
    }
}
