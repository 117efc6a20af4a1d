use dashmap::{DashMap, DashSet};

/// Room membership: `room_id -> users`, plus a reverse `user_id -> room_id`
/// index that keeps each user in exactly one room at a time.
#[derive(Default)]
pub struct RoomIndex {
    rooms: DashMap<String, DashSet<String>>,
    user_room: DashMap<String, String>,
}

impl RoomIndex {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            user_room: DashMap::new(),
        }
    }

    /// Add membership; idempotent. A user already in another room is moved.
    pub fn join(&self, room_id: &str, user_id: &str) {
        if let Some(prev) = self
            .user_room
            .insert(user_id.to_string(), room_id.to_string())
        {
            if prev != room_id {
                self.remove_member(&prev, user_id);
            }
        }
        self.rooms
            .entry(room_id.to_string())
            .or_insert_with(DashSet::new)
            .insert(user_id.to_string());
    }

    /// Remove membership; idempotent. Empty rooms are garbage-collected.
    pub fn leave(&self, room_id: &str, user_id: &str) {
        self.remove_member(room_id, user_id);
        self.user_room.remove_if(user_id, |_, r| r.as_str() == room_id);
    }

    /// Current room of a user, if any.
    pub fn room_of(&self, user_id: &str) -> Option<String> {
        self.user_room.get(user_id).map(|r| r.value().clone())
    }

    /// Point-in-time snapshot of the other members of a room.
    ///
    /// Concurrent joins/leaves may or may not be reflected; the snapshot
    /// itself is never corrupted by them.
    pub fn members_except(&self, room_id: &str, user_id: &str) -> Vec<String> {
        self.rooms
            .get(room_id)
            .map(|set| {
                set.iter()
                    .map(|u| u.key().to_string())
                    .filter(|u| u != user_id)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn remove_member(&self, room_id: &str, user_id: &str) {
        if let Some(set) = self.rooms.get(room_id) {
            set.remove(user_id);
            drop(set);
            self.rooms.remove_if(room_id, |_, s| s.is_empty());
        }
    }
}
