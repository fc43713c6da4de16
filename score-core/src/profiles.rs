use crate::text::clamp_name;
use score_types::{PlayerProfile, ProfileId};
use uuid::Uuid;

/// Saved player identities reusable across games. Names are stored in
/// clamped form and matched case-insensitively on upsert.
#[derive(Debug, Default)]
pub struct ProfileStore {
    pub profiles: Vec<PlayerProfile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: Vec<PlayerProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[PlayerProfile] {
        &self.profiles
    }

    pub fn profile(&self, id: ProfileId) -> Option<&PlayerProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Returns the existing profile on a case-insensitive name match,
    /// updating its color to the requested one; otherwise creates a new
    /// profile. `None` when the clamped name is empty.
    pub fn upsert(&mut self, name: &str, avatar_color: &str) -> Option<ProfileId> {
        let name = clamp_name(name);
        if name.is_empty() {
            return None;
        }

        let needle = name.to_lowercase();
        if let Some(existing) = self
            .profiles
            .iter_mut()
            .find(|p| p.name.to_lowercase() == needle)
        {
            existing.avatar_color = avatar_color.to_string();
            return Some(existing.id);
        }

        let id = Uuid::new_v4();
        self.profiles.push(PlayerProfile {
            id,
            name,
            avatar_color: avatar_color.to_string(),
        });
        Some(id)
    }

    /// Deletes a saved profile. Players already added to games from this
    /// profile are independent copies and stay untouched.
    pub fn delete(&mut self, id: ProfileId) -> bool {
        let before = self.profiles.len();
        self.profiles.retain(|p| p.id != id);
        self.profiles.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_creates_then_reuses() {
        let mut store = ProfileStore::new();

        let id = store.upsert("  bob ", "#ff0000").unwrap();
        assert_eq!(store.profile(id).unwrap().name, "bob");
        assert_eq!(store.profile(id).unwrap().avatar_color, "#ff0000");

        // Case-insensitive match reuses the profile and updates the color.
        let again = store.upsert("BOB", "#3b82f6").unwrap();
        assert_eq!(again, id);
        assert_eq!(store.profiles().len(), 1);
        assert_eq!(store.profile(id).unwrap().avatar_color, "#3b82f6");
        assert_eq!(store.profile(id).unwrap().name, "bob");
    }

    #[test]
    fn test_upsert_rejects_empty_names() {
        let mut store = ProfileStore::new();
        assert!(store.upsert("", "#ff0000").is_none());
        assert!(store.upsert("   ", "#ff0000").is_none());
        assert!(store.profiles().is_empty());
    }

    #[test]
    fn test_delete() {
        let mut store = ProfileStore::new();
        let id = store.upsert("alice", "#ef4444").unwrap();

        assert!(store.delete(id));
        assert!(!store.delete(id));
        assert!(store.profile(id).is_none());
    }
}
