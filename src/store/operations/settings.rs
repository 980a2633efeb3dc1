use crate::store::keys;
use crate::store::{Store, StoreError};
use crate::trainer::filter::FilterSpec;

impl Store {
    /// A player with no saved settings sees every item.
    pub fn get_settings(&self, player_id: &str) -> Result<FilterSpec, StoreError> {
        let key = keys::player_settings_key(player_id);
        match self.player_settings.get(key.as_bytes())? {
            Some(raw) => Self::deserialize(&raw),
            None => Ok(FilterSpec::unrestricted()),
        }
    }

    pub fn set_settings(&self, player_id: &str, spec: &FilterSpec) -> Result<(), StoreError> {
        let key = keys::player_settings_key(player_id);
        self.player_settings
            .insert(key.as_bytes(), Self::serialize(spec)?)?;
        Ok(())
    }

    /// Returns whether anything was stored.
    pub fn clear_settings(&self, player_id: &str) -> Result<bool, StoreError> {
        let key = keys::player_settings_key(player_id);
        Ok(self.player_settings.remove(key.as_bytes())?.is_some())
    }
}
