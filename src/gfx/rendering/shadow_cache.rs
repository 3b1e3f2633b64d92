//! Shadow map caching
//!
//! The scene is static and the light never moves at runtime, so the shadow
//! map only needs regeneration when the light configuration changes or the
//! scene contents are invalidated. Tracks the last rendered light state and
//! answers whether the shadow pass must run this frame.

use crate::gfx::resources::LightConfig;

/// Tracks shadow map validity against the light configuration
pub struct ShadowCache {
    last_light: Option<LightConfig>,
    dirty: bool,
}

impl ShadowCache {
    pub fn new() -> Self {
        Self {
            last_light: None,
            dirty: true,
        }
    }

    /// True when the shadow map must be re-rendered for this light
    pub fn needs_update(&self, light: &LightConfig) -> bool {
        self.dirty || self.last_light.as_ref() != Some(light)
    }

    /// Records that the shadow map now reflects this light state
    pub fn mark_valid(&mut self, light: LightConfig) {
        self.last_light = Some(light);
        self.dirty = false;
    }

    /// Forces regeneration on the next frame (scene contents changed)
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_valid(&self) -> bool {
        !self.dirty && self.last_light.is_some()
    }
}

impl Default for ShadowCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_cache_needs_update() {
        let cache = ShadowCache::new();
        assert!(cache.needs_update(&LightConfig::default()));
        assert!(!cache.is_valid());
    }

    #[test]
    fn valid_after_mark_until_light_changes() {
        let mut cache = ShadowCache::new();
        let light = LightConfig::default();

        cache.mark_valid(light);
        assert!(!cache.needs_update(&light));
        assert!(cache.is_valid());

        let moved = LightConfig {
            position: [0.0, 30.0, 0.0],
            ..light
        };
        assert!(cache.needs_update(&moved));
    }

    #[test]
    fn invalidate_forces_regeneration() {
        let mut cache = ShadowCache::new();
        let light = LightConfig::default();
        cache.mark_valid(light);

        cache.invalidate();
        assert!(cache.needs_update(&light));
        assert!(!cache.is_valid());
    }
}
