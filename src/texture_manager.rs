use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::error::DecodeError;
use crate::store::DrawingId;

/// What a cached texture shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKey {
    /// The live editing surface
    Canvas,
    /// A stored drawing opened in the gallery
    Drawing(DrawingId),
}

struct CachedTexture {
    version: u64,
    handle: TextureHandle,
    last_used: u64,
}

/// Uploads bitmaps to the GPU and re-uploads only when their version changes
pub struct TextureManager {
    textures: HashMap<TextureKey, CachedTexture>,
    /// Current frame counter for LRU tracking
    current_frame: u64,
    /// Maximum number of textures to cache
    max_cache_size: usize,
}

// TextureHandle has no useful Debug output
impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("keys", &self.textures.keys().collect::<Vec<_>>())
            .field("current_frame", &self.current_frame)
            .field("max_cache_size", &self.max_cache_size)
            .finish()
    }
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            textures: HashMap::new(),
            current_frame: 0,
            max_cache_size: max_cache_size.max(1),
        }
    }

    /// Should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Texture for `key` at `version`. `generator` only runs when the cached
    /// copy is missing or stale; an existing handle is updated in place.
    pub fn get_or_update<F>(
        &mut self,
        key: TextureKey,
        version: u64,
        generator: F,
        ctx: &Context,
    ) -> Result<TextureId, DecodeError>
    where
        F: FnOnce() -> Result<ColorImage, DecodeError>,
    {
        if let Some(cached) = self.textures.get_mut(&key) {
            cached.last_used = self.current_frame;
            if cached.version != version {
                cached.handle.set(generator()?, TextureOptions::NEAREST);
                cached.version = version;
                log::trace!("Re-uploaded {:?} at version {}", key, version);
            }
            return Ok(cached.handle.id());
        }

        let image = generator()?;
        self.prune_cache_if_needed();
        let name = match key {
            TextureKey::Canvas => "canvas".to_owned(),
            TextureKey::Drawing(id) => format!("drawing_{id}"),
        };
        let handle = ctx.load_texture(name, image, TextureOptions::NEAREST);
        let id = handle.id();
        self.textures.insert(
            key,
            CachedTexture {
                version,
                handle,
                last_used: self.current_frame,
            },
        );
        Ok(id)
    }

    pub fn invalidate(&mut self, key: TextureKey) {
        self.textures.remove(&key);
    }

    /// Make room for one more texture, dropping the least recently used
    /// (the canvas is never evicted)
    fn prune_cache_if_needed(&mut self) {
        while self.textures.len() >= self.max_cache_size {
            let oldest = self
                .textures
                .iter()
                .filter(|(key, _)| **key != TextureKey::Canvas)
                .min_by_key(|(_, cached)| cached.last_used)
                .map(|(key, _)| *key);
            match oldest {
                Some(key) => {
                    self.textures.remove(&key);
                }
                None => break,
            }
        }
    }

    pub fn cache_size(&self) -> usize {
        self.textures.len()
    }

    /// Version of the texture currently uploaded for `key`
    pub fn cached_version(&self, key: TextureKey) -> Option<u64> {
        self.textures.get(&key).map(|cached| cached.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn blank() -> Result<ColorImage, DecodeError> {
        Ok(ColorImage::new([4, 4], egui::Color32::WHITE))
    }

    #[test]
    fn test_generator_runs_only_on_version_change() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(4);
        let calls = Cell::new(0);
        let counting = || {
            calls.set(calls.get() + 1);
            blank()
        };

        let first = manager.get_or_update(TextureKey::Canvas, 0, counting, &ctx).unwrap();
        let again = manager.get_or_update(TextureKey::Canvas, 0, counting, &ctx).unwrap();
        assert_eq!(first, again);
        assert_eq!(calls.get(), 1);

        let updated = manager.get_or_update(TextureKey::Canvas, 1, counting, &ctx).unwrap();
        assert_eq!(updated, first);
        assert_eq!(calls.get(), 2);
        assert_eq!(manager.cached_version(TextureKey::Canvas), Some(1));
    }

    #[test]
    fn test_failed_generator_keeps_cache() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(4);
        manager.get_or_update(TextureKey::Canvas, 0, blank, &ctx).unwrap();

        let result = manager.get_or_update(
            TextureKey::Canvas,
            1,
            || Err(DecodeError::NotADataUrl),
            &ctx,
        );
        assert!(result.is_err());
        assert_eq!(manager.cached_version(TextureKey::Canvas), Some(0));
    }

    #[test]
    fn test_lru_eviction_spares_canvas() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(2);
        let (a, b) = (uuid::Uuid::new_v4(), uuid::Uuid::new_v4());

        manager.get_or_update(TextureKey::Canvas, 0, blank, &ctx).unwrap();
        manager.begin_frame();
        manager.get_or_update(TextureKey::Drawing(a), 0, blank, &ctx).unwrap();
        manager.begin_frame();
        manager.get_or_update(TextureKey::Drawing(b), 0, blank, &ctx).unwrap();

        assert_eq!(manager.cache_size(), 2);
        assert!(manager.cached_version(TextureKey::Canvas).is_some());
        assert!(manager.cached_version(TextureKey::Drawing(a)).is_none());
        assert!(manager.cached_version(TextureKey::Drawing(b)).is_some());
    }

    #[test]
    fn test_invalidate() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(4);
        manager.get_or_update(TextureKey::Canvas, 0, blank, &ctx).unwrap();
        manager.invalidate(TextureKey::Canvas);
        assert_eq!(manager.cache_size(), 0);
    }
}
