use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Handle to a cached texture. Shared by every acquirer of the same URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

#[derive(Debug)]
struct CachedTexture {
    handle: TextureHandle,
    refs: u32,
}

/// Reference-counted texture cache keyed by URL.
///
/// A texture stays resident while at least one acquirer holds it and is
/// disposed on the release that drops the count to zero. Scene instances that
/// share a cache therefore never dispose a texture another instance still
/// draws with.
#[derive(Debug, Default)]
pub struct TextureCache {
    by_url: HashMap<String, CachedTexture>,
    urls: HashMap<TextureHandle, String>,
    next_id: u32,
    loads: u32,
}

/// A cache shared between scene instances on the same thread.
pub type SharedTextureCache = Rc<RefCell<TextureCache>>;

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedTextureCache {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Acquire a texture, loading it on first use.
    pub fn acquire(&mut self, url: &str) -> TextureHandle {
        if let Some(cached) = self.by_url.get_mut(url) {
            cached.refs += 1;
            return cached.handle;
        }
        let handle = TextureHandle(self.next_id);
        self.next_id += 1;
        self.loads += 1;
        log::debug!("texture load {url} -> #{}", handle.0);
        self.by_url.insert(url.to_owned(), CachedTexture { handle, refs: 1 });
        self.urls.insert(handle, url.to_owned());
        handle
    }

    /// Release one reference. Returns true when this release disposed the texture.
    pub fn release(&mut self, handle: TextureHandle) -> bool {
        let Some(url) = self.urls.get(&handle) else {
            log::warn!("release of unknown texture #{}", handle.0);
            return false;
        };
        let Some(cached) = self.by_url.get_mut(url) else {
            return false;
        };
        cached.refs -= 1;
        if cached.refs > 0 {
            return false;
        }
        log::debug!("texture dispose {url}");
        let url = url.clone();
        self.by_url.remove(&url);
        self.urls.remove(&handle);
        true
    }

    /// Current reference count for a URL (0 if not resident).
    pub fn ref_count(&self, url: &str) -> u32 {
        self.by_url.get(url).map_or(0, |c| c.refs)
    }

    pub fn url(&self, handle: TextureHandle) -> Option<&str> {
        self.urls.get(&handle).map(String::as_str)
    }

    /// Number of resident textures.
    pub fn live_count(&self) -> usize {
        self.by_url.len()
    }

    /// Loads performed over the cache's lifetime.
    pub fn load_count(&self) -> u32 {
        self.loads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_url_shares_one_texture() {
        let mut cache = TextureCache::new();
        let a = cache.acquire("sun.jpg");
        let b = cache.acquire("sun.jpg");
        assert_eq!(a, b);
        assert_eq!(cache.ref_count("sun.jpg"), 2);
        assert_eq!(cache.load_count(), 1);
    }

    #[test]
    fn disposed_only_on_last_release() {
        let mut cache = TextureCache::new();
        let a = cache.acquire("rock.jpg");
        cache.acquire("rock.jpg");
        assert!(!cache.release(a));
        assert_eq!(cache.live_count(), 1);
        assert!(cache.release(a));
        assert_eq!(cache.live_count(), 0);
        assert!(!cache.release(a), "releasing a disposed texture is a no-op");
    }

    #[test]
    fn reload_after_dispose_gets_new_handle() {
        let mut cache = TextureCache::new();
        let a = cache.acquire("rock.jpg");
        cache.release(a);
        let b = cache.acquire("rock.jpg");
        assert_ne!(a, b);
        assert_eq!(cache.url(b), Some("rock.jpg"));
    }

    #[test]
    fn shared_cache_survives_one_instance_releasing() {
        let shared = TextureCache::shared();
        let first = shared.borrow_mut().acquire("space.png");
        let second = shared.borrow_mut().acquire("space.png");
        shared.borrow_mut().release(first);
        assert_eq!(shared.borrow().ref_count("space.png"), 1);
        shared.borrow_mut().release(second);
        assert_eq!(shared.borrow().live_count(), 0);
    }
}
