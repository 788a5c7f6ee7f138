//! Asset Library
//!
//! Loads the game's images by key and keeps them for the whole run.
//! Zero-crash policy: anything that cannot be read, fetched or decoded is
//! replaced by a generated placeholder and logged.
//!
//! Lookup order per image:
//! 1. In-memory cache (already loaded this run)
//! 2. `local_dir/<path>` on disk
//! 3. `base_url + <path>` over HTTP, in the background
//! 4. Generated placeholder
//!
//! Remote fetches never block the caller. The placeholder is drawn until
//! [`AssetLibrary::poll`] picks up the downloaded image.

pub mod texture;

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use thiserror::Error;

use crate::core::config::AssetConfig;
pub use texture::ImageData;

/// Upper bound for one remote image request.
#[cfg(not(target_arch = "wasm32"))]
pub const FETCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

// ============================================================================
// Asset Manifest
// ============================================================================

/// Texture keys and their paths relative to the asset base.
pub mod manifest {
    pub const STAR: &str = "star";
    pub const STAR_PATH: &str = "assets/star.png";

    pub const SAND: &str = "sand";
    pub const SAND_PATH: &str = "assets/sand.jpg";
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[cfg(not(target_arch = "wasm32"))]
    #[error("http error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[cfg(target_arch = "wasm32")]
    #[error("fetching {url} failed: {message}")]
    Fetch { url: String, message: String },
    #[error("failed to start asset worker: {0}")]
    Worker(#[source] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("asset not available: {0}")]
    Unavailable(String),
}

// ============================================================================
// Asset Library
// ============================================================================

struct Entry {
    image: ImageData,
    /// Bumped whenever the image for a key is replaced.
    version: u64,
}

/// A finished background load.
struct Delivery {
    key: &'static str,
    result: Result<ImageData, AssetError>,
}

/// Keyed image cache shared by all scenes.
pub struct AssetLibrary {
    config: AssetConfig,
    images: HashMap<&'static str, Entry>,
    /// Keys with a remote fetch still in flight.
    pending: HashSet<&'static str>,
    sender: Sender<Delivery>,
    receiver: Receiver<Delivery>,
}

impl AssetLibrary {
    pub fn new(config: AssetConfig) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            config,
            images: HashMap::new(),
            pending: HashSet::new(),
            sender,
            receiver,
        }
    }

    /// Ensures the image `key` is available, resolving `path` on first use.
    ///
    /// Returns at once. A key that has to be fetched gets its placeholder now
    /// and the real image on a later [`poll`](Self::poll).
    pub fn image(&mut self, key: &'static str, path: &str) {
        if self.images.contains_key(key) {
            return;
        }

        if let Some(local) = self.local_path(path).filter(|p| p.is_file()) {
            match ImageData::load_from_file(&local) {
                Ok(image) => {
                    log::info!("Loaded image '{}' ({}x{})", key, image.width, image.height);
                    self.insert(key, image);
                    return;
                }
                Err(e) => log::warn!("Could not read {}: {}", local.display(), e),
            }
        }

        if !self.config.fetch_remote {
            log::warn!("Image '{}' unavailable offline, using placeholder", key);
        } else {
            match self.spawn_fetch(key, path) {
                Ok(()) => {
                    self.pending.insert(key);
                }
                Err(e) => log::warn!("Image '{}' unavailable ({}), using placeholder", key, e),
            }
        }
        self.insert(key, placeholder_for(key));
    }

    /// Applies finished background loads. Returns how many images changed.
    pub fn poll(&mut self) -> usize {
        let mut changed = 0;
        while let Ok(Delivery { key, result }) = self.receiver.try_recv() {
            self.pending.remove(key);
            match result {
                Ok(image) => {
                    log::info!("Loaded image '{}' ({}x{})", key, image.width, image.height);
                    self.insert(key, image);
                    changed += 1;
                }
                Err(e) => log::warn!("Image '{}' unavailable ({}), keeping placeholder", key, e),
            }
        }
        changed
    }

    pub fn get(&self, key: &str) -> Option<&ImageData> {
        self.images.get(key).map(|entry| &entry.image)
    }

    /// Changes every time the image behind `key` is replaced.
    pub fn version(&self, key: &str) -> Option<u64> {
        self.images.get(key).map(|entry| entry.version)
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.images.keys().copied()
    }

    /// Full remote URL for an asset path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn insert(&mut self, key: &'static str, image: ImageData) {
        let version = self.images.get(key).map_or(0, |entry| entry.version + 1);
        self.images.insert(key, Entry { image, version });
    }

    /// `None` when no local directory is configured.
    fn local_path(&self, path: &str) -> Option<PathBuf> {
        if self.config.local_dir.as_os_str().is_empty() {
            None
        } else {
            Some(self.config.local_dir.join(path))
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn_fetch(&self, key: &'static str, path: &str) -> Result<(), AssetError> {
        let url = self.url(path);
        let cache = self.local_path(path);
        let sender = self.sender.clone();

        std::thread::Builder::new()
            .name(format!("asset-{}", key))
            .spawn(move || {
                let result = fetch_blocking(&url).and_then(|bytes| {
                    let image = ImageData::decode(&bytes)?;
                    if let Some(cache) = cache {
                        store_local(&cache, &bytes);
                    }
                    Ok(image)
                });
                // The library may already be gone
                let _ = sender.send(Delivery { key, result });
            })
            .map(|_| ())
            .map_err(AssetError::Worker)
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn_fetch(&self, key: &'static str, path: &str) -> Result<(), AssetError> {
        let url = self.url(path);
        let sender = self.sender.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let result = match fetch_browser(&url).await {
                Ok(bytes) => ImageData::decode(&bytes).map_err(AssetError::from),
                Err(e) => Err(e),
            };
            let _ = sender.send(Delivery { key, result });
        });
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn fetch_blocking(url: &str) -> Result<Vec<u8>, AssetError> {
    log::info!("Fetching {}", url);

    let http = |source| AssetError::Http {
        url: url.to_string(),
        source,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(http)?;
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(http)?;
    let bytes = response.bytes().map_err(http)?;
    Ok(bytes.to_vec())
}

#[cfg(target_arch = "wasm32")]
async fn fetch_browser(url: &str) -> Result<Vec<u8>, AssetError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    log::info!("Fetching {}", url);

    let failed = |e: wasm_bindgen::JsValue| AssetError::Fetch {
        url: url.to_string(),
        message: format!("{:?}", e),
    };
    let window = web_sys::window().ok_or_else(|| AssetError::Unavailable(url.to_string()))?;

    let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(failed)?
        .dyn_into()
        .map_err(failed)?;
    if !response.ok() {
        return Err(AssetError::Fetch {
            url: url.to_string(),
            message: format!("HTTP {}", response.status()),
        });
    }

    let buffer = JsFuture::from(response.array_buffer().map_err(failed)?)
        .await
        .map_err(failed)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Best-effort cache of fetched bytes so the next run stays offline.
#[cfg(not(target_arch = "wasm32"))]
fn store_local(local: &std::path::Path, bytes: &[u8]) {
    let result = local
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|_| std::fs::write(local, bytes))
        .map_err(|source| AssetError::Io {
            path: local.to_path_buf(),
            source,
        });
    match result {
        Ok(()) => log::info!("Cached asset at {}", local.display()),
        Err(e) => log::warn!("Could not cache asset: {}", e),
    }
}

/// Generated stand-in for a missing image.
pub fn placeholder_for(key: &str) -> ImageData {
    use texture::*;

    match key {
        manifest::STAR => ImageData::generate_disc(PLACEHOLDER_SIZE, STAR_COLOR),
        manifest::SAND => {
            ImageData::generate_checkerboard(PLACEHOLDER_SIZE, SAND_COLOR_1, SAND_COLOR_2)
        }
        _ => ImageData::generate_checkerboard(PLACEHOLDER_SIZE, MISSING_COLOR_1, MISSING_COLOR_2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::{Duration, Instant};

    fn remote_config(base_url: String, local_dir: PathBuf) -> AssetConfig {
        AssetConfig {
            base_url,
            local_dir,
            fetch_remote: true,
        }
    }

    fn png_bytes(size: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        image::RgbaImage::from_pixel(size, size, image::Rgba([9, 9, 9, 255]))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    /// Answers a single HTTP request with `body` and returns the base URL.
    fn serve_once(body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
        });
        format!("http://{}/", addr)
    }

    fn poll_until_settled(assets: &mut AssetLibrary, key: &str) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while assets.is_pending(key) && Instant::now() < deadline {
            assets.poll();
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn offline_library_uses_placeholders() {
        let mut assets = AssetLibrary::new(AssetConfig::offline());
        assets.image(manifest::STAR, manifest::STAR_PATH);
        assets.image(manifest::SAND, manifest::SAND_PATH);

        let star = assets.get(manifest::STAR).unwrap();
        assert!(star.is_placeholder);
        assert_eq!(star, &placeholder_for(manifest::STAR));
        assert!(assets.get(manifest::SAND).unwrap().is_placeholder);
        assert!(assets.get("moon").is_none());
        assert!(!assets.is_pending(manifest::STAR));
    }

    #[test]
    fn loads_once_per_key() {
        let mut assets = AssetLibrary::new(AssetConfig::offline());
        assets.image(manifest::STAR, manifest::STAR_PATH);
        assets.image(manifest::STAR, "somewhere/else.png");
        assert_eq!(assets.keys().count(), 1);
        assert_eq!(assets.version(manifest::STAR), Some(0));
    }

    #[test]
    fn joins_base_url() {
        let assets = AssetLibrary::new(AssetConfig::default());
        assert_eq!(
            assets.url(manifest::STAR_PATH),
            "https://raw.githubusercontent.com/mariyadavydova/starfall-phaser3-typescript/master/assets/star.png"
        );
    }

    #[test]
    fn reads_local_directory_first() {
        let dir = std::env::temp_dir().join(format!("starfall-assets-{}", std::process::id()));
        let file = dir.join(manifest::STAR_PATH);
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, png_bytes(4)).unwrap();

        // The empty base would make any fetch fail
        let mut assets = AssetLibrary::new(remote_config(String::new(), dir.clone()));
        assets.image(manifest::STAR, manifest::STAR_PATH);
        let star = assets.get(manifest::STAR).unwrap();
        assert!(!star.is_placeholder);
        assert_eq!((star.width, star.height), (4, 4));
        assert!(!assets.is_pending(manifest::STAR));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn silent_host_does_not_stall_preload() {
        // Accepts connections and never answers
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}/", listener.local_addr().unwrap());
        let mut assets = AssetLibrary::new(remote_config(base, PathBuf::new()));

        let started = Instant::now();
        assets.image(manifest::STAR, manifest::STAR_PATH);
        assets.image(manifest::SAND, manifest::SAND_PATH);
        assert!(started.elapsed() < Duration::from_secs(2));

        assert!(assets.is_pending(manifest::STAR));
        assert!(assets.get(manifest::STAR).unwrap().is_placeholder);
        assert!(assets.get(manifest::SAND).unwrap().is_placeholder);
        assert_eq!(assets.poll(), 0);
        drop(listener);
    }

    #[test]
    fn fetched_image_replaces_placeholder_and_is_cached() {
        let dir = std::env::temp_dir().join(format!("starfall-fetch-{}", std::process::id()));
        let base = serve_once(png_bytes(8));
        let mut assets = AssetLibrary::new(remote_config(base, dir.clone()));

        assets.image(manifest::STAR, manifest::STAR_PATH);
        assert_eq!(assets.version(manifest::STAR), Some(0));
        poll_until_settled(&mut assets, manifest::STAR);

        let star = assets.get(manifest::STAR).unwrap();
        assert!(!star.is_placeholder);
        assert_eq!((star.width, star.height), (8, 8));
        assert_eq!(assets.version(manifest::STAR), Some(1));
        assert!(dir.join(manifest::STAR_PATH).is_file());

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn failed_fetch_keeps_placeholder() {
        // Bind then drop so the port refuses connections
        let base = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}/", listener.local_addr().unwrap())
        };
        let mut assets = AssetLibrary::new(remote_config(base, PathBuf::new()));

        assets.image(manifest::SAND, manifest::SAND_PATH);
        poll_until_settled(&mut assets, manifest::SAND);

        assert!(!assets.is_pending(manifest::SAND));
        assert!(assets.get(manifest::SAND).unwrap().is_placeholder);
        assert_eq!(assets.version(manifest::SAND), Some(0));
    }
}
