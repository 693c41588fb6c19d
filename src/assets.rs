//! Sprite assets
//!
//! The core never decodes pixels. It asks an `AssetProvider` for sprite
//! handles before the first frame and draws whatever it got back. A sprite
//! that fails to load is logged and left out; the game runs without it.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Sprite file names
pub mod names {
    pub const TANK_BODY: &str = "tankBody.png";
    pub const TANK_GUN: &str = "tankGun.png";
    pub const ENEMY_BODY: &str = "opponentTank.png";
    pub const ENEMY_GUN: &str = "opponentTankGun.png";
    pub const MACHINE_GUN_BODY: &str = "MachineTank.png";
    pub const MACHINE_GUN_GUN: &str = "MachineTankGun.png";
    pub const BULLET: &str = "bullet.png";
}

/// A loaded sprite: name plus pixel dimensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl SpriteImage {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Source of sprite images
pub trait AssetProvider {
    fn load(&self, name: &str) -> Result<SpriteImage, GameError>;
}

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
/// Signature + IHDR length/type + width + height
const PNG_HEADER_LEN: usize = 24;

/// Read sprite dimensions from the PNG IHDR chunk
pub fn parse_png_header(name: &str, bytes: &[u8]) -> Result<SpriteImage, GameError> {
    if bytes.len() < PNG_HEADER_LEN {
        return Err(GameError::asset(name, "file too short for a PNG header"));
    }
    if bytes[..8] != PNG_SIGNATURE {
        return Err(GameError::asset(name, "not a PNG file"));
    }
    if &bytes[12..16] != b"IHDR" {
        return Err(GameError::asset(name, "missing IHDR chunk"));
    }

    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    if width == 0 || height == 0 {
        return Err(GameError::asset(name, format!("empty image {}x{}", width, height)));
    }

    Ok(SpriteImage {
        name: name.to_string(),
        width,
        height,
    })
}

/// Sprites read from a directory on disk
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetProvider for DirectoryAssets {
    fn load(&self, name: &str) -> Result<SpriteImage, GameError> {
        let path = self.root.join(name);
        let mut header = [0u8; PNG_HEADER_LEN];
        File::open(&path)
            .and_then(|mut f| f.read_exact(&mut header))
            .map_err(|e| GameError::asset(name, format!("{}: {}", path.display(), e)))?;
        parse_png_header(name, &header)
    }
}

/// Every sprite the renderer knows about; missing ones stay `None`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpriteSet {
    pub tank_body: Option<SpriteImage>,
    pub tank_gun: Option<SpriteImage>,
    pub enemy_body: Option<SpriteImage>,
    pub enemy_gun: Option<SpriteImage>,
    pub machine_gun_body: Option<SpriteImage>,
    pub machine_gun_gun: Option<SpriteImage>,
    pub bullet: Option<SpriteImage>,
}

impl SpriteSet {
    /// Load all sprites; failures are logged, never fatal
    pub fn load(provider: &impl AssetProvider) -> Self {
        let set = Self {
            tank_body: load_or_warn(provider, names::TANK_BODY),
            tank_gun: load_or_warn(provider, names::TANK_GUN),
            enemy_body: load_or_warn(provider, names::ENEMY_BODY),
            enemy_gun: load_or_warn(provider, names::ENEMY_GUN),
            machine_gun_body: load_or_warn(provider, names::MACHINE_GUN_BODY),
            machine_gun_gun: load_or_warn(provider, names::MACHINE_GUN_GUN),
            bullet: load_or_warn(provider, names::BULLET),
        };
        log::info!("Loaded {}/7 sprites", set.loaded_count());
        set
    }

    pub fn loaded_count(&self) -> usize {
        [
            &self.tank_body,
            &self.tank_gun,
            &self.enemy_body,
            &self.enemy_gun,
            &self.machine_gun_body,
            &self.machine_gun_gun,
            &self.bullet,
        ]
        .iter()
        .filter(|s| s.is_some())
        .count()
    }
}

fn load_or_warn(provider: &impl AssetProvider, name: &str) -> Option<SpriteImage> {
    match provider.load(name) {
        Ok(sprite) => {
            log::debug!("Loaded sprite {} ({}x{})", name, sprite.width, sprite.height);
            Some(sprite)
        }
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    pub(crate) fn png_header(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
        bytes
    }

    /// In-memory provider with fixed sprite sizes
    pub(crate) struct MemoryAssets(pub HashMap<&'static str, (u32, u32)>);

    impl AssetProvider for MemoryAssets {
        fn load(&self, name: &str) -> Result<SpriteImage, GameError> {
            let (w, h) = self
                .0
                .get(name)
                .ok_or_else(|| GameError::asset(name, "not found"))?;
            parse_png_header(name, &png_header(*w, *h))
        }
    }

    pub(crate) fn full_set() -> SpriteSet {
        SpriteSet::load(&MemoryAssets(HashMap::from([
            (names::TANK_BODY, (180, 180)),
            (names::TANK_GUN, (180, 180)),
            (names::ENEMY_BODY, (80, 75)),
            (names::ENEMY_GUN, (80, 75)),
            (names::MACHINE_GUN_BODY, (80, 75)),
            (names::MACHINE_GUN_GUN, (30, 60)),
            (names::BULLET, (12, 12)),
        ])))
    }

    #[test]
    fn test_parse_png_header() {
        let sprite = parse_png_header("a.png", &png_header(180, 90)).unwrap();
        assert_eq!(sprite.width, 180);
        assert_eq!(sprite.height, 90);
        assert_eq!(sprite.size(), Vec2::new(180.0, 90.0));
    }

    #[test]
    fn test_parse_rejects_bad_data() {
        assert!(matches!(
            parse_png_header("a.png", b"short"),
            Err(GameError::AssetLoad { .. })
        ));

        let mut not_png = png_header(10, 10);
        not_png[1] = b'J';
        assert!(parse_png_header("a.png", &not_png).is_err());

        assert!(parse_png_header("a.png", &png_header(0, 10)).is_err());
    }

    #[test]
    fn test_missing_sprites_are_none() {
        let provider = MemoryAssets(HashMap::from([(names::TANK_BODY, (180, 180))]));
        let set = SpriteSet::load(&provider);
        assert!(set.tank_body.is_some());
        assert!(set.tank_gun.is_none());
        assert!(set.bullet.is_none());
        assert_eq!(set.loaded_count(), 1);
    }

    #[test]
    fn test_full_set() {
        assert_eq!(full_set().loaded_count(), 7);
    }

    #[test]
    fn test_directory_assets() {
        let dir = std::env::temp_dir().join(format!("tank-arena-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(names::TANK_GUN), png_header(64, 32)).unwrap();

        let provider = DirectoryAssets::new(&dir);
        let gun = provider.load(names::TANK_GUN).unwrap();
        assert_eq!((gun.width, gun.height), (64, 32));

        let err = provider.load(names::TANK_BODY).unwrap_err();
        assert!(err.to_string().contains(names::TANK_BODY));

        let set = SpriteSet::load(&provider);
        assert_eq!(set.loaded_count(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
