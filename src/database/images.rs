use std::{fs, path::PathBuf};

use crate::app::AppError;
use crate::database::ImageStore;

/// Formats the image host accepts.
pub const ALLOWED_FORMATS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];
/// Avatar uploads are capped at 20 KB.
pub const AVATAR_MAX_BYTES: usize = 20 * 1024;
/// Blog images are capped at 5 MB.
pub const BLOG_IMAGE_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Lowercased extension of `filename` when it is on the whitelist.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_lowercase();

    if ALLOWED_FORMATS.contains(&ext.as_str()) {
        Some(ext)
    } else {
        None
    }
}

/// Image host keeping files on local disk, served back through
/// `GET /images/{name}`.
pub struct DiskImageStore {
    dir: PathBuf,
}

impl DiskImageStore {
    pub fn new(dir: PathBuf) -> DiskImageStore {
        if let Err(err) = fs::create_dir_all(&dir) {
            log::warn!("could not create image directory {:?}: {}", dir, err);
        }

        DiskImageStore { dir }
    }
}

impl ImageStore for DiskImageStore {
    fn store(&self, name: &str, bytes: &[u8]) -> Result<String, AppError> {
        fs::write(self.dir.join(name), bytes)?;

        Ok(format!("/images/{}", name))
    }

    fn load(&self, name: &str) -> Result<Vec<u8>, AppError> {
        // Names are always single path segments we generated ourselves.
        if name.contains('/') || name.contains("..") {
            return Err(AppError::NotFound("Image".to_string()));
        }

        Ok(fs::read(self.dir.join(name))?)
    }
}
