//! Filesystem-backed resource and texture-page lookup.

use std::fs;
use std::path::{Path, PathBuf};

use codec::{Bitmap, CodecError, CodecResult, Color, PageLoader, ResourceSource};

/// Resolves logical names to `NAME.BAM` files in one directory.
///
/// Matching ignores ASCII case, so `hero` finds `HERO.BAM` and `Hero.bam`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Finds the file for `name`, if present.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        find_case_insensitive(&self.root, &format!("{name}.bam"))
    }
}

impl ResourceSource for DirectorySource {
    fn read(&self, name: &str) -> CodecResult<Vec<u8>> {
        let path = self.locate(name).ok_or_else(|| CodecError::ResourceNotFound {
            name: name.to_string(),
        })?;
        fs::read(&path).map_err(|err| CodecError::Resource {
            name: name.to_string(),
            message: err.to_string(),
        })
    }
}

/// Loads texture pages stored as `MOS0000.png`, `MOS0001.png`, ...
#[derive(Debug, Clone)]
pub struct PngPages {
    dir: PathBuf,
}

impl PngPages {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn file_name(page: u32) -> String {
        format!("MOS{page:04}.png")
    }
}

impl PageLoader for PngPages {
    fn load_page(&self, page: u32) -> CodecResult<Bitmap> {
        let name = Self::file_name(page);
        let path = find_case_insensitive(&self.dir, &name)
            .ok_or(CodecError::ResourceNotFound { name: name.clone() })?;
        let image = image::open(&path).map_err(|err| CodecError::Resource {
            name,
            message: err.to_string(),
        })?;
        Ok(rgba_to_bitmap(&image.to_rgba8()))
    }
}

/// Converts a decoded image into a bitmap.
#[must_use]
pub fn rgba_to_bitmap(image: &image::RgbaImage) -> Bitmap {
    let mut bitmap = Bitmap::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        bitmap.set(x, y, Color::from_argb(a, r, g, b));
    }
    bitmap
}

/// Converts a bitmap into an RGBA image.
#[must_use]
pub fn bitmap_to_rgba(bitmap: &Bitmap) -> image::RgbaImage {
    image::RgbaImage::from_fn(bitmap.width(), bitmap.height(), |x, y| {
        let color = bitmap.get(x, y).unwrap_or(Color::TRANSPARENT);
        image::Rgba([color.red(), color.green(), color.blue(), color.alpha()])
    })
}

fn find_case_insensitive(dir: &Path, file_name: &str) -> Option<PathBuf> {
    let exact = dir.join(file_name);
    if exact.is_file() {
        return Some(exact);
    }
    fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.eq_ignore_ascii_case(file_name))
        })
}
