use std::path::Path;

use anyhow::Context;
use uuid::Uuid;

use crate::domain::ImagePayload;

/// Writes a decoded image under `<media_root>/<subdir>/` and returns the
/// path relative to the media root, which is what gets stored in the
/// database.
#[tracing::instrument(name = "Storing image file", skip(media_root, image))]
pub fn store_image(
    media_root: &Path,
    subdir: &str,
    image: &ImagePayload,
) -> Result<String, anyhow::Error> {
    let filename = format!("{}.{}", Uuid::now_v7(), image.extension());
    let directory = media_root.join(subdir);
    std::fs::create_dir_all(&directory)
        .context("Failed to create media directory.")?;
    std::fs::write(directory.join(&filename), image.bytes())
        .context("Failed to write image file.")?;
    Ok(format!("{}/{}", subdir, filename))
}

/// Best-effort removal of a previously stored image. A missing file is not
/// an error: the database row is the source of truth.
pub fn remove_image(media_root: &Path, relative_path: &str) {
    if let Err(e) = std::fs::remove_file(media_root.join(relative_path)) {
        tracing::warn!(
            "Could not remove media file {}: {:?}",
            relative_path,
            e
        );
    }
}

/// URL under which a stored image is served.
pub fn media_url(relative_path: &str) -> String {
    format!("/media/{}", relative_path)
}
