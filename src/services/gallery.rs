use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::info;

use crate::errors::AppError;
use crate::state::{AppState, Notice};

const UPLOAD_LATENCY: Duration = Duration::from_millis(1_500);
const DELETE_LATENCY: Duration = Duration::from_millis(1_000);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryImage {
    /// Site-relative path; doubles as the image's identifier.
    pub url: String,
    pub caption: String,
}

/// The salon's portfolio. Uploads are simulated: no bytes move, only the
/// catalogue entry is recorded.
pub struct GalleryService {
    state: Arc<AppState>,
    images: Vec<GalleryImage>,
}

impl GalleryService {
    pub fn new(state: Arc<AppState>) -> Self {
        let images = [
            ("/img/gal1.jpg", "Elegant Updo"),
            ("/img/gal2.jpg", "Natural Hair Styling"),
            ("/img/gal3.jpg", "Color Transformation"),
            ("/img/gal4.jpg", "Bridal Hairstyle"),
            ("/img/twists.png", "Twists Hairstyle"),
            ("/img/knotless-braids.png", "Knotless Braids"),
            ("/img/fulani-braids.png", "Fulani Braids"),
            ("/img/cornrows.png", "Cornrows"),
        ]
        .into_iter()
        .map(|(url, caption)| GalleryImage {
            url: url.to_string(),
            caption: caption.to_string(),
        })
        .collect();

        Self { state, images }
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    pub async fn upload(&mut self, file_name: &str, caption: &str) -> Result<GalleryImage, AppError> {
        if file_name.trim().is_empty() || caption.trim().is_empty() {
            return Err(AppError::validation("an image and a caption are required"));
        }

        sleep(UPLOAD_LATENCY).await;

        let image = GalleryImage {
            url: format!("/img/{file_name}"),
            caption: caption.to_string(),
        };
        info!(url = %image.url, "gallery image added");
        self.images.push(image.clone());
        self.state.notify(Notice::success("Image uploaded successfully"));
        Ok(image)
    }

    pub async fn delete(&mut self, url: &str) -> Result<(), AppError> {
        if !self.images.iter().any(|i| i.url == url) {
            return Err(AppError::not_found(format!("gallery image {url}")));
        }

        sleep(DELETE_LATENCY).await;

        self.images.retain(|i| i.url != url);
        info!(url = %url, "gallery image removed");
        self.state.notify(Notice::success("Image removed"));
        Ok(())
    }
}
