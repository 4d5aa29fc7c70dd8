//! Locally held model photos.

use std::collections::HashMap;

use serde::Serialize;

use crate::transport::UploadFile;

/// Which input produced the photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureSource {
    Camera,
    Gallery,
}

/// A photo kept client-side until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub source: CaptureSource,
}

impl ImageAttachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
        source: CaptureSource,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
            source,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn to_upload_file(&self) -> UploadFile {
        UploadFile {
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            bytes: self.bytes.clone(),
        }
    }
}

/// At most one photo per model.
#[derive(Debug, Clone, Default)]
pub struct ModelImages {
    images: HashMap<String, ImageAttachment>,
}

impl ModelImages {
    /// Stores `image` for `model`, returning the photo it replaced.
    pub fn attach(
        &mut self,
        model: impl Into<String>,
        image: ImageAttachment,
    ) -> Option<ImageAttachment> {
        self.images.insert(model.into(), image)
    }

    pub fn remove(&mut self, model: &str) -> Option<ImageAttachment> {
        self.images.remove(model)
    }

    pub fn get(&self, model: &str) -> Option<&ImageAttachment> {
        self.images.get(model)
    }

    pub fn has(&self, model: &str) -> bool {
        self.images.contains_key(model)
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
