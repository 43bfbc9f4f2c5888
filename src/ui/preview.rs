use std::sync::Arc;

use crate::codec::LocalFile;

/// Creates and releases temporary previewable references to local files.
pub trait PreviewBackend: Send + Sync {
    fn create(&self, file: &LocalFile) -> String;

    fn release(&self, uri: &str);
}

/// A live preview. The reference is released when the guard is dropped.
pub struct Preview {
    uri: String,
    backend: Arc<dyn PreviewBackend>,
}

impl Preview {
    pub fn acquire(backend: &Arc<dyn PreviewBackend>, file: &LocalFile) -> Self {
        let uri = backend.create(file);
        Self {
            uri,
            backend: Arc::clone(backend),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        self.backend.release(&self.uri);
    }
}

impl std::fmt::Debug for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preview").field("uri", &self.uri).finish()
    }
}

/// Previews served by the `egui_extras` file loader and evicted from egui's
/// image caches on release.
pub struct EguiPreviews {
    ctx: egui::Context,
}

impl EguiPreviews {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl PreviewBackend for EguiPreviews {
    fn create(&self, file: &LocalFile) -> String {
        format!("file://{}", file.path.display())
    }

    fn release(&self, uri: &str) {
        self.ctx.forget_image(uri);
    }
}
