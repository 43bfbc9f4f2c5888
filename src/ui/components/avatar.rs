use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use eframe::egui;

use crate::codec::decode_data_uri;

const PLACEHOLDER_FILL: egui::Color32 = egui::Color32::from_rgb(109, 40, 217);

/// Turns image references into egui sources.
///
/// Remote and `file://` references go straight to the installed loaders;
/// inline `data:` URIs are decoded once and served from memory.
#[derive(Default)]
pub struct MediaCache {
    decoded: HashMap<u64, Option<Arc<[u8]>>>,
}

impl MediaCache {
    pub fn source(&mut self, uri: &str) -> Option<egui::ImageSource<'static>> {
        if !uri.starts_with("data:") {
            return Some(egui::ImageSource::Uri(uri.to_string().into()));
        }

        let mut hasher = DefaultHasher::new();
        uri.hash(&mut hasher);
        let id = hasher.finish();

        let bytes = self
            .decoded
            .entry(id)
            .or_insert_with(|| decode_data_uri(uri).map(Arc::from))
            .clone()?;

        Some(egui::ImageSource::Bytes {
            uri: format!("bytes://inline-{id:x}.{}", inline_extension(uri)).into(),
            bytes: egui::load::Bytes::Shared(bytes),
        })
    }
}

fn inline_extension(uri: &str) -> &str {
    uri.strip_prefix("data:image/")
        .and_then(|rest| rest.split(';').next())
        .unwrap_or("png")
}

/// Round avatar, or a lettered placeholder when there is no picture.
pub fn show(
    ui: &mut egui::Ui,
    media: &mut MediaCache,
    uri: Option<&str>,
    label: &str,
    size: f32,
) -> egui::Response {
    match uri.and_then(|uri| media.source(uri)) {
        Some(source) => ui.add(
            egui::Image::new(source)
                .fit_to_exact_size(egui::vec2(size, size))
                .corner_radius(egui::CornerRadius::same((size / 2.0) as u8)),
        ),
        None => placeholder(ui, label, size),
    }
}

fn placeholder(ui: &mut egui::Ui, label: &str, size: f32) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    let initial = label
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string());

    let painter = ui.painter();
    painter.circle_filled(rect.center(), size / 2.0, PLACEHOLDER_FILL);
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        initial,
        egui::FontId::proportional(size * 0.5),
        egui::Color32::WHITE,
    );
    response
}
