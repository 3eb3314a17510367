//! Edit settings crossing the JS boundary as plain objects.
//!
//! ```typescript
//! const settings = default_settings();
//! settings.blur_radius = 40;
//! settings.aspect_ratio = { Fixed: [4, 3] };
//! const extended = extend_image(image, settings);
//! ```

use cropple_core::{AspectRatio, EditSettings, FillPolicy};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::to_js_error;

/// The product defaults: 16:9, centered, blur 70, `#CCCCCC` fill, no angle.
#[wasm_bindgen]
pub fn default_settings() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&EditSettings::default()).map_err(to_js_error)
}

/// A named ratio for the preset picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PresetEntry {
    label: &'static str,
    width: u32,
    height: u32,
}

pub(crate) fn preset_entries() -> Vec<PresetEntry> {
    AspectRatio::PRESETS
        .iter()
        .filter_map(|preset| match preset.ratio {
            AspectRatio::Fixed(width, height) => Some(PresetEntry {
                label: preset.label,
                width,
                height,
            }),
            AspectRatio::DeriveFromImage | AspectRatio::Unconstrained => None,
        })
        .collect()
}

/// Preset ratios in display order, as `{ label, width, height }` objects.
#[wasm_bindgen]
pub fn aspect_presets() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&preset_entries()).map_err(to_js_error)
}

/// Read settings from JS. `undefined` and `null` mean the defaults.
pub(crate) fn settings_from_js(value: JsValue) -> Result<EditSettings, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(EditSettings::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(to_js_error)
}

/// Fill policy for `settings`, plus a warning when the color was unusable.
pub(crate) fn resolve_fill(settings: &EditSettings) -> (FillPolicy, Option<String>) {
    match settings.try_fill_policy() {
        Ok(policy) => (policy, None),
        Err(err) => (
            settings.fill_policy(),
            Some(format!("{}; using the default gray", err)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropple_core::transform::DEFAULT_FILL;
    use cropple_core::FillMode;

    #[test]
    fn test_preset_entries() {
        let presets = preset_entries();
        assert_eq!(presets.len(), 10);
        assert_eq!(
            presets[1],
            PresetEntry {
                label: "16:9",
                width: 16,
                height: 9
            }
        );
        assert_eq!(presets[9].label, "1:1.91");
        assert_eq!((presets[9].width, presets[9].height), (100, 191));
    }

    #[test]
    fn test_resolve_fill() {
        let mut settings = EditSettings::default();
        let (_, warning) = resolve_fill(&settings);
        assert!(warning.is_none());

        settings.fill_color = "#12".to_string();
        let (policy, warning) = resolve_fill(&settings);
        assert_eq!(policy, FillPolicy::Opaque(DEFAULT_FILL));
        assert!(warning.unwrap().contains("#12"));

        settings.fill_mode = FillMode::Transparent;
        assert_eq!(resolve_fill(&settings), (FillPolicy::Transparent, None));
    }
}
