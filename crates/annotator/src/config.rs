use crate::error::{Error, Result};
use annotator_render::EmojiStyle;
use chrono::SecondsFormat;
use serde_json::{Value, json};

/// Session configuration: bundled defaults deep-merged with user overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatorConfig(Value);

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self(json!({
            "qa": {
                "enabled": true,
                "priority": 1500
            },
            "emoji": {
                "enabled": true,
                "priority": 100000,
                "palette": ["😀", "😂", "😍", "😎", "🤔", "😡", "👍", "👎", "🎉", "🔥"],
                "renderer": {
                    "priority": 2000,
                    "radius": 10,
                    "fill": "#FFC83D",
                    "stroke": "black",
                    "strokeWidth": 2,
                    "label": { "x": 10, "y": 25 }
                }
            },
            "clock": {
                "precision": "millis"
            }
        }))
    }
}

impl AnnotatorConfig {
    /// Defaults with `overrides` merged on top.
    pub fn with_overrides(overrides: &Value) -> Self {
        let mut config = Self::default();
        config.deep_merge(overrides);
        config
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(text).map_err(|e| Error::Config {
            path: String::new(),
            message: e.to_string(),
        })?;
        Ok(Self::with_overrides(&overrides))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    pub fn get_i32(&self, dotted_path: &str) -> Option<i32> {
        self.get(dotted_path)?
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
    }

    /// Merges `overrides` into this config. Objects merge key by key, `null` keeps the
    /// current value, anything else (arrays included) replaces it.
    pub fn deep_merge(&mut self, overrides: &Value) {
        merge_overrides(&mut self.0, overrides);
    }

    pub fn qa_enabled(&self) -> bool {
        self.get_bool("qa.enabled").unwrap_or(true)
    }

    pub fn emoji_enabled(&self) -> bool {
        self.get_bool("emoji.enabled").unwrap_or(true)
    }

    pub fn qa_priority(&self) -> Result<i32> {
        self.priority("qa.priority")
    }

    pub fn emoji_priority(&self) -> Result<i32> {
        self.priority("emoji.priority")
    }

    pub fn emoji_palette(&self) -> Result<Vec<String>> {
        let path = "emoji.palette";
        let Some(items) = self.get(path).and_then(Value::as_array) else {
            return Err(invalid(path, "expected an array of strings"));
        };
        let palette: Vec<String> = items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if palette.is_empty() {
            return Err(invalid(path, "palette must not be empty"));
        }
        Ok(palette)
    }

    pub fn emoji_style(&self) -> Result<EmojiStyle> {
        let defaults = EmojiStyle::default();
        let radius = self
            .get_f64("emoji.renderer.radius")
            .unwrap_or(defaults.radius);
        if !radius.is_finite() || radius < 0.0 {
            return Err(invalid("emoji.renderer.radius", "must be a non-negative number"));
        }
        Ok(EmojiStyle {
            priority: self
                .get_i32("emoji.renderer.priority")
                .unwrap_or(defaults.priority),
            radius,
            fill: self
                .get_str("emoji.renderer.fill")
                .map(str::to_string)
                .unwrap_or(defaults.fill),
            stroke: self
                .get_str("emoji.renderer.stroke")
                .map(str::to_string)
                .unwrap_or(defaults.stroke),
            stroke_width: self
                .get_f64("emoji.renderer.strokeWidth")
                .unwrap_or(defaults.stroke_width),
            label_x: self
                .get_f64("emoji.renderer.label.x")
                .unwrap_or(defaults.label_x),
            label_y: self
                .get_f64("emoji.renderer.label.y")
                .unwrap_or(defaults.label_y),
        })
    }

    pub fn timestamp_precision(&self) -> SecondsFormat {
        crate::clock::precision_from_name(self.get_str("clock.precision").unwrap_or("millis"))
    }

    fn priority(&self, path: &str) -> Result<i32> {
        self.get_i32(path)
            .ok_or_else(|| invalid(path, "expected an integer priority"))
    }
}

fn invalid(path: &str, message: &str) -> Error {
    Error::Config {
        path: path.to_string(),
        message: message.to_string(),
    }
}

fn merge_overrides(base: &mut Value, overrides: &Value) {
    match (base, overrides) {
        (_, Value::Null) => {}
        (Value::Object(base), Value::Object(entries)) => {
            for (key, value) in entries {
                match base.get_mut(key) {
                    Some(slot) => merge_overrides(slot, value),
                    None if value.is_null() => {}
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}
