use serde::{Deserialize, Serialize};

/// Именованный набор правил нормализации значений операций
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizerPreset {
    /// "V" остаётся "V", текст передаётся как есть
    Passthrough,
    /// "V" → 1, любой другой текст → "V"
    Legacy,
    /// "V" → "1", текст передаётся как есть
    Web,
    /// Любое непустое значение → "V"
    StrictMarker,
}

impl NormalizerPreset {
    pub fn code(&self) -> &'static str {
        match self {
            NormalizerPreset::Passthrough => "passthrough",
            NormalizerPreset::Legacy => "legacy",
            NormalizerPreset::Web => "web",
            NormalizerPreset::StrictMarker => "strict_marker",
        }
    }

    pub fn all() -> Vec<NormalizerPreset> {
        vec![
            NormalizerPreset::Passthrough,
            NormalizerPreset::Legacy,
            NormalizerPreset::Web,
            NormalizerPreset::StrictMarker,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|p| p.code() == code)
    }
}

impl std::fmt::Display for NormalizerPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
