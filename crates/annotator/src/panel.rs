/// Observable state of an annotation panel, as a view layer would render it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelView {
    pub visible: bool,
    /// Text of the editable field.
    pub field: String,
    /// Read-only secondary line (the last-checked timestamp for scores).
    pub detail: String,
    pub warning_visible: bool,
    pub submit_enabled: bool,
    /// Message shown once after an aborted submit.
    pub notice: Option<String>,
    /// Whether the panel's field has keyboard focus.
    pub focused: bool,
}

impl PanelView {
    pub fn hidden() -> Self {
        Self::default()
    }
}
