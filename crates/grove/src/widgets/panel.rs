use crate::widget::Widget;

/// A container with the default node behavior and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct Panel;

impl Panel {
    /// Construct a panel.
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Panel {}
