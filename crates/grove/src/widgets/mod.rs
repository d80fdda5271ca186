//! Built-in widgets: windows, popups, and the controls they need.
/// Push button widget.
pub mod button;
/// Static text widget.
pub mod label;
/// Modal message dialog.
pub mod message_dialog;
/// Plain container widget.
pub mod panel;
/// Anchored popup window.
pub mod popup;
/// Button that opens a popup.
pub mod popup_button;
/// Vertically scrolling container.
pub mod vscroll_panel;
/// Top-level window widget.
pub mod window;
pub use button::{Button, ButtonKind};
pub use label::{Label, LabelFont};
pub use message_dialog::{DialogKind, MessageDialog};
pub use panel::Panel;
pub use popup::Popup;
pub use popup_button::PopupButton;
pub use vscroll_panel::VScrollPanel;
pub use window::Window;
