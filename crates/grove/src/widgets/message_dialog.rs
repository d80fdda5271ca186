use std::{cell::RefCell, rc::Rc};

use crate::{
    Context, Core, FocusManager, NodeId, WindowManager, WindowState,
    error::Result,
    event::{
        ScrollDelta,
        key::Mods,
        mouse::{Button as MouseButton, Buttons},
    },
    geom::{Expanse, Point},
    layout::{Alignment, BoxLayout, Orientation},
    render::Renderer,
    widget::{EventOutcome, Widget},
    widgets::{Button, Label, LabelFont, Panel, Window},
};

/// Glyph on the confirming button.
pub const ICON_CONFIRM: char = '\u{f00c}';
/// Glyph on the alternative button.
pub const ICON_CANCEL: char = '\u{f057}';

/// Font size of the icon beside the message.
const ICON_SIZE: u32 = 50;
/// Width of the message text.
const MESSAGE_WIDTH: u32 = 200;

/// Runs with the index of the chosen button: 0 for the confirming button,
/// 1 for the alternative.
pub type ChoiceCallback = Box<dyn FnMut(&mut Core, usize) -> Result<()>>;

/// What a dialog is about. Selects the icon beside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogKind {
    /// A plain notice.
    #[default]
    Information,
    /// A question for the user.
    Question,
    /// A warning.
    Warning,
}

impl DialogKind {
    /// Icon glyph for this kind.
    pub fn icon(self) -> char {
        match self {
            Self::Information => '\u{f05a}',
            Self::Question => '\u{f059}',
            Self::Warning => '\u{f071}',
        }
    }
}

/// A modal window showing a message and one or two buttons.
///
/// Either button reports its index to the choice handler and then disposes
/// the dialog.
pub struct MessageDialog {
    /// Window behavior shared with top-level windows.
    window: Window,
    /// Icon selection.
    kind: DialogKind,
    /// Message text.
    message: String,
    /// Caption of the confirming button.
    button: String,
    /// Caption of the alternative button, if shown.
    alt_button: Option<String>,
    /// Choice handler, shared with the buttons.
    callback: Rc<RefCell<Option<ChoiceCallback>>>,
}

impl MessageDialog {
    /// A dialog with a single "OK" button.
    pub fn new(kind: DialogKind, message: impl Into<String>) -> Self {
        Self {
            window: Window::new(),
            kind,
            message: message.into(),
            button: "OK".into(),
            alt_button: None,
            callback: Rc::new(RefCell::new(None)),
        }
    }

    /// Set the caption of the confirming button.
    pub fn with_button(mut self, caption: impl Into<String>) -> Self {
        self.button = caption.into();
        self
    }

    /// Show an alternative button with this caption.
    pub fn with_alt_button(mut self, caption: impl Into<String>) -> Self {
        self.alt_button = Some(caption.into());
        self
    }

    /// Set the choice handler.
    pub fn on_choice(self, f: impl FnMut(&mut Core, usize) -> Result<()> + 'static) -> Self {
        *self.callback.borrow_mut() = Some(Box::new(f));
        self
    }

    /// Icon selection.
    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    /// Put the dialog under `parent`, size and center it on its surface, and
    /// give it focus. The dialog is modal and can be neither closed from its
    /// header nor rolled.
    pub fn open(
        self,
        core: &mut Core,
        parent: NodeId,
        title: impl Into<String>,
        r: &mut dyn Renderer,
    ) -> Result<NodeId> {
        let id = core.create(parent, self)?;
        let mut state = WindowState::new(title);
        state.modal = true;
        state.closeable = false;
        state.rollable = false;
        core.get_mut(id)?.window = Some(Box::new(state));
        core.associate(id)?;
        core.center(id, r)?;
        core.request_focus(id)?;
        tracing::debug!("opened message dialog {id:?}");
        Ok(id)
    }

    /// A button that reports `choice` and disposes `dialog`.
    fn choice_button(&self, caption: &str, icon: char, dialog: NodeId, choice: usize) -> Button {
        let callback = Rc::clone(&self.callback);
        Button::new(caption).with_icon(icon).on_click(move |core| {
            if let Some(cb) = callback.borrow_mut().as_mut() {
                cb(core, choice)?;
            }
            core.dispose(dialog)
        })
    }
}

impl Widget for MessageDialog {
    fn on_associate(&mut self, ctx: &mut Context) -> Result<()> {
        Window::build_affordances(ctx)?;
        let id = ctx.id();
        let core = ctx.core();
        let column = BoxLayout::new(Orientation::Vertical, Alignment::Middle)
            .with_margin(10)
            .with_spacing(10);
        core.get_mut(id)?.set_layout(Some(Rc::new(column)));

        let body = core.make(id, Panel::new())?;
        let row = BoxLayout::new(Orientation::Horizontal, Alignment::Middle)
            .with_margin(10)
            .with_spacing(15);
        core.get_mut(body)?.set_layout(Some(Rc::new(row)));
        let icon = core.make(
            body,
            Label::new(self.kind.icon().to_string()).with_font(LabelFont::Icons),
        )?;
        core.get_mut(icon)?.set_font_size(Some(ICON_SIZE));
        let message = core.make(body, Label::new(self.message.clone()))?;
        core.get_mut(message)?.set_fixed_size((MESSAGE_WIDTH, 0));

        let buttons = core.make(id, Panel::new())?;
        let row = BoxLayout::new(Orientation::Horizontal, Alignment::Middle).with_spacing(15);
        core.get_mut(buttons)?.set_layout(Some(Rc::new(row)));
        if let Some(alt) = &self.alt_button {
            core.make(buttons, self.choice_button(alt, ICON_CANCEL, id, 1))?;
        }
        core.make(buttons, self.choice_button(&self.button, ICON_CONFIRM, id, 0))?;
        Ok(())
    }

    fn preferred_size(&self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<Expanse> {
        self.window.preferred_size(ctx, r)
    }

    fn perform_layout(&mut self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        self.window.perform_layout(ctx, r)
    }

    fn draw(&mut self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        self.window.draw(ctx, r)
    }

    fn mouse_button_event(
        &mut self,
        ctx: &mut Context,
        p: Point,
        button: MouseButton,
        down: bool,
        mods: Mods,
    ) -> Result<EventOutcome> {
        self.window.mouse_button_event(ctx, p, button, down, mods)
    }

    fn mouse_drag_event(
        &mut self,
        ctx: &mut Context,
        p: Point,
        rel: Point,
        buttons: Buttons,
        mods: Mods,
    ) -> Result<EventOutcome> {
        self.window.mouse_drag_event(ctx, p, rel, buttons, mods)
    }

    fn scroll_event(&mut self, ctx: &mut Context, p: Point, delta: ScrollDelta) -> Result<EventOutcome> {
        self.window.scroll_event(ctx, p, delta)
    }

    fn name(&self) -> String {
        "message_dialog".into()
    }
}
