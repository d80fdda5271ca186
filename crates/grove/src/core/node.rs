use std::rc::Rc;

use crate::{
    core::{id::NodeId, theme::Theme, windows::WindowState},
    geom::{Expanse, Point, Rect},
    layout::Layout,
    widget::Widget,
};

/// Mouse cursor shapes a widget may request while hovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
    /// Standard arrow.
    #[default]
    Arrow,
    /// Text insertion beam.
    IBeam,
    /// Crosshair.
    Crosshair,
    /// Pointing hand.
    Hand,
    /// Horizontal resize.
    HResize,
    /// Vertical resize.
    VResize,
}

/// Core node data stored in the arena.
pub struct Node {
    /// Widget behavior. Empty while the widget is executing a hook.
    pub(crate) widget: Option<Box<dyn Widget>>,
    /// Widget name, cached at creation.
    pub(crate) name: String,
    /// Stable integer identity.
    pub(crate) serial: u64,

    /// Parent in the arena tree. Never owning.
    pub(crate) parent: Option<NodeId>,
    /// Owned children in paint order; index 0 paints first.
    pub(crate) children: Vec<NodeId>,
    /// Whether the finishing step has run.
    pub(crate) associated: bool,

    /// Position relative to the parent's origin.
    pub(crate) position: Point,
    /// Current size.
    pub(crate) size: Expanse,
    /// Per-axis size override; zero means "not overridden".
    pub(crate) fixed_size: Expanse,

    /// Visibility flag.
    pub(crate) visible: bool,
    /// Enabled flag.
    pub(crate) enabled: bool,
    /// Focus flag.
    pub(crate) focused: bool,
    /// Hover flag.
    pub(crate) hovered: bool,

    /// Font size override.
    pub(crate) font_size: Option<u32>,
    /// Requested cursor.
    pub(crate) cursor: Cursor,
    /// Tooltip text.
    pub(crate) tooltip: String,

    /// Optional layout delegate, possibly shared with other nodes.
    pub(crate) layout: Option<Rc<dyn Layout>>,
    /// Shared theme.
    pub(crate) theme: Rc<Theme>,

    /// Surface capability: set only on the arena root.
    pub(crate) surface: bool,
    /// Window capability.
    pub(crate) window: Option<Box<WindowState>>,
    /// For window affordances: the window that positions, draws and
    /// hit-tests this node. Affordances hold a parent back-reference to that
    /// window but are deliberately absent from its child sequence.
    pub(crate) affordance_of: Option<NodeId>,
}

impl Node {
    /// Build node data with default geometry and flags.
    pub(crate) fn new(
        widget: Box<dyn Widget>,
        serial: u64,
        parent: Option<NodeId>,
        theme: Rc<Theme>,
    ) -> Self {
        let name = widget.name();
        Self {
            widget: Some(widget),
            name,
            serial,
            parent,
            children: Vec::new(),
            associated: false,
            position: Point::zero(),
            size: Expanse::default(),
            fixed_size: Expanse::default(),
            visible: true,
            enabled: true,
            focused: false,
            hovered: false,
            font_size: None,
            cursor: Cursor::Arrow,
            tooltip: String::new(),
            layout: None,
            theme,
            surface: false,
            window: None,
            affordance_of: None,
        }
    }

    /// Is the widget executing a hook right now?
    pub(crate) fn in_use(&self) -> bool {
        self.widget.is_none()
    }

    /// Return the widget name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the stable integer identity assigned at construction.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Return the node's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Return the node's children in paint order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Return the number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Has the finishing step run?
    pub fn associated(&self) -> bool {
        self.associated
    }

    /// Position relative to the parent.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Set the position relative to the parent.
    pub fn set_position(&mut self, position: impl Into<Point>) {
        self.position = position.into();
    }

    /// Shift the position by an offset.
    pub fn translate(&mut self, rel: Point) {
        self.position += rel;
    }

    /// Current size.
    pub fn size(&self) -> Expanse {
        self.size
    }

    /// Set the current size.
    pub fn set_size(&mut self, size: impl Into<Expanse>) {
        self.size = size.into();
    }

    /// Width.
    pub fn width(&self) -> u32 {
        self.size.w
    }

    /// Height.
    pub fn height(&self) -> u32 {
        self.size.h
    }

    /// Fixed size override. A zero component is not overridden.
    pub fn fixed_size(&self) -> Expanse {
        self.fixed_size
    }

    /// Set the fixed size override.
    ///
    /// This does not change the size by itself; the parent's next layout
    /// pass applies it.
    pub fn set_fixed_size(&mut self, fixed: impl Into<Expanse>) {
        self.fixed_size = fixed.into();
    }

    /// Bounds relative to the parent.
    pub fn rect(&self) -> Rect {
        Rect::at(self.position, self.size)
    }

    /// Half-open test of a point in the parent's coordinates against this
    /// node's bounds.
    pub fn contains(&self, p: Point) -> bool {
        self.rect().contains_point(p)
    }

    /// Own visibility flag.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Set the own visibility flag.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Enabled flag.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Set the enabled flag.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Focus flag.
    pub fn focused(&self) -> bool {
        self.focused
    }

    /// Hover flag.
    pub fn hovered(&self) -> bool {
        self.hovered
    }

    /// Effective font size: the override, or the theme's standard size.
    pub fn font_size(&self) -> u32 {
        self.font_size.unwrap_or(self.theme.standard_font_size)
    }

    /// The font size override, if any.
    pub fn font_size_override(&self) -> Option<u32> {
        self.font_size
    }

    /// Set or clear the font size override.
    pub fn set_font_size(&mut self, size: Option<u32>) {
        self.font_size = size;
    }

    /// Requested cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Set the requested cursor.
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    /// Tooltip text.
    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    /// Set the tooltip text.
    pub fn set_tooltip(&mut self, tooltip: impl Into<String>) {
        self.tooltip = tooltip.into();
    }

    /// Attached layout delegate.
    pub fn layout(&self) -> Option<Rc<dyn Layout>> {
        self.layout.clone()
    }

    /// Attach or remove a layout delegate.
    pub fn set_layout(&mut self, layout: Option<Rc<dyn Layout>>) {
        self.layout = layout;
    }

    /// Shared theme.
    pub fn theme(&self) -> Rc<Theme> {
        Rc::clone(&self.theme)
    }

    /// Replace the theme reference.
    pub fn set_theme(&mut self, theme: Rc<Theme>) {
        self.theme = theme;
    }

    /// Does this node carry the root-surface capability?
    pub fn is_surface(&self) -> bool {
        self.surface
    }

    /// Does this node carry the window capability?
    pub fn is_window(&self) -> bool {
        self.window.is_some()
    }

    /// Does this node carry the popup capability?
    pub fn is_popup(&self) -> bool {
        self.window.as_ref().is_some_and(|w| w.popup.is_some())
    }

    /// Window state, if this node is a window.
    pub fn window_state(&self) -> Option<&WindowState> {
        self.window.as_deref()
    }

    /// Mutable window state, if this node is a window.
    pub fn window_state_mut(&mut self) -> Option<&mut WindowState> {
        self.window.as_deref_mut()
    }

    /// The window this node is an affordance of, if any.
    pub fn affordance_of(&self) -> Option<NodeId> {
        self.affordance_of
    }
}
