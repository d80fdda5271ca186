//! Integration tests for windows: z-order, disposal, rolling and centering.

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use grove::{
        FocusManager, NodeId, WindowManager,
        error::{Error, Result},
        event::mouse::Button,
        geom::{Expanse, Point},
        render::PaintOp,
        testing::{EventLog, Harness, Probe},
        widgets::{Panel, Popup, Window},
    };

    fn windows(h: &mut Harness, n: usize) -> Result<Vec<NodeId>> {
        let root = h.root();
        let mut out = Vec::new();
        for i in 0..n {
            let w = Window::make(h.core_mut(), root, format!("w{i}"))?;
            let node = h.core_mut().get_mut(w)?;
            node.set_position((i as i32 * 50, 0));
            node.set_size((100, 100));
            out.push(w);
        }
        Ok(out)
    }

    #[test]
    fn press_raises_window() -> Result<()> {
        let mut h = Harness::new((400, 400));
        let ws = windows(&mut h, 3)?;
        let root = h.root();
        h.layout()?;

        h.move_to((10, 50))?;
        h.press(Button::Left)?;
        assert_eq!(h.core().children(root)?, &[ws[1], ws[2], ws[0]]);
        assert_eq!(h.core().focused_leaf(), Some(ws[0]));
        Ok(())
    }

    #[test]
    fn raise_brings_owned_popups_along() -> Result<()> {
        let mut h = Harness::new((400, 400));
        let ws = windows(&mut h, 2)?;
        let root = h.root();
        let popup = Popup::make(h.core_mut(), root, ws[0])?;
        h.core_mut().move_window_to_front(ws[1])?;
        assert_eq!(h.core().children(root)?, &[ws[0], popup, ws[1]]);

        h.core_mut().move_window_to_front(ws[0])?;
        assert_eq!(h.core().children(root)?, &[ws[1], ws[0], popup]);
        Ok(())
    }

    #[test]
    fn dispose_cascades_through_nested_popups() -> Result<()> {
        let log = EventLog::new();
        let mut h = Harness::new((400, 400));
        let root = h.root();
        let w = Window::make(h.core_mut(), root, "w")?;
        let p1 = Popup::make(h.core_mut(), root, w)?;
        let p2 = Popup::make(h.core_mut(), root, p1)?;
        h.core_mut().make(p1, Probe::new("in_p1", &log))?;
        h.core_mut().make(p2, Probe::new("in_p2", &log))?;
        let before = h.core().len();

        h.core_mut().dispose(w)?;
        for id in [w, p1, p2] {
            assert!(!h.core().is_alive(id));
        }
        assert_eq!(log.count("in_p1@disposed"), 1);
        assert_eq!(log.count("in_p2@disposed"), 1);
        assert!(h.core().children(root)?.is_empty());
        // Each window carried two affordances and each popup one probe.
        assert_eq!(before - h.core().len(), 3 * 3 + 2);
        assert!(h.core().is_empty());
        Ok(())
    }

    #[test]
    fn dispose_cascades_into_popup_parented_by_popup() -> Result<()> {
        let log = EventLog::new();
        let mut h = Harness::new((400, 400));
        let root = h.root();
        let w = Window::make(h.core_mut(), root, "w")?;
        let p1 = Popup::make(h.core_mut(), root, w)?;
        let p2 = Popup::make(h.core_mut(), p1, p1)?;
        h.core_mut().make(p2, Probe::new("inner", &log))?;
        assert_eq!(h.core().children(p1)?, &[p2]);

        h.core_mut().dispose(w)?;
        for id in [w, p1, p2] {
            assert!(!h.core().is_alive(id));
        }
        assert_eq!(log.count("inner@disposed"), 1);
        assert!(h.core().children(root)?.is_empty());
        assert!(h.core().is_empty());
        Ok(())
    }

    #[test]
    fn popup_inside_window_disposes_with_its_own_popups() -> Result<()> {
        let mut h = Harness::new((400, 400));
        let root = h.root();
        let w = Window::make(h.core_mut(), root, "w")?;
        let p1 = Popup::make(h.core_mut(), w, w)?;
        let p2 = Popup::make(h.core_mut(), p1, p1)?;

        h.core_mut().dispose(p1)?;
        assert!(!h.core().is_alive(p1));
        assert!(!h.core().is_alive(p2));
        assert!(h.core().is_alive(w));
        assert!(h.core().children(w)?.is_empty());
        assert!(h.core().owned_windows(w)?.is_empty());
        Ok(())
    }

    #[test]
    fn detached_window_is_not_disposed() -> Result<()> {
        let mut h = Harness::new((400, 400));
        let root = h.root();
        let w = Window::make(h.core_mut(), root, "w")?;
        let p = Popup::make(h.core_mut(), root, w)?;
        h.core_mut().detach(w)?;

        assert_eq!(h.core_mut().dispose(w), Err(Error::NoSurface(w)));
        assert!(h.core().is_alive(p));
        assert_eq!(h.core().owned_windows(w)?, &[p]);
        Ok(())
    }

    #[test]
    fn disposing_focused_window_clears_focus_and_drag() -> Result<()> {
        let mut h = Harness::new((400, 400));
        let ws = windows(&mut h, 1)?;
        h.layout()?;
        h.move_to((50, 50))?;
        h.press(Button::Left)?;
        assert_eq!(h.screen.drag_target(), Some(ws[0]));
        assert!(h.core().is_on_focus_path(ws[0]));

        h.screen.dispose_window(ws[0])?;
        assert!(h.core().focus_path().is_empty());
        assert_eq!(h.screen.drag_target(), None);
        h.move_to((60, 60))?;
        h.release(Button::Left)?;
        Ok(())
    }

    #[test]
    fn close_can_be_vetoed() -> Result<()> {
        let mut h = Harness::new((400, 400));
        let ws = windows(&mut h, 1)?;
        let asked = Rc::new(Cell::new(0));
        let a = Rc::clone(&asked);
        h.core_mut().window_mut(ws[0])?.set_close_callback(move |_, _| {
            a.set(a.get() + 1);
            Ok(a.get() > 1)
        });

        assert!(!h.core_mut().request_close(ws[0])?);
        assert!(h.core().is_alive(ws[0]));
        assert!(h.core_mut().request_close(ws[0])?);
        assert!(!h.core().is_alive(ws[0]));
        assert_eq!(asked.get(), 2);
        Ok(())
    }

    #[test]
    fn rolled_window_draws_header_only() -> Result<()> {
        let log = EventLog::new();
        let mut h = Harness::new((400, 400));
        let ws = windows(&mut h, 1)?;
        h.core_mut().make(ws[0], Probe::new("body", &log))?;

        h.draw()?;
        assert_eq!(log.count("body@draw"), 1);
        let full = h.renderer.ops().len();

        h.core_mut().set_rolled(ws[0], true)?;
        h.draw()?;
        assert_eq!(log.count("body@draw"), 1);
        assert!(h.renderer.ops().len() < full);
        assert_eq!(h.renderer.depth(), 0);

        h.core_mut().window_mut(ws[0])?.rollable = false;
        h.draw()?;
        assert_eq!(log.count("body@draw"), 2);
        Ok(())
    }

    #[test]
    fn roll_button_rolls_window() -> Result<()> {
        let mut h = Harness::new((400, 400));
        let ws = windows(&mut h, 1)?;
        h.layout()?;
        let roll = h
            .core()
            .window(ws[0])?
            .roll_button()
            .ok_or(Error::NotAWindow(ws[0]))?;
        // Roll sits left of close: 100 - 4 - 22 - 2 - 22.
        assert_eq!(h.core().absolute_position(roll)?, Point::new(50, 4));
        let at = Point::new(52, 6);

        h.click(at)?;
        assert!(h.core().window(ws[0])?.rolled());
        h.click(at)?;
        assert!(!h.core().window(ws[0])?.rolled());
        Ok(())
    }

    #[test]
    fn center_sizes_and_positions() -> Result<()> {
        let mut h = Harness::new((400, 300));
        let root = h.root();
        let w = Window::make(h.core_mut(), root, "ab")?;
        let body = h.core_mut().make(w, Panel::new())?;
        h.core_mut().get_mut(body)?.set_size((60, 40));

        h.screen.center_window(w, &mut h.renderer)?;
        let node = h.core().get(w)?;
        // Title "ab" at 18px is 18 wide; plus two 22px affordances and 6.
        assert_eq!(node.size(), Expanse::new(68, 18));
        assert_eq!(node.position(), Point::new(166, 141));
        Ok(())
    }

    #[test]
    fn draw_is_balanced() -> Result<()> {
        let mut h = Harness::new((400, 400));
        let ws = windows(&mut h, 2)?;
        let root = h.root();
        Popup::make(h.core_mut(), root, ws[0])?;
        h.layout()?;
        h.draw()?;
        assert_eq!(h.renderer.depth(), 0);
        assert_eq!(h.renderer.translation(), Point::zero());
        assert!(h.renderer.count(|op| matches!(op, PaintOp::Text(..))) > 0);
        Ok(())
    }
}
