//! Integration tests for tree ownership, positions and hit-testing.

#[cfg(test)]
mod tests {
    use grove::{
        Core, NodeId,
        error::Result,
        geom::{Expanse, Point},
        theme::Theme,
        widgets::Panel,
    };
    use proptest::prelude::*;

    fn core() -> Core {
        Core::new(Expanse::new(400, 400), Theme::default())
    }

    /// How many child sequences list `id`.
    fn owners(core: &Core, all: &[NodeId], id: NodeId) -> Result<usize> {
        let mut n = 0;
        for p in all {
            n += core.children(*p)?.iter().filter(|c| **c == id).count();
        }
        Ok(n)
    }

    proptest! {
        #[test]
        fn each_node_has_at_most_one_owner(
            ops in prop::collection::vec((any::<bool>(), 0usize..7, 1usize..7), 0..60)
        ) {
            let mut core = core();
            let mut all = vec![core.root_id()];
            for _ in 0..6 {
                all.push(core.create_detached(Panel::new())?);
            }

            for (attach, a, b) in ops {
                let (parent, child) = (all[a], all[b]);
                if attach {
                    if core.attach(parent, child).is_err() {
                        prop_assert!(a == b || core.is_attached(child) || core.is_ancestor(child, parent));
                    }
                } else {
                    core.detach(child)?;
                }

                for id in &all[1..] {
                    let n = owners(&core, &all, *id)?;
                    prop_assert!(n <= 1);
                    prop_assert_eq!(n == 1, core.is_attached(*id));
                    if n == 1 {
                        let parent = core.parent(*id)?;
                        prop_assert!(parent.is_some_and(|p| core.children(p).is_ok_and(|c| c.contains(id))));
                    }
                }
            }
        }

        #[test]
        fn absolute_position_sums_the_chain(
            positions in prop::collection::vec((-500i32..500, -500i32..500), 1..8),
            moved in 0usize..8,
            dx in -100i32..100,
            dy in -100i32..100,
        ) {
            let mut core = core();
            let mut chain = Vec::new();
            let mut parent = core.root_id();
            for (x, y) in &positions {
                let id = core.make(parent, Panel::new())?;
                core.get_mut(id)?.set_position((*x, *y));
                chain.push(id);
                parent = id;
            }
            let leaf = parent;

            let sum = |core: &Core| -> Result<Point> {
                let mut total = Point::zero();
                for id in &chain {
                    total += core.get(*id)?.position();
                }
                Ok(total)
            };
            prop_assert_eq!(core.absolute_position(leaf)?, sum(&core)?);

            let ancestor = chain[moved % chain.len()];
            core.get_mut(ancestor)?.translate(Point::new(dx, dy));
            prop_assert_eq!(core.absolute_position(leaf)?, sum(&core)?);
        }
    }

    #[test]
    fn topmost_sibling_wins_hit_test() -> Result<()> {
        let mut core = core();
        let root = core.root_id();
        let under = core.make(root, Panel::new())?;
        let over = core.make(root, Panel::new())?;
        core.get_mut(under)?.set_size((100, 100));
        core.get_mut(over)?.set_position((20, 20));
        core.get_mut(over)?.set_size((40, 40));
        let inner = core.make(over, Panel::new())?;
        core.get_mut(inner)?.set_size((10, 10));

        assert_eq!(core.find_widget(root, Point::new(30, 30))?, Some(over));
        assert_eq!(core.find_widget(root, Point::new(21, 21))?, Some(inner));
        assert_eq!(core.find_widget(root, Point::new(5, 5))?, Some(under));
        assert_eq!(core.find_widget(root, Point::new(399, 399))?, Some(root));
        assert_eq!(core.find_widget(root, Point::new(400, 5))?, None);

        core.get_mut(over)?.set_visible(false);
        assert_eq!(core.find_widget(root, Point::new(30, 30))?, Some(under));
        Ok(())
    }

    #[test]
    fn contains_is_half_open() -> Result<()> {
        let mut core = core();
        let root = core.root_id();
        let a = core.make(root, Panel::new())?;
        core.get_mut(a)?.set_position((10, 10));
        core.get_mut(a)?.set_size((5, 5));
        assert!(core.contains(a, Point::new(10, 10))?);
        assert!(core.contains(a, Point::new(14, 14))?);
        assert!(!core.contains(a, Point::new(15, 10))?);
        assert!(!core.contains(a, Point::new(10, 15))?);
        Ok(())
    }

    #[test]
    fn detached_subtree_keeps_its_shape() -> Result<()> {
        let mut core = core();
        let root = core.root_id();
        let a = core.make(root, Panel::new())?;
        let b = core.make(a, Panel::new())?;
        core.detach(a)?;
        assert!(core.is_alive(a));
        assert_eq!(core.children(a)?, &[b]);
        assert_eq!(core.root_of(b)?, a);
        core.attach(root, a)?;
        assert_eq!(core.root_of(b)?, root);
        Ok(())
    }
}
