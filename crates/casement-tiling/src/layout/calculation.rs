//! Layout calculation: pair split and recursive tree-to-rect computation.

use casement_common::{Rect, UnitSize, WindowKind};

use super::{LayoutEngine, PairBoxes, TreeLayout};
use crate::arrangement::{Arrangement, Orientation, Side, Sizing};
use crate::tree::WindowTree;
use crate::window::WindowId;

impl LayoutEngine {
    /// Divide `bounds` between a pair's children.
    ///
    /// `key_unit` is the native unit of the pair's key window, or `None`
    /// when the pair has no key, in which case the space is split evenly.
    /// `first` always receives the constrained box; `side` decides whether
    /// that box is the leading or trailing one.
    pub fn compute(
        &self,
        arrangement: &Arrangement,
        key_unit: Option<UnitSize>,
        bounds: Rect,
    ) -> PairBoxes {
        let horizontal = arrangement.orientation == Orientation::Horizontal;
        let extent = if horizontal { bounds.width } else { bounds.height };
        let border = if arrangement.bordered {
            f64::from(self.border_width).min(extent.max(0.0))
        } else {
            0.0
        };
        let available = (extent - border).max(0.0);

        let constrained = match key_unit {
            None => (available / 2.0).floor(),
            Some(unit) => match arrangement.sizing {
                Sizing::Fixed(n) => {
                    let unit = if horizontal { unit.width } else { unit.height };
                    f64::from(n) * unit
                }
                Sizing::Proportional(percent) => (available * f64::from(percent) / 100.0).floor(),
            },
        }
        .clamp(0.0, available);
        let rest = available - constrained;

        let (leading, trailing) = match arrangement.side {
            Side::Leading => (constrained, rest),
            Side::Trailing => (rest, constrained),
        };

        let (lead_box, gap, trail_box) = if horizontal {
            (
                Rect::new(bounds.x, bounds.y, leading, bounds.height),
                Rect::new(bounds.x + leading, bounds.y, border, bounds.height),
                Rect::new(bounds.x + leading + border, bounds.y, trailing, bounds.height),
            )
        } else {
            (
                Rect::new(bounds.x, bounds.y, bounds.width, leading),
                Rect::new(bounds.x, bounds.y + leading, bounds.width, border),
                Rect::new(bounds.x, bounds.y + leading + border, bounds.width, trailing),
            )
        };

        let (first, second) = match arrangement.side {
            Side::Leading => (lead_box, trail_box),
            Side::Trailing => (trail_box, lead_box),
        };
        PairBoxes {
            first,
            second,
            border: (border > 0.0).then_some(gap),
        }
    }

    /// Lay out every window reachable from the root of `tree` in one pass.
    ///
    /// The display lays pairs out one sync at a time; this whole-tree pass
    /// is the reference that incremental layout must agree with.
    ///
    /// `unit_of` maps a window kind to its native unit; pair keys measure
    /// in pixels.
    pub fn compute_tree<C>(
        &self,
        tree: &WindowTree<C>,
        bounds: Rect,
        unit_of: impl Fn(WindowKind) -> UnitSize,
    ) -> TreeLayout {
        let mut out = TreeLayout::default();
        if let Some(root) = tree.root() {
            self.layout_node(tree, root, bounds, &unit_of, &mut out);
        }
        out
    }

    fn layout_node<C>(
        &self,
        tree: &WindowTree<C>,
        id: WindowId,
        bounds: Rect,
        unit_of: &impl Fn(WindowKind) -> UnitSize,
        out: &mut TreeLayout,
    ) {
        out.windows.push((id, bounds));
        let Some(pair) = tree.pair(id) else {
            return;
        };
        let key_unit = pair.key.and_then(|key| tree.kind(key)).map(|kind| match kind {
            WindowKind::Pair => UnitSize::PIXEL,
            other => unit_of(other),
        });
        let boxes = self.compute(&pair.arrangement, key_unit, bounds);
        out.borders.extend(boxes.border);
        self.layout_node(tree, pair.first, boxes.first, unit_of, out);
        self.layout_node(tree, pair.second, boxes.second, unit_of, out);
    }
}
