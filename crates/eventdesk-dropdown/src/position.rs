//! Menu positioning
//!
//! Placement is expressed purely as inline style declarations: the
//! container becomes the containing block and the menu is absolutely
//! positioned against one of its edges.

use eventdesk_dom::{Document, NodeId};

use crate::Position;

/// Gap between trigger and menu
pub const MENU_OFFSET_PX: u32 = 8;

/// Stacking order of an open menu
pub const MENU_Z_INDEX: u32 = 1000;

/// Properties owned by the anchor; cleared before every re-apply
const ANCHOR_PROPERTIES: [&str; 6] = ["top", "bottom", "left", "right", "margin-top", "margin-bottom"];

/// Side of the container the menu appears on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Menu above the container (`bottom: 100%`)
    Above,
    /// Menu below the container (`top: 100%`)
    Below,
}

/// Which container edge the menu lines up with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    /// `left: 0`
    Start,
    /// `right: 0`
    End,
}

/// Computed placement of a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub anchor: Anchor,
    pub align: HorizontalAlign,
    pub offset_px: u32,
}

impl Placement {
    /// Inline declarations for the menu, excluding `position`/`z-index`
    pub fn declarations(&self) -> [(&'static str, String); 3] {
        let offset = format!("{}px", self.offset_px);
        let (edge, margin) = match self.anchor {
            Anchor::Above => ("bottom", "margin-bottom"),
            Anchor::Below => ("top", "margin-top"),
        };
        let side = match self.align {
            HorizontalAlign::Start => "left",
            HorizontalAlign::End => "right",
        };
        [
            (edge, "100%".to_string()),
            (side, "0".to_string()),
            (margin, offset),
        ]
    }
}

impl Position {
    pub fn placement(self) -> Placement {
        let (anchor, align) = match self {
            Self::TopStart => (Anchor::Above, HorizontalAlign::Start),
            Self::TopEnd => (Anchor::Above, HorizontalAlign::End),
            Self::BottomStart => (Anchor::Below, HorizontalAlign::Start),
            Self::BottomEnd => (Anchor::Below, HorizontalAlign::End),
        };
        Placement {
            anchor,
            align,
            offset_px: MENU_OFFSET_PX,
        }
    }
}

/// Write the layout styles for `position`; leaves `display` alone
pub(crate) fn apply(doc: &Document, container: NodeId, menu: NodeId, position: Position) {
    doc.set_style(container, "position", "relative");
    doc.set_style(menu, "position", "absolute");
    doc.set_style(menu, "z-index", &MENU_Z_INDEX.to_string());

    for property in ANCHOR_PROPERTIES {
        doc.set_style(menu, property, "");
    }
    for (property, value) in position.placement().declarations() {
        doc.set_style(menu, property, &value);
    }

    tracing::trace!("Positioned menu {:?} at {}", menu, position);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container_and_menu() -> (Document, NodeId, NodeId) {
        let doc = Document::default();
        let container = doc.create_element("div");
        let menu = doc.create_element("div");
        doc.append_child(doc.body(), container).unwrap();
        doc.append_child(container, menu).unwrap();
        (doc, container, menu)
    }

    #[test]
    fn test_placement_of_each_position() {
        assert_eq!(
            Position::TopEnd.placement(),
            Placement {
                anchor: Anchor::Above,
                align: HorizontalAlign::End,
                offset_px: 8
            }
        );
        assert_eq!(Position::BottomStart.placement().anchor, Anchor::Below);
    }

    #[test]
    fn test_top_start_declarations() {
        let (doc, container, menu) = container_and_menu();
        apply(&doc, container, menu, Position::TopStart);

        assert_eq!(doc.style_value(container, "position").as_deref(), Some("relative"));
        assert_eq!(
            doc.get_attribute(menu, "style").as_deref(),
            Some("position: absolute; z-index: 1000; bottom: 100%; left: 0; margin-bottom: 8px")
        );
    }

    #[test]
    fn test_reapply_replaces_anchor_and_keeps_display() {
        let (doc, container, menu) = container_and_menu();
        doc.set_style(menu, "display", "block");
        apply(&doc, container, menu, Position::TopStart);
        apply(&doc, container, menu, Position::BottomEnd);

        assert_eq!(doc.style_value(menu, "display").as_deref(), Some("block"));
        assert_eq!(doc.style_value(menu, "bottom"), None);
        assert_eq!(doc.style_value(menu, "left"), None);
        assert_eq!(doc.style_value(menu, "margin-bottom"), None);
        assert_eq!(doc.style_value(menu, "top").as_deref(), Some("100%"));
        assert_eq!(doc.style_value(menu, "right").as_deref(), Some("0"));
        assert_eq!(doc.style_value(menu, "margin-top").as_deref(), Some("8px"));
    }
}
