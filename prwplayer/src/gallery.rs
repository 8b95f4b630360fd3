//! Gallery lightbox session
//!
//! The gallery page shows a grid of images and a full-screen viewer over it.
//! As with the player, the session only decides; the UI feeds it clicks, key
//! presses and touch gestures and renders the grid and viewer from the state.

use serde::Deserialize;

/// Minimum horizontal travel, in pixels, for a touch gesture to count as a
/// swipe
pub const SWIPE_MIN: f64 = 40.0;

/// One entry of the gallery grid, as served by `/api/gallery`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GalleryItem {
    pub id: String,
    pub name: String,
    /// Delivery URL; placeholders have none
    #[serde(default)]
    pub url: Option<String>,
}

/// Keys the viewer reacts to; everything else is left to the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKey {
    Escape,
    Left,
    Right,
}

/// State machine behind the gallery page
#[derive(Debug, Clone, Default)]
pub struct GallerySession {
    items: Vec<GalleryItem>,
    viewer: Option<usize>,
}

impl GallerySession {
    pub fn new(items: Vec<GalleryItem>) -> Self {
        Self {
            items,
            viewer: None,
        }
    }

    /// Grid shown while the listing is unavailable: numbered frames, no URLs
    pub fn from_placeholders(count: usize) -> Self {
        Self::new(
            (1..=count)
                .map(|n| GalleryItem {
                    id: format!("placeholder-{n}"),
                    name: format!("Photo {n}"),
                    url: None,
                })
                .collect(),
        )
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    /// Index shown in the viewer, when it is open
    pub fn viewer(&self) -> Option<usize> {
        self.viewer
    }

    pub fn current_item(&self) -> Option<&GalleryItem> {
        self.viewer.and_then(|i| self.items.get(i))
    }

    /// Open the viewer on the indexed item; out-of-range indices are ignored
    pub fn open(&mut self, index: usize) {
        if index < self.items.len() {
            self.viewer = Some(index);
        }
    }

    pub fn close(&mut self) {
        self.viewer = None;
    }

    /// Show the next item, wrapping past the end
    pub fn next(&mut self) {
        self.step(1);
    }

    /// Show the previous item, wrapping before the start
    pub fn previous(&mut self) {
        self.step(-1);
    }

    /// Keyboard handling; inert while the viewer is closed
    pub fn key(&mut self, key: ViewerKey) {
        if self.viewer.is_none() {
            return;
        }
        match key {
            ViewerKey::Escape => self.close(),
            ViewerKey::Left => self.previous(),
            ViewerKey::Right => self.next(),
        }
    }

    /// Touch gesture handling from the total travel of one touch
    ///
    /// Only a decisively horizontal move navigates: the travel must exceed
    /// [`SWIPE_MIN`] and dominate the vertical component, so that vertical
    /// scrolling over the viewer never flips images. Swiping left (negative
    /// delta) advances.
    pub fn swipe(&mut self, dx: f64, dy: f64) {
        if dx.abs() > SWIPE_MIN && dx.abs() > dy.abs() {
            if dx < 0.0 {
                self.next();
            } else {
                self.previous();
            }
        }
    }

    fn step(&mut self, direction: isize) {
        if let Some(index) = self.viewer {
            let len = self.items.len();
            if len == 0 {
                return;
            }
            let next = (index as isize + direction).rem_euclid(len as isize) as usize;
            self.viewer = Some(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(n: usize) -> GallerySession {
        GallerySession::new(
            (0..n)
                .map(|i| GalleryItem {
                    id: format!("g{i}"),
                    name: format!("g{i}.jpg"),
                    url: Some(format!("https://res.example/g{i}.jpg")),
                })
                .collect(),
        )
    }

    #[test]
    fn viewer_opens_in_range_only() {
        let mut gallery = session(3);
        gallery.open(5);
        assert_eq!(gallery.viewer(), None);

        gallery.open(2);
        assert_eq!(gallery.viewer(), Some(2));
        assert_eq!(gallery.current_item().map(|i| i.id.as_str()), Some("g2"));

        gallery.close();
        assert_eq!(gallery.viewer(), None);
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let mut gallery = session(3);
        gallery.open(2);

        gallery.next();
        assert_eq!(gallery.viewer(), Some(0));

        gallery.previous();
        assert_eq!(gallery.viewer(), Some(2));
    }

    #[test]
    fn navigation_with_viewer_closed_is_inert() {
        let mut gallery = session(3);
        gallery.next();
        gallery.previous();
        assert_eq!(gallery.viewer(), None);
    }

    #[test]
    fn keys_only_act_while_the_viewer_is_open() {
        let mut gallery = session(2);
        gallery.key(ViewerKey::Right);
        assert_eq!(gallery.viewer(), None);

        gallery.open(0);
        gallery.key(ViewerKey::Right);
        assert_eq!(gallery.viewer(), Some(1));
        gallery.key(ViewerKey::Left);
        assert_eq!(gallery.viewer(), Some(0));
        gallery.key(ViewerKey::Escape);
        assert_eq!(gallery.viewer(), None);
    }

    #[test]
    fn swipe_needs_horizontal_dominance() {
        let mut gallery = session(3);
        gallery.open(0);

        // Too short
        gallery.swipe(-30.0, 0.0);
        assert_eq!(gallery.viewer(), Some(0));

        // Mostly vertical: that is a scroll, not a swipe
        gallery.swipe(-50.0, 80.0);
        assert_eq!(gallery.viewer(), Some(0));

        gallery.swipe(-50.0, 10.0);
        assert_eq!(gallery.viewer(), Some(1));

        gallery.swipe(50.0, -10.0);
        assert_eq!(gallery.viewer(), Some(0));
    }

    #[test]
    fn placeholders_are_numbered_and_unlinked() {
        let gallery = GallerySession::from_placeholders(2);
        assert_eq!(gallery.items().len(), 2);
        assert_eq!(gallery.items()[0].name, "Photo 1");
        assert_eq!(gallery.items()[1].id, "placeholder-2");
        assert!(gallery.items()[0].url.is_none());
    }

    #[test]
    fn items_deserialize_from_the_listing_payload() {
        let payload = r#"[
            {"id": "gallery/a", "name": "gallery/a.jpg",
             "url": "https://res.example/a.jpg"},
            {"id": "gallery/b", "name": "gallery/b.webp"}
        ]"#;
        let items: Vec<GalleryItem> = serde_json::from_str(payload).unwrap();

        assert_eq!(items[0].url.as_deref(), Some("https://res.example/a.jpg"));
        assert_eq!(items[1].url, None);
    }

    #[test]
    fn empty_gallery_never_panics() {
        let mut gallery = GallerySession::new(Vec::new());
        gallery.open(0);
        gallery.next();
        gallery.swipe(-100.0, 0.0);
        assert_eq!(gallery.viewer(), None);
    }
}
