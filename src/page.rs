//! Virtual landing page laid out behind the overlay: sections, the scroll
//! offset, and the scroll-bound triggers that read from it.

use glam::Vec2;

use crate::{
    config::PageConfig,
    tween::{Ease, Reveal},
};

const SECTION_PADDING: f32 = 80.0;
const FEATURES_HEADER: f32 = 120.0;
const CARD_HEIGHT: f32 = 240.0;
pub const CARD_GAP: f32 = 32.0;
pub const CARD_COLUMNS: usize = 3;
const CUSTOMIZER_HEIGHT: f32 = 420.0;
const FOOTER_HEIGHT: f32 = 160.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section {
    pub top: f32,
    pub height: f32,
}

impl Section {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Vertical page geometry in logical pixels, derived from the viewport.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub viewport: Vec2,
    pub hero: Section,
    pub features: Section,
    pub cards: Vec<Section>,
    pub customizer: Section,
    pub footer: Section,
}

impl PageLayout {
    pub fn new(viewport: Vec2, card_count: usize) -> Self {
        let hero = Section {
            top: 0.0,
            height: viewport.y.max(1.0),
        };

        let rows = card_count.div_ceil(CARD_COLUMNS);
        let cards_top = hero.bottom() + SECTION_PADDING + FEATURES_HEADER;
        let cards = (0..card_count)
            .map(|i| Section {
                top: cards_top + (i / CARD_COLUMNS) as f32 * (CARD_HEIGHT + CARD_GAP),
                height: CARD_HEIGHT,
            })
            .collect();

        let features = Section {
            top: hero.bottom(),
            height: SECTION_PADDING * 2.0
                + FEATURES_HEADER
                + rows as f32 * (CARD_HEIGHT + CARD_GAP),
        };
        let customizer = Section {
            top: features.bottom(),
            height: CUSTOMIZER_HEIGHT,
        };
        let footer = Section {
            top: customizer.bottom(),
            height: FOOTER_HEIGHT,
        };

        Self {
            viewport,
            hero,
            features,
            cards,
            customizer,
            footer,
        }
    }

    pub fn scroll_height(&self) -> f32 {
        self.footer.bottom()
    }

    pub fn max_scroll(&self) -> f32 {
        (self.scroll_height() - self.viewport.y).max(0.0)
    }
}

/// Progress through a scroll range bounded by two anchor positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTrigger {
    pub start: f32,
    pub end: f32,
}

impl ScrollTrigger {
    /// From "section top at viewport top" to "section bottom at viewport top".
    pub fn spanning(section: &Section) -> Self {
        Self {
            start: section.top,
            end: section.bottom(),
        }
    }

    pub fn progress(&self, scroll_top: f32) -> f32 {
        if self.end <= self.start {
            return if scroll_top >= self.end { 1.0 } else { 0.0 };
        }
        ((scroll_top - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }
}

/// Share of the whole document scrolled so far, in [0, 1].
pub fn document_progress(scroll_top: f32, layout: &PageLayout) -> f32 {
    let max_scroll = layout.max_scroll();
    if max_scroll <= 0.0 || !scroll_top.is_finite() {
        return 0.0;
    }
    (scroll_top / max_scroll).clamp(0.0, 1.0)
}

/// Plays a reveal once the element's top passes a line in the viewport, and
/// reverses it when the page is scrolled back above that point.
#[derive(Debug, Clone)]
pub struct EntranceTrigger {
    pub reveal: Reveal,
    activation_scroll: f32,
    is_past: bool,
}

impl EntranceTrigger {
    pub fn new(reveal: Reveal) -> Self {
        Self {
            reveal,
            activation_scroll: 0.0,
            is_past: false,
        }
    }

    fn place(&mut self, element_top: f32, viewport_height: f32, line: f32) {
        self.activation_scroll = element_top - viewport_height * line;
    }

    fn update(&mut self, scroll_top: f32, dt: f32) {
        let is_past = scroll_top >= self.activation_scroll;

        if is_past && !self.is_past {
            self.reveal.play();
        } else if !is_past && self.is_past {
            self.reveal.reverse();
        }

        self.is_past = is_past;
        self.reveal.tick(dt);
    }
}

pub struct Page {
    config: PageConfig,
    layout: PageLayout,
    scroll_top: f32,
    hero_trigger: ScrollTrigger,
    hero_intro: Reveal,
    cards: Vec<EntranceTrigger>,
}

impl Page {
    pub fn new(viewport: Vec2, config: PageConfig) -> Self {
        let layout = PageLayout::new(viewport, config.features.len());

        let cards = (0..config.features.len())
            .map(|i| {
                EntranceTrigger::new(Reveal::new(
                    i as f32 * config.card_stagger,
                    config.card_duration,
                    config.entrance_rise,
                    Ease::Power1Out,
                ))
            })
            .collect();

        let mut hero_intro = Reveal::new(
            0.0,
            config.hero_intro_duration,
            config.entrance_rise,
            Ease::Power3Out,
        );
        hero_intro.play();

        let mut page = Self {
            hero_trigger: ScrollTrigger::spanning(&layout.hero),
            config,
            layout,
            scroll_top: 0.0,
            hero_intro,
            cards,
        };
        page.place_triggers();
        page
    }

    fn place_triggers(&mut self) {
        self.hero_trigger = ScrollTrigger::spanning(&self.layout.hero);

        for (trigger, card) in self.cards.iter_mut().zip(&self.layout.cards) {
            trigger.place(card.top, self.layout.viewport.y, self.config.entrance_line);
        }
    }

    pub fn resize(&mut self, viewport: Vec2) {
        if !(viewport.x > 0.0 && viewport.y > 0.0) {
            return;
        }

        self.layout = PageLayout::new(viewport, self.cards.len());
        self.place_triggers();
        self.scroll_to(self.scroll_top);
    }

    pub fn scroll_to(&mut self, scroll_top: f32) {
        if scroll_top.is_finite() {
            self.scroll_top = scroll_top.clamp(0.0, self.layout.max_scroll());
        }
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_to(self.scroll_top + delta);
    }

    /// Scrolls by a number of wheel lines.
    pub fn scroll_lines(&mut self, lines: f32) {
        self.scroll_by(lines * self.config.wheel_line_height);
    }

    pub fn scroll_pages(&mut self, pages: f32) {
        self.scroll_by(pages * self.layout.viewport.y * 0.9);
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn hero_progress(&self) -> f32 {
        self.hero_trigger.progress(self.scroll_top)
    }

    pub fn document_progress(&self) -> f32 {
        document_progress(self.scroll_top, &self.layout)
    }

    pub fn hero_intro(&self) -> &Reveal {
        &self.hero_intro
    }

    pub fn card_reveal(&self, index: usize) -> Option<&Reveal> {
        self.cards.get(index).map(|trigger| &trigger.reveal)
    }

    pub fn tick(&mut self, dt: f32) {
        self.hero_intro.tick(dt);

        for card in &mut self.cards {
            card.update(self.scroll_top, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 800.0);

    fn page() -> Page {
        Page::new(VIEWPORT, PageConfig::default())
    }

    #[test]
    fn hero_trigger_spans_the_hero_section() {
        let mut page = page();
        assert_eq!(page.hero_progress(), 0.0);

        page.scroll_to(400.0);
        assert_relative_eq!(page.hero_progress(), 0.5);

        page.scroll_to(800.0);
        assert_eq!(page.hero_progress(), 1.0);

        page.scroll_to(1200.0);
        assert_eq!(page.hero_progress(), 1.0);
    }

    #[test]
    fn scrolling_is_clamped_to_the_document() {
        let mut page = page();
        page.scroll_by(-100.0);
        assert_eq!(page.scroll_top(), 0.0);

        page.scroll_by(1.0e6);
        assert_eq!(page.scroll_top(), page.layout().max_scroll());
        assert_eq!(page.document_progress(), 1.0);

        page.scroll_to(f32::NAN);
        assert_eq!(page.scroll_top(), page.layout().max_scroll());
    }

    #[test]
    fn document_progress_guards_short_pages() {
        let mut layout = PageLayout::new(VIEWPORT, 0);
        layout.viewport.y = layout.scroll_height() + 10.0;
        assert_eq!(layout.max_scroll(), 0.0);
        assert_eq!(document_progress(50.0, &layout), 0.0);
    }

    #[test]
    fn cards_share_a_row_and_reveal_staggered() {
        let mut page = page();
        let card_top = page.layout().cards[0].top;
        assert_eq!(page.layout().cards[2].top, card_top);

        // Just short of the 80% line nothing plays
        page.scroll_to(card_top - VIEWPORT.y * 0.8 - 1.0);
        page.tick(0.1);
        assert!(!page.card_reveal(0).unwrap().has_started());

        page.scroll_to(card_top - VIEWPORT.y * 0.8);
        page.tick(0.1);
        assert!(page.card_reveal(0).unwrap().has_started());
        assert!(!page.card_reveal(1).unwrap().has_started());

        // Card 1 waits 0.2s and card 2 0.4s after the crossing
        page.tick(0.15);
        assert!(page.card_reveal(1).unwrap().has_started());
        assert!(!page.card_reveal(2).unwrap().has_started());

        for _ in 0..120 {
            page.tick(1.0 / 60.0);
        }
        for i in 0..3 {
            let reveal = page.card_reveal(i).unwrap();
            assert_eq!(reveal.opacity(), 1.0);
            assert_eq!(reveal.offset(), 0.0);
        }
    }

    #[test]
    fn scrolling_back_reverses_cards() {
        let mut page = page();
        let card_top = page.layout().cards[0].top;

        page.scroll_to(card_top);
        page.tick(0.5);
        let shown = page.card_reveal(0).unwrap().opacity();
        assert!(shown > 0.0);

        page.scroll_to(0.0);
        page.tick(0.1);
        assert!(page.card_reveal(0).unwrap().opacity() < shown);

        page.tick(5.0);
        assert!(!page.card_reveal(0).unwrap().has_started());
    }

    #[test]
    fn resize_relayouts_and_keeps_scroll_in_range() {
        let mut page = page();
        page.scroll_by(1.0e6);

        page.resize(Vec2::new(1280.0, 1600.0));
        assert_eq!(page.layout().hero.height, 1600.0);
        assert!(page.scroll_top() <= page.layout().max_scroll());

        page.resize(Vec2::new(0.0, 0.0));
        assert_eq!(page.layout().hero.height, 1600.0);
    }

    #[test]
    fn hero_intro_plays_on_load() {
        let mut page = page();
        assert_eq!(page.hero_intro().opacity(), 0.0);
        page.tick(page.config().hero_intro_duration);
        assert_eq!(page.hero_intro().opacity(), 1.0);
    }
}
