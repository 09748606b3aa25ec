//! The landing page itself, drawn with imgui over the 3D view.
//!
//! Every section lives at a fixed position in page space. Drawing subtracts
//! the scroll offset and skips whatever is outside the display. Widgets never
//! touch the showcase directly: interactions come back as
//! [`ShowcaseAction`]s for the caller to apply.

use glam::Vec2;
use imgui::{Condition, StyleVar, Ui, WindowFlags};

use crate::{
    page::{Section, CARD_COLUMNS, CARD_GAP},
    showcase::{ShowcaseAction, ShowcaseState},
};

const PAGE_MARGIN: f32 = 80.0;
const PROGRESS_BAR_HEIGHT: f32 = 4.0;
const CTA_SIZE: [f32; 2] = [180.0, 44.0];
const SWATCH_SIZE: [f32; 2] = [28.0, 28.0];

const GRADIENT_START: [f32; 4] = [0.416, 0.067, 0.796, 1.0];
const GRADIENT_END: [f32; 4] = [0.145, 0.459, 0.988, 1.0];

fn page_flags() -> WindowFlags {
    WindowFlags::NO_DECORATION
        | WindowFlags::NO_MOVE
        | WindowFlags::NO_SAVED_SETTINGS
        | WindowFlags::NO_SCROLL_WITH_MOUSE
        | WindowFlags::NO_FOCUS_ON_APPEARING
        | WindowFlags::NO_NAV
}

/// Whether a band `height` tall at `screen_top` overlaps the display.
fn on_screen(screen_top: f32, height: f32, display_height: f32) -> bool {
    screen_top + height > 0.0 && screen_top < display_height
}

/// Screen-space top left and size of feature card `index`.
pub fn card_rect(index: usize, section: &Section, display: Vec2, scroll_top: f32) -> (Vec2, Vec2) {
    let columns = CARD_COLUMNS as f32;
    let width = ((display.x - PAGE_MARGIN * 2.0 - CARD_GAP * (columns - 1.0)) / columns).max(1.0);
    let column = (index % CARD_COLUMNS) as f32;

    (
        Vec2::new(
            PAGE_MARGIN + column * (width + CARD_GAP),
            section.top - scroll_top,
        ),
        Vec2::new(width, section.height),
    )
}

pub fn draw(ui: &Ui, state: &ShowcaseState) -> Vec<ShowcaseAction> {
    let mut actions = Vec::new();
    let display = Vec2::from(ui.io().display_size);

    draw_hero(ui, state, display, &mut actions);
    draw_features(ui, state, display);
    draw_customizer(ui, state, display, &mut actions);
    draw_footer(ui, state, display);
    draw_progress_bar(ui, state.page.document_progress(), display);

    actions
}

fn draw_hero(ui: &Ui, state: &ShowcaseState, display: Vec2, actions: &mut Vec<ShowcaseAction>) {
    let page = &state.page;
    let config = page.config();
    let intro = page.hero_intro();
    let hero = page.layout().hero;

    let top = hero.top - page.scroll_top() + display.y * 0.3 + intro.offset();
    let mut hovered = false;

    if on_screen(top, hero.height * 0.5, display.y) && intro.opacity() > 0.0 {
        let _alpha = ui.push_style_var(StyleVar::Alpha(intro.opacity()));

        ui.window("##hero")
            .position([PAGE_MARGIN, top], Condition::Always)
            .flags(page_flags() | WindowFlags::ALWAYS_AUTO_RESIZE | WindowFlags::NO_BACKGROUND)
            .build(|| {
                ui.set_window_font_scale(2.4);
                ui.text(&config.headline);
                ui.set_window_font_scale(1.2);
                ui.text(&config.tagline);
                ui.dummy([0.0, 24.0]);

                let scale = state.cta_scale();
                ui.set_window_font_scale(1.2 * scale);
                if ui.button_with_size(&config.cta_label, [CTA_SIZE[0] * scale, CTA_SIZE[1] * scale])
                {
                    actions.push(ShowcaseAction::CtaPressed);
                }
                hovered = ui.is_item_hovered();
            });
    }

    actions.push(ShowcaseAction::CtaHovered(hovered));
}

fn draw_features(ui: &Ui, state: &ShowcaseState, display: Vec2) {
    let page = &state.page;
    let layout = page.layout();
    let scroll_top = page.scroll_top();

    let header_top = layout.features.top + PAGE_MARGIN * 0.5 - scroll_top;
    if on_screen(header_top, PAGE_MARGIN, display.y) {
        ui.window("##features")
            .position([PAGE_MARGIN, header_top], Condition::Always)
            .flags(page_flags() | WindowFlags::ALWAYS_AUTO_RESIZE | WindowFlags::NO_BACKGROUND)
            .build(|| {
                ui.set_window_font_scale(1.8);
                ui.text("Built for long days");
            });
    }

    for (index, (section, copy)) in layout.cards.iter().zip(&page.config().features).enumerate() {
        let Some(reveal) = page.card_reveal(index) else {
            continue;
        };
        if reveal.opacity() <= 0.0 {
            continue;
        }

        let (position, size) = card_rect(index, section, display, scroll_top);
        let top = position.y + reveal.offset();
        if !on_screen(top, size.y, display.y) {
            continue;
        }

        let _alpha = ui.push_style_var(StyleVar::Alpha(reveal.opacity()));
        ui.window(format!("##card{}", index))
            .position([position.x, top], Condition::Always)
            .size(size.to_array(), Condition::Always)
            .flags(page_flags() | WindowFlags::NO_SCROLLBAR)
            .bg_alpha(0.55)
            .build(|| {
                ui.set_window_font_scale(1.3);
                ui.text(&copy.title);
                ui.set_window_font_scale(1.0);
                ui.separator();
                ui.text_wrapped(&copy.body);
            });
    }
}

fn draw_customizer(
    ui: &Ui,
    state: &ShowcaseState,
    display: Vec2,
    actions: &mut Vec<ShowcaseAction>,
) {
    let section = state.page.layout().customizer;
    let top = section.top - state.page.scroll_top() + PAGE_MARGIN * 0.5;
    if !on_screen(top, section.height, display.y) {
        return;
    }

    let customizer = &state.customizer;

    ui.window("##customizer")
        .position([PAGE_MARGIN, top], Condition::Always)
        .flags(page_flags() | WindowFlags::ALWAYS_AUTO_RESIZE)
        .bg_alpha(0.55)
        .build(|| {
            ui.set_window_font_scale(1.8);
            ui.text("Make it yours");
            ui.set_window_font_scale(1.0);
            ui.dummy([0.0, 8.0]);

            for (index, option) in customizer.options().iter().enumerate() {
                let [r, g, b] = option.color().to_srgb();

                let swatch = ui
                    .color_button_config(format!("##swatch{}", index), [r, g, b, 1.0])
                    .size(SWATCH_SIZE)
                    .build();
                ui.same_line();
                let radio = ui.radio_button_bool(&option.name, customizer.is_active(index));

                if swatch || radio {
                    actions.push(ShowcaseAction::SelectOption(index));
                }
            }

            ui.dummy([0.0, 8.0]);
            ui.text_disabled(format!(
                "Keys 1-{} pick a color",
                customizer.options().len().min(9)
            ));
        });
}

fn draw_footer(ui: &Ui, state: &ShowcaseState, display: Vec2) {
    let section = state.page.layout().footer;
    let top = section.top - state.page.scroll_top() + PAGE_MARGIN * 0.5;
    if !on_screen(top, section.height, display.y) {
        return;
    }

    ui.window("##footer")
        .position([PAGE_MARGIN, top], Condition::Always)
        .flags(page_flags() | WindowFlags::ALWAYS_AUTO_RESIZE | WindowFlags::NO_BACKGROUND)
        .build(|| {
            ui.text_disabled(&state.config.window.title);
            ui.text_disabled("Scroll with the wheel, arrows, Page Up/Down, Home and End");
        });
}

fn draw_progress_bar(ui: &Ui, progress: f32, display: Vec2) {
    if progress <= 0.0 {
        return;
    }

    let end = display.x * progress.min(1.0);
    ui.get_foreground_draw_list().add_rect_filled_multicolor(
        [0.0, 0.0],
        [end, PROGRESS_BAR_HEIGHT],
        GRADIENT_START,
        GRADIENT_END,
        GRADIENT_END,
        GRADIENT_START,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShowcaseConfig;

    const DISPLAY: Vec2 = Vec2::new(1280.0, 800.0);

    #[test]
    fn cards_fill_a_row_between_margins() {
        let section = Section {
            top: 1000.0,
            height: 240.0,
        };

        let (first, size) = card_rect(0, &section, DISPLAY, 600.0);
        let (last, _) = card_rect(2, &section, DISPLAY, 600.0);

        assert_eq!(first, Vec2::new(PAGE_MARGIN, 400.0));
        assert_eq!(size.y, 240.0);
        assert!((last.x + size.x - (DISPLAY.x - PAGE_MARGIN)).abs() < 1e-3);
    }

    #[test]
    fn visibility_is_an_overlap_test() {
        assert!(on_screen(-100.0, 150.0, 800.0));
        assert!(!on_screen(-150.0, 150.0, 800.0));
        assert!(on_screen(799.0, 10.0, 800.0));
        assert!(!on_screen(800.0, 10.0, 800.0));
    }

    #[test]
    fn idle_frame_only_reports_hover_state() {
        let mut context = imgui::Context::create();
        context.set_ini_filename(None);
        context.io_mut().display_size = DISPLAY.to_array();
        context.fonts().build_rgba32_texture();

        let mut state = ShowcaseState::new(ShowcaseConfig::default(), DISPLAY);
        state.update(2.0);

        let ui = context.new_frame();
        let actions = draw(ui, &state);
        context.render();

        assert_eq!(actions, vec![ShowcaseAction::CtaHovered(false)]);
    }
}
