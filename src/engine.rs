use crate::{overlay, showcase::ShowcaseState};

/// One simulation tick: overlay interactions are applied first so that a
/// selection made this frame already shows in this frame's pose.
pub fn update(state: &mut ShowcaseState, ui: &imgui::Ui, dt: f32) {
    state.scene.early_update();

    for action in overlay::draw(ui, state) {
        state.handle(action);
    }

    state.update(dt);
    state.scene.late_update();
}
