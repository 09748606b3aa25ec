use anyhow::{anyhow, Context};

use crate::{
    chair::ChairHandles,
    color::Color,
    config::{ColorOption, CustomizerConfig},
    material_manager::MaterialManager,
    motion::ChairMotion,
};

/// Single-select group of upholstery colors.
pub struct Customizer {
    options: Vec<ColorOption>,
    active: usize,
}

impl Customizer {
    pub fn new(config: &CustomizerConfig) -> Self {
        Self {
            options: config.options.clone(),
            active: config.initial.min(config.options.len().saturating_sub(1)),
        }
    }

    pub fn options(&self) -> &[ColorOption] {
        &self.options
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == index
    }

    pub fn active_color(&self) -> Option<Color> {
        self.options.get(self.active).map(ColorOption::color)
    }

    /// Recolors both upholstery slots, marks `index` as the only active
    /// option and pulses the chair.
    pub fn select(
        &mut self,
        index: usize,
        chair: &ChairHandles,
        materials: &mut MaterialManager,
        motion: &mut ChairMotion,
    ) -> anyhow::Result<()> {
        let option = self
            .options
            .get(index)
            .ok_or_else(|| anyhow!("No color option {} (have {})", index, self.options.len()))?;
        let color = option.color();

        for slot in chair.upholstery() {
            materials.set_color(slot, color);
        }

        self.active = index;
        motion.pulse();

        log::info!("Selected {} ({:#08x})", option.name, color.hex());
        Ok(())
    }

    /// Selects the option carrying `value`, written as in markup
    /// (`0x2575fc`, `#2575fc` or decimal).
    pub fn select_value(
        &mut self,
        value: &str,
        chair: &ChairHandles,
        materials: &mut MaterialManager,
        motion: &mut ChairMotion,
    ) -> anyhow::Result<()> {
        let color = Color::parse(value).context("Rejected color selection")?;
        let index = self
            .options
            .iter()
            .position(|option| option.color() == color)
            .ok_or_else(|| anyhow!("No option offers color {:#08x}", color.hex()))?;

        self.select(index, chair, materials, motion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chair::{build_chair, DEFAULT_UPHOLSTERY},
        config::MotionConfig,
        scene_graph::Scene,
    };

    struct Fixture {
        customizer: Customizer,
        chair: ChairHandles,
        scene: Scene,
        materials: MaterialManager,
        motion: ChairMotion,
    }

    fn fixture() -> Fixture {
        let mut scene = Scene::new();
        let mut materials = MaterialManager::new();
        let chair = build_chair(&mut scene, &mut materials, DEFAULT_UPHOLSTERY);

        Fixture {
            customizer: Customizer::new(&CustomizerConfig::default()),
            chair,
            scene,
            materials,
            motion: ChairMotion::new(&MotionConfig::default()),
        }
    }

    impl Fixture {
        fn select(&mut self, index: usize) -> anyhow::Result<()> {
            self.customizer
                .select(index, &self.chair, &mut self.materials, &mut self.motion)
        }

        fn select_value(&mut self, value: &str) -> anyhow::Result<()> {
            self.customizer
                .select_value(value, &self.chair, &mut self.materials, &mut self.motion)
        }

        fn color_of(&self, part: &str) -> Color {
            let id = self.scene.get_object_by_name(part).unwrap();
            let material = self.scene.get_object(id).unwrap().material_id.unwrap();
            self.materials.color(material).unwrap()
        }

        fn active_count(&self) -> usize {
            (0..self.customizer.options().len())
                .filter(|&i| self.customizer.is_active(i))
                .count()
        }
    }

    #[test]
    fn selecting_recolors_exactly_the_upholstery() {
        let mut f = fixture();
        f.select_value("0x2575fc").unwrap();

        let blue = Color::from_hex(0x2575fc);
        assert_eq!(f.color_of("Seat"), blue);
        assert_eq!(f.color_of("Backrest"), blue);
        assert_eq!(f.color_of("Headrest"), blue);

        assert_eq!(f.color_of("Base"), Color::from_hex(0x333333));
        assert_eq!(f.color_of("Pillar"), Color::from_hex(0x333333));
        assert_eq!(f.color_of("Armrest Left"), Color::from_hex(0x222222));

        assert_eq!(f.customizer.active(), 1);
        assert_eq!(f.active_count(), 1);
        assert!(f.motion.is_pulsing());
    }

    #[test]
    fn selecting_twice_is_idempotent() {
        let mut f = fixture();
        f.select(2).unwrap();
        let seat = f.color_of("Seat");

        f.select(2).unwrap();
        assert_eq!(f.color_of("Seat"), seat);
        assert_eq!(f.color_of("Backrest"), seat);
        assert_eq!(f.customizer.active(), 2);
        assert_eq!(f.active_count(), 1);
    }

    #[test]
    fn rejected_selections_leave_state_alone() {
        let mut f = fixture();

        assert!(f.select(17).is_err());
        assert!(f.select_value("not a color").is_err());
        assert!(f.select_value("0x123456").is_err());

        assert_eq!(f.customizer.active(), 0);
        assert_eq!(f.color_of("Seat"), DEFAULT_UPHOLSTERY);
        assert!(!f.motion.is_pulsing());
    }

    #[test]
    fn initial_option_is_clamped() {
        let config = CustomizerConfig {
            initial: 10,
            ..CustomizerConfig::default()
        };
        let customizer = Customizer::new(&config);
        assert_eq!(customizer.active(), 3);
        assert_eq!(customizer.active_color(), Some(Color::from_hex(0xff6347)));
    }
}
