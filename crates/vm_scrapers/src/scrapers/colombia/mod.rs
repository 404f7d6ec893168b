use vm_core::ScraperConfig;

use crate::scrapers::{Region, ScraperType};

pub mod elespectador;
pub mod eltiempo;
pub mod vanguardia;

pub use elespectador::ElEspectadorScraper;
pub use eltiempo::ElTiempoScraper;
pub use vanguardia::VanguardiaScraper;

pub const REGION: Region = Region {
    name: "colombia",
    emoji: "🇨🇴",
};

/// Returns all available Colombian newspaper scrapers
pub fn get_scrapers(config: &ScraperConfig) -> Vec<ScraperType> {
    vec![
        ScraperType::ElTiempo(ElTiempoScraper::new(config)),
        ScraperType::ElEspectador(ElEspectadorScraper::new(config)),
        ScraperType::Vanguardia(VanguardiaScraper::new(config)),
    ]
}
