use ratatui::style::Color;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Selectable car liveries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Car {
    RedBull,
    McLaren,
    Mercedes,
    Ferrari,
    Williams,
    RacingBulls,
    AstonMartin,
    Haas,
    KickSauber,
    Alpine,
}

impl Car {
    pub const ALL: [Car; 10] = [
        Car::RedBull,
        Car::McLaren,
        Car::Mercedes,
        Car::Ferrari,
        Car::Williams,
        Car::RacingBulls,
        Car::AstonMartin,
        Car::Haas,
        Car::KickSauber,
        Car::Alpine,
    ];

    pub fn get_name(&self) -> &'static str {
        match self {
            Car::RedBull => "RedBull",
            Car::McLaren => "McLaren",
            Car::Mercedes => "Mercedes",
            Car::Ferrari => "Ferrari",
            Car::Williams => "Williams",
            Car::RacingBulls => "RacingBulls",
            Car::AstonMartin => "AstonMartin",
            Car::Haas => "Haas",
            Car::KickSauber => "KickSauber",
            Car::Alpine => "Alpine",
        }
    }

    /// Sprite file name inside the `cars/` asset directory
    pub fn asset_file(&self) -> &'static str {
        match self {
            Car::RedBull => "redbull.png",
            Car::McLaren => "mcllaren.png",
            Car::Mercedes => "mercedes.png",
            Car::Ferrari => "ferrari.png",
            Car::Williams => "williams.png",
            Car::RacingBulls => "racingbulls.png",
            Car::AstonMartin => "astonmartin.png",
            Car::Haas => "haas.png",
            Car::KickSauber => "kicks.png",
            Car::Alpine => "alpine.png",
        }
    }

    pub fn asset_path(&self, assets_dir: &Path) -> PathBuf {
        assets_dir.join("cars").join(self.asset_file())
    }

    /// Livery colour used when the sprite cannot be loaded
    pub fn team_color(&self) -> Color {
        match self {
            Car::RedBull => Color::Rgb(30, 65, 255),
            Car::McLaren => Color::Rgb(255, 128, 0),
            Car::Mercedes => Color::Rgb(0, 210, 190),
            Car::Ferrari => Color::Rgb(220, 0, 0),
            Car::Williams => Color::Rgb(0, 90, 255),
            Car::RacingBulls => Color::Rgb(102, 146, 255),
            Car::AstonMartin => Color::Rgb(0, 111, 98),
            Car::Haas => Color::Rgb(182, 186, 189),
            Car::KickSauber => Color::Rgb(82, 226, 82),
            Car::Alpine => Color::Rgb(255, 135, 188),
        }
    }

    fn index(&self) -> usize {
        Car::ALL.iter().position(|car| car == self).unwrap_or(0)
    }

    /// Next car in the selection list, wrapping around
    pub fn next(&self) -> Car {
        Car::ALL[(self.index() + 1) % Car::ALL.len()]
    }

    pub fn previous(&self) -> Car {
        Car::ALL[(self.index() + Car::ALL.len() - 1) % Car::ALL.len()]
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get_name())
    }
}

impl FromStr for Car {
    type Err = String;

    /// Accepts the table name in any letter case
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Car::ALL
            .into_iter()
            .find(|car| car.get_name().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                let known: Vec<&str> = Car::ALL.iter().map(Car::get_name).collect();
                format!("unknown car {name:?}, expected one of: {}", known.join(", "))
            })
    }
}

/// The player's and the opponents' car choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarSelection {
    pub player: Car,
    pub opponent: Car,
}

impl Default for CarSelection {
    fn default() -> Self {
        Self {
            player: Car::RedBull,
            opponent: Car::McLaren,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_table() {
        let table = [
            ("RedBull", "redbull.png"),
            ("McLaren", "mcllaren.png"),
            ("Mercedes", "mercedes.png"),
            ("Ferrari", "ferrari.png"),
            ("Williams", "williams.png"),
            ("RacingBulls", "racingbulls.png"),
            ("AstonMartin", "astonmartin.png"),
            ("Haas", "haas.png"),
            ("KickSauber", "kicks.png"),
            ("Alpine", "alpine.png"),
        ];
        for (name, file) in table {
            let car: Car = name.parse().unwrap();
            assert_eq!(car.asset_file(), file);
            assert_eq!(car.to_string(), name);
        }
    }

    #[test]
    fn test_asset_path_under_cars_dir() {
        let path = Car::KickSauber.asset_path(Path::new("assets"));
        assert_eq!(path, Path::new("assets").join("cars").join("kicks.png"));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("ferrari".parse::<Car>(), Ok(Car::Ferrari));
        assert_eq!("ASTONMARTIN".parse::<Car>(), Ok(Car::AstonMartin));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "Brawn".parse::<Car>().unwrap_err();
        assert!(err.contains("Brawn"));
        assert!(err.contains("RedBull"));
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Car::Alpine.next(), Car::RedBull);
        assert_eq!(Car::RedBull.previous(), Car::Alpine);
        let mut car = Car::Haas;
        for _ in 0..Car::ALL.len() {
            car = car.next();
        }
        assert_eq!(car, Car::Haas);
    }
}
