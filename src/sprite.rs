use ratatui::style::Color;
use std::path::Path;

use crate::cars::Car;

/// How a car is drawn on the terminal canvas: a rectangle in one colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarSprite {
    pub car: Car,
    pub color: Color,
    /// False when the asset could not be used and the livery colour stands in
    pub from_asset: bool,
}

impl CarSprite {
    pub fn fallback(car: Car) -> Self {
        Self {
            car,
            color: car.team_color(),
            from_asset: false,
        }
    }

    /// Tints the sprite with the average colour of the car's image. Missing
    /// or broken images fall back to the livery colour.
    pub fn load(car: Car, assets_dir: &Path) -> Self {
        let path = car.asset_path(assets_dir);
        match image::open(&path) {
            Ok(img) => match average_color(&img.to_rgba8()) {
                Some(color) => Self {
                    car,
                    color,
                    from_asset: true,
                },
                None => {
                    log::warn!("{} has no opaque pixels, using livery colour", path.display());
                    Self::fallback(car)
                }
            },
            Err(err) => {
                log::warn!("Could not load {}: {err}", path.display());
                Self::fallback(car)
            }
        }
    }
}

/// Mean colour over pixels that are at least half opaque
pub fn average_color(img: &image::RgbaImage) -> Option<Color> {
    let (mut r, mut g, mut b, mut count) = (0u64, 0u64, 0u64, 0u64);
    for pixel in img.pixels() {
        let [pr, pg, pb, alpha] = pixel.0;
        if alpha < 128 {
            continue;
        }
        r += pr as u64;
        g += pg as u64;
        b += pb as u64;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(Color::Rgb(
        (r / count) as u8,
        (g / count) as u8,
        (b / count) as u8,
    ))
}
