use super::errors::Result;
use super::util::read_latin1;
use log::{debug, warn};
use std::path::Path;
use std::str::FromStr;

/// Global lighting knobs read from the game's tuning file.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tunables {
    pub ambient_scale: f32,
    pub light_scale: f32,
    pub sun_brightness: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Tunables {
            ambient_scale: 0.2,
            light_scale: 8.0,
            sun_brightness: 1.0,
        }
    }
}

impl Tunables {
    pub fn from_file<P: AsRef<Path>>(path: &P) -> Result<Tunables> {
        let path = path.as_ref();
        let tunables = Self::parse(&read_latin1(&path)?);
        debug!("Tunables from {:?}: {:?}", path, tunables);
        Ok(tunables)
    }

    /// Parses `Key Value` lines over the defaults. Keys are case-insensitive.
    pub fn parse(text: &str) -> Tunables {
        let mut tunables = Tunables::default();
        for line in text.lines() {
            let mut tokens = line.split_whitespace();
            let (key, value) = match (tokens.next(), tokens.next()) {
                (Some(key), Some(value)) => (key, value),
                _ => continue,
            };
            let field = match key.to_ascii_lowercase().as_str() {
                "ambientscale" => &mut tunables.ambient_scale,
                "lightscale" => &mut tunables.light_scale,
                "sunbrightness" => &mut tunables.sun_brightness,
                _ => {
                    warn!("Unknown tunable {:?}.", key);
                    continue;
                }
            };
            match f32::from_str(value) {
                Ok(number) => *field = number,
                Err(_) => warn!("Bad value {:?} for tunable {:?}.", value, key),
            }
        }
        tunables
    }
}

#[cfg(test)]
mod test {
    use super::Tunables;

    #[test]
    fn parse_tunables() {
        let tunables = Tunables::parse("lightscale 4.5\n\nSunBrightness 0.5 extra\nFog 1\nAmbientScale\n");
        assert_eq!(
            tunables,
            Tunables {
                ambient_scale: 0.2,
                light_scale: 4.5,
                sun_brightness: 0.5,
            }
        );
        assert_eq!(Tunables::parse(""), Tunables::default());
    }
}
