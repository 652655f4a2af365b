use super::errors::{ErrorKind, Result};
use failchain::ResultExt;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use toml;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecoderConfig {
    /// Trace every field read from the world file.
    pub dump_log: bool,
    pub min_face_count: i32,
    pub max_face_count: i32,
    /// Hole windings larger than this are reported, but still read.
    pub max_winding_vertices: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            dump_log: false,
            min_face_count: 4,
            max_face_count: 100,
            max_winding_vertices: 32,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeometryConfig {
    /// File units to renderer units. The y and z axes are also flipped.
    pub unit_scale: f64,
    pub texture_resolution: [f64; 2],
    /// Shift each face's texture coordinates towards the origin.
    pub texcoord_correction: bool,
    /// Textures standing in for the sky: they never cast shadows and imply a sky.
    pub sky_surrogate_textures: Vec<String>,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        GeometryConfig {
            unit_scale: 0.001,
            texture_resolution: [256.0, 256.0],
            texcoord_correction: true,
            sky_surrogate_textures: vec!["blanca".to_owned()],
        }
    }
}

impl GeometryConfig {
    pub fn is_sky_surrogate(&self, texture: &str) -> bool {
        self.sky_surrogate_textures
            .iter()
            .any(|surrogate| surrogate == texture)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub decoder: DecoderConfig,
    pub geometry: GeometryConfig,
}

impl WorldConfig {
    pub fn from_file<P: AsRef<Path>>(path: &P) -> Result<WorldConfig> {
        let path = path.as_ref();
        let mut contents = String::new();
        File::open(path)
            .map_err(ErrorKind::on_file_open(path))?
            .read_to_string(&mut contents)
            .chain_err(|| ErrorKind::Io(format!("Failed to read `{}`.", path.display())))?;
        WorldConfig::from_text(&contents)
    }

    pub fn from_text(contents: &str) -> Result<WorldConfig> {
        let config: WorldConfig = toml::from_str(contents).map_err(ErrorKind::on_config_parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let decoder = &self.decoder;
        if decoder.min_face_count > decoder.max_face_count {
            return Err(ErrorKind::Config(format!(
                "min_face_count {} exceeds max_face_count {}",
                decoder.min_face_count, decoder.max_face_count
            ))
            .into());
        }
        let geometry = &self.geometry;
        if !(geometry.unit_scale > 0.0) {
            return Err(ErrorKind::Config(format!(
                "unit_scale must be positive, got {}",
                geometry.unit_scale
            ))
            .into());
        }
        if geometry.texture_resolution.iter().any(|&size| !(size > 0.0)) {
            return Err(ErrorKind::Config(format!(
                "texture_resolution must be positive, got {:?}",
                geometry.texture_resolution
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::WorldConfig;

    #[test]
    fn test_world_config() {
        let config = WorldConfig::from_text(
            r#"
            [decoder]
                dump_log = true
                max_face_count = 250
            [geometry]
                unit_scale = 0.01
                texcoord_correction = false
                sky_surrogate_textures = ["blanca", "cielo"]
            "#,
        )
        .unwrap();
        assert!(config.decoder.dump_log);
        assert_eq!(config.decoder.min_face_count, 4);
        assert_eq!(config.decoder.max_face_count, 250);
        assert_eq!(config.decoder.max_winding_vertices, 32);
        assert_eq!(config.geometry.unit_scale, 0.01);
        assert_eq!(config.geometry.texture_resolution, [256.0, 256.0]);
        assert!(!config.geometry.texcoord_correction);
        assert!(config.geometry.is_sky_surrogate("cielo"));
        assert!(!config.geometry.is_sky_surrogate("piedra"));
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(WorldConfig::from_text("").unwrap(), WorldConfig::default());
        assert!(WorldConfig::default().geometry.is_sky_surrogate("blanca"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(WorldConfig::from_text("[decoder]\nmin_face_count = 10\nmax_face_count = 5").is_err());
        assert!(WorldConfig::from_text("[geometry]\nunit_scale = 0.0").is_err());
        assert!(WorldConfig::from_text("[geometry]\nunit_scale = \"big\"").is_err());
    }
}
