use super::config::WorldConfig;
use super::errors::{ErrorKind, Result};
use super::util::{read_latin1, resolve_relative};
use super::world::World;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref LEVEL_ENTRY: Regex = Regex::new(r"^\s*(\S+)\s*->\s*(\S+)").unwrap();
}

/// A level manifest (`.lvl`) naming the files that make up a level.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub bitmaps: Vec<PathBuf>,
    pub dome: PathBuf,
    pub world: Option<PathBuf>,
    /// Entries with keys this crate does not use, in file order.
    pub other: IndexMap<String, PathBuf>,
}

impl Level {
    pub fn from_file<P: AsRef<Path>>(path: &P) -> Result<Level> {
        let path = path.as_ref();
        Self::parse(&read_latin1(&path)?, path)
    }

    /// Parses `Key -> Value` lines, resolving every value against the directory of `file`.
    pub fn parse(text: &str, file: &Path) -> Result<Level> {
        let mut bitmaps = Vec::new();
        let mut dome = None;
        let mut world = None;
        let mut other = IndexMap::new();
        for captures in text.lines().filter_map(|line| LEVEL_ENTRY.captures(line)) {
            let key = &captures[1];
            let value = resolve_relative(file, &captures[2]);
            match key.to_ascii_lowercase().as_str() {
                "bitmaps" => bitmaps.push(value),
                "worlddome" => dome = Some(value),
                "world" => world = Some(value),
                _ => {
                    warn!("Unknown level key {:?} in {:?}.", key, file);
                    other.insert(key.to_owned(), value);
                }
            }
        }

        let dome = dome.unwrap_or_else(|| {
            let mut default = file.with_extension("").into_os_string();
            default.push("_d.mmp");
            PathBuf::from(default)
        });
        Ok(Level {
            bitmaps,
            dome,
            world,
            other,
        })
    }

    pub fn load_world(&self, config: &WorldConfig) -> Result<World> {
        let path = self.world.as_ref().ok_or_else(|| {
            ErrorKind::corrupt_file("lvl", "the manifest names no World file")
        })?;
        info!("Level world is {:?}, dome {:?}.", path, self.dome);
        World::load(path, config)
    }
}

#[cfg(test)]
mod test {
    use super::super::config::WorldConfig;
    use super::super::errors::ErrorKind;
    use super::Level;
    use std::path::{Path, PathBuf};
    use std::thread;

    #[test]
    fn parse_manifest() {
        let level = Level::parse(
            "Bitmaps -> ..\\..\\3DObjs\\casa.mmp\n\
             bitmaps -> casa_extra.mmp\n\
             WORLD -> casa.bw\n\
             Musica -> casa.mp3\n\
             no arrow here\n",
            Path::new("Maps/Casa/casa.lvl"),
        )
        .unwrap();
        assert_eq!(
            level.bitmaps,
            vec![
                PathBuf::from("Maps/Casa/../../3DObjs/casa.mmp"),
                PathBuf::from("Maps/Casa/casa_extra.mmp"),
            ]
        );
        assert_eq!(level.world, Some(PathBuf::from("Maps/Casa/casa.bw")));
        assert_eq!(level.dome, PathBuf::from("Maps/Casa/casa_d.mmp"));
        assert_eq!(
            level.other.get("Musica"),
            Some(&PathBuf::from("Maps/Casa/casa.mp3"))
        );
    }

    #[test]
    fn explicit_dome_and_missing_world() {
        let level = Level::parse("WorldDome -> cielo.mmp", Path::new("casa.lvl")).unwrap();
        assert_eq!(level.dome, PathBuf::from("cielo.mmp"));
        let error = level.load_world(&WorldConfig::default()).unwrap_err();
        match *error.kind() {
            ErrorKind::CorruptFile { what, .. } => assert_eq!(what, "lvl"),
            ref kind => panic!("unexpected error {:?}", kind),
        }
    }

    #[test]
    fn parse_from_several_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i_level| {
                thread::spawn(move || {
                    Level::parse(&format!("World -> w{}.bw", i_level), Path::new("a.lvl")).unwrap()
                })
            })
            .collect();
        for (i_level, handle) in handles.into_iter().enumerate() {
            assert_eq!(
                handle.join().unwrap().world,
                Some(PathBuf::from(format!("w{}.bw", i_level)))
            );
        }
    }
}
