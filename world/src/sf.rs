use super::errors::Result;
use super::util::{read_latin1, resolve_relative};
use lazy_static::lazy_static;
use log::{info, warn};
use math::Pnt2f;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::str::FromStr;

lazy_static! {
    static ref ASSIGNMENT: Regex = Regex::new(r"^\s*(\S+)\s*=>\s*(.*?)\s*$").unwrap();
}

/// A sound region (`.sf`): a vertical prism over a 2D outline that plays an ambient sound.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GhostSector {
    pub name: String,
    pub floor_height: f32,
    pub roof_height: f32,
    pub vertices: Vec<Pnt2f>,
    pub group: String,
    pub sound: Option<PathBuf>,
    pub volume: f32,
    pub volume_base: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub max_vertical_distance: f32,
    pub scale: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GhostSectors {
    pub sectors: Vec<GhostSector>,
}

impl GhostSectors {
    pub fn from_file<P: AsRef<Path>>(path: &P) -> Result<GhostSectors> {
        let path = path.as_ref();
        let sectors = Self::parse(&read_latin1(&path)?, path)?;
        info!(
            "Loaded {} ghost sectors from {:?}.",
            sectors.sectors.len(),
            path
        );
        Ok(sectors)
    }

    /// Parses `.sf` text. Sound paths are resolved against the directory of `file`.
    pub fn parse(text: &str, file: &Path) -> Result<GhostSectors> {
        let mut lines = text.lines();
        let mut sectors = Vec::new();
        if let Some(header) = lines.next() {
            match ASSIGNMENT.captures(header) {
                Some(ref captures) if captures[1].eq_ignore_ascii_case("NumGhostSectors") => {
                    if let Ok(count) = usize::from_str(&captures[2]) {
                        sectors.reserve(count.min(1024));
                    }
                }
                _ => warn!("Ghost sector file {:?} has no sector count header.", file),
            }
        }

        let mut current: Option<GhostSector> = None;
        for line in lines {
            let key = match line.split_whitespace().next() {
                Some(key) => key,
                None => continue,
            };

            if key.eq_ignore_ascii_case("BeginGhostSector") {
                if current.is_some() {
                    warn!("Unexpected BeginGhostSector in {:?}.", file);
                    continue;
                }
                current = Some(GhostSector::default());
                continue;
            } else if key.eq_ignore_ascii_case("EndGhostSector") {
                match current.take() {
                    Some(sector) => sectors.push(sector),
                    None => warn!("Unexpected EndGhostSector in {:?}.", file),
                }
                continue;
            }

            let sector = match current {
                Some(ref mut sector) => sector,
                None => continue,
            };
            let captures = match ASSIGNMENT.captures(line) {
                Some(captures) => captures,
                None => continue,
            };
            let (key, value) = (&captures[1], &captures[2]);
            let first = match value.split_whitespace().next() {
                Some(first) => first,
                None => continue,
            };

            let field = match key.to_ascii_lowercase().as_str() {
                "name" => {
                    sector.name = first.to_owned();
                    continue;
                }
                "grupo" => {
                    sector.group = first.to_owned();
                    continue;
                }
                "sonido" => {
                    sector.sound = Some(resolve_relative(file, first));
                    continue;
                }
                "vertex" => {
                    let mut coordinates = value.split_whitespace().map(f32::from_str);
                    match (coordinates.next(), coordinates.next()) {
                        (Some(Ok(x)), Some(Ok(y))) => sector.vertices.push(Pnt2f::new(x, y)),
                        _ => warn!("Bad ghost sector vertex {:?} in {:?}.", value, file),
                    }
                    continue;
                }
                "floorheight" => &mut sector.floor_height,
                "roofheight" => &mut sector.roof_height,
                "volumen" => &mut sector.volume,
                "volumenbase" => &mut sector.volume_base,
                "distanciaminima" => &mut sector.min_distance,
                "distanciamaxima" => &mut sector.max_distance,
                "distmaximavertical" => &mut sector.max_vertical_distance,
                "escala" => &mut sector.scale,
                _ => {
                    warn!("Unknown ghost sector key {:?} in {:?}.", key, file);
                    continue;
                }
            };
            match f32::from_str(first) {
                Ok(number) => *field = number,
                Err(_) => warn!("Bad value {:?} for {:?} in {:?}.", first, key, file),
            }
        }
        if let Some(sector) = current {
            warn!("Unterminated ghost sector {:?} in {:?}.", sector.name, file);
            sectors.push(sector);
        }

        Ok(GhostSectors { sectors })
    }
}

#[cfg(test)]
mod test {
    use super::GhostSectors;
    use math::Pnt2f;
    use std::path::{Path, PathBuf};

    const TEXT: &str = "NumGhostSectors => 2
BeginGhostSector
    Name => fuente
    FloorHeight => -100.5
    RoofHeight => 2500
    Vertex => 0 0
    Vertex => 1000 0
    Vertex => 1000 1000
    Grupo => agua
    Sonido => ..\\\\Sounds\\fuente.wav
    Volumen => 0.8
    ESCALA => 2
    Color => 1
EndGhostSector

EndGhostSector
Name => outside
BeginGhostSector
    name => viento
    VolumenBase => nope
EndGhostSector
";

    #[test]
    fn parse_ghost_sectors() {
        let sectors = GhostSectors::parse(TEXT, Path::new("maps/Casa/casa.sf")).unwrap();
        assert_eq!(sectors.sectors.len(), 2);

        let fuente = &sectors.sectors[0];
        assert_eq!(fuente.name, "fuente");
        assert_eq!(fuente.floor_height, -100.5);
        assert_eq!(fuente.roof_height, 2500.0);
        assert_eq!(
            fuente.vertices,
            vec![
                Pnt2f::new(0.0, 0.0),
                Pnt2f::new(1000.0, 0.0),
                Pnt2f::new(1000.0, 1000.0)
            ]
        );
        assert_eq!(fuente.group, "agua");
        assert_eq!(
            fuente.sound,
            Some(PathBuf::from("maps/Casa/../Sounds/fuente.wav"))
        );
        assert_eq!(fuente.volume, 0.8);
        assert_eq!(fuente.scale, 2.0);

        let viento = &sectors.sectors[1];
        assert_eq!(viento.name, "viento");
        assert_eq!(viento.volume_base, 0.0);
        assert!(viento.sound.is_none());
    }

    #[test]
    fn unterminated_sector_is_kept() {
        let text = "NumGhostSectors => 1\nBeginGhostSector\n  Name => cueva\n  Escala => 3\n";
        let sectors = GhostSectors::parse(text, Path::new("cueva.sf")).unwrap();
        assert_eq!(sectors.sectors.len(), 1);
        assert_eq!(sectors.sectors[0].name, "cueva");
        assert_eq!(sectors.sectors[0].scale, 3.0);
    }

    #[test]
    fn empty_text() {
        assert!(GhostSectors::parse("", Path::new("a.sf"))
            .unwrap()
            .sectors
            .is_empty());
    }
}
