use super::errors::{ErrorKind, Result};
use failchain::ResultExt;
use math::{PlaneD, Pnt3d, Pnt3f, Vec3d, Vec3f};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Renderer axes are the file's with y and z flipped.
#[inline]
pub fn to_render_direction(direction: Vec3d) -> Vec3d {
    Vec3d::new(direction.x, -direction.y, -direction.z)
}

#[inline]
pub fn to_render_point(point: Pnt3d, unit_scale: f64) -> Pnt3d {
    Pnt3d::new(
        point.x * unit_scale,
        -point.y * unit_scale,
        -point.z * unit_scale,
    )
}

#[inline]
pub fn to_render_point_f(point: Pnt3d, unit_scale: f64) -> Pnt3f {
    let point = to_render_point(point, unit_scale);
    Pnt3f::new(point.x as f32, point.y as f32, point.z as f32)
}

#[inline]
pub fn to_render_normal_f(normal: Vec3d) -> Vec3f {
    let normal = to_render_direction(normal);
    Vec3f::new(normal.x as f32, normal.y as f32, normal.z as f32)
}

pub fn to_render_plane(plane: &PlaneD, unit_scale: f64) -> PlaneD {
    PlaneD::new(to_render_direction(plane.normal), plane.d * unit_scale)
}

/// Normalises separators in paths written on Windows: backslashes become slashes and runs of
/// slashes collapse into one.
pub fn fix_path(path: &str) -> String {
    let mut fixed = String::with_capacity(path.len());
    for character in path.trim().chars() {
        let character = if character == '\\' { '/' } else { character };
        if character == '/' && fixed.ends_with('/') {
            continue;
        }
        fixed.push(character);
    }
    fixed
}

/// Resolves `path` as found in a text file against the directory holding that file.
pub fn resolve_relative(file: &Path, path: &str) -> PathBuf {
    let fixed = fix_path(path);
    match file.parent() {
        Some(directory) => directory.join(fixed),
        None => PathBuf::from(fixed),
    }
}

/// Reads a whole text file written in Latin-1, the encoding of every text format the game ships.
pub(crate) fn read_latin1<P: AsRef<Path>>(path: &P) -> Result<String> {
    let path = path.as_ref();
    let mut bytes = Vec::new();
    File::open(path)
        .map_err(ErrorKind::on_file_open(path))?
        .read_to_end(&mut bytes)
        .chain_err(|| ErrorKind::Io(format!("Failed to read `{}`.", path.display())))?;
    Ok(bytes.iter().map(|&byte| char::from(byte)).collect())
}

#[cfg(test)]
mod test {
    use super::{fix_path, resolve_relative, to_render_plane, to_render_point};
    use math::{PlaneD, Pnt3d, Vec3d};
    use std::path::{Path, PathBuf};

    #[test]
    fn render_coordinates() {
        let point = to_render_point(Pnt3d::new(1000.0, 2000.0, -500.0), 0.001);
        assert_eq!(point, Pnt3d::new(1.0, -2.0, 0.5));

        let plane = to_render_plane(&PlaneD::new(Vec3d::new(0.0, 1.0, 0.0), -1500.0), 0.001);
        assert_eq!(plane.normal, Vec3d::new(0.0, -1.0, 0.0));
        assert_eq!(plane.d, -1.5);
        // A point on the original plane is still on the converted one.
        let on_plane = to_render_point(Pnt3d::new(3.0, 1500.0, 7.0), 0.001);
        assert!(plane.distance(on_plane).abs() < 1e-12);
    }

    #[test]
    fn paths() {
        assert_eq!(fix_path("..\\\\Sounds\\fuego.wav "), "../Sounds/fuego.wav");
        assert_eq!(fix_path("a//b///c"), "a/b/c");
        assert_eq!(
            resolve_relative(Path::new("maps/Casa/casa.lvl"), "casa.bw"),
            PathBuf::from("maps/Casa/casa.bw")
        );
    }
}
