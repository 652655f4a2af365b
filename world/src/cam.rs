use super::errors::{ErrorKind, Result};
use super::reader::Reader;
use super::util::to_render_point_f;
use log::info;
use math::prelude::*;
use math::{Mat3f, Pnt3d, Pnt3f, Quatf, Rad, Vec3f};
use std::f32::consts::FRAC_PI_2;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraFrame {
    pub rotation: Quatf,
    /// Renderer units.
    pub position: Pnt3f,
    pub time_scale: f32,
}

/// A recorded camera path (`.cam`), one frame per tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CameraRecord {
    pub unknown: f32,
    pub frames: Vec<CameraFrame>,
}

impl CameraRecord {
    pub fn from_file<P: AsRef<Path>>(path: &P, unit_scale: f64) -> Result<CameraRecord> {
        let path = path.as_ref();
        let file = File::open(path).map_err(ErrorKind::on_file_open(path))?;
        let record = Self::decode(&mut Reader::new(BufReader::new(file), false), unit_scale)?;
        info!(
            "Loaded camera record {:?} with {} frames.",
            path,
            record.frames.len()
        );
        Ok(record)
    }

    pub fn decode<R: Read + Seek>(reader: &mut Reader<R>, unit_scale: f64) -> Result<CameraRecord> {
        let last_frame = reader.read_i32()?;
        if last_frame < -1 {
            return Err(ErrorKind::CorruptCount {
                what: "camera frame",
                count: i64::from(last_frame),
            }
            .into());
        }
        let num_frames = (i64::from(last_frame) + 1) as usize;
        let unknown = reader.read_f32()?;

        let mut frames = Vec::with_capacity(num_frames.min(1 << 16));
        for _ in 0..num_frames {
            let axis = reader.read_vector3f()?;
            let angle = reader.read_f32()?;
            let position = reader.read_vector3f()?;
            let time_scale = reader.read_f32()?;
            frames.push(CameraFrame {
                rotation: frame_rotation(Vec3f::new(axis.x, -axis.y, -axis.z), angle),
                position: convert_position(position, unit_scale),
                time_scale,
            });
        }
        Ok(CameraRecord { unknown, frames })
    }

    pub fn duration(&self) -> f32 {
        self.frames.iter().map(|frame| frame.time_scale).sum()
    }
}

/// Rotation about `axis`, turned a quarter about x, then transposed.
fn frame_rotation(axis: Vec3f, angle: f32) -> Quatf {
    let around_axis = if axis.magnitude2() > 0.0 {
        Mat3f::from_axis_angle(axis.normalize(), Rad(angle))
    } else {
        Mat3f::identity()
    };
    Quatf::from((Mat3f::from_angle_x(Rad(FRAC_PI_2)) * around_axis).transpose())
}

fn convert_position(position: Vec3f, unit_scale: f64) -> Pnt3f {
    let position = Pnt3d::new(
        f64::from(position.x),
        f64::from(position.y),
        f64::from(position.z),
    );
    to_render_point_f(position, unit_scale)
}

#[cfg(test)]
mod test {
    use super::super::errors::ErrorKind;
    use super::super::reader::Reader;
    use super::CameraRecord;
    use byteorder::{LittleEndian, WriteBytesExt};
    use math::prelude::*;
    use math::{Pnt3f, Vec3f};
    use std::io::Cursor;

    fn record(frames: &[[f32; 8]]) -> Vec<u8> {
        let mut out = Vec::new();
        out.write_i32::<LittleEndian>(frames.len() as i32 - 1).unwrap();
        out.write_f32::<LittleEndian>(42.0).unwrap();
        for frame in frames {
            for &value in frame {
                out.write_f32::<LittleEndian>(value).unwrap();
            }
        }
        out
    }

    #[test]
    fn decode_frames() {
        let bytes = record(&[
            [0.0, 0.0, 1.0, 0.0, 1000.0, 2000.0, 3000.0, 0.5],
            [0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.25],
        ]);
        let record = CameraRecord::decode(&mut Reader::new(Cursor::new(bytes), false), 0.001).unwrap();
        assert_eq!(record.unknown, 42.0);
        assert_eq!(record.frames.len(), 2);
        assert_eq!(record.frames[0].position, Pnt3f::new(1.0, -2.0, -3.0));
        assert_eq!(record.duration(), 0.75);
        for frame in &record.frames {
            assert!((frame.rotation.magnitude() - 1.0).abs() < 1e-5);
        }

        // With no rotation about the file axis only the upright turn remains: +y maps to +z.
        let up = record.frames[0].rotation.conjugate() * Vec3f::unit_y();
        assert!((up - Vec3f::unit_z()).magnitude() < 1e-5);
    }

    #[test]
    fn empty_and_corrupt_records() {
        let record = CameraRecord::decode(&mut Reader::new(Cursor::new(record(&[])), false), 0.001)
            .unwrap();
        assert!(record.frames.is_empty());

        let mut bytes = Vec::new();
        bytes.write_i32::<LittleEndian>(-7).unwrap();
        let error = CameraRecord::decode(&mut Reader::new(Cursor::new(bytes), false), 0.001)
            .unwrap_err();
        assert_eq!(
            *error.kind(),
            ErrorKind::CorruptCount {
                what: "camera frame",
                count: -7
            }
        );
    }
}
