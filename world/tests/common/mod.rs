#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

pub const SIMPLE: u32 = 7001;
pub const PORTAL: u32 = 7002;
pub const WITH_HOLE: u32 = 7003;
pub const BSP: u32 = 7004;
pub const SKYDOME: u32 = 7005;

pub enum Node {
    Leaf,
    Split([f64; 4], Box<Node>, Box<Node>),
    TexInfo([f64; 4], Box<Node>, Box<Node>, &'static str),
}

/// Writes `.bw` files field by field.
#[derive(Default)]
pub struct BwWriter {
    bytes: Vec<u8>,
}

impl BwWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn u8s(&mut self, values: &[u8]) -> &mut Self {
        self.bytes.write_all(values).unwrap();
        self
    }

    pub fn i32(&mut self, value: i32) -> &mut Self {
        self.bytes.write_i32::<LittleEndian>(value).unwrap();
        self
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.bytes.write_u32::<LittleEndian>(value).unwrap();
        self
    }

    pub fn f32(&mut self, value: f32) -> &mut Self {
        self.bytes.write_f32::<LittleEndian>(value).unwrap();
        self
    }

    pub fn f64s(&mut self, values: &[f64]) -> &mut Self {
        for &value in values {
            self.bytes.write_f64::<LittleEndian>(value).unwrap();
        }
        self
    }

    pub fn string(&mut self, value: &str) -> &mut Self {
        self.u32(value.len() as u32).u8s(value.as_bytes())
    }

    pub fn atmospheres(&mut self, names: &[&str]) -> &mut Self {
        self.i32(names.len() as i32);
        for name in names {
            self.string(name).u8s(&[32, 64, 128]).f32(0.5);
        }
        self
    }

    pub fn vertices(&mut self, vertices: &[[f64; 3]]) -> &mut Self {
        self.i32(vertices.len() as i32);
        for vertex in vertices {
            self.f64s(vertex);
        }
        self
    }

    pub fn sector(&mut self, name: &str, num_faces: i32) -> &mut Self {
        self.string(name).u8s(&[200, 180, 160]).f32(0.75);
        self.f32(1.0);
        self.sentinels();
        self.u8s(&[1, 2, 3]).f32(0.0).f32(0.0);
        self.sentinels();
        self.f64s(&[0.0, 0.0, -1.0]).i32(num_faces)
    }

    fn sentinels(&mut self) -> &mut Self {
        self.u8s(&[0; 24]).u8s(&[0xcd; 8]).u8s(&[0; 4])
    }

    pub fn texture(&mut self, name: &str, signed: bool) -> &mut Self {
        if signed {
            self.bytes.write_u64::<LittleEndian>(3).unwrap();
        }
        self.string(name)
            .f64s(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
            .f32(-16.0)
            .f32(0.0)
            .u8s(&[0; 8])
    }

    pub fn indices(&mut self, indices: &[u32]) -> &mut Self {
        self.i32(indices.len() as i32);
        for &index in indices {
            self.u32(index);
        }
        self
    }

    pub fn hole_winding(&mut self, indices: &[i32]) -> &mut Self {
        self.i32(indices.len() as i32);
        for &index in indices {
            self.i32(index);
        }
        self
    }

    pub fn simple_face(&mut self, plane: [f64; 4], texture: &str, indices: &[u32]) -> &mut Self {
        self.u32(SIMPLE)
            .f64s(&plane)
            .texture(texture, true)
            .indices(indices)
    }

    pub fn portal_face(&mut self, plane: [f64; 4], indices: &[u32], to_sector: i32) -> &mut Self {
        self.u32(PORTAL)
            .f64s(&plane)
            .indices(indices)
            .i32(to_sector)
            .u8s(&[9; 8])
            .texture("", false)
    }

    pub fn face_with_hole(
        &mut self,
        plane: [f64; 4],
        texture: &str,
        outer: &[i32],
        hole: &[i32],
        to_sector: i32,
    ) -> &mut Self {
        self.u32(WITH_HOLE)
            .f64s(&plane)
            .texture(texture, true)
            .hole_winding(outer)
            .hole_winding(hole)
            .i32(to_sector)
            .i32(0)
    }

    pub fn bsp_face(
        &mut self,
        plane: [f64; 4],
        texture: &str,
        indices: &[u32],
        holes: &[(&[i32], i32)],
        root: &Node,
    ) -> &mut Self {
        self.u32(BSP)
            .f64s(&plane)
            .texture(texture, true)
            .indices(indices)
            .i32(holes.len() as i32);
        for &(hole, to_sector) in holes {
            self.hole_winding(hole)
                .i32(to_sector)
                .i32(1)
                .f64s(&[0.0, 1.0, 0.0, -4000.0]);
        }
        self.node(root)
    }

    pub fn node(&mut self, node: &Node) -> &mut Self {
        match *node {
            Node::Leaf => self.u32(8003).i32(1).u32(0).u32(2).u32(0).u32(1),
            Node::Split(plane, ref front, ref back) => {
                self.u32(8001).node(front).node(back).f64s(&plane)
            }
            Node::TexInfo(plane, ref front, ref back, texture) => self
                .u32(8002)
                .node(front)
                .node(back)
                .f64s(&plane)
                .texture(texture, true),
        }
    }

    pub fn skydome(&mut self, plane: [f64; 4], indices: &[u32]) -> &mut Self {
        self.u32(SKYDOME).f64s(&plane).indices(indices)
    }
}

pub const FLOOR: [f64; 4] = [0.0, 0.0, 1.0, 0.0];
pub const WALL: [f64; 4] = [1.0, 0.0, 0.0, -10000.0];

/// Knobs for corrupting the sample world.
pub struct Sample {
    pub face_counts: [i32; 2],
    pub first_face_tag: u32,
    pub hole_vertex: i32,
    pub portal_sector: i32,
}

impl Default for Sample {
    fn default() -> Self {
        Sample {
            face_counts: [5, 4],
            first_face_tag: SIMPLE,
            hole_vertex: 4,
            portal_sector: 1,
        }
    }
}

/// Two sectors, in file units of millimetres.
///
/// Sector 0 (`patio`): face 0 is a simple 10x10 floor, face 1 the same floor with a 2x2 hole to
/// sector 1, face 2 a BSP floor with the same hole split at x = 5 (its leaves become faces 3 and
/// 4), face 5 a wall portal to sector 1 and face 6 a skydome triangle.
///
/// Sector 1 (`casa`): face 7 a sky stand-in floor, face 8 the wall portal back to sector 0,
/// face 9 an untextured triangle and face 10 a simple floor.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn sample_world(sample: &Sample) -> Vec<u8> {
    init_logging();
    let mut writer = BwWriter::new();
    writer.atmospheres(&["niebla", "clara"]).vertices(&[
        [0.0, 0.0, 0.0],
        [10000.0, 0.0, 0.0],
        [10000.0, 10000.0, 0.0],
        [0.0, 10000.0, 0.0],
        [4000.0, 4000.0, 0.0],
        [6000.0, 4000.0, 0.0],
        [6000.0, 6000.0, 0.0],
        [4000.0, 6000.0, 0.0],
        [10000.0, 0.0, 0.0],
        [10000.0, 10000.0, 0.0],
        [10000.0, 10000.0, 3000.0],
        [10000.0, 0.0, 3000.0],
    ]);
    writer.i32(2);

    let hole = [sample.hole_vertex, 5, 6, 7];
    let split = Node::Split(
        [1.0, 0.0, 0.0, -5000.0],
        Box::new(Node::Leaf),
        Box::new(Node::Leaf),
    );
    writer.sector("patio", sample.face_counts[0]);
    if sample.first_face_tag == SIMPLE {
        writer.simple_face(FLOOR, "piedra", &[0, 1, 2, 3]);
    } else {
        writer
            .u32(sample.first_face_tag)
            .f64s(&FLOOR)
            .texture("piedra", true)
            .indices(&[0, 1, 2, 3]);
    }
    writer
        .face_with_hole(FLOOR, "madera", &[0, 1, 2, 3], &hole, 1)
        .bsp_face(FLOOR, "muro", &[0, 1, 2, 3], &[(&hole[..], 1)], &split)
        .portal_face(WALL, &[8, 9, 10, 11], sample.portal_sector)
        .skydome(FLOOR, &[0, 1, 2]);

    writer
        .sector("casa", sample.face_counts[1])
        .simple_face(FLOOR, "blanca", &[0, 1, 2, 3])
        .portal_face(WALL, &[11, 10, 9, 8], 0)
        .simple_face(FLOOR, "", &[0, 1, 2])
        .simple_face(FLOOR, "piedra", &[0, 1, 2, 3]);

    writer.into_bytes()
}
